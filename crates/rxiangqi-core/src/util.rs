//! ハッシュユーティリティ
//!
//! 盤面・局面の構造的ハッシュに使う64bitハッシュ連結。プロセスを跨いだ
//! 安定性は保証しない（キャッシュキー用途のみ）。

/// 単一値のビット拡散
#[inline]
const fn hash64(val: u64) -> u64 {
    0xfad0_d7f2_fbb0_59f1u64
        .wrapping_mul(val.wrapping_add(0xbaad_41cd_cb83_9961))
        .wrapping_add(
            0x7ace_c005_0bf8_2f43u64.wrapping_mul((val >> 31).wrapping_add(0xd571_b3a9_2b1b_2755)),
        )
}

/// 既存のハッシュ値に1値を連結する
#[inline]
pub const fn hash_append(hash: u64, x: u64) -> u64 {
    hash ^ 0x2997_99ad_f0d9_5def_u64
        .wrapping_add(hash64(x))
        .wrapping_add(hash << 6)
        .wrapping_add(hash >> 2)
}

/// 値列をハッシュ値1つに畳み込む
pub fn hash_cat(values: &[u64]) -> u64 {
    let mut hash = 0u64;
    for &v in values {
        hash = hash_append(hash, v);
    }
    hash
}
