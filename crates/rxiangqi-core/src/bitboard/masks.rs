//! 固定マスク（筋・段・九宮・河界・駒の配置可能域）

use super::Bitboard;

const fn file_bits(f: usize) -> u128 {
    let mut v = 0u128;
    let mut r = 0;
    while r < 10 {
        v |= 1u128 << (r * 9 + f);
        r += 1;
    }
    v
}

const fn rank_bits(r: usize) -> u128 {
    0x1FFu128 << (r * 9)
}

const fn init_file_bb() -> [Bitboard; 9] {
    let mut out = [Bitboard::EMPTY; 9];
    let mut f = 0;
    while f < 9 {
        out[f] = Bitboard::new(file_bits(f));
        f += 1;
    }
    out
}

const fn init_rank_bb() -> [Bitboard; 10] {
    let mut out = [Bitboard::EMPTY; 10];
    let mut r = 0;
    while r < 10 {
        out[r] = Bitboard::new(rank_bits(r));
        r += 1;
    }
    out
}

/// 筋のBitboard
pub static FILE_BB: [Bitboard; 9] = init_file_bb();

/// 段のBitboard
pub static RANK_BB: [Bitboard; 10] = init_rank_bb();

/// 九宮（両陣営の3×3）
///
/// 将と士はこの領域から出られない。
pub const PALACE: Bitboard = Bitboard::new({
    let mut v = 0u128;
    let ranks = [0usize, 1, 2, 7, 8, 9];
    let mut i = 0;
    while i < 6 {
        let mut f = 3;
        while f <= 5 {
            v |= 1u128 << (ranks[i] * 9 + f);
            f += 1;
        }
        i += 1;
    }
    v
});

/// 河界で分けた盤の半分: HALF[0]=手番側（段0-4）、HALF[1]=相手側（段5-9）
pub const HALF: [Bitboard; 2] = {
    let mut lower = 0u128;
    let mut upper = 0u128;
    let mut r = 0;
    while r < 5 {
        lower |= rank_bits(r);
        upper |= rank_bits(r + 5);
        r += 1;
    }
    [Bitboard::new(lower), Bitboard::new(upper)]
};

/// 象が到達できる升の集合（両陣営とも自陣の7升）
pub const BISHOP_ZONE: Bitboard = Bitboard::new({
    // (筋, 段): 自陣7升とその鏡映
    let squares = [
        (2usize, 0usize),
        (6, 0),
        (0, 2),
        (4, 2),
        (8, 2),
        (2, 4),
        (6, 4),
    ];
    let mut v = 0u128;
    let mut i = 0;
    while i < 7 {
        let (f, r) = squares[i];
        v |= 1u128 << (r * 9 + f);
        v |= 1u128 << ((9 - r) * 9 + f);
        i += 1;
    }
    v
});

/// 兵が立てる升の集合: PAWN_ZONE[0]=手番側の兵、PAWN_ZONE[1]=相手側の兵
///
/// 自陣では段3・4の兵筋（a,c,e,g,i）のみ。河を渡れば全升。
pub const PAWN_ZONE: [Bitboard; 2] = {
    let pawn_files =
        file_bits(0) | file_bits(2) | file_bits(4) | file_bits(6) | file_bits(8);
    let ours = HALF[1].as_u128() | ((rank_bits(3) | rank_bits(4)) & pawn_files);
    let theirs = HALF[0].as_u128() | ((rank_bits(5) | rank_bits(6)) & pawn_files);
    [Bitboard::new(ours), Bitboard::new(theirs)]
};
