//! 指し手とNNポリシーインデックスの相互変換
//!
//! 何らかの駒がどこかの升から指し得る (from, to) の全組を、algebraic
//! 文字列の辞書順に並べて密な番号を振る。盤面は常に手番側視点なので、
//! 士・象の指し手は下半分（手番側）のものだけが載る。車の幾何は兵・
//! 将の1歩も包含するため、テーブルは車線・馬跳び・士の斜め・象の
//! 対角跳びの和になる。
//!
//! 変換（現状は左右鏡映のみ）は両端の升に適用してから番号を引く。
//! `as_nn_index` と `move_from_nn_index` はテーブルに載る全ての指し手で
//! 互いに逆写像。テーブルに無い指し手に対しては未定義（呼んではならない）。

use std::sync::OnceLock;

use crate::bitboard::masks::{FILE_BB, RANK_BB};
use crate::types::{Move, Square};

/// 変換なし
pub const NO_TRANSFORM: i32 = 0;
/// 左右鏡映（e筋軸）
pub const FLIP_TRANSFORM: i32 = 1;

/// 手番側の士が立てる升
const ADVISOR_SQUARES: [(u8, u8); 5] = [(3, 0), (5, 0), (4, 1), (3, 2), (5, 2)];
/// 手番側の象が立てる升
const BISHOP_SQUARES: [(u8, u8); 7] = [(2, 0), (6, 0), (0, 2), (4, 2), (8, 2), (2, 4), (6, 4)];

const KNIGHT_DIRS: [(i8, i8); 8] =
    [(-2, -1), (-2, 1), (2, -1), (2, 1), (1, -2), (1, 2), (-1, -2), (-1, 2)];

struct PolicyMap {
    idx_to_move: Vec<Move>,
    /// Move::raw() → インデックス（載らない手はu16::MAX）
    move_to_idx: Vec<u16>,
}

impl PolicyMap {
    fn new() -> PolicyMap {
        let advisor: Vec<Square> =
            ADVISOR_SQUARES.iter().map(|&(f, r)| Square::from_u8(r * 9 + f).unwrap()).collect();
        let bishop: Vec<Square> =
            BISHOP_SQUARES.iter().map(|&(f, r)| Square::from_u8(r * 9 + f).unwrap()).collect();

        let mut moves = Vec::new();
        for from in Square::all() {
            let mut targets =
                (FILE_BB[from.file().index()] | RANK_BB[from.rank().index()]) - from;
            for (dr, df) in KNIGHT_DIRS {
                if let Some(to) = from.offset(dr, df) {
                    targets.set(to);
                }
            }
            if advisor.contains(&from) {
                for (dr, df) in [(1i8, 1i8), (1, -1), (-1, 1), (-1, -1)] {
                    if let Some(to) = from.offset(dr, df) {
                        targets.set_if(to, advisor.contains(&to));
                    }
                }
            }
            if bishop.contains(&from) {
                for (dr, df) in [(2i8, 2i8), (2, -2), (-2, 2), (-2, -2)] {
                    if let Some(to) = from.offset(dr, df) {
                        targets.set_if(to, bishop.contains(&to));
                    }
                }
            }
            for to in targets {
                moves.push(Move::new(from, to));
            }
        }

        moves.sort_by_key(|m| m.to_string());

        let mut move_to_idx = vec![u16::MAX; 1 << 14];
        for (i, m) in moves.iter().enumerate() {
            move_to_idx[m.raw() as usize] = i as u16;
        }

        PolicyMap { idx_to_move: moves, move_to_idx }
    }
}

static POLICY: OnceLock<PolicyMap> = OnceLock::new();

fn policy() -> &'static PolicyMap {
    POLICY.get_or_init(PolicyMap::new)
}

/// テーブルを即時構築する
pub fn ensure_initialized() {
    let _ = policy();
}

/// ポリシーテーブルの指し手数
pub fn num_policy_moves() -> usize {
    policy().idx_to_move.len()
}

fn transform_square(sq: Square, transform: i32) -> Square {
    if transform & FLIP_TRANSFORM != 0 { sq.flop() } else { sq }
}

impl Move {
    /// NNポリシーインデックスへ変換する
    ///
    /// テーブルに載らない指し手に対しては未定義。
    pub fn as_nn_index(self, transform: i32) -> u16 {
        let m = if transform == NO_TRANSFORM {
            self
        } else {
            Move::new(
                transform_square(self.from(), transform),
                transform_square(self.to(), transform),
            )
        };
        let idx = policy().move_to_idx[m.raw() as usize];
        debug_assert!(idx != u16::MAX, "move {m} is not in the policy table");
        idx
    }
}

/// NNポリシーインデックスから指し手へ変換する
///
/// 鏡映は自身が逆変換なので同じtransformを適用し直す。
pub fn move_from_nn_index(idx: u16, transform: i32) -> Move {
    let m = policy().idx_to_move[idx as usize];
    if transform == NO_TRANSFORM {
        m
    } else {
        Move::new(transform_square(m.from(), transform), transform_square(m.to(), transform))
    }
}
