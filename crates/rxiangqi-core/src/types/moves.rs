//! 指し手（Move）

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use super::{File, Rank, Square};

/// 指し手（16bit）
///
/// - bit 0-6:  移動先 (to)
/// - bit 7-13: 移動元 (from)
/// - bit 14-15: 予約
///
/// この変種に成り・打ちは存在しないためフラグは持たない。
/// 等価性は構造的（同じfrom/toなら等しい）。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Move(u16);

const TO_MASK: u16 = 0b0000_0000_0111_1111;
const FROM_MASK: u16 = 0b0011_1111_1000_0000;

impl Move {
    /// 無効な指し手
    pub const NONE: Move = Move(0);

    /// from/toからMoveを生成（手番側視点）
    #[inline]
    pub const fn new(from: Square, to: Square) -> Move {
        Move(((from.raw() as u16) << 7) | to.raw() as u16)
    }

    /// 移動元
    #[inline]
    pub const fn from(self) -> Square {
        // SAFETY: new()で構築された値はfrom < 90
        unsafe { Square::from_u8_unchecked(((self.0 & FROM_MASK) >> 7) as u8) }
    }

    /// 移動先
    #[inline]
    pub const fn to(self) -> Square {
        // SAFETY: new()で構築された値はto < 90
        unsafe { Square::from_u8_unchecked((self.0 & TO_MASK) as u8) }
    }

    /// 無効な指し手かどうか
    #[inline]
    pub const fn is_null(self) -> bool {
        self.0 == 0
    }

    /// 内部表現（ポリシーテーブルの引き当てに使用）
    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    /// 両端の段を上下反転した指し手（相手側視点への変換）
    #[inline]
    pub const fn flipped(self) -> Move {
        Move::new(self.from().flip(), self.to().flip())
    }

    /// 4文字のalgebraic表記（"e6e5"等）から変換。
    ///
    /// `black_perspective` が真のとき両端の段を反転してから返す
    /// （黒番の指し手を手番側視点に揃える用途）。
    pub fn parse(s: &str, black_perspective: bool) -> Option<Move> {
        let bytes = s.as_bytes();
        if bytes.len() != 4 {
            return None;
        }
        let from = Square::new(
            File::parse(bytes[0] as char)?,
            Rank::parse(bytes[1] as char)?,
        );
        let to = Square::new(File::parse(bytes[2] as char)?, Rank::parse(bytes[3] as char)?);
        let m = Move::new(from, to);
        Some(if black_perspective { m.flipped() } else { m })
    }
}

impl std::fmt::Display for Move {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.from(), self.to())
    }
}

/// 指し手リスト
///
/// この変種の合法手は1局面あたり高々120程度なのでインライン容量で収まる。
pub type MoveList = SmallVec<[Move; 128]>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_move_new() {
        let from = Square::parse("e0").unwrap();
        let to = Square::parse("e1").unwrap();
        let m = Move::new(from, to);
        assert_eq!(m.from(), from);
        assert_eq!(m.to(), to);
        assert!(!m.is_null());
    }

    #[test]
    fn test_move_none() {
        assert!(Move::NONE.is_null());
    }

    #[test]
    fn test_move_flipped() {
        let m = Move::parse("e0e1", false).unwrap();
        assert_eq!(m.flipped().to_string(), "e9e8");
        assert_eq!(m.flipped().flipped(), m);
    }

    #[test]
    fn test_move_parse() {
        let m = Move::parse("h2e2", false).unwrap();
        assert_eq!(m.from(), Square::parse("h2").unwrap());
        assert_eq!(m.to(), Square::parse("e2").unwrap());
        assert_eq!(m.to_string(), "h2e2");

        // 黒視点パース: 段が反転する
        let m = Move::parse("h7e7", true).unwrap();
        assert_eq!(m.to_string(), "h2e2");

        assert_eq!(Move::parse("h2e", false), None);
        assert_eq!(Move::parse("h2e2x", false), None);
        assert_eq!(Move::parse("z2e2", false), None);
    }

    #[test]
    fn test_move_equality_is_structural() {
        let a = Move::parse("a0a1", false).unwrap();
        let b = Move::new(Square::parse("a0").unwrap(), Square::parse("a1").unwrap());
        assert_eq!(a, b);
    }
}
