//! 升目（Square）

use serde::{Deserialize, Serialize};

use super::{File, Rank};

/// 升目（0-89）
///
/// 配置: a0=0, b0=1, ..., i0=8, a1=9, ..., i9=89（段×9+筋）。
/// 手番側から見て下から上、左から右に番号が振られる。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[repr(transparent)]
pub struct Square(u8);

impl Square {
    /// 升目の数
    pub const NUM: usize = 90;

    /// FileとRankからSquareを生成
    #[inline]
    pub const fn new(file: File, rank: Rank) -> Square {
        Square(rank.raw() * 9 + file.raw())
    }

    /// 筋を取得
    #[inline]
    pub const fn file(self) -> File {
        match File::from_u8(self.0 % 9) {
            Some(f) => f,
            None => unreachable!(),
        }
    }

    /// 段を取得
    #[inline]
    pub const fn rank(self) -> Rank {
        match Rank::from_u8(self.0 / 9) {
            Some(r) => r,
            None => unreachable!(),
        }
    }

    /// インデックスとして使用
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// 内部値を取得
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// u8から生成（範囲チェックあり）
    #[inline]
    pub const fn from_u8(n: u8) -> Option<Square> {
        if n < 90 { Some(Square(n)) } else { None }
    }

    /// u8から生成（範囲チェックなし）
    ///
    /// # Safety
    /// n < 90 でなければならない
    #[inline]
    pub const unsafe fn from_u8_unchecked(n: u8) -> Square {
        debug_assert!(n < 90);
        Square(n)
    }

    /// 上下反転（段r → 段9-r、筋はそのまま）
    #[inline]
    pub const fn flip(self) -> Square {
        Square::new(self.file(), self.rank().flip())
    }

    /// 左右反転（e筋軸、段はそのまま）
    #[inline]
    pub const fn flop(self) -> Square {
        Square::new(self.file().flop(), self.rank())
    }

    /// 方向ベクトル（段差分, 筋差分）を加えた升目。盤外ならNone。
    #[inline]
    pub const fn offset(self, dr: i8, df: i8) -> Option<Square> {
        let f = self.0 as i8 % 9 + df;
        let r = self.0 as i8 / 9 + dr;
        if 0 <= f && f < 9 && 0 <= r && r < 10 {
            Some(Square((r * 9 + f) as u8))
        } else {
            None
        }
    }

    /// チェビシェフ距離
    #[inline]
    pub const fn distance(self, other: Square) -> u8 {
        let df = (self.0 % 9).abs_diff(other.0 % 9);
        let dr = (self.0 / 9).abs_diff(other.0 / 9);
        if df > dr { df } else { dr }
    }

    /// algebraic表記（"e0"等）から変換
    pub fn parse(s: &str) -> Option<Square> {
        let mut chars = s.chars();
        let file = File::parse(chars.next()?)?;
        let rank = Rank::parse(chars.next()?)?;
        Some(Square::new(file, rank))
    }

    /// 全ての升を返すイテレータ
    pub fn all() -> impl Iterator<Item = Square> {
        (0..90).map(Square)
    }
}

impl std::fmt::Display for Square {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}{}", self.file().to_char(), self.rank().to_char())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_new() {
        let a0 = Square::new(File::A, Rank::R0);
        assert_eq!(a0.index(), 0);
        let i0 = Square::new(File::I, Rank::R0);
        assert_eq!(i0.index(), 8);
        let a1 = Square::new(File::A, Rank::from_u8(1).unwrap());
        assert_eq!(a1.index(), 9);
        let i9 = Square::new(File::I, Rank::R9);
        assert_eq!(i9.index(), 89);
    }

    #[test]
    fn test_square_file_rank() {
        for sq in Square::all() {
            assert_eq!(Square::new(sq.file(), sq.rank()), sq);
        }
    }

    #[test]
    fn test_square_flip_involution() {
        for sq in Square::all() {
            assert_eq!(sq.flip().flip(), sq);
            assert_eq!(sq.flip().file(), sq.file());
            assert_eq!(sq.flip().rank(), sq.rank().flip());
        }
    }

    #[test]
    fn test_square_flop_involution() {
        for sq in Square::all() {
            assert_eq!(sq.flop().flop(), sq);
            assert_eq!(sq.flop().rank(), sq.rank());
        }
    }

    #[test]
    fn test_square_offset() {
        let e4 = Square::parse("e4").unwrap();
        assert_eq!(e4.offset(1, 0), Square::parse("e5"));
        assert_eq!(e4.offset(-1, -1), Square::parse("d3"));
        let a0 = Square::parse("a0").unwrap();
        assert_eq!(a0.offset(-1, 0), None);
        assert_eq!(a0.offset(0, -1), None);
        let i9 = Square::parse("i9").unwrap();
        assert_eq!(i9.offset(0, 1), None);
        assert_eq!(i9.offset(1, 0), None);
    }

    #[test]
    fn test_square_parse_display() {
        for sq in Square::all() {
            assert_eq!(Square::parse(&sq.to_string()), Some(sq));
        }
        assert_eq!(Square::parse(""), None);
        assert_eq!(Square::parse("j0"), None);
        assert_eq!(Square::parse("ax"), None);
    }

    #[test]
    fn test_square_distance() {
        let a0 = Square::parse("a0").unwrap();
        let i9 = Square::parse("i9").unwrap();
        assert_eq!(a0.distance(i9), 9);
        assert_eq!(a0.distance(a0), 0);
        let b2 = Square::parse("b2").unwrap();
        assert_eq!(a0.distance(b2), 2);
    }
}
