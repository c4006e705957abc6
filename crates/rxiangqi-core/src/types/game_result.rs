//! 対局結果（GameResult）

use serde::{Deserialize, Serialize};

/// 対局結果
///
/// 勝敗は常に真の白/黒（鏡映前の手番）に対して表す。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum GameResult {
    /// 未決着
    #[default]
    Undecided,
    /// 白勝ち
    WhiteWon,
    /// 引き分け
    Draw,
    /// 黒勝ち
    BlackWon,
}

impl GameResult {
    /// 決着しているか
    #[inline]
    pub const fn is_decided(self) -> bool {
        !matches!(self, GameResult::Undecided)
    }
}

impl std::ops::Neg for GameResult {
    type Output = GameResult;

    /// 勝敗の反転（視点の入れ替え）。DrawとUndecidedは不変。
    #[inline]
    fn neg(self) -> GameResult {
        match self {
            GameResult::WhiteWon => GameResult::BlackWon,
            GameResult::BlackWon => GameResult::WhiteWon,
            other => other,
        }
    }
}
