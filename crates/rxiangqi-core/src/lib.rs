//! # rxiangqi-core
//!
//! シャンチー（中国象棋）のルール・盤面コアライブラリ。
//!
//! 10×9盤のビットボード表現、magic bitboardによる利きテーブル、
//! 合法手生成、長将・長捉（perpetual check / chase）の裁定、
//! 千日手の記録を持つ局面履歴を提供する。
//!
//! ## モジュール構成
//!
//! - `types`: 基本型（File, Rank, Square, PieceType, Move, GameResult）
//! - `bitboard`: 90bitビットボード演算と利きテーブル
//! - `board`: 盤面表現（手番側視点）、手の適用、合法手生成、FEN入出力
//! - `position`: 局面（手数・千日手カウンタ付き）と局面履歴、ルール裁定
//! - `policy`: 指し手とNNポリシーインデックスの相互変換
//!
//! 盤面は常に手番側が上へ進む向きに正規化される（黒番では盤を鏡映する）。
//! 利きテーブルは初回アクセス時に一度だけ構築され、以後は読み取り専用。

pub mod bitboard;
pub mod board;
pub mod policy;
pub mod position;
pub mod types;
pub mod util;

pub use bitboard::Bitboard;
pub use board::{Board, FenError, MoveParseError};
pub use position::{Position, PositionHistory};
pub use types::{File, GameResult, Move, MoveList, PieceType, Rank, Square};

/// 利きテーブルとポリシーテーブルを明示的に構築する。
///
/// どちらのテーブルも初回アクセス時に遅延構築されるため呼び出しは必須では
/// ないが、探索開始前などに初期化コストを先払いしたい場合に使う。
pub fn init() {
    bitboard::magic::ensure_initialized();
    policy::ensure_initialized();
}
