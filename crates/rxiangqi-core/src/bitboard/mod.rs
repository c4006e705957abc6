//! ビットボードモジュール
//!
//! - `core`: 90bitビットボード本体
//! - `masks`: 筋・段・九宮・河界などの固定マスク
//! - `magic`: magic bitboardによる利きテーブル

mod core;
pub mod magic;
pub mod masks;

pub use core::{Bitboard, BitboardIter};
