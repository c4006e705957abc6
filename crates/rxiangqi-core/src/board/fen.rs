//! FEN形式の解析・出力と指し手文字列の解析
//!
//! 盤面は段9から段0へ `/` 区切り、空升は数字で連長圧縮、駒は
//! `racpnbk`（大文字=白）。続けて手番、キャスリング・アンパッサンの
//! プレースホルダ（常に `-`）、no-progress手数、総手数。
//! 末尾のフィールドは省略できる（盤面だけのFENも受け付ける）。

use crate::bitboard::masks::{BISHOP_ZONE, PALACE, PAWN_ZONE};
use crate::types::{File, Move, PieceType, Rank, Square};

use super::Board;

/// 平手初期局面のFEN
pub const STARTPOS_FEN: &str =
    "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w - - 0 1";

/// FENパースエラー
///
/// 原因と入力文字列全体を保持する（呼び出し側のデバッグ用）。
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FenError {
    reason: String,
    fen: String,
}

impl FenError {
    fn new(reason: impl Into<String>, fen: &str) -> FenError {
        FenError { reason: reason.into(), fen: fen.to_string() }
    }

    /// エラーの原因
    pub fn reason(&self) -> &str {
        &self.reason
    }
}

impl std::fmt::Display for FenError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "bad FEN string ({}): {}", self.reason, self.fen)
    }
}

impl std::error::Error for FenError {}

/// 指し手文字列のパースエラー
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveParseError {
    reason: String,
    text: String,
}

impl MoveParseError {
    fn new(reason: impl Into<String>, text: &str) -> MoveParseError {
        MoveParseError { reason: reason.into(), text: text.to_string() }
    }
}

impl std::fmt::Display for MoveParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid move ({}): {}", self.reason, self.text)
    }
}

impl std::error::Error for MoveParseError {}

impl Board {
    /// FEN文字列から局面を設定する
    ///
    /// 戻り値は (no-progress手数, 総手数)。FENに含まれない場合は (0, 1)。
    /// 駒は種類ごとの配置可能域（九宮・象の升・兵の升）を検査し、
    /// 違反はエラーとして報告する。
    pub fn set_from_fen(&mut self, fen: &str) -> Result<(i32, i32), FenError> {
        self.clear();
        let mut rule50_ply = 0i32;
        let mut total_moves = 1i32;
        let bytes = fen.as_bytes();
        let mut pos = 0usize;

        let skip_spaces = |pos: &mut usize| -> bool {
            while *pos < bytes.len() && bytes[*pos] == b' ' {
                *pos += 1;
            }
            *pos == bytes.len()
        };

        // 先頭の空白
        skip_spaces(&mut pos);

        // 盤面
        let mut rank = 9u8;
        let mut file = 0u8;
        while pos < bytes.len() {
            let c = bytes[pos] as char;
            if c == ' ' {
                break;
            }
            pos += 1;
            if c == '/' {
                if rank == 0 {
                    return Err(FenError::new("too many ranks", fen));
                }
                rank -= 1;
                file = 0;
                continue;
            }
            if c.is_ascii_digit() {
                file += c as u8 - b'0';
                if file > 9 {
                    return Err(FenError::new("too many files", fen));
                }
                continue;
            }
            let Some(piece) = PieceType::parse(c) else {
                return Err(FenError::new("invalid character as piece", fen));
            };
            let square = match (File::from_u8(file), Rank::from_u8(rank)) {
                (Some(f), Some(r)) => Square::new(f, r),
                _ => return Err(FenError::new("piece out of board", fen)),
            };
            let is_theirs = c.is_ascii_lowercase();
            match piece {
                PieceType::Advisor if !PALACE.contains(square) => {
                    return Err(FenError::new("advisor not in palace", fen));
                }
                PieceType::King if !PALACE.contains(square) => {
                    return Err(FenError::new("king not in palace", fen));
                }
                PieceType::Pawn if !PAWN_ZONE[is_theirs as usize].contains(square) => {
                    return Err(FenError::new("pawn in wrong place", fen));
                }
                PieceType::Bishop if !BISHOP_ZONE.contains(square) => {
                    return Err(FenError::new("bishop in wrong place", fen));
                }
                _ => {}
            }
            self.put_piece(square, piece, is_theirs);
            file += 1;
        }
        if skip_spaces(&mut pos) {
            return Ok((rule50_ply, total_moves));
        }

        // id盤の割り当て: 各側の駒に升番号順で小さな連番を振る
        let mut our_id = 0u8;
        let mut their_id = 0u8;
        for s in self.our_pieces | self.their_pieces {
            self.id_board[s.index()] = if self.our_pieces.contains(s) {
                let id = our_id;
                our_id += 1;
                id
            } else {
                let id = their_id;
                their_id += 1;
                id
            };
        }

        // 手番
        let side = (bytes[pos] as char).to_ascii_lowercase();
        pos += 1;
        if side == 'b' {
            self.mirror();
        } else if side != 'w' {
            return Err(FenError::new("invalid side to move", fen));
        }
        if pos < bytes.len() && bytes[pos] != b' ' {
            return Err(FenError::new("space expected after side to move", fen));
        }
        if skip_spaces(&mut pos) {
            return Ok((rule50_ply, total_moves));
        }

        // キャスリング欄（プレースホルダ）
        if bytes[pos] == b'-' {
            pos += 1;
        }
        if pos < bytes.len() && bytes[pos] != b' ' {
            return Err(FenError::new("space expected after castling", fen));
        }
        if skip_spaces(&mut pos) {
            return Ok((rule50_ply, total_moves));
        }

        // アンパッサン欄（プレースホルダ）
        if bytes[pos] == b'-' {
            pos += 1;
        }
        if pos < bytes.len() && bytes[pos] != b' ' {
            return Err(FenError::new("space expected after en passant", fen));
        }
        if skip_spaces(&mut pos) {
            return Ok((rule50_ply, total_moves));
        }

        let parse_int = |pos: &mut usize, error_msg: &str| -> Result<i32, FenError> {
            let start = *pos;
            while *pos < bytes.len() && bytes[*pos] != b' ' {
                *pos += 1;
            }
            fen[start..*pos].parse::<i32>().map_err(|_| FenError::new(error_msg, fen))
        };

        // no-progress手数（上限120の手数時計）
        rule50_ply = parse_int(&mut pos, "bad no-progress halfmoves")?;
        if skip_spaces(&mut pos) {
            return Ok((rule50_ply, total_moves));
        }

        // 総手数
        total_moves = parse_int(&mut pos, "bad total moves")?;
        if !skip_spaces(&mut pos) {
            return Err(FenError::new("extra characters", fen));
        }

        Ok((rule50_ply, total_moves))
    }

    /// 盤面と手番のFEN表現（"placement w|b"）
    ///
    /// 手数フィールドは盤面が持たないため含まない。完全なFENは
    /// `Position::to_fen` が組み立てる。
    pub fn fen(&self) -> String {
        let mut board = self.clone();
        let black_to_move = board.flipped;
        if black_to_move {
            board.mirror();
        }
        let mut result = String::new();
        for rank in (0..10u8).rev() {
            let mut empty = 0;
            for file in 0..9u8 {
                let square = Square::from_u8(rank * 9 + file).unwrap();
                match board.piece_char_at(square) {
                    Some(piece) => {
                        if empty > 0 {
                            result.push_str(&empty.to_string());
                            empty = 0;
                        }
                        result.push(piece);
                    }
                    None => empty += 1,
                }
            }
            if empty > 0 {
                result.push_str(&empty.to_string());
            }
            if rank > 0 {
                result.push('/');
            }
        }
        result.push_str(if black_to_move { " b" } else { " w" });
        result
    }

    /// 升の駒のFEN文字（大文字=手番側）。空升はNone。
    fn piece_char_at(&self, square: Square) -> Option<char> {
        if !self.occupied().contains(square) {
            return None;
        }
        let c = if self.rooks.contains(square) {
            'R'
        } else if self.advisors.contains(square) {
            'A'
        } else if self.cannons.contains(square) {
            'C'
        } else if self.pawns.contains(square) {
            'P'
        } else if self.knights.contains(square) {
            'N'
        } else if self.bishops.contains(square) {
            'B'
        } else {
            'K'
        };
        Some(if self.their_pieces.contains(square) { c.to_ascii_lowercase() } else { c })
    }

    /// 指し手文字列を解析する
    ///
    /// 入力は常に真の向きの表記（黒の手も "e6e5" のように書く）。
    /// 返り値は手番側視点のMove。移動元に手番側の駒があることまで
    /// 検査する（行き先の合法性は検査しない）。
    pub fn parse_move(&self, move_str: &str) -> Result<Move, MoveParseError> {
        let bytes = move_str.as_bytes();
        if bytes.len() != 4 {
            return Err(MoveParseError::new("wrong move size", move_str));
        }
        let (Some(from_file), Some(from_rank), Some(to_file), Some(to_rank)) = (
            File::parse(bytes[0] as char),
            Rank::parse(bytes[1] as char),
            File::parse(bytes[2] as char),
            Rank::parse(bytes[3] as char),
        ) else {
            return Err(MoveParseError::new("bad square", move_str));
        };
        let (from_rank, to_rank) =
            if self.flipped { (from_rank.flip(), to_rank.flip()) } else { (from_rank, to_rank) };
        let from = Square::new(from_file, from_rank);
        let to = Square::new(to_file, to_rank);
        if !self.our_pieces.contains(from) {
            return Err(MoveParseError::new("no piece to move", move_str));
        }
        Ok(Move::new(from, to))
    }
}
