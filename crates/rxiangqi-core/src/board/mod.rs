//! 盤面表現
//!
//! 盤面は常に手番側の視点で保持する: 手番側の駒が上（段9方向）へ進む。
//! 黒番では盤全体を鏡映し、`flipped` で真の白黒との対応を記録する。
//! この正規化により手生成・利き判定のコードパスが片側分で済む。
//!
//! 盤面同士の等価性は構造的で、駒配置・王位置・向きに加えて
//! 長捉判定用のid盤も比較対象に含む。

mod chase;
mod fen;
mod material;
mod movegen;


pub use fen::{FenError, MoveParseError, STARTPOS_FEN};

use crate::bitboard::{Bitboard, magic};
use crate::types::{Move, PieceType, Square};
use crate::util;

/// 盤面（手番側視点）
#[derive(Clone, PartialEq, Eq)]
pub struct Board {
    /// 手番側の全駒
    our_pieces: Bitboard,
    /// 相手側の全駒
    their_pieces: Bitboard,
    rooks: Bitboard,
    advisors: Bitboard,
    cannons: Bitboard,
    pawns: Bitboard,
    knights: Bitboard,
    bishops: Bitboard,
    our_king: Square,
    their_king: Square,
    /// 真の黒番なら真（盤が鏡映済み）
    flipped: bool,
    /// 升ごとの駒id（真の向きで保持、長捉の追跡対象の識別に使う）
    id_board: [u8; 90],
}

impl Board {
    /// 空の盤面
    pub fn new() -> Board {
        Board {
            our_pieces: Bitboard::EMPTY,
            their_pieces: Bitboard::EMPTY,
            rooks: Bitboard::EMPTY,
            advisors: Bitboard::EMPTY,
            cannons: Bitboard::EMPTY,
            pawns: Bitboard::EMPTY,
            bishops: Bitboard::EMPTY,
            knights: Bitboard::EMPTY,
            our_king: Square::new(crate::types::File::A, crate::types::Rank::R0),
            their_king: Square::new(crate::types::File::A, crate::types::Rank::R0),
            flipped: false,
            id_board: [0; 90],
        }
    }

    /// 平手初期局面
    pub fn startpos() -> Board {
        Board::from_fen(STARTPOS_FEN).unwrap()
    }

    /// FEN文字列から盤面を生成（手数情報は捨てる）
    pub fn from_fen(fen: &str) -> Result<Board, FenError> {
        let mut board = Board::new();
        board.set_from_fen(fen)?;
        Ok(board)
    }

    /// 全体を空に戻す
    pub fn clear(&mut self) {
        *self = Board::new();
    }

    /// 白黒を入れ替えて盤を上下鏡映する
    ///
    /// 段0にあったものは段9へ移り、筋は変わらない。手の適用後に呼んで
    /// 新しい手番側の視点へ切り替える。
    pub fn mirror(&mut self) {
        let ours = self.our_pieces.mirrored();
        self.our_pieces = self.their_pieces.mirrored();
        self.their_pieces = ours;
        self.rooks.mirror();
        self.advisors.mirror();
        self.cannons.mirror();
        self.pawns.mirror();
        self.knights.mirror();
        self.bishops.mirror();
        let our_king = self.our_king.flip();
        self.our_king = self.their_king.flip();
        self.their_king = our_king;
        self.flipped = !self.flipped;
    }

    /// 駒を置く（FENパース用）
    pub(crate) fn put_piece(&mut self, square: Square, piece: PieceType, is_theirs: bool) {
        if is_theirs {
            self.their_pieces.set(square);
        } else {
            self.our_pieces.set(square);
        }
        match piece {
            PieceType::Rook => self.rooks.set(square),
            PieceType::Advisor => self.advisors.set(square),
            PieceType::Cannon => self.cannons.set(square),
            PieceType::Pawn => self.pawns.set(square),
            PieceType::Knight => self.knights.set(square),
            PieceType::Bishop => self.bishops.set(square),
            PieceType::King => {
                if is_theirs {
                    self.their_king = square;
                } else {
                    self.our_king = square;
                }
            }
        }
    }

    /// 手番側の手を適用する（合法手であることは呼び出し側の責任）。
    ///
    /// 捕獲（no-progressカウンタをリセットすべき手）なら真を返す。
    pub fn apply_move(&mut self, m: Move) -> bool {
        debug_assert!(
            self.our_pieces.contains(m.from()),
            "apply_move: no piece to move on {}",
            m.from()
        );
        let from = m.from();
        let to = m.to();

        self.our_pieces.reset(from);
        self.our_pieces.set(to);

        let is_zeroing = self.their_pieces.contains(to);
        if is_zeroing {
            self.their_pieces.reset(to);
            self.rooks.reset(to);
            self.advisors.reset(to);
            self.cannons.reset(to);
            self.pawns.reset(to);
            self.knights.reset(to);
            self.bishops.reset(to);
        }

        if from == self.our_king {
            self.our_king = to;
            debug_assert!(self.is_valid(), "move {m} resulted in invalid board");
            return is_zeroing;
        }

        self.rooks.set_if(to, self.rooks.contains(from));
        self.advisors.set_if(to, self.advisors.contains(from));
        self.cannons.set_if(to, self.cannons.contains(from));
        self.pawns.set_if(to, self.pawns.contains(from));
        self.knights.set_if(to, self.knights.contains(from));
        self.bishops.set_if(to, self.bishops.contains(from));
        self.rooks.reset(from);
        self.advisors.reset(from);
        self.cannons.reset(from);
        self.pawns.reset(from);
        self.knights.reset(from);
        self.bishops.reset(from);

        // id盤は真の向きで更新する
        let (from, to) = if self.flipped { (from.flip(), to.flip()) } else { (from, to) };
        self.id_board[to.index()] = self.id_board[from.index()];
        self.id_board[from.index()] = 0;

        debug_assert!(self.is_valid(), "move {m} resulted in invalid board");
        is_zeroing
    }

    /// 升ksqに利いている駒（王手駒）のBitboard
    ///
    /// `OURS` が真なら手番側の王に対する相手駒、偽なら相手の王に対する
    /// 手番側の駒を数える。占有は引数で与える（仮想的な局面の検査用）。
    /// 将・士・象はこの変種では王手できないため含まれない
    /// （将帥対面は別途判定する）。
    pub(crate) fn checkers_to<const OURS: bool>(&self, ksq: Square, occupied: Bitboard) -> Bitboard {
        let mut checkers = magic::rook_attacks(ksq, occupied) & self.rooks;
        checkers |= magic::cannon_attacks(ksq, occupied) & self.cannons;
        let pawn_reverse = if OURS {
            magic::pawn_attacks_to_ours(ksq)
        } else {
            magic::pawn_attacks_to_theirs(ksq)
        };
        checkers |= pawn_reverse & self.pawns;
        checkers |= magic::knight_attacks_to(ksq, occupied) & self.knights;
        checkers & if OURS { self.their_pieces } else { self.our_pieces }
    }

    /// 升sqを取り返せる相手側の駒のBitboard（長捉判定用）
    pub(crate) fn recaptures_to(&self, sq: Square) -> Bitboard {
        let occupied = self.occupied();
        let mut attackers = magic::rook_attacks(sq, occupied) & self.rooks;
        attackers |= magic::advisor_attacks(sq) & self.advisors;
        attackers |= magic::cannon_attacks(sq, occupied) & self.cannons;
        attackers |= magic::pawn_attacks_to_ours(sq) & self.pawns;
        attackers |= magic::knight_attacks_to(sq, occupied) & self.knights;
        attackers |= magic::bishop_attacks(sq, occupied) & self.bishops;
        attackers |= magic::king_attacks(sq) & Bitboard::from_square(self.their_king);
        attackers & self.their_pieces
    }

    /// 手番側の王に王手がかかっているか
    #[inline]
    pub fn is_under_check(&self) -> bool {
        self.checkers_to::<true>(self.our_king, self.occupied()).is_not_empty()
    }

    /// 盤面の構造的ハッシュ（全駒Bitboard・王位置・向き）
    ///
    /// キャッシュキー用途のみ。ビルドを跨いだ安定性は保証しない。
    pub fn hash(&self) -> u64 {
        let bbs = [
            self.our_pieces,
            self.their_pieces,
            self.rooks,
            self.advisors,
            self.cannons,
            self.pawns,
            self.knights,
            self.bishops,
        ];
        let mut values = [0u64; 17];
        for (i, bb) in bbs.iter().enumerate() {
            values[i * 2] = bb.as_u128() as u64;
            values[i * 2 + 1] = (bb.as_u128() >> 64) as u64;
        }
        values[16] = (self.our_king.index() as u64) << 16
            | (self.their_king.index() as u64) << 8
            | self.flipped as u64;
        util::hash_cat(&values)
    }

    /// 不変条件の検査: 駒種Bitboardが互いに素で、その和（王含む）が
    /// 占有の部分集合であること
    pub(crate) fn is_valid(&self) -> bool {
        let all = self.our_pieces | self.their_pieces;
        let bbs = [
            self.rooks,
            self.advisors,
            self.cannons,
            self.pawns,
            self.knights,
            self.bishops,
            self.kings(),
        ];
        let mut union = Bitboard::EMPTY;
        for bb in bbs {
            union |= bb;
        }
        if all | union != all {
            return false;
        }
        for i in 0..bbs.len() {
            for j in i + 1..bbs.len() {
                if bbs[i].intersects(bbs[j]) {
                    return false;
                }
            }
        }
        true
    }

    /// 手番側の全駒
    #[inline]
    pub fn ours(&self) -> Bitboard {
        self.our_pieces
    }

    /// 相手側の全駒
    #[inline]
    pub fn theirs(&self) -> Bitboard {
        self.their_pieces
    }

    /// 両者の全駒
    #[inline]
    pub fn occupied(&self) -> Bitboard {
        self.our_pieces | self.their_pieces
    }

    #[inline]
    pub fn rooks(&self) -> Bitboard {
        self.rooks
    }

    #[inline]
    pub fn advisors(&self) -> Bitboard {
        self.advisors
    }

    #[inline]
    pub fn cannons(&self) -> Bitboard {
        self.cannons
    }

    #[inline]
    pub fn pawns(&self) -> Bitboard {
        self.pawns
    }

    #[inline]
    pub fn knights(&self) -> Bitboard {
        self.knights
    }

    #[inline]
    pub fn bishops(&self) -> Bitboard {
        self.bishops
    }

    /// 両王のBitboard（王はSquareで保持しているため合成する）
    #[inline]
    pub fn kings(&self) -> Bitboard {
        Bitboard::from_square(self.our_king) | Bitboard::from_square(self.their_king)
    }

    #[inline]
    pub fn our_king(&self) -> Square {
        self.our_king
    }

    #[inline]
    pub fn their_king(&self) -> Square {
        self.their_king
    }

    /// 真の黒番なら真
    #[inline]
    pub fn flipped(&self) -> bool {
        self.flipped
    }
}

impl Default for Board {
    fn default() -> Board {
        Board::new()
    }
}

impl std::fmt::Debug for Board {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Board({:?})", self.fen())
    }
}
