//! 手生成と合法性判定

use crate::bitboard::{Bitboard, magic};
use crate::types::{Move, MoveList};

use super::Board;

impl Board {
    /// 手番側の擬似合法手を生成する（自玉の王手放置は除外しない）
    ///
    /// 生成順は駒の升番号の昇順、同一駒では行き先の升番号の昇順。
    /// `generate_legal_moves` はこの順序を保ったままフィルタする。
    pub fn generate_pseudolegal_moves(&self) -> MoveList {
        let mut result = MoveList::new();
        let occupied = self.occupied();
        for source in self.our_pieces {
            let targets = if self.rooks.contains(source) {
                magic::rook_attacks(source, occupied) - self.our_pieces
            } else if self.advisors.contains(source) {
                magic::advisor_attacks(source) - self.our_pieces
            } else if self.cannons.contains(source) {
                // 移動は空升のみ、捕獲は台1枚越しのみ
                (magic::rook_attacks(source, occupied) - occupied)
                    | (magic::cannon_attacks(source, occupied) & self.their_pieces)
            } else if self.pawns.contains(source) {
                magic::pawn_attacks(source) - self.our_pieces
            } else if self.knights.contains(source) {
                magic::knight_attacks(source, occupied) - self.our_pieces
            } else if self.bishops.contains(source) {
                magic::bishop_attacks(source, occupied) - self.our_pieces
            } else if source == self.our_king {
                magic::king_attacks(source) - self.our_pieces
            } else {
                Bitboard::EMPTY
            };
            for destination in targets {
                result.push(Move::new(source, destination));
            }
        }
        result
    }

    /// 擬似合法手が合法か（適用後に自玉が取られないか）を判定する
    #[inline]
    pub fn is_legal_move(&self, m: Move) -> bool {
        self.is_legal_move_for::<true>(m)
    }

    /// 合法性判定の本体
    ///
    /// `OURS` が偽のとき、相手側の手番として判定する（長捉判定で
    /// 相手の取り返しの合法性を調べるために使う）。
    /// 盤面は変更せず、移動後の占有を仮定して利きを再計算する。
    pub(crate) fn is_legal_move_for<const OURS: bool>(&self, m: Move) -> bool {
        let mut occupied = self.occupied();
        occupied.reset(m.from());
        occupied.set(m.to());

        let (our_king, their_king) =
            if OURS { (self.our_king, self.their_king) } else { (self.their_king, self.our_king) };

        // 将帥対面（flying general）: 両王の間が空の縦列は不可
        let ksq = if our_king == m.from() { m.to() } else { our_king };
        if magic::rook_attacks(ksq, occupied).contains(their_king) {
            return false;
        }

        // 王自身が動いた場合は移動先が攻撃されていないこと
        if ksq != our_king {
            return self.checkers_to::<OURS>(ksq, occupied).is_empty();
        }

        // 王以外が動いた場合は移動後の占有で王の升を再評価する。
        // 移動先の升は攻撃側から除外する（自玉の前へ利きを遮りに
        // 入った駒を王手駒として数えないため）。
        let mut checkers = self.checkers_to::<OURS>(ksq, occupied);
        checkers.reset(m.to());
        checkers.is_empty()
    }

    /// 合法手を生成する（擬似合法手の順序を保存したフィルタ）
    pub fn generate_legal_moves(&self) -> MoveList {
        let mut moves = self.generate_pseudolegal_moves();
        moves.retain(|m| self.is_legal_move(*m));
        moves
    }
}
