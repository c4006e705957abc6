//! 長捉（chase）関係の検出
//!
//! ルール裁定（長捉の千日手判定）用に、手番側の各駒が「追いかけて
//! いる」相手駒のidビットマップ（16bit）を作る。
//!
//! 捉と数えない攻撃:
//! - 王への攻撃（王手は別カウント）と、渡河済みの兵への攻撃
//!   （恒常的な脅威であり反復で稼げるものではない）
//! - 攻撃側より強い駒への攻撃は、攻撃の指し手自体が合法なら常に捉
//!   （馬・砲→車、士・象→車・馬・砲）
//! - それ以外の駒への攻撃は、実際に取ったあと合法な取り返しが
//!   存在しないときだけ捉（取り返しの合法性は相手玉の安全で判定）
//! - 同種駒同士の相互利きは除外。ただし相手が釘付けで取り返せない
//!   場合（または馬の脚が塞がり逆向きに跳べない場合）は捉

use crate::bitboard::{Bitboard, magic};
use crate::types::{Move, PieceType, Square};

use super::Board;

/// 駒種ごとの利き（長捉判定で使う駒のみ）
fn attacks_by_type(pt: PieceType, sq: Square, occupied: Bitboard) -> Bitboard {
    match pt {
        PieceType::Rook => magic::rook_attacks(sq, occupied),
        PieceType::Advisor => magic::advisor_attacks(sq),
        PieceType::Cannon => magic::cannon_attacks(sq, occupied),
        PieceType::Knight => magic::knight_attacks(sq, occupied),
        PieceType::Bishop => magic::bishop_attacks(sq, occupied),
        PieceType::Pawn => magic::pawn_attacks(sq),
        PieceType::King => magic::king_attacks(sq),
    }
}

impl Board {
    /// 攻撃対象の升を駒idビットに変換する
    pub(crate) fn make_chase(&self, to: Square) -> u16 {
        let to = if self.flipped { to.flip() } else { to };
        1u16 << self.id_board[to.index()]
    }

    /// 手番側が追いかけている相手駒のidビットマップ
    pub fn us_chased(&self) -> u16 {
        let mut chase = 0u16;
        let occupied = self.occupied();

        // 王と兵は合法に追い続けられるため攻撃側には含めない
        let attackers = [
            (PieceType::Rook, self.rooks),
            (PieceType::Advisor, self.advisors),
            (PieceType::Cannon, self.cannons),
            (PieceType::Knight, self.knights),
            (PieceType::Bishop, self.bishops),
        ];

        for (piece_type, attacker) in attackers {
            for from in attacker & self.our_pieces {
                let mut attacks = attacks_by_type(piece_type, from, occupied) & self.their_pieces;

                // 王への攻撃と渡河済みの兵への攻撃は捉に数えない
                attacks -= self.kings() | (self.pawns & crate::bitboard::masks::HALF[1]);

                // 攻撃側より強い駒への攻撃
                let candidates = match piece_type {
                    PieceType::Knight | PieceType::Cannon => attacks & self.rooks,
                    PieceType::Advisor | PieceType::Bishop => {
                        attacks & (self.rooks | self.knights | self.cannons)
                    }
                    _ => Bitboard::EMPTY,
                };
                attacks -= candidates;
                for to in candidates {
                    if self.is_legal_move(Move::new(from, to)) {
                        chase |= self.make_chase(to);
                    }
                }

                // 取り返しが利かない可能性のある駒への攻撃
                for to in attacks {
                    let m = Move::new(from, to);
                    if !self.is_legal_move(m) {
                        continue;
                    }

                    let mut after = self.clone();
                    after.apply_move(m);
                    let mut true_chase = true;
                    for s in after.recaptures_to(to) {
                        if after.is_legal_move_for::<false>(Move::new(s, to)) {
                            true_chase = false;
                            break;
                        }
                    }
                    if !true_chase {
                        continue;
                    }

                    if attacker.contains(to) {
                        // 同種駒の相互利きは除外。ただし取り返しが
                        // 非合法（釘付け）か、馬の脚が塞がれて
                        // 逆向きに跳べない場合は捉
                        if (piece_type == PieceType::Knight
                            && !magic::knight_attacks(to, occupied).contains(from))
                            || !self.is_legal_move_for::<false>(Move::new(to, from))
                        {
                            chase |= self.make_chase(to);
                        }
                    } else {
                        chase |= self.make_chase(to);
                    }
                }
            }
        }

        chase
    }

    /// 相手側が追いかけている手番側駒のidビットマップ
    pub fn them_chased(&self) -> u16 {
        let mut board = self.clone();
        board.mirror();
        board.us_chased()
    }
}
