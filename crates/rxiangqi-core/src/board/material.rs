//! 詰み材料の判定

use super::Board;

/// 駒不足の度合い
#[derive(Clone, Copy, PartialEq, Eq)]
enum DrawLevel {
    /// 駒不足ではない
    None,
    /// 無条件で駒不足
    Direct,
    /// 1手詰みが存在しない場合に限り駒不足
    Mate,
}

impl Board {
    /// どちらかの側に詰ませるだけの駒が残っているか
    ///
    /// 車・馬・兵が1枚でもあれば常に真。残りが砲・士・象だけの場合、
    /// 列挙された駒不足形に該当すれば偽（引き分け扱い）。境界形では
    /// 1手先の全合法手を調べ、詰みに至る手が無いことまで確認する。
    pub fn has_mating_material(&self) -> bool {
        if self.pawns.count() != 0 || self.rooks.count() != 0 || self.knights.count() != 0 {
            return true;
        }

        let level = self.draw_level();
        match level {
            DrawLevel::None => true,
            DrawLevel::Direct => false,
            DrawLevel::Mate => {
                for m in self.generate_legal_moves() {
                    let mut after = self.clone();
                    after.apply_move(m);
                    after.mirror();
                    if after.generate_legal_moves().is_empty() {
                        return true;
                    }
                }
                false
            }
        }
    }

    fn draw_level(&self) -> DrawLevel {
        // 盤上に砲が無い
        if self.cannons.count() == 0 {
            return DrawLevel::Direct;
        }

        // 砲が1枚
        if self.cannons.count() == 1 {
            // 砲を持つ側に士が残っていないこと
            let (cannon_side, other_side) = if (self.our_pieces & self.cannons).is_empty() {
                (self.their_pieces, self.our_pieces)
            } else {
                (self.our_pieces, self.their_pieces)
            };
            if (self.advisors & cannon_side).is_empty() {
                let defender_advisors = (self.advisors & other_side).count();
                // 相手にも士が無い
                if defender_advisors == 0 {
                    return DrawLevel::Direct;
                }
                // 相手に士が1枚
                if defender_advisors == 1 {
                    return if (self.bishops & cannon_side).is_empty() {
                        DrawLevel::Direct
                    } else {
                        DrawLevel::Mate
                    };
                }
                // 相手に士が2枚
                if (self.bishops & cannon_side).is_empty() {
                    return DrawLevel::Mate;
                }
            }
        }

        // 両者が砲1枚ずつで士が無い
        if (self.cannons & self.our_pieces).count() == 1
            && (self.cannons & self.their_pieces).count() == 1
            && self.advisors.count() == 0
        {
            return if self.bishops.count() == 0 { DrawLevel::Direct } else { DrawLevel::Mate };
        }

        DrawLevel::None
    }
}
