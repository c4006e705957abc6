//! 局面と局面履歴
//!
//! `Position` は1手分の局面: 手番側視点の盤面に、no-progress手数時計・
//! 総手数・千日手カウンタ・連続王手カウンタを加えたもの。
//! `PositionHistory` は1本の手順を表す追記列で、追加時に千日手の回数と
//! 周期を差分計算し、終局判定と長将・長捉の裁定を提供する。

#[cfg(test)]
mod tests;

use crate::board::{Board, FenError};
use crate::types::{GameResult, Move};
use crate::util::{hash_append, hash_cat};

/// no-progress手数時計の上限（半手）。達したら引き分け。
const NO_PROGRESS_CAP: i32 = 120;

/// 連続王手がこの回数を超えると、王手中でも手数時計を進める
/// （長将で時計を止め続ける悪用の防止）。
const CHECK_STREAK_LIMIT: i32 = 10;

/// 1手分の局面
///
/// 構築後は不変。千日手フィールドだけは所有する履歴が追加直後に
/// 一度だけ設定する。
#[derive(Clone, PartialEq, Eq)]
pub struct Position {
    /// 手番側視点の盤面
    us_board: Board,
    /// 捕獲からの半手数（手数時計）
    rule50_ply: i32,
    /// 開始局面からの半手数
    ply_count: i32,
    /// この盤面が履歴中で繰り返された回数
    repetitions: i32,
    /// 直前の繰り返しまでの半手距離
    cycle_length: i32,
    /// 手番側が与え続けている連続王手数
    us_check: i32,
    /// 相手側が与え続けている連続王手数
    them_check: i32,
}

impl Position {
    /// 盤面と手数から初期局面を作る
    pub fn new(board: Board, rule50_ply: i32, game_ply: i32) -> Position {
        Position {
            us_board: board,
            rule50_ply,
            ply_count: game_ply,
            repetitions: 0,
            cycle_length: 0,
            us_check: 0,
            them_check: 0,
        }
    }

    /// FEN文字列から初期局面を作る
    pub fn from_fen(fen: &str) -> Result<Position, FenError> {
        let mut board = Board::new();
        let (rule50_ply, total_moves) = board.set_from_fen(fen)?;
        let game_ply = 2 * total_moves - if board.flipped() { 1 } else { 2 };
        Ok(Position::new(board, rule50_ply, game_ply))
    }

    /// 親局面に1手適用した局面を作る
    ///
    /// 盤面を鏡映して新しい手番側の視点に揃え、手数時計を更新する。
    /// 時計は、王手でないか、王手側の連続王手が上限以内なら進む。
    /// 自側の連続王手が上限を超えていた場合は時計の代わりに
    /// カウンタを進める。捕獲では時計と両カウンタを0に戻す。
    pub fn advance(&self, m: Move) -> Position {
        let mut pos = Position {
            us_board: self.us_board.clone(),
            rule50_ply: self.rule50_ply,
            ply_count: self.ply_count + 1,
            repetitions: 0,
            cycle_length: 0,
            us_check: self.them_check,
            them_check: self.us_check,
        };
        let is_zeroing = pos.us_board.apply_move(m);
        pos.us_board.mirror();

        let gives_check = pos.us_board.is_under_check();
        if gives_check {
            pos.them_check += 1;
        }
        if !gives_check || pos.them_check <= CHECK_STREAK_LIMIT {
            if pos.us_check > CHECK_STREAK_LIMIT && self.us_board.is_under_check() {
                pos.us_check += 1;
            } else {
                pos.rule50_ply += 1;
            }
        }
        if is_zeroing {
            pos.rule50_ply = 0;
            pos.us_check = 0;
            pos.them_check = 0;
        }
        pos
    }

    /// 手番側視点の盤面
    #[inline]
    pub fn board(&self) -> &Board {
        &self.us_board
    }

    /// 捕獲からの半手数
    #[inline]
    pub fn rule50_ply(&self) -> i32 {
        self.rule50_ply
    }

    /// 開始局面からの半手数
    #[inline]
    pub fn game_ply(&self) -> i32 {
        self.ply_count
    }

    /// この盤面の履歴中の繰り返し回数
    #[inline]
    pub fn repetitions(&self) -> i32 {
        self.repetitions
    }

    /// 直前の繰り返しまでの半手距離（繰り返していなければ0）
    #[inline]
    pub fn cycle_length(&self) -> i32 {
        self.cycle_length
    }

    /// 真の黒番か
    #[inline]
    pub fn is_black_to_move(&self) -> bool {
        self.us_board.flipped()
    }

    /// 局面ハッシュ（盤面ハッシュ＋繰り返し回数）
    pub fn hash(&self) -> u64 {
        hash_cat(&[self.us_board.hash(), self.repetitions as u64])
    }

    /// 完全なFEN文字列を組み立てる
    pub fn to_fen(&self) -> String {
        let black_to_move = self.is_black_to_move();
        let total_moves = (self.ply_count + if black_to_move { 1 } else { 2 }) / 2;
        format!("{} - - {} {}", self.us_board.fen(), self.rule50_ply, total_moves)
    }

    fn set_repetitions(&mut self, repetitions: i32, cycle_length: i32) {
        self.repetitions = repetitions;
        self.cycle_length = cycle_length;
    }
}

impl std::fmt::Debug for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Position({:?})", self.to_fen())
    }
}

/// 局面履歴（追記とロールバックのできる1本の手順）
///
/// 不変条件: positions[i+1] は positions[i] に1手適用したもの。
#[derive(Clone, Default)]
pub struct PositionHistory {
    positions: Vec<Position>,
}

impl PositionHistory {
    /// 空の履歴
    pub fn new() -> PositionHistory {
        PositionHistory { positions: Vec::new() }
    }

    /// 初期盤面から履歴を作り直す
    pub fn reset(&mut self, board: Board, rule50_ply: i32, game_ply: i32) {
        self.positions.clear();
        self.positions.push(Position::new(board, rule50_ply, game_ply));
    }

    /// 既存の局面から履歴を作り直す
    pub fn reset_to_position(&mut self, position: Position) {
        self.positions.clear();
        self.positions.push(position);
    }

    /// 開始局面
    pub fn starting(&self) -> &Position {
        self.positions.first().expect("PositionHistory is empty")
    }

    /// 最新の局面
    pub fn last(&self) -> &Position {
        self.positions.last().expect("PositionHistory is empty")
    }

    /// 局面数
    pub fn len(&self) -> usize {
        self.positions.len()
    }

    /// 履歴が空か
    pub fn is_empty(&self) -> bool {
        self.positions.is_empty()
    }

    /// idx番目の局面（0が開始局面）
    pub fn position_at(&self, idx: usize) -> &Position {
        &self.positions[idx]
    }

    /// 全局面のスライス
    pub fn positions(&self) -> &[Position] {
        &self.positions
    }

    /// 最新局面に1手適用して追記する
    ///
    /// 追記した局面の千日手回数と周期を、同パリティの履歴を2半手ずつ
    /// 遡って計算する。
    pub fn append(&mut self, m: Move) {
        let next = self.last().advance(m);
        self.positions.push(next);
        let (repetitions, cycle_length) = self.compute_last_move_repetitions();
        self.positions
            .last_mut()
            .expect("PositionHistory is empty")
            .set_repetitions(repetitions, cycle_length);
    }

    /// 最新の局面を取り除く（遡り解析のロールバック用）
    pub fn pop(&mut self) {
        self.positions.pop();
    }

    /// 最新局面の繰り返し回数と周期を計算する
    ///
    /// 視点が半手ごとに入れ替わるため2半手ずつ遡る。時計が戻っている
    /// 局面を跨いだ繰り返しはあり得ないため、そこで打ち切る。
    fn compute_last_move_repetitions(&self) -> (i32, i32) {
        let last = self.last();
        if last.rule50_ply < 4 {
            return (0, 0);
        }

        let mut idx = self.positions.len() as isize - 5;
        while idx >= 0 {
            let pos = &self.positions[idx as usize];
            if pos.us_board == last.us_board {
                let cycle_length = (self.positions.len() - 1) as i32 - idx as i32;
                return (1 + pos.repetitions, cycle_length);
            }
            if pos.rule50_ply < 2 {
                return (0, 0);
            }
            idx -= 2;
        }
        (0, 0)
    }

    /// 最後の捕獲以降に同一局面の繰り返しがあったか
    pub fn did_repeat_since_last_zeroing_move(&self) -> bool {
        for pos in self.positions.iter().rev() {
            if pos.repetitions > 0 {
                return true;
            }
            if pos.rule50_ply == 0 {
                return false;
            }
        }
        false
    }

    /// 末尾n局面のハッシュ（手数時計を含む）
    pub fn hash_last(&self, positions: usize) -> u64 {
        let mut hash = positions as u64;
        let mut remaining = positions;
        for pos in self.positions.iter().rev() {
            if remaining == 0 {
                break;
            }
            remaining -= 1;
            hash = hash_append(hash, pos.hash());
        }
        hash_append(hash, self.last().rule50_ply as u64)
    }

    /// 真の黒番か
    pub fn is_black_to_move(&self) -> bool {
        self.last().is_black_to_move()
    }

    /// 終局判定
    ///
    /// 合法手が無ければ手番側の負け（この変種にステイルメイトの
    /// 引き分けは無い）。繰り返しが2回に達していればルール裁定。
    /// 駒不足と手数時計の上限は引き分け。
    pub fn compute_game_result(&self) -> GameResult {
        let board = self.last().board();
        if board.generate_legal_moves().is_empty() {
            return if self.is_black_to_move() { GameResult::WhiteWon } else { GameResult::BlackWon };
        }

        if self.last().repetitions() >= 2 {
            let result = self.rule_judge();
            return if self.is_black_to_move() { result } else { -result };
        }
        if !board.has_mating_material() {
            return GameResult::Draw;
        }
        if self.last().rule50_ply() >= NO_PROGRESS_CAP {
            return GameResult::Draw;
        }

        GameResult::Undecided
    }

    /// 長将・長捉の裁定
    ///
    /// 最新局面が繰り返しであることを前提に、同パリティの履歴を2半手
    /// ずつ遡る。両側の「王手し続けているか」のフラグと「追い続けて
    /// いる駒」のビットマップを持ち、途切れた時点でそれぞれ落とす。
    /// 繰り返し周期の起点（同一盤面で繰り返し回数0の局面）に達したら、
    /// 王手し続けた側の負け（双方なら引き分け）、次いで追い続けた側の
    /// 負け（双方または皆無なら引き分け）と裁定する。
    ///
    /// 戻り値は最新局面の手番側を黒と見たときの結果。呼び出し側
    /// （`compute_game_result`）が白番なら反転する。
    ///
    /// # Panics
    ///
    /// 履歴を遡り切っても周期の起点が見つからない場合。繰り返しが
    /// 報告された局面でしか呼ばれない前提が破れており、呼び出し側の
    /// バグを示す。
    pub fn rule_judge(&self) -> GameResult {
        let n = self.positions.len();
        let last = &self.positions[n - 1];
        if last.rule50_ply < 4 {
            return GameResult::Undecided;
        }

        let mut check_them = last.us_board.is_under_check();
        let mut check_us = self.positions[n - 2].us_board.is_under_check();
        let mut chase_them =
            last.us_board.them_chased() & !self.positions[n - 2].us_board.us_chased();
        let mut chase_us = self.positions[n - 2].us_board.them_chased()
            & !self.positions[n - 3].us_board.us_chased();

        let mut idx = n as isize - 3;
        while idx >= 0 {
            let pos = &self.positions[idx as usize];
            if pos.us_board.is_under_check() {
                chase_them = 0;
                chase_us = 0;
            } else {
                check_them = false;
            }

            if pos.us_board == last.us_board && pos.repetitions == 0 {
                return if check_them || check_us {
                    if !check_us {
                        GameResult::BlackWon
                    } else if !check_them {
                        GameResult::WhiteWon
                    } else {
                        GameResult::Draw
                    }
                } else if chase_them != 0 || chase_us != 0 {
                    if chase_us == 0 {
                        GameResult::BlackWon
                    } else if chase_them == 0 {
                        GameResult::WhiteWon
                    } else {
                        GameResult::Draw
                    }
                } else {
                    GameResult::Draw
                };
            }

            if idx >= 1 {
                let prev = &self.positions[idx as usize - 1];
                if prev.us_board.is_under_check() {
                    chase_them = 0;
                    chase_us = 0;
                } else {
                    check_us = false;
                }
                chase_them &= pos.us_board.them_chased() & !prev.us_board.us_chased();
                if idx >= 2 {
                    chase_us &= prev.us_board.them_chased()
                        & !self.positions[idx as usize - 2].us_board.us_chased();
                }
            }
            idx -= 2;
        }

        panic!("rule judge: repetition was reported but its cycle start was not found");
    }
}
