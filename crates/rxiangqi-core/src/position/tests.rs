//! 局面履歴のテスト
//!
//! 千日手の計数とルール裁定のシナリオは、実際の指し手列に対する
//! 固定の期待結果で検証する。

use super::{Position, PositionHistory};
use crate::board::Board;
use crate::types::GameResult;

/// FENから履歴を作り、指し手列を順に追記する
fn history_after(fen: &str, rule50_ply: i32, game_ply: i32, moves: &[&str]) -> PositionHistory {
    let board = Board::from_fen(fen).unwrap();
    let mut history = PositionHistory::new();
    history.reset(board, rule50_ply, game_ply);
    for m in moves {
        let parsed = history.last().board().parse_move(m).unwrap();
        history.append(parsed);
    }
    history
}

#[test]
fn test_set_fen_get_fen() {
    let source_fens = [
        "rnbakabnr/9/1c5c1/p1p1p1p1p/9/9/P1P1P1P1P/1C5C1/9/RNBAKABNR w - - 0 1",
        "r1ba1a3/4kn3/2n1b4/pNp1p1p1p/4c4/6P2/P1P2R2P/1CcC5/9/2BAKAB2 w - - 1 1",
        "1cbak4/9/n2a5/2p1p3p/5cp2/2n2N3/6PCP/3AB4/2C6/3A1K1N1 w - - 0 1",
        "5a3/3k5/3aR4/9/5r3/5n3/9/3A1A3/5K3/2BC2B2 w - - 2 30",
        "CRN1k1b2/3ca4/4ba3/9/2nr5/9/9/4B4/4A4/4KA3 w - - 1 8",
        "R1N1k1b2/9/3aba3/9/2nr5/2B6/9/4B4/4A4/4KA3 w - - 0 10",
        "C1nNk4/9/9/9/9/9/n1pp5/B3C4/9/3A1K3 w - - 0 1",
        "4ka3/4a4/9/9/4N4/p8/9/4C3c/7n1/2BK5 w - - 0 1",
    ];
    for fen in source_fens {
        let position = Position::from_fen(fen).unwrap();
        assert_eq!(position.to_fen(), fen);
    }
}

#[test]
fn test_compute_last_move_repetitions_once() {
    let history = history_after("3k5/9/9/6c2/9/9/9/6R2/9/5K3 b", 2, 30, &[
        "g6h6", "g2h2", "h6g6", "h2g2",
    ]);
    assert_eq!(history.last().repetitions(), 1);
    assert_eq!(history.last().cycle_length(), 4);
}

#[test]
fn test_compute_last_move_repetitions_twice() {
    let history = history_after("3k5/9/9/6c2/9/9/9/6R2/9/5K3 b", 2, 30, &[
        "g6h6", "g2h2", "h6g6", "h2g2", "g6h6", "g2h2", "h6g6", "h2g2",
    ]);
    assert_eq!(history.last().repetitions(), 2);
}

#[test]
fn test_did_repeat_since_last_zeroing_move_current() {
    let history = history_after("3k5/9/9/6rC1/9/9/9/6R2/9/5K3 b", 2, 30, &[
        "g6h6", "g2h2", "h6g6", "h2g2", "g6h6",
    ]);
    assert!(history.did_repeat_since_last_zeroing_move());
}

#[test]
fn test_did_repeat_since_last_zeroing_move_before() {
    let history = history_after("3k5/9/9/6rC1/9/9/9/5R3/9/5K3 b", 2, 30, &[
        "g6h6", "f2h2", "h6g6", "h2g2", "g6h6", "g2h2",
    ]);
    assert!(history.did_repeat_since_last_zeroing_move());
}

#[test]
fn test_did_repeat_since_last_zeroing_move_older() {
    let history = history_after("3k5/9/9/6rC1/9/9/9/5R3/9/5K3 b", 2, 30, &[
        "g6b6", "f2b2", "b6h6", "b2h2", "h6g6", "h2g2", "g6h6", "g2h2",
    ]);
    assert!(history.did_repeat_since_last_zeroing_move());
}

#[test]
fn test_did_repeat_since_last_zeroing_move_before_zero() {
    // 繰り返しのあとに捕獲が入ると、それ以前の繰り返しは数えない
    let history = history_after("3k5/9/9/6rC1/9/9/9/6R2/9/5K3 b", 2, 30, &[
        "g6f6", "g2f2", "f6g6", "f2g2", "g6h6", "g2h2",
    ]);
    assert!(!history.did_repeat_since_last_zeroing_move());
}

#[test]
fn test_did_repeat_since_last_zeroing_move_never_repeated() {
    let history = history_after("3k5/9/9/6rC1/9/9/9/6R2/9/5K3 b", 2, 30, &["g6c6", "g2f2"]);
    assert!(!history.did_repeat_since_last_zeroing_move());
}

#[test]
fn test_rule_judge_white_chase() {
    // 白の車が黒の砲を追い続ける: 白の負け
    let history = history_after("3k5/9/9/6c2/9/9/9/6R2/9/5K3 b", 2, 30, &[
        "g6h6", "g2h2", "h6g6", "h2g2",
    ]);
    assert_eq!(history.rule_judge(), GameResult::BlackWon);
}

#[test]
fn test_rule_judge_black_chase() {
    // 黒の車が白の砲を追い続ける: 黒の負け
    let history = history_after("3k5/9/7r1/9/9/9/9/6C2/9/5K3 b", 2, 30, &[
        "h7g7", "g2h2", "g7h7", "h2g2",
    ]);
    assert_eq!(history.rule_judge(), GameResult::WhiteWon);

    // 実戦形: 黒の車が白の砲を追う
    let history = history_after(
        "1rbakabnr/9/2n6/p1p3p1p/c8/4C4/P1P1P1PcP/1C2B1N2/3N5/R2AKABR1 w",
        2,
        30,
        &["a0c0", "a5c5", "c0a0", "c5a5"],
    );
    assert_eq!(history.rule_judge(), GameResult::BlackWon);
}

#[test]
fn test_rule_judge_white_check() {
    // 白の長将: 白の負け
    let history = history_after("3k5/9/9/9/9/9/9/3R5/9/5K3 b", 2, 30, &[
        "d9e9", "d2e2", "e9d9", "e2d2",
    ]);
    assert_eq!(history.rule_judge(), GameResult::BlackWon);
}

#[test]
fn test_rule_judge_black_check() {
    // 黒の長将: 黒の負け
    let history = history_after("3k5/9/4r4/9/9/9/9/9/9/5K3 b", 2, 30, &[
        "e7f7", "f0e0", "f7e7", "e0f0",
    ]);
    assert_eq!(history.rule_judge(), GameResult::WhiteWon);
}

#[test]
fn test_rule_judge_draw() {
    // 双方が追い合う対称形: 引き分け
    let history = history_after("3k5/9/6r2/9/9/9/9/9/6R2/5K3 b", 2, 30, &[
        "g7h7", "g1h1", "h7g7", "h1g1",
    ]);
    assert_eq!(history.rule_judge(), GameResult::Draw);

    // 王手でも捉でもない反復: 引き分け
    let history = history_after("4c4/3k5/4b3b/9/9/2B4N1/4p4/3A5/2p1A4/5K3 w", 2, 30, &[
        "h4g2", "e3f3", "g2h4", "f3e3",
    ]);
    assert_eq!(history.rule_judge(), GameResult::Draw);

    // 取り返せる駒への攻撃は捉ではない
    let history = history_after("3k5/9/9/9/9/9/9/9/1r2ARn2/4K4 b", 2, 30, &[
        "b1b0", "e1d0", "b0b1", "d0e1",
    ]);
    assert_eq!(history.rule_judge(), GameResult::Draw);
}

#[test]
fn test_compute_game_result_undecided_at_start() {
    let mut history = PositionHistory::new();
    history.reset(Board::startpos(), 0, 0);
    assert_eq!(history.compute_game_result(), GameResult::Undecided);
}

#[test]
fn test_compute_game_result_no_legal_moves() {
    // 手番側に合法手が無ければ負け（ステイルメイトの引き分けは無い）
    let mut history = PositionHistory::new();
    history.reset(Board::from_fen("3k5/4R4/9/9/9/9/9/9/9/5K3 b - - 0 1").unwrap(), 0, 0);
    assert_eq!(history.compute_game_result(), GameResult::WhiteWon);

    let mut history = PositionHistory::new();
    history.reset(Board::from_fen("5k3/9/9/9/9/9/9/9/4r4/3K5 w - - 0 1").unwrap(), 0, 0);
    assert_eq!(history.compute_game_result(), GameResult::BlackWon);
}

#[test]
fn test_compute_game_result_insufficient_material() {
    let mut history = PositionHistory::new();
    history.reset(Board::from_fen("3k5/9/9/9/9/9/9/9/9/5K3 w - - 0 1").unwrap(), 0, 0);
    assert_eq!(history.compute_game_result(), GameResult::Draw);
}

#[test]
fn test_compute_game_result_no_progress_cap() {
    let mut history = PositionHistory::new();
    history.reset(Board::startpos(), 120, 200);
    assert_eq!(history.compute_game_result(), GameResult::Draw);
}

#[test]
fn test_compute_game_result_applies_rule_judge() {
    // 白の長捉を2周して繰り返し2回: 終局判定でも黒勝ち
    let history = history_after("3k5/9/9/6c2/9/9/9/6R2/9/5K3 b", 2, 30, &[
        "g6h6", "g2h2", "h6g6", "h2g2", "g6h6", "g2h2", "h6g6", "h2g2",
    ]);
    assert_eq!(history.last().repetitions(), 2);
    assert_eq!(history.compute_game_result(), GameResult::BlackWon);
}

#[test]
fn test_pop_rolls_back() {
    let mut history = history_after("3k5/9/9/6c2/9/9/9/6R2/9/5K3 b", 2, 30, &[
        "g6h6", "g2h2", "h6g6", "h2g2",
    ]);
    assert_eq!(history.len(), 5);
    assert_eq!(history.last().repetitions(), 1);
    history.pop();
    assert_eq!(history.len(), 4);
    assert_eq!(history.last().repetitions(), 0);

    // ロールバック後に同じ手を追記すると同じ結果になる
    let m = history.last().board().parse_move("h2g2").unwrap();
    history.append(m);
    assert_eq!(history.last().repetitions(), 1);
}

#[test]
fn test_advance_updates_clocks() {
    let mut history = PositionHistory::new();
    history.reset(Board::startpos(), 0, 0);
    let m = history.last().board().parse_move("b0c2").unwrap();
    history.append(m);
    assert_eq!(history.last().rule50_ply(), 1);
    assert_eq!(history.last().game_ply(), 1);
    assert!(history.is_black_to_move());

    // 捕獲で時計が戻る
    let m = history.last().board().parse_move("h7h0").unwrap();
    history.append(m);
    assert_eq!(history.last().rule50_ply(), 0);
    assert_eq!(history.last().game_ply(), 2);
    assert!(!history.is_black_to_move());
}

#[test]
fn test_position_hash_incorporates_repetitions() {
    let history = history_after("3k5/9/9/6c2/9/9/9/6R2/9/5K3 b", 2, 30, &[
        "g6h6", "g2h2", "h6g6", "h2g2",
    ]);
    // 盤面は開始時と同一だが繰り返し回数が異なるため局面ハッシュは変わる
    let first = history.position_at(0);
    let last = history.last();
    assert_eq!(first.board().hash(), last.board().hash());
    assert_ne!(first.hash(), last.hash());
}

#[test]
fn test_hash_last_window() {
    let history = history_after("3k5/9/9/6c2/9/9/9/6R2/9/5K3 b", 2, 30, &[
        "g6h6", "g2h2", "h6g6", "h2g2",
    ]);
    // 窓の大きさが違えばハッシュも異なり、同じ入力なら再現する
    assert_eq!(history.hash_last(2), history.hash_last(2));
    assert_ne!(history.hash_last(1), history.hash_last(2));
}

#[test]
fn test_starting_and_position_at() {
    let history = history_after("3k5/9/9/6c2/9/9/9/6R2/9/5K3 b", 2, 30, &["g6h6"]);
    assert_eq!(history.starting().game_ply(), 30);
    assert_eq!(history.position_at(0).game_ply(), 30);
    assert_eq!(history.position_at(1).game_ply(), 31);
    assert!(!history.is_empty());
}
