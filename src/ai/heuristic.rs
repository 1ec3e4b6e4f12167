use crate::game::{Board, Cell, Player};

/// Score of a resolved win. A resolved loss is its negation.
pub const WIN_SCORE: i32 = 10_000;

/// Positional scores are clamped inside this bound so that only resolved
/// outcomes reach `±WIN_SCORE`.
const HEURISTIC_LIMIT: i32 = WIN_SCORE - 1;

const OWN_THREE: i32 = 500;
const OPPONENT_THREE: i32 = 750;
const TWO_ADJACENT: i32 = 20;
const TWO_SPLIT: i32 = 10;
const CENTER: i32 = 40;
const NEAR_CENTER: i32 = 20;

/// Trait for evaluating a board position from a player's perspective.
pub trait Heuristic {
    fn evaluate(&self, board: &Board, player: Player) -> i32;
}

/// Default heuristic: resolved outcomes first, then a fixed-weight sum of
/// open threes, open twos and central occupancy.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalHeuristic;

impl PositionalHeuristic {
    fn score_window(window: &[Cell; 4], own: Cell, opp: Cell) -> i32 {
        let own_count = window.iter().filter(|&&c| c == own).count();
        let opp_count = window.iter().filter(|&&c| c == opp).count();
        let empty = 4 - own_count - opp_count;

        match (own_count, opp_count, empty) {
            (3, 0, 1) => OWN_THREE,
            (0, 3, 1) => -OPPONENT_THREE,
            (2, 0, 2) => Self::score_two(window, own),
            (0, 2, 2) => -Self::score_two(window, opp),
            _ => 0,
        }
    }

    /// Two pieces next to each other in the window are worth more than two
    /// pieces with a gap between them.
    fn score_two(window: &[Cell; 4], cell: Cell) -> i32 {
        let adjacent = window.windows(2).any(|pair| pair[0] == cell && pair[1] == cell);
        if adjacent {
            TWO_ADJACENT
        } else {
            TWO_SPLIT
        }
    }

    fn score_columns(board: &Board, own: Cell, opp: Cell) -> i32 {
        let center = board.width() / 2;
        let column_score = |col: usize, weight: i32| -> i32 {
            (0..board.height())
                .map(|row| match board.get(row, col) {
                    c if c == own => weight,
                    c if c == opp => -weight,
                    _ => 0,
                })
                .sum()
        };

        let mut score = column_score(center, CENTER);
        if center > 0 {
            score += column_score(center - 1, NEAR_CENTER);
        }
        if center + 1 < board.width() {
            score += column_score(center + 1, NEAR_CENTER);
        }
        score
    }
}

impl Heuristic for PositionalHeuristic {
    fn evaluate(&self, board: &Board, player: Player) -> i32 {
        if let Some(winner) = board.winner() {
            return if winner == player { WIN_SCORE } else { -WIN_SCORE };
        }
        if board.is_full() {
            return 0;
        }

        let own = player.to_cell();
        let opp = player.other().to_cell();

        let windows: i32 = board
            .windows()
            .map(|window| Self::score_window(&window, own, opp))
            .sum();

        (windows + Self::score_columns(board, own, opp)).clamp(-HEURISTIC_LIMIT, HEURISTIC_LIMIT)
    }
}

/// Evaluate a board from the perspective of the player to move.
pub fn evaluate(board: &Board) -> i32 {
    PositionalHeuristic.evaluate(board, board.current_player())
}
