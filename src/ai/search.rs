//! Depth-bounded adversarial search.
//!
//! Three strategies share one recursive shape: alternating `maximize` /
//! `minimize` procedures over board copies, with leaves scored for the root
//! player. Children are generated in ascending column order and compared with
//! strict inequality, so the first move seen wins ties.
//!
//! Work grows as O(width^depth). There is no node budget or time limit here;
//! callers bound latency by choosing the depth.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::BoardError;
use crate::game::{Board, Player};

use super::heuristic::{Heuristic, PositionalHeuristic};
use super::trace::{NodeId, SearchTrace};

/// Column returned by [`decide`] when the board has no valid move.
pub const NO_MOVE: i32 = -1;

/// Execution noise for expectimax: a move lands in the intended column with
/// probability `intended`, and the rest of the mass is split evenly over the
/// valid neighboring columns.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ExecutionNoise {
    pub intended: f64,
}

impl Default for ExecutionNoise {
    fn default() -> Self {
        ExecutionNoise { intended: 0.6 }
    }
}

impl ExecutionNoise {
    pub fn new(intended: f64) -> Self {
        ExecutionNoise { intended }
    }

    /// Columns a move aimed at `col` can land in, with their probabilities.
    /// The intended column comes first, then the left and right neighbors
    /// that are currently valid. Probabilities always sum to 1.
    pub fn outcomes(&self, board: &Board, col: usize) -> Vec<(usize, f64)> {
        let neighbors: Vec<usize> = [col.checked_sub(1), Some(col + 1)]
            .into_iter()
            .flatten()
            .filter(|&n| board.is_valid_move(n))
            .collect();

        if neighbors.is_empty() {
            return vec![(col, 1.0)];
        }

        let share = (1.0 - self.intended) / neighbors.len() as f64;
        std::iter::once((col, self.intended))
            .chain(neighbors.into_iter().map(|n| (n, share)))
            .collect()
    }
}

/// Search strategy.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(tag = "algorithm", rename_all = "lowercase")]
pub enum SearchMode {
    /// Full minimax, every branch explored.
    #[default]
    Minimax,
    /// Minimax with alpha-beta cutoffs. Same root value as `Minimax`.
    #[serde(alias = "alpha_beta")]
    AlphaBeta,
    /// Minimax over noisy move execution.
    Expectimax {
        #[serde(default)]
        noise: ExecutionNoise,
    },
}

impl SearchMode {
    pub fn expectimax() -> Self {
        SearchMode::Expectimax {
            noise: ExecutionNoise::default(),
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            SearchMode::Minimax => "minimax",
            SearchMode::AlphaBeta => "alphabeta",
            SearchMode::Expectimax { .. } => "expectimax",
        }
    }
}

impl fmt::Display for SearchMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for SearchMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "minimax" | "plain" => Ok(SearchMode::Minimax),
            "alphabeta" | "alpha_beta" | "alpha-beta" => Ok(SearchMode::AlphaBeta),
            "expectimax" => Ok(SearchMode::expectimax()),
            other => Err(format!(
                "unknown search mode '{other}' (expected 'minimax', 'alphabeta', or 'expectimax')"
            )),
        }
    }
}

/// Outcome of one search.
#[derive(Debug, Clone)]
pub struct SearchResult {
    /// Chosen column, `None` only when the board has no valid move.
    pub best_move: Option<usize>,
    /// Root utility from the perspective of the player to move.
    pub score: f64,
    /// Positions visited, including leaves.
    pub nodes: u64,
    /// Explored tree, present for traced searches.
    pub trace: Option<SearchTrace>,
}

/// Depth-bounded searcher.
///
/// Worst-case work is O(width^depth) positions.
#[derive(Debug, Clone)]
pub struct Searcher<H: Heuristic = PositionalHeuristic> {
    depth: u32,
    mode: SearchMode,
    heuristic: H,
}

impl Searcher {
    pub fn new(depth: u32, mode: SearchMode) -> Self {
        Searcher {
            depth,
            mode,
            heuristic: PositionalHeuristic,
        }
    }
}

impl<H: Heuristic> Searcher<H> {
    pub fn with_heuristic(depth: u32, mode: SearchMode, heuristic: H) -> Self {
        Searcher {
            depth,
            mode,
            heuristic,
        }
    }

    pub fn depth(&self) -> u32 {
        self.depth
    }

    pub fn mode(&self) -> SearchMode {
        self.mode
    }

    pub fn search(&self, board: &Board) -> SearchResult {
        self.run(board, false)
    }

    /// Same search, also recording every explored node.
    pub fn search_traced(&self, board: &Board) -> SearchResult {
        self.run(board, true)
    }

    fn run(&self, board: &Board, record: bool) -> SearchResult {
        let mut ctx = SearchContext {
            heuristic: &self.heuristic,
            root_player: board.current_player(),
            max_depth: self.depth,
            prune: self.mode == SearchMode::AlphaBeta,
            nodes: 0,
            trace: record.then(SearchTrace::new),
        };

        let line = match self.mode {
            SearchMode::Minimax | SearchMode::AlphaBeta => {
                ctx.maximize(board, None, 0, f64::NEG_INFINITY, f64::INFINITY)
            }
            SearchMode::Expectimax { noise } => ctx.expected_max(board, None, 0, &noise),
        };

        debug!(
            depth = self.depth,
            mode = %self.mode,
            best_move = ?line.column,
            score = line.score,
            nodes = ctx.nodes,
            "search finished"
        );

        SearchResult {
            best_move: line.column,
            score: line.score,
            nodes: ctx.nodes,
            trace: ctx.trace,
        }
    }
}

/// Resolved value of a node.
struct Line {
    column: Option<usize>,
    score: f64,
    node: Option<NodeId>,
}

struct SearchContext<'a, H: Heuristic> {
    heuristic: &'a H,
    root_player: Player,
    max_depth: u32,
    prune: bool,
    nodes: u64,
    trace: Option<SearchTrace>,
}

impl<H: Heuristic> SearchContext<'_, H> {
    fn enter(&mut self, board: &Board, played: Option<usize>, depth: u32) -> Option<NodeId> {
        self.nodes += 1;
        self.trace
            .as_mut()
            .map(|trace| trace.open(board, played, depth))
    }

    /// The root is always expanded when it has a valid move. Below the root,
    /// a decided game is terminal as well as a full board.
    fn is_leaf(&self, board: &Board, depth: u32) -> bool {
        depth >= self.max_depth || board.is_full() || (depth > 0 && board.winner().is_some())
    }

    fn leaf(&mut self, board: &Board, node: Option<NodeId>) -> Line {
        let score = f64::from(self.heuristic.evaluate(board, self.root_player));
        self.finish(node, None, score, None)
    }

    fn finish(
        &mut self,
        node: Option<NodeId>,
        column: Option<usize>,
        score: f64,
        best_child: Option<NodeId>,
    ) -> Line {
        if let (Some(trace), Some(id)) = (self.trace.as_mut(), node) {
            trace.resolve(id, column, score, best_child);
        }
        Line {
            column,
            score,
            node,
        }
    }

    fn link(&mut self, parent: Option<NodeId>, child: Option<NodeId>, probability: Option<f64>) {
        if let (Some(trace), Some(parent), Some(child)) = (self.trace.as_mut(), parent, child) {
            trace.attach(parent, child, probability);
        }
    }

    fn maximize(
        &mut self,
        board: &Board,
        played: Option<usize>,
        depth: u32,
        mut alpha: f64,
        beta: f64,
    ) -> Line {
        let node = self.enter(board, played, depth);
        if self.is_leaf(board, depth) {
            return self.leaf(board, node);
        }

        let mut best_col = None;
        let mut best_score = f64::NEG_INFINITY;
        let mut best_node = None;

        for col in board.valid_moves() {
            let mut child = board.clone();
            if child.drop_piece(col).is_err() {
                continue;
            }
            let reply = self.minimize(&child, Some(col), depth + 1, alpha, beta);
            self.link(node, reply.node, None);

            if reply.score > best_score {
                best_score = reply.score;
                best_col = Some(col);
                best_node = reply.node;

                if self.prune {
                    if best_score >= beta {
                        break;
                    }
                    if best_score > alpha {
                        alpha = best_score;
                    }
                }
            }
        }

        self.finish(node, best_col, best_score, best_node)
    }

    fn minimize(
        &mut self,
        board: &Board,
        played: Option<usize>,
        depth: u32,
        alpha: f64,
        mut beta: f64,
    ) -> Line {
        let node = self.enter(board, played, depth);
        if self.is_leaf(board, depth) {
            return self.leaf(board, node);
        }

        let mut best_col = None;
        let mut best_score = f64::INFINITY;
        let mut best_node = None;

        for col in board.valid_moves() {
            let mut child = board.clone();
            if child.drop_piece(col).is_err() {
                continue;
            }
            let reply = self.maximize(&child, Some(col), depth + 1, alpha, beta);
            self.link(node, reply.node, None);

            if reply.score < best_score {
                best_score = reply.score;
                best_col = Some(col);
                best_node = reply.node;

                if self.prune {
                    if best_score <= alpha {
                        break;
                    }
                    if best_score < beta {
                        beta = best_score;
                    }
                }
            }
        }

        self.finish(node, best_col, best_score, best_node)
    }

    fn expected_max(
        &mut self,
        board: &Board,
        played: Option<usize>,
        depth: u32,
        noise: &ExecutionNoise,
    ) -> Line {
        let node = self.enter(board, played, depth);
        if self.is_leaf(board, depth) {
            return self.leaf(board, node);
        }

        let mut best_col = None;
        let mut best_score = f64::NEG_INFINITY;
        let mut best_node = None;

        for col in board.valid_moves() {
            let (expected, intended) = self.expected_utility(board, col, depth, node, noise, true);
            if expected > best_score {
                best_score = expected;
                best_col = Some(col);
                best_node = intended;
            }
        }

        self.finish(node, best_col, best_score, best_node)
    }

    fn expected_min(
        &mut self,
        board: &Board,
        played: Option<usize>,
        depth: u32,
        noise: &ExecutionNoise,
    ) -> Line {
        let node = self.enter(board, played, depth);
        if self.is_leaf(board, depth) {
            return self.leaf(board, node);
        }

        let mut best_col = None;
        let mut best_score = f64::INFINITY;
        let mut best_node = None;

        for col in board.valid_moves() {
            let (expected, intended) = self.expected_utility(board, col, depth, node, noise, false);
            if expected < best_score {
                best_score = expected;
                best_col = Some(col);
                best_node = intended;
            }
        }

        self.finish(node, best_col, best_score, best_node)
    }

    /// Probability-weighted value of aiming at `col`. Each landing column is
    /// searched one ply deeper by the opposite procedure. Also returns the
    /// trace node of the intended landing.
    fn expected_utility(
        &mut self,
        board: &Board,
        col: usize,
        depth: u32,
        parent: Option<NodeId>,
        noise: &ExecutionNoise,
        maximizing: bool,
    ) -> (f64, Option<NodeId>) {
        let mut expected = 0.0;
        let mut intended = None;

        for (landing, probability) in noise.outcomes(board, col) {
            let mut child = board.clone();
            if child.drop_piece(landing).is_err() {
                continue;
            }
            let reply = if maximizing {
                self.expected_min(&child, Some(landing), depth + 1, noise)
            } else {
                self.expected_max(&child, Some(landing), depth + 1, noise)
            };
            self.link(parent, reply.node, Some(probability));

            if landing == col {
                intended = reply.node;
            }
            expected += probability * reply.score;
        }

        (expected, intended)
    }
}

/// Choose a column for the player to move, or [`NO_MOVE`] when the board has
/// no valid move. A depth of 0 is searched as depth 1.
pub fn decide(board: &Board, depth: u32, mode: SearchMode) -> i32 {
    let result = Searcher::new(depth.max(1), mode).search(board);
    match result.best_move {
        Some(col) => col as i32,
        None => NO_MOVE,
    }
}

/// [`decide`] on an integer matrix (0 empty, 1 and 2 for the players, top row
/// first) with an explicit player number.
pub fn decide_grid(
    grid: &[Vec<u8>],
    current_player: u8,
    depth: u32,
    mode: SearchMode,
) -> Result<i32, BoardError> {
    let board = Board::from_grid(grid, current_player)?;
    Ok(decide(&board, depth, mode))
}
