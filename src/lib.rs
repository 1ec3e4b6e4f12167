//! # Connect Four Search
//!
//! Move selection for Connect Four by depth-bounded game-tree search.
//! Three interchangeable strategies (plain minimax, alpha-beta, expectimax
//! over noisy move execution) share a fixed-weight positional heuristic and
//! can record the explored tree for diagnostics.
//!
//! ## Modules
//!
//! - [`game`] — Board, players, text and grid forms
//! - [`ai`] — Heuristic, search engine, search trace, agents
//! - [`config`] — TOML configuration loading and validation
//! - [`error`] — Structured error types
//!
//! ```
//! use connect_four_search::ai::{decide, SearchMode};
//! use connect_four_search::game::Board;
//!
//! let board: Board = "\
//! . . . . . . .
//! . . . . . . .
//! . . . . . . .
//! . . . . . . .
//! . . . . . . .
//! X X X . O O .
//! 0 1 2 3 4 5 6".parse().unwrap();
//! assert_eq!(decide(&board, 2, SearchMode::AlphaBeta), 3);
//! ```

pub mod ai;
pub mod config;
pub mod error;
pub mod game;
