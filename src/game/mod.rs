//! Core Connect Four game logic: the gravity-drop board, its text and grid
//! forms, and the two players.

mod board;
mod player;

pub use board::{Board, Cell, GameOutcome, COLS, ROWS};
pub use player::Player;
