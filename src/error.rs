use std::path::PathBuf;

/// Errors returned when a piece cannot be placed. The board is left untouched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MoveError {
    #[error("column {column} is outside the board (width {width})")]
    InvalidColumn { column: usize, width: usize },

    #[error("column {0} is full")]
    ColumnFull(usize),
}

/// Errors that can occur when building a board from text or from a raw grid.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BoardError {
    #[error("board has no rows")]
    Empty,

    #[error("board dimensions must be positive (got {width}x{height})")]
    ZeroSize { width: usize, height: usize },

    #[error("invalid symbol '{symbol}' at row {row}, column {col}")]
    InvalidSymbol { symbol: String, row: usize, col: usize },

    #[error("invalid cell value {value} at row {row}, column {col}")]
    InvalidCellValue { value: u8, row: usize, col: usize },

    #[error("row {row} has {found} cells, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },

    #[error("column header {found:?} does not match board width {width}")]
    BadHeader { found: String, width: usize },

    #[error("piece at row {row}, column {col} has an empty cell below it")]
    FloatingPiece { row: usize, col: usize },

    #[error("invalid player number {0} (expected 1 or 2)")]
    InvalidPlayer(u8),
}

/// Errors that can occur when loading configuration.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    FileRead {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse TOML: {0}")]
    TomlParse(#[from] toml::de::Error),

    #[error("config validation error: {0}")]
    Validation(String),
}
