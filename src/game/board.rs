use std::fmt;
use std::str::FromStr;

use crate::error::{BoardError, MoveError};

use super::Player;

pub const ROWS: usize = 6;
pub const COLS: usize = 7;

/// Line directions as (row delta, column delta): horizontal, vertical,
/// down-right diagonal, down-left diagonal. Row 0 is the top of the board.
static DIRECTIONS: [(isize, isize); 4] = [(0, 1), (1, 0), (1, 1), (1, -1)];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cell {
    Empty,
    Red,
    Yellow,
}

impl Cell {
    /// Symbol used by the text form.
    pub fn symbol(self) -> char {
        match self {
            Cell::Empty => '.',
            Cell::Red => 'X',
            Cell::Yellow => 'O',
        }
    }

    pub fn from_symbol(symbol: &str) -> Option<Cell> {
        match symbol {
            "." => Some(Cell::Empty),
            "X" => Some(Cell::Red),
            "O" => Some(Cell::Yellow),
            _ => None,
        }
    }

    /// Value used by the integer grid form (0 empty, 1 Red, 2 Yellow).
    pub fn value(self) -> u8 {
        match self {
            Cell::Empty => 0,
            Cell::Red => 1,
            Cell::Yellow => 2,
        }
    }

    pub fn from_value(value: u8) -> Option<Cell> {
        match value {
            0 => Some(Cell::Empty),
            1 => Some(Cell::Red),
            2 => Some(Cell::Yellow),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameOutcome {
    Winner(Player),
    Draw,
}

/// A gravity-drop grid together with the side to move.
///
/// Pieces only enter from the top, so every column is bottom-packed. Cloning
/// produces a fully independent board; the search engine clones before every
/// trial move.
#[derive(Debug, Clone)]
pub struct Board {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
    current_player: Player,
    last_move: Option<(usize, usize)>,
}

impl Board {
    /// Create a new empty 7x6 board with Red to move
    pub fn new() -> Self {
        Board {
            width: COLS,
            height: ROWS,
            cells: vec![Cell::Empty; COLS * ROWS],
            current_player: Player::Red,
            last_move: None,
        }
    }

    /// Create an empty board of arbitrary size.
    pub fn with_size(width: usize, height: usize) -> Result<Self, BoardError> {
        if width == 0 || height == 0 {
            return Err(BoardError::ZeroSize { width, height });
        }
        Ok(Board {
            width,
            height,
            cells: vec![Cell::Empty; width * height],
            current_player: Player::Red,
            last_move: None,
        })
    }

    /// Build a board from an integer matrix (0 empty, 1 Red, 2 Yellow), top
    /// row first, with an explicit side to move.
    pub fn from_grid(rows: &[Vec<u8>], current_player: u8) -> Result<Self, BoardError> {
        let current_player =
            Player::from_number(current_player).ok_or(BoardError::InvalidPlayer(current_player))?;
        let width = rows.first().map(Vec::len).ok_or(BoardError::Empty)?;
        let mut board = Board::with_size(width, rows.len())?;

        for (row, values) in rows.iter().enumerate() {
            if values.len() != width {
                return Err(BoardError::RaggedRow {
                    row,
                    expected: width,
                    found: values.len(),
                });
            }
            for (col, &value) in values.iter().enumerate() {
                let cell =
                    Cell::from_value(value).ok_or(BoardError::InvalidCellValue { value, row, col })?;
                board.set(row, col, cell);
            }
        }

        board.check_gravity()?;
        board.current_player = current_player;
        Ok(board)
    }

    /// Integer matrix form, inverse of [`Board::from_grid`].
    pub fn to_grid(&self) -> Vec<Vec<u8>> {
        (0..self.height)
            .map(|row| (0..self.width).map(|col| self.get(row, col).value()).collect())
            .collect()
    }

    /// Empty the board and give the move back to Red.
    pub fn reset(&mut self) {
        self.cells.fill(Cell::Empty);
        self.current_player = Player::Red;
        self.last_move = None;
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Get the cell at a specific position
    /// Row 0 is the top, row `height - 1` is the bottom
    pub fn get(&self, row: usize, col: usize) -> Cell {
        self.cells[row * self.width + col]
    }

    fn set(&mut self, row: usize, col: usize, cell: Cell) {
        self.cells[row * self.width + col] = cell;
    }

    pub fn current_player(&self) -> Player {
        self.current_player
    }

    /// Position (row, column) of the most recent successful placement.
    pub fn last_move(&self) -> Option<(usize, usize)> {
        self.last_move
    }

    /// Total number of pieces on the board.
    pub fn piece_count(&self) -> usize {
        self.cells.iter().filter(|&&c| c != Cell::Empty).count()
    }

    /// Check if a column is full. Out-of-range columns count as full.
    pub fn is_column_full(&self, col: usize) -> bool {
        if col >= self.width {
            return true;
        }
        self.get(0, col) != Cell::Empty
    }

    pub fn is_valid_move(&self, col: usize) -> bool {
        !self.is_column_full(col)
    }

    /// Valid columns in ascending order. Search tie-breaks depend on this
    /// ordering.
    pub fn valid_moves(&self) -> Vec<usize> {
        (0..self.width).filter(|&col| self.is_valid_move(col)).collect()
    }

    /// Drop the current player's piece in a column and pass the turn.
    /// Returns the row where it landed.
    pub fn drop_piece(&mut self, col: usize) -> Result<usize, MoveError> {
        if col >= self.width {
            return Err(MoveError::InvalidColumn {
                column: col,
                width: self.width,
            });
        }

        if self.is_column_full(col) {
            return Err(MoveError::ColumnFull(col));
        }

        // Find the lowest empty row in this column
        let row = (0..self.height)
            .rev()
            .find(|&row| self.get(row, col) == Cell::Empty)
            .ok_or(MoveError::ColumnFull(col))?;

        self.set(row, col, self.current_player.to_cell());
        self.last_move = Some((row, col));
        self.current_player = self.current_player.other();
        Ok(row)
    }

    /// Check if the board is completely full
    pub fn is_full(&self) -> bool {
        self.cells.iter().all(|&c| c != Cell::Empty)
    }

    /// Every 4-cell window on the board, each enumerated exactly once per
    /// direction. Cells are ordered along the line direction.
    pub fn windows(&self) -> impl Iterator<Item = [Cell; 4]> + '_ {
        DIRECTIONS.iter().flat_map(move |&(dr, dc)| {
            (0..self.height).flat_map(move |row| {
                (0..self.width).filter_map(move |col| self.window(row, col, dr, dc))
            })
        })
    }

    fn window(&self, row: usize, col: usize, dr: isize, dc: isize) -> Option<[Cell; 4]> {
        let end_row = row as isize + 3 * dr;
        let end_col = col as isize + 3 * dc;
        if end_row < 0
            || end_row >= self.height as isize
            || end_col < 0
            || end_col >= self.width as isize
        {
            return None;
        }

        let mut cells = [Cell::Empty; 4];
        for (i, cell) in cells.iter_mut().enumerate() {
            let r = (row as isize + i as isize * dr) as usize;
            let c = (col as isize + i as isize * dc) as usize;
            *cell = self.get(r, c);
        }
        Some(cells)
    }

    /// Number of distinct 4-cell windows fully owned by `player`. A line of
    /// five counts as two windows.
    pub fn count_fours(&self, player: Player) -> usize {
        let cell = player.to_cell();
        self.windows()
            .filter(|window| window.iter().all(|&c| c == cell))
            .count()
    }

    /// The player who has connected four, if any.
    ///
    /// Owning at least one four-window wins. When both players own fours,
    /// which only happens on hand-built positions, the larger count wins and
    /// equal counts leave no winner.
    pub fn winner(&self) -> Option<Player> {
        let red = self.count_fours(Player::Red);
        let yellow = self.count_fours(Player::Yellow);
        match (red > 0, yellow > 0) {
            (true, false) => Some(Player::Red),
            (false, true) => Some(Player::Yellow),
            (true, true) if red > yellow => Some(Player::Red),
            (true, true) if yellow > red => Some(Player::Yellow),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<GameOutcome> {
        match self.winner() {
            Some(player) => Some(GameOutcome::Winner(player)),
            None if self.is_full() => Some(GameOutcome::Draw),
            None => None,
        }
    }

    /// Check if the game is over (someone won or the board is full)
    pub fn is_terminal(&self) -> bool {
        self.outcome().is_some()
    }

    fn check_gravity(&self) -> Result<(), BoardError> {
        for col in 0..self.width {
            for row in 0..self.height - 1 {
                if self.get(row, col) != Cell::Empty && self.get(row + 1, col) == Cell::Empty {
                    return Err(BoardError::FloatingPiece { row, col });
                }
            }
        }
        Ok(())
    }

    fn column_header(&self) -> String {
        (0..self.width)
            .map(|col| col.to_string())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

impl Default for Board {
    fn default() -> Self {
        Self::new()
    }
}

/// Boards compare by dimensions, grid and side to move. `last_move` is not
/// part of the text form and is ignored.
impl PartialEq for Board {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && self.current_player == other.current_player
            && self.cells == other.cells
    }
}

impl Eq for Board {}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..self.height {
            let line: Vec<String> = (0..self.width)
                .map(|col| self.get(row, col).symbol().to_string())
                .collect();
            writeln!(f, "{}", line.join(" "))?;
        }
        write!(f, "{}", self.column_header())
    }
}

impl FromStr for Board {
    type Err = BoardError;

    /// Parse the text form written by `Display`. The side to move is inferred
    /// from piece parity: an even count means Red moves.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let lines: Vec<&str> = s
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect();
        let (header, rows) = lines.split_last().ok_or(BoardError::Empty)?;
        let width = rows
            .first()
            .map(|line| line.split_whitespace().count())
            .ok_or(BoardError::Empty)?;
        let mut board = Board::with_size(width, rows.len())?;

        for (row, line) in rows.iter().enumerate() {
            let symbols: Vec<&str> = line.split_whitespace().collect();
            if symbols.len() != width {
                return Err(BoardError::RaggedRow {
                    row,
                    expected: width,
                    found: symbols.len(),
                });
            }
            for (col, symbol) in symbols.into_iter().enumerate() {
                let cell = Cell::from_symbol(symbol).ok_or_else(|| BoardError::InvalidSymbol {
                    symbol: symbol.to_string(),
                    row,
                    col,
                })?;
                board.set(row, col, cell);
            }
        }

        let expected_header = board.column_header();
        if header.split_whitespace().ne(expected_header.split(' ')) {
            return Err(BoardError::BadHeader {
                found: header.to_string(),
                width,
            });
        }

        board.check_gravity()?;
        board.current_player = if board.piece_count() % 2 == 0 {
            Player::Red
        } else {
            Player::Yellow
        };
        Ok(board)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn board_from_moves(moves: &[usize]) -> Board {
        let mut board = Board::new();
        for &col in moves {
            board.drop_piece(col).unwrap();
        }
        board
    }

    #[test]
    fn test_new_board_is_empty() {
        let board = Board::new();
        assert_eq!(board.width(), 7);
        assert_eq!(board.height(), 6);
        for row in 0..ROWS {
            for col in 0..COLS {
                assert_eq!(board.get(row, col), Cell::Empty);
            }
        }
        assert_eq!(board.current_player(), Player::Red);
        assert_eq!(board.last_move(), None);
    }

    #[test]
    fn test_with_size_rejects_zero() {
        assert_eq!(
            Board::with_size(0, 6),
            Err(BoardError::ZeroSize { width: 0, height: 6 })
        );
        let board = Board::with_size(5, 4).unwrap();
        assert_eq!(board.valid_moves(), vec![0, 1, 2, 3, 4]);
    }

    #[test]
    fn test_drop_piece() {
        let mut board = Board::new();

        // Drop first piece in column 3
        let row = board.drop_piece(3).unwrap();
        assert_eq!(row, 5); // Should land at bottom
        assert_eq!(board.get(5, 3), Cell::Red);
        assert_eq!(board.last_move(), Some((5, 3)));
        assert_eq!(board.current_player(), Player::Yellow);

        // Drop second piece in same column
        let row = board.drop_piece(3).unwrap();
        assert_eq!(row, 4); // Should land on top of first piece
        assert_eq!(board.get(4, 3), Cell::Yellow);
        assert_eq!(board.current_player(), Player::Red);
    }

    #[test]
    fn test_column_full() {
        let mut board = Board::new();

        // Fill column 0
        for _ in 0..ROWS {
            board.drop_piece(0).unwrap();
        }

        assert!(board.is_column_full(0));
        assert!(!board.valid_moves().contains(&0));
        let before = board.clone();
        assert_eq!(board.drop_piece(0), Err(MoveError::ColumnFull(0)));
        assert_eq!(board, before);
        assert_eq!(board.current_player(), before.current_player());
    }

    #[test]
    fn test_invalid_column() {
        let mut board = Board::new();
        assert_eq!(
            board.drop_piece(7),
            Err(MoveError::InvalidColumn { column: 7, width: 7 })
        );
        assert!(!board.is_valid_move(7));
        assert_eq!(board.piece_count(), 0);
        assert_eq!(board.current_player(), Player::Red);
    }

    #[test]
    fn test_valid_moves_ascending() {
        let mut board = board_from_moves(&[]);
        for _ in 0..ROWS {
            board.drop_piece(2).unwrap();
        }
        for _ in 0..ROWS {
            board.drop_piece(5).unwrap();
        }
        assert_eq!(board.valid_moves(), vec![0, 1, 3, 4, 6]);
    }

    #[test]
    fn test_full_board() {
        let mut board = Board::new();
        for col in 0..COLS {
            for _ in 0..ROWS {
                board.drop_piece(col).unwrap();
            }
        }
        assert!(board.is_full());
        assert!(board.valid_moves().is_empty());
    }

    #[test]
    fn test_clone_is_independent() {
        let mut board = board_from_moves(&[3, 3]);
        let copy = board.clone();
        board.drop_piece(4).unwrap();
        assert_eq!(copy.get(5, 4), Cell::Empty);
        assert_eq!(copy.current_player(), Player::Red);
        assert_eq!(copy.last_move(), Some((4, 3)));
    }

    #[test]
    fn test_horizontal_win() {
        // Red 0..4 on the bottom, Yellow stacked on top
        let board = board_from_moves(&[0, 0, 1, 1, 2, 2, 3]);
        assert_eq!(board.winner(), Some(Player::Red));
        assert_eq!(board.outcome(), Some(GameOutcome::Winner(Player::Red)));
        assert!(board.is_terminal());
    }

    #[test]
    fn test_vertical_win() {
        let board = board_from_moves(&[6, 3, 0, 3, 0, 3, 1, 3]);
        assert_eq!(board.winner(), Some(Player::Yellow));
    }

    #[test]
    fn test_diagonal_up_win() {
        // Create diagonal / pattern for Red
        let board = board_from_moves(&[0, 1, 1, 2, 2, 3, 2, 3, 3, 6, 3]);
        assert_eq!(board.get(2, 3), Cell::Red);
        assert_eq!(board.winner(), Some(Player::Red));
    }

    #[test]
    fn test_diagonal_down_win() {
        // Create diagonal \ pattern for Red
        let board = board_from_moves(&[6, 5, 5, 4, 4, 3, 4, 3, 3, 0, 3]);
        assert_eq!(board.winner(), Some(Player::Red));
    }

    #[test]
    fn test_no_win_with_three() {
        let board = board_from_moves(&[0, 0, 1, 1, 2]);
        assert_eq!(board.winner(), None);
        assert!(!board.is_terminal());
    }

    #[test]
    fn test_count_fours_counts_windows() {
        let mut grid = vec![vec![0u8; 7]; 6];
        grid[5] = vec![1, 1, 1, 1, 1, 0, 0];
        let board = Board::from_grid(&grid, 2).unwrap();
        assert_eq!(board.count_fours(Player::Red), 2);
        assert_eq!(board.count_fours(Player::Yellow), 0);
    }

    #[test]
    fn test_winner_when_both_have_fours() {
        let mut grid = vec![vec![0u8; 7]; 6];
        grid[5] = vec![1, 1, 1, 1, 1, 2, 2];
        grid[4] = vec![2, 2, 2, 2, 0, 0, 0];
        let board = Board::from_grid(&grid, 1).unwrap();
        assert_eq!(board.winner(), Some(Player::Red));

        grid[5] = vec![1, 1, 1, 1, 2, 2, 2];
        let board = Board::from_grid(&grid, 1).unwrap();
        assert_eq!(board.winner(), None);
    }

    #[test]
    fn test_draw_outcome() {
        let text = "X X O O X X O\n\
                    X X O O X X O\n\
                    O O X X O O X\n\
                    X X O O X X O\n\
                    O O X X O O X\n\
                    O O X X O O X\n\
                    0 1 2 3 4 5 6";
        let board: Board = text.parse().unwrap();
        assert!(board.is_full());
        assert_eq!(board.winner(), None);
        assert_eq!(board.outcome(), Some(GameOutcome::Draw));
    }

    #[test]
    fn test_display_format() {
        let board = board_from_moves(&[3, 4]);
        let text = board.to_string();
        let lines: Vec<&str> = text.lines().collect();
        assert_eq!(lines.len(), 7);
        assert_eq!(lines[0], ". . . . . . .");
        assert_eq!(lines[5], ". . . X O . .");
        assert_eq!(lines[6], "0 1 2 3 4 5 6");
    }

    #[test]
    fn test_text_roundtrip() {
        let board = board_from_moves(&[3, 3, 2, 4, 4, 1, 0, 6, 6, 6]);
        let parsed: Board = board.to_string().parse().unwrap();
        assert_eq!(parsed, board);
        assert_eq!(parsed.current_player(), board.current_player());
        assert_eq!(parsed.to_grid(), board.to_grid());

        let odd = board_from_moves(&[3]);
        let parsed: Board = odd.to_string().parse().unwrap();
        assert_eq!(parsed.current_player(), Player::Yellow);
    }

    #[test]
    fn test_parse_rejects_invalid_symbol() {
        let text = ". . .\n. Z .\n0 1 2";
        let err = text.parse::<Board>().unwrap_err();
        assert_eq!(
            err,
            BoardError::InvalidSymbol {
                symbol: "Z".to_string(),
                row: 1,
                col: 1
            }
        );
    }

    #[test]
    fn test_parse_rejects_malformed_layout() {
        assert_eq!("".parse::<Board>(), Err(BoardError::Empty));
        assert!(matches!(
            ". . .\n. .\n0 1 2".parse::<Board>(),
            Err(BoardError::RaggedRow { row: 1, .. })
        ));
        assert!(matches!(
            ". . .\nX . .\n0 1".parse::<Board>(),
            Err(BoardError::BadHeader { .. })
        ));
        assert_eq!(
            "X . .\n. . .\n0 1 2".parse::<Board>(),
            Err(BoardError::FloatingPiece { row: 0, col: 0 })
        );
    }

    #[test]
    fn test_from_grid_validation() {
        let grid = vec![vec![0u8; 7]; 6];
        assert_eq!(
            Board::from_grid(&grid, 3),
            Err(BoardError::InvalidPlayer(3))
        );
        assert_eq!(Board::from_grid(&[], 1), Err(BoardError::Empty));

        let mut bad = grid.clone();
        bad[5][2] = 7;
        assert_eq!(
            Board::from_grid(&bad, 1),
            Err(BoardError::InvalidCellValue {
                value: 7,
                row: 5,
                col: 2
            })
        );

        let board = Board::from_grid(&grid, 2).unwrap();
        assert_eq!(board.current_player(), Player::Yellow);
    }

    #[test]
    fn test_reset() {
        let mut board = board_from_moves(&[0, 1, 2]);
        board.reset();
        assert_eq!(board, Board::new());
        assert_eq!(board.last_move(), None);
    }

    #[test]
    fn test_equality_ignores_last_move() {
        let board = board_from_moves(&[1, 5]);
        let parsed: Board = board.to_string().parse().unwrap();
        assert_eq!(parsed.last_move(), None);
        assert_eq!(parsed, board);
    }
}
