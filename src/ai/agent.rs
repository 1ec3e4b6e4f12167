use crate::game::Board;

use super::search::{SearchMode, Searcher};

/// Anything that can pick a column for the player to move.
pub trait Agent {
    /// Select a column for the side to move, or `None` when no column is
    /// playable.
    fn select_action(&mut self, board: &Board) -> Option<usize>;

    /// Return the agent's display name.
    fn name(&self) -> &str;
}

/// Agent backed by the depth-bounded search engine.
pub struct SearchAgent {
    searcher: Searcher,
    name: String,
}

impl SearchAgent {
    pub fn new(depth: u32, mode: SearchMode) -> Self {
        SearchAgent {
            searcher: Searcher::new(depth.max(1), mode),
            name: format!("{mode} (depth {})", depth.max(1)),
        }
    }

    pub fn searcher(&self) -> &Searcher {
        &self.searcher
    }
}

impl Agent for SearchAgent {
    fn select_action(&mut self, board: &Board) -> Option<usize> {
        self.searcher.search(board).best_move
    }

    fn name(&self) -> &str {
        &self.name
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ai::RandomAgent;
    use crate::game::{GameOutcome, Player};

    fn play(red: &mut dyn Agent, yellow: &mut dyn Agent) -> Option<GameOutcome> {
        let mut board = Board::new();
        while !board.is_terminal() {
            let agent: &mut dyn Agent = match board.current_player() {
                Player::Red => &mut *red,
                Player::Yellow => &mut *yellow,
            };
            let col = agent.select_action(&board).expect("non-terminal board has a move");
            board.drop_piece(col).unwrap();
        }
        board.outcome()
    }

    #[test]
    fn selects_legal_action() {
        let mut agent = SearchAgent::new(3, SearchMode::AlphaBeta);
        let board = Board::new();
        let action = agent.select_action(&board).unwrap();
        assert!(board.valid_moves().contains(&action));
    }

    #[test]
    fn name_includes_mode_and_depth() {
        let agent = SearchAgent::new(4, SearchMode::AlphaBeta);
        assert_eq!(agent.name(), "alphabeta (depth 4)");
        assert_eq!(agent.searcher().depth(), 4);
    }

    #[test]
    fn full_game_vs_self_completes() {
        let mut red = SearchAgent::new(3, SearchMode::AlphaBeta);
        let mut yellow = SearchAgent::new(3, SearchMode::AlphaBeta);
        assert!(play(&mut red, &mut yellow).is_some());
    }

    #[test]
    fn beats_random_agent() {
        let games_per_color = 10;
        let mut search_wins = 0;

        for seed in 0..games_per_color {
            let mut search = SearchAgent::new(3, SearchMode::AlphaBeta);
            let mut random = RandomAgent::seeded(seed);
            if play(&mut search, &mut random) == Some(GameOutcome::Winner(Player::Red)) {
                search_wins += 1;
            }

            let mut search = SearchAgent::new(3, SearchMode::AlphaBeta);
            let mut random = RandomAgent::seeded(seed + 1000);
            if play(&mut random, &mut search) == Some(GameOutcome::Winner(Player::Yellow)) {
                search_wins += 1;
            }
        }

        let total = games_per_color * 2;
        assert!(
            search_wins * 10 >= total * 8,
            "search should beat random at least 80% of the time, won {search_wins}/{total}"
        );
    }
}
