mod agent;
pub mod heuristic;
mod random;
pub mod search;
pub mod trace;

pub use agent::{Agent, SearchAgent};
pub use heuristic::{evaluate, Heuristic, PositionalHeuristic, WIN_SCORE};
pub use random::RandomAgent;
pub use search::{decide, decide_grid, ExecutionNoise, SearchMode, SearchResult, Searcher, NO_MOVE};
pub use trace::{NodeId, SearchTrace, TraceNode};
