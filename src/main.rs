use std::io::{self, BufRead, Read, Write};
use std::path::PathBuf;

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use tracing::{debug, info, Level};

use connect_four_search::ai::{Agent, RandomAgent, SearchAgent, SearchMode, Searcher, NO_MOVE};
use connect_four_search::config::AppConfig;
use connect_four_search::game::{Board, GameOutcome, Player};

/// Connect Four move selection by depth-bounded game-tree search.
#[derive(Parser)]
#[command(name = "connect-four", about = "Connect Four move selection by game-tree search")]
struct Cli {
    /// Path to TOML configuration file
    #[arg(long, global = true, default_value = "connect_four.toml")]
    config: PathBuf,

    /// Log search details
    #[arg(long, short, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Choose a column for a board given in the text form
    Decide {
        /// Board file; read from stdin when omitted
        #[arg(long)]
        board: Option<PathBuf>,

        /// Override search depth
        #[arg(long)]
        depth: Option<u32>,

        /// Override search mode: minimax, alphabeta or expectimax
        #[arg(long)]
        mode: Option<SearchMode>,

        /// Write the explored search tree as nested JSON
        #[arg(long)]
        trace: Option<PathBuf>,
    },
    /// Play a console game against the engine
    Play {
        /// Override search depth
        #[arg(long)]
        depth: Option<u32>,

        /// Override search mode: minimax, alphabeta or expectimax
        #[arg(long)]
        mode: Option<SearchMode>,

        /// Which side the human plays
        #[arg(long, value_enum, default_value = "red")]
        human: Seat,

        /// Computer opponent
        #[arg(long, value_enum, default_value = "search")]
        opponent: Opponent,
    },
}

#[derive(Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Seat {
    Red,
    Yellow,
    None,
}

impl Seat {
    fn controls(self, player: Player) -> bool {
        matches!(
            (self, player),
            (Seat::Red, Player::Red) | (Seat::Yellow, Player::Yellow)
        )
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum Opponent {
    Search,
    Random,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::INFO })
        .init();

    let mut config = AppConfig::load_or_default(&cli.config)
        .with_context(|| format!("loading config from {}", cli.config.display()))?;

    match cli.command {
        Command::Decide {
            board,
            depth,
            mode,
            trace,
        } => {
            apply_overrides(&mut config, depth, mode)?;
            run_decide(&config, board, trace)
        }
        Command::Play {
            depth,
            mode,
            human,
            opponent,
        } => {
            apply_overrides(&mut config, depth, mode)?;
            run_play(&config, human, opponent)
        }
    }
}

fn apply_overrides(config: &mut AppConfig, depth: Option<u32>, mode: Option<SearchMode>) -> Result<()> {
    if let Some(depth) = depth {
        config.search.depth = depth;
    }
    if let Some(mode) = mode {
        config.search.mode = mode;
    }
    config.validate().context("invalid search settings")?;
    Ok(())
}

fn run_decide(config: &AppConfig, board: Option<PathBuf>, trace: Option<PathBuf>) -> Result<()> {
    let text = match &board {
        Some(path) => std::fs::read_to_string(path)
            .with_context(|| format!("reading board from {}", path.display()))?,
        None => {
            let mut text = String::new();
            io::stdin()
                .read_to_string(&mut text)
                .context("reading board from stdin")?;
            text
        }
    };
    let board: Board = text.parse().context("parsing board")?;
    debug!(player = board.current_player().name(), "board loaded\n{board}");

    let searcher = Searcher::new(config.search.depth, config.search.mode);
    let result = if trace.is_some() {
        searcher.search_traced(&board)
    } else {
        searcher.search(&board)
    };
    info!(
        mode = %config.search.mode,
        depth = config.search.depth,
        best_move = ?result.best_move,
        score = result.score,
        nodes = result.nodes,
        "decision made"
    );

    if let (Some(path), Some(tree)) = (&trace, &result.trace) {
        let json = serde_json::to_string_pretty(&tree.to_nested_json())
            .context("serializing search trace")?;
        std::fs::write(path, json)
            .with_context(|| format!("writing trace to {}", path.display()))?;
        info!(path = %path.display(), nodes = tree.len(), "trace written");
    }

    let column = result.best_move.map_or(NO_MOVE, |col| col as i32);
    println!("{column}");
    Ok(())
}

fn run_play(config: &AppConfig, human: Seat, opponent: Opponent) -> Result<()> {
    let mut board = config
        .board
        .empty_board()
        .context("creating board")?;

    let engine = || -> Box<dyn Agent> {
        Box::new(SearchAgent::new(config.search.depth, config.search.mode))
    };
    let computer: Box<dyn Agent> = match opponent {
        Opponent::Search => engine(),
        Opponent::Random => Box::new(RandomAgent::new()),
    };
    // With no human seat the engine plays Red against the chosen opponent
    let (mut red, mut yellow): (Option<Box<dyn Agent>>, Option<Box<dyn Agent>>) = match human {
        Seat::Red => (None, Some(computer)),
        Seat::Yellow => (Some(computer), None),
        Seat::None => (Some(engine()), Some(computer)),
    };

    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    loop {
        println!("\n{board}\n");

        if let Some(outcome) = board.outcome() {
            match outcome {
                GameOutcome::Winner(player) => println!("{} wins!", player.name()),
                GameOutcome::Draw => println!("It's a draw!"),
            }
            return Ok(());
        }

        let player = board.current_player();
        let column = if human.controls(player) {
            match prompt_column(&board, &mut lines)? {
                Some(col) => col,
                None => {
                    info!("input closed, leaving game");
                    return Ok(());
                }
            }
        } else {
            let agent = match player {
                Player::Red => red.as_mut(),
                Player::Yellow => yellow.as_mut(),
            };
            let Some(agent) = agent else {
                bail!("no agent seated for {}", player.name());
            };
            let Some(col) = agent.select_action(&board) else {
                bail!("{} found no move on a non-terminal board", agent.name());
            };
            println!("{} ({}) plays column {col}", player.name(), agent.name());
            col
        };

        board
            .drop_piece(column)
            .with_context(|| format!("playing column {column}"))?;
    }
}

/// Ask for a column until a valid one is entered. `None` when input ends.
fn prompt_column(
    board: &Board,
    lines: &mut impl Iterator<Item = io::Result<String>>,
) -> Result<Option<usize>> {
    loop {
        print!("Enter your move (0-{}): ", board.width() - 1);
        io::stdout().flush().context("flushing prompt")?;

        let Some(line) = lines.next() else {
            return Ok(None);
        };
        let line = line.context("reading move")?;

        match line.trim().parse::<usize>() {
            Ok(col) if board.is_valid_move(col) => return Ok(Some(col)),
            Ok(_) => println!("Invalid move. Try again."),
            Err(_) => println!("Enter a number between 0 and {}.", board.width() - 1),
        }
    }
}
