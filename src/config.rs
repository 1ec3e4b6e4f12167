use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::ai::SearchMode;
use crate::error::{BoardError, ConfigError};
use crate::game::{Board, COLS, ROWS};

/// Search defaults used by the command-line front end.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SearchConfig {
    /// Search depth in plies.
    pub depth: u32,
    pub mode: SearchMode,
}

impl Default for SearchConfig {
    fn default() -> Self {
        SearchConfig {
            depth: 4,
            mode: SearchMode::Minimax,
        }
    }
}

/// Board dimensions for new games.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    pub width: usize,
    pub height: usize,
}

impl Default for BoardConfig {
    fn default() -> Self {
        BoardConfig {
            width: COLS,
            height: ROWS,
        }
    }
}

impl BoardConfig {
    /// An empty board with the configured dimensions.
    pub fn empty_board(&self) -> Result<Board, BoardError> {
        Board::with_size(self.width, self.height)
    }
}

/// Top-level application configuration, loadable from TOML.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub search: SearchConfig,
    pub board: BoardConfig,
}

impl AppConfig {
    /// Load configuration from a TOML file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::FileRead {
            path: path.to_path_buf(),
            source: e,
        })?;
        let config: AppConfig = toml::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a TOML file, falling back to defaults if the file
    /// does not exist.
    pub fn load_or_default(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            Self::load(path)
        } else {
            warn!(path = %path.display(), "config file not found, using defaults");
            Ok(Self::default())
        }
    }

    /// Validate configuration values.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.search.depth == 0 {
            return Err(ConfigError::Validation(
                "search.depth must be >= 1".into(),
            ));
        }
        if let SearchMode::Expectimax { noise } = self.search.mode {
            if !(noise.intended > 0.0 && noise.intended <= 1.0) {
                return Err(ConfigError::Validation(
                    "search.mode.noise.intended must be in (0, 1]".into(),
                ));
            }
        }
        if self.board.width < 4 {
            return Err(ConfigError::Validation(
                "board.width must be >= 4".into(),
            ));
        }
        if self.board.height < 4 {
            return Err(ConfigError::Validation(
                "board.height must be >= 4".into(),
            ));
        }

        Ok(())
    }

    /// Generate a TOML string with all default values (useful for creating
    /// example config files).
    pub fn default_toml() -> String {
        toml::to_string_pretty(&AppConfig::default()).expect("default config serializes")
    }
}
