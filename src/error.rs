//! Error types for the prediction board
//!
//! Domain operations return [`BoardError`] so the dashboard can decide how
//! loudly to report each failure. Application plumbing uses anyhow.

use std::path::PathBuf;

/// Result type alias for convenience
pub type Result<T> = anyhow::Result<T>;

/// How a failure is surfaced on the rendered dashboard
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    /// Halts the render; only the error message is shown
    Blocking,
    /// Dependent sections are skipped, the rest of the page renders
    Warning,
    /// Shown next to the control that triggered it
    Inline,
}

/// Custom error types for score loading and ranking
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum BoardError {
    #[error("Score file not found: {}", path.display())]
    FileNotFound { path: PathBuf },

    #[error("Failed to read score table: {message}")]
    MalformedTable { message: String },

    #[error("Malformed score for '{player}' in game '{game}': '{value}'")]
    MalformedScore {
        player: String,
        game: String,
        value: String,
    },

    #[error("Player listed more than once: {name}")]
    DuplicatePlayer { name: String },

    #[error("Player '{name}' has {actual} scores but the table has {expected} games")]
    ScoreCountMismatch {
        name: String,
        expected: usize,
        actual: usize,
    },

    #[error("Snapshot contains no players")]
    EmptySnapshot,

    #[error("Snapshot contains no game columns")]
    NoGameData,

    #[error("Trend window needs at least {required} games, only {available} available")]
    InsufficientWindow { available: usize, required: usize },

    #[error("Player not found: {name}")]
    PlayerNotFound { name: String },
}

impl BoardError {
    /// Classify the error for display
    pub fn severity(&self) -> Severity {
        match self {
            BoardError::FileNotFound { .. }
            | BoardError::MalformedTable { .. }
            | BoardError::MalformedScore { .. }
            | BoardError::DuplicatePlayer { .. }
            | BoardError::ScoreCountMismatch { .. } => Severity::Blocking,
            BoardError::EmptySnapshot
            | BoardError::NoGameData
            | BoardError::InsufficientWindow { .. } => Severity::Warning,
            BoardError::PlayerNotFound { .. } => Severity::Inline,
        }
    }

    /// Short stable name, used as a metrics label
    pub fn kind(&self) -> &'static str {
        match self {
            BoardError::FileNotFound { .. } => "file_not_found",
            BoardError::MalformedTable { .. } => "malformed_table",
            BoardError::MalformedScore { .. } => "malformed_score",
            BoardError::DuplicatePlayer { .. } => "duplicate_player",
            BoardError::ScoreCountMismatch { .. } => "score_count_mismatch",
            BoardError::EmptySnapshot => "empty_snapshot",
            BoardError::NoGameData => "no_game_data",
            BoardError::InsufficientWindow { .. } => "insufficient_window",
            BoardError::PlayerNotFound { .. } => "player_not_found",
        }
    }
}
