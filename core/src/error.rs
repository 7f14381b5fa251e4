use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid game configuration")]
    InvalidConfiguration,
    #[error("Position is outside the grid")]
    OutOfBounds,
    #[error("Position already revealed")]
    AlreadyRevealed,
    #[error("Game already ended, no new moves are accepted")]
    AlreadyEnded,
    #[error("No gems revealed yet, nothing to cash out")]
    NothingToCashOut,
    #[error("Game is still in progress")]
    NotFinished,
}

pub type Result<T> = core::result::Result<T, GameError>;
