use thiserror::Error;

#[derive(Error, Debug, Copy, Clone, PartialEq, Eq)]
pub enum GameError {
    #[error("Invalid coordinates")]
    InvalidCoords,
    #[error("Board must be at least one cell wide and tall")]
    EmptyBoard,
    #[error("Too many mines, at least one cell must stay safe")]
    TooManyMines,
}

pub type Result<T> = core::result::Result<T, GameError>;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("Could not access score file: {0}")]
    Io(#[from] std::io::Error),
}
