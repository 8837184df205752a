use std::fmt;

#[derive(Debug)]
pub enum GridPressError {
    InvalidGridSize(usize),
    InvalidPuzzlesPerPage(u8),
    InvalidConfiguration(String),
}

impl fmt::Display for GridPressError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridPressError::InvalidGridSize(size) => {
                write!(f, "grid size must be at least 1, got {}", size)
            }
            GridPressError::InvalidPuzzlesPerPage(count) => {
                write!(f, "puzzles per page must be 1, 2 or 4, got {}", count)
            }
            GridPressError::InvalidConfiguration(message) => {
                write!(f, "invalid configuration: {}", message)
            }
        }
    }
}

impl std::error::Error for GridPressError {}
