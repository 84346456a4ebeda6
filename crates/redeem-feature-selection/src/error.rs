use std::error::Error;
use std::fmt;

/// Precondition violations detected before a selection run starts.
#[derive(Debug, Clone, PartialEq)]
pub enum SelectionError {
    InvalidMaxSize(usize),
    InvalidThreshold(f64),
    InvalidCacheCapacity(usize),
}

impl fmt::Display for SelectionError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            SelectionError::InvalidMaxSize(size) => {
                write!(f, "max_size must be at least 1, got {}", size)
            }
            SelectionError::InvalidThreshold(threshold) => {
                write!(f, "threshold must be a finite number, got {}", threshold)
            }
            SelectionError::InvalidCacheCapacity(capacity) => {
                write!(f, "cache capacity must be at least 1, got {}", capacity)
            }
        }
    }
}

impl Error for SelectionError {}
