//! Error types for Outlay

use thiserror::Error;

#[derive(Error, Debug)]
pub enum Error {
    /// A draft expense failed the write-path guards. The message is shown
    /// to the user verbatim, so it is phrased as an instruction.
    #[error("Invalid expense: {0}")]
    InvalidExpense(String),
}

pub type Result<T> = std::result::Result<T, Error>;
