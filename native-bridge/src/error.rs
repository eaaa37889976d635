use std::{fmt, result};

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("Service not initialized")]
    NotInitialized,
    #[error("Service already initialized")]
    AlreadyInitialized,
    #[error("Invalid request")]
    InvalidRequest,
    // The reason is only logged, never sent back across the boundary.
    #[error("Failed to process request")]
    Undecodable(String),
    #[error("acquisition failure: {0}")]
    Acquisition(String),
    #[error("config error: {0}")]
    Config(String),
}

pub type Result<T> = result::Result<T, Error>;

impl Error {
    pub fn config<T: fmt::Display>(inner: T) -> Self {
        Self::Config(inner.to_string())
    }
    pub fn acquisition<T: fmt::Display>(inner: T) -> Self {
        Self::Acquisition(inner.to_string())
    }
    pub fn undecodable<T: fmt::Display>(inner: T) -> Self {
        Self::Undecodable(inner.to_string())
    }
}
