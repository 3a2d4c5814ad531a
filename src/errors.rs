// src/errors.rs

//! Crate-wide error type and `Result` alias.
//!
//! Every failure that can reach a client is a variant here; the connection
//! handler renders them as single `[ERR] <message>` lines.

use thiserror::Error;

#[derive(Error, Debug)]
pub enum WormholeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("TOML parsing error: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid configuration: {0}")]
    Config(String),

    #[error("No mapping for '{0}'")]
    NotFound(String),

    #[error("Too few words, expected at least {0}.")]
    TooFewWords(usize),

    #[error("Unknown command, expected one of {0}")]
    UnknownCommand(String),

    #[error("Failed to start '{executable}': {source}")]
    Launch {
        executable: String,
        source: std::io::Error,
    },

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

pub type Result<T> = std::result::Result<T, WormholeError>;
