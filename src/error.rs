//! Error taxonomy for the bootstrapper.
//!
//! Components return these instead of exiting the process; only the binary's
//! `main` decides exit behavior, mapping each class to a distinct exit code.

use std::{path::PathBuf, time::Duration};

use thiserror::Error;

/// Failures while reading, writing, or parsing the configuration file or its
/// template.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse {path}: {source}")]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },
    #[error("failed to render configuration: {0}")]
    Render(#[from] toml::ser::Error),
}

/// Failures from the single database reachability attempt.
#[derive(Debug, Error)]
pub enum ProbeError {
    #[error("invalid connection URL {url:?}: {reason}")]
    InvalidUrl { url: String, reason: String },
    #[error("connection to {address} failed: {source}")]
    Unreachable {
        address: String,
        #[source]
        source: std::io::Error,
    },
    #[error("connection to {address} timed out after {timeout:?}")]
    TimedOut { address: String, timeout: Duration },
}

/// Failures reading an answer from the prompt surface.
#[derive(Debug, Error)]
pub enum PromptError {
    #[error("terminal prompt failed: {0}")]
    Terminal(#[from] dialoguer::Error),
    #[error("scripted input exhausted at prompt {prompt:?}")]
    ScriptExhausted { prompt: String },
}

/// Top-level failure of a bootstrap run.
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("connection to MongoDB failed: {source}")]
    Connectivity {
        #[source]
        source: ProbeError,
        hint: &'static str,
    },
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("invalid choice {input:?}")]
    InvalidChoice { input: String },
    #[error(transparent)]
    Prompt(#[from] PromptError),
}

impl SetupError {
    /// Exit code for this failure class. Success is 0.
    pub fn exit_code(&self) -> u8 {
        match self {
            SetupError::Connectivity { .. } => 2,
            SetupError::Store(_) => 3,
            SetupError::InvalidChoice { .. } => 4,
            SetupError::Prompt(_) => 5,
        }
    }

    /// Operator-facing recovery hint, when one applies.
    pub fn hint(&self) -> Option<&str> {
        match self {
            SetupError::Connectivity { hint, .. } => Some(hint),
            _ => None,
        }
    }
}
