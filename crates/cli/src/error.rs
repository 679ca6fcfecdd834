//! Failures the `sand-garden` binary reports.
//!
//! | exit code | cause |
//! |-----------|-------|
//! | 2  | argument parsing, handled by clap before `run` |
//! | 10 | the engine rejected the run (unknown name, bad config, bad size) |
//! | 11 | a seed file or snapshot could not be read or written |
//! | 12 | `--params` or a seed file does not parse |
//! | 13 | a report could not be serialized |

use sand_garden_core::EngineError;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CliError {
    #[error(transparent)]
    Engine(EngineError),

    #[error("cannot {action} seed file {}: {source}", .path.display())]
    SeedFile {
        action: &'static str,
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("cannot write snapshot: {0}")]
    Snapshot(String),

    #[error("invalid --params JSON: {0}")]
    Params(#[source] serde_json::Error),

    #[error("malformed seed file {}: {source}", .path.display())]
    MalformedSeed {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("cannot serialize report: {0}")]
    Report(#[from] serde_json::Error),
}

impl CliError {
    pub fn exit_code(&self) -> i32 {
        match self {
            CliError::Engine(_) => 10,
            CliError::SeedFile { .. } | CliError::Snapshot(_) => 11,
            CliError::Params(_) | CliError::MalformedSeed { .. } => 12,
            CliError::Report(_) => 13,
        }
    }
}

impl From<EngineError> for CliError {
    fn from(e: EngineError) -> Self {
        // the engines only raise Io while writing a snapshot
        match e {
            EngineError::Io(msg) => CliError::Snapshot(msg),
            other => CliError::Engine(other),
        }
    }
}
