use std::path::PathBuf;

use yaml_rust::ScanError;

/// Contract violations detected while computing standings.
///
/// Missing or partial telemetry is never reported here; it simply yields fewer rows.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum StandingsError {
    #[error("negative car slot {slot}")]
    NegativeSlot { slot: i32 },

    #[error("car slot {slot} appears more than once in the roster")]
    DuplicateRosterSlot { slot: i32 },
}

#[derive(Debug, thiserror::Error)]
pub enum SessionInfoError {
    #[error("empty session info")]
    Empty,

    #[error("failed to parse session info yaml: {0}")]
    Yaml(#[from] ScanError),

    #[error("session info field {0} not found")]
    MissingField(&'static str),

    #[error("session info field {0} has an unexpected type")]
    InvalidField(&'static str),
}

#[derive(Debug, thiserror::Error)]
pub enum DivisionFileError {
    #[error("division file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("division file {path} is not a name to division object: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("config file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("config file {path}: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}
