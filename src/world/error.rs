//! Error types for configuration loading and simulation setup.

use thiserror::Error;

/// Errors that can occur when loading gameplay data files.
#[derive(Debug, Error)]
pub enum DataLoadError {
    /// File could not be found.
    #[error("File not found: {0}")]
    FileNotFound(String),

    /// File could not be read.
    #[error("Failed to read file '{path}': {details}")]
    ReadError { path: String, details: String },

    /// RON parsing failed.
    #[error("Parse error in '{path}': {details}")]
    ParseError { path: String, details: String },
}

/// Fatal configuration problems found while assembling a simulation.
///
/// An entity that would need a missing collaborator refuses to activate
/// instead of silently skipping the work.
#[derive(Debug, Error, PartialEq)]
pub enum SetupError {
    /// A required collaborator was never bound.
    #[error("Missing required collaborator: {0}")]
    MissingCollaborator(&'static str),

    /// A configuration value is outside its valid range.
    #[error("Invalid configuration for '{field}': {reason}")]
    InvalidConfig { field: &'static str, reason: String },
}
