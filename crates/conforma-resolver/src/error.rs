//! # Resolution Errors
//!
//! Failures while building the reference table. Validation failures are
//! never errors in this sense — they are data records returned by the
//! engine. Everything here means "the reference graph could not be
//! built", and the root document failing to load is always fatal.

use thiserror::Error;

/// Error during reference resolution.
#[derive(Error, Debug)]
pub enum ResolveError {
    /// A referenced local file does not exist.
    #[error("referenced schema file '{file}' not found in '{directory}'")]
    FileNotFound {
        /// The file name that was requested.
        file: String,
        /// The directory that was searched.
        directory: String,
    },

    /// The root schema document could not be loaded.
    #[error("cannot load root schema '{uri}': {reason}")]
    RootLoad {
        /// The root document location.
        uri: String,
        /// Why loading failed.
        reason: String,
    },

    /// A loaded document could not be parsed as JSON or YAML.
    #[error("cannot parse schema document '{uri}': {reason}")]
    Parse {
        /// The document that failed to parse.
        uri: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// An HTTP fetch for an external document failed.
    #[error("fetch of '{uri}' failed: {reason}")]
    Fetch {
        /// The document that was being fetched.
        uri: String,
        /// Transport diagnostic.
        reason: String,
    },

    /// The HTTP client could not be constructed.
    #[error("http client error: {0}")]
    Client(#[from] reqwest::Error),

    /// IO error reading a local document.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}
