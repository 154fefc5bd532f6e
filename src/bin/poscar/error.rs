// Released under MIT License.

use thiserror::Error;

/// Errors in the command-line input that are not covered by the library.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum CliError {
    #[error("`{0}` is not a valid search radius (expected a positive number of Å).")]
    InvalidRadius(String),
    #[error("Could not parse `{0}` as a fractional point (expected e.g. `0.5,0.5,0.5`).")]
    InvalidPoint(String),
    #[error("No atom labels are provided.")]
    NoEntries,
    #[error("Could not read from standard input.")]
    StdinFailed,
}
