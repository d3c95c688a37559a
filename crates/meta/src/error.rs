//! Errors returned while generating SPIR-V builders and parsers.

use std::io;
use std::path::PathBuf;

/// An error that occurred when the `spirv_codec_meta` crate was generating
/// source files for the `spirv_codec` crate.
///
/// Every variant is fatal: generation runs once over trusted local input and
/// either fully succeeds or produces no output at all.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A grammar or configuration file could not be read.
    #[error("failed to read `{}`", path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// A grammar document is not valid JSON or does not have the expected
    /// shape.
    #[error("failed to parse grammar `{}`", path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// The configuration file is not valid TOML or has unknown keys.
    #[error("failed to parse config file `{}`", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    /// The grammar violates an assumption the generated code relies on.
    #[error("{0}")]
    Grammar(String),

    /// A generated file could not be written.
    #[error("failed to write `{}`", path.display())]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl Error {
    /// Create a new grammar error with the given message.
    pub fn grammar<S: Into<String>>(msg: S) -> Error {
        Error::Grammar(msg.into())
    }
}
