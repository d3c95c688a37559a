//! This crate generates SPIR-V instruction builders and parsers from the
//! SPIR-V JSON grammar; it is meant to run from the build script of the
//! `spirv-codec` crate.
//!
//! Generation is a single pass: the grammar is loaded and merged
//! ([`grammar`]), the unsupported capabilities are resolved ([`resolve`]),
//! every remaining instruction is expanded ([`expand`]), classified
//! ([`operand`]) and turned into a pair of procedures ([`emit`]), which are
//! finally rendered as Rust ([`generate`]).

pub mod config;
pub mod emit;
mod error;
pub mod expand;
pub mod generate;
pub mod grammar;
pub mod operand;
pub mod procedure;
pub mod resolve;

pub use config::Config;
pub use emit::Codecs;
pub use error::Error;

use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// The name of the generated builder file.
pub const BUILDER_FILE: &str = "builder.rs";
/// The name of the generated parser file.
pub const PARSER_FILE: &str = "parser.rs";
/// The name of the generated `spv` namespace file.
pub const SPV_FILE: &str = "spv.rs";

/// Loads the grammars of `config` and generates the procedures of every
/// supported instruction, without rendering them.
pub fn generate(config: &Config) -> Result<Codecs, Error> {
    let grammar = grammar::load(config)?;
    emit::emit(&grammar, config)
}

/// Generates [`BUILDER_FILE`], [`PARSER_FILE`] and [`SPV_FILE`] in `dir`.
///
/// Every file is rendered before any is written, so a grammar error leaves
/// `dir` untouched. The files are first written under a `.tmp` name and only
/// renamed into place once all of them were written; a failed write removes
/// the temporary files again. A failed rename can still leave a mix of old
/// and new files. Returns the paths of the written files.
pub fn generate_rust<P: AsRef<Path>>(config: &Config, dir: P) -> Result<Vec<PathBuf>, Error> {
    let grammar = grammar::load(config)?;
    let codecs = emit::emit(&grammar, config)?;

    let files = [
        (BUILDER_FILE, generate::rust_builders(&codecs, &grammar)),
        (PARSER_FILE, generate::rust_parsers(&codecs, &grammar)),
        (SPV_FILE, generate::rust_spv(&grammar)),
    ];

    let mut staged: Vec<(PathBuf, PathBuf)> = Vec::with_capacity(files.len());
    for (name, fmt) in &files {
        let path = dir.as_ref().join(name);
        let tmp = dir.as_ref().join(format!("{name}.tmp"));
        info!("Generating {}", path.display());
        if let Err(source) = fs::write(&tmp, fmt.contents()) {
            let _ = fs::remove_file(&tmp);
            for (tmp, _) in &staged {
                let _ = fs::remove_file(tmp);
            }
            return Err(Error::Write { path: tmp, source });
        }
        staged.push((tmp, path));
    }

    let mut written = Vec::with_capacity(staged.len());
    for (tmp, path) in staged {
        fs::rename(&tmp, &path).map_err(|source| Error::Write {
            path: path.clone(),
            source,
        })?;
        written.push(path);
    }
    Ok(written)
}
