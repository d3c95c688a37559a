//! Configuration of the generator: where the grammars live and which parts of
//! them are excluded from the generated surface.
//!
//! The defaults reproduce the fixed lists the generator has always used, so
//! `Config::default()` is enough for most users. A TOML file can override any
//! of them:
//!
//! ```toml
//! [codegen]
//! grammar = "grammar/1.0/spirv.core.grammar.json"
//! cherry-pick-grammar = "grammar/unified1/spirv.core.grammar.json"
//! unsupported-capabilities = ["Kernel", "Addresses"]
//! ```

use crate::error::Error;
use log::trace;
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};

// wrapped, so we have a named section in the config file
#[derive(serde_derive::Deserialize, Debug)]
#[serde(deny_unknown_fields)]
struct ConfigFile {
    codegen: Config,
}

/// Settings consumed by [`crate::generate`].
#[derive(serde_derive::Deserialize, Debug, Clone)]
#[serde(deny_unknown_fields)]
pub struct Config {
    /// The base grammar; only instructions from this version are generated,
    /// plus the cherry-picked ones.
    #[serde(default = "default_grammar")]
    grammar: PathBuf,
    /// A newer grammar from which extension instructions are cherry-picked.
    #[serde(default = "default_cherry_pick_grammar", rename = "cherry-pick-grammar")]
    cherry_pick_grammar: PathBuf,
    #[serde(
        default = "default_cherry_picked_extensions",
        rename = "cherry-picked-extensions"
    )]
    cherry_picked_extensions: BTreeSet<String>,
    #[serde(default, rename = "supported-extensions")]
    supported_extensions: BTreeSet<String>,
    /// If an instruction has an operand of these kinds, the instruction is
    /// ignored.
    #[serde(default = "default_unsupported_kinds", rename = "unsupported-kinds")]
    unsupported_kinds: BTreeSet<String>,
    /// If an instruction requires only capabilities from this set (after it
    /// is grown by the resolver), the instruction is ignored.
    #[serde(
        default = "default_unsupported_capabilities",
        rename = "unsupported-capabilities"
    )]
    unsupported_capabilities: BTreeSet<String>,
    /// Kinds with a hand-written strong type in the runtime crate; all other
    /// kinds live in the `spv` namespace.
    #[serde(default = "default_engine_defined_kinds", rename = "engine-defined-kinds")]
    engine_defined_kinds: BTreeSet<String>,
}

fn default_grammar() -> PathBuf {
    PathBuf::from("spirv/1.0/spirv.core.grammar.json")
}

fn default_cherry_pick_grammar() -> PathBuf {
    PathBuf::from("spirv/unified1/spirv.core.grammar.json")
}

fn default_cherry_picked_extensions() -> BTreeSet<String> {
    set(&["SPV_EXT_fragment_shader_interlock"])
}

fn default_unsupported_kinds() -> BTreeSet<String> {
    set(&["LiteralSpecConstantOpInteger"])
}

fn default_unsupported_capabilities() -> BTreeSet<String> {
    set(&["Kernel", "Addresses"])
}

fn default_engine_defined_kinds() -> BTreeSet<String> {
    set(&[
        "IdRef",
        "IdResult",
        "IdResultType",
        "IdMemorySemantics",
        "IdScope",
        "LiteralInteger",
        "LiteralString",
        "LiteralContextDependentNumber",
        "LiteralExtInstInteger",
        "PairLiteralIntegerIdRef",
        "PairIdRefLiteralInteger",
        "PairIdRefIdRef",
    ])
}

fn set(items: &[&str]) -> BTreeSet<String> {
    items.iter().map(|s| s.to_string()).collect()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            grammar: default_grammar(),
            cherry_pick_grammar: default_cherry_pick_grammar(),
            cherry_picked_extensions: default_cherry_picked_extensions(),
            supported_extensions: BTreeSet::new(),
            unsupported_kinds: default_unsupported_kinds(),
            unsupported_capabilities: default_unsupported_capabilities(),
            engine_defined_kinds: default_engine_defined_kinds(),
        }
    }
}

impl Config {
    /// Loads the `[codegen]` section of the TOML file at `path`.
    ///
    /// Relative grammar paths are resolved against the directory containing
    /// the file.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        trace!("Loading generator config, path: {}", path.display());
        let contents = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let mut config = Self::from_toml(&contents).map_err(|source| Error::Config {
            path: path.to_path_buf(),
            source,
        })?;
        if let Some(dir) = path.parent() {
            config.resolve_paths(dir);
        }
        Ok(config)
    }

    /// Parses a configuration document; grammar paths are kept as written.
    pub fn from_toml(contents: &str) -> Result<Self, toml::de::Error> {
        Ok(toml::from_str::<ConfigFile>(contents)?.codegen)
    }

    /// Makes relative grammar paths relative to `dir` instead.
    pub fn resolve_paths(&mut self, dir: &Path) -> &mut Self {
        if self.grammar.is_relative() {
            self.grammar = dir.join(&self.grammar);
        }
        if self.cherry_pick_grammar.is_relative() {
            self.cherry_pick_grammar = dir.join(&self.cherry_pick_grammar);
        }
        self
    }

    /// Path of the base grammar.
    pub fn grammar(&self) -> &Path {
        &self.grammar
    }

    /// Path of the grammar extension instructions are cherry-picked from.
    pub fn cherry_pick_grammar(&self) -> &Path {
        &self.cherry_pick_grammar
    }

    /// Extensions whose instructions are spliced into the base grammar.
    pub fn cherry_picked_extensions(&self) -> &BTreeSet<String> {
        &self.cherry_picked_extensions
    }

    /// Every extension the generated code may depend on: the explicitly
    /// supported ones plus the cherry-picked ones.
    pub fn supported_extensions(&self) -> BTreeSet<String> {
        self.supported_extensions
            .union(&self.cherry_picked_extensions)
            .cloned()
            .collect()
    }

    /// Operand kinds that disqualify an instruction.
    pub fn unsupported_kinds(&self) -> &BTreeSet<String> {
        &self.unsupported_kinds
    }

    /// The seed of the unsupported-capability set.
    pub fn unsupported_capabilities(&self) -> &BTreeSet<String> {
        &self.unsupported_capabilities
    }

    /// Kinds that are not qualified with the `spv` namespace.
    pub fn engine_defined_kinds(&self) -> &BTreeSet<String> {
        &self.engine_defined_kinds
    }

    /// Specify the base grammar.
    pub fn with_grammar(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.grammar = path.into();
        self
    }

    /// Specify the grammar extension instructions are cherry-picked from.
    pub fn with_cherry_pick_grammar(&mut self, path: impl Into<PathBuf>) -> &mut Self {
        self.cherry_pick_grammar = path.into();
        self
    }

    /// Add an extension to cherry-pick from the newer grammar.
    pub fn with_cherry_picked_extension(&mut self, name: impl Into<String>) -> &mut Self {
        self.cherry_picked_extensions.insert(name.into());
        self
    }

    /// Treat an extension as supported without cherry-picking anything for it.
    pub fn with_supported_extension(&mut self, name: impl Into<String>) -> &mut Self {
        self.supported_extensions.insert(name.into());
        self
    }

    /// Add a capability to the seed of the unsupported set.
    pub fn with_unsupported_capability(&mut self, name: impl Into<String>) -> &mut Self {
        self.unsupported_capabilities.insert(name.into());
        self
    }

    /// Add an operand kind that disqualifies instructions using it.
    pub fn with_unsupported_kind(&mut self, name: impl Into<String>) -> &mut Self {
        self.unsupported_kinds.insert(name.into());
        self
    }
}
