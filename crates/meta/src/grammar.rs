//! A typed model of the SPIR-V JSON grammar (`spirv.core.grammar.json`).
//!
//! Only the parts the generator consumes are modeled; any other key in the
//! document is ignored.

use crate::config::Config;
use crate::error::Error;
use log::{debug, info, warn};
use serde::de::{self, Deserializer};
use serde_derive::Deserialize;
use std::collections::{BTreeSet, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

/// A complete grammar document.
#[derive(Deserialize, Debug, Clone)]
pub struct Grammar {
    #[serde(deserialize_with = "number_or_hex")]
    pub magic_number: u32,
    pub major_version: u32,
    pub minor_version: u32,
    #[serde(default)]
    pub operand_kinds: Vec<OperandKind>,
    #[serde(default)]
    pub instructions: Vec<Instruction>,
    /// Where the document was loaded from; empty if it was parsed from a
    /// string.
    #[serde(skip)]
    pub source: PathBuf,
}

/// One instruction of the grammar.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Instruction {
    /// Always starts with `Op`.
    pub opname: String,
    pub opcode: u32,
    #[serde(default)]
    pub operands: Vec<OperandDecl>,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub extensions: Vec<String>,
}

/// One operand declaration of an instruction (or enumerant parameter).
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct OperandDecl {
    pub kind: String,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub quantifier: Quantifier,
}

impl OperandDecl {
    /// An operand that does not appear in any grammar document, with an
    /// explicit name.
    pub fn new(kind: &str, name: &str, quantifier: Quantifier) -> Self {
        Self {
            kind: kind.to_string(),
            name: Some(name.to_string()),
            quantifier,
        }
    }
}

/// How many times an operand occurs.
#[derive(Deserialize, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum Quantifier {
    /// Exactly one; the grammar leaves the quantifier out.
    #[default]
    #[serde(skip)]
    One,
    #[serde(rename = "?")]
    Optional,
    #[serde(rename = "*")]
    Repeated,
}

/// An operand kind, tagged by its `category`.
#[derive(Deserialize, Debug, Clone)]
#[serde(tag = "category")]
pub enum OperandKind {
    BitEnum {
        kind: String,
        enumerants: Vec<Enumerant>,
    },
    ValueEnum {
        kind: String,
        enumerants: Vec<Enumerant>,
    },
    Id {
        kind: String,
    },
    Literal {
        kind: String,
    },
    Composite {
        kind: String,
        bases: Vec<String>,
    },
}

impl OperandKind {
    pub fn name(&self) -> &str {
        match self {
            OperandKind::BitEnum { kind, .. }
            | OperandKind::ValueEnum { kind, .. }
            | OperandKind::Id { kind }
            | OperandKind::Literal { kind }
            | OperandKind::Composite { kind, .. } => kind,
        }
    }

    /// The enumerants of an enumeration kind; empty for every other category.
    pub fn enumerants(&self) -> &[Enumerant] {
        match self {
            OperandKind::BitEnum { enumerants, .. } | OperandKind::ValueEnum { enumerants, .. } => {
                enumerants
            }
            _ => &[],
        }
    }
}

/// A named value of a `BitEnum` or `ValueEnum` kind.
#[derive(Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct Enumerant {
    pub enumerant: String,
    /// A number for value enums, a hex string for bit enums.
    #[serde(deserialize_with = "number_or_hex")]
    pub value: u32,
    #[serde(default)]
    pub capabilities: Vec<String>,
    #[serde(default)]
    pub extensions: Vec<String>,
    #[serde(default)]
    pub parameters: Vec<OperandDecl>,
}

fn number_or_hex<'de, D>(deserializer: D) -> Result<u32, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Number(u32),
        Text(String),
    }

    match <Raw as serde::Deserialize>::deserialize(deserializer)? {
        Raw::Number(n) => Ok(n),
        Raw::Text(s) => {
            let digits = s
                .strip_prefix("0x")
                .or_else(|| s.strip_prefix("0X"))
                .ok_or_else(|| de::Error::custom(format!("expected a hex string, found `{s}`")))?;
            u32::from_str_radix(digits, 16).map_err(de::Error::custom)
        }
    }
}

impl Grammar {
    /// Reads and parses the grammar document at `path`.
    pub fn from_file(path: &Path) -> Result<Self, Error> {
        debug!("Loading grammar, path: {}", path.display());
        let text = fs::read_to_string(path).map_err(|source| Error::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&text, path)
    }

    /// Parses a grammar document; `origin` is only used for diagnostics and
    /// the generated-file banner.
    pub fn from_json(text: &str, origin: &Path) -> Result<Self, Error> {
        let mut grammar: Grammar = serde_json::from_str(text).map_err(|source| Error::Parse {
            path: origin.to_path_buf(),
            source,
        })?;
        grammar.source = origin.to_path_buf();
        Ok(grammar)
    }

    /// Appends every instruction of `other` that declares at least one of
    /// `extensions`, in `other`'s order. Instructions already present (by
    /// `opname`) are skipped. Returns the number of appended instructions.
    pub fn cherry_pick(&mut self, other: &Grammar, extensions: &BTreeSet<String>) -> usize {
        let mut known: HashSet<String> =
            self.instructions.iter().map(|i| i.opname.clone()).collect();
        let mut picked = 0;
        for inst in &other.instructions {
            if !inst.extensions.iter().any(|e| extensions.contains(e)) {
                continue;
            }
            if !known.insert(inst.opname.clone()) {
                warn!(
                    "Not cherry-picking {} from {}: already in {}",
                    inst.opname,
                    other.source.display(),
                    self.source.display()
                );
                continue;
            }
            debug!("Cherry-picked {} from {}", inst.opname, other.source.display());
            self.instructions.push(inst.clone());
            picked += 1;
        }
        picked
    }

    /// The names of all `BitEnum` kinds; their Rust types carry a `Mask`
    /// suffix.
    pub fn bit_mask_kinds(&self) -> BTreeSet<String> {
        self.operand_kinds
            .iter()
            .filter(|k| matches!(k, OperandKind::BitEnum { .. }))
            .map(|k| k.name().to_string())
            .collect()
    }

    /// Finds an operand kind by name.
    pub fn operand_kind(&self, name: &str) -> Option<&OperandKind> {
        self.operand_kinds.iter().find(|k| k.name() == name)
    }

    /// The file name of the document, as shown in generated-file banners.
    pub fn source_name(&self) -> String {
        self.source
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "<memory>".to_string())
    }
}

/// Loads the base grammar of `config` and splices in the instructions of the
/// configured cherry-picked extensions.
pub fn load(config: &Config) -> Result<Grammar, Error> {
    let mut grammar = Grammar::from_file(config.grammar())?;
    let newer = Grammar::from_file(config.cherry_pick_grammar())?;
    let picked = grammar.cherry_pick(&newer, config.cherry_picked_extensions());
    info!(
        "Loaded SPIR-V {}.{} grammar with {} instructions ({picked} cherry-picked)",
        grammar.major_version,
        grammar.minor_version,
        grammar.instructions.len()
    );
    Ok(grammar)
}
