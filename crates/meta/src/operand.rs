//! Classify grammar operands: their shape, how they are encoded on the wire,
//! their Rust type and their parameter name.

use crate::error::Error;
use crate::expand::ExpandedOperand;
use crate::grammar::{OperandDecl, Quantifier};
use heck::ToSnakeCase;
use std::collections::{BTreeSet, HashMap};
use std::fmt;

/// The grammar kinds made of two words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PairKind {
    LiteralIntegerIdRef,
    IdRefLiteralInteger,
    IdRefIdRef,
}

impl PairKind {
    pub fn from_kind(kind: &str) -> Option<Self> {
        match kind {
            "PairLiteralIntegerIdRef" => Some(Self::LiteralIntegerIdRef),
            "PairIdRefLiteralInteger" => Some(Self::IdRefLiteralInteger),
            "PairIdRefIdRef" => Some(Self::IdRefIdRef),
            _ => None,
        }
    }

    /// The name of the pair struct in the runtime crate.
    pub fn type_name(&self) -> &'static str {
        match self {
            Self::LiteralIntegerIdRef => "PairLiteralIntegerIdRef",
            Self::IdRefLiteralInteger => "PairIdRefLiteralInteger",
            Self::IdRefIdRef => "PairIdRefIdRef",
        }
    }

    /// `(field, type)` of both halves, in wire order.
    pub fn fields(&self) -> [(&'static str, &'static str); 2] {
        match self {
            Self::LiteralIntegerIdRef => [("literal", "LiteralInteger"), ("id", "IdRef")],
            Self::IdRefLiteralInteger => [("id", "IdRef"), ("literal", "LiteralInteger")],
            Self::IdRefIdRef => [("id1", "IdRef"), ("id2", "IdRef")],
        }
    }
}

/// How often an operand occurs in an instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Shape {
    Scalar,
    Optional,
    Repeated,
    /// A repeated operand implied by the kind of the operand before it.
    Trailing,
}

impl Shape {
    pub fn is_list(&self) -> bool {
        matches!(self, Shape::Repeated | Shape::Trailing)
    }
}

/// How one occurrence of an operand is laid out in words.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Encoding {
    /// A single word.
    Word,
    /// Two words, in the order given by [`PairKind::fields`].
    Pair(PairKind),
    /// A NUL-terminated, zero-padded UTF-8 string.
    String,
}

/// The Rust type of one occurrence of an operand: `spv::StorageClass`,
/// `spv::MemoryAccessMask`, `IdRef`, ...
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WireType {
    pub kind: String,
    /// Defined by the `spv` namespace instead of the runtime crate.
    pub qualified: bool,
    /// A bit-mask kind; the type name carries a `Mask` suffix.
    pub mask: bool,
}

impl fmt::Display for WireType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.qualified {
            write!(f, "spv::")?;
        }
        write!(f, "{}", self.kind)?;
        if self.mask {
            write!(f, "Mask")?;
        }
        Ok(())
    }
}

/// The type of a builder input or parser output parameter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParamType {
    In(WireType),
    InStr,
    OptionalIn(WireType),
    OptionalInStr,
    SliceIn(WireType),
    Out(WireType),
    OutStr,
    OptionalOut(WireType),
    OptionalOutStr,
    ListOut(WireType),
}

impl ParamType {
    /// Parser outputs that borrow the instruction need its lifetime.
    pub fn borrows_instruction(&self) -> bool {
        matches!(self, ParamType::OutStr | ParamType::OptionalOutStr)
    }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParamType::In(t) => write!(f, "{t}"),
            ParamType::InStr => write!(f, "&str"),
            ParamType::OptionalIn(t) => write!(f, "Option<{t}>"),
            ParamType::OptionalInStr => write!(f, "Option<&str>"),
            ParamType::SliceIn(t) => write!(f, "&[{t}]"),
            ParamType::Out(t) => write!(f, "&mut {t}"),
            ParamType::OutStr => write!(f, "&mut LiteralStr<'a>"),
            ParamType::OptionalOut(t) => write!(f, "Option<&mut Option<{t}>>"),
            ParamType::OptionalOutStr => write!(f, "Option<&mut Option<LiteralStr<'a>>>"),
            ParamType::ListOut(t) => write!(f, "Option<&mut Vec<{t}>>"),
        }
    }
}

/// A fully classified operand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Operand {
    /// The canonical lower-camel-case name, e.g. `memoryAccess`.
    pub name: String,
    /// The Rust parameter name, e.g. `memory_access`.
    pub ident: String,
    pub shape: Shape,
    pub encoding: Encoding,
    pub ty: WireType,
}

impl Operand {
    /// The type the builder takes this operand as.
    pub fn input_type(&self) -> ParamType {
        let ty = self.ty.clone();
        match (self.shape, self.encoding) {
            (Shape::Scalar, Encoding::String) => ParamType::InStr,
            (Shape::Optional, Encoding::String) => ParamType::OptionalInStr,
            (Shape::Scalar, _) => ParamType::In(ty),
            (Shape::Optional, _) => ParamType::OptionalIn(ty),
            (Shape::Repeated | Shape::Trailing, _) => ParamType::SliceIn(ty),
        }
    }

    /// The type the parser writes this operand through.
    pub fn output_type(&self) -> ParamType {
        let ty = self.ty.clone();
        match (self.shape, self.encoding) {
            (Shape::Scalar, Encoding::String) => ParamType::OutStr,
            (Shape::Optional, Encoding::String) => ParamType::OptionalOutStr,
            (Shape::Scalar, _) => ParamType::Out(ty),
            (Shape::Optional, _) => ParamType::OptionalOut(ty),
            (Shape::Repeated | Shape::Trailing, _) => ParamType::ListOut(ty),
        }
    }
}

/// Maps grammar operands to [`Operand`]s.
pub struct Classifier<'a> {
    engine_defined: &'a BTreeSet<String>,
    bit_masks: BTreeSet<String>,
}

impl<'a> Classifier<'a> {
    pub fn new(engine_defined: &'a BTreeSet<String>, bit_masks: BTreeSet<String>) -> Self {
        Self {
            engine_defined,
            bit_masks,
        }
    }

    pub fn wire_type(&self, kind: &str) -> WireType {
        WireType {
            kind: kind.to_string(),
            qualified: !self.engine_defined.contains(kind),
            mask: self.bit_masks.contains(kind),
        }
    }

    /// Classifies one operand of `opname`.
    pub fn classify(&self, opname: &str, operand: &ExpandedOperand) -> Result<Operand, Error> {
        let decl = &operand.decl;
        let shape = match (operand.synthetic, decl.quantifier) {
            (true, _) => Shape::Trailing,
            (false, Quantifier::One) => Shape::Scalar,
            (false, Quantifier::Optional) => Shape::Optional,
            (false, Quantifier::Repeated) => Shape::Repeated,
        };
        let encoding = if let Some(pair) = PairKind::from_kind(&decl.kind) {
            Encoding::Pair(pair)
        } else if decl.kind == "LiteralString" {
            Encoding::String
        } else {
            Encoding::Word
        };
        if encoding == Encoding::String && shape.is_list() {
            return Err(Error::grammar(format!(
                "{opname}: a list of strings cannot be encoded"
            )));
        }
        let name = operand_name(decl);
        Ok(Operand {
            ident: rust_ident(&name),
            name,
            shape,
            encoding,
            ty: self.wire_type(&decl.kind),
        })
    }
}

/// The canonical name of an operand, derived from its grammar name or, if it
/// has none, from its kind.
pub fn operand_name(decl: &OperandDecl) -> String {
    let Some(name) = &decl.name else {
        return lower_first(&decl.kind);
    };
    let name = remove_chars(name, &['\'']);

    if decl.quantifier == Quantifier::Repeated {
        let mut suffix = "List";
        let mut name = name.as_str();
        if decl.kind == "IdRef" {
            // 'Operand 1', +\n'Operand 2', +\n... is an operandList
            if let Some(space) = name.find(' ') {
                name = &name[..space];
            }
        } else if decl.kind.starts_with("Pair") {
            suffix = "PairList";
        }
        return lower_first(&remove_chars(name, &[' ', ',', '.'])) + suffix;
    }

    let name = lower_first(&remove_chars(&name, &[' ', '.', ',', '+', '\n', '~']));
    if name == "default" {
        "default_".to_string()
    } else {
        name
    }
}

/// Names the generated functions use for their own locals.
const LOCALS: &[&str] = &[
    "blob",
    "instruction",
    "op",
    "length",
    "o",
    "operand",
    "start_size",
    "literal",
];

const KEYWORDS: &[&str] = &[
    "abstract", "as", "async", "await", "become", "box", "break", "const", "continue", "crate",
    "default", "do", "dyn", "else", "enum", "extern", "false", "final", "fn", "for", "gen", "if",
    "impl", "in", "let", "loop", "macro", "match", "mod", "move", "mut", "override", "priv",
    "pub", "ref", "return", "self", "static", "struct", "super", "trait", "true", "try", "type",
    "typeof", "union", "unsafe", "unsized", "use", "virtual", "where", "while", "yield",
];

/// The Rust identifier for a canonical operand name.
pub fn rust_ident(name: &str) -> String {
    let mut ident = name.to_snake_case();
    if ident.is_empty() || ident.starts_with(|c: char| c.is_ascii_digit()) {
        ident.insert(0, '_');
    }
    if KEYWORDS.contains(&ident.as_str()) || LOCALS.contains(&ident.as_str()) {
        ident.push('_');
    }
    ident
}

/// Renames repeated identifiers within one instruction: the second `x`
/// becomes `x_2`, the third `x_3`.
pub fn make_idents_unique(operands: &mut [Operand]) {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let taken: BTreeSet<String> = operands.iter().map(|o| o.ident.clone()).collect();
    for operand in operands.iter_mut() {
        let count = seen.entry(operand.ident.clone()).or_insert(0);
        *count += 1;
        if *count > 1 {
            let mut n = *count;
            while taken.contains(&format!("{}_{n}", operand.ident)) {
                n += 1;
            }
            operand.ident = format!("{}_{n}", operand.ident);
        }
    }
}

fn remove_chars(s: &str, chars: &[char]) -> String {
    s.chars().filter(|c| !chars.contains(c)).collect()
}

fn lower_first(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_lowercase().chain(chars).collect(),
        None => String::new(),
    }
}
