//! Render the `spv` namespace: the header constants, the opcodes and one type
//! per enumeration kind of the grammar.

use super::{fmtln, Formatter};
use crate::grammar::{Enumerant, Grammar, OperandKind};
use std::collections::HashSet;

/// `pub const MAGIC_NUMBER`, `pub struct Op`, and the enumeration kinds.
pub fn generate(f: &mut Formatter, grammar: &Grammar) {
    let magic = grammar.magic_number;
    let version = grammar.major_version << 16 | grammar.minor_version << 8;
    fmtln!(f, "pub const MAGIC_NUMBER: u32 = {magic:#010x};");
    fmtln!(f, "pub const VERSION: u32 = {version:#010x};");
    f.empty_line();

    f.doc_comment("An instruction opcode; the low 16 bits of the first word of an instruction.");
    generate_value_type(f, "Op", grammar.instructions.iter().map(|i| {
        let name = i.opname.strip_prefix("Op").unwrap_or(&i.opname);
        (name.to_string(), i.opcode)
    }));

    for kind in &grammar.operand_kinds {
        match kind {
            OperandKind::ValueEnum { kind, enumerants } => {
                f.empty_line();
                f.doc_comment(format!("The `{kind}` operand kind."));
                generate_value_type(f, kind, constants(kind, enumerants));
            }
            OperandKind::BitEnum { kind, enumerants } => {
                f.empty_line();
                generate_mask_type(f, kind, enumerants);
            }
            OperandKind::Id { .. } | OperandKind::Literal { .. } | OperandKind::Composite { .. } => {}
        }
    }
}

/// Enumerant names as Rust constants: `Dim::1D` becomes `Dim::Dim1D`, later
/// duplicates of a name are dropped.
fn constants<'a>(
    kind: &'a str,
    enumerants: &'a [Enumerant],
) -> impl Iterator<Item = (String, u32)> + 'a {
    let mut seen = HashSet::new();
    enumerants.iter().filter_map(move |e| {
        let name = if e.enumerant.starts_with(|c: char| c.is_ascii_digit()) {
            format!("{kind}{}", e.enumerant)
        } else {
            e.enumerant.clone()
        };
        seen.insert(name.clone()).then_some((name, e.value))
    })
}

/// A `u32` newtype with one associated constant per value.
fn generate_value_type(f: &mut Formatter, name: &str, values: impl Iterator<Item = (String, u32)>) {
    fmtln!(f, "#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]");
    fmtln!(f, "pub struct {name}(pub u32);");
    f.empty_line();
    f.add_block(&format!("impl {name}"), |f| {
        for (constant, value) in values {
            fmtln!(f, "pub const {constant}: {name} = {name}({value});");
        }
    });
    f.empty_line();
    f.add_block(&format!("impl From<u32> for {name}"), |f| {
        f.add_block(&format!("fn from(value: u32) -> {name}"), |f| {
            fmtln!(f, "{name}(value)");
        });
    });
    f.empty_line();
    f.add_block(&format!("impl From<{name}> for u32"), |f| {
        f.add_block(&format!("fn from(value: {name}) -> u32"), |f| {
            fmtln!(f, "value.0");
        });
    });
}

/// A `bitflags` type named `<kind>Mask`; the zero-valued `None` enumerant is
/// `<kind>Mask::empty()`.
fn generate_mask_type(f: &mut Formatter, kind: &str, enumerants: &[Enumerant]) {
    let name = format!("{kind}Mask");
    f.add_block("bitflags::bitflags!", |f| {
        f.doc_comment(format!("The `{kind}` operand kind."));
        fmtln!(f, "#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]");
        f.add_block(&format!("pub struct {name}: u32"), |f| {
            for (constant, value) in constants(kind, enumerants) {
                if value != 0 {
                    fmtln!(f, "const {constant} = {value:#x};");
                }
            }
        });
    });
    f.empty_line();
    f.add_block(&format!("impl From<u32> for {name}"), |f| {
        f.add_block(&format!("fn from(value: u32) -> {name}"), |f| {
            fmtln!(f, "{name}::from_bits_retain(value)");
        });
    });
    f.empty_line();
    f.add_block(&format!("impl From<{name}> for u32"), |f| {
        f.add_block(&format!("fn from(value: {name}) -> u32"), |f| {
            fmtln!(f, "value.bits()");
        });
    });
}
