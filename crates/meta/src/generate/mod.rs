//! Contains the code-generation logic to emit the builder, parser and `spv`
//! source files.

mod codec;
mod formatter;
mod spv;

use crate::emit::Codecs;
use crate::grammar::Grammar;
pub(crate) use formatter::fmtln;
pub use formatter::{maybe_file_loc, FileLocation, Formatter};

fn banner(grammar: &Grammar) -> String {
    format!(
        "GENERATED FILE - DO NOT EDIT. Generated by spirv-codec-meta using data from {}",
        grammar.source_name()
    )
}

/// Generate the `write_*` functions, one per supported instruction.
pub fn rust_builders(codecs: &Codecs, grammar: &Grammar) -> Formatter {
    let mut f = Formatter::new(&banner(grammar), file!(), line!());
    f.comment("");
    f.comment("Functions to generate SPIR-V binary for each instruction.");
    f.empty_line();
    fmtln!(f, "use crate::header::{{make_length_op, push_literal_string}};");
    fmtln!(f, "use crate::spv;");
    fmtln!(f, "use crate::types::*;");
    for procedure in &codecs.builders {
        f.empty_line();
        procedure.generate(&mut f);
    }
    f
}

/// Generate the `parse_*` functions, one per supported instruction with
/// operands.
pub fn rust_parsers(codecs: &Codecs, grammar: &Grammar) -> Formatter {
    let mut f = Formatter::new(&banner(grammar), file!(), line!());
    f.comment("");
    f.comment("Functions to parse SPIR-V binary for each instruction.");
    f.empty_line();
    fmtln!(f, "use crate::header::get_instruction_op_and_length;");
    fmtln!(f, "use crate::spv;");
    fmtln!(f, "use crate::types::*;");
    for procedure in &codecs.parsers {
        f.empty_line();
        procedure.generate(&mut f);
    }
    f
}

/// Generate the `spv` namespace from the grammar's operand kinds.
pub fn rust_spv(grammar: &Grammar) -> Formatter {
    let mut f = Formatter::new(&banner(grammar), file!(), line!());
    f.comment("");
    f.comment("SPIR-V opcodes and operand kinds.");
    f.empty_line();
    spv::generate(&mut f, grammar);
    f
}
