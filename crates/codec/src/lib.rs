//! Builders and parsers for SPIR-V instructions.
//!
//! Every instruction of SPIR-V 1.0 usable by a graphics (non-`Kernel`)
//! module, plus a few cherry-picked extension instructions, has a
//! `write_<op>` function in [`builder`] and, if it has operands, a
//! `parse_<op>` function in [`parser`]. Both are generated at build time from
//! the SPIR-V JSON grammar by the `spirv-codec-meta` crate.
//!
//! ```
//! use spirv_codec::{builder, parser, spv, Blob, IdResult, LiteralInteger};
//!
//! let mut blob = Blob::new();
//! builder::write_type_int(&mut blob, IdResult::from(1), LiteralInteger::from(32), LiteralInteger::from(1));
//! assert_eq!(blob, [4 << 16 | 21, 1, 32, 1]);
//!
//! let mut result = IdResult::default();
//! let mut width = LiteralInteger::default();
//! let mut signedness = LiteralInteger::default();
//! parser::parse_type_int(&blob, &mut result, &mut width, &mut signedness);
//! assert_eq!(u32::from(width), 32);
//! # let _ = spv::Op::TypeInt;
//! ```
//!
//! Parsers assume the caller already dispatched on the opcode: parsing an
//! instruction with the wrong parser panics. Building an instruction longer
//! than 0xFFFF words panics as well.

mod header;
mod types;

pub use header::{
    get_instruction_op_and_length, make_length_op, push_literal_string, write_spirv_header,
    GENERATOR_ID, GENERATOR_VERSION, MAX_INSTRUCTION_LENGTH,
};
pub use types::*;

/// SPIR-V opcodes and operand kinds.
#[allow(
    non_upper_case_globals,
    reason = "constants keep the enumerant names of the grammar"
)]
pub mod spv {
    include!(concat!(env!("OUT_DIR"), "/spv.rs"));
}

/// `write_<op>` functions.
#[allow(unused_imports, reason = "imports do not depend on the grammar")]
pub mod builder {
    include!(concat!(env!("OUT_DIR"), "/builder.rs"));
}

/// `parse_<op>` functions.
#[allow(
    unused_assignments,
    unused_imports,
    unused_variables,
    reason = "every operand advances the cursor, even the last one"
)]
pub mod parser {
    include!(concat!(env!("OUT_DIR"), "/parser.rs"));
}
