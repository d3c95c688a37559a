//! The word-0 header of every instruction and the header of a SPIR-V module.

use crate::spv;
use crate::types::Blob;

/// The generator id registered for this crate (upper 16 bits of the
/// generator word of a module header).
pub const GENERATOR_ID: u32 = 24;
/// The version of the generator (lower 16 bits).
pub const GENERATOR_VERSION: u32 = 1;

/// The largest word count an instruction can have.
pub const MAX_INSTRUCTION_LENGTH: usize = 0xFFFF;

const OP_MASK: u32 = 0xFFFF;

/// Packs the word count of an instruction and its opcode into its first word.
///
/// # Panics
///
/// Panics if `length` does not fit in 16 bits. A complex enough shader
/// reaches that limit; it is turned into a crash rather than a corrupt
/// module.
pub fn make_length_op(length: usize, op: spv::Op) -> u32 {
    let op = u32::from(op);
    assert!(op <= OP_MASK, "opcode {op} does not fit in 16 bits");
    if length > MAX_INSTRUCTION_LENGTH {
        log::error!("Complex shader not representable in SPIR-V: instruction {op} has {length} words");
        panic!("instruction length {length} exceeds {MAX_INSTRUCTION_LENGTH} words");
    }
    (length as u32) << 16 | op
}

/// Splits the first word of `instruction` into its opcode and word count.
pub fn get_instruction_op_and_length(instruction: &[u32]) -> (spv::Op, usize) {
    let word = instruction[0];
    (spv::Op::from(word & OP_MASK), (word >> 16) as usize)
}

/// Writes the five-word module header: magic number, version 1.0, the
/// generator word, the id bound and a reserved zero.
///
/// # Panics
///
/// Panics if `blob` is not empty.
pub fn write_spirv_header(blob: &mut Blob, id_count: u32) {
    assert!(blob.is_empty(), "the module header must come first");
    blob.push(spv::MAGIC_NUMBER);
    blob.push(0x0001_0000);
    blob.push(GENERATOR_ID << 16 | GENERATOR_VERSION);
    blob.push(id_count);
    blob.push(0);
}

/// Appends `s`, NUL terminated and zero padded, as `s.len() / 4 + 1` words.
///
/// A literal string ends at its first NUL, so anything from an interior NUL
/// on is dropped.
pub fn push_literal_string(blob: &mut Blob, s: &str) {
    let s = s.split('\0').next().unwrap_or_default();
    let start = blob.len();
    blob.resize(start + s.len() / 4 + 1, 0);
    for (i, byte) in s.bytes().enumerate() {
        blob[start + i / 4] |= u32::from(byte) << (8 * (i % 4));
    }
}
