//! A typed description of the generated builder and parser functions.
//!
//! The emitter produces [`Procedure`]s; turning them into source text is left
//! to the renderer in [`crate::generate`].

use crate::operand::{Encoding, ParamType, WireType};
use heck::ToSnakeCase;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    /// Serializes typed arguments into words.
    Build,
    /// Deserializes words into typed outputs.
    Parse,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
    pub name: String,
    pub ty: ParamType,
}

/// Where a builder takes the value it pushes from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Source {
    /// The named parameter, or the value bound by an enclosing `IfSome`.
    Param(String),
    /// The current element of the enclosing `ForEach`.
    Element,
}

/// How a parser stores the value it read.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Target {
    /// `*out = value`
    Assign,
    /// `*out = Some(value)`
    AssignSome,
    /// `out.push(value)`
    Append,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Stmt {
    /// Remember where the instruction starts and push a placeholder for word 0.
    ReserveHeader,
    /// Push one occurrence of an operand.
    Push { source: Source, encoding: Encoding },
    /// Run `body` only if the optional parameter is present.
    IfSome { param: String, body: Vec<Stmt> },
    /// Run `body` for every element of the list parameter.
    ForEach { param: String, body: Vec<Stmt> },
    /// Overwrite word 0 with the final length and the opcode.
    PatchHeader,
    /// Split word 0 and check the opcode; the cursor starts after it.
    ReadHeader,
    /// Read one occurrence of an operand at the cursor and advance it.
    Read {
        param: String,
        target: Target,
        encoding: Encoding,
        ty: WireType,
    },
    /// Run `body` only if the caller asked for the optional operand and there
    /// are words left.
    IfPresent { param: String, body: Vec<Stmt> },
    /// If the caller asked for the list, run `body` until the instruction is
    /// consumed.
    WhileRemaining { param: String, body: Vec<Stmt> },
}

/// One generated function.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Procedure {
    pub direction: Direction,
    /// The instruction name without its `Op` prefix, e.g. `TypeInt`.
    pub opcode: String,
    pub params: Vec<Param>,
    pub body: Vec<Stmt>,
}

impl Procedure {
    /// `WriteTypeInt`, `ParseTypeInt`
    pub fn name(&self) -> String {
        match self.direction {
            Direction::Build => format!("Write{}", self.opcode),
            Direction::Parse => format!("Parse{}", self.opcode),
        }
    }

    /// `write_type_int`, `parse_type_int`
    pub fn rust_name(&self) -> String {
        self.name().to_snake_case()
    }

    /// Whether the parser hands out views into the parsed instruction.
    pub fn borrows_instruction(&self) -> bool {
        self.params.iter().any(|p| p.ty.borrows_instruction())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn procedure(direction: Direction, opcode: &str) -> Procedure {
        Procedure {
            direction,
            opcode: opcode.to_string(),
            params: vec![],
            body: vec![],
        }
    }

    #[test]
    fn names() {
        let build = procedure(Direction::Build, "TypeInt");
        assert_eq!(build.name(), "WriteTypeInt");
        assert_eq!(build.rust_name(), "write_type_int");

        let parse = procedure(Direction::Parse, "SubgroupBallotKHR");
        assert_eq!(parse.name(), "ParseSubgroupBallotKHR");
        assert_eq!(parse.rust_name(), "parse_subgroup_ballot_khr");

        let parse = procedure(Direction::Parse, "BeginInvocationInterlockEXT");
        assert_eq!(parse.rust_name(), "parse_begin_invocation_interlock_ext");
    }

    #[test]
    fn lifetimes() {
        let mut parse = procedure(Direction::Parse, "Name");
        parse.params.push(Param {
            name: "name".to_string(),
            ty: ParamType::OutStr,
        });
        assert!(parse.borrows_instruction());
        assert!(!procedure(Direction::Parse, "Nop").borrows_instruction());
    }
}
