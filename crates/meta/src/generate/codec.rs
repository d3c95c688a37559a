//! Render builder and parser procedures as Rust functions.

use super::{fmtln, Formatter};
use crate::operand::{Encoding, PairKind, WireType};
use crate::procedure::{Direction, Procedure, Source, Stmt, Target};

impl Procedure {
    /// `pub fn write_<op>(blob: &mut Blob, ...) { ... }` or
    /// `pub fn parse_<op>(instruction: &[u32], ...) { ... }`
    pub fn generate(&self, f: &mut Formatter) {
        f.line(format!("/// `Op{}`", self.opcode), None);
        let name = self.rust_name();
        let signature = match self.direction {
            Direction::Build => {
                let params = self.generate_params("blob: &mut Blob");
                format!("pub fn {name}({params})")
            }
            Direction::Parse if self.borrows_instruction() => {
                let params = self.generate_params("instruction: &'a [u32]");
                format!("pub fn {name}<'a>({params})")
            }
            Direction::Parse => {
                let params = self.generate_params("instruction: &[u32]");
                format!("pub fn {name}({params})")
            }
        };
        f.add_block(&signature, |f| {
            for stmt in &self.body {
                stmt.generate(f, &self.opcode);
            }
        });
    }

    fn generate_params(&self, first: &str) -> String {
        let mut params = vec![first.to_string()];
        params.extend(self.params.iter().map(|p| format!("{}: {}", p.name, p.ty)));
        params.join(", ")
    }
}

impl Stmt {
    fn generate(&self, f: &mut Formatter, opcode: &str) {
        match self {
            Stmt::ReserveHeader => {
                fmtln!(f, "let start_size = blob.len();");
                fmtln!(f, "blob.push(0);");
            }
            Stmt::Push { source, encoding } => {
                let item = match source {
                    Source::Param(name) => name.as_str(),
                    Source::Element => "operand",
                };
                generate_push(f, item, matches!(source, Source::Element), *encoding);
            }
            Stmt::IfSome { param, body } => {
                f.add_block(&format!("if let Some({param}) = {param}"), |f| {
                    for stmt in body {
                        stmt.generate(f, opcode);
                    }
                });
            }
            Stmt::ForEach { param, body } => {
                f.add_block(&format!("for operand in {param}"), |f| {
                    for stmt in body {
                        stmt.generate(f, opcode);
                    }
                });
            }
            Stmt::PatchHeader => {
                fmtln!(
                    f,
                    "blob[start_size] = make_length_op(blob.len() - start_size, spv::Op::{opcode});"
                );
            }
            Stmt::ReadHeader => {
                fmtln!(f, "let (op, length) = get_instruction_op_and_length(instruction);");
                fmtln!(f, "assert_eq!(op, spv::Op::{opcode});");
                fmtln!(f, "let mut o = 1;");
            }
            Stmt::Read {
                param,
                target,
                encoding,
                ty,
            } => generate_read(f, param, *target, *encoding, ty),
            Stmt::IfPresent { param, body } => {
                f.add_block(&format!("if let Some({param}) = {param}"), |f| {
                    f.add_block("if o < length", |f| {
                        for stmt in body {
                            stmt.generate(f, opcode);
                        }
                    });
                });
            }
            Stmt::WhileRemaining { param, body } => {
                f.add_block(&format!("if let Some({param}) = {param}"), |f| {
                    f.add_block("while o < length", |f| {
                        for stmt in body {
                            stmt.generate(f, opcode);
                        }
                    });
                });
            }
        }
    }
}

/// `item` is a value, or a reference if it is a list element.
fn generate_push(f: &mut Formatter, item: &str, by_ref: bool, encoding: Encoding) {
    match encoding {
        Encoding::Word => {
            let deref = if by_ref { "*" } else { "" };
            fmtln!(f, "blob.push(u32::from({deref}{item}));");
        }
        Encoding::Pair(pair) => {
            for (field, _) in pair.fields() {
                fmtln!(f, "blob.push(u32::from({item}.{field}));");
            }
        }
        Encoding::String => {
            fmtln!(f, "push_literal_string(blob, {item});");
        }
    }
}

fn generate_read(f: &mut Formatter, param: &str, target: Target, encoding: Encoding, ty: &WireType) {
    let (value, words) = match encoding {
        Encoding::Word => (format!("{ty}::from(instruction[o])"), "1".to_string()),
        Encoding::Pair(pair) => (pair_expr(pair), "2".to_string()),
        Encoding::String => {
            fmtln!(f, "let literal = LiteralStr::from_words(&instruction[o..length]);");
            ("literal".to_string(), "literal.len() / 4 + 1".to_string())
        }
    };
    match target {
        Target::Assign => {
            fmtln!(f, "*{param} = {value};");
        }
        Target::AssignSome => {
            fmtln!(f, "*{param} = Some({value});");
        }
        Target::Append => {
            fmtln!(f, "{param}.push({value});");
        }
    }
    fmtln!(f, "o += {words};");
}

/// `PairIdRefIdRef { id1: IdRef::from(instruction[o]), id2: IdRef::from(instruction[o + 1]) }`
fn pair_expr(pair: PairKind) -> String {
    let [(first, first_ty), (second, second_ty)] = pair.fields();
    format!(
        "{} {{ {first}: {first_ty}::from(instruction[o]), {second}: {second_ty}::from(instruction[o + 1]) }}",
        pair.type_name()
    )
}

#[cfg(test)]
mod tests {
    use crate::emit::{emit, tests::GRAMMAR};
    use crate::generate::Formatter;
    use crate::grammar::tests::parse;
    use crate::Config;

    fn render(opcode: &str, parser: bool) -> String {
        let codecs = emit(&parse(GRAMMAR), &Config::default()).unwrap();
        let list = if parser { &codecs.parsers } else { &codecs.builders };
        let procedure = list.iter().find(|p| p.opcode == opcode).unwrap();
        let mut f = Formatter::default();
        procedure.generate(&mut f);
        // drop location comments, they change whenever this crate does
        f.contents()
            .lines()
            .map(|l| l.split(" // ").next().unwrap())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[test]
    fn builder_without_operands() {
        assert_eq!(
            render("Nop", false),
            "/// `OpNop`
pub fn write_nop(blob: &mut Blob) {
    let start_size = blob.len();
    blob.push(0);
    blob[start_size] = make_length_op(blob.len() - start_size, spv::Op::Nop);
}"
        );
    }

    #[test]
    fn builder_with_optionals_and_strings() {
        assert_eq!(
            render("Source", false),
            "/// `OpSource`
pub fn write_source(blob: &mut Blob, source_language: spv::SourceLanguage, version: LiteralInteger, file: Option<IdRef>, source: Option<&str>) {
    let start_size = blob.len();
    blob.push(0);
    blob.push(u32::from(source_language));
    blob.push(u32::from(version));
    if let Some(file) = file {
        blob.push(u32::from(file));
    }
    if let Some(source) = source {
        push_literal_string(blob, source);
    }
    blob[start_size] = make_length_op(blob.len() - start_size, spv::Op::Source);
}"
        );
    }

    #[test]
    fn builder_with_pairs() {
        let phi = render("Phi", false);
        assert!(phi.contains(
            "pub fn write_phi(blob: &mut Blob, id_result_type: IdResultType, id_result: IdResult, variable_parent_pair_list: &[PairIdRefIdRef])"
        ));
        assert!(phi.contains(
            "    for operand in variable_parent_pair_list {
        blob.push(u32::from(operand.id1));
        blob.push(u32::from(operand.id2));
    }"
        ));
    }

    #[test]
    fn parsers() {
        assert_eq!(
            render("Source", true),
            "/// `OpSource`
pub fn parse_source<'a>(instruction: &'a [u32], source_language: &mut spv::SourceLanguage, version: &mut LiteralInteger, file: Option<&mut Option<IdRef>>, source: Option<&mut Option<LiteralStr<'a>>>) {
    let (op, length) = get_instruction_op_and_length(instruction);
    assert_eq!(op, spv::Op::Source);
    let mut o = 1;
    *source_language = spv::SourceLanguage::from(instruction[o]);
    o += 1;
    *version = LiteralInteger::from(instruction[o]);
    o += 1;
    if let Some(file) = file {
        if o < length {
            *file = Some(IdRef::from(instruction[o]));
            o += 1;
        }
    }
    if let Some(source) = source {
        if o < length {
            let literal = LiteralStr::from_words(&instruction[o..length]);
            *source = Some(literal);
            o += literal.len() / 4 + 1;
        }
    }
}"
        );

        let phi = render("Phi", true);
        assert!(phi.starts_with("/// `OpPhi`\npub fn parse_phi(instruction: &[u32], "));
        assert!(phi.contains(
            "variable_parent_pair_list.push(PairIdRefIdRef { id1: IdRef::from(instruction[o]), id2: IdRef::from(instruction[o + 1]) });
            o += 2;"
        ));
    }
}
