//! Turn the instructions of a grammar into builder and parser procedures.

use crate::config::Config;
use crate::error::Error;
use crate::expand::expand;
use crate::grammar::{Grammar, Instruction};
use crate::operand::{make_idents_unique, Classifier, Operand, Shape};
use crate::procedure::{Direction, Param, Procedure, Source, Stmt, Target};
use crate::resolve::{Exclusion, Exclusions};
use log::{debug, info, trace};
use std::collections::HashSet;

/// The functions generated for one instruction.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcedurePair {
    pub builder: Procedure,
    /// Instructions without operands have nothing to parse.
    pub parser: Option<Procedure>,
}

/// All generated functions, in instruction declaration order.
#[derive(Debug, Default, Clone)]
pub struct Codecs {
    pub builders: Vec<Procedure>,
    pub parsers: Vec<Procedure>,
    /// Instructions left out, with the reason.
    pub excluded: Vec<(String, Exclusion)>,
}

/// Generates the procedures for every supported instruction of `grammar`.
pub fn emit(grammar: &Grammar, config: &Config) -> Result<Codecs, Error> {
    let exclusions = Exclusions::resolve(grammar, config);
    let classifier = Classifier::new(config.engine_defined_kinds(), grammar.bit_mask_kinds());

    let mut codecs = Codecs::default();
    let mut names = HashSet::new();
    for inst in &grammar.instructions {
        let opcode = inst.opname.strip_prefix("Op").ok_or_else(|| {
            Error::grammar(format!(
                "instruction {} (opcode {}) does not start with `Op`",
                inst.opname, inst.opcode
            ))
        })?;
        if let Some(reason) = exclusions.exclusion(inst) {
            debug!("Skipping {}: {reason}", inst.opname);
            codecs.excluded.push((inst.opname.clone(), reason));
            continue;
        }

        let pair = emit_instruction(&classifier, inst, opcode)?;
        if !names.insert(pair.builder.rust_name()) {
            return Err(Error::grammar(format!(
                "{} maps to the same function name as an earlier instruction",
                inst.opname
            )));
        }
        codecs.builders.push(pair.builder);
        codecs.parsers.extend(pair.parser);
    }

    info!(
        "Generated {} builders and {} parsers, skipped {} instructions",
        codecs.builders.len(),
        codecs.parsers.len(),
        codecs.excluded.len()
    );
    Ok(codecs)
}

/// Generates the procedures of one supported instruction; `opcode` is its
/// name without the `Op` prefix.
pub fn emit_instruction(
    classifier: &Classifier<'_>,
    inst: &Instruction,
    opcode: &str,
) -> Result<ProcedurePair, Error> {
    let mut operands = expand(&inst.opname, &inst.operands)?
        .iter()
        .map(|o| classifier.classify(&inst.opname, o))
        .collect::<Result<Vec<_>, _>>()?;
    make_idents_unique(&mut operands);

    let builder = Procedure {
        direction: Direction::Build,
        opcode: opcode.to_string(),
        params: operands
            .iter()
            .map(|o| Param {
                name: o.ident.clone(),
                ty: o.input_type(),
            })
            .collect(),
        body: builder_body(&operands),
    };
    trace!("{}: {:?}", builder.name(), builder.params);

    if inst.operands.is_empty() {
        return Ok(ProcedurePair {
            builder,
            parser: None,
        });
    }

    let parser = Procedure {
        direction: Direction::Parse,
        opcode: opcode.to_string(),
        params: operands
            .iter()
            .map(|o| Param {
                name: o.ident.clone(),
                ty: o.output_type(),
            })
            .collect(),
        body: parser_body(&operands),
    };
    trace!("{}: {:?}", parser.name(), parser.params);

    Ok(ProcedurePair {
        builder,
        parser: Some(parser),
    })
}

fn builder_body(operands: &[Operand]) -> Vec<Stmt> {
    let mut body = vec![Stmt::ReserveHeader];
    for o in operands {
        let param = o.ident.clone();
        body.push(match o.shape {
            Shape::Scalar => Stmt::Push {
                source: Source::Param(param),
                encoding: o.encoding,
            },
            Shape::Optional => Stmt::IfSome {
                body: vec![Stmt::Push {
                    source: Source::Param(param.clone()),
                    encoding: o.encoding,
                }],
                param,
            },
            Shape::Repeated | Shape::Trailing => Stmt::ForEach {
                param,
                body: vec![Stmt::Push {
                    source: Source::Element,
                    encoding: o.encoding,
                }],
            },
        });
    }
    body.push(Stmt::PatchHeader);
    body
}

fn parser_body(operands: &[Operand]) -> Vec<Stmt> {
    let mut body = vec![Stmt::ReadHeader];
    for o in operands {
        let read = |target| Stmt::Read {
            param: o.ident.clone(),
            target,
            encoding: o.encoding,
            ty: o.ty.clone(),
        };
        body.push(match o.shape {
            Shape::Scalar => read(Target::Assign),
            Shape::Optional => Stmt::IfPresent {
                param: o.ident.clone(),
                body: vec![read(Target::AssignSome)],
            },
            Shape::Repeated | Shape::Trailing => Stmt::WhileRemaining {
                param: o.ident.clone(),
                body: vec![read(Target::Append)],
            },
        });
    }
    body
}
