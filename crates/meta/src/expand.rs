//! Append the operands some kinds imply without declaring them.
//!
//! A `Decoration`, `ExecutionMode` or `ImageOperands` operand is followed on
//! the wire by a variable number of words whose meaning depends on its value.
//! The grammar does not list those; the generated code treats them as one
//! trailing list.

use crate::error::Error;
use crate::grammar::{OperandDecl, Quantifier};

/// One trailing-operand rule: an operand of `kind` is followed by a list
/// named `name` of `element` kind.
#[derive(Debug, Clone, Copy)]
pub struct TrailingOperand {
    pub kind: &'static str,
    pub name: &'static str,
    pub element: &'static str,
}

pub const TRAILING_OPERANDS: &[TrailingOperand] = &[
    TrailingOperand {
        kind: "Decoration",
        name: "values",
        element: "LiteralInteger",
    },
    TrailingOperand {
        kind: "ExecutionMode",
        name: "operands",
        element: "LiteralInteger",
    },
    TrailingOperand {
        kind: "ImageOperands",
        name: "imageOperandIds",
        element: "IdRef",
    },
];

/// An operand as declared by the grammar, or implied by [`TRAILING_OPERANDS`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExpandedOperand {
    pub decl: OperandDecl,
    pub synthetic: bool,
}

fn trailing_operand(kind: &str) -> Option<&'static TrailingOperand> {
    TRAILING_OPERANDS.iter().find(|t| t.kind == kind)
}

/// The operand list of `opname`, with implied operands appended.
///
/// Fails if a kind with a trailing operand is not the last declared operand,
/// or if a list would not be the last operand (at most one list per
/// instruction).
pub fn expand(opname: &str, operands: &[OperandDecl]) -> Result<Vec<ExpandedOperand>, Error> {
    let mut expanded = Vec::with_capacity(operands.len() + 1);
    for (i, decl) in operands.iter().enumerate() {
        let last = i + 1 == operands.len();
        if decl.quantifier == Quantifier::Repeated && !last {
            return Err(Error::grammar(format!(
                "{opname}: repeated operand {} of kind {} is not the last operand",
                i, decl.kind
            )));
        }
        expanded.push(ExpandedOperand {
            decl: decl.clone(),
            synthetic: false,
        });

        if let Some(trailing) = trailing_operand(&decl.kind) {
            if !last {
                return Err(Error::grammar(format!(
                    "{opname}: {} operand must be the last operand",
                    decl.kind
                )));
            }
            if decl.quantifier == Quantifier::Repeated {
                return Err(Error::grammar(format!(
                    "{opname}: a list of {} cannot be followed by its operands",
                    decl.kind
                )));
            }
            expanded.push(ExpandedOperand {
                decl: OperandDecl::new(trailing.element, trailing.name, Quantifier::Repeated),
                synthetic: true,
            });
        }
    }
    Ok(expanded)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn decl(kind: &str, quantifier: Quantifier) -> OperandDecl {
        OperandDecl {
            kind: kind.to_string(),
            name: None,
            quantifier,
        }
    }

    fn kinds(operands: &[ExpandedOperand]) -> Vec<(&str, bool)> {
        operands
            .iter()
            .map(|o| (o.decl.kind.as_str(), o.synthetic))
            .collect()
    }

    #[test]
    fn trailing_operands_are_appended_last() {
        let decorate = [decl("IdRef", Quantifier::One), decl("Decoration", Quantifier::One)];
        let expanded = expand("OpDecorate", &decorate).unwrap();
        assert_eq!(
            kinds(&expanded),
            [("IdRef", false), ("Decoration", false), ("LiteralInteger", true)]
        );
        let values = &expanded[2].decl;
        assert_eq!(values.name.as_deref(), Some("values"));
        assert_eq!(values.quantifier, Quantifier::Repeated);

        let mode = [decl("IdRef", Quantifier::One), decl("ExecutionMode", Quantifier::One)];
        let expanded = expand("OpExecutionMode", &mode).unwrap();
        assert_eq!(expanded[2].decl.name.as_deref(), Some("operands"));

        let sample = [
            decl("IdResultType", Quantifier::One),
            decl("IdResult", Quantifier::One),
            decl("IdRef", Quantifier::One),
            decl("IdRef", Quantifier::One),
            decl("ImageOperands", Quantifier::Optional),
        ];
        let expanded = expand("OpImageSampleImplicitLod", &sample).unwrap();
        assert_eq!(expanded.len(), 6);
        assert_eq!(expanded[5].decl.kind, "IdRef");
        assert_eq!(expanded[5].decl.name.as_deref(), Some("imageOperandIds"));
        assert!(expanded[5].synthetic);
    }

    #[test]
    fn plain_operands_are_unchanged() {
        let ops = [decl("IdRef", Quantifier::One), decl("IdRef", Quantifier::Repeated)];
        let expanded = expand("OpCompositeConstruct", &ops).unwrap();
        assert_eq!(kinds(&expanded), [("IdRef", false), ("IdRef", false)]);
        assert!(expand("OpNop", &[]).unwrap().is_empty());
    }

    #[test]
    fn misplaced_operands() {
        let ops = [decl("Decoration", Quantifier::One), decl("IdRef", Quantifier::One)];
        let err = expand("OpBadDecorate", &ops).unwrap_err();
        assert!(err.to_string().contains("OpBadDecorate"));

        let ops = [decl("IdRef", Quantifier::Repeated), decl("IdRef", Quantifier::One)];
        assert!(expand("OpBadList", &ops).is_err());

        let ops = [decl("Decoration", Quantifier::Repeated)];
        assert!(expand("OpDecorations", &ops).is_err());
    }

    #[test]
    fn at_most_one_list_and_it_is_last() {
        let ops = [
            decl("IdRef", Quantifier::One),
            decl("LiteralInteger", Quantifier::Optional),
            decl("ExecutionMode", Quantifier::One),
        ];
        let expanded = expand("OpExecutionModeLike", &ops).unwrap();
        let lists: Vec<_> = expanded
            .iter()
            .enumerate()
            .filter(|(_, o)| o.decl.quantifier == Quantifier::Repeated)
            .map(|(i, _)| i)
            .collect();
        assert_eq!(lists, [expanded.len() - 1]);
    }
}
