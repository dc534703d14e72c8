//! Expression lowering.
//!
//! Expressions arrive in evaluation order, so lowering is a left-to-right
//! translation of each term into one instruction. Operators and casts act on
//! values pushed by the preceding terms.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use cinonim_ast::{Node, NodeKind, NumericKind};

use crate::codegen::value_type_of;
use crate::error::{ErrorKind, WatCodegenError};
use crate::tables::{binary_instruction, conversion, storage_prefix, BinaryOp, Conversion};

/// Lower an expression to a single line of space-separated instructions.
///
/// `node` may be an [`NodeKind::Expression`] or a single term such as a
/// literal or variable read.
pub fn lower_expression(node: &Node) -> Result<String, WatCodegenError> {
    let mut instrs = Vec::new();
    push_term(node, &mut instrs)?;
    Ok(instrs.join(" "))
}

fn push_term(node: &Node, instrs: &mut Vec<String>) -> Result<(), WatCodegenError> {
    match &node.kind {
        NodeKind::Number { ty, literal } => {
            instrs.push(format!("({}.const {})", value_type_of(*ty, node)?, literal));
        }

        NodeKind::Get { storage, name, ty } => {
            value_type_of(*ty, node)?;
            instrs.push(format!("({}.get ${})", storage_prefix(*storage), name));
        }

        NodeKind::Operator { ty, symbol } => {
            value_type_of(*ty, node)?;
            let instr = BinaryOp::from_symbol(symbol)
                .and_then(|op| binary_instruction(op, *ty))
                .ok_or_else(|| {
                    WatCodegenError::new(
                        ErrorKind::UnsupportedOperator,
                        format!("no instruction for `{}` on {}", symbol, ty),
                        node,
                    )
                })?;
            instrs.push(format!("({})", instr));
        }

        NodeKind::Cast { from, to } => match conversion(*from, *to) {
            Some(Conversion::Identity) => {}
            Some(Conversion::Convert(instr)) => instrs.push(format!("({})", instr)),
            None => {
                return Err(WatCodegenError::new(
                    ErrorKind::UnsupportedCast,
                    format!("cannot convert {} to {}", from, to),
                    node,
                ))
            }
        },

        NodeKind::Expression { terms, .. } => {
            if terms.is_empty() {
                return Err(WatCodegenError::new(
                    ErrorKind::MalformedExpression,
                    "empty expression",
                    node,
                ));
            }
            for term in terms {
                push_term(term, instrs)?;
            }
        }

        NodeKind::Module(_)
        | NodeKind::Global { .. }
        | NodeKind::ExportFunc { .. }
        | NodeKind::Function { .. }
        | NodeKind::ParamList(_)
        | NodeKind::LocalVar { .. }
        | NodeKind::Set { .. }
        | NodeKind::Return(_)
        | NodeKind::Break { .. }
        | NodeKind::Continue { .. }
        | NodeKind::For { .. }
        | NodeKind::Do { .. }
        | NodeKind::While { .. }
        | NodeKind::If { .. } => return Err(WatCodegenError::malformed_expression(node)),
    }
    Ok(())
}

/// The kind of the value an expression leaves on the stack.
///
/// Comparisons produce `i32` whatever their operand kind. Returns
/// [`NumericKind::NotApplicable`] for nodes that are not expressions.
pub fn result_kind(node: &Node) -> NumericKind {
    match &node.kind {
        NodeKind::Number { ty, .. } | NodeKind::Get { ty, .. } => *ty,
        NodeKind::Operator { ty, symbol } => match BinaryOp::from_symbol(symbol) {
            Some(op) if op.is_comparison() => NumericKind::I32,
            _ => *ty,
        },
        NodeKind::Cast { to, .. } => *to,
        NodeKind::Expression { ty, terms } => terms.last().map_or(*ty, result_kind),
        _ => NumericKind::NotApplicable,
    }
}
