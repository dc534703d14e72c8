//! Statement lowering.
//!
//! Loops become a `block`/`loop` pair labelled with the nesting depth `D` at
//! which the loop starts:
//!
//! ```text
//! (block $break_D
//! (loop  $continue_D
//!     ...
//! ))
//! ```
//!
//! Sibling loops at the same depth reuse the same labels; WAT resolves a
//! label to its innermost enclosing definition, and nested loops always sit
//! at a greater depth than their parent.
//!
//! `for` loops with increments and `do` loops continue somewhere other than
//! the loop head. When their body holds a `continue` aimed at them, the body
//! is wrapped in `(block $continue_D ...)` and the loop is labelled
//! `$loop_D` instead, so the increment or condition still runs.

use alloc::format;
use alloc::string::String;

use cinonim_ast::{Node, NodeKind, NumericKind};

use crate::codegen::WatCodegen;
use crate::error::WatCodegenError;
use crate::expr::{lower_expression, result_kind};
use crate::tables::{storage_prefix, value_type};

/// A loop enclosing the statement being lowered.
#[derive(Clone, Copy, Debug)]
pub(crate) struct LoopFrame<'a> {
    depth: usize,
    outer: Option<&'a LoopFrame<'a>>,
}

/// Lowering context threaded through a function body.
#[derive(Clone, Copy, Debug)]
pub(crate) struct Scope<'a> {
    /// Result kind of the enclosing function.
    result: NumericKind,
    /// Innermost enclosing loop.
    innermost: Option<&'a LoopFrame<'a>>,
}

impl<'a> Scope<'a> {
    pub(crate) fn function(result: NumericKind) -> Self {
        Self {
            result,
            innermost: None,
        }
    }

    fn in_loop(self, frame: &'a LoopFrame<'a>) -> Scope<'a> {
        Scope {
            result: self.result,
            innermost: Some(frame),
        }
    }

    fn frame(self, depth: usize) -> LoopFrame<'a> {
        LoopFrame {
            depth,
            outer: self.innermost,
        }
    }

    /// Depth label of the loop `levels` out; `1` is the innermost loop.
    fn loop_depth(self, levels: u32) -> Option<usize> {
        let mut frame = self.innermost?;
        for _ in 1..levels {
            frame = frame.outer?;
        }
        (levels > 0).then_some(frame.depth)
    }
}

/// How a loop exposes its `continue` target.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum LoopShape {
    /// The loop itself is `$continue_D`.
    Plain,
    /// The loop is `$loop_D` and the body sits in `(block $continue_D ...)`.
    Wrapped,
}

impl LoopShape {
    fn loop_label(self, depth: usize) -> String {
        match self {
            LoopShape::Plain => format!("$continue_{}", depth),
            LoopShape::Wrapped => format!("$loop_{}", depth),
        }
    }
}

impl WatCodegen {
    pub(crate) fn lower_statements(
        &mut self,
        stmts: &[Node],
        depth: usize,
        scope: Scope<'_>,
    ) -> Result<(), WatCodegenError> {
        for stmt in stmts {
            self.lower_statement(stmt, depth, scope)?;
        }
        Ok(())
    }

    fn lower_statement(
        &mut self,
        stmt: &Node,
        depth: usize,
        scope: Scope<'_>,
    ) -> Result<(), WatCodegenError> {
        match &stmt.kind {
            NodeKind::LocalVar { name, .. } => {
                log::warn!(
                    "{}: declaration of `{}` after the first statement is ignored",
                    stmt.pos,
                    name
                );
            }

            NodeKind::Set { .. } => {
                let line = assignment(stmt)?;
                self.emitter.emit(&line, depth);
            }

            NodeKind::Return(value) => self.lower_return(stmt, value.as_deref(), depth, scope)?,

            NodeKind::Break { levels } => {
                let target = branch_target(stmt, *levels, scope)?;
                self.emitter.emit(&format!("(br $break_{})", target), depth);
            }

            NodeKind::Continue { levels } => {
                let target = branch_target(stmt, *levels, scope)?;
                self.emitter.emit(&format!("(br $continue_{})", target), depth);
            }

            NodeKind::While { condition, body } => {
                let frame = scope.frame(depth);
                let inner = scope.in_loop(&frame);
                log::trace!("{}: while loop labelled {}", stmt.pos, depth);

                self.emitter.emit(&format!("(block $break_{}", depth), depth);
                self.emitter.emit(&format!("(loop  $continue_{}", depth), depth);
                let guard = exit_guard(condition, depth)?;
                self.emitter.emit(&guard, depth + 1);
                self.lower_statements(body, depth + 1, inner)?;
                self.emitter.emit(&format!("(br $continue_{})", depth), depth + 1);
                self.emitter.emit("))", depth);
            }

            NodeKind::Do { body, condition } => {
                let frame = scope.frame(depth);
                let inner = scope.in_loop(&frame);
                let shape = shape_for(body, true);
                log::trace!("{}: do loop labelled {} ({:?})", stmt.pos, depth, shape);

                self.emitter.emit(&format!("(block $break_{}", depth), depth);
                self.emitter.emit(&format!("(loop  {}", shape.loop_label(depth)), depth);
                self.lower_loop_body(body, depth, shape, inner)?;
                let test = truth_test(condition)?;
                self.emitter.emit(
                    &format!("(br_if {} {})", shape.loop_label(depth), test),
                    depth + 1,
                );
                self.emitter.emit("))", depth);
            }

            NodeKind::For {
                init,
                condition,
                increment,
                body,
            } => {
                for assign in init {
                    let line = assignment(assign)?;
                    self.emitter.emit(&line, depth);
                }

                let frame = scope.frame(depth);
                let inner = scope.in_loop(&frame);
                let shape = shape_for(body, !increment.is_empty());
                log::trace!("{}: for loop labelled {} ({:?})", stmt.pos, depth, shape);

                self.emitter.emit(&format!("(block $break_{}", depth), depth);
                self.emitter.emit(&format!("(loop  {}", shape.loop_label(depth)), depth);
                if let Some(condition) = condition {
                    let guard = exit_guard(condition, depth)?;
                    self.emitter.emit(&guard, depth + 1);
                }
                self.lower_loop_body(body, depth, shape, inner)?;
                for assign in increment {
                    let line = assignment(assign)?;
                    self.emitter.emit(&line, depth + 1);
                }
                self.emitter
                    .emit(&format!("(br {})", shape.loop_label(depth)), depth + 1);
                self.emitter.emit("))", depth);
            }

            NodeKind::If {
                condition,
                then_branch,
                else_branch,
            } => {
                let test = truth_test(condition)?;
                self.emitter.emit(&test, depth);
                self.emitter.emit("(if (then", depth);
                self.lower_statements(then_branch, depth + 1, scope)?;
                if let Some(else_branch) = else_branch {
                    self.emitter.emit(")(else", depth);
                    self.lower_statements(else_branch, depth + 1, scope)?;
                }
                self.emitter.emit("))", depth);
            }

            NodeKind::Module(_)
            | NodeKind::Global { .. }
            | NodeKind::ExportFunc { .. }
            | NodeKind::Function { .. }
            | NodeKind::ParamList(_)
            | NodeKind::Get { .. }
            | NodeKind::Number { .. }
            | NodeKind::Expression { .. }
            | NodeKind::Operator { .. }
            | NodeKind::Cast { .. } => {
                return Err(WatCodegenError::malformed_statement(
                    format!("{} cannot appear as a statement", stmt.kind_name()),
                    stmt,
                ))
            }
        }
        Ok(())
    }

    fn lower_loop_body(
        &mut self,
        body: &[Node],
        depth: usize,
        shape: LoopShape,
        scope: Scope<'_>,
    ) -> Result<(), WatCodegenError> {
        match shape {
            LoopShape::Plain => self.lower_statements(body, depth + 1, scope),
            LoopShape::Wrapped => {
                self.emitter
                    .emit(&format!("(block $continue_{}", depth), depth + 1);
                self.lower_statements(body, depth + 2, scope)?;
                self.emitter.emit(")", depth + 1);
                Ok(())
            }
        }
    }

    fn lower_return(
        &mut self,
        stmt: &Node,
        value: Option<&Node>,
        depth: usize,
        scope: Scope<'_>,
    ) -> Result<(), WatCodegenError> {
        let label = &self.options.return_label;
        let line = match (value, scope.result) {
            (Some(value), result) if result.is_value() => {
                format!("(br ${} {})", label, lower_expression(value)?)
            }
            (None, NumericKind::Void) => format!("(br ${})", label),
            (Some(_), _) => {
                return Err(WatCodegenError::malformed_statement(
                    "void function cannot return a value",
                    stmt,
                ))
            }
            (None, result) => {
                return Err(WatCodegenError::malformed_statement(
                    format!("missing {} return value", result),
                    stmt,
                ))
            }
        };
        self.emitter.emit(&line, depth);
        Ok(())
    }
}

/// `(local.set $x ...)` or `(global.set $x ...)` for an assignment node.
fn assignment(node: &Node) -> Result<String, WatCodegenError> {
    match &node.kind {
        NodeKind::Set {
            storage,
            name,
            value,
        } => Ok(format!(
            "({}.set ${} {})",
            storage_prefix(*storage),
            name,
            lower_expression(value)?
        )),
        _ => Err(WatCodegenError::malformed_statement(
            format!("expected an assignment, found {}", node.kind_name()),
            node,
        )),
    }
}

fn branch_target(
    stmt: &Node,
    levels: Option<u32>,
    scope: Scope<'_>,
) -> Result<usize, WatCodegenError> {
    let levels = levels.unwrap_or(1);
    scope.loop_depth(levels).ok_or_else(|| {
        let message = if scope.innermost.is_none() {
            format!("{} outside of a loop", stmt.kind_name())
        } else {
            format!("{} level {} does not name an enclosing loop", stmt.kind_name(), levels)
        };
        WatCodegenError::malformed_statement(message, stmt)
    })
}

/// The loop guard: leave `$break_D` when the condition is false.
fn exit_guard(condition: &Node, depth: usize) -> Result<String, WatCodegenError> {
    let expr = lower_expression(condition)?;
    let guard = match result_kind(condition) {
        kind @ (NumericKind::I32 | NumericKind::I64) => {
            format!("(br_if $break_{} ({}.eqz {}))", depth, type_name(kind), expr)
        }
        kind => {
            let ty = float_type(kind, condition)?;
            format!("(br_if $break_{} {} ({}.const 0) ({}.eq))", depth, expr, ty, ty)
        }
    };
    Ok(guard)
}

/// A condition normalized to an `i32` truth value.
fn truth_test(condition: &Node) -> Result<String, WatCodegenError> {
    let expr = lower_expression(condition)?;
    let test = match result_kind(condition) {
        NumericKind::I32 => expr,
        NumericKind::I64 => format!("{} (i64.const 0) (i64.ne)", expr),
        kind => {
            let ty = float_type(kind, condition)?;
            format!("{} ({}.const 0) ({}.ne)", expr, ty, ty)
        }
    };
    Ok(test)
}

fn type_name(kind: NumericKind) -> &'static str {
    value_type(kind).unwrap_or("i32")
}

fn float_type(kind: NumericKind, node: &Node) -> Result<&'static str, WatCodegenError> {
    match kind {
        NumericKind::F32 | NumericKind::F64 => Ok(type_name(kind)),
        _ => Err(WatCodegenError::numeric_kind(kind, node)),
    }
}

fn shape_for(body: &[Node], continues_elsewhere: bool) -> LoopShape {
    if continues_elsewhere && continues_here(body, 0) {
        LoopShape::Wrapped
    } else {
        LoopShape::Plain
    }
}

/// Whether `stmts` holds a `continue` aimed at the loop `nesting` levels out.
fn continues_here(stmts: &[Node], nesting: u32) -> bool {
    stmts.iter().any(|stmt| match &stmt.kind {
        NodeKind::Continue { levels } => levels.unwrap_or(1) == nesting + 1,
        NodeKind::If {
            then_branch,
            else_branch,
            ..
        } => {
            continues_here(then_branch, nesting)
                || else_branch
                    .as_deref()
                    .is_some_and(|branch| continues_here(branch, nesting))
        }
        NodeKind::While { body, .. } | NodeKind::Do { body, .. } | NodeKind::For { body, .. } => {
            continues_here(body, nesting + 1)
        }
        _ => false,
    })
}
