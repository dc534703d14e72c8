//! Diagnostics for WAT generation.
//!
//! Every failure is fatal: the first error aborts generation and no partial
//! output is returned.

use alloc::string::{String, ToString};
use core::fmt;

use cinonim_ast::{Node, NumericKind, SourcePos};

/// Classification of a generation failure.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    /// A value-bearing node has a kind other than `i32`, `i64`, `f32` or `f64`.
    UnsupportedNumericKind,
    /// An operator symbol has no instruction for the resolved numeric kind.
    UnsupportedOperator,
    /// A cast between two kinds that the conversion matrix does not cover.
    UnsupportedCast,
    /// A node that cannot appear inside an expression.
    MalformedExpression,
    /// A node that cannot appear as a statement.
    MalformedStatement,
    /// A node that cannot appear at module level or in a declaration.
    MalformedModule,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ErrorKind::UnsupportedNumericKind => "UnsupportedNumericKind",
            ErrorKind::UnsupportedOperator => "UnsupportedOperator",
            ErrorKind::UnsupportedCast => "UnsupportedCast",
            ErrorKind::MalformedExpression => "MalformedExpression",
            ErrorKind::MalformedStatement => "MalformedStatement",
            ErrorKind::MalformedModule => "MalformedModule",
        };
        f.write_str(name)
    }
}

/// What the offending node looked like.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NodeContext {
    /// The node kind name, e.g. `"LocalSet"`.
    pub kind: &'static str,
    pub numeric_kind: Option<NumericKind>,
    /// The node's name, literal text or operator symbol.
    pub value: Option<String>,
}

impl NodeContext {
    pub fn of(node: &Node) -> Self {
        Self {
            kind: node.kind_name(),
            numeric_kind: node.numeric_kind(),
            value: node.label().map(ToString::to_string),
        }
    }
}

impl fmt::Display for NodeContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.kind)?;
        if let Some(kind) = self.numeric_kind {
            write!(f, " {}", kind)?;
        }
        if let Some(value) = &self.value {
            write!(f, " `{}`", value)?;
        }
        Ok(())
    }
}

/// Error type for WAT code generation.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{kind} at {pos}: {message} [{node}]")]
pub struct WatCodegenError {
    pub kind: ErrorKind,
    pub message: String,
    pub pos: SourcePos,
    pub node: NodeContext,
}

impl WatCodegenError {
    pub fn new(kind: ErrorKind, message: impl Into<String>, node: &Node) -> Self {
        Self {
            kind,
            message: message.into(),
            pos: node.pos,
            node: NodeContext::of(node),
        }
    }

    pub(crate) fn numeric_kind(kind: NumericKind, node: &Node) -> Self {
        Self::new(
            ErrorKind::UnsupportedNumericKind,
            alloc::format!("`{}` is not a value type", kind),
            node,
        )
    }

    pub(crate) fn malformed_expression(node: &Node) -> Self {
        Self::new(
            ErrorKind::MalformedExpression,
            alloc::format!("{} cannot appear in an expression", node.kind_name()),
            node,
        )
    }

    pub(crate) fn malformed_statement(message: impl Into<String>, node: &Node) -> Self {
        Self::new(ErrorKind::MalformedStatement, message, node)
    }

    pub(crate) fn malformed_module(message: impl Into<String>, node: &Node) -> Self {
        Self::new(ErrorKind::MalformedModule, message, node)
    }
}
