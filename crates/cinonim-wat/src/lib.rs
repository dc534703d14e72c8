//! WebAssembly text generator for the Cinonim language.
//!
//! This crate lowers a typed Cinonim AST (see [`cinonim_ast`]) to the
//! WebAssembly text format. Generation is a pure function of the AST: one
//! module node in, one WAT document or one [`WatCodegenError`] out.
//!
//! ## Usage
//!
//! ```
//! use cinonim_ast::{Node, NumericKind};
//! use cinonim_wat::ast_to_wat;
//!
//! let module = Node::module(vec![
//!     Node::global_var("foo", NumericKind::F64, "3.14"),
//! ]);
//! assert_eq!(
//!     ast_to_wat(&module).unwrap(),
//!     "(module\n    (global $foo (mut f64) (f64.const 3.14))\n)"
//! );
//! ```
//!
//! ## Output Shape
//!
//! - Expressions are emitted as one line of flat instructions, e.g.
//!   `(local.get $a) (local.get $b) (i32.add)`.
//! - Leading local declarations of a function are hoisted ahead of its body.
//! - Each function body sits in `(block $_return ...)`; `return` branches to
//!   that block carrying its value.
//! - Loops are `(block $break_D (loop $continue_D ...))` pairs, where `D` is
//!   the nesting depth at which the loop starts.
//!
//! ## Type Mapping
//!
//! - `int` → `i32`
//! - `long` → `i64`
//! - `float` → `f32`
//! - `double` → `f64`

#![cfg_attr(not(feature = "std"), no_std)]
#![forbid(unsafe_code)]

#[cfg(any(feature = "alloc", feature = "std"))]
extern crate alloc;

#[cfg(any(feature = "alloc", feature = "std"))]
mod codegen;
#[cfg(any(feature = "alloc", feature = "std"))]
mod emitter;
#[cfg(any(feature = "alloc", feature = "std"))]
mod error;
#[cfg(any(feature = "alloc", feature = "std"))]
mod expr;
#[cfg(any(feature = "alloc", feature = "std"))]
mod stmt;
#[cfg(any(feature = "alloc", feature = "std"))]
pub mod tables;

#[cfg(any(feature = "alloc", feature = "std"))]
pub use codegen::{ast_to_wat, ast_to_wat_with_options, WatCodegen, WatCodegenOptions};
#[cfg(any(feature = "alloc", feature = "std"))]
pub use error::{ErrorKind, NodeContext, WatCodegenError};
#[cfg(any(feature = "alloc", feature = "std"))]
pub use expr::{lower_expression, result_kind};
