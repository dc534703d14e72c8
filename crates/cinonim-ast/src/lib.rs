//! AST types for the Cinonim language.
//!
//! The parser hands the code generator a single [`Node`] of kind
//! [`NodeKind::Module`]. Every node carries its [`SourcePos`] so that later
//! stages can report diagnostics against the original source text.
//!
//! # Numeric Kinds
//!
//! Cinonim has four value kinds, mirroring the WebAssembly number types:
//!
//! | Cinonim  | [`NumericKind`] |
//! |----------|-----------------|
//! | `int`    | `I32`           |
//! | `long`   | `I64`           |
//! | `float`  | `F32`           |
//! | `double` | `F64`           |
//!
//! `void` is a valid function result only. Nodes that neither produce nor
//! consume a value report [`NumericKind::NotApplicable`].

#![no_std]
#![forbid(unsafe_code)]

#[cfg(feature = "alloc")]
extern crate alloc;

#[cfg(feature = "alloc")]
mod ast;
#[cfg(feature = "alloc")]
mod build;

#[cfg(feature = "alloc")]
pub use ast::*;
