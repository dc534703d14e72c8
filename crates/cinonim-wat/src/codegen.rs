//! Module and function assembly.
//!
//! Drives a depth-first walk over the module AST. Module items are lowered
//! here; function bodies are handed to the statement lowering in
//! [`crate::stmt`].

use alloc::format;
use alloc::string::{String, ToString};

use cinonim_ast::{Node, NodeKind, NumericKind};

use crate::emitter::Emitter;
use crate::error::WatCodegenError;
use crate::stmt::Scope;
use crate::tables::value_type;

/// Options for WAT generation.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct WatCodegenOptions {
    /// Spaces per nesting level (default: 4).
    pub indent_width: usize,
    /// Label of the block wrapping each function body (default: `_return`).
    ///
    /// Every `return` branches to this label. Labels are scoped to their
    /// function, so one name serves all functions in a module.
    pub return_label: String,
}

impl Default for WatCodegenOptions {
    fn default() -> Self {
        Self {
            indent_width: 4,
            return_label: "_return".to_string(),
        }
    }
}

impl WatCodegenOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_indent_width(mut self, width: usize) -> Self {
        self.indent_width = width;
        self
    }

    pub fn with_return_label(mut self, label: &str) -> Self {
        self.return_label = label.to_string();
        self
    }
}

/// WAT code generator for Cinonim modules.
///
/// Each call to [`WatCodegen::generate`] starts from an empty buffer, so one
/// instance may be reused and always yields the same text for the same AST.
pub struct WatCodegen {
    pub(crate) emitter: Emitter,
    pub(crate) options: WatCodegenOptions,
}

impl WatCodegen {
    pub fn new() -> Self {
        Self::with_options(WatCodegenOptions::default())
    }

    pub fn with_options(options: WatCodegenOptions) -> Self {
        Self {
            emitter: Emitter::new(options.indent_width),
            options,
        }
    }

    pub fn options(&self) -> &WatCodegenOptions {
        &self.options
    }

    /// Generate WAT text for a module node.
    pub fn generate(&mut self, module: &Node) -> Result<String, WatCodegenError> {
        self.emitter = Emitter::new(self.options.indent_width);

        let items = match &module.kind {
            NodeKind::Module(items) => items,
            _ => {
                return Err(WatCodegenError::malformed_module(
                    "expected a module at the root",
                    module,
                ))
            }
        };
        log::debug!("generating module with {} items", items.len());

        self.emitter.emit_raw("(module");
        if !items.is_empty() {
            self.emitter.emit_raw("\n");
            for item in items {
                self.lower_item(item, 1)?;
            }
        }
        self.emitter.emit_raw(")");

        let emitter = core::mem::replace(&mut self.emitter, Emitter::new(self.options.indent_width));
        Ok(emitter.finish())
    }

    fn lower_item(&mut self, item: &Node, depth: usize) -> Result<(), WatCodegenError> {
        match &item.kind {
            NodeKind::Global {
                mutable,
                name,
                ty,
                init,
            } => {
                let wat_ty = value_type_of(*ty, item)?;
                let literal = match &init.kind {
                    NodeKind::Number { literal, .. } => literal,
                    _ => {
                        return Err(WatCodegenError::malformed_module(
                            format!("global `{}` must be initialized from a literal", name),
                            init,
                        ))
                    }
                };
                let decl_ty = if *mutable {
                    format!("(mut {})", wat_ty)
                } else {
                    wat_ty.to_string()
                };
                self.emitter.emit(
                    &format!("(global ${} {} ({}.const {}))", name, decl_ty, wat_ty, literal),
                    depth,
                );
            }

            NodeKind::ExportFunc { name, alias } => {
                self.emitter
                    .emit(&format!("(export \"{}\" (func ${}))", alias, name), depth);
            }

            NodeKind::Function {
                name,
                result,
                params,
                body,
            } => {
                self.lower_function(item, name, *result, params, body, depth)?;
            }

            NodeKind::Module(_)
            | NodeKind::ParamList(_)
            | NodeKind::LocalVar { .. }
            | NodeKind::Get { .. }
            | NodeKind::Set { .. }
            | NodeKind::Number { .. }
            | NodeKind::Expression { .. }
            | NodeKind::Operator { .. }
            | NodeKind::Cast { .. }
            | NodeKind::Return(_)
            | NodeKind::Break { .. }
            | NodeKind::Continue { .. }
            | NodeKind::For { .. }
            | NodeKind::Do { .. }
            | NodeKind::While { .. }
            | NodeKind::If { .. } => {
                return Err(WatCodegenError::malformed_module(
                    format!("{} cannot appear at module level", item.kind_name()),
                    item,
                ))
            }
        }
        Ok(())
    }

    /// Header, hoisted locals, then the body inside the return block.
    fn lower_function(
        &mut self,
        func: &Node,
        name: &str,
        result: NumericKind,
        params: &Node,
        body: &[Node],
        depth: usize,
    ) -> Result<(), WatCodegenError> {
        log::debug!("generating function `{}`", name);

        let mut header = format!("(func ${}", name);
        let params = match &params.kind {
            NodeKind::ParamList(params) => params,
            _ => {
                return Err(WatCodegenError::malformed_module(
                    format!("function `{}` has no parameter list", name),
                    params,
                ))
            }
        };
        for param in params {
            let (param_name, ty) = declaration(param)?;
            header.push_str(&format!(" (param ${} {})", param_name, value_type_of(ty, param)?));
        }
        let result_ty = match result {
            NumericKind::Void => None,
            kind => Some(value_type_of(kind, func)?),
        };
        if let Some(ty) = result_ty {
            header.push_str(&format!(" (result {})", ty));
        }
        self.emitter.emit(&header, depth);

        let (locals, statements) = split_declarations(body);
        for local in locals {
            let (local_name, ty) = declaration(local)?;
            self.emitter.emit(
                &format!("(local ${} {})", local_name, value_type_of(ty, local)?),
                depth + 1,
            );
        }

        let block = match result_ty {
            Some(ty) => format!("(block ${} (result {})", self.options.return_label, ty),
            None => format!("(block ${}", self.options.return_label),
        };
        self.emitter.emit(&block, depth + 1);
        self.lower_statements(statements, depth + 2, Scope::function(result))?;
        self.emitter.emit(")", depth + 1);

        self.emitter.emit(")", depth);
        Ok(())
    }
}

impl Default for WatCodegen {
    fn default() -> Self {
        Self::new()
    }
}

/// Resolve a value type, reporting the offending node on failure.
pub(crate) fn value_type_of(kind: NumericKind, node: &Node) -> Result<&'static str, WatCodegenError> {
    value_type(kind).ok_or_else(|| WatCodegenError::numeric_kind(kind, node))
}

/// Split a function body into its leading `LocalVar` declarations and the rest.
fn split_declarations(body: &[Node]) -> (&[Node], &[Node]) {
    let split = body
        .iter()
        .position(|stmt| !matches!(stmt.kind, NodeKind::LocalVar { .. }))
        .unwrap_or(body.len());
    body.split_at(split)
}

fn declaration(node: &Node) -> Result<(&str, NumericKind), WatCodegenError> {
    match &node.kind {
        NodeKind::LocalVar { name, ty } => Ok((name.as_str(), *ty)),
        _ => Err(WatCodegenError::malformed_module(
            format!("expected a variable declaration, found {}", node.kind_name()),
            node,
        )),
    }
}

/// Convenience function to compile a Cinonim module to WAT.
pub fn ast_to_wat(module: &Node) -> Result<String, WatCodegenError> {
    let mut codegen = WatCodegen::new();
    codegen.generate(module)
}

/// Convenience function to compile a Cinonim module to WAT with specified options.
pub fn ast_to_wat_with_options(
    module: &Node,
    options: WatCodegenOptions,
) -> Result<String, WatCodegenError> {
    let mut codegen = WatCodegen::with_options(options);
    codegen.generate(module)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::ErrorKind;
    use alloc::vec;

    #[test]
    fn test_empty_module() {
        assert_eq!(ast_to_wat(&Node::module(vec![])).unwrap(), "(module)");
    }

    #[test]
    fn test_root_must_be_module() {
        let err = ast_to_wat(&Node::brk().at(1, 1)).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedModule);
    }

    #[test]
    fn test_export() {
        let module = Node::module(vec![Node::export_func("add", "addTwo")]);
        assert_eq!(
            ast_to_wat(&module).unwrap(),
            "(module\n    (export \"addTwo\" (func $add))\n)"
        );
    }

    #[test]
    fn test_statement_at_module_level() {
        let module = Node::module(vec![Node::ret(None).at(4, 1)]);
        let err = ast_to_wat(&module).unwrap_err();
        assert_eq!(err.kind, ErrorKind::MalformedModule);
        assert_eq!(err.node.kind, "Return");
    }

    #[test]
    fn test_void_global() {
        let module = Node::module(vec![Node::global_var("g", NumericKind::Void, "0").at(2, 1)]);
        let err = ast_to_wat(&module).unwrap_err();
        assert_eq!(err.kind, ErrorKind::UnsupportedNumericKind);
        assert_eq!(err.pos.line, 2);
    }

    #[test]
    fn test_split_declarations_stops_at_first_statement() {
        let body = vec![
            Node::local_var("a", NumericKind::I32),
            Node::local_set("a", Node::number(NumericKind::I32, "1")),
            Node::local_var("b", NumericKind::I32),
        ];
        let (locals, rest) = split_declarations(&body);
        assert_eq!(locals.len(), 1);
        assert_eq!(rest.len(), 2);
    }

    #[test]
    fn test_options_builder() {
        let options = WatCodegenOptions::new()
            .with_indent_width(2)
            .with_return_label("exit");
        let codegen = WatCodegen::with_options(options);
        assert_eq!(codegen.options().indent_width, 2);
        assert_eq!(codegen.options().return_label, "exit");
    }
}
