//! Constructors for building AST nodes by hand.
//!
//! The parser uses these to assemble nodes; tests use them to write ASTs
//! without spelling out every struct field.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;

use crate::ast::{Node, NodeKind, NumericKind, Storage};

impl Node {
    pub fn module(items: Vec<Node>) -> Self {
        Self::new(NodeKind::Module(items))
    }

    /// A mutable global initialized from a literal.
    pub fn global_var(name: impl Into<String>, ty: NumericKind, literal: impl Into<String>) -> Self {
        Self::global(true, name.into(), ty, literal.into())
    }

    /// An immutable global initialized from a literal.
    pub fn global_const(name: impl Into<String>, ty: NumericKind, literal: impl Into<String>) -> Self {
        Self::global(false, name.into(), ty, literal.into())
    }

    fn global(mutable: bool, name: String, ty: NumericKind, literal: String) -> Self {
        Self::new(NodeKind::Global {
            mutable,
            name,
            ty,
            init: Box::new(Node::number(ty, literal)),
        })
    }

    pub fn export_func(name: impl Into<String>, alias: impl Into<String>) -> Self {
        Self::new(NodeKind::ExportFunc {
            name: name.into(),
            alias: alias.into(),
        })
    }

    /// A function whose parameters are given as `(name, kind)` pairs.
    pub fn function(
        name: impl Into<String>,
        result: NumericKind,
        params: &[(&str, NumericKind)],
        body: Vec<Node>,
    ) -> Self {
        let params = params
            .iter()
            .map(|(name, ty)| Node::local_var(*name, *ty))
            .collect();
        Self::new(NodeKind::Function {
            name: name.into(),
            result,
            params: Box::new(Node::new(NodeKind::ParamList(params))),
            body,
        })
    }

    pub fn local_var(name: impl Into<String>, ty: NumericKind) -> Self {
        Self::new(NodeKind::LocalVar {
            name: name.into(),
            ty,
        })
    }

    pub fn local_get(name: impl Into<String>, ty: NumericKind) -> Self {
        Self::get(Storage::Local, name.into(), ty)
    }

    pub fn global_get(name: impl Into<String>, ty: NumericKind) -> Self {
        Self::get(Storage::Global, name.into(), ty)
    }

    fn get(storage: Storage, name: String, ty: NumericKind) -> Self {
        Self::new(NodeKind::Get { storage, name, ty })
    }

    pub fn local_set(name: impl Into<String>, value: Node) -> Self {
        Self::set(Storage::Local, name.into(), value)
    }

    pub fn global_set(name: impl Into<String>, value: Node) -> Self {
        Self::set(Storage::Global, name.into(), value)
    }

    fn set(storage: Storage, name: String, value: Node) -> Self {
        Self::new(NodeKind::Set {
            storage,
            name,
            value: Box::new(value),
        })
    }

    pub fn number(ty: NumericKind, literal: impl Into<String>) -> Self {
        Self::new(NodeKind::Number {
            ty,
            literal: literal.into(),
        })
    }

    /// A flattened expression; `terms` are in evaluation order.
    pub fn expr(ty: NumericKind, terms: Vec<Node>) -> Self {
        Self::new(NodeKind::Expression { ty, terms })
    }

    pub fn op(symbol: impl Into<String>, ty: NumericKind) -> Self {
        Self::new(NodeKind::Operator {
            ty,
            symbol: symbol.into(),
        })
    }

    pub fn cast(from: NumericKind, to: NumericKind) -> Self {
        Self::new(NodeKind::Cast { from, to })
    }

    pub fn ret(value: Option<Node>) -> Self {
        Self::new(NodeKind::Return(value.map(Box::new)))
    }

    pub fn brk() -> Self {
        Self::new(NodeKind::Break { levels: None })
    }

    pub fn brk_levels(levels: u32) -> Self {
        Self::new(NodeKind::Break {
            levels: Some(levels),
        })
    }

    pub fn cont() -> Self {
        Self::new(NodeKind::Continue { levels: None })
    }

    pub fn cont_levels(levels: u32) -> Self {
        Self::new(NodeKind::Continue {
            levels: Some(levels),
        })
    }

    pub fn while_loop(condition: Node, body: Vec<Node>) -> Self {
        Self::new(NodeKind::While {
            condition: Box::new(condition),
            body,
        })
    }

    pub fn do_loop(body: Vec<Node>, condition: Node) -> Self {
        Self::new(NodeKind::Do {
            body,
            condition: Box::new(condition),
        })
    }

    pub fn for_loop(
        init: Vec<Node>,
        condition: Option<Node>,
        increment: Vec<Node>,
        body: Vec<Node>,
    ) -> Self {
        Self::new(NodeKind::For {
            init,
            condition: condition.map(Box::new),
            increment,
            body,
        })
    }

    pub fn if_then(condition: Node, then_branch: Vec<Node>) -> Self {
        Self::new(NodeKind::If {
            condition: Box::new(condition),
            then_branch,
            else_branch: None,
        })
    }

    pub fn if_else(condition: Node, then_branch: Vec<Node>, else_branch: Vec<Node>) -> Self {
        Self::new(NodeKind::If {
            condition: Box::new(condition),
            then_branch,
            else_branch: Some(else_branch),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use alloc::vec;

    #[test]
    fn test_function_wraps_params_in_param_list() {
        let func = Node::function(
            "add",
            NumericKind::I32,
            &[("a", NumericKind::I32), ("b", NumericKind::I32)],
            vec![],
        );
        let NodeKind::Function { params, .. } = &func.kind else {
            panic!("expected function, got {:?}", func.kind);
        };
        let NodeKind::ParamList(list) = &params.kind else {
            panic!("expected param list, got {:?}", params.kind);
        };
        assert_eq!(list.len(), 2);
        assert_eq!(list[1].label(), Some("b"));
        assert_eq!(list[1].kind_name(), "LocalVar");
    }

    #[test]
    fn test_global_init_uses_global_kind() {
        let global = Node::global_var("bar", NumericKind::I64, "42");
        let NodeKind::Global { init, .. } = &global.kind else {
            panic!("expected global, got {:?}", global.kind);
        };
        assert_eq!(init.numeric_kind(), Some(NumericKind::I64));
        assert_eq!(init.label(), Some("42"));
    }
}
