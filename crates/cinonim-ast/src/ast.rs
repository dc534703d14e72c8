//! AST types produced by the Cinonim parser.

use alloc::boxed::Box;
use alloc::string::String;
use alloc::vec::Vec;
use core::fmt;

/// A line/column position in the source text.
///
/// Both coordinates are 1-based. The default position (`0:0`) marks nodes
/// that were synthesized rather than parsed.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourcePos {
    pub line: u32,
    pub column: u32,
}

impl SourcePos {
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourcePos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// The numeric kind of a value-bearing node.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum NumericKind {
    /// `int`
    I32,
    /// `long`
    I64,
    /// `float`
    F32,
    /// `double`
    F64,
    /// `void`, only meaningful as a function result.
    Void,
    /// The node neither produces nor consumes a value.
    NotApplicable,
}

impl NumericKind {
    /// All four value kinds, in table order.
    pub const VALUES: [NumericKind; 4] = [
        NumericKind::I32,
        NumericKind::I64,
        NumericKind::F32,
        NumericKind::F64,
    ];

    /// Returns `true` for the four kinds that can live on the value stack.
    pub fn is_value(self) -> bool {
        matches!(
            self,
            NumericKind::I32 | NumericKind::I64 | NumericKind::F32 | NumericKind::F64
        )
    }

    pub fn is_integer(self) -> bool {
        matches!(self, NumericKind::I32 | NumericKind::I64)
    }

    pub fn is_float(self) -> bool {
        matches!(self, NumericKind::F32 | NumericKind::F64)
    }
}

impl fmt::Display for NumericKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            NumericKind::I32 => "i32",
            NumericKind::I64 => "i64",
            NumericKind::F32 => "f32",
            NumericKind::F64 => "f64",
            NumericKind::Void => "void",
            NumericKind::NotApplicable => "n/a",
        };
        f.write_str(name)
    }
}

/// Storage class of a variable access.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Storage {
    /// A function parameter or hoisted local.
    Local,
    /// A module-level global.
    Global,
}

/// A node of the Cinonim AST together with its source position.
#[derive(Clone, Debug, PartialEq)]
pub struct Node {
    pub kind: NodeKind,
    pub pos: SourcePos,
}

/// The syntactic form of a [`Node`].
///
/// Expressions arrive already flattened into evaluation order: an
/// [`NodeKind::Expression`] holds operand pushes, [`NodeKind::Operator`]s and
/// [`NodeKind::Cast`]s in the order a stack machine executes them.
#[derive(Clone, Debug, PartialEq)]
pub enum NodeKind {
    /// The compilation unit.
    Module(Vec<Node>),

    /// `double foo = 3.14;` (mutable) or `const float baz = 1.2F;`.
    Global {
        mutable: bool,
        name: String,
        ty: NumericKind,
        /// Always a [`NodeKind::Number`] in well-formed input.
        init: Box<Node>,
    },

    /// `#export-func alias = name`
    ExportFunc {
        /// The internal function name.
        name: String,
        /// The name the host sees.
        alias: String,
    },

    /// A function definition.
    Function {
        name: String,
        /// The result kind; [`NumericKind::Void`] when nothing is returned.
        result: NumericKind,
        /// Always a [`NodeKind::ParamList`] in well-formed input.
        params: Box<Node>,
        body: Vec<Node>,
    },

    /// Function parameters, as [`NodeKind::LocalVar`] nodes.
    ParamList(Vec<Node>),

    /// A local variable or parameter declaration.
    LocalVar { name: String, ty: NumericKind },

    /// Variable read.
    Get {
        storage: Storage,
        name: String,
        ty: NumericKind,
    },

    /// Variable write, either as a statement or as a `for` init/increment.
    Set {
        storage: Storage,
        name: String,
        value: Box<Node>,
    },

    /// A numeric literal; `literal` is the source numeral as written.
    Number { ty: NumericKind, literal: String },

    /// A flattened expression.
    Expression { ty: NumericKind, terms: Vec<Node> },

    /// A binary operator applied to the two preceding values.
    Operator { ty: NumericKind, symbol: String },

    /// A numeric conversion of the preceding value.
    Cast { from: NumericKind, to: NumericKind },

    Return(Option<Box<Node>>),

    /// `break;` or `break n;`
    Break { levels: Option<u32> },

    /// `continue;` or `continue n;`
    Continue { levels: Option<u32> },

    For {
        /// Comma-separated init assignments.
        init: Vec<Node>,
        condition: Option<Box<Node>>,
        /// Comma-separated increment assignments.
        increment: Vec<Node>,
        body: Vec<Node>,
    },

    Do {
        body: Vec<Node>,
        condition: Box<Node>,
    },

    While {
        condition: Box<Node>,
        body: Vec<Node>,
    },

    If {
        condition: Box<Node>,
        then_branch: Vec<Node>,
        else_branch: Option<Vec<Node>>,
    },
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            pos: SourcePos::default(),
        }
    }

    /// Attach a source position.
    pub fn at(mut self, line: u32, column: u32) -> Self {
        self.pos = SourcePos::new(line, column);
        self
    }

    /// The node kind name used in diagnostics.
    pub fn kind_name(&self) -> &'static str {
        match &self.kind {
            NodeKind::Module(_) => "Module",
            NodeKind::Global { mutable: true, .. } => "GlobalVar",
            NodeKind::Global { mutable: false, .. } => "GlobalConst",
            NodeKind::ExportFunc { .. } => "ExportFunc",
            NodeKind::Function { .. } => "Function",
            NodeKind::ParamList(_) => "ParamList",
            NodeKind::LocalVar { .. } => "LocalVar",
            NodeKind::Get { storage: Storage::Local, .. } => "LocalGet",
            NodeKind::Get { storage: Storage::Global, .. } => "GlobalGet",
            NodeKind::Set { storage: Storage::Local, .. } => "LocalSet",
            NodeKind::Set { storage: Storage::Global, .. } => "GlobalSet",
            NodeKind::Number { .. } => "Number",
            NodeKind::Expression { .. } => "Expression",
            NodeKind::Operator { .. } => "Operator",
            NodeKind::Cast { .. } => "Cast",
            NodeKind::Return(_) => "Return",
            NodeKind::Break { .. } => "Break",
            NodeKind::Continue { .. } => "Continue",
            NodeKind::For { .. } => "For",
            NodeKind::Do { .. } => "Do",
            NodeKind::While { .. } => "While",
            NodeKind::If { .. } => "If",
        }
    }

    /// The numeric kind the node produces or consumes, if it has one.
    ///
    /// For a cast this is the target kind.
    pub fn numeric_kind(&self) -> Option<NumericKind> {
        match &self.kind {
            NodeKind::Global { ty, .. }
            | NodeKind::LocalVar { ty, .. }
            | NodeKind::Get { ty, .. }
            | NodeKind::Number { ty, .. }
            | NodeKind::Expression { ty, .. }
            | NodeKind::Operator { ty, .. } => Some(*ty),
            NodeKind::Function { result, .. } => Some(*result),
            NodeKind::Cast { to, .. } => Some(*to),
            _ => None,
        }
    }

    /// The identifier, literal text or operator symbol carried by the node.
    pub fn label(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Global { name, .. }
            | NodeKind::ExportFunc { name, .. }
            | NodeKind::Function { name, .. }
            | NodeKind::LocalVar { name, .. }
            | NodeKind::Get { name, .. }
            | NodeKind::Set { name, .. } => Some(name.as_str()),
            NodeKind::Number { literal, .. } => Some(literal.as_str()),
            NodeKind::Operator { symbol, .. } => Some(symbol.as_str()),
            _ => None,
        }
    }
}
