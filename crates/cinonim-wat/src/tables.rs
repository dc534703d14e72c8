//! Type and instruction tables.
//!
//! Static mappings from Cinonim numeric kinds to WAT value types, from source
//! operators to WAT instructions, and from kind pairs to conversion
//! instructions. Nothing here knows about nodes or positions; callers turn a
//! `None` into a diagnostic.

use alloc::format;
use alloc::string::String;

use cinonim_ast::{NumericKind, Storage};

/// Maps a numeric kind to its WAT value type.
///
/// Returns `None` for `void` and not-applicable kinds.
pub fn value_type(kind: NumericKind) -> Option<&'static str> {
    match kind {
        NumericKind::I32 => Some("i32"),
        NumericKind::I64 => Some("i64"),
        NumericKind::F32 => Some("f32"),
        NumericKind::F64 => Some("f64"),
        NumericKind::Void | NumericKind::NotApplicable => None,
    }
}

/// The instruction namespace for a variable access (`local.get`, `global.set`).
pub fn storage_prefix(storage: Storage) -> &'static str {
    match storage {
        Storage::Local => "local",
        Storage::Global => "global",
    }
}

/// Binary operators of the source language.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
    Rem,
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
    /// `&&`, evaluated without short-circuit.
    And,
    /// `||`, evaluated without short-circuit.
    Or,
    BitAnd,
    BitOr,
    BitXor,
    Shl,
    Shr,
}

impl BinaryOp {
    pub fn from_symbol(symbol: &str) -> Option<Self> {
        let op = match symbol {
            "+" => BinaryOp::Add,
            "-" => BinaryOp::Sub,
            "*" => BinaryOp::Mul,
            "/" => BinaryOp::Div,
            "%" => BinaryOp::Rem,
            "<" => BinaryOp::Lt,
            "<=" => BinaryOp::Le,
            ">" => BinaryOp::Gt,
            ">=" => BinaryOp::Ge,
            "==" => BinaryOp::Eq,
            "!=" => BinaryOp::Ne,
            "&&" => BinaryOp::And,
            "||" => BinaryOp::Or,
            "&" => BinaryOp::BitAnd,
            "|" => BinaryOp::BitOr,
            "^" => BinaryOp::BitXor,
            "<<" => BinaryOp::Shl,
            ">>" => BinaryOp::Shr,
            _ => return None,
        };
        Some(op)
    }

    /// Comparisons always leave an `i32` on the stack, whatever the operand kind.
    pub fn is_comparison(self) -> bool {
        matches!(
            self,
            BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge | BinaryOp::Eq | BinaryOp::Ne
        )
    }
}

/// Resolves a binary operator on operands of `kind` to a WAT instruction.
///
/// Integer division, remainder, ordering and right shift use the signed
/// variants. Logical and bitwise operators exist for integers only.
pub fn binary_instruction(op: BinaryOp, kind: NumericKind) -> Option<String> {
    let ty = value_type(kind)?;
    let integer = kind.is_integer();

    let name = match (op, integer) {
        (BinaryOp::Add, _) => "add",
        (BinaryOp::Sub, _) => "sub",
        (BinaryOp::Mul, _) => "mul",
        (BinaryOp::Div, true) => "div_s",
        (BinaryOp::Div, false) => "div",
        (BinaryOp::Rem, true) => "rem_s",
        (BinaryOp::Lt, true) => "lt_s",
        (BinaryOp::Lt, false) => "lt",
        (BinaryOp::Le, true) => "le_s",
        (BinaryOp::Le, false) => "le",
        (BinaryOp::Gt, true) => "gt_s",
        (BinaryOp::Gt, false) => "gt",
        (BinaryOp::Ge, true) => "ge_s",
        (BinaryOp::Ge, false) => "ge",
        (BinaryOp::Eq, _) => "eq",
        (BinaryOp::Ne, _) => "ne",
        (BinaryOp::And | BinaryOp::BitAnd, true) => "and",
        (BinaryOp::Or | BinaryOp::BitOr, true) => "or",
        (BinaryOp::BitXor, true) => "xor",
        (BinaryOp::Shl, true) => "shl",
        (BinaryOp::Shr, true) => "shr_s",
        (
            BinaryOp::Rem
            | BinaryOp::And
            | BinaryOp::Or
            | BinaryOp::BitAnd
            | BinaryOp::BitOr
            | BinaryOp::BitXor
            | BinaryOp::Shl
            | BinaryOp::Shr,
            false,
        ) => return None,
    };

    Some(format!("{}.{}", ty, name))
}

/// Outcome of looking up a cast in the conversion matrix.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Conversion {
    /// Source and target kinds are equal; nothing is emitted.
    Identity,
    Convert(&'static str),
}

/// The 4×4 conversion matrix. Float to integer casts truncate toward zero.
pub fn conversion(from: NumericKind, to: NumericKind) -> Option<Conversion> {
    use NumericKind::*;

    let instr = match (from, to) {
        (I32, I32) | (I64, I64) | (F32, F32) | (F64, F64) => return Some(Conversion::Identity),
        (I32, I64) => "i64.extend_i32_s",
        (I32, F32) => "f32.convert_i32_s",
        (I32, F64) => "f64.convert_i32_s",
        (I64, I32) => "i32.wrap_i64",
        (I64, F32) => "f32.convert_i64_s",
        (I64, F64) => "f64.convert_i64_s",
        (F32, I32) => "i32.trunc_f32_s",
        (F32, I64) => "i64.trunc_f32_s",
        (F32, F64) => "f64.promote_f32",
        (F64, I32) => "i32.trunc_f64_s",
        (F64, I64) => "i64.trunc_f64_s",
        (F64, F32) => "f32.demote_f64",
        _ => return None,
    };
    Some(Conversion::Convert(instr))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_value_types() {
        assert_eq!(value_type(NumericKind::I32), Some("i32"));
        assert_eq!(value_type(NumericKind::F64), Some("f64"));
        assert_eq!(value_type(NumericKind::Void), None);
        assert_eq!(value_type(NumericKind::NotApplicable), None);
    }

    #[test]
    fn test_integer_operators_are_signed() {
        let cases = [
            ("+", "i32.add"),
            ("/", "i32.div_s"),
            ("%", "i32.rem_s"),
            ("<", "i32.lt_s"),
            (">=", "i32.ge_s"),
            ("==", "i32.eq"),
            ("&&", "i32.and"),
            ("||", "i32.or"),
            (">>", "i32.shr_s"),
        ];
        for (symbol, expected) in cases {
            let op = BinaryOp::from_symbol(symbol).unwrap();
            assert_eq!(
                binary_instruction(op, NumericKind::I32).as_deref(),
                Some(expected),
                "operator {}",
                symbol
            );
        }
        let sub = BinaryOp::from_symbol("-").unwrap();
        assert_eq!(binary_instruction(sub, NumericKind::I64).as_deref(), Some("i64.sub"));
    }

    #[test]
    fn test_float_operators() {
        let div = BinaryOp::from_symbol("/").unwrap();
        let le = BinaryOp::from_symbol("<=").unwrap();
        assert_eq!(binary_instruction(div, NumericKind::F64).as_deref(), Some("f64.div"));
        assert_eq!(binary_instruction(le, NumericKind::F32).as_deref(), Some("f32.le"));
    }

    #[test]
    fn test_unsupported_operators() {
        assert_eq!(BinaryOp::from_symbol("**"), None);
        assert_eq!(binary_instruction(BinaryOp::Rem, NumericKind::F32), None);
        assert_eq!(binary_instruction(BinaryOp::And, NumericKind::F64), None);
        assert_eq!(binary_instruction(BinaryOp::Add, NumericKind::Void), None);
    }

    #[test]
    fn test_conversion_matrix_is_complete() {
        for from in NumericKind::VALUES {
            for to in NumericKind::VALUES {
                let conv = conversion(from, to);
                if from == to {
                    assert_eq!(conv, Some(Conversion::Identity));
                } else {
                    let Some(Conversion::Convert(instr)) = conv else {
                        panic!("missing conversion {} -> {}", from, to);
                    };
                    assert!(instr.starts_with(value_type(to).unwrap()));
                }
            }
        }
    }

    #[test]
    fn test_conversion_outside_matrix() {
        assert_eq!(conversion(NumericKind::Void, NumericKind::I32), None);
        assert_eq!(conversion(NumericKind::F32, NumericKind::NotApplicable), None);
    }
}
