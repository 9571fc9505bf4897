//! Arithmetic for the `add`, `sub`, `mul`, and `div` builtins.
//!
//! Two integers stay integers, with overflow reported as an error rather
//! than wrapped. If either side is a float the other is promoted and the
//! operation follows IEEE 754. Every other operand type is a mismatch.

use psil_ir::errors::{division_by_zero, integer_overflow, type_mismatch};
use psil_ir::{EvalResult, Value};

/// Binary arithmetic operator.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BinaryOp {
    Add,
    Sub,
    Mul,
    Div,
}

impl BinaryOp {
    /// Builtin name of the operator.
    pub fn name(self) -> &'static str {
        match self {
            BinaryOp::Add => "add",
            BinaryOp::Sub => "sub",
            BinaryOp::Mul => "mul",
            BinaryOp::Div => "div",
        }
    }
}

/// Checked integer operation with overflow handling.
#[inline]
fn checked_arith(result: Option<i64>, op: BinaryOp) -> EvalResult {
    result.map(Value::Int).ok_or_else(|| integer_overflow(op.name()))
}

#[expect(
    clippy::cast_precision_loss,
    reason = "integer-to-float promotion rounds like any mixed arithmetic"
)]
#[inline]
fn promote(n: i64) -> f64 {
    n as f64
}

/// Apply `op` to `left` and `right`.
pub fn evaluate_binary(left: &Value, right: &Value, op: BinaryOp) -> EvalResult {
    match (left, right) {
        (Value::Int(a), Value::Int(b)) => eval_int_binary(*a, *b, op),
        (Value::Float(a), Value::Float(b)) => Ok(eval_float_binary(*a, *b, op)),
        (Value::Int(a), Value::Float(b)) => Ok(eval_float_binary(promote(*a), *b, op)),
        (Value::Float(a), Value::Int(b)) => Ok(eval_float_binary(*a, promote(*b), op)),
        (Value::Int(_) | Value::Float(_), other) | (other, _) => {
            Err(type_mismatch("number", other.type_name()))
        }
    }
}

fn eval_int_binary(a: i64, b: i64, op: BinaryOp) -> EvalResult {
    match op {
        BinaryOp::Add => checked_arith(a.checked_add(b), op),
        BinaryOp::Sub => checked_arith(a.checked_sub(b), op),
        BinaryOp::Mul => checked_arith(a.checked_mul(b), op),
        BinaryOp::Div if b == 0 => Err(division_by_zero()),
        // Truncates toward zero; `i64::MIN / -1` overflows.
        BinaryOp::Div => checked_arith(a.checked_div(b), op),
    }
}

fn eval_float_binary(a: f64, b: f64, op: BinaryOp) -> Value {
    Value::Float(match op {
        BinaryOp::Add => a + b,
        BinaryOp::Sub => a - b,
        BinaryOp::Mul => a * b,
        BinaryOp::Div => a / b,
    })
}
