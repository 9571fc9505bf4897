//! Native builtin library.
//!
//! Every builtin is a plain function over `&mut dyn Machine`. Arguments are
//! popped from the top of the frame's stack, so the last value written in
//! an expression is the first one a builtin sees: in `(5 "x" def)` the name
//! is popped before the value.

use psil_ir::errors::type_mismatch;
use psil_ir::{EvalResult, Machine, Namespace, NativeCode, Reference, Value};

use crate::operators::{evaluate_binary, BinaryOp};

/// The builtins bound into every root namespace.
pub const BUILTINS: &[NativeCode] = &[
    NativeCode::new("def", def),
    NativeCode::new("get", get),
    NativeCode::new("undef", undef),
    NativeCode::new("quote", quote),
    NativeCode::new("namespace", namespace),
    NativeCode::new("exec", exec),
    NativeCode::new("dup", dup),
    NativeCode::new("swap", swap),
    NativeCode::new("drop", drop),
    NativeCode::new("out", out),
    NativeCode::new("add", add),
    NativeCode::new("sub", sub),
    NativeCode::new("mul", mul),
    NativeCode::new("div", div),
];

/// Bind every builtin into `ns` under its name.
pub fn install_builtins(ns: &Namespace) {
    for native in BUILTINS {
        ns.bind(native.name(), Value::native(*native));
    }
}

/// Pop a name: a reference value, or text spelling one.
fn pop_name(m: &mut dyn Machine) -> EvalResult<Reference> {
    match m.pop()? {
        Value::Reference(reference) => Ok(reference),
        Value::Text(text) => {
            Reference::parse(&text).ok_or_else(|| type_mismatch("reference", "malformed name"))
        }
        other => Err(type_mismatch("reference", other.type_name())),
    }
}

// Bindings

fn def(m: &mut dyn Machine) -> EvalResult<()> {
    let name = pop_name(m)?;
    let value = m.pop()?;
    m.bind(&name, value)
}

fn get(m: &mut dyn Machine) -> EvalResult<()> {
    let name = pop_name(m)?;
    let value = m.resolve(&name)?;
    m.push(value);
    Ok(())
}

fn undef(m: &mut dyn Machine) -> EvalResult<()> {
    let name = pop_name(m)?;
    let removed = m.unbind(&name)?;
    m.push(removed);
    Ok(())
}

fn quote(m: &mut dyn Machine) -> EvalResult<()> {
    let name = pop_name(m)?;
    m.push(Value::Reference(name));
    Ok(())
}

fn namespace(m: &mut dyn Machine) -> EvalResult<()> {
    m.push(Value::Namespace(Namespace::new()));
    Ok(())
}

fn exec(m: &mut dyn Machine) -> EvalResult<()> {
    let callable = m.pop()?;
    m.append_env(callable)
}

// Stack

fn dup(m: &mut dyn Machine) -> EvalResult<()> {
    let top = m.peek()?.clone();
    m.push(top);
    Ok(())
}

fn swap(m: &mut dyn Machine) -> EvalResult<()> {
    let top = m.pop()?;
    let below = m.pop()?;
    m.push(top);
    m.push(below);
    Ok(())
}

fn drop(m: &mut dyn Machine) -> EvalResult<()> {
    m.pop().map(|_| ())
}

fn out(m: &mut dyn Machine) -> EvalResult<()> {
    let value = m.pop()?;
    m.output(&value.to_string());
    Ok(())
}

// Arithmetic

fn arithmetic(m: &mut dyn Machine, op: BinaryOp) -> EvalResult<()> {
    let right = m.pop()?;
    let left = m.pop()?;
    let result = evaluate_binary(&left, &right, op)?;
    m.push(result);
    Ok(())
}

fn add(m: &mut dyn Machine) -> EvalResult<()> {
    arithmetic(m, BinaryOp::Add)
}

fn sub(m: &mut dyn Machine) -> EvalResult<()> {
    arithmetic(m, BinaryOp::Sub)
}

fn mul(m: &mut dyn Machine) -> EvalResult<()> {
    arithmetic(m, BinaryOp::Mul)
}

fn div(m: &mut dyn Machine) -> EvalResult<()> {
    arithmetic(m, BinaryOp::Div)
}
