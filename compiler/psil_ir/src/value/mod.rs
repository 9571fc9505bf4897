//! Runtime value representation.
//!
//! `Value` is a closed sum type: every consumer matches it exhaustively,
//! so adding a variant is a compile-time exercise.

use std::cell::OnceCell;
use std::fmt;
use std::rc::Rc;

use crate::errors::{EvalResult, SyntaxError};
use crate::instruction::Instruction;
use crate::machine::Machine;
use crate::namespace::Namespace;
use crate::reference::Reference;

/// Runtime value.
#[derive(Clone, Debug)]
pub enum Value {
    /// 64-bit signed integer.
    Int(i64),
    /// IEEE 754 double.
    Float(f64),
    /// Immutable string.
    Text(Rc<str>),
    /// A qualified name held as data (never auto-dereferenced once on the stack).
    Reference(Reference),
    /// Interpreted or native code.
    Code(CodeBlock),
    /// First-class namespace handle.
    Namespace(Namespace),
}

impl Value {
    pub fn text(text: impl Into<Rc<str>>) -> Self {
        Value::Text(text.into())
    }

    /// An interpreted code block over `source`, compiled on first call.
    pub fn code(source: impl Into<String>) -> Self {
        Value::Code(CodeBlock::interpreted(source))
    }

    pub fn native(native: NativeCode) -> Self {
        Value::Code(CodeBlock::native(native))
    }

    /// Name of this value's variant, for error messages.
    pub fn type_name(&self) -> &'static str {
        match self {
            Value::Int(_) => "integer",
            Value::Float(_) => "float",
            Value::Text(_) => "string",
            Value::Reference(_) => "reference",
            Value::Code(code) => match code.body() {
                CodeBody::Interpreted(_) => "code",
                CodeBody::Native(_) => "native code",
            },
            Value::Namespace(_) => "namespace",
        }
    }

    pub fn as_namespace(&self) -> Option<&Namespace> {
        match self {
            Value::Namespace(ns) => Some(ns),
            _ => None,
        }
    }

    /// Tag a resolved value with the reference used to find it.
    ///
    /// Only code records its name; the interpreter uses it to rebuild the
    /// search path for qualified calls.
    #[must_use]
    pub fn named(self, reference: &Reference) -> Value {
        match self {
            Value::Code(code) => Value::Code(code.with_name(reference.clone())),
            other => other,
        }
    }
}

/// Structural equality for data; code compares by source text (or native
/// name); namespaces compare by identity.
impl PartialEq for Value {
    #[allow(clippy::float_cmp, reason = "structural value equality")]
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Int(a), Value::Int(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::Reference(a), Value::Reference(b)) => a == b,
            (Value::Code(a), Value::Code(b)) => a == b,
            (Value::Namespace(a), Value::Namespace(b)) => a.ptr_eq(b),
            _ => false,
        }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(n) => write!(f, "{n}"),
            Value::Float(x) if x.is_finite() && x.fract() == 0.0 => write!(f, "{x:.1}"),
            Value::Float(x) => write!(f, "{x}"),
            Value::Text(text) => f.write_str(text),
            Value::Reference(reference) => write!(f, "{reference}"),
            Value::Code(code) => match code.body() {
                CodeBody::Interpreted(block) => write!(f, "{{{}}}", block.text()),
                CodeBody::Native(native) => write!(f, "<native {}>", native.name()),
            },
            Value::Namespace(ns) => write!(f, "<namespace {}>", ns.len()),
        }
    }
}

// Code

/// A first-class program fragment.
#[derive(Clone, Debug)]
pub struct CodeBlock {
    body: CodeBody,
    /// The reference this block was last resolved through.
    name: Option<Reference>,
}

/// What runs when a code block is executed.
#[derive(Clone, Debug)]
pub enum CodeBody {
    /// Source text run by re-entering the interpreter.
    Interpreted(Rc<SourceBlock>),
    /// Host routine run directly against interpreter state.
    Native(NativeCode),
}

impl CodeBlock {
    pub fn interpreted(source: impl Into<String>) -> Self {
        CodeBlock {
            body: CodeBody::Interpreted(Rc::new(SourceBlock::new(source))),
            name: None,
        }
    }

    pub fn native(native: NativeCode) -> Self {
        CodeBlock {
            body: CodeBody::Native(native),
            name: None,
        }
    }

    #[inline]
    pub fn body(&self) -> &CodeBody {
        &self.body
    }

    #[inline]
    pub fn name(&self) -> Option<&Reference> {
        self.name.as_ref()
    }

    /// Copy of this block carrying `name`. The compiled instruction cache
    /// stays shared with the original.
    #[must_use]
    pub fn with_name(self, name: Reference) -> Self {
        CodeBlock {
            body: self.body,
            name: Some(name),
        }
    }
}

impl PartialEq for CodeBlock {
    fn eq(&self, other: &Self) -> bool {
        match (&self.body, &other.body) {
            (CodeBody::Interpreted(a), CodeBody::Interpreted(b)) => a.text() == b.text(),
            (CodeBody::Native(a), CodeBody::Native(b)) => a.name() == b.name(),
            _ => false,
        }
    }
}

/// Source text of an interpreted block plus its memoized compilation.
pub struct SourceBlock {
    text: String,
    compiled: OnceCell<Rc<[Instruction]>>,
}

impl SourceBlock {
    pub fn new(text: impl Into<String>) -> Self {
        SourceBlock {
            text: text.into(),
            compiled: OnceCell::new(),
        }
    }

    #[inline]
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Returns `true` once the instructions have been compiled and cached.
    pub fn is_compiled(&self) -> bool {
        self.compiled.get().is_some()
    }

    /// The block's instructions, compiling them with `compile` on first use.
    ///
    /// A failed compile is not cached, so the error is reported again on
    /// every attempt.
    pub fn instructions_with<F>(&self, compile: F) -> Result<Rc<[Instruction]>, SyntaxError>
    where
        F: FnOnce(&str) -> Result<Vec<Instruction>, SyntaxError>,
    {
        if let Some(cached) = self.compiled.get() {
            return Ok(Rc::clone(cached));
        }
        let compiled: Rc<[Instruction]> = compile(&self.text)?.into();
        tracing::trace!(len = compiled.len(), "compiled code block");
        Ok(Rc::clone(self.compiled.get_or_init(|| compiled)))
    }
}

impl fmt::Debug for SourceBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SourceBlock")
            .field("text", &self.text)
            .field("compiled", &self.is_compiled())
            .finish()
    }
}

/// Signature of a native builtin.
pub type NativeFn = fn(&mut dyn Machine) -> EvalResult<()>;

/// A named host routine.
#[derive(Clone, Copy)]
pub struct NativeCode {
    name: &'static str,
    func: NativeFn,
}

impl NativeCode {
    pub const fn new(name: &'static str, func: NativeFn) -> Self {
        NativeCode { name, func }
    }

    #[inline]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Run the routine to completion.
    #[inline]
    pub fn call(&self, machine: &mut dyn Machine) -> EvalResult<()> {
        (self.func)(machine)
    }
}

impl fmt::Debug for NativeCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("NativeCode").field(&self.name).finish()
    }
}

#[cfg(test)]
mod tests;
