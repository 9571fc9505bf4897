//! The interpreter as seen by native code.

use crate::errors::EvalResult;
use crate::namespace::Namespace;
use crate::reference::Reference;
use crate::value::Value;

/// Interpreter state exposed to native builtins.
///
/// Stack operations are bounded by the active frame's window: a native
/// called inside a code block cannot pop values that belong to the
/// block's caller. Natives never see the instruction streams or the
/// expression counts directly.
pub trait Machine {
    /// Pop the top of the active frame's stack.
    fn pop(&mut self) -> EvalResult<Value>;

    fn push(&mut self, value: Value);

    /// Top of the active frame's stack, without removing it.
    fn peek(&self) -> EvalResult<&Value>;

    /// Number of values visible in the active frame.
    fn depth(&self) -> usize;

    /// The current namespace.
    fn namespace(&self) -> Namespace;

    /// Write one line to the interpreter's output sink.
    fn output(&mut self, line: &str);

    /// Run `callable` as if it had been executed in the current expression.
    ///
    /// Its arguments are the values pushed since the native was called. An
    /// interpreted block is scheduled as a new frame and runs after the
    /// native returns; a native is invoked immediately.
    fn append_env(&mut self, callable: Value) -> EvalResult<()>;

    /// Resolve `reference` from the current namespace.
    fn resolve(&self, reference: &Reference) -> EvalResult<Value> {
        self.namespace().resolve(reference)
    }

    /// Bind `value` at `reference`, relative to the current namespace.
    fn bind(&mut self, reference: &Reference, value: Value) -> EvalResult<()> {
        self.namespace().bind_at(reference, value)
    }

    /// Remove the binding at `reference` and return it.
    fn unbind(&mut self, reference: &Reference) -> EvalResult<Value> {
        self.namespace().unbind_at(reference)
    }
}
