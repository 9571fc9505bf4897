//! The interpreter loop.
//!
//! # State
//!
//! - `frames`: the call stack. Each frame owns one instruction stream and
//!   remembers the namespace to restore when it runs dry.
//! - `arg_counts`: one runtime count per open expression, tracking how
//!   many values the expression has put on the stack so far (its callable
//!   included). Each frame only touches the counts it opened itself.
//! - `stack`: a single data stack. A call frame sees the window of slots
//!   at or above its base, which initially holds the call's arguments.
//! - `current`: the namespace references resolve from.
//!
//! # Qualified calls
//!
//! Calling `a:b:f` re-links `a` and `b` so the callee resolves names from
//! where it was defined. Those links point back at namespaces that bind
//! them, so they are temporary: each frame records the links it replaced
//! and puts them back when it exits, or when an error resets the
//! interpreter. No link made for a call outlives the call.
//!
//! # Loop
//!
//! Pull the next instruction from the innermost stream and dispatch it.
//! When a stream is exhausted its frame exits: the values left in its
//! window become results in the caller's open expression. The loop halts
//! when no streams remain, or on the first error. Errors reset the
//! interpreter to the root namespace with an empty stack so that it can
//! be reused.
//!
//! Code blocks are entered by pushing a frame, never by recursing, so the
//! host stack depth does not grow with PSIL call depth.

mod builder;
mod stream;

use std::mem;

use psil_ir::errors::{
    frame_limit_exceeded, name_not_found, not_callable, stack_underflow, type_mismatch,
};
use psil_ir::{
    CodeBody, ErrorContext, EvalResult, Instruction, Machine, Namespace, NativeCode, Reference,
    SourceBlock, Value,
};

pub use builder::InterpreterBuilder;
use stream::OpStream;

use crate::config::InterpreterConfig;
use crate::print_handler::SharedPrintHandler;

/// One entry of the call stack.
struct CallFrame {
    stream: OpStream,
    /// Namespace that was current when the frame was entered.
    return_to: Namespace,
    /// Length of `arg_counts` when the frame was entered. Counts below
    /// this belong to callers.
    count_floor: usize,
    /// First stack slot of the frame's window.
    base: usize,
    /// Search links replaced on entry, in order, with their old targets.
    relinked: Vec<Relink>,
}

/// A search link replaced for the duration of a qualified call.
struct Relink {
    namespace: Namespace,
    previous: Option<Namespace>,
}

impl Relink {
    fn restore(self) {
        let restored = self
            .previous
            .is_some_and(|previous| self.namespace.link_to(&previous));
        if !restored {
            self.namespace.clear_search_link();
        }
    }
}

/// Undo `relinked` newest first.
fn restore_links(relinked: Vec<Relink>) {
    for relink in relinked.into_iter().rev() {
        relink.restore();
    }
}

/// PSIL interpreter.
///
/// Global bindings made by one [`run`](Self::run) are visible to the
/// next, as are values a successful run leaves on the stack.
pub struct Interpreter {
    root: Namespace,
    current: Namespace,
    stack: Vec<Value>,
    arg_counts: Vec<usize>,
    frames: Vec<CallFrame>,
    /// Window start of the native call in progress.
    native_start: Option<usize>,
    /// Name of the code most recently called, for error context.
    calling: Option<Reference>,
    print_handler: SharedPrintHandler,
    config: InterpreterConfig,
}

impl Default for Interpreter {
    fn default() -> Self {
        Interpreter::new()
    }
}

impl Interpreter {
    /// An interpreter with the builtins, writing to stdout.
    pub fn new() -> Self {
        InterpreterBuilder::new().build()
    }

    pub fn builder() -> InterpreterBuilder {
        InterpreterBuilder::new()
    }

    /// The global namespace.
    pub fn root(&self) -> &Namespace {
        &self.root
    }

    /// The whole data stack, bottom first.
    pub fn stack(&self) -> &[Value] {
        &self.stack
    }

    pub fn print_handler(&self) -> &SharedPrintHandler {
        &self.print_handler
    }

    pub fn config(&self) -> &InterpreterConfig {
        &self.config
    }

    /// Returns `true` when no instruction stream is active.
    pub fn is_halted(&self) -> bool {
        self.frames.is_empty()
    }

    /// Run `source` as a top-level program, to completion or first error.
    ///
    /// The program is parsed lazily: instructions before a syntax error
    /// have already executed when it is reported.
    #[tracing::instrument(level = "debug", skip_all, fields(chars = source.len()))]
    pub fn run(&mut self, source: &str) -> EvalResult<()> {
        let base = self.base();
        self.frames.push(CallFrame {
            stream: OpStream::source(source),
            return_to: self.current.clone(),
            count_floor: self.arg_counts.len(),
            base,
            relinked: Vec::new(),
        });
        let result = self.drive();
        if let Err(err) = &result {
            tracing::debug!(error = %err, "halted on error");
            self.reset();
        }
        result
    }

    /// Drop all streams, counts, and stack values, and return to the root
    /// namespace. Bindings are kept.
    pub fn reset(&mut self) {
        while let Some(frame) = self.frames.pop() {
            restore_links(frame.relinked);
        }
        self.arg_counts.clear();
        self.stack.clear();
        self.current = self.root.clone();
        self.native_start = None;
        self.calling = None;
    }

    fn drive(&mut self) -> EvalResult<()> {
        while let Some(frame) = self.frames.last_mut() {
            let Some(next) = frame.stream.next() else {
                self.exit_frame();
                continue;
            };
            let instruction = next?;
            tracing::trace!(%instruction, depth = self.frames.len(), "dispatch");
            if let Err(err) = self.dispatch(&instruction) {
                let context = self.error_context(&instruction);
                return Err(err.with_context(context));
            }
        }
        Ok(())
    }

    fn dispatch(&mut self, instruction: &Instruction) -> EvalResult<()> {
        match instruction {
            Instruction::Push(Value::Reference(reference), _) => {
                let value = self.current.resolve(reference)?;
                self.push_counted(value);
            }
            Instruction::Push(value, _) => self.push_counted(value.clone()),
            Instruction::NewExpression(_) => self.arg_counts.push(0),
            Instruction::Execute(..) => self.execute()?,
        }
        Ok(())
    }

    // Stack windows and expression counts

    /// First stack slot visible to the current frame.
    fn base(&self) -> usize {
        self.current.nearest_frame().map_or(0, |window| window.base)
    }

    fn count_floor(&self) -> usize {
        self.frames.last().map_or(0, |frame| frame.count_floor)
    }

    /// The innermost open expression's count, if the current frame has one.
    fn innermost_count(&mut self, floor: usize) -> Option<&mut usize> {
        if self.arg_counts.len() > floor {
            self.arg_counts.last_mut()
        } else {
            None
        }
    }

    fn push_counted(&mut self, value: Value) {
        self.stack.push(value);
        let floor = self.count_floor();
        if let Some(count) = self.innermost_count(floor) {
            *count += 1;
        }
    }

    /// Move the stack from `before` to `after` slots in the eyes of the
    /// open expression governed by `floor`.
    fn account(&mut self, floor: usize, before: usize, after: usize) {
        if let Some(count) = self.innermost_count(floor) {
            if after >= before {
                *count += after - before;
            } else {
                *count = count.saturating_sub(before - after);
            }
        }
    }

    // Calls

    fn execute(&mut self) -> EvalResult<()> {
        let base = self.base();
        if self.stack.len() <= base {
            return Err(stack_underflow());
        }
        let callable = self.stack.pop().ok_or_else(stack_underflow)?;
        let floor = self.count_floor();
        let written = if self.arg_counts.len() > floor {
            self.arg_counts.pop().unwrap_or(0)
        } else {
            0
        };
        let args = written.saturating_sub(1);
        if args > self.stack.len() - base {
            return Err(stack_underflow());
        }
        let start = self.stack.len() - args;
        self.call(callable, start, true)
    }

    /// Call `callable` with the stack slots from `start` up as arguments.
    ///
    /// With `account` set, a native's net effect on the stack is credited
    /// to the caller's open expression. Natives scheduled from inside
    /// other natives leave that to the outer call.
    fn call(&mut self, callable: Value, start: usize, account: bool) -> EvalResult<()> {
        let code = match callable {
            Value::Code(code) => code,
            other => return Err(not_callable(other.type_name())),
        };
        self.calling = code.name().cloned();
        match code.body() {
            CodeBody::Native(native) => self.call_native(*native, start, account),
            CodeBody::Interpreted(block) => {
                let (link, relinked) = match code.name() {
                    Some(name) if name.is_qualified() => self.definition_site(name)?,
                    _ => (self.current.clone(), Vec::new()),
                };
                self.enter_frame(block, link, relinked, start)
            }
        }
    }

    fn call_native(&mut self, native: NativeCode, start: usize, account: bool) -> EvalResult<()> {
        tracing::trace!(name = native.name(), args = self.stack.len() - start, "native call");
        let floor = self.count_floor();
        let frames_before = self.frames.len();
        let saved = self.native_start.replace(start);
        let result = native.call(self);
        self.native_start = saved;
        result?;
        if account {
            // Values handed to a frame the native scheduled are that
            // frame's business until it exits.
            let end = self
                .frames
                .get(frames_before)
                .map_or(self.stack.len(), |frame| frame.base);
            self.account(floor, start, end);
        }
        Ok(())
    }

    /// Rebuild the search path of a qualified name `a:b:f` from where it
    /// was defined: `a` links to the namespace `a` was found in, `b` links
    /// to `a`. Returns the namespace the new frame should link to, and the
    /// links replaced on the way.
    ///
    /// A namespace already on the chain above the segment's parent (`a:a:f`
    /// with `a` bound inside itself) keeps its link; the path through it is
    /// still rooted at the definition site.
    fn definition_site(&self, name: &Reference) -> EvalResult<(Namespace, Vec<Relink>)> {
        let segments = name.segments();
        let Some((first, _)) = segments.split_first() else {
            return Ok((self.current.clone(), Vec::new()));
        };
        let mut cursor = self
            .current
            .origin(name, first)
            .map_err(|err| err.for_reference(name))?;
        let mut relinked = Vec::new();
        for segment in &segments[..segments.len() - 1] {
            let ns = match cursor.lookup_local(segment) {
                Some(Value::Namespace(ns)) => ns,
                Some(other) => {
                    restore_links(relinked);
                    return Err(type_mismatch("namespace", other.type_name()));
                }
                None => {
                    restore_links(relinked);
                    return Err(name_not_found(name.to_string(), &**segment));
                }
            };
            let previous = ns.search_link();
            if ns.link_to(&cursor) {
                relinked.push(Relink {
                    namespace: ns.clone(),
                    previous,
                });
            }
            cursor = ns;
        }
        Ok((cursor, relinked))
    }

    fn enter_frame(
        &mut self,
        block: &SourceBlock,
        link: Namespace,
        relinked: Vec<Relink>,
        start: usize,
    ) -> EvalResult<()> {
        if self.frames.len() >= self.config.max_frames {
            restore_links(relinked);
            return Err(frame_limit_exceeded(self.config.max_frames));
        }
        let instructions = match psil_parse::instructions(block) {
            Ok(instructions) => instructions,
            Err(err) => {
                restore_links(relinked);
                return Err(err.into());
            }
        };
        let frame = Namespace::new_frame(Some(link), start);
        tracing::debug!(
            depth = self.frames.len() + 1,
            args = self.stack.len() - start,
            "enter frame"
        );
        let return_to = mem::replace(&mut self.current, frame);
        self.frames.push(CallFrame {
            stream: OpStream::block(instructions),
            return_to,
            count_floor: self.arg_counts.len(),
            base: start,
            relinked,
        });
        Ok(())
    }

    fn exit_frame(&mut self) {
        let Some(frame) = self.frames.pop() else {
            return;
        };
        self.arg_counts.truncate(frame.count_floor);
        restore_links(frame.relinked);
        self.current = frame.return_to;
        let leftover = self.stack.len().saturating_sub(frame.base);
        tracing::debug!(depth = self.frames.len(), results = leftover, "exit frame");
        let floor = self.count_floor();
        if !self.frames.is_empty() {
            self.account(floor, 0, leftover);
        }
    }

    fn error_context(&self, instruction: &Instruction) -> ErrorContext {
        let reference = match instruction {
            Instruction::Push(Value::Reference(reference), _) => Some(reference.clone()),
            _ => self.calling.clone(),
        };
        let window = self.stack.get(self.base()..).unwrap_or_default();
        ErrorContext {
            instruction: instruction.to_string(),
            span: instruction.span(),
            reference,
            stack: window.iter().map(ToString::to_string).collect(),
        }
    }
}

impl Machine for Interpreter {
    fn pop(&mut self) -> EvalResult<Value> {
        if self.stack.len() <= self.base() {
            return Err(stack_underflow());
        }
        self.stack.pop().ok_or_else(stack_underflow)
    }

    fn push(&mut self, value: Value) {
        self.stack.push(value);
    }

    fn peek(&self) -> EvalResult<&Value> {
        if self.stack.len() <= self.base() {
            return Err(stack_underflow());
        }
        self.stack.last().ok_or_else(stack_underflow)
    }

    fn depth(&self) -> usize {
        self.stack.len().saturating_sub(self.base())
    }

    fn namespace(&self) -> Namespace {
        self.current.clone()
    }

    fn output(&mut self, line: &str) {
        self.print_handler.println(line);
    }

    fn append_env(&mut self, callable: Value) -> EvalResult<()> {
        let len = self.stack.len();
        let start = self.native_start.unwrap_or(len).max(self.base()).min(len);
        self.call(callable, start, false)
    }
}

#[cfg(test)]
mod tests;
