//! `InterpreterBuilder` for creating interpreters with non-default output,
//! root namespace, or limits.

use psil_ir::Namespace;

use super::Interpreter;
use crate::builtins::install_builtins;
use crate::config::InterpreterConfig;
use crate::print_handler::{stdout_handler, SharedPrintHandler};

/// Builder for [`Interpreter`].
///
/// ```ignore
/// let output = buffer_handler();
/// let mut interp = InterpreterBuilder::new()
///     .print_handler(output.clone())
///     .max_frames(256)
///     .build();
/// ```
#[derive(Default)]
pub struct InterpreterBuilder {
    root: Option<Namespace>,
    print_handler: Option<SharedPrintHandler>,
    config: InterpreterConfig,
}

impl InterpreterBuilder {
    pub fn new() -> Self {
        InterpreterBuilder::default()
    }

    /// Use `root` as the global namespace instead of a fresh one.
    ///
    /// The builtins are bound into it on [`build`](Self::build), replacing
    /// any existing bindings with the same names.
    #[must_use]
    pub fn root(mut self, root: Namespace) -> Self {
        self.root = Some(root);
        self
    }

    /// Set where `out` writes. Default is stdout.
    #[must_use]
    pub fn print_handler(mut self, handler: SharedPrintHandler) -> Self {
        self.print_handler = Some(handler);
        self
    }

    #[must_use]
    pub fn max_frames(mut self, max_frames: usize) -> Self {
        self.config.max_frames = max_frames;
        self
    }

    #[must_use]
    pub fn config(mut self, config: InterpreterConfig) -> Self {
        self.config = config;
        self
    }

    pub fn build(self) -> Interpreter {
        let root = self.root.unwrap_or_default();
        // A root is never anyone's child.
        root.clear_search_link();
        install_builtins(&root);
        Interpreter {
            current: root.clone(),
            root,
            stack: Vec::new(),
            arg_counts: Vec::new(),
            frames: Vec::new(),
            native_start: None,
            calling: None,
            print_handler: self.print_handler.unwrap_or_else(stdout_handler),
            config: self.config,
        }
    }
}
