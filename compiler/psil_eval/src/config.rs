//! Interpreter limits.

/// Default bound on simultaneously active instruction streams.
pub const DEFAULT_MAX_FRAMES: usize = 10_000;

/// Resource limits for one interpreter.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InterpreterConfig {
    /// Maximum number of active call frames, the top-level program included.
    ///
    /// Entering a frame beyond this is a `FrameLimitExceeded` error. This
    /// bounds runaway recursion; it is not a timeout.
    pub max_frames: usize,
}

impl Default for InterpreterConfig {
    fn default() -> Self {
        InterpreterConfig {
            max_frames: DEFAULT_MAX_FRAMES,
        }
    }
}
