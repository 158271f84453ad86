const DEFAULT_LOOK_AHEAD: usize = 2;
const DEFAULT_VALIDATE_FACTS: bool = true;

/// The smallest window that can tell a function call `f(` from a variable `f`.
pub const MIN_LOOK_AHEAD: usize = 2;

#[derive(Debug, Clone)]
pub struct Options {
    /// The number of tokens the parser buffers ahead of the current position.
    /// Values below [`MIN_LOOK_AHEAD`] are raised to it.
    pub look_ahead: usize,
    /// Whether to check function calls in preconditions against the declared fact types.
    /// Only applies if the source declares a world.
    /// Validation only produces diagnostics, it never changes the parsed tree.
    pub validate_facts: bool,
}

impl Default for Options {
    fn default() -> Self {
        Self {
            look_ahead: DEFAULT_LOOK_AHEAD,
            validate_facts: DEFAULT_VALIDATE_FACTS,
        }
    }
}

impl Options {
    pub fn set_look_ahead(&mut self, n: usize) {
        self.look_ahead = n.max(MIN_LOOK_AHEAD);
    }
}
