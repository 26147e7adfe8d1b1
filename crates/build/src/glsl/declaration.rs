//! Declaration tracking
//!
//! Watches declaration keywords so the rewriter knows when the next renamed
//! identifier names a uniform, a vertex attribute or a stage output.

use super::session::ShaderStage;

/// What the next renamed identifier is being declared as
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DeclarationState {
    #[default]
    None,
    Uniform,
    /// `in` variable of a vertex shader, i.e. an attribute
    Input,
    Output,
}

impl DeclarationState {
    /// Whether the identifier must keep the same alias in every stage of a program
    pub fn is_shared(self) -> bool {
        self != Self::None
    }

    /// Prefix of the macro name recorded for this declaration
    ///
    /// Outputs only get a macro when `record_outputs` is set; by default they are
    /// shared between stages but not exposed to the host.
    pub fn macro_prefix(self, record_outputs: bool) -> Option<&'static str> {
        match self {
            Self::Uniform => Some("UNI"),
            Self::Input => Some("ATTR"),
            Self::Output if record_outputs => Some("OUT"),
            Self::Output | Self::None => None,
        }
    }
}

/// Declaration state machine for a single shader file
#[derive(Debug, Clone)]
pub struct DeclarationTracker {
    stage: ShaderStage,
    state: DeclarationState,
    paren_depth: usize,
}

impl DeclarationTracker {
    pub fn new(stage: ShaderStage) -> Self {
        Self {
            stage,
            state: DeclarationState::None,
            paren_depth: 0,
        }
    }

    pub fn state(&self) -> DeclarationState {
        self.state
    }

    /// Feeds a reserved word
    ///
    /// Qualifiers inside parentheses belong to function parameters and are ignored.
    pub fn observe_keyword(&mut self, word: &[u8]) {
        if self.paren_depth > 0 {
            return;
        }
        match word {
            b"uniform" => self.state = DeclarationState::Uniform,
            b"in" => {
                self.state = match self.stage {
                    ShaderStage::Vertex => DeclarationState::Input,
                    ShaderStage::Fragment => DeclarationState::None,
                }
            }
            b"out" => self.state = DeclarationState::Output,
            _ => {}
        }
    }

    /// Feeds a punctuation byte to follow parenthesis nesting
    pub fn observe_punctuation(&mut self, byte: u8) {
        match byte {
            b'(' => self.paren_depth += 1,
            b')' => self.paren_depth = self.paren_depth.saturating_sub(1),
            _ => {}
        }
    }

    /// Takes the pending state for a renamed identifier, leaving `None` behind
    pub fn consume(&mut self) -> DeclarationState {
        std::mem::take(&mut self.state)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uniform_is_consumed_once() {
        let mut tracker = DeclarationTracker::new(ShaderStage::Fragment);
        tracker.observe_keyword(b"uniform");
        tracker.observe_keyword(b"vec4");
        assert_eq!(tracker.consume(), DeclarationState::Uniform);
        assert_eq!(tracker.consume(), DeclarationState::None);
    }

    #[test]
    fn test_input_depends_on_stage() {
        let mut vertex = DeclarationTracker::new(ShaderStage::Vertex);
        vertex.observe_keyword(b"in");
        assert_eq!(vertex.state(), DeclarationState::Input);

        let mut fragment = DeclarationTracker::new(ShaderStage::Fragment);
        fragment.observe_keyword(b"uniform");
        fragment.observe_keyword(b"in");
        assert_eq!(fragment.state(), DeclarationState::None);
    }

    #[test]
    fn test_output_and_prefixes() {
        let mut tracker = DeclarationTracker::new(ShaderStage::Vertex);
        tracker.observe_keyword(b"out");
        let state = tracker.consume();
        assert_eq!(state, DeclarationState::Output);
        assert!(state.is_shared());
        assert_eq!(state.macro_prefix(false), None);
        assert_eq!(state.macro_prefix(true), Some("OUT"));
        assert_eq!(DeclarationState::Uniform.macro_prefix(false), Some("UNI"));
        assert_eq!(DeclarationState::Input.macro_prefix(false), Some("ATTR"));
        assert!(!DeclarationState::None.is_shared());
    }

    #[test]
    fn test_parameter_qualifiers_are_ignored() {
        let mut tracker = DeclarationTracker::new(ShaderStage::Vertex);
        tracker.observe_punctuation(b'(');
        tracker.observe_keyword(b"in");
        assert_eq!(tracker.state(), DeclarationState::None);
        tracker.observe_punctuation(b')');
        tracker.observe_keyword(b"in");
        assert_eq!(tracker.state(), DeclarationState::Input);
    }
}
