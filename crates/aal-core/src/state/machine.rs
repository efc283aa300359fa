use std::collections::HashMap;

use crate::Word;

/// Variable name to current value. Entries appear on first write.
pub type VariableStore = HashMap<String, Word>;

/// Everything an executing program can observe or change.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct MachineState {
    accumulator: Word,
    variables: VariableStore,
    counter: usize,
    steps: u64,
}

impl MachineState {
    /// Reads the accumulator.
    #[must_use]
    pub const fn accumulator(&self) -> Word {
        self.accumulator
    }

    /// Writes the accumulator.
    pub const fn set_accumulator(&mut self, value: Word) {
        self.accumulator = value;
    }

    /// Reads a variable, `None` if it was never written.
    #[must_use]
    pub fn variable(&self, name: &str) -> Option<Word> {
        self.variables.get(name).copied()
    }

    /// Creates or overwrites a variable.
    pub fn set_variable(&mut self, name: &str, value: Word) {
        if let Some(slot) = self.variables.get_mut(name) {
            *slot = value;
        } else {
            self.variables.insert(name.to_string(), value);
        }
    }

    /// All variables written so far.
    #[must_use]
    pub const fn variables(&self) -> &VariableStore {
        &self.variables
    }

    /// 0-based index of the next instruction.
    #[must_use]
    pub const fn counter(&self) -> usize {
        self.counter
    }

    /// Moves the program counter.
    pub const fn set_counter(&mut self, index: usize) {
        self.counter = index;
    }

    /// Instructions executed since the last reset.
    #[must_use]
    pub const fn steps(&self) -> u64 {
        self.steps
    }

    /// Counts one executed instruction.
    pub const fn retire_step(&mut self) {
        self.steps = self.steps.saturating_add(1);
    }

    /// Zeroes the accumulator, counter and step count and drops every variable.
    pub fn reset(&mut self) {
        self.accumulator = 0;
        self.variables.clear();
        self.counter = 0;
        self.steps = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::MachineState;

    #[test]
    fn default_state_is_zeroed() {
        let state = MachineState::default();
        assert_eq!(state.accumulator(), 0);
        assert_eq!(state.counter(), 0);
        assert_eq!(state.steps(), 0);
        assert!(state.variables().is_empty());
    }

    #[test]
    fn variables_are_created_lazily_and_overwritten() {
        let mut state = MachineState::default();
        assert_eq!(state.variable("X"), None);
        state.set_variable("X", 5);
        state.set_variable("X", -7);
        assert_eq!(state.variable("X"), Some(-7));
        assert_eq!(state.variables().len(), 1);
    }

    #[test]
    fn variable_names_are_case_sensitive() {
        let mut state = MachineState::default();
        state.set_variable("x", 1);
        assert_eq!(state.variable("X"), None);
    }

    #[test]
    fn reset_clears_everything() {
        let mut state = MachineState::default();
        state.set_accumulator(42);
        state.set_variable("N", 3);
        state.set_counter(9);
        state.retire_step();
        state.retire_step();
        assert_eq!(state.steps(), 2);

        state.reset();
        assert_eq!(state, MachineState::default());
    }
}
