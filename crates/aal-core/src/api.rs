//! Host-facing configuration and outcome types for the execution engine.

/// Integer type held by the accumulator and every variable.
///
/// Literals and input are 32-bit, but `MULT` may briefly exceed that range
/// before reduction, so storage is 64-bit.
pub type Word = i64;

/// Modulus applied after `ADD`, `SUB`, `MULT`, `READ` and literal parsing.
pub const MODULUS: Word = 1_000_000;

/// Per-run engine configuration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct EngineConfig {
    /// Echo every instruction and its effect to the output sink.
    pub verbose: bool,
    /// Abort once more than this many instructions have executed.
    pub step_limit: Option<u64>,
}

impl EngineConfig {
    /// Quiet, unbounded configuration with tracing switched on or off.
    #[must_use]
    pub const fn with_verbose(verbose: bool) -> Self {
        Self {
            verbose,
            step_limit: None,
        }
    }

    /// Returns a copy bounded to `limit` executed instructions.
    #[must_use]
    pub const fn with_step_limit(mut self, limit: u64) -> Self {
        self.step_limit = Some(limit);
        self
    }
}

/// How a successful run stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Termination {
    /// An `END` instruction executed.
    End,
    /// The counter moved past the last instruction.
    RanOffEnd,
}

/// Result of executing one instruction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum StepOutcome {
    /// The instruction retired and execution can continue.
    Continue,
    /// The run is over.
    Finished(Termination),
}

/// Summary of a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub struct RunOutcome {
    /// Instructions executed, `END` included.
    pub steps: u64,
    /// Which terminal condition was reached.
    pub termination: Termination,
}

#[cfg(test)]
mod tests {
    use super::{EngineConfig, MODULUS};

    #[test]
    fn default_config_is_quiet_and_unbounded() {
        let config = EngineConfig::default();
        assert!(!config.verbose);
        assert_eq!(config.step_limit, None);
    }

    #[test]
    fn builder_helpers_compose() {
        let config = EngineConfig::with_verbose(true).with_step_limit(50);
        assert!(config.verbose);
        assert_eq!(config.step_limit, Some(50));
    }

    #[test]
    fn modulus_fits_in_i32() {
        assert!(i32::try_from(MODULUS).is_ok());
    }
}
