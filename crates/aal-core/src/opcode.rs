//! Closed opcode set and mnemonic lookup.

use std::fmt;

/// The fourteen operations understood by the interpreter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Deserialize, serde::Serialize))]
pub enum Opcode {
    /// `ACC <- value(loc)`.
    Load,
    /// `var[loc] <- ACC`.
    Store,
    /// `ACC <- (ACC + value(loc)) mod MAX`.
    Add,
    /// `ACC <- (ACC - value(loc)) mod MAX`.
    Sub,
    /// `ACC <- (ACC * value(loc)) mod MAX`.
    Mult,
    /// `ACC <- ACC / value(loc)`, truncating and unreduced.
    Div,
    /// Branch when `ACC == 0`.
    Be,
    /// Branch when `ACC > 0`.
    Bg,
    /// Branch when `ACC < 0`.
    Bl,
    /// Unconditional branch.
    Bu,
    /// Terminates the run.
    End,
    /// Reads one integer from the input source into a variable.
    Read,
    /// Writes `value(loc)` to the output sink.
    Print,
    /// Declares a variable (the line label) with a literal value.
    Dc,
}

/// Mnemonic table in declaration order.
///
/// Any name not present here is not an opcode.
pub const OPCODE_TABLE: &[(&str, Opcode)] = &[
    ("LOAD", Opcode::Load),
    ("STORE", Opcode::Store),
    ("ADD", Opcode::Add),
    ("SUB", Opcode::Sub),
    ("MULT", Opcode::Mult),
    ("DIV", Opcode::Div),
    ("BE", Opcode::Be),
    ("BG", Opcode::Bg),
    ("BL", Opcode::Bl),
    ("BU", Opcode::Bu),
    ("END", Opcode::End),
    ("READ", Opcode::Read),
    ("PRINT", Opcode::Print),
    ("DC", Opcode::Dc),
];

impl Opcode {
    /// Resolves a mnemonic. Matching is ASCII case-insensitive and exact.
    #[must_use]
    pub fn from_mnemonic(name: &str) -> Option<Self> {
        OPCODE_TABLE
            .iter()
            .find(|(mnemonic, _)| mnemonic.eq_ignore_ascii_case(name))
            .map(|(_, opcode)| *opcode)
    }

    /// Canonical upper-case mnemonic.
    #[must_use]
    pub const fn mnemonic(self) -> &'static str {
        match self {
            Self::Load => "LOAD",
            Self::Store => "STORE",
            Self::Add => "ADD",
            Self::Sub => "SUB",
            Self::Mult => "MULT",
            Self::Div => "DIV",
            Self::Be => "BE",
            Self::Bg => "BG",
            Self::Bl => "BL",
            Self::Bu => "BU",
            Self::End => "END",
            Self::Read => "READ",
            Self::Print => "PRINT",
            Self::Dc => "DC",
        }
    }

    /// Returns `true` for `BE`, `BG`, `BL` and `BU`.
    #[must_use]
    pub const fn is_branch(self) -> bool {
        matches!(self, Self::Be | Self::Bg | Self::Bl | Self::Bu)
    }

    /// Whether a well-formed line with this opcode carries an operand.
    #[must_use]
    pub const fn takes_operand(self) -> bool {
        !matches!(self, Self::End)
    }
}

impl fmt::Display for Opcode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.mnemonic())
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use rstest::rstest;

    use super::{Opcode, OPCODE_TABLE};

    #[test]
    fn table_has_fourteen_unique_entries() {
        let names: HashSet<_> = OPCODE_TABLE.iter().map(|(name, _)| *name).collect();
        let opcodes: HashSet<_> = OPCODE_TABLE.iter().map(|(_, op)| *op).collect();
        assert_eq!(OPCODE_TABLE.len(), 14);
        assert_eq!(names.len(), 14);
        assert_eq!(opcodes.len(), 14);
    }

    #[test]
    fn table_names_match_canonical_mnemonics() {
        for (name, opcode) in OPCODE_TABLE {
            assert_eq!(opcode.mnemonic(), *name);
            assert_eq!(opcode.to_string(), *name);
        }
    }

    #[rstest]
    #[case("load", Some(Opcode::Load))]
    #[case("Mult", Some(Opcode::Mult))]
    #[case("pRiNt", Some(Opcode::Print))]
    #[case("dc", Some(Opcode::Dc))]
    #[case("LOADX", None)]
    #[case("LOA", None)]
    #[case("", None)]
    #[case("=5", None)]
    fn mnemonic_lookup_is_case_insensitive_and_exact(
        #[case] name: &str,
        #[case] expected: Option<Opcode>,
    ) {
        assert_eq!(Opcode::from_mnemonic(name), expected);
    }

    #[test]
    fn branch_subset_is_exactly_four_opcodes() {
        let branches: Vec<_> = OPCODE_TABLE
            .iter()
            .map(|(_, op)| *op)
            .filter(|op| op.is_branch())
            .collect();
        assert_eq!(
            branches,
            vec![Opcode::Be, Opcode::Bg, Opcode::Bl, Opcode::Bu]
        );
    }

    #[test]
    fn only_end_goes_without_operand() {
        for (_, opcode) in OPCODE_TABLE {
            assert_eq!(opcode.takes_operand(), *opcode != Opcode::End);
        }
    }
}
