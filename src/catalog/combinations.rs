use super::subjects::{Subject, MANDATORY_SUBJECTS};
use std::fmt;
use std::str::FromStr;

/// A catalog track: the one or two elective subjects a candidate sits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Combination {
    #[default]
    Mathematics,
    History,
    Physics,
    Biology,
    Chemistry,
    BiologyChemistry,
    BiologyMathematics,
    BiologyPhysics,
}

/// Catalog order (also the order shown in pickers).
pub const COMBINATIONS: [Combination; 8] = [
    Combination::Mathematics,
    Combination::History,
    Combination::Physics,
    Combination::Biology,
    Combination::Chemistry,
    Combination::BiologyChemistry,
    Combination::BiologyMathematics,
    Combination::BiologyPhysics,
];

impl Combination {
    pub fn key(self) -> &'static str {
        match self {
            Combination::Mathematics => "MATHEMATICS",
            Combination::History => "HISTORY",
            Combination::Physics => "PHYSICS",
            Combination::Biology => "BIOLOGY",
            Combination::Chemistry => "CHEMISTRY",
            Combination::BiologyChemistry => "BIOLOGY_CHEMISTRY",
            Combination::BiologyMathematics => "BIOLOGY_MATHEMATICS",
            Combination::BiologyPhysics => "BIOLOGY_PHYSICS",
        }
    }

    pub fn electives(self) -> &'static [Subject] {
        match self {
            Combination::Mathematics => &[Subject::Mathematics],
            Combination::History => &[Subject::History],
            Combination::Physics => &[Subject::Physics],
            Combination::Biology => &[Subject::Biology],
            Combination::Chemistry => &[Subject::Chemistry],
            Combination::BiologyChemistry => &[Subject::Biology, Subject::Chemistry],
            Combination::BiologyMathematics => &[Subject::Biology, Subject::Mathematics],
            Combination::BiologyPhysics => &[Subject::Biology, Subject::Physics],
        }
    }

    /// Mandatory subjects followed by the electives.
    pub fn subjects(self) -> Vec<Subject> {
        MANDATORY_SUBJECTS
            .iter()
            .chain(self.electives())
            .copied()
            .collect()
    }

    pub fn includes(self, subject: Subject) -> bool {
        subject.is_mandatory() || self.electives().contains(&subject)
    }

    /// Electives' display names joined with " & "
    pub fn display_name(self) -> String {
        self.electives()
            .iter()
            .map(|s| s.name())
            .collect::<Vec<_>>()
            .join(" & ")
    }

    pub fn position(self) -> usize {
        COMBINATIONS.iter().position(|c| *c == self).unwrap_or(0)
    }

    /// Next entry in catalog order, wrapping around.
    pub fn next(self) -> Combination {
        COMBINATIONS[(self.position() + 1) % COMBINATIONS.len()]
    }

    pub fn previous(self) -> Combination {
        let len = COMBINATIONS.len();
        COMBINATIONS[(self.position() + len - 1) % len]
    }
}

impl fmt::Display for Combination {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown combination '{0}'")]
pub struct UnknownCombination(pub String);

impl FromStr for Combination {
    type Err = UnknownCombination;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        COMBINATIONS
            .iter()
            .find(|c| c.key() == upper)
            .copied()
            .ok_or_else(|| UnknownCombination(s.to_string()))
    }
}
