//! Static reference data: subjects, combinations and grant thresholds.

pub mod combinations;
pub mod subjects;
pub mod thresholds;

pub use combinations::{Combination, UnknownCombination, COMBINATIONS};
pub use subjects::{Subject, SubjectInfo, UnknownSubject, MANDATORY_SUBJECTS, SUBJECTS};
pub use thresholds::{threshold, thresholds_for, GrantThreshold, EXAM_YEARS};
