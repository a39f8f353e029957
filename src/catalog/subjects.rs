use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// An exam subject.
///
/// The internal key (`FOREIGN_LANGUAGE`) and the wire label used by the
/// analysis service (`FOREIGN LANGUAGE`) are looked up from [`SUBJECTS`],
/// never derived from one another by string replacement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Subject {
    GeorgianLanguage,
    ForeignLanguage,
    Mathematics,
    History,
    Chemistry,
    Physics,
    Biology,
}

/// Static reference row for one subject.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubjectInfo {
    pub subject: Subject,
    pub key: &'static str,
    pub label: &'static str,
    pub name: &'static str,
    pub max_score: u32,
}

pub const SUBJECTS: [SubjectInfo; 7] = [
    SubjectInfo {
        subject: Subject::GeorgianLanguage,
        key: "GEORGIAN_LANGUAGE",
        label: "GEORGIAN LANGUAGE",
        name: "ქართული",
        max_score: 60,
    },
    SubjectInfo {
        subject: Subject::ForeignLanguage,
        key: "FOREIGN_LANGUAGE",
        label: "FOREIGN LANGUAGE",
        name: "უცხო ენა",
        max_score: 70,
    },
    SubjectInfo {
        subject: Subject::Mathematics,
        key: "MATHEMATICS",
        label: "MATHEMATICS",
        name: "მათემატიკა",
        max_score: 51,
    },
    SubjectInfo {
        subject: Subject::History,
        key: "HISTORY",
        label: "HISTORY",
        name: "ისტორია",
        max_score: 60,
    },
    SubjectInfo {
        subject: Subject::Chemistry,
        key: "CHEMISTRY",
        label: "CHEMISTRY",
        name: "ქიმია",
        max_score: 63,
    },
    SubjectInfo {
        subject: Subject::Physics,
        key: "PHYSICS",
        label: "PHYSICS",
        name: "ფიზიკა",
        max_score: 63,
    },
    SubjectInfo {
        subject: Subject::Biology,
        key: "BIOLOGY",
        label: "BIOLOGY",
        name: "ბიოლოგია",
        max_score: 70,
    },
];

/// Subjects every candidate sits regardless of combination.
pub const MANDATORY_SUBJECTS: [Subject; 2] = [Subject::GeorgianLanguage, Subject::ForeignLanguage];

impl Subject {
    pub fn info(self) -> &'static SubjectInfo {
        // SUBJECTS is declared in enum order
        &SUBJECTS[self as usize]
    }

    /// Internal key, e.g. `GEORGIAN_LANGUAGE`
    pub fn key(self) -> &'static str {
        self.info().key
    }

    /// Label expected by the analysis service, e.g. `GEORGIAN LANGUAGE`
    pub fn label(self) -> &'static str {
        self.info().label
    }

    /// Georgian display name
    pub fn name(self) -> &'static str {
        self.info().name
    }

    pub fn max_score(self) -> u32 {
        self.info().max_score
    }

    pub fn is_mandatory(self) -> bool {
        MANDATORY_SUBJECTS.contains(&self)
    }

    pub fn from_key(key: &str) -> Option<Subject> {
        SUBJECTS.iter().find(|s| s.key == key).map(|s| s.subject)
    }

    pub fn from_label(label: &str) -> Option<Subject> {
        SUBJECTS.iter().find(|s| s.label == label).map(|s| s.subject)
    }

    pub fn all() -> impl Iterator<Item = Subject> {
        SUBJECTS.iter().map(|s| s.subject)
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown subject '{0}'")]
pub struct UnknownSubject(pub String);

impl FromStr for Subject {
    type Err = UnknownSubject;

    /// Accepts either the key or the label form, case-insensitively.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let upper = s.trim().to_ascii_uppercase();
        Subject::from_key(&upper)
            .or_else(|| Subject::from_label(&upper))
            .ok_or_else(|| UnknownSubject(s.to_string()))
    }
}

impl TryFrom<String> for Subject {
    type Error = UnknownSubject;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Subject> for String {
    fn from(value: Subject) -> Self {
        value.key().to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_matches_enum_order() {
        for (i, info) in SUBJECTS.iter().enumerate() {
            assert_eq!(info.subject as usize, i);
        }
    }

    #[test]
    fn test_key_label_lookup() {
        assert_eq!(Subject::GeorgianLanguage.label(), "GEORGIAN LANGUAGE");
        assert_eq!(Subject::from_key("FOREIGN_LANGUAGE"), Some(Subject::ForeignLanguage));
        assert_eq!(Subject::from_label("FOREIGN LANGUAGE"), Some(Subject::ForeignLanguage));
        assert_eq!(Subject::from_label("FOREIGN_LANGUAGE"), None);
        assert_eq!(Subject::from_key("FOREIGN LANGUAGE"), None);
    }

    #[test]
    fn test_key_label_roundtrip_for_every_subject() {
        for subject in Subject::all() {
            assert_eq!(Subject::from_key(subject.key()), Some(subject));
            assert_eq!(Subject::from_label(subject.label()), Some(subject));
        }
    }

    #[test]
    fn test_max_scores() {
        assert_eq!(Subject::Mathematics.max_score(), 51);
        assert_eq!(Subject::Biology.max_score(), 70);
        assert_eq!(Subject::GeorgianLanguage.max_score(), 60);
        assert_eq!(Subject::ForeignLanguage.max_score(), 70);
    }

    #[test]
    fn test_parse_accepts_both_forms() {
        assert_eq!("georgian language".parse::<Subject>().unwrap(), Subject::GeorgianLanguage);
        assert_eq!("GEORGIAN_LANGUAGE".parse::<Subject>().unwrap(), Subject::GeorgianLanguage);
        assert!("ASTRONOMY".parse::<Subject>().is_err());
    }

    #[test]
    fn test_serde_reads_labels_and_writes_keys() {
        let subject: Subject = serde_json::from_str("\"FOREIGN LANGUAGE\"").unwrap();
        assert_eq!(subject, Subject::ForeignLanguage);
        assert_eq!(serde_json::to_string(&subject).unwrap(), "\"FOREIGN_LANGUAGE\"");
    }

    #[test]
    fn test_mandatory() {
        assert!(Subject::GeorgianLanguage.is_mandatory());
        assert!(!Subject::Physics.is_mandatory());
    }
}
