use crate::catalog::{Subject, MANDATORY_SUBJECTS};
use std::collections::BTreeMap;

/// Raw exam points entered by the user, keyed by subject.
///
/// Created empty, edited one subject at a time, and partially reset when the
/// combination changes. Values are kept as entered; range and integer checks
/// happen in [`crate::scoring::validate_points`] before submission.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawScorePoints {
    values: BTreeMap<Subject, f64>,
}

impl RawScorePoints {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, subject: Subject, value: f64) {
        self.values.insert(subject, value);
    }

    pub fn remove(&mut self, subject: Subject) -> Option<f64> {
        self.values.remove(&subject)
    }

    pub fn get(&self, subject: Subject) -> Option<f64> {
        self.values.get(&subject).copied()
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Subject, f64)> + '_ {
        self.values.iter().map(|(s, v)| (*s, *v))
    }

    /// Apply a text edit from an input field.
    ///
    /// An empty field removes the entry. A value that does not parse or lies
    /// outside `0..=max` is ignored and the previous value stays. Returns
    /// whether the edit was accepted.
    pub fn enter(&mut self, subject: Subject, text: &str) -> bool {
        let text = text.trim();
        if text.is_empty() {
            self.remove(subject);
            return true;
        }
        match text.parse::<f64>() {
            Ok(value) if value >= 0.0 && value <= subject.max_score() as f64 => {
                self.set(subject, value);
                true
            }
            _ => false,
        }
    }

    /// Drop every elective, keeping the mandatory language subjects.
    pub fn reset_keeping_mandatory(&mut self) {
        self.values.retain(|s, _| MANDATORY_SUBJECTS.contains(s));
    }
}

impl FromIterator<(Subject, f64)> for RawScorePoints {
    fn from_iter<I: IntoIterator<Item = (Subject, f64)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enter_accepts_in_range() {
        let mut points = RawScorePoints::new();
        assert!(points.enter(Subject::Mathematics, "51"));
        assert_eq!(points.get(Subject::Mathematics), Some(51.0));
    }

    #[test]
    fn test_enter_ignores_out_of_range() {
        let mut points = RawScorePoints::new();
        points.enter(Subject::Mathematics, "40");
        assert!(!points.enter(Subject::Mathematics, "52"));
        assert!(!points.enter(Subject::Mathematics, "-1"));
        assert!(!points.enter(Subject::Mathematics, "abc"));
        assert_eq!(points.get(Subject::Mathematics), Some(40.0));
    }

    #[test]
    fn test_enter_empty_removes() {
        let mut points = RawScorePoints::new();
        points.enter(Subject::History, "12");
        assert!(points.enter(Subject::History, ""));
        assert!(points.get(Subject::History).is_none());
        assert!(points.is_empty());
    }

    #[test]
    fn test_reset_keeps_mandatory() {
        let mut points: RawScorePoints = [
            (Subject::GeorgianLanguage, 50.0),
            (Subject::ForeignLanguage, 60.0),
            (Subject::Biology, 55.0),
            (Subject::Chemistry, 40.0),
        ]
        .into_iter()
        .collect();

        points.reset_keeping_mandatory();

        assert_eq!(points.len(), 2);
        assert_eq!(points.get(Subject::GeorgianLanguage), Some(50.0));
        assert_eq!(points.get(Subject::ForeignLanguage), Some(60.0));
        assert!(points.get(Subject::Biology).is_none());
    }

    #[test]
    fn test_iter_in_catalog_order() {
        let points: RawScorePoints = [
            (Subject::Physics, 10.0),
            (Subject::GeorgianLanguage, 20.0),
        ]
        .into_iter()
        .collect();
        let order: Vec<_> = points.iter().map(|(s, _)| s).collect();
        assert_eq!(order, vec![Subject::GeorgianLanguage, Subject::Physics]);
    }
}
