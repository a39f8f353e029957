use super::scale::{enrollment_scale, ScaleLayout};
use crate::api::types::EnrollmentOutcome;
use crate::selection::{FacultySelection, FacultySelector};

impl EnrollmentOutcome {
    /// The candidate would sit exactly one place past the last enrolled
    /// student of a faculty that did not fill every seat. Shown as the
    /// extra-seats footnote.
    pub fn is_first_unseated_rank(&self) -> bool {
        self.rank == self.total_enrolled + 1 && self.total_enrolled != self.total_available
    }

    /// `rank/total_enrolled`, or `-` when the rank is past every available seat.
    pub fn rank_label(&self) -> String {
        if self.rank > self.total_available {
            "-".to_string()
        } else {
            format!("{}/{}", self.rank, self.total_enrolled)
        }
    }

    pub fn scale(&self, pad: f64) -> Option<ScaleLayout> {
        let thresholds = self.thresholds.as_ref()?;
        enrollment_scale(thresholds, self.contest_score, pad)
    }
}

/// One selected faculty with its matched outcome, if the service returned one.
#[derive(Debug, Clone, PartialEq)]
pub struct EnrollmentRow {
    pub selector: FacultySelector,
    pub outcome: Option<EnrollmentOutcome>,
}

/// Pair each selected faculty (in selection order) with its outcome.
pub fn match_enrollments(
    selection: &FacultySelection,
    outcomes: &[EnrollmentOutcome],
) -> Vec<EnrollmentRow> {
    selection
        .iter()
        .map(|selector| EnrollmentRow {
            selector: selector.clone(),
            outcome: outcomes
                .iter()
                .find(|o| selector.matches(&o.faculty_id, o.year))
                .cloned(),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::types::EnrollmentThresholds;
    use crate::scoring::ENROLLMENT_SCALE_PAD;

    fn outcome(rank: u32, enrolled: u32, available: u32) -> EnrollmentOutcome {
        EnrollmentOutcome {
            faculty_id: "0412".to_string(),
            year: 2023,
            contest_score: 800.0,
            rank,
            total_enrolled: enrolled,
            total_available: available,
            seats_with_subject: 10,
            thresholds: Some(EnrollmentThresholds {
                min_score: Some(700.0),
                max_score: Some(900.0),
            }),
        }
    }

    fn selector(id: &str, year: u16) -> FacultySelector {
        FacultySelector {
            faculty_id: id.to_string(),
            year,
            university_name: "TSU".to_string(),
            faculty_name: "Medicine".to_string(),
            subjects: vec![],
        }
    }

    #[test]
    fn test_first_unseated_rank() {
        assert!(outcome(41, 40, 45).is_first_unseated_rank());
        // faculty full
        assert!(!outcome(41, 40, 40).is_first_unseated_rank());
        assert!(!outcome(42, 40, 45).is_first_unseated_rank());
        assert!(!outcome(40, 40, 45).is_first_unseated_rank());
    }

    #[test]
    fn test_rank_label() {
        assert_eq!(outcome(14, 40, 45).rank_label(), "14/40");
        assert_eq!(outcome(45, 40, 45).rank_label(), "45/40");
        assert_eq!(outcome(46, 40, 45).rank_label(), "-");
    }

    #[test]
    fn test_scale_requires_thresholds() {
        let mut o = outcome(1, 10, 10);
        assert!(o.scale(ENROLLMENT_SCALE_PAD).is_some());
        o.thresholds = None;
        assert!(o.scale(ENROLLMENT_SCALE_PAD).is_none());
    }

    #[test]
    fn test_match_keeps_selection_order() {
        let selection: FacultySelection = vec![selector("9", 2024), selector("0412", 2023)]
            .into_iter()
            .collect();
        let rows = match_enrollments(&selection, &[outcome(3, 10, 12)]);

        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].selector.faculty_id, "9");
        assert!(rows[0].outcome.is_none());
        assert_eq!(rows[1].outcome.as_ref().map(|o| o.rank), Some(3));
    }

    #[test]
    fn test_match_requires_same_year() {
        let selection: FacultySelection = vec![selector("0412", 2022)].into_iter().collect();
        let rows = match_enrollments(&selection, &[outcome(3, 10, 12)]);
        assert!(rows[0].outcome.is_none());
    }
}
