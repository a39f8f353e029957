use crate::api::types::FacultyRow;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// Identity of a faculty offering: the only part sent to the analysis service.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct FacultyRef {
    pub faculty_id: String,
    pub year: u16,
}

impl FacultyRef {
    pub fn new(faculty_id: impl Into<String>, year: u16) -> Self {
        Self {
            faculty_id: faculty_id.into(),
            year,
        }
    }
}

/// A faculty the user picked from the search results.
#[derive(Debug, Clone, PartialEq)]
pub struct FacultySelector {
    pub faculty_id: String,
    pub year: u16,
    pub university_name: String,
    pub faculty_name: String,
    pub subjects: Vec<String>,
}

impl FacultySelector {
    pub fn identity(&self) -> FacultyRef {
        FacultyRef::new(self.faculty_id.clone(), self.year)
    }

    pub fn matches(&self, faculty_id: &str, year: u16) -> bool {
        self.faculty_id == faculty_id && self.year == year
    }

    pub fn from_ref(r: &FacultyRef) -> Self {
        Self {
            faculty_id: r.faculty_id.clone(),
            year: r.year,
            university_name: String::new(),
            faculty_name: String::new(),
            subjects: Vec::new(),
        }
    }
}

impl From<&FacultyRow> for FacultySelector {
    fn from(row: &FacultyRow) -> Self {
        Self {
            faculty_id: row.faculty_id.clone(),
            year: row.year,
            university_name: row.university_name.clone(),
            faculty_name: row.faculty_name.clone(),
            subjects: row.subjects.clone(),
        }
    }
}

/// Ordered set of selected faculties, unique by `(faculty_id, year)`.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct FacultySelection {
    entries: Vec<FacultySelector>,
}

impl FacultySelection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contains(&self, faculty_id: &str, year: u16) -> bool {
        self.entries.iter().any(|f| f.matches(faculty_id, year))
    }

    /// Add the selector, or remove it if one with the same identity exists.
    /// Returns true when the selector ended up selected.
    pub fn toggle(&mut self, selector: FacultySelector) -> bool {
        if let Some(pos) = self
            .entries
            .iter()
            .position(|f| f.matches(&selector.faculty_id, selector.year))
        {
            self.entries.remove(pos);
            false
        } else {
            self.entries.push(selector);
            true
        }
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &FacultySelector> {
        self.entries.iter()
    }

    pub fn as_slice(&self) -> &[FacultySelector] {
        &self.entries
    }

    /// Wire projection: display fields dropped.
    pub fn refs(&self) -> Vec<FacultyRef> {
        self.entries.iter().map(FacultySelector::identity).collect()
    }

    pub fn identities(&self) -> HashSet<FacultyRef> {
        self.entries.iter().map(FacultySelector::identity).collect()
    }
}

impl FromIterator<FacultySelector> for FacultySelection {
    /// Collects through [`FacultySelection::toggle`]'s uniqueness rule: later
    /// duplicates are skipped.
    fn from_iter<I: IntoIterator<Item = FacultySelector>>(iter: I) -> Self {
        let mut selection = FacultySelection::new();
        for selector in iter {
            if !selection.contains(&selector.faculty_id, selector.year) {
                selection.entries.push(selector);
            }
        }
        selection
    }
}
