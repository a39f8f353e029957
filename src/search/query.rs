use crate::catalog::Subject;

/// Free-text and year filters typed into the faculty search.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacultyFilters {
    pub university: String,
    pub faculty: String,
    /// `None` means all years
    pub year: Option<u16>,
}

/// Query string for `GET /faculties`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QueryParams {
    /// 1-based
    pub page: usize,
    /// Comma-joined subject keys
    pub subjects: String,
    pub university: Option<String>,
    pub faculty: Option<String>,
    pub year: Option<u16>,
}

impl QueryParams {
    /// Key/value pairs in a stable order, absent filters omitted.
    pub fn to_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = vec![
            ("page", self.page.to_string()),
            ("subjects", self.subjects.clone()),
        ];
        if let Some(ref university) = self.university {
            pairs.push(("university", university.clone()));
        }
        if let Some(ref faculty) = self.faculty {
            pairs.push(("faculty", faculty.clone()));
        }
        if let Some(year) = self.year {
            pairs.push(("year", year.to_string()));
        }
        pairs
    }
}

fn non_empty(text: &str) -> Option<String> {
    if text.is_empty() {
        None
    } else {
        Some(text.to_string())
    }
}

/// Build the request for a 0-based `page`.
pub fn build_query(filters: &FacultyFilters, subjects: &[Subject], page: usize) -> QueryParams {
    QueryParams {
        page: page + 1,
        subjects: subjects
            .iter()
            .map(|s| s.key())
            .collect::<Vec<_>>()
            .join(","),
        university: non_empty(&filters.university),
        faculty: non_empty(&filters.faculty),
        year: filters.year,
    }
}

/// Page bounds as reported by the service.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Pagination {
    /// 0-based
    pub page: usize,
    pub limit: usize,
    pub total: usize,
}

impl Pagination {
    pub fn has_next(&self) -> bool {
        (self.page + 1) * self.limit < self.total
    }

    pub fn has_prev(&self) -> bool {
        self.page > 0
    }

    pub fn page_count(&self) -> usize {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(self.limit)
    }
}
