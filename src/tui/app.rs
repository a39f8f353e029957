use crate::catalog::{Combination, Subject, EXAM_YEARS};
use crate::config::Config;
use crate::scoring::{validate_points, RawScorePoints};
use crate::search::{FacultySearch, FacultySource};
use crate::selection::{FacultySelection, FacultySelector};
use crate::submit::AnalysisReport;
use std::collections::BTreeMap;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputMode {
    /// Point entry form
    Normal,
    FacultySearch,
    Results,
    Help,
}

/// Focused control inside the faculty search modal.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum SearchField {
    University,
    Faculty,
    Year,
    Results,
}

impl SearchField {
    pub fn next(self) -> Self {
        match self {
            SearchField::University => SearchField::Faculty,
            SearchField::Faculty => SearchField::Year,
            SearchField::Year => SearchField::Results,
            SearchField::Results => SearchField::University,
        }
    }

    pub fn previous(self) -> Self {
        match self {
            SearchField::University => SearchField::Results,
            SearchField::Faculty => SearchField::University,
            SearchField::Year => SearchField::Faculty,
            SearchField::Results => SearchField::Year,
        }
    }
}

pub struct App {
    pub config: Config,
    pub combination: Combination,
    /// Field text per subject, kept in sync with `points`
    pub inputs: BTreeMap<Subject, String>,
    pub points: RawScorePoints,
    pub focus: usize,
    pub selection: FacultySelection,
    pub search: FacultySearch,
    pub search_field: SearchField,
    pub university_input: String,
    pub faculty_input: String,
    pub search_table_state: ratatui::widgets::TableState,
    pub report: Option<AnalysisReport>,
    pub results_scroll: u16,
    pub input_mode: InputMode,
    pub flash_message: Option<(String, Instant)>,
    pub needs_submit: bool,
    pub is_loading: bool,
    pub spinner_frame: usize,
    pub should_quit: bool,
}

impl App {
    /// Requires a running tokio runtime: the faculty search worker is
    /// spawned here.
    pub fn new<S: FacultySource>(config: Config, source: S, debounce: Duration) -> Self {
        let combination = Combination::default();
        let search = FacultySearch::new(source, combination.subjects(), debounce);

        Self {
            config,
            combination,
            inputs: BTreeMap::new(),
            points: RawScorePoints::new(),
            focus: 0,
            selection: FacultySelection::new(),
            search,
            search_field: SearchField::University,
            university_input: String::new(),
            faculty_input: String::new(),
            search_table_state: ratatui::widgets::TableState::default(),
            report: None,
            results_scroll: 0,
            input_mode: InputMode::Normal,
            flash_message: None,
            needs_submit: false,
            is_loading: false,
            spinner_frame: 0,
            should_quit: false,
        }
    }

    /// Subjects shown in the form, mandatory first.
    pub fn form_subjects(&self) -> Vec<Subject> {
        self.combination.subjects()
    }

    pub fn focused_subject(&self) -> Option<Subject> {
        self.form_subjects().get(self.focus).copied()
    }

    pub fn input_text(&self, subject: Subject) -> &str {
        self.inputs.get(&subject).map(String::as_str).unwrap_or("")
    }

    pub fn next_field(&mut self) {
        let count = self.form_subjects().len();
        self.focus = (self.focus + 1) % count;
    }

    pub fn previous_field(&mut self) {
        let count = self.form_subjects().len();
        self.focus = (self.focus + count - 1) % count;
    }

    /// Append a digit to the focused field; edits that leave the subject's
    /// range are dropped.
    pub fn type_digit(&mut self, digit: char) {
        let Some(subject) = self.focused_subject() else {
            return;
        };
        let mut candidate = self.input_text(subject).to_string();
        if candidate == "0" {
            candidate.clear();
        }
        candidate.push(digit);
        self.apply_input(subject, candidate);
    }

    pub fn erase_digit(&mut self) {
        let Some(subject) = self.focused_subject() else {
            return;
        };
        let mut candidate = self.input_text(subject).to_string();
        candidate.pop();
        self.apply_input(subject, candidate);
    }

    fn apply_input(&mut self, subject: Subject, text: String) {
        if self.points.enter(subject, &text) {
            if text.is_empty() {
                self.inputs.remove(&subject);
            } else {
                self.inputs.insert(subject, text);
            }
        }
    }

    /// Switch combination: electives and the faculty selection are dropped
    /// and the search restarts for the new subject set.
    pub fn set_combination(&mut self, combination: Combination) {
        if combination == self.combination {
            return;
        }
        self.combination = combination;
        self.points.reset_keeping_mandatory();
        self.inputs.retain(|s, _| s.is_mandatory());
        self.selection.clear();
        self.focus = self.focus.min(self.form_subjects().len() - 1);
        self.search.set_subjects(combination.subjects());
        if self.input_mode != InputMode::FacultySearch {
            // nothing to show it in; the next open queries the new subjects
            self.search.cancel();
        }
        self.search_table_state.select(None);
        self.show_flash(format!("Combination: {}", combination.display_name()));
    }

    pub fn next_combination(&mut self) {
        self.set_combination(self.combination.next());
    }

    pub fn previous_combination(&mut self) {
        self.set_combination(self.combination.previous());
    }

    /// Validate and, if clean, ask the event loop to submit.
    pub fn request_submit(&mut self) {
        if self.is_loading {
            return;
        }
        match validate_points(&self.points, self.combination) {
            Ok(()) => self.needs_submit = true,
            Err(errors) => {
                let first = errors
                    .first()
                    .map(|e| e.to_string())
                    .unwrap_or_default();
                let more = if errors.len() > 1 {
                    format!(" (+{} more)", errors.len() - 1)
                } else {
                    String::new()
                };
                self.show_flash(format!("Error: {}{}", first, more));
            }
        }
    }

    /// Replace the previous results with a fresh report.
    pub fn set_report(&mut self, report: AnalysisReport) {
        self.report = Some(report);
        self.results_scroll = 0;
        self.input_mode = InputMode::Results;
        self.show_flash("Analysis updated".to_string());
    }

    pub fn clear_selection(&mut self) {
        if !self.selection.is_empty() {
            self.selection.clear();
            self.show_flash("Cleared faculty selection".to_string());
        }
    }

    // Faculty search modal

    /// Show the modal and query the current filters right away.
    pub fn open_search(&mut self) {
        self.input_mode = InputMode::FacultySearch;
        self.search_field = SearchField::University;
        self.search.start();
    }

    /// Hide the modal; a debounced query still pending is dropped.
    pub fn close_search(&mut self) {
        self.input_mode = InputMode::Normal;
        self.search.cancel();
    }

    pub fn search_type(&mut self, c: char) {
        match self.search_field {
            SearchField::University => {
                self.university_input.push(c);
                self.search.set_university(self.university_input.clone());
            }
            SearchField::Faculty => {
                self.faculty_input.push(c);
                self.search.set_faculty(self.faculty_input.clone());
            }
            SearchField::Year | SearchField::Results => {}
        }
    }

    pub fn search_erase(&mut self) {
        match self.search_field {
            SearchField::University => {
                if self.university_input.pop().is_some() {
                    self.search.set_university(self.university_input.clone());
                }
            }
            SearchField::Faculty => {
                if self.faculty_input.pop().is_some() {
                    self.search.set_faculty(self.faculty_input.clone());
                }
            }
            SearchField::Year | SearchField::Results => {}
        }
    }

    /// Step through "all years" and each exam year.
    pub fn cycle_year(&mut self, forward: bool) {
        let options: Vec<Option<u16>> = std::iter::once(None)
            .chain(EXAM_YEARS.iter().copied().map(Some))
            .collect();
        let current = options
            .iter()
            .position(|y| *y == self.search.filters().year)
            .unwrap_or(0);
        let next = if forward {
            (current + 1) % options.len()
        } else {
            (current + options.len() - 1) % options.len()
        };
        self.search.set_year(options[next]);
    }

    pub fn next_search_row(&mut self) {
        let len = self.search.rows().len();
        if len == 0 {
            return;
        }
        let i = match self.search_table_state.selected() {
            Some(i) if i + 1 < len => i + 1,
            _ => 0,
        };
        self.search_table_state.select(Some(i));
    }

    pub fn previous_search_row(&mut self) {
        let len = self.search.rows().len();
        if len == 0 {
            return;
        }
        let i = match self.search_table_state.selected() {
            Some(0) | None => len - 1,
            Some(i) => i - 1,
        };
        self.search_table_state.select(Some(i));
    }

    pub fn toggle_selected_faculty(&mut self) {
        let Some(row) = self
            .search_table_state
            .selected()
            .and_then(|i| self.search.rows().get(i))
        else {
            return;
        };
        let selector = FacultySelector::from(row);
        let label = format!("{} {}", selector.faculty_name, selector.year);
        if self.selection.toggle(selector) {
            self.show_flash(format!("Selected: {}", label));
        } else {
            self.show_flash(format!("Removed: {}", label));
        }
    }

    pub fn next_page(&mut self) {
        if self.search.next_page() {
            self.search_table_state.select(None);
        }
    }

    pub fn previous_page(&mut self) {
        if self.search.previous_page() {
            self.search_table_state.select(None);
        }
    }

    /// Apply arrived search responses; keeps the row cursor in range.
    pub fn poll_search(&mut self) {
        if self.search.poll() {
            let len = self.search.rows().len();
            match self.search_table_state.selected() {
                Some(i) if i >= len => self
                    .search_table_state
                    .select(if len == 0 { None } else { Some(len - 1) }),
                None if len > 0 && self.search_field == SearchField::Results => {
                    self.search_table_state.select(Some(0))
                }
                _ => {}
            }
        }
    }

    // Results view

    pub fn show_results(&mut self) {
        if self.report.is_some() {
            self.input_mode = InputMode::Results;
        } else {
            self.show_flash("No results yet. Press Enter to submit.".to_string());
        }
    }

    pub fn scroll_results(&mut self, down: bool) {
        self.results_scroll = if down {
            self.results_scroll.saturating_add(1)
        } else {
            self.results_scroll.saturating_sub(1)
        };
    }

    pub fn show_help(&mut self) {
        self.input_mode = InputMode::Help;
    }

    pub fn dismiss_help(&mut self) {
        self.input_mode = InputMode::Normal;
    }

    pub fn update_flash(&mut self) {
        if let Some((_, timestamp)) = self.flash_message {
            if timestamp.elapsed().as_secs() >= 3 {
                self.flash_message = None;
            }
        }
    }

    pub fn show_flash(&mut self, msg: String) {
        self.flash_message = Some((msg, Instant::now()));
    }

    pub fn advance_spinner(&mut self) {
        self.spinner_frame = self.spinner_frame.wrapping_add(1);
    }
}
