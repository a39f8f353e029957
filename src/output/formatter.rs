use std::io::IsTerminal;
use owo_colors::OwoColorize;
use terminal_size::{Width, terminal_size};

use crate::api::FacultyRow;
use crate::catalog::{threshold, COMBINATIONS};
use crate::scoring::{column, grant_scale, EnrollmentRow, GrantYear, ScaleLayout};
use crate::search::Pagination;
use crate::submit::AnalysisReport;

const DEFAULT_WIDTH: usize = 80;
const MIN_TRACK: usize = 20;

pub const EXTRA_SEATS_NOTE: &str =
    "* first rank past the last enrolled applicant; the faculty did not fill every seat";

/// Rendering knobs shared by the report printers.
#[derive(Debug, Clone, Copy)]
pub struct RenderOptions {
    pub use_colors: bool,
    /// Total line width available for scales
    pub width: usize,
    pub grant_pad: f64,
    pub enrollment_pad: f64,
}

impl RenderOptions {
    pub fn detect(grant_pad: f64, enrollment_pad: f64) -> Self {
        Self {
            use_colors: should_use_colors(),
            width: get_terminal_width().unwrap_or(DEFAULT_WIDTH),
            grant_pad,
            enrollment_pad,
        }
    }
}

/// Check if stdout is a TTY (for auto-detecting color support)
pub fn should_use_colors() -> bool {
    std::io::stdout().is_terminal()
}

/// Get terminal width, defaulting to None for pipes
fn get_terminal_width() -> Option<usize> {
    terminal_size().map(|(Width(w), _)| w as usize)
}

/// Truncate text to fit available width, accounting for Unicode
pub fn truncate(text: &str, max_width: usize) -> String {
    let chars: Vec<char> = text.chars().collect();
    if chars.len() <= max_width {
        text.to_string()
    } else if max_width > 3 {
        format!("{}...", chars[..max_width - 3].iter().collect::<String>())
    } else {
        chars[..max_width].iter().collect()
    }
}

/// Pad to `width` characters (not bytes; names are Georgian).
fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    if len >= width {
        text.to_string()
    } else {
        format!("{}{}", text, " ".repeat(width - len))
    }
}

/// Marker cells of a scale track: `|` for thresholds, `@` for the user.
pub fn scale_track(scale: &ScaleLayout, width: usize) -> String {
    let mut cells = vec!['-'; width];
    for p in &scale.positions {
        if let Some(cell) = cells.get_mut(column(p.percent, width)) {
            *cell = '|';
        }
    }
    if let Some(cell) = cells.get_mut(column(scale.user.percent, width)) {
        *cell = '@';
    }
    cells.into_iter().collect()
}

/// Two-line ASCII scale: the track between its edge values, then a legend.
pub fn format_scale(scale: &ScaleLayout, width: usize, use_colors: bool) -> String {
    let start = format!("{:.1}", scale.scale_start);
    let end = format!("{:.1}", scale.scale_end);
    let fixed = start.len() + end.len() + 4;
    let track_width = width.saturating_sub(fixed + 4).max(MIN_TRACK);
    let track = scale_track(scale, track_width);

    let legend = scale
        .all_positions()
        .map(|p| format!("{}: {:.1}", p.tag, p.value))
        .collect::<Vec<_>>()
        .join("  ");

    if use_colors {
        format!(
            "    {} [{}] {}\n    {}",
            start.dimmed(),
            track,
            end.dimmed(),
            legend.dimmed()
        )
    } else {
        format!("    {} [{}] {}\n    {}", start, track, end, legend)
    }
}

/// Grant outcomes per year; the best of two electives is starred.
pub fn format_grant_table(years: &[GrantYear], opts: &RenderOptions) -> String {
    if years.is_empty() {
        return "No grant results.".to_string();
    }

    let mut lines = Vec::new();
    for year in years {
        if opts.use_colors {
            lines.push(year.year.to_string().bold().to_string());
        } else {
            lines.push(year.year.to_string());
        }

        if year.outcomes.is_empty() {
            lines.push("  -".to_string());
        }

        for outcome in &year.outcomes {
            let best = year.is_best(outcome.subject);
            let marker = if best { "*" } else { " " };
            let row = format!(
                "  {} {} {:>4}  {:>8.1}",
                marker,
                pad(outcome.subject.name(), 12),
                outcome.amount_label(),
                outcome.grant_score
            );
            if opts.use_colors && best {
                lines.push(row.green().bold().to_string());
            } else if opts.use_colors && outcome.ranking_amount() == 0 {
                lines.push(row.dimmed().to_string());
            } else {
                lines.push(row);
            }

            if let Some(t) = threshold(outcome.subject, outcome.year) {
                let scale = grant_scale(t, outcome.grant_score, opts.grant_pad);
                lines.push(format_scale(&scale, opts.width, opts.use_colors));
            }
        }
    }
    lines.join("\n")
}

/// One row per selected faculty, with `-` placeholders when unmatched.
pub fn format_enrollment_table(rows: &[EnrollmentRow], opts: &RenderOptions) -> String {
    if rows.is_empty() {
        return "No faculties selected.".to_string();
    }

    let mut lines = Vec::new();
    let mut footnote = false;

    for row in rows {
        let selector = &row.selector;
        let names = [selector.university_name.as_str(), selector.faculty_name.as_str()]
            .into_iter()
            .filter(|s| !s.is_empty())
            .collect::<Vec<_>>()
            .join(" / ");
        let heading = format!(
            "{} {}  {}",
            selector.faculty_id,
            selector.year,
            truncate(&names, opts.width.saturating_sub(12).max(20))
        );
        if opts.use_colors {
            lines.push(heading.bold().to_string());
        } else {
            lines.push(heading);
        }

        match &row.outcome {
            Some(outcome) => {
                let note = if outcome.is_first_unseated_rank() {
                    footnote = true;
                    "*"
                } else {
                    ""
                };
                lines.push(format!(
                    "  score {:.1}  rank {}{}  seats {}/{}  with subject {}",
                    outcome.contest_score,
                    outcome.rank_label(),
                    note,
                    outcome.total_enrolled,
                    outcome.total_available,
                    outcome.seats_with_subject
                ));
                if let Some(scale) = outcome.scale(opts.enrollment_pad) {
                    lines.push(format_scale(&scale, opts.width, opts.use_colors));
                }
            }
            None => lines.push("  score -  rank -  seats -  with subject -".to_string()),
        }
    }

    if footnote {
        lines.push(String::new());
        if opts.use_colors {
            lines.push(EXTRA_SEATS_NOTE.yellow().to_string());
        } else {
            lines.push(EXTRA_SEATS_NOTE.to_string());
        }
    }
    lines.join("\n")
}

pub fn format_report(report: &AnalysisReport, opts: &RenderOptions) -> String {
    let mut out = format_grant_table(&report.grants, opts);
    if !report.enrollments.is_empty() {
        out.push_str("\n\n");
        out.push_str(&format_enrollment_table(&report.enrollments, opts));
    }
    out
}

/// Tab-separated report for scripting (no headers, no colors).
/// `grant  year  subject  amount  score  best`
/// `enrollment  faculty_id  year  score  rank  enrolled  available  with_subject  extra_seats`
pub fn format_report_tsv(report: &AnalysisReport) -> String {
    let mut lines = Vec::new();

    for year in &report.grants {
        for outcome in &year.outcomes {
            lines.push(format!(
                "grant\t{}\t{}\t{}\t{}\t{}",
                year.year,
                outcome.subject.key(),
                outcome.ranking_amount(),
                outcome.grant_score,
                year.is_best(outcome.subject)
            ));
        }
    }

    for row in &report.enrollments {
        let s = &row.selector;
        match &row.outcome {
            Some(o) => lines.push(format!(
                "enrollment\t{}\t{}\t{}\t{}\t{}\t{}\t{}\t{}",
                s.faculty_id,
                s.year,
                o.contest_score,
                o.rank,
                o.total_enrolled,
                o.total_available,
                o.seats_with_subject,
                o.is_first_unseated_rank()
            )),
            None => lines.push(format!(
                "enrollment\t{}\t{}\t-\t-\t-\t-\t-\t-",
                s.faculty_id, s.year
            )),
        }
    }

    lines.join("\n")
}

/// One page of faculty search results with its pagination footer.
pub fn format_faculty_page(rows: &[FacultyRow], pagination: &Pagination, use_colors: bool) -> String {
    let mut lines: Vec<String> = rows
        .iter()
        .map(|row| {
            let id = format!("{:>6} {}", row.faculty_id, row.year);
            let text = format!(
                "{}  {}  [{}]",
                row.university_name,
                row.faculty_name,
                row.subject_names()
            );
            if use_colors {
                format!("{}  {}", id.dimmed(), text)
            } else {
                format!("{}  {}", id, text)
            }
        })
        .collect();

    if lines.is_empty() {
        lines.push("No faculties found.".to_string());
    }

    let mut footer = format!(
        "page {}/{} ({} total)",
        pagination.page + 1,
        pagination.page_count().max(1),
        pagination.total
    );
    if pagination.has_prev() {
        footer.push_str("  prev: --page ");
        footer.push_str(&pagination.page.to_string());
    }
    if pagination.has_next() {
        footer.push_str("  next: --page ");
        footer.push_str(&(pagination.page + 2).to_string());
    }
    lines.push(String::new());
    lines.push(footer);
    lines.join("\n")
}

/// The combination catalog: key, Georgian name, subjects sent to the search.
pub fn format_combinations(use_colors: bool) -> String {
    COMBINATIONS
        .iter()
        .map(|c| {
            let key = format!("{:<20}", c.key());
            let subjects = c
                .subjects()
                .iter()
                .map(|s| s.key())
                .collect::<Vec<_>>()
                .join(",");
            if use_colors {
                format!("{} {}  {}", key.bold(), c.display_name(), subjects.dimmed())
            } else {
                format!("{} {}  {}", key, c.display_name(), subjects)
            }
        })
        .collect::<Vec<_>>()
        .join("\n")
}
