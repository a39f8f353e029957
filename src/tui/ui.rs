use ratatui::prelude::*;
use ratatui::widgets::{Block, Cell, Clear, Paragraph, Row, Table, Wrap};
use crate::catalog::threshold;
use crate::output::{scale_track, truncate, EXTRA_SEATS_NOTE};
use crate::scoring::{grant_scale, ScaleLayout};
use crate::submit::AnalysisReport;
use crate::tui::app::{App, InputMode, SearchField};
use crate::tui::theme;

pub fn draw(frame: &mut Frame, app: &mut App) {
    let area = frame.area();

    // Handle very small terminal sizes gracefully
    if area.height < 10 || area.width < 40 {
        let msg = Paragraph::new("Terminal too small")
            .alignment(Alignment::Center);
        frame.render_widget(msg, area);
        return;
    }

    // Layout: Title(1) + Body(fill) + Status(1)
    let chunks = Layout::vertical([
        Constraint::Length(1),  // Title bar
        Constraint::Fill(1),    // Form + selection
        Constraint::Length(1),  // Status bar
    ])
    .split(area);

    render_title(frame, chunks[0], app);

    let body = Layout::horizontal([Constraint::Length(42), Constraint::Fill(1)]).split(chunks[1]);
    render_form(frame, body[0], app);
    render_selection(frame, body[1], app);
    render_status_bar(frame, chunks[2], app);

    // Render overlays based on input mode
    match app.input_mode {
        InputMode::FacultySearch => render_search_popup(frame, app),
        InputMode::Results => render_results(frame, app),
        InputMode::Help => render_help_popup(frame),
        InputMode::Normal => {}
    }

    // Render loading overlay if loading (appears on top of everything)
    if app.is_loading {
        render_loading_overlay(frame, app);
    }
}

fn render_title(frame: &mut Frame, area: Rect, app: &App) {
    let left = "qbit-calc";
    let right = format!("[ {} ]  ]/[ change", app.combination.display_name());
    let padding_len = (area.width as usize)
        .saturating_sub(left.len() + right.chars().count());

    let title = Line::from(vec![
        Span::styled(left, Style::default().fg(theme::TITLE_COLOR).bold()),
        Span::raw(" ".repeat(padding_len)),
        Span::styled(right, Style::default().fg(theme::MUTED)),
    ]);
    frame.render_widget(Paragraph::new(title), area);
}

fn render_form(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::bordered().title(" Points ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rows: Vec<Row> = app
        .form_subjects()
        .into_iter()
        .enumerate()
        .map(|(idx, subject)| {
            let focused = idx == app.focus && app.input_mode == InputMode::Normal;
            let text = app.input_text(subject);
            let value = if focused {
                format!("{}_", text)
            } else if text.is_empty() {
                "-".to_string()
            } else {
                text.to_string()
            };

            let name_style = if focused {
                theme::FIELD_FOCUSED
            } else if text.is_empty() {
                Style::default().fg(theme::FIELD_INVALID)
            } else {
                Style::default()
            };

            Row::new(vec![
                Cell::from(subject.name()).style(name_style),
                Cell::from(value),
                Cell::from(format!("/ {}", subject.max_score()))
                    .style(Style::default().fg(theme::MUTED)),
            ])
        })
        .collect();

    let widths = [
        Constraint::Fill(1),
        Constraint::Length(5),
        Constraint::Length(5),
    ];
    frame.render_widget(Table::new(rows, widths), inner);
}

fn render_selection(frame: &mut Frame, area: Rect, app: &App) {
    let title = format!(" Faculties ({}) ", app.selection.len());
    let block = Block::bordered().title(title);

    if app.selection.is_empty() {
        let empty_msg = Paragraph::new("No faculties selected. Press f to search.")
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme::MUTED))
            .block(block);
        frame.render_widget(empty_msg, area);
        return;
    }

    let width = area.width.saturating_sub(16) as usize;
    let rows: Vec<Row> = app
        .selection
        .iter()
        .enumerate()
        .map(|(idx, s)| {
            let row_style = if idx % 2 == 1 {
                Style::default().bg(theme::ROW_ALT_BG)
            } else {
                Style::default()
            };
            Row::new(vec![
                Cell::from(format!("{} {}", s.faculty_id, s.year))
                    .style(Style::default().fg(theme::INDEX_COLOR)),
                Cell::from(truncate(
                    &format!("{} / {}", s.university_name, s.faculty_name),
                    width.max(10),
                )),
            ])
            .style(row_style)
        })
        .collect();

    let table = Table::new(rows, [Constraint::Length(12), Constraint::Fill(1)]).block(block);
    frame.render_widget(table, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &App) {
    let text = if let Some((ref msg, _)) = app.flash_message {
        // Show flash message with color based on message type
        let msg_color = if msg.starts_with("Failed") || msg.starts_with("Error") || msg.contains("timed out") {
            theme::FLASH_ERROR
        } else if msg.starts_with("Selected:") || msg.starts_with("Analysis") {
            theme::FLASH_SUCCESS
        } else {
            Color::White  // Default for unknown message types
        };
        Line::from(Span::styled(msg.clone(), Style::default().fg(msg_color)))
    } else {
        let hints: &[(&str, &str)] = match app.input_mode {
            InputMode::FacultySearch => &[
                ("Tab", ":field "),
                ("Space", ":select "),
                ("PgDn/PgUp", ":page "),
                ("Esc", ":close"),
            ],
            InputMode::Results => &[("j/k", ":scroll "), ("Esc", ":back")],
            _ => &[
                ("j/k", ":field "),
                ("0-9", ":points "),
                ("]/[", ":combination "),
                ("f", ":faculties "),
                ("x", ":clear "),
                ("Enter", ":analyze "),
                ("r", ":results "),
                ("?", ":help "),
                ("q", ":quit"),
            ],
        };

        let mut spans = Vec::new();
        for (i, (key, label)) in hints.iter().enumerate() {
            if i > 0 {
                spans.push(Span::raw(" "));
            }
            spans.push(Span::styled(*key, Style::default().fg(theme::STATUS_KEY_COLOR)));
            spans.push(Span::raw(*label));
        }
        Line::from(spans)
    };

    frame.render_widget(
        Paragraph::new(text).style(Style::default().bg(theme::STATUS_BAR_BG)),
        area
    );
}

/// Render the faculty search modal: filters, result table, pager
fn render_search_popup(frame: &mut Frame, app: &mut App) {
    let full = frame.area();
    let popup_area = centered_rect_fixed(full.width.saturating_sub(4), full.height.saturating_sub(2), full);

    frame.render_widget(Clear, popup_area);
    let block = Block::bordered()
        .title(" Faculty Search ")
        .border_style(Style::default().fg(theme::TITLE_COLOR));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let chunks = Layout::vertical([
        Constraint::Length(1),  // University filter
        Constraint::Length(1),  // Faculty filter
        Constraint::Length(1),  // Year filter
        Constraint::Length(1),  // Spacer
        Constraint::Fill(1),    // Results
        Constraint::Length(1),  // Pager
    ])
    .split(inner);

    let year_text = match app.search.filters().year {
        Some(year) => format!("< {} >", year),
        None => "< all >".to_string(),
    };
    let fields = [
        (SearchField::University, "University", app.university_input.clone()),
        (SearchField::Faculty, "Faculty   ", app.faculty_input.clone()),
        (SearchField::Year, "Year      ", year_text),
    ];
    for (i, (field, label, value)) in fields.into_iter().enumerate() {
        let focused = app.search_field == field;
        let cursor = if focused && field != SearchField::Year { "_" } else { "" };
        let label_style = if focused {
            theme::FIELD_FOCUSED
        } else {
            Style::default().fg(theme::MUTED)
        };
        let line = Line::from(vec![
            Span::styled(format!("{}: ", label), label_style),
            Span::raw(format!("{}{}", value, cursor)),
        ]);
        frame.render_widget(Paragraph::new(line), chunks[i]);
    }

    if let Some(err) = app.search.error() {
        let msg = Paragraph::new(format!("Error: {}", err))
            .style(Style::default().fg(theme::FLASH_ERROR))
            .wrap(Wrap { trim: true });
        frame.render_widget(msg, chunks[4]);
    } else if app.search.rows().is_empty() {
        let text = if app.search.is_loading() { "Searching..." } else { "No faculties found" };
        let msg = Paragraph::new(text)
            .alignment(Alignment::Center)
            .style(Style::default().fg(theme::MUTED));
        frame.render_widget(msg, chunks[4]);
    } else {
        let rows: Vec<Row> = app
            .search
            .rows()
            .iter()
            .map(|row| {
                let selected = app.selection.contains(&row.faculty_id, row.year);
                let mark = if selected { "[x]" } else { "[ ]" };
                Row::new(vec![
                    Cell::from(mark).style(Style::default().fg(theme::SELECTED_MARK)),
                    Cell::from(format!("{} {}", row.faculty_id, row.year))
                        .style(Style::default().fg(theme::INDEX_COLOR)),
                    Cell::from(row.university_name.clone()),
                    Cell::from(row.faculty_name.clone()),
                    Cell::from(row.subject_names()).style(Style::default().fg(theme::MUTED)),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(3),
            Constraint::Length(12),
            Constraint::Fill(2),
            Constraint::Fill(2),
            Constraint::Fill(1),
        ];
        let table = Table::new(rows, widths)
            .header(
                Row::new(vec!["", "ID", "University", "Faculty", "Subjects"])
                    .style(theme::HEADER_STYLE),
            )
            .row_highlight_style(theme::ROW_SELECTED);
        frame.render_stateful_widget(table, chunks[4], &mut app.search_table_state);
    }

    let pagination = app.search.pagination();
    let mut pager = vec![Span::styled(
        format!(
            "page {}/{}  {} total",
            pagination.page + 1,
            pagination.page_count().max(1),
            pagination.total
        ),
        Style::default().fg(theme::MUTED),
    )];
    if pagination.has_prev() {
        pager.push(Span::styled("  PgUp:prev", Style::default().fg(theme::STATUS_KEY_COLOR)));
    }
    if pagination.has_next() {
        pager.push(Span::styled("  PgDn:next", Style::default().fg(theme::STATUS_KEY_COLOR)));
    }
    if app.search.is_loading() {
        pager.push(Span::styled("  loading...", Style::default().fg(theme::MUTED)));
    }
    frame.render_widget(Paragraph::new(Line::from(pager)), chunks[5]);
}

/// Render the analysis results overlay (grants, then enrollments)
fn render_results(frame: &mut Frame, app: &App) {
    let full = frame.area();
    let popup_area = Rect {
        height: full.height.saturating_sub(1),
        ..full
    };
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered().title(" Results ");
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let lines = match &app.report {
        Some(report) => report_lines(
            report,
            inner.width as usize,
            app.config.scale.grant_pad,
            app.config.scale.enrollment_pad,
        ),
        None => vec![Line::from("No results")],
    };

    let paragraph = Paragraph::new(lines).scroll((app.results_scroll, 0));
    frame.render_widget(paragraph, inner);
}

fn report_lines(
    report: &AnalysisReport,
    width: usize,
    grant_pad: f64,
    enrollment_pad: f64,
) -> Vec<Line<'static>> {
    let mut lines = vec![Line::from(Span::styled("Grants", theme::HEADER_STYLE))];

    if report.grants.is_empty() {
        lines.push(Line::from(Span::styled("  no grant results", Style::default().fg(theme::MUTED))));
    }

    for year in &report.grants {
        lines.push(Line::from(Span::styled(
            year.year.to_string(),
            Style::default().fg(theme::TITLE_COLOR).bold(),
        )));
        for outcome in &year.outcomes {
            let best = year.is_best(outcome.subject);
            let style = if best {
                theme::BEST_GRANT
            } else {
                Style::default().fg(theme::grant_color(outcome.ranking_amount()))
            };
            lines.push(Line::from(vec![
                Span::raw(if best { "  * " } else { "    " }),
                Span::styled(format!("{:<12}", outcome.subject.name()), style),
                Span::styled(format!("{:>5}", outcome.amount_label()), style),
                Span::raw(format!("  {:.1}", outcome.grant_score)),
            ]));
            if let Some(t) = threshold(outcome.subject, outcome.year) {
                lines.extend(scale_lines(&grant_scale(t, outcome.grant_score, grant_pad), width));
            }
        }
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled("Faculties", theme::HEADER_STYLE)));
    if report.enrollments.is_empty() {
        lines.push(Line::from(Span::styled("  no faculties selected", Style::default().fg(theme::MUTED))));
    }

    let mut footnote = false;
    for row in &report.enrollments {
        let s = &row.selector;
        lines.push(Line::from(vec![
            Span::styled(format!("{} {}  ", s.faculty_id, s.year), Style::default().fg(theme::INDEX_COLOR)),
            Span::raw(truncate(
                &format!("{} / {}", s.university_name, s.faculty_name),
                width.saturating_sub(14).max(10),
            )),
        ]));
        match &row.outcome {
            Some(o) => {
                let note = if o.is_first_unseated_rank() {
                    footnote = true;
                    "*"
                } else {
                    ""
                };
                lines.push(Line::from(vec![
                    Span::raw(format!("    score {:.1}  rank ", o.contest_score)),
                    Span::styled(o.rank_label(), Style::default().bold()),
                    Span::styled(note, Style::default().fg(theme::FOOTNOTE)),
                    Span::raw(format!(
                        "  seats {}/{}  with subject {}",
                        o.total_enrolled, o.total_available, o.seats_with_subject
                    )),
                ]));
                if let Some(scale) = o.scale(enrollment_pad) {
                    lines.extend(scale_lines(&scale, width));
                }
            }
            None => lines.push(Line::from(Span::styled(
                "    score -  rank -  seats -",
                Style::default().fg(theme::MUTED),
            ))),
        }
    }

    if footnote {
        lines.push(Line::from(""));
        lines.push(Line::from(Span::styled(EXTRA_SEATS_NOTE, Style::default().fg(theme::FOOTNOTE))));
    }
    lines
}

/// Track line with colored markers, then the legend.
fn scale_lines(scale: &ScaleLayout, width: usize) -> Vec<Line<'static>> {
    let start = format!("{:.1}", scale.scale_start);
    let end = format!("{:.1}", scale.scale_end);
    let track_width = width.saturating_sub(start.len() + end.len() + 10).max(10);
    let track = scale_track(scale, track_width);

    let mut spans = vec![Span::styled(format!("    {} [", start), Style::default().fg(theme::MUTED))];
    for c in track.chars() {
        let color = match c {
            '@' => theme::SCALE_USER,
            '|' => theme::SCALE_MARKER,
            _ => theme::SCALE_TRACK,
        };
        spans.push(Span::styled(c.to_string(), Style::default().fg(color)));
    }
    spans.push(Span::styled(format!("] {}", end), Style::default().fg(theme::MUTED)));

    let legend = scale
        .all_positions()
        .map(|p| format!("{}: {:.1}", p.tag, p.value))
        .collect::<Vec<_>>()
        .join("  ");

    vec![
        Line::from(spans),
        Line::from(Span::styled(format!("    {}", legend), Style::default().fg(theme::MUTED))),
    ]
}

/// Create a centered rectangle with fixed width and height
fn centered_rect_fixed(width: u16, height: u16, area: Rect) -> Rect {
    // Clamp dimensions to area bounds
    let width = width.min(area.width);
    let height = height.min(area.height);

    // Calculate centered position
    let x = area.x + (area.width.saturating_sub(width)) / 2;
    let y = area.y + (area.height.saturating_sub(height)) / 2;

    Rect {
        x,
        y,
        width,
        height,
    }
}

/// Render the help overlay popup
fn render_help_popup(frame: &mut Frame) {
    let popup_area = centered_rect_fixed(56, 17, frame.area());

    // Clear the background
    frame.render_widget(Clear, popup_area);

    let block = Block::bordered().title(" Keyboard Shortcuts ");
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let entries = [
        ("j / k / Tab   ", "Move between point fields"),
        ("0-9 / Bksp    ", "Edit points (out-of-range edits ignored)"),
        ("] / [         ", "Next / previous combination"),
        ("f             ", "Search and select faculties"),
        ("x             ", "Clear faculty selection"),
        ("Enter         ", "Validate and analyze"),
        ("r             ", "Show last results"),
        ("In search:    ", ""),
        ("  Tab         ", "Next filter / result list"),
        ("  Left/Right  ", "Change year"),
        ("  Space/Enter ", "Select or unselect faculty"),
        ("  PgDn / PgUp ", "Next / previous page"),
        ("?             ", "Show/hide this help"),
        ("q / Ctrl-c    ", "Quit"),
    ];

    let mut help_lines: Vec<Line> = entries
        .iter()
        .map(|(key, desc)| {
            Line::from(vec![
                Span::styled(*key, Style::default().fg(Color::Cyan).bold()),
                Span::raw(*desc),
            ])
        })
        .collect();
    help_lines.push(Line::from(""));
    help_lines.push(Line::from(
        Span::styled("Press any key to close", Style::default().fg(theme::MUTED))
    ));

    frame.render_widget(Paragraph::new(help_lines), inner);
}

/// Render the loading spinner overlay
fn render_loading_overlay(frame: &mut Frame, app: &App) {
    let popup_area = centered_rect_fixed(30, 3, frame.area());

    frame.render_widget(Clear, popup_area);
    let block = Block::bordered();
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    // Braille spinner animation
    let spinner_chars = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];
    let spinner = spinner_chars[app.spinner_frame % 10];

    let loading_text = Paragraph::new(format!("{} Analyzing...", spinner))
        .alignment(Alignment::Center)
        .style(Style::default().fg(Color::Cyan));

    frame.render_widget(loading_text, inner);
}
