pub mod app;
pub mod event;
pub mod theme;
pub mod ui;

pub use app::App;

use std::time::Duration;

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use event::{Event, EventHandler};

use crate::api::ApiClient;
use crate::submit::{submit_analysis, AnalysisReport, SubmitError};

type SubmitHandle =
    tokio::task::JoinHandle<Result<Result<AnalysisReport, SubmitError>, tokio::time::error::Elapsed>>;

pub async fn run_tui(mut app: App, client: ApiClient, request_timeout: Duration) -> anyhow::Result<()> {
    // Buffer stderr while TUI is active to prevent output corrupting the display
    crate::stderr_buffer::activate();

    // Init terminal (sets up panic hooks automatically)
    let mut terminal = ratatui::init();

    let mut events = EventHandler::new(100);

    let mut pending_submit: Option<SubmitHandle> = None;

    // Main loop
    loop {
        // Draw UI
        if let Err(e) = terminal.draw(|frame| ui::draw(frame, &mut app)) {
            ratatui::restore();
            crate::stderr_buffer::drain();
            return Err(e.into());
        }

        // Handle events
        match events.next().await {
            Event::Key(key) => handle_key_event(&mut app, key),
            Event::Tick => {
                app.update_flash();
                app.advance_spinner();
            }
        }

        app.poll_search();

        // Check if background submission has completed
        if let Some(handle) = pending_submit.take_if(|h| h.is_finished()) {
            match handle.await {
                Ok(Ok(Ok(report))) => app.set_report(report),
                Ok(Ok(Err(e))) => {
                    // previous results stay as they were
                    tracing::warn!("analysis failed: {}", e);
                    app.show_flash(format!("Failed: {}", e));
                }
                Ok(Err(_elapsed)) => {
                    app.show_flash(format!(
                        "Analysis timed out ({}).",
                        humantime::format_duration(request_timeout)
                    ));
                }
                Err(e) => {
                    crate::buffered_eprintln!("analysis task panicked: {}", e);
                    app.show_flash(format!("Analysis task panicked: {}", e));
                }
            }
            app.is_loading = false;
        }

        // Spawn a submission if requested and none is running
        if app.needs_submit && pending_submit.is_none() {
            app.needs_submit = false;

            let client = client.clone();
            let combination = app.combination;
            let points = app.points.clone();
            let selection = app.selection.clone();

            pending_submit = Some(tokio::spawn(async move {
                tokio::time::timeout(
                    request_timeout,
                    submit_analysis(&client, combination, &points, &selection),
                )
                .await
            }));
            app.is_loading = true;
        }

        if app.should_quit {
            break;
        }
    }

    // Retire the debounce timer before leaving
    app.search.cancel();

    // Restore terminal
    ratatui::restore();

    // Flush buffered stderr messages now that the terminal is restored
    for msg in crate::stderr_buffer::drain() {
        eprintln!("{}", msg);
    }

    Ok(())
}

fn handle_key_event(app: &mut App, key: KeyEvent) {
    if key.code == KeyCode::Char('c') && key.modifiers.contains(KeyModifiers::CONTROL) {
        app.should_quit = true;
        return;
    }

    match app.input_mode {
        app::InputMode::Normal => {
            match key.code {
                KeyCode::Char('q') => app.should_quit = true,

                // Field navigation
                KeyCode::Char('j') | KeyCode::Down | KeyCode::Tab => app.next_field(),
                KeyCode::Char('k') | KeyCode::Up | KeyCode::BackTab => app.previous_field(),

                // Point entry
                KeyCode::Char(c) if c.is_ascii_digit() => app.type_digit(c),
                KeyCode::Backspace => app.erase_digit(),

                // Combination
                KeyCode::Char(']') | KeyCode::Right => app.next_combination(),
                KeyCode::Char('[') | KeyCode::Left => app.previous_combination(),

                KeyCode::Char('f') => app.open_search(),
                KeyCode::Char('x') => app.clear_selection(),
                KeyCode::Enter => app.request_submit(),
                KeyCode::Char('r') => app.show_results(),
                KeyCode::Char('?') => app.show_help(),

                _ => {}
            }
        }
        app::InputMode::FacultySearch => {
            use app::SearchField;

            match key.code {
                KeyCode::Esc => app.close_search(),
                KeyCode::Tab => app.search_field = app.search_field.next(),
                KeyCode::BackTab => app.search_field = app.search_field.previous(),
                KeyCode::PageDown => app.next_page(),
                KeyCode::PageUp => app.previous_page(),

                _ => match app.search_field {
                    SearchField::University | SearchField::Faculty => match key.code {
                        KeyCode::Backspace => app.search_erase(),
                        KeyCode::Down | KeyCode::Enter => {
                            app.search_field = SearchField::Results;
                            app.next_search_row();
                        }
                        // Character input (letters in any script, digits, spaces)
                        KeyCode::Char(c) if !c.is_control() => app.search_type(c),
                        _ => {}
                    },
                    SearchField::Year => match key.code {
                        KeyCode::Right | KeyCode::Char('l') => app.cycle_year(true),
                        KeyCode::Left | KeyCode::Char('h') => app.cycle_year(false),
                        _ => {}
                    },
                    SearchField::Results => match key.code {
                        KeyCode::Char('j') | KeyCode::Down => app.next_search_row(),
                        KeyCode::Char('k') | KeyCode::Up => app.previous_search_row(),
                        KeyCode::Char(' ') | KeyCode::Enter => app.toggle_selected_faculty(),
                        KeyCode::Char('n') => app.next_page(),
                        KeyCode::Char('p') => app.previous_page(),
                        _ => {}
                    },
                },
            }
        }
        app::InputMode::Results => match key.code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('r') => {
                app.input_mode = app::InputMode::Normal
            }
            KeyCode::Char('j') | KeyCode::Down => app.scroll_results(true),
            KeyCode::Char('k') | KeyCode::Up => app.scroll_results(false),
            _ => {}
        },
        app::InputMode::Help => {
            // Any key exits help
            app.dismiss_help();
        }
    }
}
