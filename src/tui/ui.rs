//! TUI event loop and rendering for ecoprompt.

use std::io::{self, Stdout};
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event as TermEvent, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
};
use unicode_width::UnicodeWidthStr;

use crate::client::AnalysisClient;
use crate::config::Config;
use crate::core::engine::{EngineHandle, spawn_engine};
use crate::core::events::Event as EngineEvent;
use crate::core::state::RequestState;
use crate::models::AnalysisResult;
use crate::palette;
use crate::presenter::{self, PresentationModel};

use super::app::App;

const POLL_INTERVAL_MS: u64 = 50;

/// Run the interactive TUI until the user quits.
pub async fn run_tui(config: &Config) -> Result<()> {
    let client = AnalysisClient::new(config)?;
    let (engine_handle, mut rx_event) = spawn_engine(client, config.retry_policy());

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(config.endpoint_url(), config.retry_policy().max_attempts);

    let result = run_event_loop(&mut terminal, &mut app, &engine_handle, &mut rx_event).await;

    let _ = engine_handle.shutdown().await;

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

async fn run_event_loop(
    terminal: &mut Terminal<CrosstermBackend<Stdout>>,
    app: &mut App,
    engine_handle: &EngineHandle,
    rx_event: &mut tokio::sync::mpsc::Receiver<EngineEvent>,
) -> Result<()> {
    loop {
        // Drain engine events first (non-blocking)
        while let Ok(event) = rx_event.try_recv() {
            app.apply_event(&event);
        }

        app.tick();
        terminal.draw(|frame| draw(frame, app))?;

        if event::poll(Duration::from_millis(POLL_INTERVAL_MS))? {
            let evt = event::read()?;
            if let TermEvent::Key(key) = evt {
                if key.kind != KeyEventKind::Press {
                    continue;
                }
                handle_key(app, engine_handle, key.code, key.modifiers).await?;
            }
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

async fn handle_key(
    app: &mut App,
    engine_handle: &EngineHandle,
    code: KeyCode,
    modifiers: KeyModifiers,
) -> Result<()> {
    match code {
        KeyCode::Esc => app.should_quit = true,
        KeyCode::Char('c') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::Char('u') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_input();
        }
        KeyCode::Enter => {
            // Submit is disabled while a request is in flight.
            if app.can_submit() {
                engine_handle.submit(app.input.clone()).await?;
            }
        }
        KeyCode::Backspace => app.backspace(),
        KeyCode::Left => app.move_left(),
        KeyCode::Right => app.move_right(),
        KeyCode::Home => app.move_home(),
        KeyCode::End => app.move_end(),
        KeyCode::Char(ch) => app.insert_char(ch),
        _ => {}
    }
    Ok(())
}

// === Rendering ===

fn draw(frame: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(1),
        ])
        .split(frame.area());

    draw_header(frame, app, chunks[0]);
    draw_composer(frame, app, chunks[1]);
    draw_result(frame, app, chunks[2]);
    draw_footer(frame, app, chunks[3]);
}

fn draw_header(frame: &mut Frame, app: &App, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            " ecoprompt ",
            Style::default()
                .fg(palette::ECO_GREEN)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!("→ {}", app.endpoint_url),
            Style::default().fg(palette::TEXT_MUTED),
        ),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn draw_composer(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(" prompt ")
        .border_style(Style::default().fg(palette::ECO_GREEN));
    let inner = block.inner(area);

    let paragraph = Paragraph::new(app.input.as_str())
        .style(Style::default().fg(palette::TEXT_PRIMARY).bg(palette::COMPOSER_BG));
    frame.render_widget(block, area);
    frame.render_widget(paragraph, inner);

    let prefix: String = app.input.chars().take(app.cursor).collect();
    let cursor_x = inner.x + prefix.width() as u16;
    frame.set_cursor_position((cursor_x.min(inner.right().saturating_sub(1)), inner.y));
}

fn draw_result(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default().borders(Borders::ALL).title(" analysis ");
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let lines = match &app.request {
        RequestState::Idle => vec![Line::from(Span::styled(
            "Type a prompt and press Enter to analyze its footprint.",
            Style::default().fg(palette::TEXT_MUTED),
        ))],
        RequestState::Loading { attempt } => vec![Line::from(vec![
            Span::styled(app.spinner(), Style::default().fg(palette::STATUS_LOADING)),
            Span::raw(" Analyzing prompt"),
            Span::styled(
                if *attempt > 0 {
                    format!("  (attempt {} of {})", attempt + 1, app.max_attempts)
                } else {
                    String::new()
                },
                Style::default().fg(palette::TEXT_MUTED),
            ),
        ])],
        RequestState::Success { result, view } => success_lines(result, view),
        RequestState::Error { message } => vec![Line::from(Span::styled(
            message.clone(),
            Style::default()
                .fg(palette::STATUS_ERROR)
                .add_modifier(Modifier::BOLD),
        ))],
    };

    frame.render_widget(Paragraph::new(lines).wrap(Wrap { trim: false }), inner);
}

/// Render the success view: removed text struck through ahead of the
/// optimized prompt, then the consumption figures.
fn success_lines(result: &AnalysisResult, view: &PresentationModel) -> Vec<Line<'static>> {
    let mut lines = Vec::new();

    if view.has_redundant_parts {
        let removed = view.removed_segments.join(" ");
        lines.push(Line::from(Span::styled(
            removed,
            Style::default()
                .fg(palette::REMOVED_TEXT)
                .add_modifier(Modifier::CROSSED_OUT),
        )));
    }

    lines.push(Line::from(Span::styled(
        result.optimized_prompt.clone(),
        Style::default()
            .fg(palette::KEPT_TEXT)
            .add_modifier(Modifier::BOLD),
    )));
    lines.push(Line::default());

    let consumption = &result.consumption;
    lines.push(consumption_line("before ", &presenter::format_consumption(&consumption.before)));
    lines.push(consumption_line("after  ", &presenter::format_consumption(&consumption.after)));
    lines.push(consumption_line("saved  ", &presenter::format_consumption(&consumption.saved)));

    if let Some(percent) = presenter::savings_percent(consumption) {
        lines.push(Line::from(vec![
            Span::styled("total  ", Style::default().fg(palette::TEXT_MUTED)),
            Span::styled(
                format!("{percent}% saved"),
                Style::default()
                    .fg(palette::STATUS_SUCCESS)
                    .add_modifier(Modifier::BOLD),
            ),
        ]));
    }

    lines
}

fn consumption_line(label: &str, value: &str) -> Line<'static> {
    Line::from(vec![
        Span::styled(label.to_string(), Style::default().fg(palette::TEXT_MUTED)),
        Span::styled(value.to_string(), Style::default().fg(palette::ECO_WATER)),
    ])
}

fn draw_footer(frame: &mut Frame, app: &App, area: Rect) {
    let hint = if app.request.is_loading() {
        "analyzing…  Esc to quit"
    } else {
        "Enter to analyze  Ctrl+U to clear  Esc to quit"
    };
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", app.request.label()),
            Style::default().fg(status_color(&app.request)),
        ),
        Span::styled(hint, Style::default().fg(palette::TEXT_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn status_color(state: &RequestState) -> ratatui::style::Color {
    match state {
        RequestState::Idle => palette::TEXT_MUTED,
        RequestState::Loading { .. } => palette::STATUS_LOADING,
        RequestState::Success { .. } => palette::STATUS_SUCCESS,
        RequestState::Error { .. } => palette::STATUS_ERROR,
    }
}
