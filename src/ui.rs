//! Terminal UI rendering for clone-org.
//!
//! Renders from RenderState (immutable snapshot) - it never mutates
//! application state. The plain-text helpers at the bottom serve the
//! non-interactive mode and the summary printed after the TUI exits.

use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Gauge, Paragraph, Wrap},
    Frame,
};

use crate::render::RenderState;
use crate::repo::Failure;
use crate::tea::{FatalReason, ProgressState};

const COLOR_ACCENT: Color = Color::Magenta;
const COLOR_TEXT_DIMMED: Color = Color::Gray;
const COLOR_TEXT_MUTED: Color = Color::DarkGray;
const COLOR_SUCCESS: Color = Color::Green;
const COLOR_FAILURE: Color = Color::Red;
const COLOR_WARNING: Color = Color::Yellow;

const SPINNER_FRAMES: [&str; 7] = ["⢄", "⢂", "⢁", "⡁", "⡈", "⡐", "⡠"];

fn spinner(frame: usize) -> &'static str {
    SPINNER_FRAMES[frame % SPINNER_FRAMES.len()]
}

/// Main render function - entry point for all UI drawing.
pub fn draw(frame: &mut Frame, state: &RenderState) {
    let area = frame.area();
    if area.height < 3 {
        frame.render_widget(Paragraph::new(status_line(state)), area);
        return;
    }

    let chunks = Layout::vertical([
        Constraint::Length(2),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .split(area);

    render_header(frame, state, chunks[0]);
    match &state.state {
        ProgressState::Loading | ProgressState::Listing => render_gathering(frame, state, chunks[1]),
        ProgressState::Cloning {
            completed,
            total,
            failures,
        } => render_cloning(frame, state, *completed, *total, failures, chunks[1]),
        ProgressState::Done { total, failures } => {
            render_done(frame, state, *total, failures, chunks[1])
        }
        ProgressState::Fatal(reason) => render_fatal(frame, reason, chunks[1]),
    }
    render_statusbar(frame, state, chunks[2]);
}

fn render_header(frame: &mut Frame, state: &RenderState, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            "clone-org ",
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(state.org.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::styled(" → ", Style::default().fg(COLOR_TEXT_MUTED)),
        Span::styled(state.destination.clone(), Style::default().fg(COLOR_TEXT_DIMMED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_gathering(frame: &mut Frame, state: &RenderState, area: Rect) {
    let line = Line::from(vec![
        Span::styled(
            spinner(state.spinner_frame),
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(" Gathering repositories..."),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn render_cloning(
    frame: &mut Frame,
    state: &RenderState,
    completed: usize,
    total: usize,
    failures: &[Failure],
    area: Rect,
) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .split(area);

    let line = Line::from(vec![
        Span::styled(
            spinner(state.spinner_frame),
            Style::default()
                .fg(COLOR_ACCENT)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw(format!(" Cloning {} repositories...", total)),
    ]);
    frame.render_widget(Paragraph::new(line), chunks[0]);

    let gauge = Gauge::default()
        .gauge_style(Style::default().fg(COLOR_ACCENT).bg(COLOR_TEXT_MUTED))
        .ratio(ratio(completed, total))
        .label(format!("{}/{}", completed, total));
    frame.render_widget(gauge, chunks[1]);

    render_failures(frame, failures, chunks[3]);
}

fn render_done(
    frame: &mut Frame,
    state: &RenderState,
    total: usize,
    failures: &[Failure],
    area: Rect,
) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(if state.skipped_pages > 0 { 1 } else { 0 }),
        Constraint::Length(1),
        Constraint::Fill(1),
    ])
    .split(area);

    let (text, color) = if failures.is_empty() {
        (format!("Cloned {} repositories", total), COLOR_SUCCESS)
    } else {
        (
            format!(
                "Cloned {} of {} repositories, {} failed",
                total - failures.len(),
                total,
                failures.len()
            ),
            COLOR_FAILURE,
        )
    };
    frame.render_widget(
        Paragraph::new(Span::styled(
            text,
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
        chunks[0],
    );

    if state.skipped_pages > 0 {
        frame.render_widget(
            Paragraph::new(Span::styled(
                skipped_pages_warning(state.skipped_pages),
                Style::default().fg(COLOR_WARNING),
            )),
            chunks[1],
        );
    }

    render_failures(frame, failures, chunks[3]);
}

fn render_fatal(frame: &mut Frame, reason: &FatalReason, area: Rect) {
    let style = match reason {
        FatalReason::Cancelled => Style::default().fg(COLOR_WARNING),
        _ => Style::default().fg(COLOR_FAILURE),
    };
    let paragraph = Paragraph::new(Span::styled(reason.to_string(), style)).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}

/// Failure list; when it does not fit, the most recent entries stay visible.
fn render_failures(frame: &mut Frame, failures: &[Failure], area: Rect) {
    if failures.is_empty() || area.height == 0 {
        return;
    }
    let lines: Vec<Line> = failures
        .iter()
        .map(|f| {
            Line::from(vec![
                Span::styled(
                    format!("✗ {}", f.name),
                    Style::default().fg(COLOR_FAILURE),
                ),
                Span::styled(
                    format!("  {}", first_line(&f.reason)),
                    Style::default().fg(COLOR_TEXT_MUTED),
                ),
            ])
        })
        .collect();
    let start = lines.len().saturating_sub(area.height as usize);
    let visible: Vec<Line> = lines.into_iter().skip(start).collect();
    frame.render_widget(Paragraph::new(visible), area);
}

fn render_statusbar(frame: &mut Frame, state: &RenderState, area: Rect) {
    let action = if state.state.is_terminal() {
        "quit"
    } else {
        "cancel"
    };
    let line = Line::from(vec![
        Span::styled("q", Style::default().fg(COLOR_TEXT_DIMMED)),
        Span::styled(format!(" {}", action), Style::default().fg(COLOR_TEXT_MUTED)),
    ]);
    frame.render_widget(Paragraph::new(line), area);
}

fn ratio(completed: usize, total: usize) -> f64 {
    if total == 0 {
        return 1.0;
    }
    (completed as f64 / total as f64).clamp(0.0, 1.0)
}

fn first_line(s: &str) -> &str {
    s.lines().find(|l| !l.trim().is_empty()).unwrap_or("")
}

fn skipped_pages_warning(skipped: usize) -> String {
    format!(
        "Warning: {} page(s) of the repository listing could not be fetched; some repositories may be missing",
        skipped
    )
}

// -----------------------------------------------------------------------------
// Plain text
// -----------------------------------------------------------------------------

/// One-line status used by plain output. Consecutive identical lines are
/// not reprinted by the caller, so spinner ticks produce no output.
pub fn status_line(state: &RenderState) -> String {
    match &state.state {
        ProgressState::Loading => "Starting...".to_string(),
        ProgressState::Listing => format!("Gathering repositories of {}...", state.org),
        ProgressState::Cloning {
            completed,
            total,
            failures,
        } => {
            if failures.is_empty() {
                format!("Cloning {}/{}", completed, total)
            } else {
                format!("Cloning {}/{} ({} failed)", completed, total, failures.len())
            }
        }
        ProgressState::Done { total, failures } => {
            format!("Done: {}/{} cloned", total - failures.len(), total)
        }
        ProgressState::Fatal(reason) => reason.to_string(),
    }
}

/// Final report printed once the run is over.
pub fn summary(state: &RenderState) -> String {
    let mut out = String::new();
    match &state.state {
        ProgressState::Done { total, failures } => {
            if failures.is_empty() {
                out.push_str(&format!(
                    "Cloned {} repositories into {}\n",
                    total, state.destination
                ));
            } else {
                out.push_str(&format!(
                    "Cloned {} of {} repositories into {}\n\n{} failed:\n",
                    total - failures.len(),
                    total,
                    state.destination,
                    failures.len()
                ));
                for failure in failures {
                    out.push_str(&format!("  {}:\n", failure.name));
                    for line in failure.reason.lines() {
                        out.push_str(&format!("    {}\n", line));
                    }
                }
            }
            if state.skipped_pages > 0 {
                out.push('\n');
                out.push_str(&skipped_pages_warning(state.skipped_pages));
                out.push('\n');
            }
        }
        ProgressState::Fatal(FatalReason::Cancelled) => {
            out.push_str("Cancelled: not every repository was cloned\n");
        }
        ProgressState::Fatal(reason) => {
            out.push_str(&format!("{}\n", reason));
        }
        _ => {}
    }
    out
}
