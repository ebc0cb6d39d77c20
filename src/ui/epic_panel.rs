//! Epic panel view

use super::components::{render_button, ButtonState};
use super::layout::PanelLayout;
use crate::panel::{PanelState, RunSummary, StatusSeverity};
use chrono::Local;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

pub const BUTTON_LABEL: &str = "Generate User Stories";
pub const BUTTON_BUSY_LABEL: &str = "Generating...";

/// Draw every section of the panel
pub fn draw(frame: &mut Frame, layout: &PanelLayout, state: &PanelState) {
    draw_header(frame, layout.header);
    draw_epic(frame, layout.epic, state);

    let (label, button_state) = if state.trigger_enabled() {
        (BUTTON_LABEL, ButtonState::Enabled)
    } else if state.is_busy() {
        (BUTTON_BUSY_LABEL, ButtonState::Busy)
    } else {
        (BUTTON_LABEL, ButtonState::Disabled)
    };
    render_button(frame, layout.button, label, button_state);

    draw_status(frame, layout.status, state);
    draw_summary(frame, layout.summary, state.last_run.as_ref());
}

fn draw_header(frame: &mut Frame, area: Rect) {
    let header = Paragraph::new(Line::from(vec![
        Span::styled(
            "User Story Generator",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            "  stories from related wiki pages",
            Style::default().fg(Color::DarkGray),
        ),
    ]))
    .block(Block::default().borders(Borders::BOTTOM));
    frame.render_widget(header, area);
}

fn draw_epic(frame: &mut Frame, area: Rect, state: &PanelState) {
    let label = Style::default().fg(Color::DarkGray);
    let lines = match &state.epic {
        Some(epic) => vec![
            Line::from(vec![
                Span::styled("Epic: ", label),
                Span::raw(format!("#{}", epic.id)),
            ]),
            Line::from(vec![
                Span::styled("Title: ", label),
                if epic.title.is_empty() {
                    Span::styled("(no title)", Style::default().fg(Color::Red))
                } else {
                    Span::raw(epic.title.as_str())
                },
            ]),
        ],
        None => vec![Line::from(Span::styled("Epic not loaded", label))],
    };

    let paragraph = Paragraph::new(lines).block(
        Block::default()
            .title(" Epic ")
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    frame.render_widget(paragraph, area);
}

/// Color for a status severity
pub fn severity_color(severity: StatusSeverity) -> Color {
    match severity {
        StatusSeverity::Loading => Color::Yellow,
        StatusSeverity::Success => Color::Green,
        StatusSeverity::Error => Color::Red,
        StatusSeverity::Info => Color::Cyan,
    }
}

fn draw_status(frame: &mut Frame, area: Rect, state: &PanelState) {
    let color = severity_color(state.status.severity);
    let line = Line::from(vec![
        Span::styled("● ", Style::default().fg(color)),
        Span::styled(state.status.text.as_str(), Style::default().fg(color)),
    ]);

    let paragraph = Paragraph::new(line)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(format!(" Status: {} ", state.status.severity.label()))
                .borders(Borders::ALL)
                .border_style(Style::default().fg(color)),
        );
    frame.render_widget(paragraph, area);
}

fn draw_summary(frame: &mut Frame, area: Rect, summary: Option<&RunSummary>) {
    let block = Block::default()
        .title(" Last run ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));

    let Some(summary) = summary else {
        let empty = Paragraph::new("No stories generated yet.")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        frame.render_widget(empty, area);
        return;
    };

    let heading = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    let mut content = vec![
        Line::from(Span::styled(
            format!(
                "{} · created {} of {} stories",
                summary.finished_at.with_timezone(&Local).format("%H:%M:%S"),
                summary.created,
                summary.stories.len()
            ),
            Style::default().fg(Color::Gray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            format!("Wiki pages ({})", summary.pages.len()),
            heading,
        )),
    ];

    for page in &summary.pages {
        let mut spans = vec![Span::raw("  "), Span::raw(page.path.as_str())];
        if let Some(confidence) = page.confidence {
            spans.push(Span::styled(
                format!("  {:.0}%", confidence * 100.0),
                Style::default().fg(Color::DarkGray),
            ));
        }
        content.push(Line::from(spans));
    }

    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        format!("Stories ({})", summary.stories.len()),
        heading,
    )));
    for story in &summary.stories {
        let color = if story.is_created() {
            Color::Green
        } else {
            Color::Red
        };
        let mut spans = vec![
            Span::styled(format!("  [{}] ", story.status), Style::default().fg(color)),
            Span::raw(story.title.clone().unwrap_or_else(|| "(untitled)".to_string())),
        ];
        if let Some(error) = &story.error {
            spans.push(Span::styled(
                format!("  {error}"),
                Style::default().fg(Color::DarkGray),
            ));
        }
        content.push(Line::from(spans));
    }

    let paragraph = Paragraph::new(content)
        .block(block)
        .wrap(Wrap { trim: false });
    frame.render_widget(paragraph, area);
}
