//! Modal error dialog

use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const MAX_WIDTH: u16 = 60;

/// Centered rectangle of at most `width` x `height` inside `area`
pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}

/// Render an error dialog overlay centered on the screen
pub fn render_error_dialog(frame: &mut Frame, title: &str, message: &str, hint: &str) {
    let inner_width = MAX_WIDTH.saturating_sub(4).max(1) as usize;
    // Rough line count for sizing; the paragraph does the real wrapping
    let message_lines = message
        .split('\n')
        .map(|line| line.chars().count().max(1).div_ceil(inner_width))
        .sum::<usize>() as u16;
    // title + blank + message + blank + hint + borders
    let height = message_lines + 6;

    let area = centered_rect(frame.area(), MAX_WIDTH, height);
    frame.render_widget(Clear, area);

    let mut content = vec![
        Line::from(Span::styled(
            title,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
    ];
    content.extend(message.split('\n').map(Line::from));
    content.push(Line::from(""));
    content.push(Line::from(Span::styled(
        hint,
        Style::default().fg(Color::DarkGray),
    )));

    let dialog = Paragraph::new(content)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(Color::Red))
                .style(Style::default().bg(Color::Black)),
        );

    frame.render_widget(dialog, area);
}
