//! Activity log pane

use crate::playback::{ActivityLog, LogLevel};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the recent-activity pane, newest entry last
pub fn render_log_pane(frame: &mut Frame, area: Rect, log: &ActivityLog, is_focused: bool) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Activity ")
        .borders(Borders::ALL)
        .border_style(border_style);

    if log.is_empty() {
        let paragraph = Paragraph::new("(no activity)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let lines: Vec<Line> = log
        .entries()
        .map(|entry| {
            let (marker, color) = match entry.level {
                LogLevel::Info => ("•", DEFAULT_THEME.primary),
                LogLevel::Success => ("✓", DEFAULT_THEME.success),
                LogLevel::Warning => ("!", DEFAULT_THEME.warning),
                LogLevel::Error => ("✗", DEFAULT_THEME.error),
            };
            let age = entry.timestamp.elapsed().as_secs();
            Line::from(vec![
                Span::styled(format!("{} ", marker), Style::default().fg(color)),
                Span::styled(
                    format!("{:>3}s ", age),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(entry.message.as_str(), Style::default().fg(DEFAULT_THEME.fg)),
            ])
        })
        .collect();

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
