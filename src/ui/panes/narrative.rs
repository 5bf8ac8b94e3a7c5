//! Narrative pane: message, highlight and description of the current step

use crate::trace::{Step, StepKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

/// Render the narrative pane
pub fn render_narrative_pane<K: StepKind>(
    frame: &mut Frame,
    area: Rect,
    step: Option<&Step<K>>,
    is_focused: bool,
) {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(" Step ")
        .borders(Borders::ALL)
        .border_style(border_style);

    let lines = match step {
        None => vec![Line::styled(
            "No step applied yet",
            Style::default().fg(DEFAULT_THEME.comment),
        )],
        Some(step) => vec![
            Line::from(vec![
                Span::styled(
                    format!("#{} ", step.sequence_number),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(
                    step.tag(),
                    Style::default()
                        .fg(DEFAULT_THEME.primary)
                        .add_modifier(Modifier::BOLD),
                ),
            ]),
            Line::default(),
            Line::styled(
                step.message.clone(),
                Style::default()
                    .fg(DEFAULT_THEME.fg)
                    .add_modifier(Modifier::BOLD),
            ),
            Line::styled(
                step.highlight.clone(),
                Style::default().fg(DEFAULT_THEME.secondary),
            ),
            Line::default(),
            Line::styled(
                step.description.clone(),
                Style::default().fg(DEFAULT_THEME.fg),
            ),
        ],
    };

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, area);
}
