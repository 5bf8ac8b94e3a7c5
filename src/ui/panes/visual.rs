//! Visualization pane
//!
//! Every step family implements [`StepView`], which turns one snapshot into
//! styled lines: bars for sorting, cells for searching, buckets or slots for
//! hash tables, frames for the call stack and columns for Hanoi pegs. The
//! pane itself only handles the border, scrolling and the empty state.

use crate::hashing::{
    ChainingTable, HashSnapshot, HashTable, LookupSnapshot, ProbingTable, TableStats,
};
use crate::recursion::{CallSnapshot, HanoiSnapshot, Peg, RecursionEvent};
use crate::searching::{SearchEvent, SearchSnapshot};
use crate::sorting::{SortEvent, SortSnapshot};
use crate::trace::{Step, StepKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, Paragraph},
    Frame,
};

/// Rendering of one snapshot into the visualization pane.
pub trait StepView: StepKind {
    /// Lines to draw, given `width` usable columns.
    fn view(&self, width: usize) -> Vec<Line<'static>>;
}

fn plain(color: Color) -> Style {
    Style::default().fg(color)
}

fn bold(color: Color) -> Style {
    Style::default().fg(color).add_modifier(Modifier::BOLD)
}

fn sort_color(snapshot: &SortSnapshot, i: usize) -> Color {
    let focused = match snapshot.event {
        SortEvent::Select { index, .. } | SortEvent::NoSwap { index } => index == i,
        SortEvent::Insert {
            insert_position, ..
        } => insert_position == i,
        SortEvent::NewMinimum { min_index, .. } => min_index == i,
        _ => false,
    };

    if snapshot.swapping().contains(&i) {
        DEFAULT_THEME.swapping
    } else if snapshot.shifting().contains(&i) {
        DEFAULT_THEME.shifting
    } else if snapshot.pivot() == Some(i) {
        DEFAULT_THEME.pivot
    } else if focused || snapshot.comparing().contains(&i) {
        DEFAULT_THEME.comparing
    } else if snapshot.sorted.contains(&i) {
        DEFAULT_THEME.sorted
    } else if snapshot
        .range()
        .is_some_and(|[low, high]| (low..=high).contains(&i))
    {
        DEFAULT_THEME.primary
    } else {
        DEFAULT_THEME.fg
    }
}

impl StepView for SortSnapshot {
    fn view(&self, width: usize) -> Vec<Line<'static>> {
        if self.array.is_empty() {
            return vec![Line::styled("(empty array)", plain(DEFAULT_THEME.comment))];
        }

        let largest = self
            .array
            .iter()
            .map(|v| v.unsigned_abs())
            .max()
            .unwrap_or(1)
            .max(1);
        let label = self
            .array
            .iter()
            .map(|v| v.to_string().len())
            .max()
            .unwrap_or(1);
        let room = width.saturating_sub(label + 6).max(1);

        self.array
            .iter()
            .enumerate()
            .map(|(i, &value)| {
                let len = (value.unsigned_abs() as f64 / largest as f64 * room as f64).round();
                let color = sort_color(self, i);
                Line::from(vec![
                    Span::styled(format!("{:>3} ", i), plain(DEFAULT_THEME.comment)),
                    Span::styled("█".repeat(len as usize), plain(color)),
                    Span::styled(format!(" {}", value), plain(color)),
                ])
            })
            .collect()
    }
}

impl StepView for SearchSnapshot {
    fn view(&self, width: usize) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(vec![
                Span::styled("Target: ", plain(DEFAULT_THEME.comment)),
                Span::styled(self.target.to_string(), bold(DEFAULT_THEME.secondary)),
            ]),
            Line::default(),
        ];
        if self.array.is_empty() {
            lines.push(Line::styled("(empty array)", plain(DEFAULT_THEME.comment)));
            return lines;
        }

        let cell = self
            .array
            .iter()
            .map(|v| v.to_string().len())
            .max()
            .unwrap_or(1)
            .max(3)
            + 2;
        let per_row = (width / cell).max(1);
        let range = self.range();
        let current = self.current_index();
        let found = matches!(self.event, SearchEvent::Found { .. });

        for start in (0..self.array.len()).step_by(per_row) {
            let end = (start + per_row).min(self.array.len());
            let mut indices = Vec::new();
            let mut values = Vec::new();
            for i in start..end {
                let live = range.map_or(true, |r| {
                    i >= r.left && r.right.is_some_and(|right| i <= right)
                });
                let style = if current == Some(i) && found {
                    bold(DEFAULT_THEME.success)
                } else if current == Some(i) {
                    bold(DEFAULT_THEME.comparing)
                } else if live {
                    plain(DEFAULT_THEME.fg)
                } else {
                    plain(DEFAULT_THEME.comment)
                };
                indices.push(Span::styled(
                    format!("{:^w$}", i, w = cell),
                    plain(DEFAULT_THEME.comment),
                ));
                values.push(Span::styled(
                    format!("{:^w$}", self.array[i], w = cell),
                    style,
                ));
            }
            lines.push(Line::from(values));
            lines.push(Line::from(indices));
            lines.push(Line::default());
        }

        if let Some(r) = range {
            let right = r.right.map_or("-1".to_string(), |v| v.to_string());
            lines.push(Line::styled(
                format!("Search range: [{}, {}]", r.left, right),
                plain(DEFAULT_THEME.primary),
            ));
        }
        lines
    }
}

/// Row rendering shared by insertion and lookup views.
trait TableView: HashTable {
    fn rows(&self, focus: Option<usize>) -> Vec<Line<'static>>;
}

fn slot_label(index: usize, focused: bool) -> Span<'static> {
    let style = if focused {
        bold(DEFAULT_THEME.comparing)
    } else {
        plain(DEFAULT_THEME.comment)
    };
    Span::styled(format!("[{:>2}]", index), style)
}

impl TableView for ChainingTable {
    fn rows(&self, focus: Option<usize>) -> Vec<Line<'static>> {
        self.iter()
            .enumerate()
            .map(|(i, bucket)| {
                let focused = focus == Some(i);
                let mut spans = vec![slot_label(i, focused)];
                if bucket.is_empty() {
                    spans.push(Span::styled(" ∅", plain(DEFAULT_THEME.comment)));
                }
                for entry in bucket {
                    spans.push(Span::styled(" → ", plain(DEFAULT_THEME.comment)));
                    let color = if bucket.len() > 1 {
                        DEFAULT_THEME.secondary
                    } else {
                        DEFAULT_THEME.fg
                    };
                    spans.push(Span::styled(entry.key.clone(), plain(color)));
                }
                Line::from(spans)
            })
            .collect()
    }
}

impl TableView for ProbingTable {
    fn rows(&self, focus: Option<usize>) -> Vec<Line<'static>> {
        self.iter()
            .enumerate()
            .map(|(i, slot)| {
                let focused = focus == Some(i);
                let content = match slot {
                    Some(entry) => Span::styled(format!(" {}", entry.key), plain(DEFAULT_THEME.fg)),
                    None => Span::styled(" —", plain(DEFAULT_THEME.comment)),
                };
                Line::from(vec![slot_label(i, focused), content])
            })
            .collect()
    }
}

fn stats_line(stats: TableStats) -> Line<'static> {
    Line::styled(
        format!(
            "size {} · elements {} · load {:.2} · collisions {} · longest chain {}",
            stats.table_size,
            stats.elements,
            stats.load_factor,
            stats.collisions,
            stats.longest_chain
        ),
        plain(DEFAULT_THEME.primary),
    )
}

impl<T: TableView> StepView for HashSnapshot<T> {
    fn view(&self, _width: usize) -> Vec<Line<'static>> {
        let mut lines = vec![stats_line(self.table.stats()), Line::default()];
        lines.extend(self.table.rows(self.focus_index()));

        if let Some(hash_step) = self.hash_step() {
            lines.push(Line::default());
            lines.push(Line::styled(
                format!("{} derivation:", hash_step.function),
                bold(DEFAULT_THEME.secondary),
            ));
            lines.extend(
                hash_step
                    .derivation
                    .iter()
                    .map(|d| Line::styled(format!("  {}", d), plain(DEFAULT_THEME.fg))),
            );
        }
        lines
    }
}

impl<T: TableView> StepView for LookupSnapshot<T> {
    fn view(&self, _width: usize) -> Vec<Line<'static>> {
        let mut lines = vec![
            Line::from(vec![
                Span::styled("Looking up ", plain(DEFAULT_THEME.comment)),
                Span::styled(format!("\"{}\"", self.key), bold(DEFAULT_THEME.secondary)),
            ]),
            stats_line(self.table.stats()),
            Line::default(),
        ];
        lines.extend(self.table.rows(self.focus_index()));
        lines
    }
}

impl StepView for CallSnapshot {
    fn view(&self, _width: usize) -> Vec<Line<'static>> {
        let name = if self.memo.is_some() {
            "fibonacci"
        } else {
            "factorial"
        };
        let mut lines = vec![Line::styled(
            format!("Call stack (depth {})", self.call_stack.len()),
            bold(DEFAULT_THEME.primary),
        )];

        if self.call_stack.is_empty() {
            lines.push(Line::styled("  (empty)", plain(DEFAULT_THEME.comment)));
        }
        let top = self.call_stack.len().saturating_sub(1);
        for (i, frame) in self.call_stack.iter().enumerate() {
            let style = if i == top {
                bold(DEFAULT_THEME.comparing)
            } else {
                plain(DEFAULT_THEME.fg)
            };
            lines.push(Line::styled(
                format!("{}{}({})", "  ".repeat(frame.depth + 1), name, frame.argument),
                style,
            ));
        }

        if let Some(result) = self.event.result() {
            lines.push(Line::default());
            let label = match self.event {
                RecursionEvent::Memoized { .. } => "Cached",
                RecursionEvent::Complete { .. } => "Final result",
                _ => "Result",
            };
            lines.push(Line::from(vec![
                Span::styled(format!("{}: ", label), plain(DEFAULT_THEME.comment)),
                Span::styled(result.to_string(), bold(DEFAULT_THEME.success)),
            ]));
        }

        if self.memo.is_some() {
            lines.push(Line::default());
            lines.push(Line::styled("Memo", bold(DEFAULT_THEME.primary)));
            let entries = self.memo_entries();
            if entries.is_empty() {
                lines.push(Line::styled("  (empty)", plain(DEFAULT_THEME.comment)));
            }
            lines.extend(entries.into_iter().map(|(k, v)| {
                Line::styled(format!("  fib({}) = {}", k, v), plain(DEFAULT_THEME.fg))
            }));
        }
        lines
    }
}

impl StepView for HanoiSnapshot {
    fn view(&self, _width: usize) -> Vec<Line<'static>> {
        let disks = self.towers.disk_count();
        let column = 2 * disks + 3;
        let mut lines = Vec::with_capacity(disks + 5);

        for level in (0..disks).rev() {
            let spans = Peg::ALL
                .iter()
                .map(|&peg| match self.towers.peg(peg).get(level) {
                    Some(&disk) => Span::styled(
                        format!("{:^w$}", "█".repeat(2 * disk as usize + 1), w = column),
                        plain(DEFAULT_THEME.disk),
                    ),
                    None => Span::styled(
                        format!("{:^w$}", "│", w = column),
                        plain(DEFAULT_THEME.comment),
                    ),
                })
                .collect::<Vec<_>>();
            lines.push(Line::from(spans));
        }

        lines.push(Line::styled(
            "═".repeat(column * Peg::ALL.len()),
            plain(DEFAULT_THEME.comment),
        ));
        lines.push(Line::from(
            Peg::ALL
                .iter()
                .map(|peg| Span::styled(format!("{:^w$}", peg, w = column), bold(DEFAULT_THEME.primary)))
                .collect::<Vec<_>>(),
        ));
        lines.push(Line::default());
        lines.push(Line::from(vec![
            Span::styled("Moves: ", plain(DEFAULT_THEME.comment)),
            Span::styled(self.move_count.to_string(), bold(DEFAULT_THEME.secondary)),
        ]));
        if let RecursionEvent::Move { disk, from, to, .. } = self.event {
            lines.push(Line::styled(
                format!("Last move: disk {} {} → {}", disk, from, to),
                plain(DEFAULT_THEME.fg),
            ));
        }
        lines
    }
}

/// Render the visualization pane for the step under the cursor.
pub fn render_visual_pane<K: StepView>(
    frame: &mut Frame,
    area: Rect,
    title: &str,
    step: Option<&Step<K>>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let border_style = if is_focused {
        bold(DEFAULT_THEME.border_focused)
    } else {
        plain(DEFAULT_THEME.border_normal)
    };

    let block = Block::default()
        .title(format!(" {} ", title))
        .borders(Borders::ALL)
        .border_style(border_style);

    let Some(step) = step else {
        let paragraph = Paragraph::new("Press space to play or → to step")
            .block(block)
            .style(plain(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    };

    let width = area.width.saturating_sub(2) as usize;
    let lines = step.state.view(width);

    let total_items = lines.len();
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    if total_items > visible_height {
        *scroll_offset = (*scroll_offset).min(total_items - visible_height);
    } else {
        *scroll_offset = 0;
    }

    let items: Vec<ListItem> = lines
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(ListItem::new)
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
