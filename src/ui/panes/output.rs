//! Program output pane rendering

use super::{clamp_scroll, pane_block};
use crate::snapshot::OutputBuffer;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the values printed so far, each tagged with its source line
pub fn render_output_pane(
    frame: &mut Frame,
    area: Rect,
    output: &OutputBuffer,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Output ", is_focused);

    if output.is_empty() {
        let paragraph = Paragraph::new("(no output)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    clamp_scroll(scroll_offset, output.lines.len(), visible_height);

    let items: Vec<ListItem> = output
        .lines
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|line| {
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:>4} │ ", line.line),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
                Span::styled(line.text.as_str(), Style::default().fg(DEFAULT_THEME.fg)),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
