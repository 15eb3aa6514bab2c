//! Scope pane rendering
//!
//! Contexts are listed innermost first, matching the order of a fault trace. Each
//! context shows its own bindings with their decoded values and heap addresses,
//! the functions it defines, and the captured return value of a function context.

use super::{clamp_scroll, pane_block};
use crate::memory::heap::Heap;
use crate::memory::scope::{ScopeContext, ScopeStack};
use crate::memory::value::Variable;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

pub fn render_scope_pane(
    frame: &mut Frame,
    area: Rect,
    scopes: &ScopeStack,
    heap: &Heap,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(" Scopes ", is_focused);

    let mut lines: Vec<Line> = Vec::new();
    for ctx in scopes.contexts().iter().rev() {
        lines.extend(context_lines(ctx, heap));
    }
    if lines.is_empty() {
        lines.push(Line::styled(
            "(no scope contexts)",
            Style::default().fg(DEFAULT_THEME.comment),
        ));
    }

    let visible_height = area.height.saturating_sub(2).max(1) as usize;
    clamp_scroll(scroll_offset, lines.len(), visible_height);

    let items: Vec<ListItem> = lines
        .into_iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(ListItem::new)
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}

fn context_lines<'a>(ctx: &'a ScopeContext, heap: &Heap) -> Vec<Line<'a>> {
    let mut lines = vec![Line::from(vec![
        Span::styled(
            ctx.name(),
            Style::default()
                .fg(DEFAULT_THEME.scope_name)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" ({} {})", ctx.kind(), ctx.id()),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
    ])];

    let variables = ctx.variables();
    let functions = ctx.functions();
    if variables.is_empty() && functions.is_empty() && ctx.return_value().is_none() {
        lines.push(Line::styled(
            "  (empty)",
            Style::default().fg(DEFAULT_THEME.comment),
        ));
    }

    for (name, var) in variables {
        lines.push(binding_line(name, *var, heap));
    }

    for def in functions {
        lines.push(Line::from(vec![
            Span::styled("  fn ", Style::default().fg(DEFAULT_THEME.primary)),
            Span::styled(def.name.as_str(), Style::default().fg(DEFAULT_THEME.fg)),
            Span::styled(
                format!("({})", def.params.join(", ")),
                Style::default().fg(DEFAULT_THEME.comment),
            ),
        ]));
    }

    if let Some(ret) = ctx.return_value() {
        lines.push(binding_line("⮐ return", ret, heap));
    }

    lines
}

fn binding_line<'a>(name: &'a str, var: Variable, heap: &Heap) -> Line<'a> {
    let value = match heap.read_value(var.pointer, var.var_type) {
        Ok(value) => Span::styled(value.to_string(), Style::default().fg(DEFAULT_THEME.value)),
        Err(_) => Span::styled("<freed>", Style::default().fg(DEFAULT_THEME.error)),
    };

    Line::from(vec![
        Span::styled(format!("  {}", name), Style::default().fg(DEFAULT_THEME.fg)),
        Span::styled(
            format!(": {} = ", var.var_type),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
        value,
        Span::styled(
            format!("  @0x{:04x}", var.pointer.address()),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
    ])
}
