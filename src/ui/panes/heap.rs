//! Heap pane rendering
//!
//! The top of the pane is an occupancy map with one cell per byte: bound storage,
//! unswept temporaries and free bytes each get their own glyph. Below it every
//! live allocation is listed by address with its size, owner and decoded value.

use super::{clamp_scroll, pane_block};
use crate::interpreter::constants::{BOOLEAN_SIZE, NUMBER_SIZE};
use crate::memory::heap::{Allocation, Heap};
use crate::memory::value::{Ownership, VarType};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem},
    Frame,
};

const OWNED_CELL: &str = "█";
const TEMPORARY_CELL: &str = "▒";
const FREE_CELL: &str = "·";

pub fn render_heap_pane(
    frame: &mut Frame,
    area: Rect,
    heap: &Heap,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = format!(" Heap {}/{} bytes ", heap.occupied(), heap.capacity());
    let block = pane_block(&title, is_focused);

    let row_width = area.width.saturating_sub(2).max(8) as usize;
    let mut lines = occupancy_lines(heap, row_width);
    lines.push(Line::raw(""));

    let allocations = heap.allocations();
    if allocations.is_empty() {
        lines.push(Line::styled(
            "(no allocations)",
            Style::default().fg(DEFAULT_THEME.comment),
        ));
    }
    lines.extend(allocations.iter().map(|alloc| allocation_line(heap, alloc)));

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

/// One map row per `row_width` bytes, highest address last
fn occupancy_lines(heap: &Heap, row_width: usize) -> Vec<Line<'static>> {
    let mut owners: Vec<Option<Ownership>> = vec![None; heap.capacity()];
    for alloc in heap.allocations() {
        for address in alloc.pointer.range() {
            if let Some(slot) = owners.get_mut(address) {
                *slot = Some(alloc.ownership);
            }
        }
    }

    let cells: Vec<Span<'static>> = owners
        .into_iter()
        .map(|owner| match owner {
            Some(Ownership::Owned(_)) => {
                Span::styled(OWNED_CELL, Style::default().fg(DEFAULT_THEME.owned))
            }
            Some(Ownership::Temporary(_)) => {
                Span::styled(TEMPORARY_CELL, Style::default().fg(DEFAULT_THEME.temporary))
            }
            None => Span::styled(FREE_CELL, Style::default().fg(DEFAULT_THEME.free)),
        })
        .collect();

    cells
        .chunks(row_width)
        .map(|row| Line::from(row.to_vec()))
        .collect()
}

fn allocation_line(heap: &Heap, alloc: &Allocation) -> Line<'static> {
    let pointer = alloc.pointer;
    let (owner, owner_color) = match alloc.ownership {
        Ownership::Owned(scope) => (format!("owned {}", scope), DEFAULT_THEME.owned),
        Ownership::Temporary(scope) => (format!("temp  {}", scope), DEFAULT_THEME.temporary),
    };

    // Sizes map one-to-one onto the two value types
    let var_type = match pointer.size() {
        NUMBER_SIZE => Some(VarType::Number),
        BOOLEAN_SIZE => Some(VarType::Boolean),
        _ => None,
    };
    let value = var_type
        .and_then(|t| heap.read_value(pointer, t).ok())
        .map_or_else(|| "?".to_string(), |v| v.to_string());

    Line::from(vec![
        Span::styled(
            format!("0x{:04x}", pointer.address()),
            Style::default().fg(DEFAULT_THEME.comment),
        ),
        Span::raw(format!(" [{}] ", pointer.size())),
        Span::styled(owner, Style::default().fg(owner_color)),
        Span::raw(" = "),
        Span::styled(value, Style::default().fg(DEFAULT_THEME.value)),
    ])
}
