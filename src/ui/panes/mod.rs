//! Inspector pane rendering
//!
//! - [`scopes`]: scope-context stack with bindings, functions and return values
//! - [`heap`]: byte occupancy map and the list of live allocations
//! - [`output`]: values printed by `#`
//! - [`status`]: step position, playback state and key hints
//!
//! Every pane takes the border style from [`pane_block`] so focus looks the same
//! everywhere.

pub mod heap;
pub mod output;
pub mod scopes;
pub mod status;

pub use heap::render_heap_pane;
pub use output::render_output_pane;
pub use scopes::render_scope_pane;
pub use status::{render_status_bar, StatusRenderData};

use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    style::{Modifier, Style},
    widgets::{Block, Borders},
};

/// Bordered block with the title and the focus highlight
pub(crate) fn pane_block(title: &str, is_focused: bool) -> Block<'_> {
    let border_style = if is_focused {
        Style::default()
            .fg(DEFAULT_THEME.border_focused)
            .add_modifier(Modifier::BOLD)
    } else {
        Style::default().fg(DEFAULT_THEME.border_normal)
    };

    Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(border_style)
}

/// Clamp `offset` so the last page of `total` items stays filled
pub(crate) fn clamp_scroll(offset: &mut usize, total: usize, visible: usize) {
    if total > visible {
        *offset = (*offset).min(total - visible);
    } else {
        *offset = 0;
    }
}
