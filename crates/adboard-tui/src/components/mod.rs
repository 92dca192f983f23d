pub mod column_picker;
pub mod error_panel;
pub mod field_picker;
pub mod filter_bar;
pub mod help_modal;
pub mod material_table;
pub mod spinner;
pub mod stats_cards;
pub mod toast;

pub use material_table::MaterialTable;
pub use spinner::Spinner;
pub use toast::{Toast, ToastKind, ToastManager};

use ratatui::layout::Rect;

/// Rect of at most `width` x `height` centered in `area`
pub fn centered(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect {
        x: area.x + (area.width - width) / 2,
        y: area.y + (area.height - height) / 2,
        width,
        height,
    }
}
