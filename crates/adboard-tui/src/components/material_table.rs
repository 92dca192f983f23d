//! Materials table: header, paged rows, pagination footer

use crate::theme::{Palette, StatusColor};
use adboard_core::table::{CellValue, ColumnId, TableSnapshot};
use ratatui::{
    layout::{Constraint, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Row, Table},
    Frame,
};

/// Pixels per terminal cell when mapping stored widths
const PX_PER_CELL: u16 = 8;
const MIN_CELLS: u16 = 4;

/// Terminal width of a column stored in pixels
pub fn column_cells(width_px: u16) -> u16 {
    (width_px / PX_PER_CELL).max(MIN_CELLS)
}

/// First and one-past-last column that fit in `available` cells while
/// keeping `selected` on screen
pub fn visible_range(widths: &[u16], selected: usize, available: u16) -> (usize, usize) {
    if widths.is_empty() {
        return (0, 0);
    }
    let selected = selected.min(widths.len() - 1);
    let span = |start: usize, end: usize| -> u32 {
        widths[start..=end].iter().map(|w| u32::from(*w) + 1).sum()
    };

    let mut start = 0;
    while start < selected && span(start, selected) > u32::from(available) {
        start += 1;
    }
    let mut end = selected + 1;
    while end < widths.len() && span(start, end) <= u32::from(available) {
        end += 1;
    }
    (start, end)
}

/// One frame of the table plus the cursor state it is drawn with
pub struct MaterialTable<'a> {
    pub snapshot: &'a TableSnapshot,
    pub selected_row: usize,
    pub selected_column: usize,
    /// Material whose preview is open
    pub preview: Option<&'a str>,
    pub focused: bool,
}

impl MaterialTable<'_> {
    pub fn render(&self, frame: &mut Frame, area: Rect, palette: &Palette) {
        let MaterialTable {
            snapshot,
            selected_row,
            selected_column,
            preview,
            focused,
        } = *self;

        let title = format!(" 素材列表 · {} ", snapshot.pagination);
        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(palette.border(focused))
            .title(Span::styled(title, palette.header()));
        let inner = block.inner(area);

        let widths: Vec<u16> = snapshot
            .columns
            .iter()
            .map(|c| column_cells(c.width))
            .collect();
        let (start, end) = visible_range(&widths, selected_column, inner.width);

        let header = Row::new(snapshot.columns[start..end].iter().enumerate().map(|(i, column)| {
            let style = if start + i == selected_column && focused {
                palette.selected_cell()
            } else {
                palette.header()
            };
            Cell::from(column.header()).style(style)
        }));

        let rows: Vec<Row> = if snapshot.is_empty() {
            vec![Row::new(vec![Cell::from(Span::styled(
                "无结果",
                palette.fg(StatusColor::Neutral),
            ))])]
        } else {
            snapshot
                .rows
                .iter()
                .enumerate()
                .map(|(r, row)| {
                    let cells = snapshot.columns[start..end]
                        .iter()
                        .zip(&row.cells[start..end])
                        .enumerate()
                        .map(|(c, (column, value))| {
                            let previewing = preview == Some(row.id.as_str());
                            let mut style = cell_style(column.id, value, previewing, palette);
                            if r == selected_row && start + c == selected_column && focused {
                                style = style.patch(palette.selected_cell());
                            }
                            Cell::from(value.to_string()).style(style)
                        });
                    let row_view = Row::new(cells);
                    if r == selected_row {
                        row_view.style(palette.selected_row())
                    } else {
                        row_view
                    }
                })
                .collect()
        };

        let constraints: Vec<Constraint> = widths[start..end]
            .iter()
            .map(|w| Constraint::Length(*w))
            .collect();

        let mut footer = vec![Span::styled(
            format!("每页 {} 条", snapshot.pagination.page_size),
            palette.fg(StatusColor::Neutral),
        )];
        if start > 0 || end < snapshot.columns.len() {
            footer.push(Span::styled(
                format!("  列 {}-{} / {}", start + 1, end, snapshot.columns.len()),
                palette.fg(StatusColor::Neutral),
            ));
        }

        let table = Table::new(rows, constraints)
            .header(header.bottom_margin(1))
            .column_spacing(1)
            .block(block.title_bottom(Line::from(footer)));
        frame.render_widget(table, area);
    }
}

fn cell_style(column: ColumnId, value: &CellValue, previewing: bool, palette: &Palette) -> Style {
    match (column, value) {
        (ColumnId::Preview, _) if previewing => palette.fg(StatusColor::Important),
        (ColumnId::Preview | ColumnId::Actions, _) => palette.fg(StatusColor::Focus),
        (_, CellValue::Missing) => palette.fg(StatusColor::Neutral),
        (ColumnId::Roi | ColumnId::RecentRoi | ColumnId::ReinvestmentRoi, CellValue::Decimal(v)) => {
            palette.roi(Some(*v))
        }
        (ColumnId::ConsumptionCurve, _) => palette.fg(StatusColor::Warning),
        (ColumnId::RoiCurve, _) => palette.fg(StatusColor::Success),
        _ => Style::default(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_cells_floor() {
        assert_eq!(column_cells(150), 18);
        assert_eq!(column_cells(10), MIN_CELLS);
    }

    #[test]
    fn test_visible_range_keeps_selection() {
        let widths = [10, 10, 10, 10, 10];
        assert_eq!(visible_range(&widths, 0, 33), (0, 3));
        assert_eq!(visible_range(&widths, 4, 33), (2, 5));
        assert_eq!(visible_range(&widths, 2, 1000), (0, 5));
        assert_eq!(visible_range(&[], 0, 10), (0, 0));
    }

    #[test]
    fn test_selected_column_always_included() {
        let widths = [50, 50, 50];
        let (start, end) = visible_range(&widths, 1, 20);
        assert_eq!((start, end), (1, 2));
    }
}
