//! One-shot CLI commands: argument parsing helpers and table formatters

use adboard_core::analytics::{OverviewMetric, StatsCard};
use adboard_core::table::{
    CellValue, ColumnId, CustomizerEntry, SortDirection, SortState, TableSnapshot,
};
use anyhow::{bail, Context, Result};
use chrono::{Days, Local, NaiveDate};
use comfy_table::{Cell, CellAlignment, Color, ContentArrangement, Row, Table};

// ============================================================================
// Argument parsing
// ============================================================================

/// Parse `today`, `yesterday` or `YYYY-MM-DD`
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    let today = Local::now().date_naive();
    let date = match s {
        "today" => today,
        "yesterday" => today
            .checked_sub_days(Days::new(1))
            .context("Date out of range")?,
        _ => NaiveDate::parse_from_str(s, "%Y-%m-%d")
            .with_context(|| format!("Invalid date '{}' (expected YYYY-MM-DD)", s))?,
    };
    if date > today {
        bail!("Date {} is in the future", date);
    }
    Ok(date)
}

/// Parse `column[:asc|desc]`; direction defaults to ascending
pub fn parse_sort(s: &str) -> Result<SortState> {
    let (name, direction) = match s.split_once(':') {
        Some((name, dir)) => {
            let direction = match dir.to_ascii_lowercase().as_str() {
                "asc" => SortDirection::Asc,
                "desc" => SortDirection::Desc,
                other => bail!("Invalid sort direction '{}' (expected asc|desc)", other),
            };
            (name, direction)
        }
        None => (s, SortDirection::Asc),
    };
    let column: ColumnId = name.parse()?;
    if !column.is_sortable() {
        bail!("Column '{}' is not sortable", column);
    }
    Ok(SortState { column, direction })
}

/// Parse a comma-separated column list; blanks are skipped
pub fn parse_columns(s: &str) -> Result<Vec<ColumnId>> {
    s.split(',')
        .map(str::trim)
        .filter(|name| !name.is_empty())
        .map(|name| name.parse::<ColumnId>().map_err(Into::into))
        .collect()
}

// ============================================================================
// Formatters
// ============================================================================

fn header_cell(text: impl Into<String>, no_color: bool) -> Cell {
    let cell = Cell::new(text.into());
    if no_color {
        cell
    } else {
        cell.fg(Color::Cyan)
    }
}

fn value_cell(value: &CellValue, no_color: bool) -> Cell {
    let cell = Cell::new(value.to_string());
    match value {
        CellValue::Missing if !no_color => cell.fg(Color::DarkGrey),
        CellValue::Text(_) | CellValue::Missing => cell,
        CellValue::Curve(_) if !no_color => cell.fg(Color::Yellow),
        _ => cell.set_alignment(CellAlignment::Right),
    }
}

/// Format one table page (human) or the whole snapshot as JSON
///
/// The pinned preview and actions columns are replaced by an ID column.
pub fn format_material_table(snapshot: &TableSnapshot, json: bool, no_color: bool) -> String {
    if json {
        return serde_json::to_string_pretty(snapshot).unwrap_or_else(|_| "{}".to_string());
    }
    if snapshot.is_empty() {
        return "无结果".to_string();
    }

    let shown: Vec<usize> = snapshot
        .columns
        .iter()
        .enumerate()
        .filter(|(_, c)| !c.id.is_pinned())
        .map(|(i, _)| i)
        .collect();

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    let mut header = vec![header_cell("ID", no_color)];
    header.extend(
        shown
            .iter()
            .map(|i| header_cell(snapshot.columns[*i].header(), no_color)),
    );
    table.set_header(header);

    for row in &snapshot.rows {
        let mut cells = vec![Cell::new(&row.id)];
        cells.extend(shown.iter().map(|i| value_cell(&row.cells[*i], no_color)));
        table.add_row(Row::from(cells));
    }

    format!("{}\n{}", table, snapshot.pagination)
}

/// Format overview cards: title, headline, mean and a sparkline
pub fn format_overview(cards: &[StatsCard], json: bool, no_color: bool) -> String {
    if json {
        return serde_json::to_string_pretty(cards).unwrap_or_else(|_| "[]".to_string());
    }

    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        header_cell("指标", no_color),
        header_cell("当前", no_color),
        header_cell("均值", no_color),
        header_cell("走势", no_color),
    ]);

    for card in cards {
        let values: Vec<f64> = card.points.iter().map(|p| p.value).collect();
        table.add_row(Row::from(vec![
            Cell::new(card.title),
            Cell::new(&card.value).set_alignment(CellAlignment::Right),
            Cell::new(mean_label(card.metric, &values)).set_alignment(CellAlignment::Right),
            Cell::new(adboard_core::format::sparkline(&values, 24)),
        ]));
    }
    table.to_string()
}

fn mean_label(metric: OverviewMetric, values: &[f64]) -> String {
    if values.is_empty() {
        return adboard_core::format::NO_DATA.to_string();
    }
    metric.format_value(values.iter().sum::<f64>() / values.len() as f64)
}

/// Format the column customizer listing
pub fn format_columns(entries: &[CustomizerEntry], no_color: bool) -> String {
    let mut table = Table::new();
    table.set_content_arrangement(ContentArrangement::Dynamic);
    table.set_header(vec![
        header_cell("ID", no_color),
        header_cell("名称", no_color),
        header_cell("显示", no_color),
    ]);
    for entry in entries {
        let shown = if entry.visible { "✓" } else { "" };
        let shown = if no_color {
            Cell::new(shown)
        } else {
            Cell::new(shown).fg(Color::Green)
        };
        table.add_row(Row::from(vec![
            Cell::new(entry.column.id()),
            Cell::new(&entry.label),
            shown,
        ]));
    }
    table.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use adboard_core::filter::FilterCriteria;
    use adboard_core::{DateRange, MockSource, TableViewState, TimeWindow};

    const ANCHOR: i64 = 1_700_000_000_000;

    fn snapshot(count: usize) -> TableSnapshot {
        let data = MockSource::new()
            .with_material_count(count)
            .with_seed(Some(1))
            .with_anchor(ANCHOR)
            .generate(DateRange::new(ANCHOR - 86_400_000 + 1, ANCHOR).unwrap());
        TableViewState::new().snapshot(
            &data.materials,
            &FilterCriteria::default(),
            TimeWindow::default(),
            ANCHOR,
        )
    }

    #[test]
    fn test_parse_sort() {
        let sort = parse_sort("spend:desc").unwrap();
        assert_eq!(sort.column, ColumnId::Spend);
        assert_eq!(sort.direction, SortDirection::Desc);

        assert_eq!(parse_sort("recentROI").unwrap().direction, SortDirection::Asc);
        assert!(parse_sort("spend:sideways").is_err());
        assert!(parse_sort("preview").is_err());
        assert!(parse_sort("bogus").is_err());
    }

    #[test]
    fn test_parse_columns() {
        assert_eq!(
            parse_columns("clicks, ctr,,").unwrap(),
            vec![ColumnId::Clicks, ColumnId::Ctr]
        );
        assert!(parse_columns("clicks,nope").is_err());
        assert!(parse_columns("").unwrap().is_empty());
    }

    #[test]
    fn test_parse_date() {
        assert_eq!(parse_date("today").unwrap(), Local::now().date_naive());
        assert_eq!(
            parse_date("2024-03-01").unwrap(),
            NaiveDate::from_ymd_opt(2024, 3, 1).unwrap()
        );
        assert!(parse_date("2024-13-01").is_err());
        assert!(parse_date("9999-01-01").is_err());
    }

    #[test]
    fn test_table_skips_pinned_columns() {
        let out = format_material_table(&snapshot(3), false, true);
        assert!(out.contains("素材名称"));
        assert!(!out.contains("预览"));
        assert!(out.contains("视频广告 1"));
    }

    #[test]
    fn test_empty_table_and_json() {
        let empty = format_material_table(&snapshot(0), false, true);
        assert_eq!(empty, "无结果");

        let json = format_material_table(&snapshot(2), true, true);
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();
        assert_eq!(value["rows"].as_array().unwrap().len(), 2);
    }
}
