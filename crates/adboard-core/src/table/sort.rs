//! Single-column, three-state sorting

use super::columns::{ColumnId, SortKey};
use crate::analytics::window::RecentMetrics;
use crate::models::Material;
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Sort direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SortDirection {
    Asc,
    Desc,
}

impl SortDirection {
    /// Header indicator
    pub fn indicator(&self) -> &'static str {
        match self {
            SortDirection::Asc => "▲",
            SortDirection::Desc => "▼",
        }
    }
}

/// Active sort: one column and a direction
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortState {
    pub column: ColumnId,
    pub direction: SortDirection,
}

/// Next sort after clicking `column`'s sort control
///
/// Same column cycles ascending -> descending -> unsorted; a different column
/// starts ascending.
pub fn cycle_sort(current: Option<SortState>, column: ColumnId) -> Option<SortState> {
    match current {
        Some(SortState {
            column: active,
            direction,
        }) if active == column => match direction {
            SortDirection::Asc => Some(SortState {
                column,
                direction: SortDirection::Desc,
            }),
            SortDirection::Desc => None,
        },
        _ => Some(SortState {
            column,
            direction: SortDirection::Asc,
        }),
    }
}

/// Compare two sort keys in the given direction
///
/// Total: floats use `total_cmp`, missing numbers sort last in both
/// directions, text compares lexicographically.
pub fn compare_keys(a: SortKey<'_>, b: SortKey<'_>, direction: SortDirection) -> Ordering {
    let directed = |ord: Ordering| match direction {
        SortDirection::Asc => ord,
        SortDirection::Desc => ord.reverse(),
    };

    match (a, b) {
        (SortKey::Number(Some(x)), SortKey::Number(Some(y))) => directed(x.total_cmp(&y)),
        (SortKey::Number(None), SortKey::Number(None)) => Ordering::Equal,
        (SortKey::Number(None), SortKey::Number(Some(_))) => Ordering::Greater,
        (SortKey::Number(Some(_)), SortKey::Number(None)) => Ordering::Less,
        (SortKey::Text(x), SortKey::Text(y)) => directed(x.cmp(y)),
        // Not produced by a single column; keep numbers ahead of text
        (SortKey::Number(_), SortKey::Text(_)) => Ordering::Less,
        (SortKey::Text(_), SortKey::Number(_)) => Ordering::Greater,
    }
}

/// Stable sort of rows by the active sort; unsorted leaves order untouched
pub fn sort_rows<'a>(rows: &mut [(&'a Material, RecentMetrics)], sort: Option<SortState>) {
    let Some(SortState { column, direction }) = sort else {
        return;
    };

    rows.sort_by(|(ma, ra), (mb, rb)| {
        compare_keys(column.sort_key(ma, ra), column.sort_key(mb, rb), direction)
    });
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cycle_three_states() {
        let s1 = cycle_sort(None, ColumnId::Spend);
        assert_eq!(s1.map(|s| s.direction), Some(SortDirection::Asc));

        let s2 = cycle_sort(s1, ColumnId::Spend);
        assert_eq!(s2.map(|s| s.direction), Some(SortDirection::Desc));

        let s3 = cycle_sort(s2, ColumnId::Spend);
        assert_eq!(s3, None);
    }

    #[test]
    fn test_cycle_other_column_starts_ascending() {
        let desc = Some(SortState {
            column: ColumnId::Spend,
            direction: SortDirection::Desc,
        });
        let next = cycle_sort(desc, ColumnId::Roi);
        assert_eq!(
            next,
            Some(SortState {
                column: ColumnId::Roi,
                direction: SortDirection::Asc
            })
        );
    }

    #[test]
    fn test_missing_sorts_last_both_directions() {
        let some = SortKey::Number(Some(1.0));
        let none = SortKey::Number(None);
        assert_eq!(compare_keys(none, some, SortDirection::Asc), Ordering::Greater);
        assert_eq!(compare_keys(none, some, SortDirection::Desc), Ordering::Greater);
        assert_eq!(compare_keys(some, none, SortDirection::Desc), Ordering::Less);
    }

    #[test]
    fn test_sort_rows_stable_for_equal_keys() {
        let a = Material::new("a", "a").with_spend(5.0);
        let b = Material::new("b", "b").with_spend(1.0);
        let c = Material::new("c", "c").with_spend(5.0);
        let d = Material::new("d", "d");

        let mut rows: Vec<(&Material, RecentMetrics)> = [&a, &b, &c, &d]
            .into_iter()
            .map(|m| (m, RecentMetrics::default()))
            .collect();

        sort_rows(
            &mut rows,
            Some(SortState {
                column: ColumnId::Spend,
                direction: SortDirection::Desc,
            }),
        );
        let order: Vec<&str> = rows.iter().map(|(m, _)| m.id.as_str()).collect();
        assert_eq!(order, vec!["a", "c", "b", "d"]);
    }

    #[test]
    fn test_sort_by_name_text() {
        let x = Material::new("1", "视频广告 2");
        let y = Material::new("2", "视频广告 10");
        let mut rows = vec![(&x, RecentMetrics::default()), (&y, RecentMetrics::default())];
        sort_rows(
            &mut rows,
            Some(SortState {
                column: ColumnId::Name,
                direction: SortDirection::Asc,
            }),
        );
        // Lexicographic, not natural order
        assert_eq!(rows[0].0.id, "2");
    }
}
