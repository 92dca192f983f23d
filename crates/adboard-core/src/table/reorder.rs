//! Column reordering as pure permutation splices

use super::columns::{ColumnId, PINNED_COLUMNS};
use crate::error::CoreError;

/// Move the item at `from` so it lands at `to`, shifting the rest
///
/// Same semantics as a drag-and-drop list: remove then insert.
pub fn splice<T: Clone>(items: &[T], from: usize, to: usize) -> Result<Vec<T>, CoreError> {
    let len = items.len();
    if from >= len {
        return Err(CoreError::IndexOutOfRange { index: from, len });
    }
    if to >= len {
        return Err(CoreError::IndexOutOfRange { index: to, len });
    }

    let mut out = items.to_vec();
    let item = out.remove(from);
    out.insert(to, item);
    Ok(out)
}

/// Put the pinned columns back at positions 0 and 1, keeping the rest in order
pub fn pin_leading(order: &[ColumnId]) -> Vec<ColumnId> {
    let mut out = Vec::with_capacity(order.len());
    out.extend_from_slice(&PINNED_COLUMNS);
    out.extend(order.iter().copied().filter(|c| !c.is_pinned()));
    out
}

/// Move a column within the full order; pinned columns stay in front
pub fn move_column(order: &[ColumnId], from: usize, to: usize) -> Result<Vec<ColumnId>, CoreError> {
    Ok(pin_leading(&splice(order, from, to)?))
}

/// Rebuild a full order from a reordered list of selected columns
///
/// Result: pinned ids, then `selected` in the given order, then every other
/// column from `previous` in its prior relative order. The id set is always
/// the full declared set.
pub fn rebuild_order(previous: &[ColumnId], selected: &[ColumnId]) -> Vec<ColumnId> {
    let mut out = Vec::with_capacity(ColumnId::all().len());
    out.extend_from_slice(&PINNED_COLUMNS);
    for column in selected {
        if !column.is_pinned() && !out.contains(column) {
            out.push(*column);
        }
    }
    for column in previous {
        if !out.contains(column) {
            out.push(*column);
        }
    }
    // Guard against a previous order that lost ids
    for column in ColumnId::all() {
        if !out.contains(column) {
            out.push(*column);
        }
    }
    out
}

/// True when `order` is a permutation of all columns with pinned ids leading
pub fn is_valid_order(order: &[ColumnId]) -> bool {
    let all = ColumnId::all();
    order.len() == all.len()
        && order.starts_with(&PINNED_COLUMNS)
        && all.iter().all(|c| order.contains(c))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_order() -> Vec<ColumnId> {
        ColumnId::all().to_vec()
    }

    #[test]
    fn test_splice_forward_and_backward() {
        let items = vec!['a', 'b', 'c', 'd'];
        assert_eq!(splice(&items, 0, 2).unwrap(), vec!['b', 'c', 'a', 'd']);
        assert_eq!(splice(&items, 3, 1).unwrap(), vec!['a', 'd', 'b', 'c']);
        assert_eq!(splice(&items, 1, 1).unwrap(), items);
        assert!(splice(&items, 4, 0).is_err());
        assert!(splice(&items, 0, 4).is_err());
    }

    #[test]
    fn test_move_onto_pinned_position_is_repinned() {
        let order = default_order();
        let spend_idx = order.iter().position(|c| *c == ColumnId::Spend).unwrap();

        let moved = move_column(&order, spend_idx, 0).unwrap();
        assert_eq!(&moved[..2], &PINNED_COLUMNS);
        assert_eq!(moved[2], ColumnId::Spend);
        assert!(is_valid_order(&moved));
    }

    #[test]
    fn test_moving_pinned_column_keeps_it_pinned() {
        let order = default_order();
        let moved = move_column(&order, 0, 10).unwrap();
        assert_eq!(moved, order);
    }

    #[test]
    fn test_every_move_keeps_invariant() {
        let order = default_order();
        let len = order.len();
        for from in 0..len {
            for to in 0..len {
                let moved = move_column(&order, from, to).unwrap();
                assert!(is_valid_order(&moved), "move {} -> {}", from, to);
            }
        }
    }

    #[test]
    fn test_rebuild_order_keeps_hidden_columns() {
        let previous = default_order();
        let selected = vec![ColumnId::Roi, ColumnId::Name, ColumnId::Preview];
        let rebuilt = rebuild_order(&previous, &selected);

        assert!(is_valid_order(&rebuilt));
        assert_eq!(rebuilt[2], ColumnId::Roi);
        assert_eq!(rebuilt[3], ColumnId::Name);
        // Hidden columns follow in their previous relative order
        assert_eq!(rebuilt[4], ColumnId::RecentConsumption);
    }
}
