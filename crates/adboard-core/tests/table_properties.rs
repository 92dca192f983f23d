//! End-to-end table behavior over generated materials
//!
//! Run with:
//! ```bash
//! cargo test --test table_properties
//! ```

use adboard_core::analytics::window::{recent_roi, recent_spend};
use adboard_core::filter::{self, FilterCriteria, FilterInputs};
use adboard_core::table::{
    page_count, ColumnCustomizer, ColumnId, PageSize, TableViewState, PINNED_COLUMNS,
};
use adboard_core::{AboveAverageFilter, DateRange, Material, MockSource, OverviewMetric, TimeWindow};

const ANCHOR: i64 = 1_700_000_000_000;
const MIN: i64 = 60_000;

fn generated(count: usize) -> adboard_core::DashboardData {
    let range = DateRange::new(ANCHOR - 86_400_000 + 1, ANCHOR).unwrap();
    MockSource::new()
        .with_material_count(count)
        .with_seed(Some(2024))
        .with_anchor(ANCHOR)
        .generate(range)
}

fn ids(materials: &[Material]) -> Vec<&str> {
    materials.iter().map(|m| m.id.as_str()).collect()
}

#[test]
fn test_name_filter_on_thirty_materials() {
    let data = generated(30);
    let window = TimeWindow::default();

    let inputs = FilterInputs {
        name: "广告 5".to_string(),
        ..Default::default()
    };
    let only_five = filter::apply(&data.materials, &FilterCriteria::from_inputs(&inputs), window, ANCHOR);
    assert_eq!(ids(&only_five), vec!["5"]);

    let inputs = FilterInputs {
        name: "广告".to_string(),
        ..Default::default()
    };
    let all = filter::apply(&data.materials, &FilterCriteria::from_inputs(&inputs), window, ANCHOR);
    assert_eq!(all.len(), 30);
}

#[test]
fn test_filter_idempotent_and_order_preserving() {
    let data = generated(30);
    let window = TimeWindow::from_minutes(120);
    let criteria = FilterCriteria {
        min_recent_spend: Some(5000.0),
        min_roi: Some(1.0),
        ..Default::default()
    };

    let once = filter::apply(&data.materials, &criteria, window, ANCHOR);
    let twice = filter::apply(&once, &criteria, window, ANCHOR);
    assert_eq!(once, twice);

    let positions: Vec<usize> = once
        .iter()
        .map(|m| data.materials.iter().position(|x| x.id == m.id).unwrap())
        .collect();
    assert!(positions.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_malformed_threshold_is_inactive() {
    let data = generated(10);
    let inputs = FilterInputs {
        spend: "lots".to_string(),
        roi: "  ".to_string(),
        ..Default::default()
    };
    let criteria = FilterCriteria::from_inputs(&inputs);
    assert!(criteria.is_empty());
    assert_eq!(
        filter::apply(&data.materials, &criteria, TimeWindow::default(), ANCHOR).len(),
        10
    );
}

#[test]
fn test_recent_roi_ignores_out_of_range_samples() {
    let mut data = generated(1);
    let window = TimeWindow::from_minutes(60);
    let before = recent_roi(&data.materials[0], window, ANCHOR);

    // Rebuild the ROI curve with every out-of-window sample changed
    let (start, _) = window.bounds(ANCHOR);
    let changed: adboard_core::Curve = data.materials[0]
        .roi_curve
        .iter()
        .map(|s| {
            if s.timestamp < start {
                (s.timestamp, s.value + 100.0)
            } else {
                (s.timestamp, s.value)
            }
        })
        .collect();
    data.materials[0].roi_curve = changed;

    assert_eq!(recent_roi(&data.materials[0], window, ANCHOR), before);
}

#[test]
fn test_window_zero_and_future_now_yield_no_data() {
    let data = generated(1);
    let m = &data.materials[0];
    assert_eq!(recent_spend(m, TimeWindow::from_minutes(0), ANCHOR), None);
    // Curves end at the anchor; a window entirely after it is empty
    assert_eq!(recent_spend(m, TimeWindow::from_minutes(5), ANCHOR + 30 * MIN), None);
}

#[test]
fn test_pagination_twenty_five_rows() {
    let data = generated(25);
    let mut state = TableViewState::new();
    let criteria = FilterCriteria::default();
    let window = TimeWindow::default();

    assert_eq!(page_count(25, PageSize::default()), 3);

    let snap = state.snapshot(&data.materials, &criteria, window, ANCHOR);
    assert!(snap.pagination.can_next);

    state.next_page(25);
    state.next_page(25);
    let snap = state.snapshot(&data.materials, &criteria, window, ANCHOR);
    assert_eq!(snap.pagination.page_index, 2);
    assert_eq!(snap.rows.len(), 5);
    assert!(!snap.pagination.can_next);

    state.next_page(25);
    assert_eq!(state.page_index(), 2);
}

#[test]
fn test_page_size_change_never_overflows() {
    let data = generated(45);
    let criteria = FilterCriteria::default();
    let window = TimeWindow::default();

    for from in PageSize::OPTIONS {
        for to in PageSize::OPTIONS {
            let mut state = TableViewState::new().with_page_size(from);
            state.last_page(45);
            state.set_page_size(to, 45);
            let snap = state.snapshot(&data.materials, &criteria, window, ANCHOR);
            assert!(snap.pagination.page_index < snap.pagination.page_count);
            assert!(!snap.rows.is_empty());
        }
    }
}

#[test]
fn test_sort_recent_column_descending() {
    let data = generated(30);
    let window = TimeWindow::from_minutes(60);
    let mut state = TableViewState::new().with_page_size(PageSize::new(50).unwrap());
    state.toggle_sort(ColumnId::RecentConsumption);
    state.toggle_sort(ColumnId::RecentConsumption);

    let snap = state.snapshot(&data.materials, &FilterCriteria::default(), window, ANCHOR);
    let values: Vec<f64> = snap
        .rows
        .iter()
        .map(|row| {
            let m = data.materials.iter().find(|m| m.id == row.id).unwrap();
            recent_spend(m, window, ANCHOR).unwrap()
        })
        .collect();
    assert!(values.windows(2).all(|w| w[0] >= w[1]));
}

#[test]
fn test_reorders_preserve_column_set() {
    let mut state = TableViewState::new();
    let len = state.column_order().len();

    for (from, to) in [(0, len - 1), (len - 1, 0), (5, 1), (2, 20), (27, 3)] {
        state.move_column(from, to).unwrap();
        assert_eq!(&state.column_order()[..2], &PINNED_COLUMNS);
        let mut sorted = state.column_order().to_vec();
        sorted.sort();
        assert_eq!(sorted, ColumnId::all().to_vec());
    }

    let selected = ColumnCustomizer::selected(&state).len();
    ColumnCustomizer::move_selected(&mut state, 0, selected - 1).unwrap();
    assert_eq!(&state.column_order()[..2], &PINNED_COLUMNS);
    assert_eq!(state.column_order().len(), len);
}

#[test]
fn test_state_survives_reload() {
    let first = generated(30);
    let mut state = TableViewState::new();
    state.toggle_sort(ColumnId::Spend);
    state.set_visible(ColumnId::Clicks, false).unwrap();
    state.resize_column(ColumnId::Name, 300);
    state.set_page_index(2, 30);

    let criteria = FilterCriteria::default();
    state.snapshot(&first.materials, &criteria, TimeWindow::default(), ANCHOR);

    // Reload with fewer materials: only the page index moves
    let second = generated(12);
    let snap = state.snapshot(&second.materials, &criteria, TimeWindow::default(), ANCHOR);
    assert_eq!(state.page_index(), 1);
    assert!(snap.column_index(ColumnId::Clicks).is_none());
    assert_eq!(state.width(ColumnId::Name), 300);
    assert!(state.sort().is_some());
}

#[test]
fn test_above_average_then_table_filter() {
    let data = generated(30);
    let mut above = AboveAverageFilter::default();
    above.toggle(OverviewMetric::TotalSpend);

    let kept = above.apply(&data.materials, &data.overview);
    let mean = data.overview.mean(OverviewMetric::TotalSpend).unwrap();
    assert!(kept.iter().all(|m| m.channel.total_spend >= mean));
    assert!(kept.len() <= 30);
}
