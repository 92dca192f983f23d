//! TUI application state and key handling

use crate::actions;
use crate::components::{Spinner, Toast, ToastManager};
use crate::theme::{Palette, StatusColor};
use adboard_core::analytics::{AboveAverageFilter, FieldSelection, OverviewMetric, TimeWindow};
use adboard_core::filter::{FilterCriteria, FilterInputs};
use adboard_core::preview::{HoverDebouncer, PreviewIntent, PreviewState};
use adboard_core::table::{ColumnCustomizer, ColumnId, CustomizerEntry, TableSnapshot, TableViewState};
use adboard_core::{DashboardConfig, DashboardStore, DataEvent, DateRange, Material};
use chrono::{Days, Local, NaiveDate};
use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use std::sync::Arc;
use tokio::sync::{broadcast, mpsc};
use tracing::debug;

/// Pixels added or removed per resize keypress
pub const RESIZE_STEP: i32 = 10;

/// Which panel receives key input
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Focus {
    #[default]
    Table,
    Filters,
    Customizer,
    Fields,
    Help,
}

/// Advanced filter input fields, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FilterField {
    #[default]
    Name,
    Spend,
    Roi,
    RecentSpend,
    RecentRoi,
}

impl FilterField {
    pub fn all() -> &'static [FilterField] {
        &[
            FilterField::Name,
            FilterField::Spend,
            FilterField::Roi,
            FilterField::RecentSpend,
            FilterField::RecentRoi,
        ]
    }

    pub fn label(&self, window: TimeWindow) -> String {
        match self {
            FilterField::Name => "素材名称".to_string(),
            FilterField::Spend => "最小整体消耗".to_string(),
            FilterField::Roi => "最小整体ROI".to_string(),
            FilterField::RecentSpend => format!("最小近{}分钟消耗", window.minutes()),
            FilterField::RecentRoi => format!("最小近{}分钟ROI", window.minutes()),
        }
    }

    fn index(&self) -> usize {
        Self::all().iter().position(|f| f == self).unwrap_or(0)
    }

    pub fn next(&self) -> Self {
        Self::all()[(self.index() + 1) % Self::all().len()]
    }

    pub fn prev(&self) -> Self {
        let len = Self::all().len();
        Self::all()[(self.index() + len - 1) % len]
    }

    fn input<'a>(&self, inputs: &'a mut FilterInputs) -> &'a mut String {
        match self {
            FilterField::Name => &mut inputs.name,
            FilterField::Spend => &mut inputs.spend,
            FilterField::Roi => &mut inputs.roi,
            FilterField::RecentSpend => &mut inputs.recent_spend,
            FilterField::RecentRoi => &mut inputs.recent_roi,
        }
    }

    pub fn value<'a>(&self, inputs: &'a FilterInputs) -> &'a str {
        match self {
            FilterField::Name => &inputs.name,
            FilterField::Spend => &inputs.spend,
            FilterField::Roi => &inputs.roi,
            FilterField::RecentSpend => &inputs.recent_spend,
            FilterField::RecentRoi => &inputs.recent_roi,
        }
    }
}

/// TUI application state
pub struct App {
    pub store: Arc<DashboardStore>,
    pub event_rx: broadcast::Receiver<DataEvent>,
    pub should_quit: bool,
    pub focus: Focus,

    /// Selected day and look-back window; changing either reloads
    pub date: NaiveDate,
    pub window: TimeWindow,

    pub table: TableViewState,
    pub inputs: FilterInputs,
    pub criteria: FilterCriteria,
    pub filter_field: FilterField,

    pub customizer: ColumnCustomizer,
    pub customizer_cursor: usize,

    pub fields: FieldSelection,
    pub fields_cursor: usize,
    pub above_average: AboveAverageFilter,

    /// Cursor within the current page and within visible columns
    pub selected_row: usize,
    pub selected_column: usize,

    pub preview: PreviewState,
    debouncer: HoverDebouncer,
    preview_rx: mpsc::UnboundedReceiver<PreviewIntent>,
    hover_target: Option<String>,

    pub toasts: ToastManager,
    pub spinner: Spinner,
    pub palette: Palette,
    load_request: Option<DateRange>,
}

impl App {
    pub fn new(store: Arc<DashboardStore>, config: &DashboardConfig) -> Self {
        let event_rx = store.event_bus().subscribe();
        let (debouncer, preview_rx) = HoverDebouncer::with_default_delay();

        Self {
            store,
            event_rx,
            should_quit: false,
            focus: Focus::Table,
            date: Local::now().date_naive(),
            window: config.window(),
            table: TableViewState::new().with_page_size(config.page_size()),
            inputs: FilterInputs::default(),
            criteria: FilterCriteria::default(),
            filter_field: FilterField::Name,
            customizer: ColumnCustomizer::new(),
            customizer_cursor: 0,
            fields: FieldSelection::default(),
            fields_cursor: 0,
            above_average: AboveAverageFilter::default(),
            selected_row: 0,
            selected_column: 0,
            preview: PreviewState::default(),
            debouncer,
            preview_rx,
            hover_target: None,
            toasts: ToastManager::new(),
            spinner: Spinner::new(),
            palette: Palette::default(),
            load_request: None,
        }
    }

    pub fn with_palette(mut self, palette: Palette) -> Self {
        self.spinner = Spinner::new().with_color(palette.color(StatusColor::Focus));
        self.palette = palette;
        self
    }

    // ===================
    // Loading
    // ===================

    /// Queue a fetch of the selected day; the run loop spawns it
    pub fn request_load(&mut self) {
        self.load_request = Some(DateRange::for_day(self.date));
    }

    pub fn take_load_request(&mut self) -> Option<DateRange> {
        self.load_request.take()
    }

    pub fn is_loading(&self) -> bool {
        self.store.load_state().is_loading()
    }

    /// Drain data events (non-blocking)
    pub fn poll_events(&mut self) {
        loop {
            match self.event_rx.try_recv() {
                Ok(DataEvent::LoadCompleted { materials, .. }) => {
                    self.toasts
                        .push(Toast::success(format!("已加载 {} 个素材", materials)));
                }
                Ok(DataEvent::LoadFailed { message, .. }) => {
                    self.toasts.push(Toast::error(message));
                }
                Ok(event) => debug!(?event, "Data event"),
                Err(broadcast::error::TryRecvError::Lagged(skipped)) => {
                    debug!(skipped, "Event receiver lagged");
                }
                Err(_) => break,
            }
        }
    }

    /// Apply settled hover intents (non-blocking)
    pub fn poll_preview(&mut self) {
        while let Ok(intent) = self.preview_rx.try_recv() {
            self.preview.apply(intent);
        }
    }

    pub fn tick(&mut self) {
        if self.is_loading() {
            self.spinner.tick();
        }
        self.toasts.clear_expired();
    }

    // ===================
    // Derived view
    // ===================

    /// Clock used for windowed values: the wall clock, capped at the end
    /// of the day the shown data belongs to, so past days show their
    /// closing window even while another day is loading or after it failed
    pub fn view_now(&self, clock_ms: i64) -> i64 {
        match self.store.applied_range() {
            Some(range) => clock_ms.min(range.end_ms),
            None => clock_ms,
        }
    }

    /// Materials after the above-average overview filter
    pub fn visible_materials(&self) -> Vec<Material> {
        match self.store.data() {
            Some(data) => self.above_average.apply(&data.materials, &data.overview),
            None => Vec::new(),
        }
    }

    /// Current table page; also re-clamps the row and column cursors
    pub fn snapshot(&mut self, now_ms: i64) -> TableSnapshot {
        let materials = self.visible_materials();
        let snapshot = self
            .table
            .snapshot(&materials, &self.criteria, self.window, now_ms);

        self.selected_row = self.selected_row.min(snapshot.rows.len().saturating_sub(1));
        self.selected_column = self
            .selected_column
            .min(snapshot.columns.len().saturating_sub(1));
        snapshot
    }

    pub fn selected_column_id(&self, snapshot: &TableSnapshot) -> Option<ColumnId> {
        snapshot.columns.get(self.selected_column).map(|c| c.id)
    }

    pub fn customizer_entries(&self) -> Vec<CustomizerEntry> {
        self.customizer.entries(&self.table, self.window)
    }

    /// Overview metrics whose cards are shown
    pub fn selected_cards(&self) -> Vec<OverviewMetric> {
        OverviewMetric::all()
            .iter()
            .copied()
            .filter(|m| self.fields.is_selected(*m))
            .collect()
    }

    // ===================
    // Input
    // ===================

    /// Handle one key press; `now_ms` is the render clock
    pub fn handle_key(&mut self, key: KeyEvent, now_ms: i64) {
        match self.focus {
            Focus::Table => self.handle_table_key(key, now_ms),
            Focus::Filters => self.handle_filter_key(key),
            Focus::Customizer => self.handle_customizer_key(key),
            Focus::Fields => self.handle_fields_key(key),
            Focus::Help => self.focus = Focus::Table,
        }
    }

    fn handle_table_key(&mut self, key: KeyEvent, now_ms: i64) {
        let snapshot = self.snapshot(now_ms);
        let total_rows = snapshot.pagination.total_rows;
        let column = self.selected_column_id(&snapshot);

        match key.code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => {
                self.hover_target = None;
                self.debouncer.cancel();
                self.preview.apply(PreviewIntent::Hide);
            }
            KeyCode::Char('?') => self.focus = Focus::Help,
            KeyCode::Char('/') => self.focus = Focus::Filters,
            KeyCode::Char('c') => {
                self.customizer_cursor = 0;
                self.focus = Focus::Customizer;
            }
            KeyCode::Char('f') => self.focus = Focus::Fields,

            KeyCode::Down | KeyCode::Char('j') => {
                if self.selected_row + 1 < snapshot.rows.len() {
                    self.selected_row += 1;
                }
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.selected_row = self.selected_row.saturating_sub(1);
            }
            KeyCode::Right | KeyCode::Char('l') => {
                if self.selected_column + 1 < snapshot.columns.len() {
                    self.selected_column += 1;
                }
            }
            KeyCode::Left | KeyCode::Char('h') => {
                self.selected_column = self.selected_column.saturating_sub(1);
            }

            KeyCode::Enter | KeyCode::Char('s') => {
                if let Some(column) = column {
                    if !self.table.toggle_sort(column) {
                        self.toasts.push(Toast::info("该列不可排序"));
                    }
                }
            }

            KeyCode::Char('n') | KeyCode::PageDown => {
                self.table.next_page(total_rows);
                self.selected_row = 0;
            }
            KeyCode::Char('p') | KeyCode::PageUp => {
                self.table.previous_page();
                self.selected_row = 0;
            }
            KeyCode::Char('g') | KeyCode::Home => self.table.first_page(),
            KeyCode::Char('G') | KeyCode::End => self.table.last_page(total_rows),
            KeyCode::Char('z') => {
                let next = self.table.page_size().next_option();
                self.table.set_page_size(next, total_rows);
            }

            KeyCode::Char('+') | KeyCode::Char('=') => {
                if let Some(column) = column {
                    self.table.resize_by(column, RESIZE_STEP);
                }
            }
            KeyCode::Char('-') => {
                if let Some(column) = column {
                    self.table.resize_by(column, -RESIZE_STEP);
                }
            }
            KeyCode::Char('<') | KeyCode::Char('>') => {
                if let Some(column) = column {
                    let delta = if key.code == KeyCode::Char('<') { -1 } else { 1 };
                    match self.table.shift_visible(column, delta) {
                        Ok(()) => {
                            let moved = self.table.visible_columns();
                            if let Some(pos) = moved.iter().position(|c| *c == column) {
                                self.selected_column = pos;
                            }
                        }
                        Err(e) => self.toasts.push(Toast::warning(e.user_message())),
                    }
                }
            }
            KeyCode::Char('x') => {
                if let Some(column) = column {
                    if let Err(e) = self.table.set_visible(column, false) {
                        self.toasts.push(Toast::warning(e.user_message()));
                    }
                }
            }

            KeyCode::Char('w') => {
                self.window = self.window.next_preset();
                self.request_load();
            }
            KeyCode::Char('[') => self.shift_date(-1),
            KeyCode::Char(']') => self.shift_date(1),
            KeyCode::Char('r') | KeyCode::F(5) => self.request_load(),
            KeyCode::Char('R') => {
                self.inputs = FilterInputs::default();
                self.criteria = FilterCriteria::default();
                self.above_average = AboveAverageFilter::default();
            }

            KeyCode::Char('y') => {
                if let Some(row) = snapshot.rows.get(self.selected_row) {
                    match actions::copy_to_clipboard(&row.id) {
                        Ok(()) => self.toasts.push(Toast::success(format!("已复制素材ID {}", row.id))),
                        Err(e) => self.toasts.push(Toast::error(e.to_string())),
                    }
                }
            }
            KeyCode::Char('o') => {
                if let Some(row) = snapshot.rows.get(self.selected_row) {
                    if let Err(e) = actions::open_url(&row.video_url) {
                        self.toasts.push(Toast::error(e.to_string()));
                    }
                }
            }
            _ => {}
        }

        let snapshot = self.snapshot(now_ms);
        self.update_hover(&snapshot);
    }

    /// Schedule a debounced preview when the cursor rests on a preview cell
    fn update_hover(&mut self, snapshot: &TableSnapshot) {
        let on_preview = self.selected_column_id(snapshot) == Some(ColumnId::Preview);
        let target = snapshot
            .rows
            .get(self.selected_row)
            .filter(|_| on_preview)
            .map(|row| row.id.clone());

        if target == self.hover_target {
            return;
        }
        match &target {
            Some(id) => self.debouncer.enter(id.clone()),
            None => self.debouncer.leave(),
        }
        self.hover_target = target;
    }

    fn shift_date(&mut self, days: i64) {
        let today = Local::now().date_naive();
        let shifted = if days < 0 {
            self.date.checked_sub_days(Days::new(days.unsigned_abs()))
        } else {
            self.date.checked_add_days(Days::new(days as u64))
        };
        if let Some(date) = shifted.filter(|d| *d <= today) {
            self.date = date;
            self.request_load();
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.focus = Focus::Table,
            KeyCode::Tab | KeyCode::Down => self.filter_field = self.filter_field.next(),
            KeyCode::BackTab | KeyCode::Up => self.filter_field = self.filter_field.prev(),
            KeyCode::Backspace => {
                self.filter_field.input(&mut self.inputs).pop();
            }
            KeyCode::Delete => self.filter_field.input(&mut self.inputs).clear(),
            KeyCode::Char(c) => self.filter_field.input(&mut self.inputs).push(c),
            _ => return,
        }
        self.criteria = FilterCriteria::from_inputs(&self.inputs);
    }

    fn handle_customizer_key(&mut self, key: KeyEvent) {
        let entries = self.customizer_entries();
        let current = entries.get(self.customizer_cursor).map(|e| e.column);

        match key.code {
            KeyCode::Esc | KeyCode::Enter => self.focus = Focus::Table,
            KeyCode::Up if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.move_customizer_entry(current, -1)
            }
            KeyCode::Down if key.modifiers.contains(KeyModifiers::SHIFT) => {
                self.move_customizer_entry(current, 1)
            }
            KeyCode::Up => self.customizer_cursor = self.customizer_cursor.saturating_sub(1),
            KeyCode::Down => {
                if self.customizer_cursor + 1 < entries.len() {
                    self.customizer_cursor += 1;
                }
            }
            KeyCode::Char(' ') => {
                if let Some(entry) = entries.get(self.customizer_cursor) {
                    let _ = ColumnCustomizer::set_visible(&mut self.table, entry.column, !entry.visible);
                }
            }
            KeyCode::Delete => {
                if let Some(column) = current {
                    let _ = ColumnCustomizer::remove(&mut self.table, column);
                }
            }
            KeyCode::Char('r') if key.modifiers.contains(KeyModifiers::CONTROL) => {
                ColumnCustomizer::reset(&mut self.table);
            }
            KeyCode::Backspace => {
                self.customizer.pop_search();
                self.customizer_cursor = 0;
            }
            KeyCode::Char(c) => {
                self.customizer.push_search(c);
                self.customizer_cursor = 0;
            }
            _ => {}
        }
    }

    /// Move the entry under the cursor within the selected list
    fn move_customizer_entry(&mut self, column: Option<ColumnId>, delta: isize) {
        let Some(column) = column else { return };
        let selected = ColumnCustomizer::selected(&self.table);
        let Some(from) = selected.iter().position(|c| *c == column) else {
            self.toasts.push(Toast::info("仅可移动已选择的指标"));
            return;
        };
        let to = (from as isize + delta).clamp(0, selected.len() as isize - 1) as usize;
        if from == to {
            return;
        }
        if ColumnCustomizer::move_selected(&mut self.table, from, to).is_ok() {
            if let Some(pos) = self
                .customizer_entries()
                .iter()
                .position(|e| e.column == column)
            {
                self.customizer_cursor = pos;
            }
        }
    }

    fn handle_fields_key(&mut self, key: KeyEvent) {
        let metrics = OverviewMetric::all();
        let current = metrics.get(self.fields_cursor).copied();

        match key.code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('f') => self.focus = Focus::Table,
            KeyCode::Up | KeyCode::Char('k') => {
                self.fields_cursor = self.fields_cursor.saturating_sub(1)
            }
            KeyCode::Down | KeyCode::Char('j') => {
                if self.fields_cursor + 1 < metrics.len() {
                    self.fields_cursor += 1;
                }
            }
            KeyCode::Char(' ') => {
                if let Some(metric) = current {
                    let selected = self.fields.is_selected(metric);
                    self.fields.set(metric, !selected);
                }
            }
            KeyCode::Char('a') => {
                if let Some(metric) = current {
                    let active = self.above_average.toggle(metric);
                    debug!(metric = metric.id(), active, "Above-average filter toggled");
                }
            }
            _ => {}
        }
    }
}
