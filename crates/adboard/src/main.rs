//! adboard - video ad materials dashboard

mod cli;

use adboard_core::analytics::TimeWindow;
use adboard_core::filter::{FilterCriteria, FilterInputs};
use adboard_core::table::{ColumnCustomizer, PageSize};
use adboard_core::{
    DashboardConfig, DashboardData, DashboardStore, DateRange, MockSource, TableViewState,
};
use anyhow::{Context, Result};
use chrono::{NaiveDate, Utc};
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};
use tracing::debug;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "adboard",
    version,
    about = "Video ad materials dashboard",
    long_about = "Browse per-material ad metrics for a day: overview cards, a sortable,\n\
                  filterable, paginated materials table and trailing-window aggregates.\n\
                  \n\
                  Examples:\n\
                    adboard                                   # Interactive dashboard (default)\n\
                    adboard table --sort recentROI:desc       # Best recent ROI first\n\
                    adboard table --name 广告 --min-roi 1.5   # Filter by name and ROI\n\
                    adboard overview --date yesterday --json  # Overview cards as JSON\n\
                    adboard columns --search 追投             # List matching columns\n\
                  \n\
                  Environment Variables:\n\
                    ADBOARD_CONFIG                            # Config file path\n\
                    ADBOARD_SEED                              # Fixed seed for mock data\n\
                    ADBOARD_NO_COLOR                          # Disable ANSI colors\n\
                    ADBOARD_LOG                               # Log filter (default: warn)"
)]
struct Cli {
    #[command(subcommand)]
    mode: Option<Mode>,

    /// Config file (default: <config dir>/adboard/config.toml)
    #[arg(long, global = true, env = "ADBOARD_CONFIG")]
    config: Option<PathBuf>,

    /// Fixed seed for reproducible mock data
    #[arg(long, global = true, env = "ADBOARD_SEED")]
    seed: Option<u64>,

    /// Disable ANSI colors
    #[arg(long, global = true, env = "ADBOARD_NO_COLOR")]
    no_color: bool,
}

#[derive(Args)]
struct ViewArgs {
    /// Day to show: today, yesterday or YYYY-MM-DD
    #[arg(long, short = 'd', default_value = "today")]
    date: String,

    /// Trailing window in minutes (default from config)
    #[arg(long, short = 'w')]
    window: Option<u32>,
}

#[derive(Subcommand)]
enum Mode {
    /// Run the interactive dashboard (default)
    Tui,
    /// Print one page of the materials table
    Table {
        #[command(flatten)]
        view: ViewArgs,
        /// Material name contains (case-sensitive)
        #[arg(long)]
        name: Option<String>,
        /// Minimum overall spend
        #[arg(long)]
        min_spend: Option<String>,
        /// Minimum overall ROI
        #[arg(long)]
        min_roi: Option<String>,
        /// Minimum spend within the window
        #[arg(long)]
        min_recent_spend: Option<String>,
        /// Minimum ROI within the window
        #[arg(long)]
        min_recent_roi: Option<String>,
        /// Sort column with optional direction: column[:asc|desc]
        #[arg(long, short = 's')]
        sort: Option<String>,
        /// Page number (1-based)
        #[arg(long, short = 'p', default_value = "1")]
        page: usize,
        /// Rows per page: 10, 20, 30, 40 or 50 (default from config)
        #[arg(long)]
        page_size: Option<usize>,
        /// Comma-separated column ids to hide
        #[arg(long)]
        hide: Option<String>,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// Print the overview cards
    Overview {
        #[command(flatten)]
        view: ViewArgs,
        /// Output as JSON
        #[arg(long)]
        json: bool,
    },
    /// List customizable columns
    Columns {
        /// Filter by label (case-insensitive)
        #[arg(long)]
        search: Option<String>,
        /// Window used in the recent-column labels
        #[arg(long, short = 'w')]
        window: Option<u32>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let is_tui = matches!(cli.mode, None | Some(Mode::Tui));
    init_logging(is_tui)?;

    let mut config = match &cli.config {
        Some(path) => DashboardConfig::load(path),
        None => DashboardConfig::load_default(),
    }
    .context("Failed to load config")?;
    if cli.seed.is_some() {
        config.seed = cli.seed;
    }
    debug!(?config, "Config loaded");

    let no_color = cli.no_color;
    match cli.mode.unwrap_or(Mode::Tui) {
        Mode::Tui => run_tui(&config, no_color).await?,
        Mode::Table {
            view,
            name,
            min_spend,
            min_roi,
            min_recent_spend,
            min_recent_roi,
            sort,
            page,
            page_size,
            hide,
            json,
        } => {
            let inputs = FilterInputs {
                name: name.unwrap_or_default(),
                spend: min_spend.unwrap_or_default(),
                roi: min_roi.unwrap_or_default(),
                recent_spend: min_recent_spend.unwrap_or_default(),
                recent_roi: min_recent_roi.unwrap_or_default(),
            };
            let options = TableOptions {
                criteria: FilterCriteria::from_inputs(&inputs),
                sort,
                page,
                page_size,
                hide,
            };
            run_table(&config, view, options, json, no_color).await?;
        }
        Mode::Overview { view, json } => run_overview(&config, view, json, no_color).await?,
        Mode::Columns { search, window } => run_columns(&config, search, window, no_color)?,
    }

    Ok(())
}

/// Logs go to stderr, or to `<cache dir>/adboard/adboard.log` while the
/// TUI owns the terminal
fn init_logging(tui: bool) -> Result<()> {
    let filter = EnvFilter::try_from_env("ADBOARD_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    let builder = tracing_subscriber::fmt().with_env_filter(filter);

    if tui {
        let dir = dirs::cache_dir()
            .unwrap_or_else(std::env::temp_dir)
            .join("adboard");
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("Failed to create log dir {}", dir.display()))?;
        let file = std::fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(dir.join("adboard.log"))
            .context("Failed to open log file")?;
        builder.with_ansi(false).with_writer(Mutex::new(file)).init();
    } else {
        builder.with_writer(std::io::stderr).init();
    }
    Ok(())
}

fn mock_source(config: &DashboardConfig) -> MockSource {
    MockSource::new()
        .with_material_count(config.material_count)
        .with_latency(config.fetch_latency())
        .with_seed(config.seed)
}

fn resolve_window(minutes: Option<u32>, config: &DashboardConfig) -> Result<TimeWindow> {
    match minutes {
        Some(minutes) => Ok(TimeWindow::new(minutes)?),
        None => Ok(config.window()),
    }
}

async fn run_tui(config: &DashboardConfig, no_color: bool) -> Result<()> {
    let store = Arc::new(DashboardStore::new());
    let source = Arc::new(mock_source(config));
    let palette = adboard_tui::theme::Palette::new(no_color);

    adboard_tui::run(store, source, config, palette).await
}

/// Fetch one day with a progress spinner; returns the data and the clock
/// to evaluate windows at
async fn fetch_day(config: &DashboardConfig, date: NaiveDate) -> Result<(Arc<DashboardData>, i64)> {
    use indicatif::{ProgressBar, ProgressStyle};

    let start = Instant::now();
    let spinner = ProgressBar::new_spinner();
    spinner.set_style(
        ProgressStyle::default_spinner()
            .template("{spinner:.cyan} {msg}")?
            .tick_chars("⠋⠙⠹⠸⠼⠴⠦⠧⠇⠏ "),
    );
    spinner.enable_steady_tick(Duration::from_millis(80));
    spinner.set_message(format!("Loading {}...", date));

    let store = DashboardStore::new();
    let range = DateRange::for_day(date);
    let result = store.load(&mock_source(config), range).await;
    spinner.finish_and_clear();
    result.context("Failed to load dashboard data")?;

    let data = store.data().context("No data after load")?;
    eprintln!(
        "✓ {} materials in {:.2}s",
        data.materials.len(),
        start.elapsed().as_secs_f64()
    );
    let now_ms = Utc::now().timestamp_millis().min(range.end_ms);
    Ok((data, now_ms))
}

struct TableOptions {
    criteria: FilterCriteria,
    sort: Option<String>,
    page: usize,
    page_size: Option<usize>,
    hide: Option<String>,
}

async fn run_table(
    config: &DashboardConfig,
    view: ViewArgs,
    options: TableOptions,
    json: bool,
    no_color: bool,
) -> Result<()> {
    let date = cli::parse_date(&view.date)?;
    let window = resolve_window(view.window, config)?;
    let page_size = match options.page_size {
        Some(size) => PageSize::new(size)?,
        None => config.page_size(),
    };

    let mut state = TableViewState::new().with_page_size(page_size);
    if let Some(sort) = &options.sort {
        state.set_sort(Some(cli::parse_sort(sort)?));
    }
    if let Some(hide) = &options.hide {
        for column in cli::parse_columns(hide)? {
            state
                .set_visible(column, false)
                .with_context(|| format!("Cannot hide column '{}'", column))?;
        }
    }

    let (data, now_ms) = fetch_day(config, date).await?;
    state.jump_to_page(options.page.saturating_sub(1));

    let snapshot = state.snapshot(&data.materials, &options.criteria, window, now_ms);
    println!("{}", cli::format_material_table(&snapshot, json, no_color));
    Ok(())
}

async fn run_overview(
    config: &DashboardConfig,
    view: ViewArgs,
    json: bool,
    no_color: bool,
) -> Result<()> {
    let date = cli::parse_date(&view.date)?;
    let window = resolve_window(view.window, config)?;
    let (data, now_ms) = fetch_day(config, date).await?;

    let cards = data.overview.cards(&Default::default(), window, now_ms);
    println!("{}", cli::format_overview(&cards, json, no_color));
    Ok(())
}

fn run_columns(
    config: &DashboardConfig,
    search: Option<String>,
    window: Option<u32>,
    no_color: bool,
) -> Result<()> {
    let window = resolve_window(window, config)?;
    let mut customizer = ColumnCustomizer::new();
    if let Some(search) = search {
        customizer.set_search(search);
    }
    let entries = customizer.entries(&TableViewState::new(), window);
    if entries.is_empty() {
        println!("No matching columns.");
        return Ok(());
    }
    println!("{}", cli::format_columns(&entries, no_color));
    Ok(())
}
