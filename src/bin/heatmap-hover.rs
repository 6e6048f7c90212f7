use std::io;
use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};
use color_eyre::Result;
use color_eyre::eyre::eyre;
use crossterm::event::{self, Event as CEvent};
use crossterm::execute;
use crossterm::terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode};
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use tracing::{error, info};

use heatmap_hover::config::Config;
use heatmap_hover::core::{BucketLayout, BucketMetadata, BucketTable};
use heatmap_hover::hover::{
    CellValuesLookup, FrameCellLookup, HeatmapData, NoRawRecords, heatmap_tab, layer_to_json,
};
use heatmap_hover::loader::read_frame;
use heatmap_hover::render::{render_histogram, save_png};
use heatmap_hover::tui::App;

/// Resolve the heatmap bucket under a hover index and show its details
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Bucket table with xMin, yMin and count columns (csv or parquet)
    #[arg(long = "table", value_name = "PATH")]
    table: PathBuf,
    /// Raw records behind the buckets, shown for the hovered cell
    #[arg(long = "raw", value_name = "PATH")]
    raw: Option<PathBuf>,
    /// Field of the raw records matched against the bucket x range
    #[arg(long = "x-field", default_value = "time")]
    x_field: String,
    /// Field of the raw records matched against the bucket y range
    #[arg(long = "y-field", default_value = "value")]
    y_field: String,
    /// Flat index of the hovered bucket
    #[arg(long = "index", default_value_t = 0)]
    index: usize,
    /// Title of the hover entry
    #[arg(long = "name")]
    name: Option<String>,
    #[arg(long = "x-bucket-size")]
    x_bucket_size: Option<f64>,
    #[arg(long = "y-bucket-size")]
    y_bucket_size: Option<f64>,
    #[arg(long = "y-bucket-count")]
    y_bucket_count: Option<usize>,
    /// Whether yMin is the lower bound (minimum, ge) or the upper one (lessThanOrEqual, le)
    #[arg(long = "y-layout")]
    y_layout: Option<BucketLayout>,
    /// Write the histogram of the hovered column to this PNG
    #[arg(long = "png", value_name = "PATH")]
    png: Option<PathBuf>,
    /// Browse the heatmap in the terminal
    #[arg(long = "interactive", short = 'i')]
    interactive: bool,
    /// Enable file logging at the given level (overrides RUST_LOG)
    #[arg(long = "logging", value_enum)]
    logging: Option<LogLevel>,
    /// Path to a config file (overrides default config discovery)
    #[arg(long = "config", value_name = "PATH")]
    config: Option<PathBuf>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum LogLevel { Error, Warn, Info, Debug, Trace }

impl From<LogLevel> for tracing::Level {
    fn from(level: LogLevel) -> Self {
        match level {
            LogLevel::Error => tracing::Level::ERROR,
            LogLevel::Warn => tracing::Level::WARN,
            LogLevel::Info => tracing::Level::INFO,
            LogLevel::Debug => tracing::Level::DEBUG,
            LogLevel::Trace => tracing::Level::TRACE,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    color_eyre::install()?;
    heatmap_hover::logging::init_with(None, args.logging.map(Into::into))?;

    let config = Config::from_path(args.config.as_ref())
        .map_err(|e| eyre!("Failed to load config: {e}"))?;
    let options = config.hover_options()?;

    let frame = read_frame(&args.table)?;
    let metadata = BucketMetadata {
        x_bucket_size: args.x_bucket_size,
        y_bucket_size: args.y_bucket_size,
        y_bucket_count: args.y_bucket_count,
        y_layout: args.y_layout,
    };
    let table = BucketTable::from_frame(&frame, &metadata);
    let layout = table.as_ref().map(|t| t.y_layout).unwrap_or_default();

    let lookup: Box<dyn CellValuesLookup> = match &args.raw {
        Some(path) => Box::new(
            FrameCellLookup::new(read_frame(path)?, &args.x_field, &args.y_field, layout)
                .with_max_rows(config.hover.raw_preview_rows),
        ),
        None => Box::new(NoRawRecords),
    };

    if args.interactive {
        let table = table.map_err(|e| eyre!("Cannot browse {}: {e}", args.table.display()))?;
        return run_interactive(table, args, lookup, config);
    }

    if let Some(png) = &args.png {
        let table = table.as_ref().map_err(|e| eyre!("Cannot draw histogram: {e}"))?;
        let style = &options.histogram;
        let image = render_histogram(table, args.index, style.width, style.height, &style.palette);
        save_png(&image, png)?;
        info!(path = %png.display(), "histogram written");
    }

    let data = HeatmapData {
        heatmap: Some(frame),
        metadata,
        display_name: args.name.clone(),
    };
    let layers = heatmap_tab(&data, args.index, lookup.as_ref(), &options);
    let json: Vec<_> = layers
        .iter()
        .map(|layer| layer_to_json(layer, config.hover.raw_preview_rows))
        .collect();
    println!("{}", serde_json::to_string_pretty(&json)?);
    Ok(())
}

fn run_interactive(
    table: BucketTable,
    args: Args,
    lookup: Box<dyn CellValuesLookup>,
    config: Config,
) -> Result<()> {
    let mut app = App::new(table, args.name, lookup, config, args.png)?;
    app.set_index(args.index);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let res = run_app(&mut terminal, &mut app);

    disable_raw_mode()?;
    execute!(io::stdout(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;
    if let Err(e) = &res {
        error!("Error: {e}");
    }
    res
}

fn run_app<B: ratatui::backend::Backend>(terminal: &mut Terminal<B>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| app.render(f))?;

        if event::poll(Duration::from_millis(100))? {
            if let CEvent::Key(key_event) = event::read()? {
                app.handle_key_event(key_event)?;
            }
        }
        if app.should_quit() {
            return Ok(());
        }
    }
}
