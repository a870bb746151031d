use std::path::{Path, PathBuf};

use anyhow::{Context, bail};
use clap::{Parser, Subcommand};
use rift_grid::common::config::{Config, config_file};
use rift_grid::common::log;
use rift_grid::layout_engine::PlacementSelector;
use rift_grid::model::{ItemRequest, OccupantKind, PixelPoint, ScreenCollection, Span};
use serde::Deserialize;
use serde_json::json;
use tracing::{info, warn};

#[derive(Parser)]
#[command(name = "rift-grid")]
#[command(about = "Inspect cell placement on a paged workspace")]
struct Cli {
    /// Config file to use instead of ~/.rift-grid.toml.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Tracing filter, e.g. `rift_grid=debug`. Overrides RUST_LOG.
    #[arg(long, global = true)]
    log_filter: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Validate the config file and report every problem found.
    CheckConfig,
    /// Print the vacant areas of one screen as JSON.
    Vacant {
        /// RON scenario listing the occupants.
        scenario: PathBuf,
        /// Screen to inspect. Defaults to the configured default screen.
        #[arg(long)]
        screen: Option<usize>,
        /// Drop repeated areas.
        #[arg(long)]
        distinct: bool,
    },
    /// Report where an item of the given span would be placed.
    Fit {
        scenario: PathBuf,
        #[arg(long)]
        screen: Option<usize>,
        #[arg(long, default_value_t = 1)]
        span_x: usize,
        #[arg(long, default_value_t = 1)]
        span_y: usize,
        /// Item size in pixels, as `W,H`. Overrides the span.
        #[arg(long, value_parser = parse_point)]
        pixels: Option<PixelPoint>,
        /// Pointer position for the nearest exact fit, as `X,Y` pixels.
        #[arg(long, value_parser = parse_point)]
        at: Option<PixelPoint>,
    },
}

/// Occupants to lay out before answering a query. Positions are read, never
/// written back.
#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct Scenario {
    #[serde(default)]
    size: Option<(i32, i32)>,
    #[serde(default)]
    occupants: Vec<ScenarioOccupant>,
}

#[derive(Deserialize)]
#[serde(deny_unknown_fields)]
struct ScenarioOccupant {
    kind: OccupantKind,
    screen: usize,
    x: usize,
    y: usize,
    #[serde(default = "one")]
    span_x: usize,
    #[serde(default = "one")]
    span_y: usize,
}

fn one() -> usize { 1 }

/// Parses `X,Y` (or `W,H`) pixel pairs.
fn parse_point(s: &str) -> Result<PixelPoint, String> {
    let (x, y) = s.split_once(',').ok_or_else(|| format!("expected X,Y, got {s:?}"))?;
    let parse = |v: &str| v.trim().parse::<i32>().map_err(|e| format!("{v:?}: {e}"));
    Ok(PixelPoint::new(parse(x)?, parse(y)?))
}

fn load_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let path = match path {
        Some(path) => path.to_path_buf(),
        None => {
            let path = config_file()?;
            if !path.exists() {
                info!("no config at {}, using defaults", path.display());
                return Ok(Config::default());
            }
            path
        }
    };
    Config::read(&path)
}

fn load_scenario(path: &Path, config: &Config) -> anyhow::Result<ScreenCollection> {
    let buf = std::fs::read_to_string(path)
        .with_context(|| format!("reading scenario {}", path.display()))?;
    let scenario: Scenario =
        ron::from_str(&buf).with_context(|| format!("parsing scenario {}", path.display()))?;

    let mut screens = ScreenCollection::new(config);
    if let Some((width, height)) = scenario.size {
        screens.measure(width, height);
    }
    for item in scenario.occupants {
        let request = ItemRequest::new(item.kind, Span::new(item.span_x, item.span_y)?)
            .at(item.x, item.y);
        let Some(id) = screens.add_occupant(item.screen, request)? else {
            warn!(kind = %item.kind, screen = item.screen, "no room left, occupant skipped");
            continue;
        };
        if let Some(placed) = screens.occupant(id)
            && (placed.rect().x, placed.rect().y) != (item.x, item.y)
        {
            warn!(
                kind = %item.kind,
                wanted = ?(item.x, item.y),
                placed = ?(placed.rect().x, placed.rect().y),
                "occupant overlaps another one and was moved"
            );
        }
    }
    Ok(screens)
}

fn check_config(path: Option<&Path>) -> anyhow::Result<()> {
    let config = load_config(path)?;
    let issues = config.validate();
    if issues.is_empty() {
        println!("config is valid");
        return Ok(());
    }
    for issue in &issues {
        println!("{issue}");
    }
    bail!("{} problem(s) found", issues.len())
}

fn runtime_config(path: Option<&Path>) -> anyhow::Result<Config> {
    let mut config = load_config(path)?;
    let fixes = config.auto_fix_values();
    if fixes > 0 {
        warn!(fixes, "config had invalid values, using corrected ones");
    }
    Ok(config)
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    log::init_logging(cli.log_filter.as_deref());
    let config_path = cli.config.as_deref();

    let output = match cli.command {
        Commands::CheckConfig => return check_config(config_path),
        Commands::Vacant { scenario, screen, distinct } => {
            let config = runtime_config(config_path)?;
            let mut screens = load_scenario(&scenario, &config)?;
            let screen = screen.unwrap_or(screens.current_index());
            let set = screens.vacant_areas(screen, None)?;
            let areas = if distinct { set.distinct() } else { set.iter().copied().collect() };
            json!({
                "screen": screen,
                "areas": areas,
                "max_span_x": set.max_span_x(),
                "max_span_y": set.max_span_y(),
            })
        }
        Commands::Fit {
            scenario,
            screen,
            span_x,
            span_y,
            pixels,
            at,
        } => {
            let config = runtime_config(config_path)?;
            let mut screens = load_scenario(&scenario, &config)?;
            let screen = screen.unwrap_or(screens.current_index());
            let grid = screens.refresh_occupancy(screen)?.clone();
            let span = match pixels {
                Some(size) => grid.rect_to_span(size.x, size.y),
                None => Span::new(span_x, span_y)?,
            };
            let first_fit = PlacementSelector::first_fit(span, &grid);
            let nearest = match at {
                Some(point) => {
                    let vacant = screens.vacant_areas(screen, None)?;
                    PlacementSelector::nearest_exact_fit(point, span, vacant, &grid)
                }
                None => None,
            };
            json!({
                "screen": screen,
                "span": [span.x(), span.y()],
                "first_fit": first_fit,
                "nearest_exact_fit": nearest,
            })
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}
