//! Stakecap command-line tool.
//!
//! Evaluates saturation caps, reward normalization and pool ROI from an
//! exported pool dataset. Every command prints JSON on stdout; logs go to
//! stderr.

mod settings;

use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use serde::Serialize;
use serde_json::json;
use tracing::{debug, info, warn};

use stakecap_core::constants::SupplyConstants;
use stakecap_core::dataset::PoolDataset;
use stakecap_core::types::{
    ExtraPoolInput, RewardScaling, RewardsMode, SaturationMode, ZoomLevel,
};
use stakecap_engine::{rank_pools, RoiEngine, SaturationModel};

use crate::settings::CliConfig;

/// Stake-pool saturation and reward modelling.
#[derive(Parser, Debug)]
#[command(name = "stakecap", version, about = "Stake-pool saturation and ROI calculator")]
struct Cli {
    /// Config file (default: <config_dir>/stakecap/config.toml, if present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    log_level: Option<String>,

    /// Log output format ("text" or "json")
    #[arg(long, global = true)]
    log_format: Option<String>,

    /// Saturation model (current, linear, exponential, cip-50, cip-7)
    #[arg(long, global = true)]
    saturation: Option<SaturationMode>,

    /// Rewards regime (current, full, max)
    #[arg(long, global = true)]
    rewards: Option<RewardsMode>,

    /// Viewport preset (off, zoom, superZoom)
    #[arg(long, global = true)]
    zoom: Option<ZoomLevel>,

    #[command(flatten)]
    params: ParamArgs,

    #[command(subcommand)]
    command: Commands,
}

/// Per-invocation parameter overrides.
#[derive(Args, Debug, Default)]
struct ParamArgs {
    /// Target number of saturated pools
    #[arg(long, global = true)]
    k: Option<f64>,

    /// Pledge influence
    #[arg(long, global = true)]
    a0: Option<f64>,

    /// Pledge slope (linear, exponential, cip-50)
    #[arg(long = "l", global = true)]
    l: Option<f64>,

    /// Exponential knee, percent of the viewport range
    #[arg(long = "l2", global = true)]
    l2: Option<f64>,

    /// CIP-7 crossover factor
    #[arg(long, global = true)]
    crossover: Option<f64>,

    /// CIP-7 curve root
    #[arg(long, global = true)]
    curve_root: Option<f64>,

    /// Monetary expansion per epoch
    #[arg(long, global = true)]
    rho: Option<f64>,

    /// Treasury cut
    #[arg(long, global = true)]
    tau: Option<f64>,

    /// Fraction of circulating supply assumed staked
    #[arg(long, global = true)]
    staked_ratio: Option<f64>,

    /// Viewport upper bound on the pledge axis
    #[arg(long, global = true)]
    max_x: Option<f64>,

    /// Viewport step on the pledge axis
    #[arg(long, global = true)]
    step_size_x: Option<f64>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Saturation cap for a pledge.
    Cap(CapArgs),
    /// Sampled saturation curve over the viewport.
    Curve(CurveArgs),
    /// Reward and stake scaling for a pool universe.
    Scale(ScaleArgs),
    /// Annualized ROI for a single pool.
    Roi(RoiArgs),
    /// ROI of every pool in a dataset, best first.
    Rank(RankArgs),
    /// Pool count, stake and pledge per operator group.
    Summary(PoolsArgs),
    /// Write the dataset's stake distribution as CSV.
    ExportStakes(ExportArgs),
}

#[derive(Args, Debug)]
struct CapArgs {
    /// Pledge in ADA.
    #[arg(long)]
    pledge: f64,

    /// Report every saturation model instead of the selected one.
    #[arg(long)]
    all_modes: bool,
}

#[derive(Args, Debug)]
struct CurveArgs {
    /// Print only the sample points.
    #[arg(long)]
    points_only: bool,
}

#[derive(Args, Debug)]
struct PoolsArgs {
    /// Pool dataset (JSON array of pool records).
    #[arg(long)]
    pools: Option<PathBuf>,
}

#[derive(Args, Debug)]
struct ScaleArgs {
    #[command(flatten)]
    pools: PoolsArgs,

    /// Stake of a hypothetical pool added to the universe.
    #[arg(long, requires = "custom_pledge")]
    custom_stake: Option<f64>,

    /// Pledge of the hypothetical pool.
    #[arg(long, requires = "custom_stake")]
    custom_pledge: Option<f64>,
}

#[derive(Args, Debug)]
struct RoiArgs {
    /// Pool stake in ADA.
    #[arg(long, default_value_t = ExtraPoolInput::CUSTOM_DEFAULT.stake)]
    stake: f64,

    /// Pool pledge in ADA.
    #[arg(long, default_value_t = ExtraPoolInput::CUSTOM_DEFAULT.pledge)]
    pledge: f64,

    #[command(flatten)]
    pools: PoolsArgs,
}

#[derive(Args, Debug)]
struct RankArgs {
    #[command(flatten)]
    pools: PoolsArgs,

    /// Only print the best N pools.
    #[arg(long)]
    top: Option<usize>,
}

#[derive(Args, Debug)]
struct ExportArgs {
    #[command(flatten)]
    pools: PoolsArgs,

    /// Output directory.
    #[arg(long, default_value = ".")]
    out: PathBuf,
}

impl Cli {
    /// Merge flags over the file and environment layers.
    fn apply_overrides(&self, cfg: &mut CliConfig) {
        if let Some(level) = &self.log_level {
            cfg.log_level = level.clone();
        }
        if let Some(format) = &self.log_format {
            cfg.log_format = format.clone();
        }
        if let Some(mode) = self.saturation {
            cfg.saturation = mode;
        }
        if let Some(mode) = self.rewards {
            cfg.rewards = mode;
        }
        if let Some(zoom) = self.zoom {
            cfg.zoom = Some(zoom);
        }

        let p = &self.params;
        let params = &mut cfg.params;
        for (slot, value) in [
            (&mut params.k, p.k),
            (&mut params.a0, p.a0),
            (&mut params.l, p.l),
            (&mut params.l2, p.l2),
            (&mut params.crossover, p.crossover),
            (&mut params.curve_root, p.curve_root),
            (&mut params.rho, p.rho),
            (&mut params.tau, p.tau),
            (&mut params.staked_ratio, p.staked_ratio),
            (&mut cfg.graph.max_x, p.max_x),
            (&mut cfg.graph.step_size_x, p.step_size_x),
        ] {
            if let Some(value) = value {
                *slot = value;
            }
        }
        // An explicit viewport beats a preset from lower layers.
        if p.max_x.is_some() || p.step_size_x.is_some() {
            cfg.zoom = None;
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut cfg = CliConfig::load(cli.config.as_deref()).context("failed to load configuration")?;
    cli.apply_overrides(&mut cfg);

    init_logging(&cfg.log_level, &cfg.log_format);
    cfg.validate().context("invalid configuration")?;

    debug!(saturation = %cfg.saturation, rewards = %cfg.rewards, "configuration loaded");

    match cli.command {
        Commands::Cap(args) => cmd_cap(&cfg, args),
        Commands::Curve(args) => cmd_curve(&cfg, args),
        Commands::Scale(args) => cmd_scale(&cfg, args),
        Commands::Roi(args) => cmd_roi(&cfg, args),
        Commands::Rank(args) => cmd_rank(&cfg, args),
        Commands::Summary(args) => cmd_summary(&cfg, args),
        Commands::ExportStakes(args) => cmd_export_stakes(&cfg, args),
    }
}

fn engine(cfg: &CliConfig) -> RoiEngine {
    RoiEngine::new(cfg.params, cfg.graph().max_x, cfg.saturation, cfg.rewards)
}

/// Dataset from `--pools`, falling back to the configured path.
fn load_pools(cfg: &CliConfig, args: &PoolsArgs) -> Result<Option<PoolDataset>> {
    let Some(path) = args.pools.as_ref().or(cfg.pools.as_ref()) else {
        return Ok(None);
    };
    let dataset = PoolDataset::load(path)
        .with_context(|| format!("failed to load pool dataset from {}", path.display()))?;
    info!(pools = dataset.len(), path = %path.display(), "pool dataset loaded");
    Ok(Some(dataset))
}

fn require_pools(cfg: &CliConfig, args: &PoolsArgs) -> Result<PoolDataset> {
    match load_pools(cfg, args)? {
        Some(dataset) => Ok(dataset),
        None => bail!("no pool dataset: pass --pools or set `pools` in the config file"),
    }
}

fn print_json<T: Serialize>(value: &T) -> Result<()> {
    let out = serde_json::to_string_pretty(value).context("failed to serialize output")?;
    println!("{out}");
    Ok(())
}

fn cmd_cap(cfg: &CliConfig, args: CapArgs) -> Result<()> {
    let modes: Vec<SaturationMode> = if args.all_modes {
        SaturationMode::ALL.to_vec()
    } else {
        vec![cfg.saturation]
    };
    let max_x = cfg.graph().max_x;
    let caps: Vec<_> = modes
        .into_iter()
        .map(|mode| {
            let model = SaturationModel::new(mode);
            json!({
                "mode": mode,
                "pledge": args.pledge,
                "cap": stakecap_engine::cap(mode, args.pledge, &cfg.params, max_x),
                "ceiling": model.ceiling(&cfg.params),
            })
        })
        .collect();
    print_json(&caps)
}

fn cmd_curve(cfg: &CliConfig, args: CurveArgs) -> Result<()> {
    let graph = cfg.graph();
    let curve = engine(cfg).curve(graph.step_size_x);
    let points: Vec<_> = curve.iter().collect();
    debug!(points = points.len(), step = curve.step(), "curve sampled");
    if args.points_only {
        return print_json(&points);
    }
    print_json(&json!({
        "mode": cfg.saturation,
        "max_x": graph.max_x,
        "step": curve.step(),
        "points": points,
    }))
}

fn cmd_scale(cfg: &CliConfig, args: ScaleArgs) -> Result<()> {
    let dataset = require_pools(cfg, &args.pools)?;
    let extra: Vec<ExtraPoolInput> = match (args.custom_stake, args.custom_pledge) {
        (Some(stake), Some(pledge)) => vec![custom_pool(stake, pledge)],
        _ => Vec::new(),
    };
    let scaling = engine(cfg).reward_scale(&dataset, &extra);
    print_json(&scaling)
}

fn cmd_roi(cfg: &CliConfig, args: RoiArgs) -> Result<()> {
    let pool = custom_pool(args.stake, args.pledge);
    let engine = engine(cfg);

    let scaling = if cfg.rewards.is_normalized() {
        match load_pools(cfg, &args.pools)? {
            Some(dataset) => engine.reward_scale(&dataset, &[pool]),
            None => {
                warn!(rewards = %cfg.rewards, "no pool dataset given, reporting unnormalized ROI");
                RewardScaling::IDENTITY
            }
        }
    } else {
        RewardScaling::IDENTITY
    };

    let roi = engine.roi_percent(pool.stake, pool.pledge, scaling);
    print_json(&json!({
        "saturation": cfg.saturation,
        "rewards": cfg.rewards,
        "stake": pool.stake,
        "pledge": pool.pledge,
        "scaling": scaling,
        "roi_percent": roi,
    }))
}

fn cmd_rank(cfg: &CliConfig, args: RankArgs) -> Result<()> {
    let dataset = require_pools(cfg, &args.pools)?;
    let engine = engine(cfg);
    let scaling = engine.reward_scale(&dataset, &[]);

    let ranked = rank_pools(&dataset, &engine, scaling);
    let top = args.top.unwrap_or(ranked.len());
    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    for entry in ranked.iter().take(top) {
        serde_json::to_writer(&mut out, entry).context("failed to serialize pool")?;
        writeln!(out)?;
    }
    Ok(())
}

fn cmd_summary(cfg: &CliConfig, args: PoolsArgs) -> Result<()> {
    let dataset = require_pools(cfg, &args)?;
    let supply = SupplyConstants::MAINNET;
    print_json(&json!({
        "supply": supply,
        "circulating": supply.circulating(),
        "total_staked": cfg.params.total_staked(),
        "pools": dataset.len(),
        "total_active_stake": dataset.total_active_stake(),
        "groups": dataset.group_summary(),
    }))
}

fn cmd_export_stakes(cfg: &CliConfig, args: ExportArgs) -> Result<()> {
    let dataset = require_pools(cfg, &args.pools)?;
    let path = args.out.join(dataset.stake_distribution_file_name());
    let rows = write_stakes(&dataset, &path)?;
    info!(rows, path = %path.display(), "stake distribution exported");
    println!("{}", path.display());
    Ok(())
}

fn write_stakes(dataset: &PoolDataset, path: &Path) -> Result<usize> {
    let file = File::create(path).with_context(|| format!("failed to create {}", path.display()))?;
    let rows = dataset.write_stake_distribution(BufWriter::new(file))?;
    Ok(rows)
}

/// A custom pool from user input, with pledge clamped to stake.
fn custom_pool(stake: f64, pledge: f64) -> ExtraPoolInput {
    let pool = ExtraPoolInput::new(stake, pledge);
    if pool.pledge_exceeds_stake() {
        warn!(stake, pledge, "stake cannot be lower than pledge; pledge is clamped to stake");
    }
    if !pool.is_valid() {
        warn!(stake, "custom pool has no positive stake and is ignored");
    }
    pool.clamped()
}

/// Initialize tracing subscriber with the given log level and output format.
///
/// Pass `format = "json"` for structured JSON output. Any other value
/// defaults to human-readable text. `RUST_LOG` takes precedence over
/// `level_str`.
fn init_logging(level_str: &str, format: &str) {
    use tracing_subscriber::filter::EnvFilter;
    use tracing_subscriber::fmt;
    use tracing_subscriber::prelude::*;

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level_str));

    if format == "json" {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().json().with_writer(std::io::stderr))
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(fmt::layer().with_target(true).with_level(true).with_writer(std::io::stderr))
            .init();
    }
}
