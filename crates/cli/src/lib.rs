//! CLI for the bmxp benchmark explorer.
//!
//! This crate provides the `bmxp` command: serve the HTTP viewer, render a
//! static report, list the suite, and download the widget assets.

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

use anyhow::Context;
use bmxp_core::params::{BM_PARAM, DEBUG_PARAM};
use bmxp_core::QueryParams;
use bmxp_report::{html::ASSETS, LinkStyle, PageView, ReportFormat};
use bmxp_viewer::{ViewController, ViewerConfig, LOAD_ALL};
use clap::{Args, Parser, Subcommand};
use colored::Colorize;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

/// bmxp CLI.
#[derive(Parser, Debug)]
#[command(name = "bmxp")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Options shared by every command.
    #[command(flatten)]
    pub global: GlobalArgs,

    /// Subcommand to run.
    #[command(subcommand)]
    pub command: Commands,
}

/// Options shared by every command.
#[derive(Args, Debug, Clone, Default)]
pub struct GlobalArgs {
    /// Configuration file (defaults to ./bmxp.toml when present).
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Directory or HTTP(S) URL the suite and results are read from.
    #[arg(short = 'r', long, global = true, env = "BMXP_DATA_ROOT")]
    pub data_root: Option<String>,

    /// Emit logs as JSON.
    #[arg(long, global = true)]
    pub log_json: bool,
}

/// Available CLI commands.
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Serve the benchmark viewer over HTTP.
    Serve {
        /// Host to bind to.
        #[arg(long)]
        host: Option<String>,

        /// Port to bind to.
        #[arg(short, long)]
        port: Option<u16>,

        /// Always show the debug log.
        #[arg(long)]
        debug: bool,
    },

    /// Render a static report.
    ///
    /// Writes into the output directory:
    /// - index.html - The benchmark page
    /// - summary.md - Markdown tables
    /// - view.json - The page view-model
    Render {
        /// Benchmark to render.
        #[arg(short, long, conflicts_with = "all")]
        bm: Option<String>,

        /// Render every benchmark of the suite.
        #[arg(short, long)]
        all: bool,

        /// Output directory override (optional).
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Output format: html, markdown, or both (default: both).
        #[arg(short, long, default_value = "both")]
        format: ReportFormat,

        /// Prefix of the widget asset links in the HTML page.
        #[arg(long, default_value = "static/")]
        assets: String,

        /// Include the debug log.
        #[arg(long)]
        debug: bool,
    },

    /// List the benchmarks of the suite.
    List,

    /// Download the widget JS/CSS assets.
    Deps {
        /// Target directory (defaults to the configured static directory).
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

/// Parse the command line and run it.
pub async fn run() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();
    init_tracing(cli.global.log_json);
    execute(cli).await
}

/// Install the global tracing subscriber. `RUST_LOG` overrides the `info`
/// default. Logs go to stderr so command output stays clean.
pub fn init_tracing(json: bool) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr);
    if json {
        builder.json().init();
    } else {
        builder.init();
    }
}

/// Run a parsed command line.
pub async fn execute(cli: Cli) -> anyhow::Result<()> {
    let config = load_config(&cli.global)?;

    match cli.command {
        Commands::Serve { host, port, debug } => {
            let mut config = config;
            if let Some(host) = host {
                config.host = host;
            }
            if let Some(port) = port {
                config.port = port;
            }
            config.debug |= debug;
            viewer_api::serve(config).await
        }
        Commands::Render {
            bm,
            all,
            output,
            format,
            assets,
            debug,
        } => {
            let output = output.unwrap_or_else(|| PathBuf::from(&config.output_dir));
            let selection = Selection::from_args(bm, all);
            let written = render(&config, &selection, debug, &output, format, &assets).await?;

            println!("Rendered {} file(s) to {}", written.len(), output.display());
            for path in &written {
                println!("  - {}", path.display());
            }
            Ok(())
        }
        Commands::List => {
            let controller = load_controller(&config, "").await?;
            let suite = controller.suite();
            println!("{}", format!("Benchmarks: {}", suite.name).bold());
            for (key, spec) in &suite.benchmarks {
                println!("  {} {}", key.green().bold(), spec.desc);
                println!("    {} {}", "results:".dimmed(), config.results_path(&spec.results));
                if spec.has_source() {
                    println!("    {} {}", "source:".dimmed(), spec.src);
                }
            }
            Ok(())
        }
        Commands::Deps { dir } => {
            let dir = dir.unwrap_or_else(|| PathBuf::from(&config.static_dir));
            let fetched = download_assets(&dir).await?;
            println!("Fetched {} asset(s) into {}", fetched.len(), dir.display());
            Ok(())
        }
    }
}

/// Load configuration and apply global overrides.
pub fn load_config(global: &GlobalArgs) -> anyhow::Result<ViewerConfig> {
    let mut config = ViewerConfig::load(global.config.as_deref())?;
    if let Some(root) = &global.data_root {
        config.data_root = root.clone();
    }
    Ok(config)
}

/// Which benchmarks a rendered report contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
    /// Table of contents only
    None,
    /// A single benchmark
    One(String),
    /// Every benchmark
    All,
}

impl Selection {
    /// Selection for the `--bm`/`--all` flags. `--bm all` means `--all`.
    pub fn from_args(bm: Option<String>, all: bool) -> Self {
        match (bm, all) {
            (_, true) => Self::All,
            (Some(key), false) if key == LOAD_ALL => Self::All,
            (Some(key), false) => Self::One(key),
            (None, false) => Self::None,
        }
    }
}

async fn load_controller(config: &ViewerConfig, query: &str) -> anyhow::Result<ViewController> {
    let fetcher = config.fetcher()?;
    let controller = ViewController::initialize(fetcher, config.clone(), query)
        .await
        .with_context(|| format!("failed to load suite from {}", config.data_root))?;
    Ok(controller)
}

/// Build the page for `selection` once its panels settle.
pub async fn build_page(
    config: &ViewerConfig,
    selection: &Selection,
    debug: bool,
) -> anyhow::Result<PageView> {
    let mut params = QueryParams::default();
    if let Selection::One(key) = selection {
        params.set(BM_PARAM, key.as_str());
    }
    if debug {
        params.set(DEBUG_PARAM, "1");
    }

    let mut controller = load_controller(config, &params.to_query_string()).await?;
    if *selection == Selection::All {
        controller.load_all();
    }

    if !controller
        .drain_for(Duration::from_millis(config.settle_timeout_ms))
        .await
    {
        warn!("rendering with panels still loading");
    }
    Ok(controller.page(LinkStyle::Static))
}

/// Render the report for `selection` into `output`.
pub async fn render(
    config: &ViewerConfig,
    selection: &Selection,
    debug: bool,
    output: &Path,
    format: ReportFormat,
    asset_base: &str,
) -> anyhow::Result<Vec<PathBuf>> {
    let page = build_page(config, selection, debug).await?;
    let written = bmxp_report::io::write_report(&page, output, format, asset_base)
        .with_context(|| format!("failed to write report to {}", output.display()))?;
    Ok(written)
}

/// Download every widget asset into `dir`.
pub async fn download_assets(dir: &Path) -> anyhow::Result<Vec<PathBuf>> {
    tokio::fs::create_dir_all(dir).await?;
    let client = reqwest::Client::new();

    let downloads = ASSETS.iter().map(|(url, file)| {
        let client = client.clone();
        let path = dir.join(file);
        async move {
            info!(%url, "fetching asset");
            let bytes = client
                .get(*url)
                .send()
                .await
                .and_then(|r| r.error_for_status())
                .with_context(|| format!("failed to fetch {url}"))?
                .bytes()
                .await?;
            tokio::fs::write(&path, &bytes).await?;
            println!("  {} {} ({}B)", "✓".green(), file, bytes.len());
            Ok::<_, anyhow::Error>(path)
        }
    });
    futures::future::try_join_all(downloads).await
}
