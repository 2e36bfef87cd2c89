use std::{io, time::Duration};

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand, ValueEnum};
use clweather_core::{Config, KindSelector, OutputMode, source_from_config};
use inquire::{Select, Text, validator::Validation};
use tracing::debug;

use crate::{
    render::Palette,
    run::{Query, execute},
};

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum KindArg {
    Metar,
    Taf,
    Both,
}

impl From<KindArg> for KindSelector {
    fn from(arg: KindArg) -> Self {
        match arg {
            KindArg::Metar => KindSelector::Metar,
            KindArg::Taf => KindSelector::Taf,
            KindArg::Both => KindSelector::Both,
        }
    }
}

#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum OutputArg {
    Human,
    Raw,
    Json,
}

impl From<OutputArg> for OutputMode {
    fn from(arg: OutputArg) -> Self {
        match arg {
            OutputArg::Human => OutputMode::Human,
            OutputArg::Raw => OutputMode::Raw,
            OutputArg::Json => OutputMode::Json,
        }
    }
}

/// Top-level CLI struct.
#[derive(Debug, Parser)]
#[command(
    name = "clweather",
    version,
    about = "Aviation METAR/TAF in your terminal",
    args_conflicts_with_subcommands = true
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub show: ShowArgs,

    /// Log filter, e.g. "debug" or "clweather_core=trace" (overrides RUST_LOG).
    #[arg(long, global = true)]
    pub log_level: Option<String>,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Interactively set default station, data type and output format.
    Configure,
}

#[derive(Debug, Args)]
pub struct ShowArgs {
    /// ICAO station identifiers, separate or comma separated (default from config, else KJFK).
    pub stations: Vec<String>,

    /// Data type to fetch.
    #[arg(short = 't', long = "type", value_enum)]
    pub kind: Option<KindArg>,

    /// Output format.
    #[arg(short, long, value_enum)]
    pub output: Option<OutputArg>,

    /// Show the full API response instead of a rendered bulletin.
    #[arg(short, long)]
    pub verbose: bool,

    /// Disable colored output.
    #[arg(long)]
    pub no_color: bool,

    /// Overall fetch deadline in seconds.
    #[arg(long)]
    pub deadline: Option<u64>,

    /// Override the data API base URL.
    #[arg(long, hide = true)]
    pub base_url: Option<String>,
}

impl Cli {
    pub async fn run(self) -> Result<()> {
        let mut config = Config::load()?;

        match self.command {
            Some(Command::Configure) => configure(&mut config),
            None => show(self.show, config).await,
        }
    }
}

async fn show(args: ShowArgs, mut config: Config) -> Result<()> {
    if args.base_url.is_some() {
        config.base_url = args.base_url.clone();
    }

    let query = build_query(&args, &config)?;
    debug!(?query, "resolved query");

    let source = source_from_config(&config)?;
    let palette = Palette::detect(args.no_color);

    let mut out = io::stdout().lock();
    let mut err = io::stderr();
    execute(source, &query, &mut out, &mut err, palette).await
}

/// Flags win over the config file; the config file wins over built-in defaults.
pub fn build_query(args: &ShowArgs, config: &Config) -> Result<Query> {
    let stations = if args.stations.is_empty() {
        vec![config.default_station()]
    } else {
        args.stations.clone()
    };

    let selector = match args.kind {
        Some(kind) => kind.into(),
        None => config.default_kind()?,
    };
    let output = match args.output {
        Some(output) => output.into(),
        None => config.default_output()?,
    };
    let deadline = args.deadline.map(Duration::from_secs).unwrap_or_else(|| config.deadline());

    Ok(Query { stations, selector, output, verbose: args.verbose, deadline })
}

fn configure(config: &mut Config) -> Result<()> {
    let station = Text::new("Default station (ICAO):")
        .with_default(&config.default_station())
        .with_validator(|input: &str| {
            if is_icao_like(input) {
                Ok(Validation::Valid)
            } else {
                Ok(Validation::Invalid("Expected a 3-4 character station identifier".into()))
            }
        })
        .prompt()
        .context("Failed to read default station")?;

    let kind = Select::new("Default data type:", KindSelector::all().to_vec())
        .with_starting_cursor(position_of(KindSelector::all(), &config.default_kind()?))
        .prompt()
        .context("Failed to read default data type")?;

    let output = Select::new("Default output format:", OutputMode::all().to_vec())
        .with_starting_cursor(position_of(OutputMode::all(), &config.default_output()?))
        .prompt()
        .context("Failed to read default output format")?;

    config.default_station = Some(station.trim().to_uppercase());
    config.default_kind = Some(kind.as_str().to_string());
    config.default_output = Some(output.as_str().to_string());

    let path = config.save()?;
    println!("Saved configuration to {}", path.display());
    Ok(())
}

fn is_icao_like(input: &str) -> bool {
    let s = input.trim();
    (3..=4).contains(&s.len()) && s.chars().all(|c| c.is_ascii_alphanumeric())
}

fn position_of<T: PartialEq>(items: &[T], item: &T) -> usize {
    items.iter().position(|i| i == item).unwrap_or(0)
}
