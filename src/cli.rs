//! CLI definition and dispatch.

use chrono::NaiveDate;
use clap::{Args, Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use std::time::Duration;
use tracing::{debug, info};

use crate::adapters::console_report::{render_analysis, render_catalog, render_detail};
use crate::adapters::csv_adapter::CsvBondAdapter;
use crate::adapters::csv_report_adapter::CsvReportAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::rand_jitter::jitter_for;
use crate::domain::analytics::{analyze_by, AnalyzedBond, EvaluationContext};
use crate::domain::bond::BondId;
use crate::domain::catalog::BondCatalog;
use crate::domain::config_validation::{parse_value, validate_analysis_config};
use crate::domain::error::BondwatchError;
use crate::domain::history::{historical_yields, ChartRange};
use crate::domain::market_feed::{
    nse_pdf_url, MarketFeed, DEFAULT_NSE_HOST, DEFAULT_REFRESH_DELAY,
};
use crate::domain::ranking::{find_by_id, selected_or_top, RankMetric};
use crate::ports::bond_source_port::BondSourcePort;
use crate::ports::config_port::ConfigPort;
use crate::ports::random_port::JitterSource;
use crate::ports::report_port::ReportPort;

pub const DEFAULT_INVESTMENT_AMOUNT: f64 = 1_000_000.0;
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Parser, Debug)]
#[command(name = "bondwatch", about = "Kenyan government bond analytics")]
pub struct Cli {
    /// Log filter when RUST_LOG is unset (overrides [logging] level)
    #[arg(long, global = true)]
    pub log_level: Option<String>,
    #[command(subcommand)]
    pub command: Command,
}

/// Inputs shared by every command that analyses the catalog.
#[derive(Args, Debug, Clone, Default)]
pub struct AnalysisArgs {
    #[arg(short, long)]
    pub config: Option<PathBuf>,
    /// Evaluation date (YYYY-MM-DD), default today
    #[arg(long)]
    pub date: Option<NaiveDate>,
    /// Amount invested in each bond, in KES
    #[arg(long)]
    pub amount: Option<f64>,
    /// Date the yield approximation is anchored to, default the evaluation date
    #[arg(long)]
    pub yield_date: Option<NaiveDate>,
    /// roi, ytm, zscore, monthly or days
    #[arg(long)]
    pub sort: Option<RankMetric>,
    /// Re-price the catalog from the simulated NSE feed first
    #[arg(long)]
    pub refresh: bool,
    #[arg(long)]
    pub seed: Option<u64>,
    /// Extra bonds to add to the catalog (CSV)
    #[arg(long)]
    pub bonds: Option<PathBuf>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the bond catalog
    List {
        #[command(flatten)]
        args: AnalysisArgs,
    },
    /// Rank every bond by after-tax return
    Analyze {
        #[command(flatten)]
        args: AnalysisArgs,
        /// Also write the ranking to a CSV file
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Detail view for one bond, default the top-ranked one
    Show {
        #[command(flatten)]
        args: AnalysisArgs,
        #[arg(long)]
        id: Option<u32>,
        /// 3M, 6M or 1Y
        #[arg(long, default_value = "6M")]
        range: ChartRange,
    },
    /// Print the NSE bond price sheet URL for a date
    Url {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        date: Option<NaiveDate>,
        #[arg(long)]
        host: Option<String>,
    },
    /// Ask the AI tutor a question
    Ask {
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(required = true, num_args = 1..)]
        question: Vec<String>,
    },
    /// AI analyst commentary for one bond
    Explain {
        #[command(flatten)]
        args: AnalysisArgs,
        #[arg(long)]
        id: Option<u32>,
    },
    /// Validate a configuration file
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

impl Command {
    pub fn config_path(&self) -> Option<&Path> {
        match self {
            Command::List { args }
            | Command::Analyze { args, .. }
            | Command::Show { args, .. }
            | Command::Explain { args, .. } => args.config.as_deref(),
            Command::Url { config, .. } | Command::Ask { config, .. } => config.as_deref(),
            Command::Validate { config } => Some(config.as_path()),
        }
    }
}

impl Cli {
    /// `--log-level`, then `[logging] level`, then `warn`.
    pub fn log_level(&self) -> String {
        if let Some(level) = &self.log_level {
            return level.clone();
        }
        self.command
            .config_path()
            .and_then(|p| FileConfigAdapter::from_file(p).ok())
            .and_then(|c| c.get_string("logging", "level"))
            .unwrap_or_else(|| DEFAULT_LOG_LEVEL.to_string())
    }
}

pub fn run(cli: Cli) -> ExitCode {
    match execute(cli.command) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn execute(command: Command) -> Result<(), BondwatchError> {
    match command {
        Command::List { args } => run_list(&args),
        Command::Analyze { args, output } => run_analyze(&args, output.as_deref()),
        Command::Show { args, id, range } => run_show(&args, id, range),
        Command::Url { config, date, host } => run_url(config.as_deref(), date, host),
        Command::Ask { config, question } => run_ask(config.as_deref(), &question.join(" ")),
        Command::Explain { args, id } => run_explain(&args, id),
        Command::Validate { config } => run_validate(&config),
    }
}

/// Resolved inputs for one analysis run.
#[derive(Debug, Clone)]
pub struct Settings {
    pub context: EvaluationContext,
    pub sort_by: RankMetric,
    pub host: String,
    pub refresh_delay: Duration,
    pub seed: Option<u64>,
    pub refresh: bool,
}

/// Load and validate a config file; no path means all defaults.
pub fn load_config(path: Option<&Path>) -> Result<FileConfigAdapter, BondwatchError> {
    let adapter = match path {
        Some(p) => {
            debug!(path = %p.display(), "loading config");
            FileConfigAdapter::from_file(p)?
        }
        None => FileConfigAdapter::empty(),
    };
    validate_analysis_config(&adapter)?;
    Ok(adapter)
}

pub fn today() -> NaiveDate {
    chrono::Local::now().date_naive()
}

/// Command-line values win over the config file, which wins over defaults.
pub fn build_settings(
    config: &dyn ConfigPort,
    args: &AnalysisArgs,
    today: NaiveDate,
) -> Result<Settings, BondwatchError> {
    let as_of_date = match args.date {
        Some(d) => d,
        None => config.get_date("analysis", "as_of_date")?.unwrap_or(today),
    };
    let investment_amount = match args.amount {
        Some(a) => a,
        None => parse_value::<f64>(config, "analysis", "investment_amount")?
            .unwrap_or(DEFAULT_INVESTMENT_AMOUNT),
    };
    let yield_reference_date = match args.yield_date {
        Some(d) => d,
        None => config
            .get_date("analysis", "yield_reference_date")?
            .unwrap_or(as_of_date),
    };
    let sort_by = match args.sort {
        Some(m) => m,
        None => parse_value::<RankMetric>(config, "analysis", "sort_by")?.unwrap_or_default(),
    };
    let delay_ms = parse_value::<u64>(config, "feed", "refresh_delay_ms")?
        .unwrap_or(DEFAULT_REFRESH_DELAY.as_millis() as u64);

    let context = EvaluationContext::new(as_of_date, investment_amount)?
        .with_yield_reference(yield_reference_date);

    Ok(Settings {
        context,
        sort_by,
        host: config
            .get_string("feed", "host")
            .map(|h| h.trim().to_string())
            .unwrap_or_else(|| DEFAULT_NSE_HOST.to_string()),
        refresh_delay: Duration::from_millis(delay_ms),
        seed: args.seed.or(parse_value::<u64>(config, "feed", "seed")?),
        refresh: args.refresh || config.get_bool("feed", "refresh_on_start", false),
    })
}

/// Seed bonds plus any bonds from the source, each validated and given a new id.
pub fn load_catalog(source: Option<&dyn BondSourcePort>) -> Result<BondCatalog, BondwatchError> {
    let mut catalog = BondCatalog::seeded();
    if let Some(source) = source {
        for bond in source.load_bonds()? {
            let issue = bond.issue_number.clone();
            catalog.add_custom(bond).map_err(|e| match e {
                BondwatchError::InvalidInput { reason } => BondwatchError::BondData {
                    reason: format!("{issue}: {reason}"),
                },
                other => other,
            })?;
        }
    }
    Ok(catalog)
}

/// Optional feed refresh, then analysis ranked by the configured metric.
pub fn run_analysis_pipeline(
    catalog: &mut BondCatalog,
    settings: &Settings,
    jitter: &mut dyn JitterSource,
) -> Result<Vec<AnalyzedBond>, BondwatchError> {
    if settings.refresh {
        let feed = MarketFeed::new(settings.host.clone(), settings.refresh_delay);
        let repriced = feed.refresh(catalog.bonds(), settings.context.as_of_date, jitter)?;
        catalog.replace_prices(repriced);
    }
    let analysed = analyze_by(catalog.bonds(), &settings.context, settings.sort_by)?;
    info!(
        bonds = analysed.len(),
        sort_by = %settings.sort_by,
        as_of = %settings.context.as_of_date,
        "analysis complete"
    );
    Ok(analysed)
}

/// Everything a command needs before it renders output.
struct Prepared {
    config: FileConfigAdapter,
    settings: Settings,
    catalog: BondCatalog,
    jitter: Box<dyn JitterSource>,
}

fn prepare(args: &AnalysisArgs) -> Result<Prepared, BondwatchError> {
    let config = load_config(args.config.as_deref())?;
    let settings = build_settings(&config, args, today())?;
    let source = args.bonds.clone().map(CsvBondAdapter::new);
    let catalog = load_catalog(source.as_ref().map(|s| s as &dyn BondSourcePort))?;
    let jitter = jitter_for(settings.seed);
    Ok(Prepared {
        config,
        settings,
        catalog,
        jitter,
    })
}

fn analysed(p: &mut Prepared) -> Result<Vec<AnalyzedBond>, BondwatchError> {
    run_analysis_pipeline(&mut p.catalog, &p.settings, p.jitter.as_mut())
}

/// The requested bond, or the top-ranked one when no id is given.
pub fn select_bond(
    bonds: &[AnalyzedBond],
    id: Option<u32>,
) -> Result<&AnalyzedBond, BondwatchError> {
    if let Some(id) = id {
        if find_by_id(bonds, BondId(id)).is_none() {
            return Err(BondwatchError::UnknownBond { id });
        }
    }
    selected_or_top(bonds, id.map(BondId)).ok_or_else(|| BondwatchError::BondData {
        reason: "catalog is empty".into(),
    })
}

fn run_list(args: &AnalysisArgs) -> Result<(), BondwatchError> {
    let mut p = prepare(args)?;
    if p.settings.refresh {
        analysed(&mut p)?;
    }
    print!("{}", render_catalog(p.catalog.bonds()));
    Ok(())
}

fn run_analyze(args: &AnalysisArgs, output: Option<&Path>) -> Result<(), BondwatchError> {
    let mut p = prepare(args)?;
    let bonds = analysed(&mut p)?;
    print!("{}", render_analysis(&bonds, &p.settings.context, p.settings.sort_by));
    if let Some(path) = output {
        CsvReportAdapter::new().write(&bonds, &p.settings.context, path)?;
        println!("\nReport written to: {}", path.display());
    }
    Ok(())
}

fn run_show(args: &AnalysisArgs, id: Option<u32>, range: ChartRange) -> Result<(), BondwatchError> {
    let mut p = prepare(args)?;
    let bonds = analysed(&mut p)?;
    let bond = select_bond(&bonds, id)?;
    let history = historical_yields(
        &bond.terms,
        p.settings.context.yield_reference_date,
        p.settings.context.as_of_date,
        range,
        p.jitter.as_mut(),
    );
    print!("{}", render_detail(bond, range, &history));
    Ok(())
}

fn run_url(
    config_path: Option<&Path>,
    date: Option<NaiveDate>,
    host: Option<String>,
) -> Result<(), BondwatchError> {
    let config = load_config(config_path)?;
    let date = match date {
        Some(d) => d,
        None => config.get_date("analysis", "as_of_date")?.unwrap_or_else(today),
    };
    let host = host
        .or_else(|| config.get_string("feed", "host"))
        .unwrap_or_else(|| DEFAULT_NSE_HOST.to_string());
    println!("{}", nse_pdf_url(host.trim(), date));
    Ok(())
}

fn run_ask(config_path: Option<&Path>, question: &str) -> Result<(), BondwatchError> {
    let config = load_config(config_path)?;

    #[cfg(feature = "ai")]
    {
        use crate::adapters::gemini_adapter::GeminiAdapter;
        use crate::domain::explain::Explainer;

        let explainer = Explainer::new(GeminiAdapter::from_config(&config)?);
        match explainer.ask(question) {
            Some(answer) => println!("{answer}"),
            None => {
                return Err(BondwatchError::invalid_input("question must not be blank"));
            }
        }
        Ok(())
    }

    #[cfg(not(feature = "ai"))]
    {
        let _ = (config, question);
        Err(BondwatchError::ExternalServiceUnavailable {
            reason: "ai feature is required for ask".into(),
        })
    }
}

fn run_explain(args: &AnalysisArgs, id: Option<u32>) -> Result<(), BondwatchError> {
    let mut p = prepare(args)?;
    let bonds = analysed(&mut p)?;
    let bond = select_bond(&bonds, id)?;

    #[cfg(feature = "ai")]
    {
        use crate::adapters::gemini_adapter::GeminiAdapter;
        use crate::domain::explain::Explainer;

        let explainer = Explainer::new(GeminiAdapter::from_config(&p.config)?);
        println!("{} ({})\n", bond.terms.issue_number, bond.terms.bond_type);
        println!("{}", explainer.explain_bond(bond));
        Ok(())
    }

    #[cfg(not(feature = "ai"))]
    {
        let _ = (&p.config, bond);
        Err(BondwatchError::ExternalServiceUnavailable {
            reason: "ai feature is required for explain".into(),
        })
    }
}

fn run_validate(config_path: &Path) -> Result<(), BondwatchError> {
    let config = load_config(Some(config_path))?;
    let settings = build_settings(&config, &AnalysisArgs::default(), today())?;
    println!("Configuration OK: {}", config_path.display());
    println!("  as_of_date:           {}", settings.context.as_of_date);
    println!("  investment_amount:    {}", settings.context.investment_amount);
    println!("  yield_reference_date: {}", settings.context.yield_reference_date);
    println!("  sort_by:              {}", settings.sort_by);
    println!("  feed host:            {}", settings.host);
    println!("  refresh_delay_ms:     {}", settings.refresh_delay.as_millis());
    Ok(())
}
