use anyhow::{Context, Result};
use clap::Parser;
use dynbottle::{
    chart::ChartModel,
    cli::{Cli, OutputFormat},
    csv_input, csv_output, event, json_output, report, AnalysisConfig, BottleneckEngine,
};
use std::fs;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber for debug output
///
/// Without `--debug`, `RUST_LOG` still enables tracing when set.
fn init_tracing(debug: bool) {
    if debug {
        tracing_subscriber::fmt()
            .with_env_filter(
                EnvFilter::from_default_env().add_directive(tracing::Level::TRACE.into()),
            )
            .with_writer(std::io::stderr)
            .init();
    } else if std::env::var_os("RUST_LOG").is_some() {
        tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }
}

fn load_config(args: &Cli) -> Result<AnalysisConfig> {
    let base = match &args.config {
        Some(path) => AnalysisConfig::from_file(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => AnalysisConfig::default(),
    };
    Ok(args.apply_overrides(base)?)
}

fn load_events(args: &Cli) -> Result<Vec<event::PointEvent>> {
    let source = fs::read_to_string(&args.input)
        .with_context(|| format!("failed to read {}", args.input.display()))?;

    let events = if args.points {
        csv_input::parse_point_csv(&source)?
    } else {
        let intervals = csv_input::parse_interval_csv(&source)?;
        tracing::debug!("parsed {} activity intervals", intervals.len());
        event::point_events_from_intervals(&intervals)?
    };
    Ok(events)
}

fn main() -> Result<()> {
    let args = Cli::parse();

    init_tracing(args.debug);

    if args.format == OutputFormat::Chart && args.activity_order.is_empty() {
        anyhow::bail!("--format chart requires --activity-order");
    }

    let config = load_config(&args)?;
    let events = load_events(&args)?;

    let mut engine = BottleneckEngine::new(config)?;
    let analysis = engine
        .analyze(&events)
        .with_context(|| format!("analysis of {} failed", args.input.display()))?;

    let output = match args.format {
        OutputFormat::Text => report::to_report_string(&analysis),
        OutputFormat::Json => json_output::JsonReport::from_report(&analysis).to_json()?,
        OutputFormat::Csv => csv_output::SegmentCsv::new(&analysis.dataset).to_csv(),
        OutputFormat::Chart => {
            let chart = ChartModel::build(
                &analysis.dataset,
                Some(&analysis.blockage),
                Some(&analysis.highload),
                &args.activity_order,
            )?;
            serde_json::to_string_pretty(&chart)?
        }
    };

    match &args.output {
        Some(path) => fs::write(path, output)
            .with_context(|| format!("failed to write {}", path.display()))?,
        None => print!("{}", output),
    }

    Ok(())
}
