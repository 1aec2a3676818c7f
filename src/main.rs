use std::path::PathBuf;

use anyhow::{
    Context,
    Result
};
use clap::{
    Parser,
    ValueEnum
};
use tracing::info;
use tracing_subscriber::{
    layer::SubscriberExt,
    util::SubscriberInitExt
};

use compint::benchmark::benchmark;
use compint::configuration::{
    Configuration,
    Mode
};
use compint::executor::integrator::Integrator;
use compint::executor::participant::{
    integrate_distributed,
    RunReport
};
use compint::executor::sharedmemory::SharedMemoryIntegrator;
use compint::kernel::kernel::{
    KernelKind,
    SeriesSettings
};

#[derive(Parser)]
#[command(name = "compint")]
#[command(author, version, about = "Composite trapezoid integration of series-expanded kernels", long_about = None)]
struct Cli {
    /// JSON configuration file; flags below override its values
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of trapezoid steps
    #[arg(short = 'n', long)]
    steps: Option<usize>,

    /// Participants (distributed) or chunks (shared-memory, 0 = all threads)
    #[arg(short, long)]
    participants: Option<usize>,

    #[arg(short, long, value_enum)]
    kernel: Option<KernelArg>,

    /// Lower bound
    #[arg(long, allow_negative_numbers = true)]
    start: Option<f64>,

    /// Upper bound
    #[arg(long, allow_negative_numbers = true)]
    end: Option<f64>,

    #[arg(short, long, value_enum)]
    mode: Option<ModeArg>,

    /// Warm up, then average the runtime over the measured rounds
    #[arg(short, long)]
    benchmark: bool,

    /// Sum series terms on the rayon pool (shared-memory mode only)
    #[arg(long)]
    parallel_series: bool,

    /// Recompute series coefficients on every evaluation
    #[arg(long)]
    no_cache: bool,

    /// Print the report as JSON
    #[arg(long)]
    json: bool,

    /// Enable verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Clone, Copy, ValueEnum)]
enum KernelArg {
    Arcsine,
    Exponential,
    HeavisideStep,
    Composite,
}

impl From<KernelArg> for KernelKind {
    fn from(arg: KernelArg) -> Self {
        match arg {
            KernelArg::Arcsine => KernelKind::Arcsine,
            KernelArg::Exponential => KernelKind::Exponential,
            KernelArg::HeavisideStep => KernelKind::HeavisideStep,
            KernelArg::Composite => KernelKind::Composite,
        }
    }
}

#[derive(Clone, Copy, ValueEnum)]
enum ModeArg {
    Distributed,
    SharedMemory,
}

impl From<ModeArg> for Mode {
    fn from(arg: ModeArg) -> Self {
        match arg {
            ModeArg::Distributed => Mode::Distributed,
            ModeArg::SharedMemory => Mode::SharedMemory,
        }
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let mut configuration = match &cli.config {
        Some(path) => Configuration::from_reader(path)
            .with_context(|| format!("failed to load configuration from {}", path.display()))?,
        None => Configuration::default(),
    };
    apply_overrides(&mut configuration, &cli);
    configuration.validate()?;

    info!(
        mode = %configuration.mode,
        kernel = %configuration.kernel,
        steps = configuration.steps,
        participants = configuration.participants,
        "starting"
    );

    let report = match configuration.mode {
        Mode::Distributed => integrate_distributed(configuration.participants, &configuration.plan(cli.benchmark))?,
        Mode::SharedMemory => run_shared_memory(&configuration, cli.benchmark)?,
    };

    print_report(&report, cli.json)
}

fn apply_overrides(configuration: &mut Configuration, cli: &Cli) {
    if let Some(steps) = cli.steps {
        configuration.steps = steps;
    }
    if let Some(participants) = cli.participants {
        configuration.participants = participants;
    }
    if let Some(kernel) = cli.kernel {
        configuration.kernel = kernel.into();
    }
    if let Some(start) = cli.start {
        configuration.start = start;
    }
    if let Some(end) = cli.end {
        configuration.end = end;
    }
    if let Some(mode) = cli.mode {
        configuration.mode = mode.into();
    }
    if cli.parallel_series {
        configuration.series.parallel_series = true;
    }
    if cli.no_cache {
        configuration.series = SeriesSettings {
            cache_coefficients: false,
            arcsine_cache: None,
            exponential_cache: None,
            heaviside_step_cache: None,
            ..configuration.series
        };
    }
}

fn run_shared_memory(configuration: &Configuration, benchmark_mode: bool) -> Result<RunReport> {
    let mut integrator = SharedMemoryIntegrator::new(
        configuration.kernel,
        &configuration.series,
        configuration.participants,
    );
    let domain = configuration.domain();

    let report = if benchmark_mode {
        RunReport::Benchmark(benchmark(&configuration.benchmark, &mut integrator, &domain)?)
    } else {
        RunReport::Single(integrator.integrate(&domain)?)
    };
    Ok(report)
}

fn print_report(report: &RunReport, json: bool) -> Result<()> {
    if json {
        println!("{}", serde_json::to_string_pretty(report)?);
        return Ok(());
    }

    match report {
        RunReport::Single(result) => {
            println!("Runtime: {:.6} seconds. Result: {:.12}", result.elapsed_seconds(), result.sum());
        }
        RunReport::Benchmark(report) => {
            println!(
                "Average runtime over {} rounds: {:.6} seconds. Result: {:.12}",
                report.measured_rounds(),
                report.average_seconds(),
                report.last().sum()
            );
        }
    }
    Ok(())
}

fn init_logging(verbose: bool) {
    let filter = if verbose { "compint=debug" } else { "compint=warn" };

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| filter.into()),
        )
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();
}
