//! Ordered-map timing matrix.
//!
//! Writes one `<kind>.py` file per container kind with `int_timings` and
//! `string_timings` sequences of per-size records.
//!
//! ```bash
//! # Full fixed matrix (sizes 8..=262144, 7 trials, fragmentation 64):
//! cargo run --release --bin map_perf
//!
//! # Quick merge-only run over small sizes, bulk-insert union:
//! cargo run --release --bin map_perf -- --suite merge --union bulk-insert --max-exp 6
//! ```

use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing::{error, info};

use mapbench::{run_matrix, BenchConfig, KeyShape, MapKind, ResultSink, Suite, UnionStrategy};

#[derive(Parser, Debug)]
#[command(name = "map_perf", about = "Time insert, iterate, find and merge across map kinds")]
struct Cli {
    /// Trials per operation (at least 3; min and max are discarded).
    #[arg(long, default_value_t = 7)]
    trials: usize,

    /// Scratch inserts performed before every timed insert (0 disables).
    #[arg(long, default_value_t = 64)]
    fragmentation: usize,

    /// Smallest size is 8 << min-exp.
    #[arg(long, default_value_t = 0)]
    min_exp: u32,

    /// Largest size is 8 << max-exp.
    #[arg(long, default_value_t = 15)]
    max_exp: u32,

    /// Comma-separated container kinds.
    #[arg(long, value_delimiter = ',', default_value = "std_map,flat_map,split_map")]
    kinds: Vec<MapKind>,

    /// Comma-separated key/value shapes.
    #[arg(long, value_delimiter = ',', default_value = "int,string")]
    shapes: Vec<KeyShape>,

    /// access (insert/iterate/find), merge, or all.
    #[arg(long, default_value = "all")]
    suite: Suite,

    /// Union strategy for the merge suite: merge or bulk-insert.
    #[arg(long, default_value = "merge")]
    union: UnionStrategy,

    /// Directory for the per-kind result files.
    #[arg(short, long, default_value = ".")]
    output_dir: PathBuf,

    /// Seed the workload generator instead of drawing from entropy.
    #[arg(long)]
    seed: Option<u64>,
}

impl From<Cli> for BenchConfig {
    fn from(cli: Cli) -> Self {
        BenchConfig {
            trials: cli.trials,
            fragmentation: cli.fragmentation,
            min_exp: cli.min_exp,
            max_exp: cli.max_exp,
            kinds: cli.kinds,
            shapes: cli.shapes,
            suite: cli.suite,
            union: cli.union,
            output_dir: cli.output_dir,
            seed: cli.seed,
        }
    }
}

fn init_tracing() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "warn,mapbench=info,map_perf=info".into()),
        )
        .with_target(false)
        .init();
}

fn run(config: BenchConfig) -> mapbench::BenchResult<()> {
    config.validate()?;
    let mut sink = ResultSink::create(&config.output_dir, &config.kinds)?;
    info!(
        trials = config.trials,
        fragmentation = config.fragmentation,
        suite = ?config.suite,
        union = config.union.name(),
        "starting map benchmark"
    );
    let records = run_matrix(&config, &mut sink)?;
    for kind in sink.kinds() {
        if let Some(path) = sink.path(kind) {
            info!(kind = %kind, path = %path.display(), "results written");
        }
    }
    sink.finish()?;
    info!(records = records.len(), "done");
    Ok(())
}

fn main() -> ExitCode {
    init_tracing();
    let config = BenchConfig::from(Cli::parse());
    match run(config) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{e}");
            ExitCode::FAILURE
        }
    }
}
