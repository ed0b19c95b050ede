use crate::config::settings::SettingsOverrides;
use crate::domain::model::Backend;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Clone, Parser)]
#[command(name = "prime-pool")]
#[command(about = "Trial-division primality checks fanned out over worker pools")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    #[arg(short, long, global = true, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, global = true, help = "Log CPU and memory usage per phase")]
    pub monitor: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, Subcommand)]
pub enum Command {
    /// Check one range with a fixed worker count
    Run(RunArgs),
    /// Check the same range once per worker count in 1..=max-workers
    Sweep(SweepArgs),
    /// Legacy demo: one unjoined thread per value
    Detached(DetachedArgs),
    /// Process-pool child: JSON requests on stdin, answers on stdout
    #[command(hide = true)]
    Worker,
}

#[derive(Debug, Clone, Args)]
pub struct RangeArgs {
    /// First integer to test
    #[arg(long, allow_negative_numbers = true)]
    pub start: Option<i64>,

    /// How many consecutive integers to test
    #[arg(long)]
    pub count: Option<usize>,

    /// sequential, thread, tokio or process
    #[arg(long)]
    pub backend: Option<Backend>,
}

#[derive(Debug, Clone, Args)]
pub struct RunArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    #[arg(short, long)]
    pub workers: Option<usize>,

    /// Report primes in input order instead of completion order
    #[arg(long, overrides_with = "unordered")]
    pub ordered: bool,

    /// Report primes in completion order, even if the config file asks otherwise
    #[arg(long, overrides_with = "ordered")]
    pub unordered: bool,
}

impl RunArgs {
    /// None when neither flag was given
    fn input_order(&self) -> Option<bool> {
        match (self.ordered, self.unordered) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Args)]
pub struct SweepArgs {
    #[command(flatten)]
    pub range: RangeArgs,

    /// Defaults to the number of CPU cores
    #[arg(long)]
    pub max_workers: Option<usize>,
}

#[derive(Debug, Clone, Args)]
pub struct DetachedArgs {
    #[arg(
        long,
        value_delimiter = ',',
        allow_negative_numbers = true,
        default_values_t = [2, 193, 323, 1327, 433_785_907]
    )]
    pub values: Vec<i64>,

    /// How long to wait before exiting; reports arriving later are lost
    #[arg(long, default_value = "100")]
    pub wait_ms: u64,
}

impl CliConfig {
    pub fn overrides(&self) -> SettingsOverrides {
        let mut overrides = SettingsOverrides {
            monitor: self.monitor,
            ..Default::default()
        };

        match &self.command {
            Command::Run(args) => {
                apply_range(&mut overrides, &args.range);
                overrides.max_workers = args.workers;
                overrides.preserve_input_order = args.input_order();
            }
            Command::Sweep(args) => {
                apply_range(&mut overrides, &args.range);
                overrides.max_workers = args.max_workers;
            }
            Command::Detached(_) | Command::Worker => {}
        }

        overrides
    }
}

fn apply_range(overrides: &mut SettingsOverrides, range: &RangeArgs) {
    overrides.start = range.start;
    overrides.count = range.count;
    overrides.backend = range.backend;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_run_flags_become_overrides() {
        let cli = CliConfig::parse_from([
            "prime-pool",
            "run",
            "--start",
            "100",
            "--count",
            "20",
            "--workers",
            "3",
            "--backend",
            "process",
            "--ordered",
        ]);
        let overrides = cli.overrides();
        assert_eq!(overrides.start, Some(100));
        assert_eq!(overrides.count, Some(20));
        assert_eq!(overrides.max_workers, Some(3));
        assert_eq!(overrides.backend, Some(Backend::Process));
        assert_eq!(overrides.preserve_input_order, Some(true));
    }

    #[test]
    fn test_order_flags_last_one_wins() {
        let unordered = CliConfig::parse_from(["prime-pool", "run", "--unordered"]);
        assert_eq!(unordered.overrides().preserve_input_order, Some(false));

        let flipped = CliConfig::parse_from(["prime-pool", "run", "--unordered", "--ordered"]);
        assert_eq!(flipped.overrides().preserve_input_order, Some(true));

        let neither = CliConfig::parse_from(["prime-pool", "run"]);
        assert_eq!(neither.overrides().preserve_input_order, None);
    }

    #[test]
    fn test_global_flags_after_subcommand() {
        let cli = CliConfig::parse_from(["prime-pool", "sweep", "--max-workers", "2", "-v"]);
        assert!(cli.verbose);
        assert_eq!(cli.overrides().max_workers, Some(2));
    }

    #[test]
    fn test_detached_defaults_to_reference_values() {
        let cli = CliConfig::parse_from(["prime-pool", "detached"]);
        match cli.command {
            Command::Detached(args) => {
                assert_eq!(args.values, vec![2, 193, 323, 1327, 433_785_907]);
                assert_eq!(args.wait_ms, 100);
            }
            other => panic!("unexpected command {:?}", other),
        }
    }

    #[test]
    fn test_bad_backend_is_rejected() {
        assert!(CliConfig::try_parse_from(["prime-pool", "run", "--backend", "gpu"]).is_err());
    }

    #[test]
    fn test_cli_is_well_formed() {
        use clap::CommandFactory;
        CliConfig::command().debug_assert();
    }
}
