use anyhow::Context;
use clap::Parser;
use prime_pool::app::worker::serve_worker;
use prime_pool::config::cli::DetachedArgs;
use prime_pool::config::{CliConfig, Command, RunSettings, TomlConfig};
use prime_pool::core::detached::spawn_detached;
use prime_pool::core::primality::format_verdict;
use prime_pool::core::sweep::run_sweep;
use prime_pool::utils::error::{ErrorSeverity, PrimeError};
use prime_pool::utils::monitor::SystemMonitor;
use prime_pool::utils::{logger, validation::Validate};
use prime_pool::FanOutExecutor;
use std::time::Duration;

fn main() -> anyhow::Result<()> {
    let cli = CliConfig::parse();

    if let Command::Worker = cli.command {
        logger::init_worker_logger();
        let stdin = std::io::stdin();
        let stdout = std::io::stdout();
        serve_worker(stdin.lock(), stdout.lock()).context("worker loop failed")?;
        return Ok(());
    }

    logger::init_cli_logger(cli.verbose);
    tracing::info!("🚀 Starting prime-pool");

    let toml = match &cli.config {
        Some(path) => {
            tracing::info!("📁 Loading configuration from: {}", path.display());
            let config = TomlConfig::from_file(path)
                .with_context(|| format!("failed to load config file '{}'", path.display()))?;
            Some(config)
        }
        None => None,
    };

    let settings = RunSettings::resolve(toml.as_ref(), &cli.overrides());
    if let Err(e) = settings.validate() {
        tracing::error!("❌ Configuration validation failed: {}", e);
        tracing::error!("💡 Suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());
        std::process::exit(1);
    }
    if cli.verbose {
        tracing::debug!("Resolved settings: {:?}", settings);
    }

    let monitor = SystemMonitor::new(settings.monitor);
    if monitor.is_enabled() {
        tracing::info!("🔍 System monitoring enabled");
    }

    let result = match &cli.command {
        Command::Run(_) => run_once(&settings, &monitor),
        Command::Sweep(_) => sweep(&settings, &monitor),
        Command::Detached(args) => detached(args),
        Command::Worker => Ok(()),
    };

    if let Err(e) = result {
        tracing::error!(
            "❌ prime-pool failed: {} (Category: {:?}, Severity: {:?})",
            e,
            e.category(),
            e.severity()
        );
        tracing::error!("💡 Recovery suggestion: {}", e.recovery_suggestion());
        eprintln!("❌ {}", e.user_friendly_message());

        let exit_code = match e.severity() {
            ErrorSeverity::Low => 0,
            ErrorSeverity::Medium => 2,
            ErrorSeverity::High => 1,
            ErrorSeverity::Critical => 3,
        };
        if exit_code > 0 {
            std::process::exit(exit_code);
        }
    }

    monitor.log_final_stats();
    Ok(())
}

fn run_once(settings: &RunSettings, monitor: &SystemMonitor) -> Result<(), PrimeError> {
    let inputs = settings.range.values()?;
    let executor = FanOutExecutor::new(settings.executor_options()?)?;

    monitor.log_stats("Before run");
    let report = executor.run(&inputs)?;
    monitor.log_stats("After run");

    println!("Result: {:?}", report.primes);
    println!(
        "Found {} prime(s) among {} input(s) with {} {} worker(s), took {:.2} seconds.",
        report.primes.len(),
        report.checked,
        report.workers,
        report.backend,
        report.elapsed.as_secs_f64()
    );
    Ok(())
}

fn sweep(settings: &RunSettings, monitor: &SystemMonitor) -> Result<(), PrimeError> {
    let inputs = settings.range.values()?;
    let options = settings.executor_options()?;
    let rounds = run_sweep(&options, &inputs, settings.max_workers, monitor)?;

    for round in &rounds {
        println!(
            "{:>4} worker(s): {} prime(s), submitted in {:.2}, drained in {:.2}, took {:.2} seconds.",
            round.workers,
            round.primes_found,
            round.submitted_in.as_secs_f64(),
            round.drained_in.as_secs_f64(),
            round.elapsed.as_secs_f64()
        );
    }
    Ok(())
}

fn detached(args: &DetachedArgs) -> Result<(), PrimeError> {
    tracing::warn!("⚠️ Detached threads are never joined; output may be cut short");

    spawn_detached(&args.values, |value, prime| {
        println!("{}", format_verdict(value, prime));
    })?;

    std::thread::sleep(Duration::from_millis(args.wait_ms));
    Ok(())
}
