use anyhow::{bail, Context};
use drawbias::config::ConfigManager;
use drawbias::data::{HistoryProvider, InMemoryHistoryProvider};
use drawbias::engines::evaluation::BacktestHarness;
use drawbias::engines::metrics::{frequency::DEFAULT_TOP, FrequencyReport, MetricsEngine};
use drawbias::engines::scoring::ScoringFunction;
use drawbias::engines::strategies::StrategyRegistry;
use log::info;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use serde_json::json;

fn main() -> anyhow::Result<()> {
    env_logger::init();

    let mut args = std::env::args().skip(1);
    let Some(draws_path) = args.next() else {
        bail!("usage: drawbias <draws.csv> [config.toml]");
    };

    let manager = ConfigManager::new();
    match args.next() {
        Some(config_path) => manager
            .load_from_file(&config_path)
            .with_context(|| format!("loading {}", config_path))?,
        None => manager.load_from_env()?,
    }
    let config = manager.get();

    let provider = InMemoryHistoryProvider::from_csv(&draws_path)
        .with_context(|| format!("loading draws from {}", draws_path))?;
    let history = provider.history();
    if history.is_empty() {
        bail!("{} contains no draws", draws_path);
    }

    let seed = config.seed.unwrap_or_else(|| rand::thread_rng().gen());
    info!("seed {}", seed);
    let mut rng = StdRng::seed_from_u64(seed);

    let registry = StrategyRegistry::from_config(&config);
    let strategy = registry
        .get(config.strategy)
        .with_context(|| format!("strategy {} is not registered", config.strategy))?;

    let candidate = strategy.generate(history.window(), config.candidate_size, &mut rng);
    let confidence = ScoringFunction::new(config.scoring).confidence(&candidate, history.window());

    let strategies = registry.resolve(&config.backtesting.strategies)?;
    let harness = BacktestHarness::new(&config.backtesting, config.candidate_size, seed);
    let stats = harness.run(history.window(), &strategies, config.backtesting.num_simulations);

    let output = json!({
        "seed": seed,
        "latest": provider.fetch(None)?,
        "candidate": {
            "strategy": config.strategy,
            "numbers": candidate,
            "confidence": confidence,
        },
        "backtest": MetricsEngine::summarize_all(&stats),
        "frequency": FrequencyReport::from_history(history.window(), DEFAULT_TOP),
    });
    println!("{}", serde_json::to_string_pretty(&output)?);

    Ok(())
}
