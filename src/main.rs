use std::sync::Arc;

use anyhow::{Context, Result};
use log::{debug, info, warn};

use dipole_match::config::RunConfig;
use dipole_match::data::{loader, output};
use dipole_match::ensemble::{self, LorentzianForwardModel};
use dipole_match::search::{self, CyclePool, FilterJob, LogObserver, SearchBudget, SeedSequence};

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("dipole_match=debug"))
        .init();

    let cwd = std::env::current_dir().context("resolving working directory")?;
    let (config, source) = RunConfig::discover(&cwd).context("loading configuration")?;
    match &source {
        Some(path) => info!("Using configuration from {}", path.display()),
        None => info!("No configuration file found, using built-in defaults"),
    }
    config.validate().context("validating configuration")?;

    let frequencies = loader::read_frequencies(&config.frequencies_path)
        .context("reading frequency list")?;
    let measurements = loader::read_measurements(&config.measurements_path, config.dot_position)
        .context("reading measurements")?;
    info!(
        "Loaded {} measurements at {:?} and a {}-point frequency grid",
        measurements.len(),
        config.dot_position,
        frequencies.len()
    );
    for f in loader::frequencies_off_grid(&measurements, &frequencies) {
        warn!("Measurement frequency {f} is not on the frequency grid");
    }

    let model = ensemble::build(&config.model);
    let label = model.label();
    info!("Model under test: {label}");

    let search_config = &config.search;
    let workers = search_config.workers.unwrap_or_else(search::default_workers);
    let pool = CyclePool::new(workers).context("starting worker pool")?;
    info!("Worker pool running {} threads", pool.worker_count());

    let job = Arc::new(FilterJob::new(
        model,
        Arc::new(LorentzianForwardModel),
        measurements,
        search_config.batch_size,
    ));
    let budget = SearchBudget::from(search_config);
    let mut seeds = SeedSequence::new(search_config.seed);
    let observer = LogObserver::new(label);

    let outcome = search::search(&pool, &job, &mut seeds, &budget, &observer)
        .context("monte carlo search failed")?;
    for set in outcome.match_sets() {
        debug!("{set}");
    }

    let path = output::write_matches(&config.output_dir, &outcome, chrono::Local::now())
        .context("writing matches")?;
    info!(
        "Wrote {} matches to {}",
        outcome.matched_candidates(),
        path.display()
    );
    Ok(())
}
