use std::error::Error;

use log::info;

use event_plots::build_rocket;
use event_plots::cron_jobs::register_cron_jobs;
use event_plots::modules::cache::PlotCache;
use event_plots::modules::helpers::logging::setup_logging;
use event_plots::modules::settings::Settings;

#[rocket::main]
async fn main() -> Result<(), Box<dyn Error>> {
    let settings = Settings::from_env()?;
    setup_logging(settings.logging_level, &settings.log_file)?;
    info!(target: "main", "plotting results of {}", settings.database_path.display());

    let cache = PlotCache::new(settings.cache_size);
    // keep the scheduler alive for as long as the server runs
    let _scheduler = register_cron_jobs(&settings, cache.clone()).await?;

    let _rocket = build_rocket(settings, cache).launch().await?;
    Ok(())
}
