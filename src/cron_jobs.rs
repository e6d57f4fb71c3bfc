use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, PoisonError};
use std::time::{Duration, SystemTime};

use log::{debug, info};
use snafu::prelude::*;
use tokio_cron_scheduler::{Job, JobScheduler};

use crate::errors::{CustomResult, SchedulerSnafu};
use crate::modules::cache::PlotCache;
use crate::modules::settings::Settings;

/// # watch the RotorHazard database for new results
/// clears the page cache when the database or its write ahead log was
/// modified since the last check
pub struct DatabaseWatcher {
    paths: Vec<PathBuf>,
    last_seen: Mutex<Option<SystemTime>>,
    cache: PlotCache,
}

impl DatabaseWatcher {
    pub fn new(database: &Path, cache: PlotCache) -> DatabaseWatcher {
        let mut wal: OsString = database.as_os_str().to_owned();
        wal.push("-wal");

        let watcher = DatabaseWatcher {
            paths: vec![database.to_path_buf(), PathBuf::from(wal)],
            last_seen: Mutex::new(None),
            cache,
        };
        *watcher.last_seen.lock().unwrap_or_else(PoisonError::into_inner) = watcher.latest_modification();

        watcher
    }

    fn latest_modification(&self) -> Option<SystemTime> {
        self.paths
            .iter()
            .filter_map(|e| fs::metadata(e).and_then(|m| m.modified()).ok())
            .max()
    }

    /// # check for changes
    ///
    /// ## Returns
    /// * `bool` - true when the database changed and the cache was cleared
    pub fn check(&self) -> bool {
        let latest = self.latest_modification();
        let mut last_seen = self.last_seen.lock().unwrap_or_else(PoisonError::into_inner);
        if *last_seen == latest {
            return false;
        }

        *last_seen = latest;
        let removed = self.cache.clear();
        info!(target: "cron_jobs:check", "database changed, cleared {} cached pages", removed);
        true
    }
}

/// # start the database watcher
/// nothing is scheduled when the watch interval is 0
///
/// ## Returns
/// * `Option<JobScheduler>` - the running scheduler
pub async fn register_cron_jobs(settings: &Settings, cache: PlotCache) -> CustomResult<Option<JobScheduler>> {
    if settings.watch_interval == 0 {
        info!(target: "cron_jobs:register_cron_jobs", "database watcher disabled");
        return Ok(None);
    }

    let watcher = Arc::new(DatabaseWatcher::new(&settings.database_path, cache));
    let scheduler = JobScheduler::new().await.context(SchedulerSnafu)?;

    let job = Job::new_repeated_async(Duration::from_secs(settings.watch_interval), move |_uuid, _l| {
        let watcher = watcher.clone();
        Box::pin(async move {
            if !watcher.check() {
                debug!(target: "cron_jobs:register_cron_jobs", "database unchanged");
            }
        })
    })
    .context(SchedulerSnafu)?;

    scheduler.add(job).await.context(SchedulerSnafu)?;
    scheduler.start().await.context(SchedulerSnafu)?;
    info!(target: "cron_jobs:register_cron_jobs", "watching {} every {}s", settings.database_path.display(), settings.watch_interval);

    Ok(Some(scheduler))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs::File;
    use tempfile::tempdir;

    #[test]
    fn modification_clears_cache() {
        let dir = tempdir().unwrap();
        let database = dir.path().join("database.db");
        let file = File::create(&database).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(1_000)).unwrap();

        let cache = PlotCache::new(4);
        cache.insert("/event_result/1", &1);
        let watcher = DatabaseWatcher::new(&database, cache.clone());

        assert!(!watcher.check());
        assert_eq!(cache.len(), 1);

        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(2_000)).unwrap();
        assert!(watcher.check());
        assert!(cache.is_empty());
        assert!(!watcher.check());
    }

    #[test]
    fn write_ahead_log_is_watched() {
        let dir = tempdir().unwrap();
        let database = dir.path().join("database.db");
        let file = File::create(&database).unwrap();
        file.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(1_000)).unwrap();

        let cache = PlotCache::new(4);
        let watcher = DatabaseWatcher::new(&database, cache.clone());
        cache.insert("/event_result", &1);

        let wal = File::create(dir.path().join("database.db-wal")).unwrap();
        wal.set_modified(SystemTime::UNIX_EPOCH + Duration::from_secs(3_000)).unwrap();

        assert!(watcher.check());
        assert!(cache.is_empty());
    }

    #[tokio::test]
    async fn disabled_watcher_is_not_scheduled() {
        let settings = Settings::from_vars(|key| match key {
            "EVENT_PLOTS_DATABASE" => Some("database.db".to_string()),
            "EVENT_PLOTS_WATCH_INTERVAL" => Some("0".to_string()),
            _ => None,
        })
        .unwrap();

        let scheduler = register_cron_jobs(&settings, PlotCache::disabled()).await.unwrap();
        assert!(scheduler.is_none());
    }
}
