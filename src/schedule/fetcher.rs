use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::Duration;

use tempfile::NamedTempFile;
use tracing::{debug, warn};

use super::faculty::faculty_code;
use super::ScheduleError;

const REQUEST_TIMEOUT: Duration = Duration::from_secs(10);

/// Retrieves the remote iCalendar feed for a group and mirrors the latest
/// copy into a per-group cache file. The remote timetable is the sole
/// source of truth: every fetch replaces the cached document wholly, never
/// merges with it.
pub struct CalendarFetcher {
    client: reqwest::Client,
    base_url: String,
    cache_dir: PathBuf,
}

impl CalendarFetcher {
    pub fn new(
        base_url: impl Into<String>,
        cache_dir: impl Into<PathBuf>,
    ) -> Result<Self, ScheduleError> {
        let client = reqwest::Client::builder()
            .timeout(REQUEST_TIMEOUT)
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
            cache_dir: cache_dir.into(),
        })
    }

    /// Fetches the feed for `group_number` and returns the document body.
    ///
    /// On transport failure the previous cache entry is left untouched. On
    /// success the cache entry is replaced atomically (temp file + rename),
    /// so a concurrent reader never observes a half-written document.
    pub async fn fetch(&self, group_number: &str) -> Result<String, ScheduleError> {
        let faculty = faculty_code(group_number)?;
        let url = format!(
            "{}/faculties/{}/groups/{}.ics",
            self.base_url, faculty, group_number
        );

        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;

        debug!(group = group_number, bytes = body.len(), "fetched timetable");

        // The cache is a scratch copy; a write failure must not fail the
        // request that already has the document in hand.
        if let Err(e) = replace_cache_entry(&self.cache_dir, group_number, &body) {
            warn!(group = group_number, error = %e, "failed to update timetable cache");
        }

        Ok(body)
    }
}

fn replace_cache_entry(cache_dir: &Path, group_number: &str, body: &str) -> std::io::Result<()> {
    std::fs::create_dir_all(cache_dir)?;
    let mut tmp = NamedTempFile::new_in(cache_dir)?;
    tmp.write_all(body.as_bytes())?;
    tmp.persist(cache_dir.join(format!("{group_number}.ics")))
        .map_err(|e| e.error)?;
    Ok(())
}
