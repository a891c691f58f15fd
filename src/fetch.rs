use crate::leaderboard::{self, Leaderboard};
use chrono::{DateTime, Utc};
use color_eyre::eyre::{Result, WrapErr, eyre};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};
use tracing::{info, warn};

pub const DEFAULT_CACHE_PATH: &str = "~/.cache/star-raffle/leaderboard.json";
/// AoC asks private-leaderboard consumers not to poll more than once every
/// 15 minutes; anything fresher is served from the disk cache.
const MIN_FETCH_INTERVAL_MINUTES: i64 = 15;
const USER_AGENT: &str = "star-raffle (private leaderboard raffle tool)";

/// Upstream fetch settings, read from the environment the same way the
/// original deployment configured them.
#[derive(Clone, Debug)]
pub struct FetchConfig {
    pub year: String,
    pub session: String,
    pub leaderboard_id: String,
    pub cache_path: PathBuf,
}

impl FetchConfig {
    pub fn from_env(cache_override: Option<&str>) -> Result<Self> {
        let year = std::env::var("YEAR").wrap_err("YEAR is not set")?;
        let session = std::env::var("SESSION_TOKEN").wrap_err("SESSION_TOKEN is not set")?;
        let leaderboard_id =
            std::env::var("LEADERBOARD_ID").wrap_err("LEADERBOARD_ID is not set")?;
        let raw_path = cache_override.unwrap_or(DEFAULT_CACHE_PATH);
        let cache_path = PathBuf::from(shellexpand::tilde(raw_path).into_owned());
        Ok(FetchConfig {
            year,
            session,
            leaderboard_id,
            cache_path,
        })
    }

    fn url(&self) -> String {
        format!(
            "https://adventofcode.com/{}/leaderboard/private/view/{}.json",
            self.year, self.leaderboard_id
        )
    }
}

#[derive(Debug, Deserialize, Serialize)]
struct CacheEnvelope {
    fetched_at: DateTime<Utc>,
    payload: Leaderboard,
}

/// Fetches the leaderboard, honoring the cache interval. A fresh-enough
/// cached copy short-circuits the HTTP call entirely.
pub async fn load_leaderboard(config: &FetchConfig) -> Result<Leaderboard> {
    if let Some(cached) = read_fresh_cache(&config.cache_path) {
        return Ok(cached);
    }

    let url = config.url();
    info!(%url, "fetching leaderboard");
    let response = reqwest::Client::new()
        .get(&url)
        .header(reqwest::header::COOKIE, format!("session={}", config.session))
        .header(reqwest::header::USER_AGENT, USER_AGENT)
        .send()
        .await
        .wrap_err("leaderboard request failed")?;
    if !response.status().is_success() {
        return Err(eyre!("AoC API responded with {}", response.status()));
    }
    let raw = response
        .text()
        .await
        .wrap_err("failed to read leaderboard response body")?;
    let payload = leaderboard::parse_leaderboard(&raw)?;
    write_cache(&config.cache_path, &payload);
    Ok(payload)
}

/// Loads a leaderboard from a local JSON file (the manual-export path).
pub fn load_file(path: &Path) -> Result<Leaderboard> {
    let raw = fs::read_to_string(path)
        .wrap_err_with(|| format!("failed to read leaderboard file {}", path.display()))?;
    Ok(leaderboard::parse_leaderboard(&raw)?)
}

fn read_fresh_cache(path: &Path) -> Option<Leaderboard> {
    let raw = fs::read_to_string(path).ok()?;
    let envelope: CacheEnvelope = match serde_json::from_str(&raw) {
        Ok(envelope) => envelope,
        Err(e) => {
            warn!(path = %path.display(), error = %e, "discarding unreadable cache file");
            return None;
        }
    };
    let age = Utc::now().signed_duration_since(envelope.fetched_at);
    if age.num_minutes() >= MIN_FETCH_INTERVAL_MINUTES || age.num_seconds() < 0 {
        return None;
    }
    info!(
        age_minutes = age.num_minutes(),
        "serving leaderboard from cache"
    );
    Some(envelope.payload)
}

fn write_cache(path: &Path, payload: &Leaderboard) {
    let envelope = CacheEnvelope {
        fetched_at: Utc::now(),
        payload: payload.clone(),
    };
    let bytes = match serde_json::to_vec(&envelope) {
        Ok(bytes) => bytes,
        Err(e) => {
            warn!(error = %e, "failed to serialize leaderboard cache");
            return;
        }
    };
    let dir = path.parent().filter(|d| !d.as_os_str().is_empty());
    let result = dir
        .map_or(Ok(()), fs::create_dir_all)
        .and_then(|()| fs::write(path, bytes));
    if let Err(e) = result {
        // a failed cache write only costs an extra fetch later
        warn!(path = %path.display(), error = %e, "failed to write leaderboard cache");
    }
}

#[cfg(test)]
mod tests {
    #![allow(non_snake_case)]

    use super::*;
    use crate::leaderboard::Member;
    use std::collections::HashMap;

    fn tiny_board() -> Leaderboard {
        let mut members = HashMap::new();
        members.insert(
            "1".to_string(),
            Member {
                id: 1,
                name: Some("Ada".to_string()),
                completion_day_level: HashMap::new(),
            },
        );
        Leaderboard { members }
    }

    fn temp_cache_path(tag: &str) -> PathBuf {
        std::env::temp_dir().join(format!("star-raffle-test-{tag}-{}.json", std::process::id()))
    }

    #[test]
    fn read_fresh_cache__just_written__round_trips() {
        let path = temp_cache_path("fresh");
        write_cache(&path, &tiny_board());

        let cached = read_fresh_cache(&path);

        assert!(cached.is_some());
        assert_eq!(cached.unwrap().members.len(), 1);
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn read_fresh_cache__stale_envelope__is_ignored() {
        let path = temp_cache_path("stale");
        let envelope = CacheEnvelope {
            fetched_at: Utc::now() - chrono::Duration::minutes(MIN_FETCH_INTERVAL_MINUTES + 1),
            payload: tiny_board(),
        };
        fs::write(&path, serde_json::to_vec(&envelope).unwrap()).unwrap();

        let cached = read_fresh_cache(&path);

        assert!(cached.is_none());
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn read_fresh_cache__missing_file__is_none() {
        let path = temp_cache_path("missing-never-written");

        assert!(read_fresh_cache(&path).is_none());
    }

    #[test]
    fn read_fresh_cache__garbage_contents__is_none() {
        let path = temp_cache_path("garbage");
        fs::write(&path, b"not json at all").unwrap();

        assert!(read_fresh_cache(&path).is_none());
        let _ = fs::remove_file(&path);
    }
}
