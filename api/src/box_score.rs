use crate::client::FetchError;
use crate::wire::BoxScoreDetail;
use cached::{Cached, TimedSizedCache};
use chrono::{DateTime, Utc};
use std::collections::{HashMap, HashSet};

pub const DEFAULT_CAPACITY: usize = 64;
pub const DEFAULT_TTL_SECS: u64 = 30 * 60;

#[derive(Debug, Clone)]
pub struct CachedDetail {
    pub detail: BoxScoreDetail,
    pub fetched_at: DateTime<Utc>,
}

/// What the UI should show for one game's box score.
#[derive(Debug, Clone)]
pub enum DetailState<'a> {
    /// Data to display; `stale_error` is set when a later refetch failed.
    Ready {
        detail: &'a CachedDetail,
        stale_error: Option<&'a FetchError>,
    },
    Pending,
    Failed(&'a FetchError),
    Missing,
}

/// Box scores keyed by game id, bounded by entry count and age.
///
/// At most one fetch per id is outstanding: `request` hands out the right
/// to fetch and `fulfill`/`fail` give it back.
pub struct BoxScoreCache {
    entries: TimedSizedCache<String, CachedDetail>,
    in_flight: HashSet<String>,
    errors: HashMap<String, FetchError>,
}

impl Default for BoxScoreCache {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY, DEFAULT_TTL_SECS)
    }
}

impl BoxScoreCache {
    pub fn new(capacity: usize, ttl_secs: u64) -> Self {
        Self {
            entries: TimedSizedCache::with_size_and_lifespan(capacity.max(1), ttl_secs.max(1)),
            in_flight: HashSet::new(),
            errors: HashMap::new(),
        }
    }

    pub fn get(&mut self, game_id: &str) -> Option<&CachedDetail> {
        self.entries.cache_get(&game_id.to_string())
    }

    /// Mark `game_id` in flight. Returns `false` when a fetch is already
    /// outstanding, in which case the caller must not issue another.
    pub fn request(&mut self, game_id: &str) -> bool {
        self.in_flight.insert(game_id.to_string())
    }

    /// Store a fresh detail, overwriting any previous one.
    pub fn fulfill(&mut self, game_id: &str, detail: BoxScoreDetail) {
        self.in_flight.remove(game_id);
        self.errors.remove(game_id);
        self.entries.cache_set(
            game_id.to_string(),
            CachedDetail {
                detail,
                fetched_at: Utc::now(),
            },
        );
    }

    /// Record a failed fetch. Previously cached data is kept.
    pub fn fail(&mut self, game_id: &str, error: FetchError) {
        log::debug!("box score fetch for {game_id} failed: {error}");
        self.in_flight.remove(game_id);
        self.errors.insert(game_id.to_string(), error);
    }

    pub fn is_in_flight(&self, game_id: &str) -> bool {
        self.in_flight.contains(game_id)
    }

    pub fn last_error(&self, game_id: &str) -> Option<&FetchError> {
        self.errors.get(game_id)
    }

    pub fn state(&mut self, game_id: &str) -> DetailState<'_> {
        let in_flight = self.in_flight.contains(game_id);
        let error = self.errors.get(game_id);
        match self.entries.cache_get(&game_id.to_string()) {
            Some(detail) => DetailState::Ready {
                detail,
                stale_error: error,
            },
            None if in_flight => DetailState::Pending,
            None => match error {
                Some(error) => DetailState::Failed(error),
                None => DetailState::Missing,
            },
        }
    }

    pub fn len(&self) -> usize {
        self.entries.cache_size()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::client::ErrorKind;
    use crate::wire::MlbGame;

    fn detail(away_runs: u32) -> BoxScoreDetail {
        BoxScoreDetail::Mlb(MlbGame {
            game_id: 1,
            away_team_runs: Some(away_runs),
            ..Default::default()
        })
    }

    fn server_error() -> FetchError {
        FetchError {
            kind: ErrorKind::ServerError,
            message: "502 Bad Gateway".into(),
        }
    }

    fn away_runs(cache: &mut BoxScoreCache, id: &str) -> Option<u32> {
        match &cache.get(id)?.detail {
            BoxScoreDetail::Mlb(game) => game.away_team_runs,
            _ => None,
        }
    }

    #[test]
    fn second_request_while_in_flight_is_refused() {
        let mut cache = BoxScoreCache::default();
        assert!(cache.request("1"));
        assert!(!cache.request("1"));
        assert!(cache.request("2"));
        cache.fulfill("1", detail(2));
        assert!(!cache.is_in_flight("1"));
        assert!(cache.request("1"));
    }

    #[test]
    fn refetch_overwrites_previous_detail() {
        let mut cache = BoxScoreCache::default();
        cache.fulfill("1", detail(2));
        cache.fulfill("1", detail(5));
        assert_eq!(away_runs(&mut cache, "1"), Some(5));
        assert_eq!(cache.len(), 1);
    }

    #[test]
    fn failure_keeps_stale_data() {
        let mut cache = BoxScoreCache::default();
        cache.fulfill("1", detail(2));
        assert!(cache.request("1"));
        cache.fail("1", server_error());

        assert!(!cache.is_in_flight("1"));
        assert_eq!(away_runs(&mut cache, "1"), Some(2));
        match cache.state("1") {
            DetailState::Ready { stale_error, .. } => {
                assert_eq!(stale_error.map(|e| e.kind), Some(ErrorKind::ServerError))
            }
            other => panic!("expected stale data, got {other:?}"),
        }
    }

    #[test]
    fn first_load_failure_surfaces_error() {
        let mut cache = BoxScoreCache::default();
        assert!(matches!(cache.state("9"), DetailState::Missing));
        cache.request("9");
        assert!(matches!(cache.state("9"), DetailState::Pending));
        cache.fail("9", server_error());
        assert!(matches!(cache.state("9"), DetailState::Failed(_)));
    }

    #[test]
    fn capacity_evicts_oldest_entries() {
        let mut cache = BoxScoreCache::new(2, 60);
        cache.fulfill("1", detail(1));
        cache.fulfill("2", detail(2));
        cache.fulfill("3", detail(3));
        assert_eq!(cache.len(), 2);
        assert!(cache.get("1").is_none());
        assert!(cache.get("3").is_some());
    }
}
