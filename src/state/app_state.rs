use arb_api::box_score::BoxScoreCache;
use arb_api::client::FetchError;
use arb_api::feed::FeedTimeline;
use arb_api::odds::OddsTable;
use arb_api::wire::{
    PlayEvent, RawGameRecord, RedditComment, RedditThread, Stadium, TeamProfile, Tweet, TwitterPage,
};
use arb_api::{Game, League};
use chrono::NaiveDate;
use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Per-source slot: last good data, last error, loading flag
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Slot<T> {
    data: Option<T>,
    error: Option<FetchError>,
    loading: bool,
}

impl<T> Default for Slot<T> {
    fn default() -> Self {
        Self { data: None, error: None, loading: false }
    }
}

/// What a slot should display.
#[derive(Debug, PartialEq)]
pub enum SlotView<'a, T> {
    Idle,
    Loading,
    /// Data is shown even when the latest fetch failed.
    Ready { data: &'a T, stale_error: Option<&'a FetchError> },
    /// Only when nothing was ever loaded.
    Failed(&'a FetchError),
}

impl<T> Slot<T> {
    pub fn begin(&mut self) {
        self.loading = true;
    }

    pub fn fulfill(&mut self, data: T) {
        self.data = Some(data);
        self.error = None;
        self.loading = false;
    }

    /// Record a failure without dropping what was loaded before.
    pub fn fail(&mut self, error: FetchError) {
        self.error = Some(error);
        self.loading = false;
    }

    pub fn apply(&mut self, result: Result<T, FetchError>) {
        match result {
            Ok(data) => self.fulfill(data),
            Err(e) => self.fail(e),
        }
    }

    pub fn data(&self) -> Option<&T> {
        self.data.as_ref()
    }

    pub fn error(&self) -> Option<&FetchError> {
        self.error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn view(&self) -> SlotView<'_, T> {
        match (&self.data, &self.error) {
            (Some(data), stale_error) => SlotView::Ready { data, stale_error: stale_error.as_ref() },
            (None, Some(error)) => SlotView::Failed(error),
            (None, None) if self.loading => SlotView::Loading,
            (None, None) => SlotView::Idle,
        }
    }
}

// ---------------------------------------------------------------------------
// Followed game: feed sources and the merged timeline
// ---------------------------------------------------------------------------

#[derive(Debug)]
pub struct FollowState {
    pub game_id: String,
    /// Set once the game has appeared in a scores listing and its feeds
    /// were kicked off.
    pub started: bool,
    pub play_by_play: Slot<Vec<PlayEvent>>,
    pub twitter: Slot<TwitterPage>,
    pub twitter_query: Option<String>,
    pub twitter_cursor: Option<String>,
    /// Thread discovery per subreddit; `Ready(None)` means no thread yet.
    pub threads: BTreeMap<String, Slot<Option<RedditThread>>>,
    pub comments: BTreeMap<String, Slot<Vec<RedditComment>>>,
    pub timeline: FeedTimeline,
}

impl FollowState {
    pub fn new(game_id: impl Into<String>, subreddits: &[String], feed_window: usize) -> Self {
        Self {
            game_id: game_id.into(),
            started: false,
            play_by_play: Slot::default(),
            twitter: Slot::default(),
            twitter_query: None,
            twitter_cursor: None,
            threads: subreddits.iter().map(|s| (s.clone(), Slot::default())).collect(),
            comments: BTreeMap::new(),
            timeline: FeedTimeline::new(feed_window),
        }
    }

    /// Subreddits still waiting for a game thread.
    pub fn undiscovered(&self) -> Vec<String> {
        self.threads
            .iter()
            .filter(|(_, slot)| !matches!(slot.data(), Some(Some(_))))
            .map(|(name, _)| name.clone())
            .collect()
    }

    /// Subreddits with a known game thread.
    pub fn discovered(&self) -> Vec<String> {
        self.threads
            .iter()
            .filter(|(_, slot)| matches!(slot.data(), Some(Some(_))))
            .map(|(name, _)| name.clone())
            .collect()
    }

    pub fn plays(&self) -> &[PlayEvent] {
        self.play_by_play.data().map(Vec::as_slice).unwrap_or_default()
    }

    pub fn all_comments(&self) -> Vec<RedditComment> {
        self.comments
            .values()
            .filter_map(Slot::data)
            .flatten()
            .cloned()
            .collect()
    }

    pub fn tweets(&self) -> &[Tweet] {
        self.twitter.data().map(|page| page.tweets.as_slice()).unwrap_or_default()
    }
}

// ---------------------------------------------------------------------------
// Whole-app state
// ---------------------------------------------------------------------------

pub struct AppState {
    pub league: League,
    pub date: NaiveDate,
    pub scores: Slot<Vec<RawGameRecord>>,
    pub profiles: Slot<Vec<TeamProfile>>,
    pub stadiums: Slot<Vec<Stadium>>,
    pub odds: Slot<OddsTable>,
    pub box_scores: BoxScoreCache,
    /// Normalized and display-sorted; rebuilt whenever an input changes.
    pub games: Vec<Game>,
    pub follow: Option<FollowState>,
    pub show_logs: bool,
}

impl AppState {
    pub fn new(league: League, date: NaiveDate, box_scores: BoxScoreCache) -> Self {
        Self {
            league,
            date,
            scores: Slot::default(),
            profiles: Slot::default(),
            stadiums: Slot::default(),
            odds: Slot::default(),
            box_scores,
            games: Vec::new(),
            follow: None,
            show_logs: false,
        }
    }

    pub fn raw_record(&self, game_id: &str) -> Option<&RawGameRecord> {
        self.scores
            .data()?
            .iter()
            .find(|raw| raw.game_id().as_deref() == Some(game_id))
    }

    pub fn game(&self, game_id: &str) -> Option<&Game> {
        self.games.iter().find(|g| g.id == game_id)
    }
}
