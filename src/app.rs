use crate::state::app_settings::AppSettings;
use crate::state::app_state::{AppState, FollowState};
use crate::state::messages::{FetchResult, NetworkRequest, NetworkResponse, PollSource};
use arb_api::box_score::BoxScoreCache;
use arb_api::client::TweetOrder;
use arb_api::feed::{self, FeedContext};
use arb_api::normalize::{NormalizeOptions, SideTables, normalize_all, sort_for_display};
use arb_api::odds::OddsTable;
use arb_api::wire::{
    BoxScoreDetail, PlayEvent, RawGameRecord, RedditComment, RedditThread, Stadium, TeamProfile,
    TwitterPage,
};
use arb_api::status::map_optional_status;
use arb_api::{Game, GameStatus, League};
use chrono::{NaiveDate, Utc};
use log::{debug, info, warn};
use std::time::Duration;

/// Owns all state and decides what to fetch. Every handler returns the
/// follow-up requests instead of sending them, which keeps the app free of
/// channels and lets tests drive it directly.
pub struct App {
    pub settings: AppSettings,
    pub state: AppState,
}

impl App {
    pub fn new(settings: AppSettings) -> Self {
        let box_scores = BoxScoreCache::new(settings.box_score_capacity, settings.box_score_ttl_secs);
        let mut state = AppState::new(settings.league, settings.date(), box_scores);
        if let Some(game_id) = &settings.game {
            state.follow = Some(FollowState::new(game_id, &settings.subreddits(), settings.feed_window));
        }
        Self { settings, state }
    }

    pub fn today(&self) -> NaiveDate {
        Utc::now().with_timezone(&self.settings.display_tz).date_naive()
    }

    pub fn startup_requests(&mut self) -> Vec<NetworkRequest> {
        let league = self.state.league;
        self.state.profiles.begin();
        self.state.stadiums.begin();
        let mut requests = vec![
            NetworkRequest::LoadTeamProfiles { league },
            NetworkRequest::LoadStadiums { league },
        ];
        requests.extend(self.scoreboard_requests());
        requests
    }

    /// Pollers for the scoreboard context; always running.
    pub fn board_schedule(&self) -> Vec<(PollSource, Duration)> {
        vec![(PollSource::Scores, secs(self.settings.scores_interval_secs))]
    }

    /// Pollers for the followed game's feed. Reddit pollers only run when
    /// there is at least one subreddit to watch.
    pub fn feed_schedule(&self) -> Vec<(PollSource, Duration)> {
        let Some(follow) = &self.state.follow else {
            return Vec::new();
        };
        let mut schedule = vec![
            (PollSource::PlayByPlay, secs(self.settings.play_by_play_interval_secs)),
            (PollSource::Twitter, secs(self.settings.twitter_interval_secs)),
        ];
        if !follow.threads.is_empty() {
            schedule.push((PollSource::RedditThread, secs(self.settings.reddit_thread_interval_secs)));
            schedule.push((PollSource::RedditComments, secs(self.settings.reddit_comments_interval_secs)));
        }
        schedule
    }

    pub fn toggle_show_logs(&mut self) {
        self.state.show_logs = !self.state.show_logs;
    }

    /// True once the followed game has been found and its feeds started.
    pub fn is_feed_active(&self) -> bool {
        self.state.follow.as_ref().is_some_and(|f| f.started)
    }

    // -----------------------------------------------------------------------
    // Poll ticks
    // -----------------------------------------------------------------------

    pub fn on_tick(&mut self, source: PollSource) -> Vec<NetworkRequest> {
        match source {
            PollSource::Scores => {
                let mut requests = self.scoreboard_requests();
                requests.extend(self.retry_side_tables());
                requests
            }
            PollSource::PlayByPlay => self.play_by_play_request().into_iter().collect(),
            PollSource::Twitter => self.twitter_request().into_iter().collect(),
            PollSource::RedditThread => self.reddit_thread_requests(),
            PollSource::RedditComments => self.reddit_comment_requests(),
        }
    }

    fn scoreboard_requests(&mut self) -> Vec<NetworkRequest> {
        let (league, date) = (self.state.league, self.state.date);
        let today = self.today();
        self.state.scores.begin();
        self.state.odds.begin();
        vec![
            NetworkRequest::LoadScores {
                league,
                date,
                upcoming: date > today,
                // Finished days never change; let the proxy serve them from cache.
                cache: date < today,
            },
            NetworkRequest::LoadOdds { league, date },
        ]
    }

    fn retry_side_tables(&mut self) -> Vec<NetworkRequest> {
        let league = self.state.league;
        let mut requests = Vec::new();
        if self.state.profiles.data().is_none() && !self.state.profiles.is_loading() {
            self.state.profiles.begin();
            requests.push(NetworkRequest::LoadTeamProfiles { league });
        }
        if self.state.stadiums.data().is_none() && !self.state.stadiums.is_loading() {
            self.state.stadiums.begin();
            requests.push(NetworkRequest::LoadStadiums { league });
        }
        requests
    }

    /// Box score for the followed game, unless one is already in flight.
    fn box_score_request(&mut self, cache: bool) -> Option<NetworkRequest> {
        let game = self.followed_game()?;
        let (league, game_id, key) = (game.league, game.id.clone(), game.box_score_key());
        if !self.state.box_scores.request(&game_id) {
            debug!("box score for {game_id} already in flight");
            return None;
        }
        Some(NetworkRequest::LoadBoxScore { league, game_id, key, cache })
    }

    /// A cached detail wins over the listing, so refetch it when the listing
    /// reports the game live or has moved on from the detail's status.
    fn box_score_refresh(&mut self) -> Option<NetworkRequest> {
        let follow = self.state.follow.as_ref().filter(|f| f.started)?;
        let game_id = follow.game_id.clone();
        let listing = map_optional_status(self.state.raw_record(&game_id)?.status());
        let cached = self
            .state
            .box_scores
            .get(&game_id)
            .map(|c| map_optional_status(c.detail.status()));
        if listing != GameStatus::Live && cached.is_none_or(|status| status == listing) {
            return None;
        }
        debug!("refreshing box score for {game_id}: listing {listing:?}, detail {cached:?}");
        self.box_score_request(false)
    }

    fn play_by_play_request(&mut self) -> Option<NetworkRequest> {
        let live = self.followed_game().is_some_and(Game::is_live);
        let follow = self.state.follow.as_mut().filter(|f| f.started)?;
        if !live {
            return None;
        }
        follow.play_by_play.begin();
        Some(NetworkRequest::LoadPlayByPlay {
            league: self.state.league,
            game_id: follow.game_id.clone(),
            interval: secs(self.settings.play_by_play_interval_secs),
        })
    }

    fn twitter_request(&mut self) -> Option<NetworkRequest> {
        let follow = self.state.follow.as_mut().filter(|f| f.started)?;
        let query = follow.twitter_query.clone()?;
        follow.twitter.begin();
        Some(NetworkRequest::SearchTwitter { query, order: TweetOrder::Latest, cursor: None })
    }

    fn reddit_thread_requests(&mut self) -> Vec<NetworkRequest> {
        let league = self.state.league;
        let Some(follow) = self.state.follow.as_mut().filter(|f| f.started) else {
            return Vec::new();
        };
        follow
            .undiscovered()
            .into_iter()
            .map(|subreddit| {
                if let Some(slot) = follow.threads.get_mut(&subreddit) {
                    slot.begin();
                }
                NetworkRequest::FindRedditThread { subreddit, league }
            })
            .collect()
    }

    fn reddit_comment_requests(&mut self) -> Vec<NetworkRequest> {
        let kind = self.settings.reddit_sort.clone();
        let Some(follow) = self.state.follow.as_mut().filter(|f| f.started) else {
            return Vec::new();
        };
        let game_id = follow.game_id.clone();
        follow
            .discovered()
            .into_iter()
            .map(|subreddit| {
                follow.comments.entry(subreddit.clone()).or_default().begin();
                NetworkRequest::LoadRedditComments { subreddit, game_id: game_id.clone(), kind: kind.clone() }
            })
            .collect()
    }

    // -----------------------------------------------------------------------
    // Network response handlers, called from the main loop
    // -----------------------------------------------------------------------

    pub fn on_network_response(&mut self, response: NetworkResponse) -> Vec<NetworkRequest> {
        match response {
            NetworkResponse::ScoresLoaded { league, date, result } => self.on_scores_loaded(league, date, result),
            NetworkResponse::TeamProfilesLoaded { result } => self.on_team_profiles_loaded(result),
            NetworkResponse::StadiumsLoaded { result } => self.on_stadiums_loaded(result),
            NetworkResponse::OddsLoaded { result } => self.on_odds_loaded(result),
            NetworkResponse::BoxScoreLoaded { game_id, result } => self.on_box_score_loaded(game_id, result),
            NetworkResponse::PlayByPlayLoaded { game_id, result } => {
                self.on_play_by_play_loaded(game_id, result);
                Vec::new()
            }
            NetworkResponse::RedditThreadFound { subreddit, result } => {
                self.on_reddit_thread_found(subreddit, result)
            }
            NetworkResponse::RedditCommentsLoaded { subreddit, result } => {
                self.on_reddit_comments_loaded(subreddit, result);
                Vec::new()
            }
            NetworkResponse::TwitterLoaded { query, result } => {
                self.on_twitter_loaded(query, result);
                Vec::new()
            }
        }
    }

    pub fn on_scores_loaded(
        &mut self,
        league: League,
        date: NaiveDate,
        result: FetchResult<Vec<RawGameRecord>>,
    ) -> Vec<NetworkRequest> {
        if (league, date) != (self.state.league, self.state.date) {
            debug!("discarding {league} scores for {date}");
            return Vec::new();
        }
        self.state.scores.apply(result);
        self.renormalize();
        let mut requests = self.start_following();
        requests.extend(self.box_score_refresh());
        requests
    }

    pub fn on_team_profiles_loaded(&mut self, result: FetchResult<Vec<TeamProfile>>) -> Vec<NetworkRequest> {
        self.state.profiles.apply(result);
        self.renormalize();
        self.start_following()
    }

    pub fn on_stadiums_loaded(&mut self, result: FetchResult<Vec<Stadium>>) -> Vec<NetworkRequest> {
        self.state.stadiums.apply(result);
        self.renormalize();
        Vec::new()
    }

    pub fn on_odds_loaded(&mut self, result: FetchResult<OddsTable>) -> Vec<NetworkRequest> {
        match &result {
            Ok(table) if table.is_empty() => debug!("no odds posted for {}", self.state.date),
            Ok(table) => debug!("{} odds records for {}", table.len(), self.state.date),
            Err(_) => {}
        }
        self.state.odds.apply(result);
        self.renormalize();
        Vec::new()
    }

    pub fn on_box_score_loaded(
        &mut self,
        game_id: String,
        result: FetchResult<BoxScoreDetail>,
    ) -> Vec<NetworkRequest> {
        let was_live = self.state.game(&game_id).is_some_and(Game::is_live);
        match result {
            Ok(detail) => self.state.box_scores.fulfill(&game_id, detail),
            Err(e) => self.state.box_scores.fail(&game_id, e),
        }
        self.renormalize();

        // Start play-by-play right away when the box score is the first to
        // show the game as live.
        let now_live = self.state.game(&game_id).is_some_and(Game::is_live);
        let followed = self.state.follow.as_ref().is_some_and(|f| f.game_id == game_id);
        if followed && now_live && !was_live {
            info!("game {game_id} is live");
            return self.play_by_play_request().into_iter().collect();
        }
        Vec::new()
    }

    pub fn on_play_by_play_loaded(&mut self, game_id: String, result: FetchResult<Vec<PlayEvent>>) {
        let Some(follow) = self.state.follow.as_mut().filter(|f| f.game_id == game_id) else {
            debug!("discarding plays for {game_id}");
            return;
        };
        follow.play_by_play.apply(result);
        self.rebuild_feed();
    }

    pub fn on_reddit_thread_found(
        &mut self,
        subreddit: String,
        result: FetchResult<Option<RedditThread>>,
    ) -> Vec<NetworkRequest> {
        let Some(follow) = self.state.follow.as_mut() else {
            return Vec::new();
        };
        let Some(slot) = follow.threads.get_mut(&subreddit) else {
            debug!("discarding thread lookup for r/{subreddit}");
            return Vec::new();
        };
        let found = matches!(result, Ok(Some(_)));
        if matches!(result, Ok(None)) {
            debug!("no game thread in r/{subreddit} yet");
        }
        slot.apply(result);
        if !found || follow.comments.contains_key(&subreddit) {
            return Vec::new();
        }

        // First discovery: fetch comments now instead of waiting a tick.
        follow.comments.entry(subreddit.clone()).or_default().begin();
        vec![NetworkRequest::LoadRedditComments {
            subreddit,
            game_id: follow.game_id.clone(),
            kind: self.settings.reddit_sort.clone(),
        }]
    }

    pub fn on_reddit_comments_loaded(&mut self, subreddit: String, result: FetchResult<Vec<RedditComment>>) {
        let Some(follow) = self.state.follow.as_mut() else {
            return;
        };
        follow.comments.entry(subreddit).or_default().apply(result);
        self.rebuild_feed();
    }

    pub fn on_twitter_loaded(&mut self, query: String, result: FetchResult<TwitterPage>) {
        let Some(follow) = self.state.follow.as_mut() else {
            return;
        };
        if follow.twitter_query.as_deref() != Some(query.as_str()) {
            debug!("discarding tweets for stale query {query}");
            return;
        }
        if let Ok(page) = &result {
            follow.twitter_cursor = page.next_cursor.clone().filter(|_| page.has_next_page);
        }
        follow.twitter.apply(result);
        self.rebuild_feed();
    }

    // -----------------------------------------------------------------------
    // Derived state
    // -----------------------------------------------------------------------

    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions { display_tz: self.settings.display_tz, today: self.today() }
    }

    fn renormalize(&mut self) {
        let options = self.normalize_options();
        let state = &mut self.state;
        let Some(records) = state.scores.data() else {
            return;
        };
        let tables = SideTables {
            profiles: state.profiles.data().map(Vec::as_slice).unwrap_or_default(),
            stadiums: state.stadiums.data().map(Vec::as_slice).unwrap_or_default(),
            odds: state.odds.data(),
        };
        let mut games = normalize_all(records, tables, &mut state.box_scores, &options);
        sort_for_display(&mut games);
        state.games = games;
    }

    pub fn followed_game(&self) -> Option<&Game> {
        let follow = self.state.follow.as_ref()?;
        self.state.game(&follow.game_id)
    }

    /// Kick off the followed game's feeds the first time it shows up in the
    /// normalized scoreboard.
    fn start_following(&mut self) -> Vec<NetworkRequest> {
        let league = self.state.league;
        let Some(game) = self.followed_game() else {
            return Vec::new();
        };
        let (home, away, live) = (game.home_team.name.clone(), game.away_team.name.clone(), game.is_live());
        let Some(follow) = self.state.follow.as_mut().filter(|f| !f.started) else {
            return Vec::new();
        };
        follow.started = true;
        follow.twitter_query = Some(feed::twitter_query(league, &home, &away));
        info!("following {away} at {home}");

        let mut requests: Vec<NetworkRequest> = self.box_score_request(!live).into_iter().collect();
        requests.extend(self.twitter_request());
        requests.extend(self.reddit_thread_requests());
        requests.extend(self.play_by_play_request());
        requests
    }

    pub fn feed_context(&self) -> Option<FeedContext> {
        let follow = self.state.follow.as_ref()?;
        let raw = self.state.raw_record(&follow.game_id)?;
        let profiles = self.state.profiles.data().map(Vec::as_slice).unwrap_or_default();
        let (mut home, mut away) = feed::team_identities(raw, profiles);
        home.subreddit = self.settings.home_subreddit.clone();
        away.subreddit = self.settings.away_subreddit.clone();
        let mut ctx = FeedContext::new(raw.league(), home, away);
        ctx.reddit_delay = self.settings.reddit_delay();
        Some(ctx)
    }

    fn rebuild_feed(&mut self) {
        let Some(ctx) = self.feed_context() else {
            warn!("followed game not in the scoreboard, feed not merged");
            return;
        };
        let Some(follow) = self.state.follow.as_mut() else {
            return;
        };
        let merged = feed::merge(follow.plays(), &follow.all_comments(), follow.tweets(), &ctx);
        follow.timeline.absorb(merged);
    }
}

fn secs(n: u64) -> Duration {
    Duration::from_secs(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::state::app_state::SlotView;
    use crate::state::network;
    use arb_api::client::{ArbApi, ErrorKind, FetchError};
    use arb_api::feed::SourceType;
    use clap::Parser;
    use mockito::Matcher;
    use serde_json::json;

    fn settings(extra: &[&str]) -> AppSettings {
        let mut args = vec!["arbscore", "--league", "mlb", "--date", "2025-07-04"];
        args.extend_from_slice(extra);
        AppSettings::parse_from(args)
    }

    fn profiles() -> Vec<TeamProfile> {
        serde_json::from_value(json!([
            { "TeamID": 10, "Key": "BOS", "City": "Boston", "Name": "Red Sox" },
            { "TeamID": 20, "Key": "NYY", "City": "New York", "Name": "Yankees" }
        ]))
        .unwrap()
    }

    fn mlb(id: i64, status: &str, home_runs: u32) -> RawGameRecord {
        RawGameRecord::Mlb(
            serde_json::from_value(json!({
                "GameID": id,
                "Status": status,
                "DateTime": "2025-07-04T19:05:00",
                "HomeTeamID": 10,
                "AwayTeamID": 20,
                "HomeTeamRuns": home_runs,
                "AwayTeamRuns": 1
            }))
            .unwrap(),
        )
    }

    fn date() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 7, 4).unwrap()
    }

    fn loaded(app: &mut App, records: Vec<RawGameRecord>) -> Vec<NetworkRequest> {
        let mut requests = app.on_team_profiles_loaded(Ok(profiles()));
        requests.extend(app.on_scores_loaded(League::Mlb, date(), Ok(records)));
        requests
    }

    #[test]
    fn startup_loads_side_tables_scores_and_odds() {
        let mut app = App::new(settings(&[]));
        let requests = app.startup_requests();
        assert_eq!(requests.len(), 4);
        assert!(requests.contains(&NetworkRequest::LoadTeamProfiles { league: League::Mlb }));
        assert!(requests.contains(&NetworkRequest::LoadOdds { league: League::Mlb, date: date() }));
        assert!(requests.iter().any(|r| matches!(
            r,
            NetworkRequest::LoadScores { upcoming: false, cache: true, .. }
        )));
    }

    #[test]
    fn scoreboard_is_normalized_and_sorted() {
        let mut app = App::new(settings(&[]));
        loaded(&mut app, vec![mlb(1, "Final", 3), mlb(2, "InProgress", 2), mlb(3, "Canceled", 0)]);
        let ids: Vec<&str> = app.state.games.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["2", "1", "3"]);
        assert_eq!(app.state.games[0].home_team.name, "Boston Red Sox");
    }

    #[test]
    fn failed_refresh_keeps_the_scoreboard() {
        let mut app = App::new(settings(&[]));
        loaded(&mut app, vec![mlb(1, "Final", 3)]);
        let error = FetchError { kind: ErrorKind::ServerError, message: "502".into() };
        app.on_scores_loaded(League::Mlb, date(), Err(error));
        assert_eq!(app.state.games.len(), 1);
        assert!(matches!(app.state.scores.view(), SlotView::Ready { stale_error: Some(_), .. }));
    }

    #[test]
    fn scores_for_another_date_are_discarded() {
        let mut app = App::new(settings(&[]));
        let other = NaiveDate::from_ymd_opt(2025, 7, 5).unwrap();
        app.on_scores_loaded(League::Mlb, other, Ok(vec![mlb(1, "Final", 3)]));
        assert!(app.state.scores.data().is_none());
    }

    #[test]
    fn following_starts_once_the_game_is_known() {
        let mut app = App::new(settings(&["--game", "2", "--home-subreddit", "r/RedSox"]));
        assert!(app.on_team_profiles_loaded(Ok(profiles())).is_empty());

        let requests = app.on_scores_loaded(League::Mlb, date(), Ok(vec![mlb(2, "InProgress", 2)]));
        assert!(app.is_feed_active());
        assert!(requests.iter().any(|r| matches!(r, NetworkRequest::LoadBoxScore { cache: false, .. })));
        assert!(requests.iter().any(|r| matches!(r, NetworkRequest::LoadPlayByPlay { .. })));
        assert!(requests.contains(&NetworkRequest::FindRedditThread {
            subreddit: "RedSox".into(),
            league: League::Mlb
        }));
        assert!(requests.iter().any(|r| matches!(
            r,
            NetworkRequest::SearchTwitter { query, .. } if query.contains("\"Boston Red Sox\"")
        )));

        // Already started: a second listing does not restart the feeds.
        let again = app.on_scores_loaded(League::Mlb, date(), Ok(vec![mlb(2, "InProgress", 3)]));
        assert!(again.is_empty());
    }

    #[test]
    fn play_by_play_is_gated_on_live_status() {
        let mut app = App::new(settings(&["--game", "2"]));
        loaded(&mut app, vec![mlb(2, "Scheduled", 0)]);
        assert!(app.on_tick(PollSource::PlayByPlay).is_empty());

        app.on_scores_loaded(League::Mlb, date(), Ok(vec![mlb(2, "InProgress", 0)]));
        assert_eq!(app.on_tick(PollSource::PlayByPlay).len(), 1);
    }

    #[test]
    fn box_score_overrides_listing_and_can_go_live() {
        let mut app = App::new(settings(&["--game", "2"]));
        loaded(&mut app, vec![mlb(2, "Scheduled", 0)]);
        let detail = BoxScoreDetail::from_payload(
            League::Mlb,
            json!({ "data": { "Game": { "GameID": 2, "Status": "InProgress", "HomeTeamRuns": 5 } } }),
        )
        .unwrap();

        let requests = app.on_box_score_loaded("2".into(), Ok(detail));
        let game = app.followed_game().unwrap();
        assert_eq!(game.status, GameStatus::Live);
        assert_eq!(game.home_team.score, 5);
        assert!(matches!(requests.as_slice(), [NetworkRequest::LoadPlayByPlay { .. }]));
    }

    #[test]
    fn live_listing_refreshes_a_scheduled_box_score() {
        let mut app = App::new(settings(&["--game", "2"]));
        let requests = loaded(&mut app, vec![mlb(2, "Scheduled", 0)]);
        assert!(requests.iter().any(|r| matches!(r, NetworkRequest::LoadBoxScore { cache: true, .. })));
        let scheduled = BoxScoreDetail::from_payload(
            League::Mlb,
            json!({ "data": { "Game": { "GameID": 2, "Status": "Scheduled" } } }),
        )
        .unwrap();
        assert!(app.on_box_score_loaded("2".into(), Ok(scheduled)).is_empty());
        assert_eq!(app.followed_game().map(|g| g.status), Some(GameStatus::Upcoming));

        // Listing moves ahead of the cached detail.
        let requests = app.on_scores_loaded(League::Mlb, date(), Ok(vec![mlb(2, "InProgress", 3)]));
        assert!(requests.iter().any(|r| matches!(r, NetworkRequest::LoadBoxScore { cache: false, .. })));

        let live = BoxScoreDetail::from_payload(
            League::Mlb,
            json!({ "data": { "Game": { "GameID": 2, "Status": "InProgress", "HomeTeamRuns": 3 } } }),
        )
        .unwrap();
        let requests = app.on_box_score_loaded("2".into(), Ok(live));
        let game = app.followed_game().unwrap();
        assert_eq!(game.status, GameStatus::Live);
        assert_eq!(game.home_team.score, 3);
        assert!(matches!(requests.as_slice(), [NetworkRequest::LoadPlayByPlay { .. }]));
    }

    #[test]
    fn matching_scheduled_listing_keeps_the_cached_box_score() {
        let mut app = App::new(settings(&["--game", "2"]));
        loaded(&mut app, vec![mlb(2, "Scheduled", 0)]);
        let scheduled = BoxScoreDetail::from_payload(
            League::Mlb,
            json!({ "data": { "Game": { "GameID": 2, "Status": "Scheduled" } } }),
        )
        .unwrap();
        app.on_box_score_loaded("2".into(), Ok(scheduled));
        let requests = app.on_scores_loaded(League::Mlb, date(), Ok(vec![mlb(2, "Scheduled", 0)]));
        assert!(!requests.iter().any(|r| matches!(r, NetworkRequest::LoadBoxScore { .. })));
    }

    #[test]
    fn comments_wait_for_a_discovered_thread() {
        let mut app = App::new(settings(&["--game", "2", "--home-subreddit", "RedSox"]));
        loaded(&mut app, vec![mlb(2, "InProgress", 0)]);
        assert!(app.on_tick(PollSource::RedditComments).is_empty());

        assert!(app.on_reddit_thread_found("RedSox".into(), Ok(None)).is_empty());
        assert!(app.on_tick(PollSource::RedditComments).is_empty());

        let requests = app.on_reddit_thread_found("RedSox".into(), Ok(Some(RedditThread::default())));
        assert!(matches!(requests.as_slice(), [NetworkRequest::LoadRedditComments { game_id, .. }] if game_id == "2"));
        assert_eq!(app.on_tick(PollSource::RedditComments).len(), 1);
        assert!(app.on_tick(PollSource::RedditThread).is_empty());
    }

    #[test]
    fn feed_merges_sources_and_survives_twitter_failure() {
        let mut app = App::new(settings(&["--game", "2", "--home-subreddit", "RedSox"]));
        loaded(&mut app, vec![mlb(2, "InProgress", 0)]);

        let plays: Vec<PlayEvent> = serde_json::from_value(json!([
            { "PlayID": 7, "Updated": "2025-07-04T19:30:00", "Description": "Single to left", "HitterTeamID": 10 }
        ]))
        .unwrap();
        app.on_play_by_play_loaded("2".into(), Ok(plays));
        let comments: Vec<RedditComment> = serde_json::from_value(json!([
            { "id": "c1", "author": "fan", "content": "lets go", "timestamp": "2025-07-04T19:31:00", "subreddit": "RedSox" }
        ]))
        .unwrap();
        app.on_reddit_comments_loaded("RedSox".into(), Ok(comments));

        let query = app.state.follow.as_ref().and_then(|f| f.twitter_query.clone()).unwrap();
        let error = FetchError { kind: ErrorKind::RateLimited, message: "429".into() };
        app.on_twitter_loaded(query, Err(error));

        let follow = app.state.follow.as_ref().unwrap();
        let ids: Vec<&str> = follow.timeline.events().iter().map(|e| e.id.as_str()).collect();
        assert_eq!(ids, vec!["reddit-c1", "pbp-7"]);
        assert_eq!(follow.timeline.view().pinned.map(|e| e.source), Some(SourceType::PlayByPlay));
        assert!(matches!(follow.twitter.view(), SlotView::Failed(e) if e.kind == ErrorKind::RateLimited));
    }

    #[test]
    fn twitter_keeps_the_latest_cursor() {
        let mut app = App::new(settings(&["--game", "2"]));
        loaded(&mut app, vec![mlb(2, "InProgress", 0)]);
        let query = app.state.follow.as_ref().and_then(|f| f.twitter_query.clone()).unwrap();
        let page: TwitterPage = serde_json::from_value(json!({
            "tweets": [{ "id": "t1", "url": "https://x.com/fan/status/1", "text": "hi", "createdAt": "2025-07-04T23:40:00Z" }],
            "has_next_page": true,
            "next_cursor": "abc"
        }))
        .unwrap();
        app.on_twitter_loaded(query, Ok(page));
        let follow = app.state.follow.as_ref().unwrap();
        assert_eq!(follow.twitter_cursor.as_deref(), Some("abc"));
        assert_eq!(follow.timeline.len(), 1);
    }

    #[tokio::test]
    async fn box_score_fetched_at_most_once_while_in_flight() {
        let mut server = mockito::Server::new_async().await;
        let mock = server
            .mock("GET", "/api/v1/box-score")
            .match_query(Matcher::UrlEncoded("game_id".into(), "2".into()))
            .with_body(json!({ "data": { "Game": { "GameID": 2, "Status": "Final", "HomeTeamRuns": 4 } } }).to_string())
            .expect(1)
            .create_async()
            .await;

        let mut app = App::new(settings(&["--game", "2"]));
        let mut requests = loaded(&mut app, vec![mlb(2, "InProgress", 0)]);
        // Repeated live listings while the first fetch is outstanding.
        requests.extend(app.on_scores_loaded(League::Mlb, date(), Ok(vec![mlb(2, "InProgress", 1)])));
        requests.extend(app.on_scores_loaded(League::Mlb, date(), Ok(vec![mlb(2, "InProgress", 2)])));

        let client = ArbApi::with_base_url(server.url());
        for request in requests.into_iter().filter(|r| matches!(r, NetworkRequest::LoadBoxScore { .. })) {
            let response = network::handle(&client, request).await;
            app.on_network_response(response);
        }
        mock.assert_async().await;
        assert_eq!(app.followed_game().map(|g| g.status), Some(GameStatus::Final));
        assert!(!app.state.box_scores.is_in_flight("2"));
    }
}
