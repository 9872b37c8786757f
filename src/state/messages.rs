use arb_api::client::{FetchError, TweetOrder};
use arb_api::odds::OddsTable;
use arb_api::wire::{
    BoxScoreDetail, PlayEvent, RawGameRecord, RedditComment, RedditThread, Stadium, TeamProfile,
    TwitterPage,
};
use arb_api::{BoxScoreKey, League};
use chrono::NaiveDate;
use crossterm::event::KeyEvent;
use std::time::Duration;

pub type FetchResult<T> = Result<T, FetchError>;

#[derive(Debug, Clone, PartialEq)]
pub enum NetworkRequest {
    /// Scores for today and earlier, the schedule for future dates.
    LoadScores { league: League, date: NaiveDate, upcoming: bool, cache: bool },
    LoadTeamProfiles { league: League },
    LoadStadiums { league: League },
    LoadOdds { league: League, date: NaiveDate },
    LoadBoxScore { league: League, game_id: String, key: BoxScoreKey, cache: bool },
    LoadPlayByPlay { league: League, game_id: String, interval: Duration },
    FindRedditThread { subreddit: String, league: League },
    LoadRedditComments { subreddit: String, game_id: String, kind: String },
    SearchTwitter { query: String, order: TweetOrder, cursor: Option<String> },
}

#[derive(Debug)]
pub enum NetworkResponse {
    ScoresLoaded { league: League, date: NaiveDate, result: FetchResult<Vec<RawGameRecord>> },
    TeamProfilesLoaded { result: FetchResult<Vec<TeamProfile>> },
    StadiumsLoaded { result: FetchResult<Vec<Stadium>> },
    OddsLoaded { result: FetchResult<OddsTable> },
    BoxScoreLoaded { game_id: String, result: FetchResult<BoxScoreDetail> },
    PlayByPlayLoaded { game_id: String, result: FetchResult<Vec<PlayEvent>> },
    RedditThreadFound { subreddit: String, result: FetchResult<Option<RedditThread>> },
    RedditCommentsLoaded { subreddit: String, result: FetchResult<Vec<RedditComment>> },
    TwitterLoaded { query: String, result: FetchResult<TwitterPage> },
}

/// One polled data source, each with its own interval.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PollSource {
    Scores,
    PlayByPlay,
    Twitter,
    RedditThread,
    RedditComments,
}

#[derive(Debug, Clone, PartialEq)]
pub enum AppEvent {
    Started,
    PollTick(PollSource),
    KeyPressed(KeyEvent),
    Resize,
    Shutdown,
}
