use anyhow::bail;
use arb_api::League;
use arb_api::client::DEFAULT_BASE_URL;
use chrono::{NaiveDate, Utc};
use chrono_tz::Tz;
use clap::Parser;
use log::LevelFilter;
use std::time::Duration;

/// Follow live scores and a merged game feed from the terminal.
///
/// Every flag can also be set through its `ARB_*` environment variable.
#[derive(Debug, Clone, Parser)]
#[command(name = "arbscore", version, about)]
pub struct AppSettings {
    /// Base URL of the scores proxy
    #[arg(long, env = "ARB_API_URL", default_value = DEFAULT_BASE_URL)]
    pub api_url: String,

    /// mlb, nfl, nba or nhl
    #[arg(short, long, env = "ARB_LEAGUE", default_value = "mlb")]
    pub league: League,

    /// Scoreboard date (YYYY-MM-DD), defaults to today in the display timezone
    #[arg(short, long, env = "ARB_DATE")]
    pub date: Option<NaiveDate>,

    /// Game id whose feed to follow
    #[arg(short, long, env = "ARB_GAME")]
    pub game: Option<String>,

    #[arg(long, env = "ARB_HOME_SUBREDDIT")]
    pub home_subreddit: Option<String>,

    #[arg(long, env = "ARB_AWAY_SUBREDDIT")]
    pub away_subreddit: Option<String>,

    /// Reddit comment ordering passed to the proxy
    #[arg(long, env = "ARB_REDDIT_SORT", default_value = "new")]
    pub reddit_sort: String,

    /// IANA timezone used to assign games to calendar days
    #[arg(long, env = "ARB_DISPLAY_TZ", default_value = "America/New_York")]
    pub display_tz: Tz,

    /// Seconds added to Reddit timestamps before merging
    #[arg(long = "reddit-delay", env = "ARB_REDDIT_DELAY", default_value_t = 30)]
    pub reddit_delay_secs: i64,

    /// Number of feed events kept
    #[arg(long, env = "ARB_FEED_WINDOW", default_value_t = 50)]
    pub feed_window: usize,

    #[arg(long, env = "ARB_BOX_SCORE_CAPACITY", default_value_t = 64)]
    pub box_score_capacity: usize,

    #[arg(long = "box-score-ttl", env = "ARB_BOX_SCORE_TTL", default_value_t = 1800)]
    pub box_score_ttl_secs: u64,

    /// Seconds between scoreboard refreshes
    #[arg(long = "scores-interval", env = "ARB_SCORES_INTERVAL", default_value_t = 30)]
    pub scores_interval_secs: u64,

    #[arg(long = "pbp-interval", env = "ARB_PBP_INTERVAL", default_value_t = 10)]
    pub play_by_play_interval_secs: u64,

    #[arg(long = "twitter-interval", env = "ARB_TWITTER_INTERVAL", default_value_t = 30)]
    pub twitter_interval_secs: u64,

    #[arg(long = "reddit-thread-interval", env = "ARB_REDDIT_THREAD_INTERVAL", default_value_t = 60)]
    pub reddit_thread_interval_secs: u64,

    #[arg(long = "reddit-comments-interval", env = "ARB_REDDIT_COMMENTS_INTERVAL", default_value_t = 15)]
    pub reddit_comments_interval_secs: u64,

    /// Per-request timeout in seconds
    #[arg(long = "timeout", env = "ARB_TIMEOUT", default_value_t = 10)]
    pub timeout_secs: u64,

    /// off, error, warn, info, debug or trace; defaults to warn
    #[arg(short = 'L', long, env = "ARB_LOG_LEVEL")]
    pub log_level: Option<LevelFilter>,
}

impl AppSettings {
    pub fn load() -> anyhow::Result<Self> {
        let settings = Self::parse();
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        let intervals = [
            ("scores", self.scores_interval_secs),
            ("play-by-play", self.play_by_play_interval_secs),
            ("twitter", self.twitter_interval_secs),
            ("reddit thread", self.reddit_thread_interval_secs),
            ("reddit comments", self.reddit_comments_interval_secs),
            ("timeout", self.timeout_secs),
        ];
        if let Some((name, _)) = intervals.iter().find(|(_, secs)| *secs == 0) {
            bail!("{name} interval must be at least one second");
        }
        if self.feed_window == 0 {
            bail!("feed window must hold at least one event");
        }
        if self.box_score_capacity == 0 {
            bail!("box score cache capacity must be at least one");
        }
        Ok(())
    }

    pub fn date(&self) -> NaiveDate {
        self.date
            .unwrap_or_else(|| Utc::now().with_timezone(&self.display_tz).date_naive())
    }

    pub fn subreddits(&self) -> Vec<String> {
        [&self.home_subreddit, &self.away_subreddit]
            .into_iter()
            .flatten()
            .map(|s| arb_api::feed::bare_subreddit(s).to_owned())
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn reddit_delay(&self) -> chrono::Duration {
        chrono::Duration::seconds(self.reddit_delay_secs)
    }
}
