use crate::odds::OddsTable;
use crate::wire::{
    BoxScoreDetail, Listing, MlbGame, NbaGame, NflScore, NhlGame, OddsRecord, PlayEvent,
    RawGameRecord, RedditComment, RedditCommentsResponse, RedditThread, Stadium, TeamProfile,
    TwitterPage,
};
use crate::{BoxScoreKey, League};
use chrono::{NaiveDate, Utc};
use reqwest::{Client, StatusCode, Url};
use serde::de::DeserializeOwned;
use serde_json::Value;
use std::fmt;
use std::time::Duration;

pub type ApiResult<T> = Result<T, ApiError>;

pub const DEFAULT_BASE_URL: &str = "http://127.0.0.1:3000";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// Client for the scores proxy that fronts the sports data, Reddit and
/// Twitter providers.
#[derive(Debug, Clone)]
pub struct ArbApi {
    client: Client,
    base_url: String,
    timeout: Duration,
}

impl Default for ArbApi {
    fn default() -> Self {
        Self::with_base_url(DEFAULT_BASE_URL)
    }
}

#[derive(Debug)]
pub enum ApiError {
    Network(reqwest::Error, String),
    NotFound(String),
    Server(StatusCode, String),
    RateLimited(String),
    Auth(String),
    Parsing(serde_json::Error, String),
    Other(String),
}

impl fmt::Display for ApiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ApiError::Network(e, url) => write!(f, "Network error for {url}: {e}"),
            ApiError::NotFound(url) => write!(f, "Not found: {url}"),
            ApiError::Server(status, url) => write!(f, "Server error {status} for {url}"),
            ApiError::RateLimited(url) => write!(f, "Rate limited: {url}"),
            ApiError::Auth(url) => write!(f, "Authentication failed: {url}"),
            ApiError::Parsing(e, url) => write!(f, "Parse error for {url}: {e}"),
            ApiError::Other(msg) => write!(f, "Error: {msg}"),
        }
    }
}

impl std::error::Error for ApiError {}

/// User-facing error categories.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    NetworkFailure,
    NotFound,
    ServerError,
    RateLimited,
    AuthFailure,
    Unknown,
}

impl ErrorKind {
    pub fn label(&self) -> &'static str {
        match self {
            ErrorKind::NetworkFailure => "network failure",
            ErrorKind::NotFound => "not found",
            ErrorKind::ServerError => "server error",
            ErrorKind::RateLimited => "rate limited",
            ErrorKind::AuthFailure => "authentication failed",
            ErrorKind::Unknown => "error",
        }
    }
}

impl ApiError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            ApiError::Network(..) => ErrorKind::NetworkFailure,
            ApiError::NotFound(_) => ErrorKind::NotFound,
            ApiError::Server(..) => ErrorKind::ServerError,
            ApiError::RateLimited(_) => ErrorKind::RateLimited,
            ApiError::Auth(_) => ErrorKind::AuthFailure,
            ApiError::Parsing(..) | ApiError::Other(_) => ErrorKind::Unknown,
        }
    }

    pub fn is_not_found(&self) -> bool {
        matches!(self, ApiError::NotFound(_))
    }
}

/// Cloneable summary of an [`ApiError`], kept in state error slots.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchError {
    pub kind: ErrorKind,
    pub message: String,
}

impl fmt::Display for FetchError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: {}", self.kind.label(), self.message)
    }
}

impl From<&ApiError> for FetchError {
    fn from(e: &ApiError) -> Self {
        Self {
            kind: e.kind(),
            message: e.to_string(),
        }
    }
}

impl From<ApiError> for FetchError {
    fn from(e: ApiError) -> Self {
        Self::from(&e)
    }
}

/// Twitter search ordering.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TweetOrder {
    #[default]
    Latest,
    Top,
}

impl TweetOrder {
    fn as_str(&self) -> &'static str {
        match self {
            TweetOrder::Latest => "Latest",
            TweetOrder::Top => "Top",
        }
    }
}

impl ArbApi {
    pub fn with_base_url(base_url: impl Into<String>) -> Self {
        Self {
            client: Client::builder()
                .user_agent("arbscore/0.1 (live score follower)")
                .build()
                .unwrap_or_default(),
            base_url: base_url.into().trim_end_matches('/').to_owned(),
            timeout: DEFAULT_TIMEOUT,
        }
    }

    pub fn timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    // -----------------------------------------------------------------------
    // Scores and schedules
    // -----------------------------------------------------------------------

    /// Score records for one date.
    pub async fn fetch_scores(
        &self,
        league: League,
        date: NaiveDate,
        cache: bool,
    ) -> ApiResult<Vec<RawGameRecord>> {
        let url = self.url(
            "/api/v1/scores",
            &[
                ("league", league.as_str().to_owned()),
                ("date", format_date(date)),
                ("cache", cache.to_string()),
            ],
        )?;
        let payload: Value = self.get(&url).await?;
        game_records(league, payload, &url)
    }

    /// Scheduled games for a (usually future) date.
    pub async fn fetch_schedule(
        &self,
        league: League,
        date: NaiveDate,
        postseason: bool,
    ) -> ApiResult<Vec<RawGameRecord>> {
        let url = self.url(
            "/api/v1/schedule",
            &[
                ("league", league.as_str().to_owned()),
                ("date", format_date(date)),
                ("post", postseason.to_string()),
            ],
        )?;
        let payload: Value = self.get(&url).await?;
        game_records(league, payload, &url)
    }

    pub async fn fetch_box_score(
        &self,
        league: League,
        key: &BoxScoreKey,
        cache: bool,
    ) -> ApiResult<BoxScoreDetail> {
        let (id_param, id) = key.query_pair();
        let url = self.url(
            "/api/v1/box-score",
            &[
                ("league", league.as_str().to_owned()),
                (id_param, id.to_owned()),
                ("cache", cache.to_string()),
            ],
        )?;
        let payload: Value = self.get(&url).await?;
        BoxScoreDetail::from_payload(league, payload).map_err(|e| ApiError::Parsing(e, url))
    }

    // -----------------------------------------------------------------------
    // Side tables
    // -----------------------------------------------------------------------

    pub async fn fetch_team_profiles(&self, league: League) -> ApiResult<Vec<TeamProfile>> {
        let url = self.url("/api/team-profile", &[("league", league.as_str().to_owned())])?;
        Ok(self.get::<Listing<TeamProfile>>(&url).await?.into_vec())
    }

    /// League stadiums, falling back to the league-less venues list when
    /// the proxy has no stadium table for the league.
    pub async fn fetch_stadiums(&self, league: League) -> ApiResult<Vec<Stadium>> {
        let url = self.url("/api/v1/stadiums", &[("league", league.as_str().to_owned())])?;
        match self.get::<Listing<Stadium>>(&url).await {
            Ok(listing) => Ok(listing.into_vec()),
            Err(e) if e.is_not_found() => {
                log::debug!("no stadium table for {league}, trying venues");
                let url = self.url("/api/v1/venues", &[])?;
                Ok(self.get::<Listing<Stadium>>(&url).await?.into_vec())
            }
            Err(e) => Err(e),
        }
    }

    pub async fn fetch_odds_by_date(&self, league: League, date: NaiveDate) -> ApiResult<OddsTable> {
        let url = self.url(
            "/api/v1/odds-by-date",
            &[("league", league.as_str().to_owned()), ("date", format_date(date))],
        )?;
        let records = self.get::<Listing<OddsRecord>>(&url).await?.into_vec();
        Ok(OddsTable::new(records))
    }

    // -----------------------------------------------------------------------
    // Feed sources
    // -----------------------------------------------------------------------

    /// Plays for a game. `t` defeats intermediate caches.
    pub async fn fetch_play_by_play(
        &self,
        league: League,
        game_id: &str,
        interval: Duration,
    ) -> ApiResult<Vec<PlayEvent>> {
        let url = self.url(
            "/api/v1/play-by-play",
            &[
                ("league", league.as_str().to_owned()),
                ("game_id", game_id.to_owned()),
                ("interval", interval.as_secs().to_string()),
                ("t", Utc::now().timestamp_millis().to_string()),
            ],
        )?;
        Ok(self.get::<Listing<PlayEvent>>(&url).await?.into_vec())
    }

    /// Live game thread for a subreddit; `None` when there isn't one yet.
    pub async fn find_reddit_thread(
        &self,
        subreddit: &str,
        league: League,
    ) -> ApiResult<Option<RedditThread>> {
        let url = self.url(
            "/api/v1/reddit-thread",
            &[
                ("subreddit", crate::feed::bare_subreddit(subreddit).to_owned()),
                ("league", league.as_str().to_owned()),
            ],
        )?;
        match self.get::<RedditThread>(&url).await {
            Ok(thread) => Ok(Some(thread)),
            Err(e) if e.is_not_found() => Ok(None),
            Err(e) => Err(e),
        }
    }

    pub async fn fetch_reddit_comments(
        &self,
        subreddit: &str,
        game_id: &str,
        kind: &str,
    ) -> ApiResult<Vec<RedditComment>> {
        let url = self.url(
            "/api/v1/reddit-thread-comments",
            &[
                ("subreddit", crate::feed::bare_subreddit(subreddit).to_owned()),
                ("game_id", game_id.to_owned()),
                ("kind", kind.to_owned()),
            ],
        )?;
        let response: RedditCommentsResponse = self.get(&url).await?;
        Ok(response.posts.into_iter().flat_map(|post| post.comments).collect())
    }

    pub async fn search_twitter(
        &self,
        query: &str,
        order: TweetOrder,
        cursor: Option<&str>,
    ) -> ApiResult<TwitterPage> {
        let mut params = vec![
            ("query", query.to_owned()),
            ("queryType", order.as_str().to_owned()),
        ];
        if let Some(cursor) = cursor.filter(|c| !c.is_empty()) {
            params.push(("cursor", cursor.to_owned()));
        }
        let url = self.url("/api/v1/twitter-search", &params)?;
        self.get(&url).await
    }

    // -----------------------------------------------------------------------
    // Plumbing
    // -----------------------------------------------------------------------

    fn url(&self, path: &str, params: &[(&str, String)]) -> ApiResult<String> {
        let base = format!("{}{path}", self.base_url);
        let url = if params.is_empty() {
            Url::parse(&base)
        } else {
            Url::parse_with_params(&base, params.iter().map(|(k, v)| (*k, v.as_str())))
        };
        url.map(String::from)
            .map_err(|e| ApiError::Other(format!("invalid url {base}: {e}")))
    }

    async fn get<T: DeserializeOwned>(&self, url: &str) -> ApiResult<T> {
        log::debug!("GET {url}");
        let response = self
            .client
            .get(url)
            .timeout(self.timeout)
            .send()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;

        let status = response.status();
        if !status.is_success() {
            return Err(classify(status, url));
        }
        let body = response
            .bytes()
            .await
            .map_err(|e| ApiError::Network(e, url.to_owned()))?;
        serde_json::from_slice(&body).map_err(|e| ApiError::Parsing(e, url.to_owned()))
    }
}

fn classify(status: StatusCode, url: &str) -> ApiError {
    match status {
        StatusCode::NOT_FOUND => ApiError::NotFound(url.to_owned()),
        StatusCode::UNAUTHORIZED => ApiError::Auth(url.to_owned()),
        StatusCode::TOO_MANY_REQUESTS => ApiError::RateLimited(url.to_owned()),
        s if s.is_server_error() => ApiError::Server(s, url.to_owned()),
        s => ApiError::Other(format!("unexpected status {s} for {url}")),
    }
}

fn format_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn game_records(league: League, payload: Value, url: &str) -> ApiResult<Vec<RawGameRecord>> {
    fn listing<T: DeserializeOwned>(payload: Value) -> serde_json::Result<Vec<T>> {
        serde_json::from_value::<Listing<T>>(payload).map(Listing::into_vec)
    }
    let records = match league {
        League::Mlb => listing::<MlbGame>(payload).map(|v| v.into_iter().map(RawGameRecord::Mlb).collect()),
        League::Nfl => listing::<NflScore>(payload).map(|v| v.into_iter().map(RawGameRecord::Nfl).collect()),
        League::Nba => listing::<NbaGame>(payload).map(|v| v.into_iter().map(RawGameRecord::Nba).collect()),
        League::Nhl => listing::<NhlGame>(payload).map(|v| v.into_iter().map(RawGameRecord::Nhl).collect()),
    };
    records.map_err(|e| ApiError::Parsing(e, url.to_owned()))
}
