//! Provider wire types: serde shapes for the per-league JSON payloads.
//! These are turned into the canonical model by `normalize` and `feed`;
//! nothing else reads provider field names.

use crate::League;
use serde::{Deserialize, Deserializer};
use serde_json::Value;

/// List endpoints answer either with a bare array or with a
/// `{ "league": .., "data": [..] }` envelope.
#[derive(Debug, Deserialize, Clone)]
#[serde(untagged)]
pub enum Listing<T> {
    Bare(Vec<T>),
    Wrapped { data: Vec<T> },
}

impl<T> Listing<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            Listing::Wrapped { data } => data,
            Listing::Bare(items) => items,
        }
    }
}

// ---------------------------------------------------------------------------
// Odds fields shared by game records and odds-by-date records
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(default)]
pub struct FlatOdds {
    #[serde(rename = "HomeTeamMoneyLine")]
    pub home_money_line: Option<i32>,
    #[serde(rename = "AwayTeamMoneyLine")]
    pub away_money_line: Option<i32>,
    /// Home spread; odds-by-date records spell it out per team.
    #[serde(rename = "PointSpread", alias = "HomeTeamPointSpread")]
    pub point_spread: Option<f64>,
    #[serde(rename = "AwayTeamPointSpread")]
    pub away_point_spread: Option<f64>,
    #[serde(rename = "OverUnder")]
    pub over_under: Option<f64>,
    #[serde(rename = "OverPayout")]
    pub over_payout: Option<i32>,
    #[serde(rename = "UnderPayout")]
    pub under_payout: Option<i32>,
    #[serde(rename = "Sportsbook")]
    pub sportsbook: Option<String>,
}

/// One sportsbook line inside `PregameOdds` / `LiveOdds`.
#[derive(Debug, Deserialize, Default, Clone, PartialEq)]
#[serde(default, rename_all = "PascalCase")]
pub struct GameOdd {
    pub sportsbook: Option<String>,
    pub home_money_line: Option<i32>,
    pub away_money_line: Option<i32>,
    pub home_point_spread: Option<f64>,
    pub away_point_spread: Option<f64>,
    pub over_under: Option<f64>,
    pub over_payout: Option<i32>,
    pub under_payout: Option<i32>,
}

/// Entry of the `/api/v1/odds-by-date` table.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct OddsRecord {
    #[serde(rename = "GameId", alias = "GameID")]
    pub game_id: i64,
    #[serde(flatten)]
    pub flat: FlatOdds,
    #[serde(rename = "PregameOdds")]
    pub pregame_odds: Option<Vec<GameOdd>>,
    #[serde(rename = "LiveOdds")]
    pub live_odds: Option<Vec<GameOdd>>,
}

// ---------------------------------------------------------------------------
// Per-league game records
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct MlbGame {
    #[serde(rename = "GameID")]
    pub game_id: i64,
    #[serde(rename = "Status")]
    pub status: Option<String>,
    #[serde(rename = "DateTime")]
    pub date_time: Option<String>,
    #[serde(rename = "HomeTeamID")]
    pub home_team_id: Option<i64>,
    #[serde(rename = "AwayTeamID")]
    pub away_team_id: Option<i64>,
    #[serde(rename = "StadiumID")]
    pub stadium_id: Option<i64>,
    #[serde(rename = "HomeTeamRuns")]
    pub home_team_runs: Option<u32>,
    #[serde(rename = "AwayTeamRuns")]
    pub away_team_runs: Option<u32>,
    #[serde(rename = "Inning")]
    pub inning: Option<u32>,
    #[serde(rename = "InningHalf")]
    pub inning_half: Option<String>,
    #[serde(rename = "RunnerOnFirst")]
    pub runner_on_first: Option<bool>,
    #[serde(rename = "RunnerOnSecond")]
    pub runner_on_second: Option<bool>,
    #[serde(rename = "RunnerOnThird")]
    pub runner_on_third: Option<bool>,
    #[serde(rename = "Weather", alias = "ForecastDescription")]
    pub weather: Option<String>,
    #[serde(rename = "Temperature", alias = "ForecastTempHigh")]
    pub temperature: Option<i32>,
    #[serde(flatten)]
    pub odds: FlatOdds,
    #[serde(rename = "PregameOdds")]
    pub pregame_odds: Option<Vec<GameOdd>>,
    #[serde(rename = "LiveOdds")]
    pub live_odds: Option<Vec<GameOdd>>,
}

/// NFL "Score" record; schedule listings share the shape but only carry
/// the global team ids.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct NflScore {
    #[serde(rename = "GameKey", deserialize_with = "opt_string_or_number")]
    pub game_key: Option<String>,
    #[serde(rename = "ScoreID")]
    pub score_id: Option<i64>,
    #[serde(rename = "Status")]
    pub status: Option<String>,
    #[serde(rename = "DateTime")]
    pub date_time: Option<String>,
    #[serde(rename = "HomeTeam")]
    pub home_team: Option<String>,
    #[serde(rename = "AwayTeam")]
    pub away_team: Option<String>,
    #[serde(rename = "HomeTeamID")]
    pub home_team_id: Option<i64>,
    #[serde(rename = "AwayTeamID")]
    pub away_team_id: Option<i64>,
    #[serde(rename = "GlobalHomeTeamID")]
    pub global_home_team_id: Option<i64>,
    #[serde(rename = "GlobalAwayTeamID")]
    pub global_away_team_id: Option<i64>,
    #[serde(rename = "StadiumID")]
    pub stadium_id: Option<i64>,
    #[serde(rename = "HomeScore")]
    pub home_score: Option<u32>,
    #[serde(rename = "AwayScore")]
    pub away_score: Option<u32>,
    #[serde(rename = "Quarter", deserialize_with = "opt_string_or_number")]
    pub quarter: Option<String>,
    #[serde(rename = "TimeRemaining")]
    pub time_remaining: Option<String>,
    #[serde(rename = "Weather", alias = "ForecastDescription")]
    pub weather: Option<String>,
    #[serde(rename = "Temperature", alias = "ForecastTempHigh")]
    pub temperature: Option<i32>,
    #[serde(flatten)]
    pub odds: FlatOdds,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct NbaGame {
    #[serde(rename = "GameID")]
    pub game_id: i64,
    #[serde(rename = "Status")]
    pub status: Option<String>,
    #[serde(rename = "DateTime")]
    pub date_time: Option<String>,
    #[serde(rename = "HomeTeamID")]
    pub home_team_id: Option<i64>,
    #[serde(rename = "AwayTeamID")]
    pub away_team_id: Option<i64>,
    #[serde(rename = "StadiumID")]
    pub stadium_id: Option<i64>,
    #[serde(rename = "HomeTeamScore")]
    pub home_team_score: Option<u32>,
    #[serde(rename = "AwayTeamScore")]
    pub away_team_score: Option<u32>,
    #[serde(rename = "Quarter", deserialize_with = "opt_string_or_number")]
    pub quarter: Option<String>,
    #[serde(rename = "TimeRemainingMinutes")]
    pub time_remaining_minutes: Option<u32>,
    #[serde(rename = "TimeRemainingSeconds")]
    pub time_remaining_seconds: Option<u32>,
    #[serde(flatten)]
    pub odds: FlatOdds,
    #[serde(rename = "PregameOdds")]
    pub pregame_odds: Option<Vec<GameOdd>>,
    #[serde(rename = "LiveOdds")]
    pub live_odds: Option<Vec<GameOdd>>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct NhlGame {
    #[serde(rename = "GameID")]
    pub game_id: i64,
    #[serde(rename = "Status")]
    pub status: Option<String>,
    #[serde(rename = "DateTime")]
    pub date_time: Option<String>,
    #[serde(rename = "DateTimeUTC")]
    pub date_time_utc: Option<String>,
    #[serde(rename = "HomeTeamID")]
    pub home_team_id: Option<i64>,
    #[serde(rename = "AwayTeamID")]
    pub away_team_id: Option<i64>,
    #[serde(rename = "StadiumID")]
    pub stadium_id: Option<i64>,
    #[serde(rename = "HomeTeamScore")]
    pub home_team_score: Option<u32>,
    #[serde(rename = "AwayTeamScore")]
    pub away_team_score: Option<u32>,
    #[serde(rename = "Period", deserialize_with = "opt_string_or_number")]
    pub period: Option<String>,
    #[serde(rename = "TimeRemainingMinutes")]
    pub time_remaining_minutes: Option<u32>,
    #[serde(rename = "TimeRemainingSeconds")]
    pub time_remaining_seconds: Option<u32>,
    #[serde(flatten)]
    pub odds: FlatOdds,
}

/// A schedule/score listing entry, tagged by league.
#[derive(Debug, Clone)]
pub enum RawGameRecord {
    Mlb(MlbGame),
    Nfl(NflScore),
    Nba(NbaGame),
    Nhl(NhlGame),
}

impl RawGameRecord {
    pub fn league(&self) -> League {
        match self {
            RawGameRecord::Mlb(_) => League::Mlb,
            RawGameRecord::Nfl(_) => League::Nfl,
            RawGameRecord::Nba(_) => League::Nba,
            RawGameRecord::Nhl(_) => League::Nhl,
        }
    }

    /// Canonical game id: `GameID`, or `GameKey` (falling back to `ScoreID`) for NFL.
    pub fn game_id(&self) -> Option<String> {
        match self {
            RawGameRecord::Mlb(g) => Some(g.game_id.to_string()),
            RawGameRecord::Nba(g) => Some(g.game_id.to_string()),
            RawGameRecord::Nhl(g) => Some(g.game_id.to_string()),
            RawGameRecord::Nfl(g) => g
                .game_key
                .clone()
                .or_else(|| g.score_id.map(|id| id.to_string())),
        }
    }

    pub fn status(&self) -> Option<&str> {
        match self {
            RawGameRecord::Mlb(g) => g.status.as_deref(),
            RawGameRecord::Nfl(g) => g.status.as_deref(),
            RawGameRecord::Nba(g) => g.status.as_deref(),
            RawGameRecord::Nhl(g) => g.status.as_deref(),
        }
    }
}

// ---------------------------------------------------------------------------
// Box score detail
// ---------------------------------------------------------------------------

/// Detailed game record from `/api/v1/box-score`, already pulled out of
/// whichever wrapper the league's payload uses.
#[derive(Debug, Clone)]
pub enum BoxScoreDetail {
    Mlb(MlbGame),
    Nfl(NflScore),
    Nba(NbaGame),
    Nhl(NhlGame),
}

impl BoxScoreDetail {
    /// MLB/NBA/NHL detail sits at `data.Game`. NFL is the first of
    /// `data.score`, `data.Score`, `data.Game`, or `data` itself.
    pub fn from_payload(league: League, payload: Value) -> serde_json::Result<Self> {
        let data = first_object(payload, &["data"]);
        Ok(match league {
            League::Mlb => Self::Mlb(serde_json::from_value(first_object(data, &["Game"]))?),
            League::Nba => Self::Nba(serde_json::from_value(first_object(data, &["Game"]))?),
            League::Nhl => Self::Nhl(serde_json::from_value(first_object(data, &["Game"]))?),
            League::Nfl => Self::Nfl(serde_json::from_value(first_object(
                data,
                &["score", "Score", "Game"],
            ))?),
        })
    }

    pub fn league(&self) -> League {
        match self {
            BoxScoreDetail::Mlb(_) => League::Mlb,
            BoxScoreDetail::Nfl(_) => League::Nfl,
            BoxScoreDetail::Nba(_) => League::Nba,
            BoxScoreDetail::Nhl(_) => League::Nhl,
        }
    }

    pub fn status(&self) -> Option<&str> {
        match self {
            BoxScoreDetail::Mlb(g) => g.status.as_deref(),
            BoxScoreDetail::Nfl(g) => g.status.as_deref(),
            BoxScoreDetail::Nba(g) => g.status.as_deref(),
            BoxScoreDetail::Nhl(g) => g.status.as_deref(),
        }
    }
}

fn first_object(value: Value, keys: &[&str]) -> Value {
    let Value::Object(mut map) = value else {
        return value;
    };
    for key in keys {
        if map.get(*key).is_some_and(Value::is_object)
            && let Some(inner) = map.remove(*key)
        {
            return inner;
        }
    }
    Value::Object(map)
}

// ---------------------------------------------------------------------------
// Side tables
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct TeamProfile {
    #[serde(rename = "TeamID")]
    pub team_id: i64,
    #[serde(rename = "GlobalTeamID")]
    pub global_team_id: Option<i64>,
    #[serde(rename = "Key")]
    pub key: Option<String>,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "City")]
    pub city: Option<String>,
    #[serde(rename = "WikipediaLogoUrl")]
    pub logo_url: Option<String>,
    #[serde(rename = "PrimaryColor")]
    pub primary_color: Option<String>,
    #[serde(rename = "Division")]
    pub division: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Stadium {
    #[serde(rename = "StadiumID")]
    pub stadium_id: i64,
    #[serde(rename = "Name")]
    pub name: Option<String>,
    #[serde(rename = "City")]
    pub city: Option<String>,
    #[serde(rename = "State")]
    pub state: Option<String>,
    #[serde(rename = "Country")]
    pub country: Option<String>,
    #[serde(rename = "Capacity")]
    pub capacity: Option<u32>,
    #[serde(rename = "Surface")]
    pub surface: Option<String>,
}

// ---------------------------------------------------------------------------
// Feed sources
// ---------------------------------------------------------------------------

/// One play from `/api/v1/play-by-play`. Leagues fill different subsets:
/// MLB the hitter/pitcher fields, NFL `Team`, NBA/NHL `TeamID`.
#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct PlayEvent {
    #[serde(rename = "PlayID")]
    pub play_id: i64,
    #[serde(rename = "Updated")]
    pub updated: Option<String>,
    #[serde(rename = "Description")]
    pub description: Option<String>,
    #[serde(rename = "HitterTeamID")]
    pub hitter_team_id: Option<i64>,
    #[serde(rename = "HitterName")]
    pub hitter_name: Option<String>,
    #[serde(rename = "PitcherName")]
    pub pitcher_name: Option<String>,
    #[serde(rename = "InningHalf")]
    pub inning_half: Option<String>,
    #[serde(rename = "InningNumber")]
    pub inning_number: Option<u32>,
    #[serde(rename = "Outs")]
    pub outs: Option<u32>,
    #[serde(rename = "Strikeout")]
    pub strikeout: Option<bool>,
    #[serde(rename = "Walk")]
    pub walk: Option<bool>,
    #[serde(rename = "Hit")]
    pub hit: Option<bool>,
    #[serde(rename = "Sacrifice")]
    pub sacrifice: Option<bool>,
    #[serde(rename = "Out")]
    pub out: Option<bool>,
    #[serde(rename = "Runner1ID")]
    pub runner1_id: Option<i64>,
    #[serde(rename = "Runner2ID")]
    pub runner2_id: Option<i64>,
    #[serde(rename = "Runner3ID")]
    pub runner3_id: Option<i64>,
    #[serde(rename = "RunsBattedIn")]
    pub runs_batted_in: Option<u32>,
    #[serde(rename = "Team")]
    pub team: Option<String>,
    #[serde(rename = "TeamID")]
    pub team_id: Option<i64>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct RedditThread {
    pub id: Option<String>,
    pub title: Option<String>,
    pub permalink: Option<String>,
    pub subreddit: Option<String>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct RedditComment {
    pub id: String,
    pub author: String,
    pub content: String,
    /// Provider-local wall clock.
    pub timestamp: String,
    pub score: i64,
    pub permalink: String,
    pub subreddit: String,
    pub depth: u32,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct RedditPost {
    pub id: String,
    pub title: String,
    pub subreddit: String,
    pub comments: Vec<RedditComment>,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct RedditCommentsResponse {
    pub posts: Vec<RedditPost>,
    pub game_id: String,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct Tweet {
    pub id: String,
    pub url: String,
    pub text: String,
    #[serde(rename = "createdAt", alias = "created_at")]
    pub created_at: String,
}

#[derive(Debug, Deserialize, Default, Clone)]
#[serde(default)]
pub struct TwitterPage {
    pub tweets: Vec<Tweet>,
    pub has_next_page: bool,
    pub next_cursor: Option<String>,
}

fn opt_string_or_number<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Option::<Value>::deserialize(deserializer)? {
        Some(Value::String(s)) if !s.is_empty() => Some(s),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    })
}
