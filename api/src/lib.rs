pub mod box_score;
pub mod client;
pub mod dates;
pub mod feed;
pub mod normalize;
pub mod odds;
pub mod status;
pub mod wire;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

// ---------------------------------------------------------------------------
// Domain types: canonical model, independent of provider wire format
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum League {
    #[default]
    Mlb,
    Nfl,
    Nba,
    Nhl,
}

impl League {
    /// Query-string form used by every upstream endpoint.
    pub fn as_str(&self) -> &'static str {
        match self {
            League::Mlb => "mlb",
            League::Nfl => "nfl",
            League::Nba => "nba",
            League::Nhl => "nhl",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            League::Mlb => "MLB",
            League::Nfl => "NFL",
            League::Nba => "NBA",
            League::Nhl => "NHL",
        }
    }

    pub fn hashtag(&self) -> String {
        format!("#{}", self.label())
    }
}

impl fmt::Display for League {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for League {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "mlb" => Ok(League::Mlb),
            "nfl" => Ok(League::Nfl),
            "nba" => Ok(League::Nba),
            "nhl" => Ok(League::Nhl),
            other => Err(format!("unsupported league: {other}")),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GameStatus {
    Live,
    Final,
    #[default]
    Upcoming,
    Cancelled,
    NotNecessary,
}

impl GameStatus {
    pub fn label(&self) -> &'static str {
        match self {
            GameStatus::Live => "LIVE",
            GameStatus::Final => "FINAL",
            GameStatus::Upcoming => "UPCOMING",
            GameStatus::Cancelled => "CANCELLED",
            GameStatus::NotNecessary => "NOT NECESSARY",
        }
    }

    /// Scoreboard ordering: live games first, then upcoming, then finished.
    pub fn display_rank(&self) -> u8 {
        match self {
            GameStatus::Live => 0,
            GameStatus::Upcoming => 1,
            GameStatus::Final => 2,
            GameStatus::Cancelled => 3,
            GameStatus::NotNecessary => 4,
        }
    }

    pub fn is_hidden_by_default(&self) -> bool {
        matches!(self, GameStatus::Cancelled | GameStatus::NotNecessary)
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Team {
    pub name: String,
    pub score: u32,
    pub logo_url: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InningHalf {
    Top,
    Bottom,
}

impl InningHalf {
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim() {
            "T" | "t" | "Top" | "top" => Some(InningHalf::Top),
            "B" | "b" | "Bottom" | "bottom" => Some(InningHalf::Bottom),
            _ => None,
        }
    }

    pub fn marker(&self) -> char {
        match self {
            InningHalf::Top => '▲',
            InningHalf::Bottom => '▼',
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Bases {
    pub first: bool,
    pub second: bool,
    pub third: bool,
}

/// League-specific in-game state.
#[derive(Debug, Clone, PartialEq)]
pub enum GameProgress {
    Innings {
        inning: Option<u32>,
        half: Option<InningHalf>,
        bases: Bases,
    },
    /// Quarter/period plus the clock, as "m:ss" when the provider sends it.
    Clock {
        period: Option<String>,
        remaining: Option<String>,
    },
}

#[derive(Debug, Clone, PartialEq)]
pub struct Odds {
    pub home_money_line: Option<i32>,
    pub away_money_line: Option<i32>,
    pub home_point_spread: Option<f64>,
    pub away_point_spread: Option<f64>,
    pub over_under: Option<f64>,
    pub over_payout: Option<i32>,
    pub under_payout: Option<i32>,
    pub sportsbook: String,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Venue {
    pub stadium_name: String,
    pub city: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
    pub capacity: Option<u32>,
    pub surface: Option<String>,
}

/// One scheduled, live or finished contest.
///
/// Only the normalizers in [`normalize`] build this type, so status, date and
/// odds are always derived the same way.
#[derive(Debug, Clone, PartialEq)]
#[non_exhaustive]
pub struct Game {
    pub id: String,
    pub league: League,
    pub home_team: Team,
    pub away_team: Team,
    pub status: GameStatus,
    /// Start instant exactly as the provider sent it.
    pub time: String,
    /// Partition key for "games on day X".
    pub date: NaiveDate,
    pub progress: GameProgress,
    pub is_postseason: bool,
    pub odds: Option<Odds>,
    pub venue: Option<Venue>,
    /// NFL box scores are keyed by score id rather than game key.
    pub score_id: Option<String>,
    pub division: Option<String>,
    pub weather: Option<String>,
    pub temperature: Option<i32>,
}

impl Game {
    pub fn is_live(&self) -> bool {
        self.status == GameStatus::Live
    }

    /// Identifier the box-score endpoint expects for this game.
    pub fn box_score_key(&self) -> BoxScoreKey {
        match (self.league, &self.score_id) {
            (League::Nfl, Some(score_id)) => BoxScoreKey::ScoreId(score_id.clone()),
            _ => BoxScoreKey::GameId(self.id.clone()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BoxScoreKey {
    GameId(String),
    ScoreId(String),
}

impl BoxScoreKey {
    pub fn query_pair(&self) -> (&'static str, &str) {
        match self {
            BoxScoreKey::GameId(id) => ("game_id", id),
            BoxScoreKey::ScoreId(id) => ("score_id", id),
        }
    }
}
