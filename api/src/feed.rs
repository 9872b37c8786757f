//! Unified game feed: play-by-play, Reddit comments and tweets mapped onto
//! one event type and merged into a single newest-first timeline.

use crate::dates::{parse_utc, provider_to_utc};
use crate::wire::{PlayEvent, RawGameRecord, RedditComment, TeamProfile, Tweet};
use crate::{InningHalf, League};
use chrono::{DateTime, Duration, Utc};
use chrono_tz::Tz;
use std::collections::HashSet;

pub const DEFAULT_REDDIT_DELAY_SECS: i64 = 30;
pub const DEFAULT_FEED_WINDOW: usize = 50;

const SCRAMBLED: &str = "Scrambled";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceType {
    PlayByPlay,
    Reddit,
    Twitter,
}

impl SourceType {
    pub fn label(&self) -> &'static str {
        match self {
            SourceType::PlayByPlay => "PLAY",
            SourceType::Reddit => "REDDIT",
            SourceType::Twitter => "TWITTER",
        }
    }

    fn id_prefix(&self) -> &'static str {
        match self {
            SourceType::PlayByPlay => "pbp",
            SourceType::Reddit => "reddit",
            SourceType::Twitter => "twitter",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedTeam {
    Home,
    Away,
    Other,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceDetail {
    pub score: Option<i64>,
    pub subreddit: Option<String>,
    pub url: Option<String>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct FeedEvent {
    /// `<source>-<upstream id>`, unique across sources.
    pub id: String,
    pub source: SourceType,
    pub timestamp_utc: DateTime<Utc>,
    pub content: String,
    pub author: String,
    pub team: FeedTeam,
    pub detail: SourceDetail,
}

/// How one side of the game is identified by each source.
#[derive(Debug, Clone, Default)]
pub struct TeamIdentity {
    pub name: String,
    /// Abbreviation, e.g. `KC`; NFL plays name their team this way.
    pub key: Option<String>,
    pub team_id: Option<i64>,
    pub subreddit: Option<String>,
}

#[derive(Debug, Clone)]
pub struct FeedContext {
    pub league: League,
    pub home: TeamIdentity,
    pub away: TeamIdentity,
    pub provider_tz: Tz,
    /// Added to Reddit timestamps before conversion to approximate posting lag.
    pub reddit_delay: Duration,
}

impl FeedContext {
    pub fn new(league: League, home: TeamIdentity, away: TeamIdentity) -> Self {
        Self {
            league,
            home,
            away,
            provider_tz: crate::dates::PROVIDER_TZ,
            reddit_delay: Duration::seconds(DEFAULT_REDDIT_DELAY_SECS),
        }
    }

    fn team_by_id(&self, id: Option<i64>) -> FeedTeam {
        match id {
            Some(id) if self.home.team_id == Some(id) => FeedTeam::Home,
            Some(id) if self.away.team_id == Some(id) => FeedTeam::Away,
            _ => FeedTeam::Other,
        }
    }

    fn team_by_key(&self, key: Option<&str>) -> FeedTeam {
        let Some(key) = key.map(str::trim).filter(|k| !k.is_empty()) else {
            return FeedTeam::Other;
        };
        let matches = |identity: &TeamIdentity| {
            identity.key.as_deref().is_some_and(|k| k.eq_ignore_ascii_case(key))
        };
        if matches(&self.home) {
            FeedTeam::Home
        } else if matches(&self.away) {
            FeedTeam::Away
        } else {
            FeedTeam::Other
        }
    }

    fn team_by_subreddit(&self, subreddit: &str) -> FeedTeam {
        let wanted = bare_subreddit(subreddit);
        let matches = |identity: &TeamIdentity| {
            identity
                .subreddit
                .as_deref()
                .is_some_and(|s| bare_subreddit(s).eq_ignore_ascii_case(wanted))
        };
        if matches(&self.home) {
            FeedTeam::Home
        } else if matches(&self.away) {
            FeedTeam::Away
        } else {
            FeedTeam::Other
        }
    }
}

/// Home and away identities for a listed game. Subreddits are left for
/// the caller to fill in.
pub fn team_identities(raw: &RawGameRecord, profiles: &[TeamProfile]) -> (TeamIdentity, TeamIdentity) {
    let (home_id, away_id, home_key, away_key) = match raw {
        RawGameRecord::Mlb(g) => (g.home_team_id, g.away_team_id, None, None),
        RawGameRecord::Nba(g) => (g.home_team_id, g.away_team_id, None, None),
        RawGameRecord::Nhl(g) => (g.home_team_id, g.away_team_id, None, None),
        RawGameRecord::Nfl(g) => (
            g.home_team_id.or(g.global_home_team_id),
            g.away_team_id.or(g.global_away_team_id),
            g.home_team.clone(),
            g.away_team.clone(),
        ),
    };
    (identity(profiles, home_id, home_key), identity(profiles, away_id, away_key))
}

fn identity(profiles: &[TeamProfile], team_id: Option<i64>, key: Option<String>) -> TeamIdentity {
    let profile = team_id.and_then(|id| {
        profiles
            .iter()
            .find(|p| p.team_id == id || p.global_team_id == Some(id))
    });
    let key = key.or_else(|| profile.and_then(|p| p.key.clone()));
    let name = profile
        .map(|p| {
            [p.city.as_deref(), p.name.as_deref()]
                .into_iter()
                .flatten()
                .collect::<Vec<_>>()
                .join(" ")
        })
        .filter(|name| !name.is_empty())
        .or_else(|| key.clone())
        .unwrap_or_default();
    TeamIdentity {
        name,
        key,
        team_id: profile.map(|p| p.team_id).or(team_id),
        subreddit: None,
    }
}

/// `r/RedSox` and `RedSox` name the same subreddit.
pub fn bare_subreddit(name: &str) -> &str {
    let name = name.trim();
    name.strip_prefix("r/")
        .or_else(|| name.strip_prefix("/r/"))
        .unwrap_or(name)
}

// ---------------------------------------------------------------------------
// Per-source mapping
// ---------------------------------------------------------------------------

pub fn from_play(play: &PlayEvent, ctx: &FeedContext) -> Option<FeedEvent> {
    let Some(raw) = play.updated.as_deref() else {
        log::warn!("dropping play {}: no timestamp", play.play_id);
        return None;
    };
    let Some(timestamp_utc) = provider_to_utc(raw, ctx.provider_tz, Duration::zero()) else {
        log::warn!("dropping play {}: unparseable timestamp {raw:?}", play.play_id);
        return None;
    };
    let team = match ctx.league {
        League::Mlb => ctx.team_by_id(play.hitter_team_id),
        League::Nfl => ctx.team_by_key(play.team.as_deref()),
        League::Nba | League::Nhl => ctx.team_by_id(play.team_id),
    };
    let (content, author) = match ctx.league {
        League::Mlb => (
            play_label(play),
            usable(play.hitter_name.as_deref()).unwrap_or("Play-by-play").to_owned(),
        ),
        _ => (
            usable(play.description.as_deref())
                .unwrap_or("Play in progress...")
                .to_owned(),
            "Play-by-play".to_owned(),
        ),
    };
    Some(FeedEvent {
        id: namespaced(SourceType::PlayByPlay, &play.play_id.to_string()),
        source: SourceType::PlayByPlay,
        timestamp_utc,
        content,
        author,
        team,
        detail: SourceDetail::default(),
    })
}

pub fn from_reddit(comment: &RedditComment, ctx: &FeedContext) -> Option<FeedEvent> {
    let Some(timestamp_utc) = provider_to_utc(&comment.timestamp, ctx.provider_tz, ctx.reddit_delay)
    else {
        log::warn!(
            "dropping reddit comment {}: unparseable timestamp {:?}",
            comment.id,
            comment.timestamp
        );
        return None;
    };
    Some(FeedEvent {
        id: namespaced(SourceType::Reddit, &comment.id),
        source: SourceType::Reddit,
        timestamp_utc,
        content: comment.content.clone(),
        author: comment.author.clone(),
        team: ctx.team_by_subreddit(&comment.subreddit),
        detail: SourceDetail {
            score: Some(comment.score),
            subreddit: Some(bare_subreddit(&comment.subreddit).to_owned()),
            url: Some(comment.permalink.clone()).filter(|p| !p.is_empty()),
        },
    })
}

pub fn from_tweet(tweet: &Tweet) -> Option<FeedEvent> {
    let Some(timestamp_utc) = parse_utc(&tweet.created_at) else {
        log::warn!("dropping tweet {}: unparseable timestamp {:?}", tweet.id, tweet.created_at);
        return None;
    };
    Some(FeedEvent {
        id: namespaced(SourceType::Twitter, &tweet.id),
        source: SourceType::Twitter,
        timestamp_utc,
        content: tweet.text.clone(),
        author: tweet_author(&tweet.url),
        team: FeedTeam::Other,
        detail: SourceDetail {
            url: Some(tweet.url.clone()).filter(|u| !u.is_empty()),
            ..Default::default()
        },
    })
}

fn namespaced(source: SourceType, id: &str) -> String {
    format!("{}-{id}", source.id_prefix())
}

/// Tweet urls look like `https://x.com/<handle>/status/<id>`.
fn tweet_author(url: &str) -> String {
    url.split('/')
        .nth(3)
        .filter(|handle| !handle.is_empty())
        .map_or_else(|| "Unknown".to_owned(), |handle| format!("@{handle}"))
}

fn usable(text: Option<&str>) -> Option<&str> {
    text.map(str::trim).filter(|t| !t.is_empty() && *t != SCRAMBLED)
}

/// Description for an MLB play, rebuilt from the structured fields when
/// the provider scrambled or omitted it.
pub fn play_label(play: &PlayEvent) -> String {
    let description = usable(play.description.as_deref());
    let batter = usable(play.hitter_name.as_deref()).unwrap_or("--");
    let pitcher = usable(play.pitcher_name.as_deref()).unwrap_or("--");

    let action = match description {
        Some(description) => description,
        None if play.strikeout == Some(true) => "struck out",
        None if play.walk == Some(true) => "walked",
        None if play.hit == Some(true) => "singled",
        None if play.sacrifice == Some(true) => "sacrifice",
        None if play.out == Some(true) => "grounded out",
        None => "in play",
    };

    let mut parts = vec![format!("vs {pitcher}")];

    let marker = match play.inning_half.as_deref().and_then(InningHalf::parse) {
        Some(InningHalf::Top) => InningHalf::Top.marker(),
        _ => InningHalf::Bottom.marker(),
    };
    let outs = play.outs.unwrap_or(0);
    parts.push(format!(
        "{marker} {}, {outs} out{}",
        play.inning_number.unwrap_or(0),
        if outs == 1 { "" } else { "s" }
    ));

    let runners: Vec<&str> = [
        (play.runner1_id, "1st"),
        (play.runner2_id, "2nd"),
        (play.runner3_id, "3rd"),
    ]
    .into_iter()
    .filter(|(id, _)| id.is_some_and(|id| id != 0))
    .map(|(_, base)| base)
    .collect();
    if !runners.is_empty() {
        parts.push(format!("runners on {}", runners.join(", ")));
    }

    if let Some(rbi) = play.runs_batted_in.filter(|rbi| *rbi > 0) {
        parts.push(format!("{rbi} RBI"));
    }

    format!("{batter} {action}, {}", parts.join(", "))
}

// ---------------------------------------------------------------------------
// Merge
// ---------------------------------------------------------------------------

/// Map and merge the three sources into one timeline.
///
/// Ids are unique (first occurrence wins) and the result is sorted newest
/// first; equal timestamps keep source order (plays, Reddit, Twitter).
pub fn merge(
    plays: &[PlayEvent],
    comments: &[RedditComment],
    tweets: &[Tweet],
    ctx: &FeedContext,
) -> Vec<FeedEvent> {
    let events = plays
        .iter()
        .filter_map(|p| from_play(p, ctx))
        .chain(comments.iter().filter_map(|c| from_reddit(c, ctx)))
        .chain(tweets.iter().filter_map(from_tweet));
    dedup_sorted(events)
}

fn dedup_sorted(events: impl IntoIterator<Item = FeedEvent>) -> Vec<FeedEvent> {
    let mut seen = HashSet::new();
    let mut out: Vec<FeedEvent> = events
        .into_iter()
        .filter(|event| seen.insert(event.id.clone()))
        .collect();
    out.sort_by(|a, b| b.timestamp_utc.cmp(&a.timestamp_utc));
    out
}

/// Feed accumulated across polling cycles, capped to the newest `capacity`.
#[derive(Debug, Clone)]
pub struct FeedTimeline {
    events: Vec<FeedEvent>,
    capacity: usize,
}

impl Default for FeedTimeline {
    fn default() -> Self {
        Self::new(DEFAULT_FEED_WINDOW)
    }
}

impl FeedTimeline {
    pub fn new(capacity: usize) -> Self {
        Self {
            events: Vec::new(),
            capacity: capacity.max(1),
        }
    }

    /// Fold freshly merged events in. A re-delivered id replaces the stored
    /// event so edits (score changes, corrected descriptions) show up.
    pub fn absorb(&mut self, incoming: impl IntoIterator<Item = FeedEvent>) {
        for event in incoming {
            match self.events.iter_mut().find(|e| e.id == event.id) {
                Some(existing) => *existing = event,
                None => self.events.push(event),
            }
        }
        self.events.sort_by(|a, b| b.timestamp_utc.cmp(&a.timestamp_utc));
        self.events.truncate(self.capacity);
    }

    pub fn events(&self) -> &[FeedEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn view(&self) -> FeedView<'_> {
        pin_latest_play(&self.events)
    }
}

/// A timeline split for display: the newest play sits in its own slot.
#[derive(Debug, Clone)]
pub struct FeedView<'a> {
    pub pinned: Option<&'a FeedEvent>,
    pub rest: Vec<&'a FeedEvent>,
}

pub fn pin_latest_play(events: &[FeedEvent]) -> FeedView<'_> {
    let pinned_idx = events.iter().position(|e| e.source == SourceType::PlayByPlay);
    FeedView {
        pinned: pinned_idx.map(|i| &events[i]),
        rest: events
            .iter()
            .enumerate()
            .filter(|(i, _)| Some(*i) != pinned_idx)
            .map(|(_, e)| e)
            .collect(),
    }
}

/// Twitter search string for a game: both team names, their hashtags and
/// the league hashtag, OR-ed together.
pub fn twitter_query(league: League, home: &str, away: &str) -> String {
    let mut terms: Vec<String> = Vec::new();
    for name in [home, away].map(str::trim).into_iter().filter(|n| !n.is_empty()) {
        terms.push(format!("\"{name}\""));
        if let Some(last) = name.split_whitespace().last() {
            terms.push(format!("#{last}"));
        }
    }
    terms.push(league.hashtag());
    terms.join(" OR ")
}
