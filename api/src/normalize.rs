//! Per-league normalizers: raw schedule/score records plus side tables in,
//! canonical [`Game`] out.

use crate::box_score::BoxScoreCache;
use crate::dates::{utc_to_local_date, verbatim_date};
use crate::odds::{OddsTable, resolve_odds};
use crate::status::{is_postseason, map_optional_status};
use crate::wire::{BoxScoreDetail, MlbGame, NbaGame, NflScore, NhlGame, RawGameRecord, Stadium, TeamProfile};
use crate::{Bases, Game, GameProgress, InningHalf, League, Team, Venue};
use chrono::{Local, NaiveDate};
use chrono_tz::Tz;

/// Reference data a normalizer joins against.
#[derive(Debug, Clone, Copy, Default)]
pub struct SideTables<'a> {
    pub profiles: &'a [TeamProfile],
    pub stadiums: &'a [Stadium],
    pub odds: Option<&'a OddsTable>,
}

#[derive(Debug, Clone, Copy)]
pub struct NormalizeOptions {
    /// Zone used to turn UTC kick-off instants into calendar dates.
    pub display_tz: Tz,
    /// Date assigned to records that carry no usable timestamp.
    pub today: NaiveDate,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            display_tz: crate::dates::PROVIDER_TZ,
            today: Local::now().date_naive(),
        }
    }
}

/// Normalize one record. `None` means the record is not displayable
/// (MLB/NBA/NHL games whose teams are missing from the profile table).
///
/// A cached box score for the same game replaces the listing's scores,
/// status, progress and odds; team and venue joins always use the listing.
pub fn normalize(
    raw: &RawGameRecord,
    tables: SideTables<'_>,
    box_scores: &mut BoxScoreCache,
    options: &NormalizeOptions,
) -> Option<Game> {
    let id = raw.game_id()?;
    let detail = box_scores
        .get(&id)
        .map(|cached| cached.detail.clone())
        .filter(|detail| {
            let same_league = detail.league() == raw.league();
            if !same_league {
                log::warn!(
                    "ignoring {} box score cached under {} game {id}",
                    detail.league(),
                    raw.league()
                );
            }
            same_league
        });

    match (raw, detail) {
        (RawGameRecord::Mlb(listing), Some(BoxScoreDetail::Mlb(fresh))) => {
            normalize_mlb(id, listing, &fresh, tables, options)
        }
        (RawGameRecord::Mlb(listing), _) => normalize_mlb(id, listing, listing, tables, options),
        (RawGameRecord::Nfl(listing), Some(BoxScoreDetail::Nfl(fresh))) => {
            Some(normalize_nfl(id, listing, &fresh, tables, options))
        }
        (RawGameRecord::Nfl(listing), _) => Some(normalize_nfl(id, listing, listing, tables, options)),
        (RawGameRecord::Nba(listing), Some(BoxScoreDetail::Nba(fresh))) => {
            normalize_nba(id, listing, &fresh, tables, options)
        }
        (RawGameRecord::Nba(listing), _) => normalize_nba(id, listing, listing, tables, options),
        (RawGameRecord::Nhl(listing), Some(BoxScoreDetail::Nhl(fresh))) => {
            normalize_nhl(id, listing, &fresh, tables, options)
        }
        (RawGameRecord::Nhl(listing), _) => normalize_nhl(id, listing, listing, tables, options),
    }
}

pub fn normalize_all(
    records: &[RawGameRecord],
    tables: SideTables<'_>,
    box_scores: &mut BoxScoreCache,
    options: &NormalizeOptions,
) -> Vec<Game> {
    let games: Vec<Game> = records
        .iter()
        .filter_map(|raw| normalize(raw, tables, box_scores, options))
        .collect();
    if games.len() < records.len() {
        log::debug!("dropped {} undisplayable records", records.len() - games.len());
    }
    games
}

/// Live first, then upcoming, then finished; earliest start first within a
/// group, id as the final tie-break.
pub fn sort_for_display(games: &mut [Game]) {
    games.sort_by(|a, b| {
        a.status
            .display_rank()
            .cmp(&b.status.display_rank())
            .then_with(|| a.time.cmp(&b.time))
            .then_with(|| a.id.cmp(&b.id))
    });
}

/// Games whose partition date is `date`, without cancelled or
/// not-necessary ones.
pub fn games_on(games: &[Game], date: NaiveDate) -> Vec<&Game> {
    games
        .iter()
        .filter(|g| g.date == date && !g.status.is_hidden_by_default())
        .collect()
}

// ---------------------------------------------------------------------------
// Leagues
// ---------------------------------------------------------------------------

fn normalize_mlb(
    id: String,
    listing: &MlbGame,
    fresh: &MlbGame,
    tables: SideTables<'_>,
    options: &NormalizeOptions,
) -> Option<Game> {
    let (Some(home), Some(away)) = (
        find_profile(tables.profiles, listing.home_team_id),
        find_profile(tables.profiles, listing.away_team_id),
    ) else {
        log::debug!("mlb game {id}: team profile missing, skipping");
        return None;
    };
    let date = event_date(listing.date_time.as_deref(), options, DateRule::UtcToLocal);
    Some(Game {
        league: League::Mlb,
        home_team: team_from_profile(home, fresh.home_team_runs),
        away_team: team_from_profile(away, fresh.away_team_runs),
        status: map_optional_status(fresh.status.as_deref()),
        time: listing.date_time.clone().unwrap_or_default(),
        progress: GameProgress::Innings {
            inning: fresh.inning,
            half: fresh.inning_half.as_deref().and_then(InningHalf::parse),
            bases: Bases {
                first: fresh.runner_on_first.unwrap_or(false),
                second: fresh.runner_on_second.unwrap_or(false),
                third: fresh.runner_on_third.unwrap_or(false),
            },
        },
        is_postseason: is_postseason(League::Mlb, date),
        date,
        odds: resolve_odds(fresh, tables.odds),
        venue: find_venue(tables.stadiums, listing.stadium_id),
        score_id: None,
        division: home.division.clone(),
        weather: fresh.weather.clone().or_else(|| listing.weather.clone()),
        temperature: fresh.temperature.or(listing.temperature),
        id,
    })
}

/// NFL never drops a game: unknown teams fall back to the abbreviation and
/// then to a placeholder name.
fn normalize_nfl(
    id: String,
    listing: &NflScore,
    fresh: &NflScore,
    tables: SideTables<'_>,
    options: &NormalizeOptions,
) -> Game {
    let home_id = listing.home_team_id.or(listing.global_home_team_id);
    let away_id = listing.away_team_id.or(listing.global_away_team_id);
    let home_profile = find_nfl_profile(tables.profiles, home_id, listing.home_team.as_deref());
    let away_profile = find_nfl_profile(tables.profiles, away_id, listing.away_team.as_deref());

    let home_team = match home_profile {
        Some(profile) => team_from_profile(profile, fresh.home_score),
        None => fallback_team(listing.home_team.as_deref(), "Home Team", fresh.home_score),
    };
    let away_team = match away_profile {
        Some(profile) => team_from_profile(profile, fresh.away_score),
        None => fallback_team(listing.away_team.as_deref(), "Away Team", fresh.away_score),
    };

    let date = event_date(listing.date_time.as_deref(), options, DateRule::Verbatim);
    Game {
        league: League::Nfl,
        home_team,
        away_team,
        status: map_optional_status(fresh.status.as_deref()),
        time: listing.date_time.clone().unwrap_or_default(),
        progress: clock(fresh.quarter.clone(), fresh.time_remaining.clone()),
        is_postseason: is_postseason(League::Nfl, date),
        date,
        odds: resolve_odds(fresh, tables.odds),
        venue: find_venue(tables.stadiums, listing.stadium_id),
        score_id: listing.score_id.or(fresh.score_id).map(|s| s.to_string()),
        division: home_profile.and_then(|p| p.division.clone()),
        weather: fresh.weather.clone().or_else(|| listing.weather.clone()),
        temperature: fresh.temperature.or(listing.temperature),
        id,
    }
}

fn normalize_nba(
    id: String,
    listing: &NbaGame,
    fresh: &NbaGame,
    tables: SideTables<'_>,
    options: &NormalizeOptions,
) -> Option<Game> {
    let (Some(home), Some(away)) = (
        find_profile(tables.profiles, listing.home_team_id),
        find_profile(tables.profiles, listing.away_team_id),
    ) else {
        log::debug!("nba game {id}: team profile missing, skipping");
        return None;
    };
    let date = event_date(listing.date_time.as_deref(), options, DateRule::UtcToLocal);
    Some(Game {
        league: League::Nba,
        home_team: team_from_profile(home, fresh.home_team_score),
        away_team: team_from_profile(away, fresh.away_team_score),
        status: map_optional_status(fresh.status.as_deref()),
        time: listing.date_time.clone().unwrap_or_default(),
        progress: clock(
            fresh.quarter.clone(),
            remaining(fresh.time_remaining_minutes, fresh.time_remaining_seconds),
        ),
        is_postseason: is_postseason(League::Nba, date),
        date,
        odds: resolve_odds(fresh, tables.odds),
        venue: find_venue(tables.stadiums, listing.stadium_id),
        score_id: None,
        division: home.division.clone(),
        weather: None,
        temperature: None,
        id,
    })
}

fn normalize_nhl(
    id: String,
    listing: &NhlGame,
    fresh: &NhlGame,
    tables: SideTables<'_>,
    options: &NormalizeOptions,
) -> Option<Game> {
    let (Some(home), Some(away)) = (
        find_profile(tables.profiles, listing.home_team_id),
        find_profile(tables.profiles, listing.away_team_id),
    ) else {
        log::debug!("nhl game {id}: team profile missing, skipping");
        return None;
    };
    let date = event_date(
        listing.date_time_utc.as_deref().or(listing.date_time.as_deref()),
        options,
        DateRule::UtcToLocal,
    );
    Some(Game {
        league: League::Nhl,
        home_team: team_from_profile(home, fresh.home_team_score),
        away_team: team_from_profile(away, fresh.away_team_score),
        status: map_optional_status(fresh.status.as_deref()),
        time: listing
            .date_time_utc
            .clone()
            .or_else(|| listing.date_time.clone())
            .unwrap_or_default(),
        progress: clock(
            fresh.period.clone(),
            remaining(fresh.time_remaining_minutes, fresh.time_remaining_seconds),
        ),
        is_postseason: is_postseason(League::Nhl, date),
        date,
        odds: resolve_odds(fresh, tables.odds),
        venue: find_venue(tables.stadiums, listing.stadium_id),
        score_id: None,
        division: home.division.clone(),
        weather: None,
        temperature: None,
        id,
    })
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

enum DateRule {
    /// Read as UTC and view in the display zone.
    UtcToLocal,
    /// Take the calendar date from the string as written.
    Verbatim,
}

fn event_date(raw: Option<&str>, options: &NormalizeOptions, rule: DateRule) -> NaiveDate {
    raw.and_then(|raw| match rule {
        DateRule::UtcToLocal => utc_to_local_date(raw, options.display_tz),
        DateRule::Verbatim => verbatim_date(raw),
    })
    .unwrap_or(options.today)
}

fn find_profile(profiles: &[TeamProfile], team_id: Option<i64>) -> Option<&TeamProfile> {
    let team_id = team_id?;
    profiles.iter().find(|p| p.team_id == team_id)
}

fn find_nfl_profile<'a>(
    profiles: &'a [TeamProfile],
    team_id: Option<i64>,
    key: Option<&str>,
) -> Option<&'a TeamProfile> {
    profiles.iter().find(|p| {
        team_id.is_some_and(|id| p.team_id == id || p.global_team_id == Some(id))
            || key.is_some_and(|key| p.key.as_deref() == Some(key))
    })
}

fn team_from_profile(profile: &TeamProfile, score: Option<u32>) -> Team {
    let name = match (profile.city.as_deref(), profile.name.as_deref()) {
        (Some(city), Some(name)) => format!("{city} {name}"),
        (None, Some(name)) => name.to_owned(),
        (Some(city), None) => city.to_owned(),
        (None, None) => profile.key.clone().unwrap_or_default(),
    };
    Team {
        name,
        score: score.unwrap_or(0),
        logo_url: profile.logo_url.clone(),
    }
}

fn fallback_team(abbreviation: Option<&str>, placeholder: &str, score: Option<u32>) -> Team {
    Team {
        name: abbreviation
            .filter(|a| !a.trim().is_empty())
            .unwrap_or(placeholder)
            .to_owned(),
        score: score.unwrap_or(0),
        logo_url: None,
    }
}

fn find_venue(stadiums: &[Stadium], stadium_id: Option<i64>) -> Option<Venue> {
    let stadium_id = stadium_id?;
    let stadium = stadiums.iter().find(|s| s.stadium_id == stadium_id)?;
    Some(Venue {
        stadium_name: stadium.name.clone().unwrap_or_default(),
        city: stadium.city.clone(),
        state: stadium.state.clone(),
        country: stadium.country.clone(),
        capacity: stadium.capacity,
        surface: stadium.surface.clone(),
    })
}

fn clock(period: Option<String>, remaining: Option<String>) -> GameProgress {
    GameProgress::Clock { period, remaining }
}

fn remaining(minutes: Option<u32>, seconds: Option<u32>) -> Option<String> {
    match (minutes, seconds) {
        (None, None) => None,
        (m, s) => Some(format!("{}:{:02}", m.unwrap_or(0), s.unwrap_or(0))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::GameStatus;
    use crate::wire::FlatOdds;

    fn profile(team_id: i64, city: &str, name: &str) -> TeamProfile {
        TeamProfile {
            team_id,
            city: Some(city.into()),
            name: Some(name.into()),
            key: Some(name[..3].to_uppercase()),
            ..Default::default()
        }
    }

    fn profiles() -> Vec<TeamProfile> {
        vec![profile(1, "Boston", "Red Sox"), profile(2, "New York", "Yankees")]
    }

    fn options() -> NormalizeOptions {
        NormalizeOptions {
            display_tz: crate::dates::PROVIDER_TZ,
            today: NaiveDate::from_ymd_opt(2025, 7, 4).unwrap(),
        }
    }

    fn mlb(away_runs: u32) -> MlbGame {
        MlbGame {
            game_id: 100,
            status: Some("InProgress".into()),
            date_time: Some("2025-07-04T19:10:00".into()),
            home_team_id: Some(1),
            away_team_id: Some(2),
            home_team_runs: Some(1),
            away_team_runs: Some(away_runs),
            ..Default::default()
        }
    }

    fn nba(away_score: u32) -> NbaGame {
        NbaGame {
            game_id: 300,
            status: Some("InProgress".into()),
            date_time: Some("2025-01-16T00:30:00".into()),
            home_team_id: Some(1),
            away_team_id: Some(2),
            home_team_score: Some(88),
            away_team_score: Some(away_score),
            quarter: Some("4".into()),
            time_remaining_minutes: Some(7),
            time_remaining_seconds: Some(5),
            ..Default::default()
        }
    }

    fn nhl() -> NhlGame {
        NhlGame {
            game_id: 400,
            status: Some("InProgress".into()),
            date_time_utc: Some("2025-01-16T00:30:00".into()),
            date_time: Some("2025-01-20T19:30:00".into()),
            home_team_id: Some(1),
            away_team_id: Some(2),
            home_team_score: Some(2),
            away_team_score: Some(1),
            period: Some("2".into()),
            time_remaining_minutes: Some(12),
            ..Default::default()
        }
    }

    #[test]
    fn box_score_detail_overrides_listing_scores() {
        let profiles = profiles();
        let tables = SideTables { profiles: &profiles, ..Default::default() };
        let mut cache = BoxScoreCache::default();
        cache.fulfill("100", BoxScoreDetail::Mlb(mlb(5)));

        let game = normalize(&RawGameRecord::Mlb(mlb(2)), tables, &mut cache, &options()).unwrap();
        assert_eq!(game.away_team.score, 5);
        assert_eq!(game.away_team.name, "New York Yankees");
        assert_eq!(game.status, GameStatus::Live);
    }

    #[test]
    fn listing_is_used_without_cached_detail() {
        let profiles = profiles();
        let tables = SideTables { profiles: &profiles, ..Default::default() };
        let game = normalize(&RawGameRecord::Mlb(mlb(2)), tables, &mut BoxScoreCache::default(), &options())
            .unwrap();
        assert_eq!(game.away_team.score, 2);
        assert_eq!(game.id, "100");
    }

    #[test]
    fn detail_from_another_league_is_ignored() {
        let profiles = profiles();
        let tables = SideTables { profiles: &profiles, ..Default::default() };
        let mut cache = BoxScoreCache::default();
        cache.fulfill("100", BoxScoreDetail::Nba(NbaGame { away_team_score: Some(99), ..Default::default() }));
        let game = normalize(&RawGameRecord::Mlb(mlb(2)), tables, &mut cache, &options()).unwrap();
        assert_eq!(game.away_team.score, 2);
    }

    #[test]
    fn mlb_game_without_profiles_is_dropped() {
        let tables = SideTables::default();
        let out = normalize(&RawGameRecord::Mlb(mlb(2)), tables, &mut BoxScoreCache::default(), &options());
        assert!(out.is_none());
    }

    #[test]
    fn nba_and_nhl_games_without_profiles_are_dropped() {
        let only_home = vec![profile(1, "Boston", "Celtics")];
        let tables = SideTables { profiles: &only_home, ..Default::default() };
        let mut cache = BoxScoreCache::default();
        assert!(normalize(&RawGameRecord::Nba(nba(90)), tables, &mut cache, &options()).is_none());
        assert!(normalize(&RawGameRecord::Nhl(nhl()), tables, &mut cache, &options()).is_none());
    }

    #[test]
    fn nba_clock_and_box_score_override() {
        let profiles = vec![profile(1, "Boston", "Celtics"), profile(2, "New York", "Knicks")];
        let tables = SideTables { profiles: &profiles, ..Default::default() };
        let mut cache = BoxScoreCache::default();

        let listed = normalize(&RawGameRecord::Nba(nba(80)), tables, &mut cache, &options()).unwrap();
        assert_eq!(listed.away_team.score, 80);
        assert_eq!(listed.away_team.name, "New York Knicks");
        assert_eq!(listed.date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert_eq!(
            listed.progress,
            GameProgress::Clock { period: Some("4".into()), remaining: Some("7:05".into()) }
        );

        let mut fresh = nba(91);
        fresh.time_remaining_minutes = Some(0);
        fresh.time_remaining_seconds = Some(42);
        cache.fulfill("300", BoxScoreDetail::Nba(fresh));
        let game = normalize(&RawGameRecord::Nba(nba(80)), tables, &mut cache, &options()).unwrap();
        assert_eq!(game.away_team.score, 91);
        assert_eq!(game.home_team.score, 88);
        assert_eq!(
            game.progress,
            GameProgress::Clock { period: Some("4".into()), remaining: Some("0:42".into()) }
        );
    }

    #[test]
    fn nhl_prefers_the_utc_timestamp() {
        let profiles = vec![profile(1, "Boston", "Bruins"), profile(2, "Toronto", "Maple Leafs")];
        let tables = SideTables { profiles: &profiles, ..Default::default() };
        let game = normalize(&RawGameRecord::Nhl(nhl()), tables, &mut BoxScoreCache::default(), &options())
            .unwrap();
        assert_eq!(game.time, "2025-01-16T00:30:00");
        assert_eq!(game.date, NaiveDate::from_ymd_opt(2025, 1, 15).unwrap());
        assert_eq!(game.home_team.name, "Boston Bruins");
        // Seconds missing from the feed still render as "m:ss".
        assert_eq!(
            game.progress,
            GameProgress::Clock { period: Some("2".into()), remaining: Some("12:00".into()) }
        );

        let mut local_only = nhl();
        local_only.date_time_utc = None;
        let game = normalize(&RawGameRecord::Nhl(local_only), tables, &mut BoxScoreCache::default(), &options())
            .unwrap();
        assert_eq!(game.time, "2025-01-20T19:30:00");
        assert_eq!(game.date, NaiveDate::from_ymd_opt(2025, 1, 20).unwrap());
    }

    #[test]
    fn nfl_game_without_profiles_falls_back_to_abbreviations() {
        let raw = RawGameRecord::Nfl(NflScore {
            game_key: Some("202510101".into()),
            score_id: Some(18_001),
            home_team: Some("KC".into()),
            away_team: None,
            home_score: Some(21),
            date_time: Some("2025-10-12T20:20:00".into()),
            ..Default::default()
        });
        let game = normalize(&raw, SideTables::default(), &mut BoxScoreCache::default(), &options()).unwrap();
        assert_eq!(game.home_team.name, "KC");
        assert_eq!(game.away_team.name, "Away Team");
        assert_eq!(game.home_team.score, 21);
        assert_eq!(game.score_id.as_deref(), Some("18001"));
        assert_eq!(game.box_score_key(), crate::BoxScoreKey::ScoreId("18001".into()));
    }

    #[test]
    fn nfl_profile_matches_global_team_id() {
        let profiles = vec![TeamProfile {
            team_id: 16,
            global_team_id: Some(90_016),
            city: Some("Kansas City".into()),
            name: Some("Chiefs".into()),
            ..Default::default()
        }];
        let raw = RawGameRecord::Nfl(NflScore {
            game_key: Some("1".into()),
            global_home_team_id: Some(90_016),
            ..Default::default()
        });
        let tables = SideTables { profiles: &profiles, ..Default::default() };
        let game = normalize(&raw, tables, &mut BoxScoreCache::default(), &options()).unwrap();
        assert_eq!(game.home_team.name, "Kansas City Chiefs");
    }

    #[test]
    fn late_games_land_on_different_dates_per_league_rule() {
        // 01:08 UTC is the previous evening in New York.
        let profiles = profiles();
        let tables = SideTables { profiles: &profiles, ..Default::default() };
        let mut game = mlb(0);
        game.date_time = Some("2025-10-02T01:08:00".into());
        let mlb_game =
            normalize(&RawGameRecord::Mlb(game), tables, &mut BoxScoreCache::default(), &options()).unwrap();
        assert_eq!(mlb_game.date, NaiveDate::from_ymd_opt(2025, 10, 1).unwrap());
        assert!(mlb_game.is_postseason);

        let nfl = RawGameRecord::Nfl(NflScore {
            game_key: Some("2".into()),
            date_time: Some("2025-10-02T01:08:00".into()),
            ..Default::default()
        });
        let nfl_game = normalize(&nfl, tables, &mut BoxScoreCache::default(), &options()).unwrap();
        assert_eq!(nfl_game.date, NaiveDate::from_ymd_opt(2025, 10, 2).unwrap());
    }

    #[test]
    fn missing_timestamp_falls_back_to_today() {
        let profiles = profiles();
        let tables = SideTables { profiles: &profiles, ..Default::default() };
        let mut game = mlb(0);
        game.date_time = None;
        let out = normalize(&RawGameRecord::Mlb(game), tables, &mut BoxScoreCache::default(), &options()).unwrap();
        assert_eq!(out.date, options().today);
    }

    #[test]
    fn odds_come_from_fresher_detail() {
        let profiles = profiles();
        let tables = SideTables { profiles: &profiles, ..Default::default() };
        let mut fresh = mlb(3);
        fresh.odds = FlatOdds { home_money_line: Some(-120), ..Default::default() };
        let mut cache = BoxScoreCache::default();
        cache.fulfill("100", BoxScoreDetail::Mlb(fresh));
        let game = normalize(&RawGameRecord::Mlb(mlb(2)), tables, &mut cache, &options()).unwrap();
        assert_eq!(game.odds.and_then(|o| o.home_money_line), Some(-120));
    }

    #[test]
    fn display_sort_groups_by_status_then_time() {
        let profiles = profiles();
        let tables = SideTables { profiles: &profiles, ..Default::default() };
        let mut cache = BoxScoreCache::default();
        let records: Vec<RawGameRecord> = [
            (1, "Final", "2025-07-04T13:05:00"),
            (2, "Scheduled", "2025-07-04T19:05:00"),
            (3, "InProgress", "2025-07-04T16:05:00"),
            (4, "Scheduled", "2025-07-04T18:05:00"),
            (5, "Postponed", "2025-07-04T12:05:00"),
        ]
        .into_iter()
        .map(|(id, status, time)| {
            RawGameRecord::Mlb(MlbGame {
                game_id: id,
                status: Some(status.into()),
                date_time: Some(time.into()),
                ..mlb(0)
            })
        })
        .collect();

        let mut games = normalize_all(&records, tables, &mut cache, &options());
        sort_for_display(&mut games);
        let ids: Vec<&str> = games.iter().map(|g| g.id.as_str()).collect();
        assert_eq!(ids, vec!["3", "4", "2", "1", "5"]);

        let visible: Vec<&str> = games_on(&games, options().today).iter().map(|g| g.id.as_str()).collect();
        assert_eq!(visible, vec!["3", "4", "2", "1"]);
    }
}
