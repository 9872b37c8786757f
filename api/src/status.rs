use crate::{GameStatus, League};
use chrono::NaiveDate;

/// Map a raw provider status string onto the canonical status.
///
/// Total: anything unrecognised is `Upcoming`.
pub fn map_status(raw: &str) -> GameStatus {
    match raw.trim().to_ascii_lowercase().as_str() {
        "inprogress" | "live" | "halftime" | "delayed" => GameStatus::Live,
        "final" | "f/ot" | "f/so" | "completed" | "complete" | "closed" | "forfeit" => {
            GameStatus::Final
        }
        "canceled" | "cancelled" | "postponed" | "suspended" => GameStatus::Cancelled,
        "notnecessary" => GameStatus::NotNecessary,
        _ => GameStatus::Upcoming,
    }
}

/// `map_status` for fields the provider may leave out.
pub fn map_optional_status(raw: Option<&str>) -> GameStatus {
    raw.map(map_status).unwrap_or_default()
}

// ---------------------------------------------------------------------------
// Postseason windows, inclusive (start, end) per league and season
// ---------------------------------------------------------------------------

type Ymd = (i32, u32, u32);

const POSTSEASON_WINDOWS: &[(League, Ymd, Ymd)] = &[
    (League::Mlb, (2024, 10, 1), (2024, 11, 2)),
    (League::Mlb, (2025, 9, 30), (2025, 11, 1)),
    (League::Mlb, (2026, 9, 29), (2026, 11, 4)),
    (League::Nfl, (2025, 1, 11), (2025, 2, 9)),
    (League::Nfl, (2026, 1, 10), (2026, 2, 8)),
    (League::Nfl, (2027, 1, 9), (2027, 2, 14)),
    (League::Nba, (2025, 4, 15), (2025, 6, 22)),
    (League::Nba, (2026, 4, 14), (2026, 6, 21)),
    (League::Nhl, (2025, 4, 19), (2025, 6, 17)),
    (League::Nhl, (2026, 4, 18), (2026, 6, 20)),
];

/// Whether `date` falls inside a known postseason for `league`.
pub fn is_postseason(league: League, date: NaiveDate) -> bool {
    POSTSEASON_WINDOWS
        .iter()
        .filter(|(l, _, _)| *l == league)
        .filter_map(|(_, start, end)| Some((ymd(*start)?, ymd(*end)?)))
        .any(|(start, end)| (start..=end).contains(&date))
}

/// String form of [`is_postseason`]. Dates that don't parse as YYYY-MM-DD
/// are never postseason.
pub fn is_postseason_date(league: League, date: &str) -> bool {
    NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
        .map(|d| is_postseason(league, d))
        .unwrap_or(false)
}

fn ymd((y, m, d): Ymd) -> Option<NaiveDate> {
    NaiveDate::from_ymd_opt(y, m, d)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_statuses_map_to_canonical_values() {
        assert_eq!(map_status("Final"), GameStatus::Final);
        assert_eq!(map_status("Completed"), GameStatus::Final);
        assert_eq!(map_status("InProgress"), GameStatus::Live);
        assert_eq!(map_status("Live"), GameStatus::Live);
        assert_eq!(map_status("Scheduled"), GameStatus::Upcoming);
        assert_eq!(map_status("Postponed"), GameStatus::Cancelled);
        assert_eq!(map_status("Canceled"), GameStatus::Cancelled);
        assert_eq!(map_status("NotNecessary"), GameStatus::NotNecessary);
    }

    #[test]
    fn unknown_status_defaults_to_upcoming() {
        assert_eq!(map_status("Foo"), GameStatus::Upcoming);
        assert_eq!(map_status(""), GameStatus::Upcoming);
        assert_eq!(map_status("🦀"), GameStatus::Upcoming);
        assert_eq!(map_optional_status(None), GameStatus::Upcoming);
    }

    #[test]
    fn status_matching_ignores_case_and_padding() {
        assert_eq!(map_status("  inprogress "), GameStatus::Live);
        assert_eq!(map_status("F/OT"), GameStatus::Final);
    }

    #[test]
    fn postseason_lookup_uses_league_windows() {
        assert!(is_postseason_date(League::Mlb, "2025-10-05"));
        assert!(!is_postseason_date(League::Mlb, "2025-07-04"));
        assert!(is_postseason_date(League::Nfl, "2026-01-10"));
        assert!(is_postseason_date(League::Nfl, "2026-02-08"));
        assert!(!is_postseason_date(League::Nba, "2025-10-05"));
    }

    #[test]
    fn postseason_fails_open_outside_known_tables() {
        assert!(!is_postseason_date(League::Mlb, "1999-10-20"));
        assert!(!is_postseason_date(League::Nhl, "not-a-date"));
    }
}
