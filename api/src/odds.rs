use crate::Odds;
use crate::wire::{FlatOdds, GameOdd, MlbGame, NbaGame, NflScore, NhlGame, OddsRecord};
use std::collections::HashMap;

pub const DEFAULT_SPORTSBOOK: &str = "SportsData.io";

/// Anything that may carry betting lines, whether inline or as
/// pregame/live arrays.
pub trait OddsSource {
    fn flat_odds(&self) -> &FlatOdds;

    fn live_odds(&self) -> Option<&[GameOdd]> {
        None
    }

    fn pregame_odds(&self) -> Option<&[GameOdd]> {
        None
    }

    /// Key into the odds-by-date table, when the record has one.
    fn odds_game_id(&self) -> Option<i64> {
        None
    }
}

impl OddsSource for MlbGame {
    fn flat_odds(&self) -> &FlatOdds {
        &self.odds
    }
    fn live_odds(&self) -> Option<&[GameOdd]> {
        self.live_odds.as_deref()
    }
    fn pregame_odds(&self) -> Option<&[GameOdd]> {
        self.pregame_odds.as_deref()
    }
    fn odds_game_id(&self) -> Option<i64> {
        Some(self.game_id)
    }
}

impl OddsSource for NbaGame {
    fn flat_odds(&self) -> &FlatOdds {
        &self.odds
    }
    fn live_odds(&self) -> Option<&[GameOdd]> {
        self.live_odds.as_deref()
    }
    fn pregame_odds(&self) -> Option<&[GameOdd]> {
        self.pregame_odds.as_deref()
    }
    fn odds_game_id(&self) -> Option<i64> {
        Some(self.game_id)
    }
}

impl OddsSource for NhlGame {
    fn flat_odds(&self) -> &FlatOdds {
        &self.odds
    }
    fn odds_game_id(&self) -> Option<i64> {
        Some(self.game_id)
    }
}

impl OddsSource for NflScore {
    fn flat_odds(&self) -> &FlatOdds {
        &self.odds
    }
    fn odds_game_id(&self) -> Option<i64> {
        self.score_id
    }
}

impl OddsSource for OddsRecord {
    fn flat_odds(&self) -> &FlatOdds {
        &self.flat
    }
    fn live_odds(&self) -> Option<&[GameOdd]> {
        self.live_odds.as_deref()
    }
    fn pregame_odds(&self) -> Option<&[GameOdd]> {
        self.pregame_odds.as_deref()
    }
}

/// Odds-by-date records keyed by game id.
#[derive(Debug, Clone, Default)]
pub struct OddsTable(HashMap<i64, OddsRecord>);

impl OddsTable {
    pub fn new(records: Vec<OddsRecord>) -> Self {
        Self(records.into_iter().map(|r| (r.game_id, r)).collect())
    }

    pub fn get(&self, game_id: i64) -> Option<&OddsRecord> {
        self.0.get(&game_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Pick the first usable odds for a game.
///
/// Order: inline fields (only when the home money line is present), then
/// the first live line, then the first pregame line, then the same chain
/// over the odds-by-date entry for this game.
pub fn resolve_odds<S: OddsSource + ?Sized>(record: &S, table: Option<&OddsTable>) -> Option<Odds> {
    resolve_inline(record).or_else(|| {
        let id = record.odds_game_id()?;
        resolve_inline(table?.get(id)?)
    })
}

fn resolve_inline<S: OddsSource + ?Sized>(record: &S) -> Option<Odds> {
    let flat = record.flat_odds();
    if flat.home_money_line.is_some() {
        return Some(from_flat(flat));
    }
    record
        .live_odds()
        .and_then(<[GameOdd]>::first)
        .or_else(|| record.pregame_odds().and_then(<[GameOdd]>::first))
        .map(from_line)
}

fn from_flat(flat: &FlatOdds) -> Odds {
    Odds {
        home_money_line: flat.home_money_line,
        away_money_line: flat.away_money_line,
        home_point_spread: flat.point_spread,
        away_point_spread: mirror_spread(flat.away_point_spread, flat.point_spread),
        over_under: flat.over_under,
        over_payout: flat.over_payout,
        under_payout: flat.under_payout,
        sportsbook: sportsbook(flat.sportsbook.as_deref()),
    }
}

fn from_line(line: &GameOdd) -> Odds {
    Odds {
        home_money_line: line.home_money_line,
        away_money_line: line.away_money_line,
        home_point_spread: line.home_point_spread,
        away_point_spread: mirror_spread(line.away_point_spread, line.home_point_spread),
        over_under: line.over_under,
        over_payout: line.over_payout,
        under_payout: line.under_payout,
        sportsbook: sportsbook(line.sportsbook.as_deref()),
    }
}

/// Away spread is the negated home spread when the provider omits it.
fn mirror_spread(away: Option<f64>, home: Option<f64>) -> Option<f64> {
    away.or_else(|| home.map(|h| if h == 0.0 { 0.0 } else { -h }))
}

fn sportsbook(name: Option<&str>) -> String {
    match name.map(str::trim) {
        Some(name) if !name.is_empty() => name.to_owned(),
        _ => DEFAULT_SPORTSBOOK.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn line(book: &str, home_ml: i32, spread: f64) -> GameOdd {
        GameOdd {
            sportsbook: Some(book.into()),
            home_money_line: Some(home_ml),
            away_money_line: Some(-home_ml),
            home_point_spread: Some(spread),
            ..Default::default()
        }
    }

    #[test]
    fn inline_odds_beat_live_odds() {
        let game = MlbGame {
            odds: FlatOdds { home_money_line: Some(-150), ..Default::default() },
            live_odds: Some(vec![line("DraftKings", 120, 1.5)]),
            ..Default::default()
        };
        let odds = resolve_odds(&game, None).unwrap();
        assert_eq!(odds.home_money_line, Some(-150));
        assert_eq!(odds.sportsbook, DEFAULT_SPORTSBOOK);
    }

    #[test]
    fn live_odds_beat_pregame_odds() {
        let game = NbaGame {
            live_odds: Some(vec![line("FanDuel", -110, -3.5)]),
            pregame_odds: Some(vec![line("Caesars", 200, 7.0)]),
            ..Default::default()
        };
        let odds = resolve_odds(&game, None).unwrap();
        assert_eq!(odds.sportsbook, "FanDuel");
        assert_eq!(odds.home_money_line, Some(-110));
    }

    #[test]
    fn away_spread_mirrors_home_spread() {
        let game = MlbGame {
            odds: FlatOdds {
                home_money_line: Some(-150),
                point_spread: Some(-1.5),
                ..Default::default()
            },
            ..Default::default()
        };
        let odds = resolve_odds(&game, None).unwrap();
        assert_eq!(odds.home_point_spread, Some(-1.5));
        assert_eq!(odds.away_point_spread, Some(1.5));
    }

    #[test]
    fn pick_em_spread_stays_zero() {
        assert_eq!(mirror_spread(None, Some(0.0)), Some(0.0));
        assert_eq!(mirror_spread(Some(2.5), Some(-1.5)), Some(2.5));
        assert_eq!(mirror_spread(None, None), None);
    }

    #[test]
    fn spread_without_money_line_is_not_usable() {
        let game = MlbGame {
            odds: FlatOdds { point_spread: Some(-1.5), ..Default::default() },
            ..Default::default()
        };
        assert_eq!(resolve_odds(&game, None), None);
    }

    #[test]
    fn table_entry_is_consulted_last() {
        let game = MlbGame { game_id: 42, ..Default::default() };
        let table = OddsTable::new(vec![OddsRecord {
            game_id: 42,
            pregame_odds: Some(vec![line("BetMGM", 135, 1.5)]),
            ..Default::default()
        }]);
        let odds = resolve_odds(&game, Some(&table)).unwrap();
        assert_eq!(odds.sportsbook, "BetMGM");
        assert_eq!(odds.away_point_spread, Some(-1.5));
    }

    #[test]
    fn no_odds_anywhere_resolves_to_none() {
        let game = NhlGame { game_id: 7, ..Default::default() };
        assert_eq!(resolve_odds(&game, Some(&OddsTable::default())), None);
    }
}
