use tui::layout::{Constraint, Layout, Rect};

pub const HEADER_HEIGHT: u16 = 1;
pub const LOG_HEIGHT: u16 = 10;
pub const PINNED_PLAY_HEIGHT: u16 = 4;

/// Pre-computed layout areas for one frame.
pub struct LayoutAreas {
    pub header: Rect,
    pub scoreboard: Rect,
    /// Followed game and its feed, beside the scoreboard.
    pub game: Option<Rect>,
    pub logs: Option<Rect>,
}

impl LayoutAreas {
    pub fn new(area: Rect, following: bool, show_logs: bool) -> Self {
        let log_height = if show_logs { LOG_HEIGHT } else { 0 };
        let [header, body, logs] = Layout::vertical([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Fill(1),
            Constraint::Length(log_height),
        ])
        .areas(area);
        let logs = show_logs.then_some(logs);

        if !following {
            return LayoutAreas { header, scoreboard: body, game: None, logs };
        }

        let [scoreboard, game] =
            Layout::horizontal([Constraint::Percentage(45), Constraint::Percentage(55)]).areas(body);
        LayoutAreas { header, scoreboard, game: Some(game), logs }
    }
}
