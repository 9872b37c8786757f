use tui::backend::Backend;
use tui::layout::{Constraint, Layout, Rect};
use tui::style::{Color, Modifier, Style};
use tui::text::{Line, Span};
use tui::widgets::{Block, BorderType, Borders, List, ListItem, Paragraph, Wrap};
use tui::{Frame, Terminal};
use tui_logger::TuiLoggerWidget;

use crate::app::App;
use crate::state::app_state::{Slot, SlotView};
use crate::ui::layout::{LayoutAreas, PINNED_PLAY_HEIGHT};
use arb_api::box_score::DetailState;
use arb_api::feed::{FeedEvent, FeedTeam, SourceType};
use arb_api::normalize::games_on;
use arb_api::{Game, GameProgress, GameStatus, Odds};
use chrono_tz::Tz;

pub fn draw<B>(terminal: &mut Terminal<B>, app: &mut App)
where
    B: Backend,
{
    let current_size = terminal.size().unwrap_or_default();
    if current_size.width <= 10 || current_size.height <= 10 {
        return;
    }

    if let Err(e) = terminal.draw(|f| render(f, app)) {
        log::error!("failed to draw frame: {e}");
    }
}

pub fn render(f: &mut Frame, app: &mut App) {
    let layout = LayoutAreas::new(f.area(), app.state.follow.is_some(), app.state.show_logs);

    draw_header(f, layout.header, app);
    draw_scoreboard(f, layout.scoreboard, app);
    if let Some(area) = layout.game {
        draw_followed_game(f, area, app);
    }
    if let Some(area) = layout.logs {
        draw_logs(f, area);
    }
}

pub fn default_border<'a>(color: Color) -> Block<'a> {
    Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(Style::default().fg(color))
}

fn dim() -> Style {
    Style::default().fg(Color::DarkGray)
}

fn warning() -> Style {
    Style::default().fg(Color::Red)
}

fn draw_header(f: &mut Frame, area: Rect, app: &App) {
    let line = Line::from(vec![
        Span::styled(
            format!(" {} ", app.state.league.label()),
            Style::default().add_modifier(Modifier::BOLD | Modifier::REVERSED),
        ),
        Span::raw(format!(" {}", app.state.date.format("%a %b %-d, %Y"))),
        Span::styled("   q quit  \" logs", dim()),
    ]);
    f.render_widget(Paragraph::new(line), area);
}

// ---------------------------------------------------------------------------
// Scoreboard
// ---------------------------------------------------------------------------

fn draw_scoreboard(f: &mut Frame, area: Rect, app: &App) {
    let block = default_border(Color::White).title(" Scoreboard ");
    let inner = block.inner(area);
    f.render_widget(block, area);

    let mut lines: Vec<Line> = Vec::new();
    match app.state.scores.view() {
        SlotView::Idle | SlotView::Loading => {
            f.render_widget(Paragraph::new("Loading scores...").style(dim()), inner);
            return;
        }
        SlotView::Failed(e) => {
            f.render_widget(
                Paragraph::new(format!("Scores unavailable: {e}"))
                    .style(warning())
                    .wrap(Wrap { trim: true }),
                inner,
            );
            return;
        }
        SlotView::Ready { stale_error, .. } => {
            if let Some(e) = stale_error {
                lines.push(Line::styled(format!("(showing last good scores: {e})"), warning()));
            }
        }
    }
    if let Some(e) = app.state.profiles.error().filter(|_| app.state.profiles.data().is_none()) {
        lines.push(Line::styled(format!("Team profiles unavailable: {e}"), warning()));
    }

    let games = games_on(&app.state.games, app.state.date);
    if games.is_empty() {
        lines.push(Line::styled("No games", dim()));
    }

    let followed = app.followed_game().map(|g| g.id.as_str());
    for game in games {
        let marker = if Some(game.id.as_str()) == followed { ">" } else { " " };
        let mut spans = vec![
            Span::raw(format!(
                "{marker} {} {} @ {} {}  ",
                game.away_team.name, game.away_team.score, game.home_team.name, game.home_team.score,
            )),
            Span::styled(
                format!("[{}]", status_text(game, app.settings.display_tz)),
                status_style(game.status),
            ),
        ];
        if game.is_postseason {
            spans.push(Span::styled(" [POST]", Style::default().fg(Color::Magenta)));
        }
        lines.push(Line::from(spans));
        if let Some(odds) = &game.odds {
            lines.push(Line::styled(format!("    {}", odds_text(odds)), dim()));
        }
    }

    f.render_widget(Paragraph::new(lines), inner);
}

fn status_style(status: GameStatus) -> Style {
    match status {
        GameStatus::Live => Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        GameStatus::Upcoming => Style::default().fg(Color::Yellow),
        GameStatus::Final => Style::default().fg(Color::Gray),
        GameStatus::Cancelled | GameStatus::NotNecessary => dim(),
    }
}

fn status_text(game: &Game, tz: Tz) -> String {
    match game.status {
        GameStatus::Live => format!("LIVE {}", progress_text(&game.progress)),
        GameStatus::Upcoming => arb_api::dates::parse_utc(&game.time)
            .map(|t| t.with_timezone(&tz).format("%-I:%M %p").to_string())
            .unwrap_or_else(|| GameStatus::Upcoming.label().to_string()),
        status => status.label().to_string(),
    }
}

fn progress_text(progress: &GameProgress) -> String {
    match progress {
        GameProgress::Innings { inning, half, bases } => {
            let half = half.map(|h| h.marker().to_string()).unwrap_or_default();
            let inning = inning.map(|i| i.to_string()).unwrap_or_default();
            let diamond: String = [bases.first, bases.second, bases.third]
                .iter()
                .map(|on| if *on { '◆' } else { '◇' })
                .collect();
            format!("{half}{inning} {diamond}")
        }
        GameProgress::Clock { period, remaining } => [period.as_deref(), remaining.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(" "),
    }
}

fn odds_text(odds: &Odds) -> String {
    let mut parts = Vec::new();
    if let (Some(away), Some(home)) = (odds.away_money_line, odds.home_money_line) {
        parts.push(format!("ML {away:+}/{home:+}"));
    }
    if let Some(spread) = odds.home_point_spread {
        parts.push(format!("Spread {spread:+}"));
    }
    if let Some(total) = odds.over_under {
        parts.push(format!("O/U {total}"));
    }
    parts.push(format!("({})", odds.sportsbook));
    parts.join("  ")
}

// ---------------------------------------------------------------------------
// Followed game and feed
// ---------------------------------------------------------------------------

fn draw_followed_game(f: &mut Frame, area: Rect, app: &mut App) {
    let tz = app.settings.display_tz;
    let Some(game_id) = app.state.follow.as_ref().map(|follow| follow.game_id.clone()) else {
        return;
    };
    let box_score = box_score_line(app.state.box_scores.state(&game_id), tz);
    let app = &*app;

    let Some(game) = app.followed_game() else {
        let block = default_border(Color::DarkGray).title(" Game ");
        f.render_widget(
            Paragraph::new(format!("Game {game_id} not on this scoreboard"))
                .style(dim())
                .block(block),
            area,
        );
        return;
    };

    let mut info = Vec::new();
    if let Some(venue) = &game.venue {
        let place = [venue.city.as_deref(), venue.state.as_deref()]
            .into_iter()
            .flatten()
            .collect::<Vec<_>>()
            .join(", ");
        info.push(Line::raw(format!("{} {place}", venue.stadium_name)));
    }
    if let Some(weather) = &game.weather {
        let temperature = game.temperature.map(|t| format!(", {t}°")).unwrap_or_default();
        info.push(Line::raw(format!("{weather}{temperature}")));
    }
    info.extend(box_score);
    if let Some(follow) = &app.state.follow {
        source_error(&mut info, "play-by-play", &follow.play_by_play);
        source_error(&mut info, "twitter", &follow.twitter);
        for (subreddit, slot) in &follow.threads {
            match slot.view() {
                SlotView::Ready { data: None, .. } => {
                    info.push(Line::styled(format!("r/{subreddit}: no game thread yet"), dim()));
                }
                SlotView::Failed(e) => info.push(Line::styled(format!("r/{subreddit}: {e}"), warning())),
                _ => {}
            }
        }
        for (subreddit, slot) in &follow.comments {
            source_error(&mut info, &format!("r/{subreddit} comments"), slot);
        }
    }

    let title = format!(" {} at {} ", game.away_team.name, game.home_team.name);
    let block = default_border(Color::White).title(title);
    let inner = block.inner(area);
    f.render_widget(block, area);

    let [info_area, pinned_area, feed_area] = Layout::vertical([
        Constraint::Length(info.len() as u16),
        Constraint::Length(PINNED_PLAY_HEIGHT),
        Constraint::Fill(1),
    ])
    .areas(inner);
    f.render_widget(Paragraph::new(info), info_area);

    let Some(follow) = &app.state.follow else {
        return;
    };
    let view = follow.timeline.view();

    let pinned_block = default_border(Color::Yellow).title(" Latest play ");
    let pinned = match view.pinned {
        Some(play) => Paragraph::new(event_line(play, tz)),
        None => Paragraph::new("--").style(dim()),
    };
    f.render_widget(pinned.block(pinned_block).wrap(Wrap { trim: true }), pinned_area);

    let feed_block = default_border(Color::DarkGray).title(" Feed ");
    if view.rest.is_empty() && view.pinned.is_none() {
        f.render_widget(
            Paragraph::new("Waiting for feed events...").style(dim()).block(feed_block),
            feed_area,
        );
        return;
    }
    let mut items: Vec<ListItem> = view.rest.iter().map(|event| ListItem::new(event_line(event, tz))).collect();
    if follow.twitter_cursor.is_some() {
        items.push(ListItem::new(Line::styled("(more tweets available)", dim())));
    }
    f.render_widget(List::new(items).block(feed_block), feed_area);
}

fn box_score_line(state: DetailState<'_>, tz: Tz) -> Option<Line<'static>> {
    match state {
        DetailState::Ready { stale_error: Some(e), .. } | DetailState::Failed(e) => {
            Some(Line::styled(format!("box score: {e}"), warning()))
        }
        DetailState::Ready { detail, stale_error: None } => Some(Line::styled(
            format!("box score as of {}", detail.fetched_at.with_timezone(&tz).format("%-I:%M:%S %p")),
            dim(),
        )),
        DetailState::Pending => Some(Line::styled("box score loading...", dim())),
        DetailState::Missing => None,
    }
}

fn source_error<T>(lines: &mut Vec<Line>, name: &str, slot: &Slot<T>) {
    if let Some(e) = slot.error() {
        lines.push(Line::styled(format!("{name}: {e}"), warning()));
    }
}

fn source_style(source: SourceType) -> Style {
    match source {
        SourceType::PlayByPlay => Style::default().fg(Color::Yellow),
        SourceType::Reddit => Style::default().fg(Color::LightRed),
        SourceType::Twitter => Style::default().fg(Color::LightBlue),
    }
}

fn event_line(event: &FeedEvent, tz: Tz) -> Line<'static> {
    let side = match event.team {
        FeedTeam::Home => "H",
        FeedTeam::Away => "A",
        FeedTeam::Other => "-",
    };
    Line::from(vec![
        Span::styled(event.timestamp_utc.with_timezone(&tz).format("%-I:%M:%S ").to_string(), dim()),
        Span::styled(format!("{:<7}", event.source.label()), source_style(event.source)),
        Span::raw(format!(" {side} ")),
        Span::styled(event.author.clone(), Style::default().add_modifier(Modifier::BOLD)),
        Span::raw(format!(": {}", event.content)),
    ])
}

fn draw_logs(f: &mut Frame, area: Rect) {
    f.render_widget(
        TuiLoggerWidget::default()
            .block(default_border(Color::DarkGray).title(" Logs "))
            .style_error(Style::default().fg(Color::Red))
            .style_warn(Style::default().fg(Color::Yellow))
            .style_info(Style::default().fg(Color::Cyan)),
        area,
    );
}
