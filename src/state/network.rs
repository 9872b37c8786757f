use crate::state::messages::{NetworkRequest, NetworkResponse};
use arb_api::client::{ApiError, ArbApi, FetchError};
use arb_api::status::is_postseason;
use log::{debug, error, warn};
use tokio::sync::{mpsc, watch};
use tokio::task::JoinSet;

/// Executes requests from the app concurrently and reports each outcome.
///
/// Every request gets its own task so a slow source never holds up the
/// others. Tasks live in a `JoinSet`; when the cancel signal fires (or the
/// request channel closes) the set is dropped and in-flight fetches abort.
pub struct NetworkWorker {
    client: ArbApi,
    requests: mpsc::Receiver<NetworkRequest>,
    responses: mpsc::Sender<NetworkResponse>,
    cancel: watch::Receiver<bool>,
}

impl NetworkWorker {
    pub fn new(
        client: ArbApi,
        requests: mpsc::Receiver<NetworkRequest>,
        responses: mpsc::Sender<NetworkResponse>,
        cancel: watch::Receiver<bool>,
    ) -> Self {
        Self { client, requests, responses, cancel }
    }

    pub async fn run(mut self) {
        let mut tasks = JoinSet::new();

        loop {
            tokio::select! {
                changed = self.cancel.changed() => {
                    // A dropped sender counts as cancellation.
                    if changed.is_err() || *self.cancel.borrow() {
                        debug!("network worker cancelled, aborting {} in-flight requests", tasks.len());
                        break;
                    }
                }
                request = self.requests.recv() => {
                    let Some(request) = request else { break };
                    let client = self.client.clone();
                    let responses = self.responses.clone();
                    tasks.spawn(async move {
                        let response = handle(&client, request).await;
                        if let Err(e) = responses.send(response).await {
                            debug!("dropping network response, receiver gone: {e}");
                        }
                    });
                }
                Some(joined) = tasks.join_next(), if !tasks.is_empty() => {
                    if let Err(e) = joined
                        && e.is_panic()
                    {
                        error!("network task panicked: {e}");
                    }
                }
            }
        }

        tasks.abort_all();
    }
}

/// Perform one request. Failures are folded into the response; nothing
/// escapes as an error so the caller's poll keeps running.
pub async fn handle(client: &ArbApi, request: NetworkRequest) -> NetworkResponse {
    match request {
        NetworkRequest::LoadScores { league, date, upcoming, cache } => {
            let result = if upcoming {
                debug!("loading {league} schedule for {date}");
                client.fetch_schedule(league, date, is_postseason(league, date)).await
            } else {
                debug!("loading {league} scores for {date}");
                client.fetch_scores(league, date, cache).await
            };
            NetworkResponse::ScoresLoaded { league, date, result: summarize(result, "scores") }
        }
        NetworkRequest::LoadTeamProfiles { league } => NetworkResponse::TeamProfilesLoaded {
            result: summarize(client.fetch_team_profiles(league).await, "team profiles"),
        },
        NetworkRequest::LoadStadiums { league } => NetworkResponse::StadiumsLoaded {
            result: summarize(client.fetch_stadiums(league).await, "stadiums"),
        },
        NetworkRequest::LoadOdds { league, date } => NetworkResponse::OddsLoaded {
            result: summarize(client.fetch_odds_by_date(league, date).await, "odds"),
        },
        NetworkRequest::LoadBoxScore { league, game_id, key, cache } => {
            debug!("loading box score for {game_id}");
            let result = client.fetch_box_score(league, &key, cache).await;
            NetworkResponse::BoxScoreLoaded { game_id, result: summarize(result, "box score") }
        }
        NetworkRequest::LoadPlayByPlay { league, game_id, interval } => {
            let result = client.fetch_play_by_play(league, &game_id, interval).await;
            NetworkResponse::PlayByPlayLoaded { game_id, result: summarize(result, "play-by-play") }
        }
        NetworkRequest::FindRedditThread { subreddit, league } => {
            let result = client.find_reddit_thread(&subreddit, league).await;
            NetworkResponse::RedditThreadFound { subreddit, result: summarize(result, "reddit thread") }
        }
        NetworkRequest::LoadRedditComments { subreddit, game_id, kind } => {
            let result = client.fetch_reddit_comments(&subreddit, &game_id, &kind).await;
            NetworkResponse::RedditCommentsLoaded {
                subreddit,
                result: summarize(result, "reddit comments"),
            }
        }
        NetworkRequest::SearchTwitter { query, order, cursor } => {
            let result = client.search_twitter(&query, order, cursor.as_deref()).await;
            NetworkResponse::TwitterLoaded { query, result: summarize(result, "twitter") }
        }
    }
}

fn summarize<T>(result: Result<T, ApiError>, source: &str) -> Result<T, FetchError> {
    result.map_err(|e| {
        if e.is_not_found() {
            debug!("{source}: {e}");
        } else {
            warn!("{source} request failed: {e}");
        }
        FetchError::from(e)
    })
}
