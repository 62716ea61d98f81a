/// HTTP request handlers
use crate::domain::{Health, LaunchStatus};
use crate::errors::{ApiError, ApiResult};
use crate::services::countdown::Countdown;
use crate::services::ordering::{LaunchFilter, SortOrder};
use crate::services::{
    CatalogService, CompanyDetail, CountdownView, LaunchDetail, LaunchListing, LaunchQuery,
    LaunchSiteDetail, NewsDetail, NewsFeed, RocketDetail,
};
use axum::{
    extract::{Path, Query, State},
    response::sse::{Event, KeepAlive, Sse},
    Json,
};
use chrono::Utc;
use futures::stream::Stream;
use serde::Serialize;
use serde_json::Value;
use std::collections::HashMap;
use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

/// Application state shared across handlers
#[derive(Clone)]
pub struct AppState {
    pub catalog: Arc<CatalogService>,
}

/// Successful response wrapper
#[derive(Serialize)]
pub struct SuccessResponse<T: Serialize> {
    pub ok: bool,
    #[serde(flatten)]
    pub data: T,
}

impl<T: Serialize> SuccessResponse<T> {
    pub fn new(data: T) -> Self {
        Self { ok: true, data }
    }
}

type Params = HashMap<String, String>;

fn param<'a>(params: &'a Params, key: &str) -> Option<&'a str> {
    params
        .get(key)
        .map(|v| v.trim())
        .filter(|v| !v.is_empty())
}

fn flag(params: &Params, key: &str) -> ApiResult<bool> {
    match param(params, key) {
        None => Ok(false),
        Some("true" | "1" | "yes") => Ok(true),
        Some("false" | "0" | "no") => Ok(false),
        Some(other) => Err(ApiError::InvalidInput(format!(
            "'{key}' must be true or false, got '{other}'"
        ))),
    }
}

/// Launch list query string into a [`LaunchQuery`]
fn launch_query(params: &Params) -> ApiResult<LaunchQuery> {
    let status = param(params, "status")
        .map(|s| {
            LaunchStatus::parse(s)
                .ok_or_else(|| ApiError::InvalidInput(format!("unknown status '{s}'")))
        })
        .transpose()?;

    let order = param(params, "order")
        .map(|s| {
            SortOrder::parse(s)
                .ok_or_else(|| ApiError::InvalidInput(format!("unknown sort order '{s}'")))
        })
        .transpose()?
        .unwrap_or_default();

    let group_by_month = match param(params, "group") {
        None | Some("none") => false,
        Some("month") => true,
        Some(other) => {
            return Err(ApiError::InvalidInput(format!(
                "unknown grouping '{other}'"
            )))
        }
    };

    let limit = param(params, "limit")
        .map(|s| match s.parse::<usize>() {
            Ok(n) if n > 0 => Ok(n),
            _ => Err(ApiError::InvalidInput(format!(
                "limit must be a positive integer, got '{s}'"
            ))),
        })
        .transpose()?;

    let text = |key: &str| param(params, key).map(str::to_string);

    Ok(LaunchQuery {
        filter: LaunchFilter {
            status,
            q: text("q"),
            rocket: text("rocket"),
            site: text("site"),
            provider: text("provider"),
        },
        order,
        group_by_month,
        limit,
    })
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> Json<Health> {
    Json(Health {
        status: "ok",
        source: state.catalog.source_name(),
        now: Utc::now(),
    })
}

/// List launches
pub async fn list_launches(
    Query(params): Query<Params>,
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<LaunchListing>>, ApiError> {
    let query = launch_query(&params)?;
    let listing = state.catalog.list_launches(&query).await?;
    Ok(Json(SuccessResponse::new(listing)))
}

/// Launch with rocket, site, countdown and mission timeline
pub async fn get_launch(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<LaunchDetail>>, ApiError> {
    let detail = state.catalog.launch_detail(&id).await?;
    Ok(Json(SuccessResponse::new(detail)))
}

/// Countdown snapshot
pub async fn get_countdown(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<CountdownView>>, ApiError> {
    let view = state.catalog.countdown(&id).await?;
    Ok(Json(SuccessResponse::new(view)))
}

fn countdown_event(view: &CountdownView, countdown: Countdown) -> Event {
    let data = serde_json::to_string(&CountdownView { countdown, ..*view }).unwrap_or_default();
    Event::default().event("countdown").data(data)
}

/// Live countdown via Server-Sent Events.
///
/// Sends the current snapshot, then one event per tick until the countdown
/// reaches zero. Launches that do not count down get the snapshot only.
/// Disconnecting drops the ticker and stops its task.
pub async fn countdown_stream(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Sse<impl Stream<Item = Result<Event, Infallible>>>, ApiError> {
    let (view, ticker) = state.catalog.watch_countdown(&id).await?;

    let stream = async_stream::stream! {
        yield Ok(countdown_event(&view, view.countdown));

        if let Some(mut ticker) = ticker.filter(|_| !view.countdown.is_zero()) {
            while let Some(countdown) = ticker.changed().await {
                yield Ok(countdown_event(&view, countdown));
                if countdown.is_zero() {
                    break;
                }
            }
        }
    };

    Ok(Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("ping"),
    ))
}

/// List rockets
pub async fn list_rockets(
    Query(params): Query<Params>,
    State(state): State<AppState>,
) -> Result<Json<Value>, ApiError> {
    let active_only = flag(&params, "active")?;
    let rockets = state.catalog.list_rockets(active_only).await?;
    Ok(Json(serde_json::json!(SuccessResponse::new(
        serde_json::json!({
            "rockets": rockets
        })
    ))))
}

/// Rocket with its launches
pub async fn get_rocket(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<RocketDetail>>, ApiError> {
    let detail = state.catalog.rocket_detail(&id).await?;
    Ok(Json(SuccessResponse::new(detail)))
}

/// List launch sites
pub async fn list_launch_sites(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let sites = state.catalog.list_launch_sites().await?;
    Ok(Json(serde_json::json!(SuccessResponse::new(
        serde_json::json!({
            "launch_bases": sites
        })
    ))))
}

/// Launch site with recent launches and statistics
pub async fn get_launch_site(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<LaunchSiteDetail>>, ApiError> {
    let detail = state.catalog.launch_site_detail(&id).await?;
    Ok(Json(SuccessResponse::new(detail)))
}

/// List companies
pub async fn list_companies(State(state): State<AppState>) -> Result<Json<Value>, ApiError> {
    let companies = state.catalog.list_companies().await?;
    Ok(Json(serde_json::json!(SuccessResponse::new(
        serde_json::json!({
            "companies": companies
        })
    ))))
}

/// Company with its rockets and launches
pub async fn get_company(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<CompanyDetail>>, ApiError> {
    let detail = state.catalog.company_detail(&id).await?;
    Ok(Json(SuccessResponse::new(detail)))
}

/// News feed, newest first
pub async fn list_news(
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<NewsFeed>>, ApiError> {
    let feed = state.catalog.list_news().await?;
    Ok(Json(SuccessResponse::new(feed)))
}

/// News article with related articles
pub async fn get_news(
    Path(id): Path<String>,
    State(state): State<AppState>,
) -> Result<Json<SuccessResponse<NewsDetail>>, ApiError> {
    let detail = state.catalog.news_detail(&id).await?;
    Ok(Json(SuccessResponse::new(detail)))
}
