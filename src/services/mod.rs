/// Catalog views assembled from a record source
use crate::clients::{CatalogSource, Collection};
use crate::domain::raw::{decode_record, RawCompany, RawLaunch, RawLaunchSite, RawNews, RawRocket};
use crate::domain::{
    Company, Launch, LaunchSite, LaunchStatus, News, RecordId, Rocket, RocketFamily,
};
use crate::errors::{ApiError, ApiResult};
use crate::utils::{format_calendar_date, format_coordinates, parse_timestamp};
use chrono::{DateTime, Utc};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::sync::Arc;
use std::time::Duration;
use tracing::{debug, warn};

pub mod countdown;
pub mod facts;
pub mod ordering;
pub mod resolver;
pub mod timeline;

use countdown::{Countdown, CountdownTicker};
pub use facts::RocketFacts;
use ordering::{group_by_month, sort_by_instant, sort_launches, LaunchFilter, MonthGroup, SortOrder};
use resolver::{display_time, resolve_launch_time, resolved_instant};
use timeline::{mission_timeline, MissionPhase, MissionProfile};

const ROCKET_PAST_LAUNCHES: usize = 5;
const SITE_LAUNCHES: usize = 6;
const COMPANY_LAUNCHES: usize = 6;
const CARD_TAGS: usize = 3;
const RELATED_ARTICLES: usize = 3;

/// Launch as shown in list views
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchCard {
    pub id: RecordId,
    pub name: String,
    pub status: LaunchStatus,
    pub status_label: &'static str,
    pub summary: Option<String>,
    pub vehicle: Option<String>,
    pub site: Option<String>,
    pub provider: Option<String>,
    pub tags: Vec<String>,
    /// Resolved timestamp, verbatim
    pub resolved_at: Option<String>,
    pub display_date: String,
}

impl From<&Launch> for LaunchCard {
    fn from(launch: &Launch) -> Self {
        Self {
            id: launch.id.clone(),
            name: launch.name.clone(),
            status: launch.status,
            status_label: launch.status.label(),
            summary: launch.summary().map(str::to_string),
            vehicle: launch.vehicle_name().map(str::to_string),
            site: launch.site_name().map(str::to_string),
            provider: launch.provider_name().map(str::to_string),
            tags: launch.tags.iter().take(CARD_TAGS).cloned().collect(),
            resolved_at: resolve_launch_time(launch).map(str::to_string),
            display_date: display_time(launch),
        }
    }
}

fn cards(launches: &[Launch]) -> Vec<LaunchCard> {
    launches.iter().map(LaunchCard::from).collect()
}

/// Launch list parameters
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchQuery {
    pub filter: LaunchFilter,
    pub order: SortOrder,
    pub group_by_month: bool,
    pub limit: Option<usize>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum LaunchItems {
    Flat { launches: Vec<LaunchCard> },
    Grouped { months: Vec<MonthGroup<LaunchCard>> },
}

#[derive(Debug, Clone, Serialize)]
pub struct LaunchListing {
    pub total: usize,
    pub order: SortOrder,
    #[serde(flatten)]
    pub items: LaunchItems,
}

/// Countdown snapshot for one launch
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CountdownView {
    pub target: Option<DateTime<Utc>>,
    /// Whether the launch is scheduled with a known time
    pub active: bool,
    pub countdown: Countdown,
}

impl CountdownView {
    fn for_launch(launch: &Launch, now: DateTime<Utc>) -> Self {
        let target = countdown_target(launch);
        Self {
            target,
            active: target.is_some(),
            countdown: Countdown::until(target, now),
        }
    }
}

/// Only scheduled launches with a parseable time count down.
fn countdown_target(launch: &Launch) -> Option<DateTime<Utc>> {
    match launch.status {
        LaunchStatus::Scheduled => resolved_instant(launch),
        _ => None,
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct LaunchDetail {
    pub launch: Launch,
    pub card: LaunchCard,
    pub rocket: Option<Rocket>,
    pub site: Option<LaunchSite>,
    pub rocket_facts: RocketFacts,
    /// Present only for scheduled launches with a known time
    pub countdown: Option<CountdownView>,
    pub timeline: Vec<MissionPhase>,
    pub profile: MissionProfile,
}

#[derive(Debug, Clone, Serialize)]
pub struct RocketDetail {
    pub rocket: Rocket,
    pub facts: RocketFacts,
    pub upcoming: Vec<LaunchCard>,
    pub past: Vec<LaunchCard>,
}

#[derive(Debug, Clone, Serialize)]
pub struct LaunchSiteDetail {
    pub site: LaunchSite,
    pub coordinates: Option<String>,
    pub launches: Vec<LaunchCard>,
    /// Percentage of the listed launches that succeeded
    pub success_rate: u32,
    pub scheduled_count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct CompanyDetail {
    pub company: Company,
    pub rockets: Vec<Rocket>,
    pub active_rockets: usize,
    pub launches: Vec<LaunchCard>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewsItem {
    #[serde(flatten)]
    pub article: News,
    pub published: Option<String>,
}

impl From<News> for NewsItem {
    fn from(article: News) -> Self {
        let published = article
            .date
            .as_deref()
            .and_then(parse_timestamp)
            .map(|dt| format_calendar_date(&dt));
        Self { article, published }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsFeed {
    pub featured: Option<NewsItem>,
    pub articles: Vec<NewsItem>,
}

#[derive(Debug, Clone, Serialize)]
pub struct NewsDetail {
    pub article: NewsItem,
    pub related: Vec<NewsItem>,
}

fn same_id(a: &RecordId, b: &RecordId) -> bool {
    a.to_string() == b.to_string()
}

fn same_name(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

fn flown_on(launch: &Launch, rocket: &Rocket) -> bool {
    launch.vehicle.as_ref().is_some_and(|v| {
        same_name(&v.name, &rocket.name) || v.id.as_ref().is_some_and(|id| same_id(id, &rocket.id))
    })
}

fn launched_from(launch: &Launch, site: &LaunchSite) -> bool {
    launch.site.as_ref().is_some_and(|s| {
        same_name(&s.name, &site.name)
            || s.location.as_deref().is_some_and(|loc| same_name(loc, &site.name))
    })
}

fn built_by(rocket: &Rocket, company: &Company) -> bool {
    rocket.company_id.as_ref().is_some_and(|id| same_id(id, &company.id))
        || rocket
            .company
            .as_deref()
            .is_some_and(|name| same_name(name, &company.name))
}

fn success_rate(launches: &[Launch]) -> u32 {
    if launches.is_empty() {
        return 0;
    }
    let successful = launches
        .iter()
        .filter(|l| l.status == LaunchStatus::Successful)
        .count();
    (successful as f64 / launches.len() as f64 * 100.0).round() as u32
}

fn news_instant(item: &NewsItem) -> Option<DateTime<Utc>> {
    item.article.date.as_deref().and_then(parse_timestamp)
}

/// Read-only catalog service
pub struct CatalogService {
    source: Arc<dyn CatalogSource>,
    countdown_tick: Duration,
}

impl CatalogService {
    pub fn new(source: Arc<dyn CatalogSource>, countdown_tick: Duration) -> Self {
        Self {
            source,
            countdown_tick,
        }
    }

    pub fn source_name(&self) -> &'static str {
        self.source.name()
    }

    /// Every valid record of a collection; invalid ones are logged and skipped
    async fn load_all<R, T>(&self, collection: Collection) -> ApiResult<Vec<T>>
    where
        R: DeserializeOwned,
        T: TryFrom<R, Error = ApiError>,
    {
        let values = self.source.fetch_all(collection).await?;
        let fetched = values.len();

        let records: Vec<T> = values
            .into_iter()
            .filter_map(|value| match decode_record::<R, T>(value) {
                Ok(record) => Some(record),
                Err(e) => {
                    warn!(collection = collection.noun(), "skipping record: {}", e);
                    None
                }
            })
            .collect();

        debug!(
            collection = collection.noun(),
            fetched,
            kept = records.len(),
            "loaded collection"
        );
        Ok(records)
    }

    async fn load_one<R, T>(&self, collection: Collection, id: &str) -> ApiResult<T>
    where
        R: DeserializeOwned,
        T: TryFrom<R, Error = ApiError>,
    {
        let id = id.trim();
        match self.source.fetch_one(collection, id).await? {
            Some(value) => decode_record::<R, T>(value),
            None => Err(ApiError::not_found(collection.noun(), id, collection.path())),
        }
    }

    async fn launches(&self) -> ApiResult<Vec<Launch>> {
        self.load_all::<RawLaunch, Launch>(Collection::Launches).await
    }

    async fn rockets(&self) -> ApiResult<Vec<Rocket>> {
        self.load_all::<RawRocket, Rocket>(Collection::Rockets).await
    }

    async fn sites(&self) -> ApiResult<Vec<LaunchSite>> {
        self.load_all::<RawLaunchSite, LaunchSite>(Collection::LaunchBases)
            .await
    }

    async fn articles(&self) -> ApiResult<Vec<NewsItem>> {
        let news = self.load_all::<RawNews, News>(Collection::News).await?;
        let items = news.into_iter().map(NewsItem::from).collect();
        Ok(sort_by_instant(items, SortOrder::Desc, news_instant))
    }

    /// Filtered, sorted and optionally month-grouped launch cards
    pub async fn list_launches(&self, query: &LaunchQuery) -> ApiResult<LaunchListing> {
        let launches = query.filter.apply(self.launches().await?);
        let total = launches.len();

        let mut sorted = sort_launches(launches, query.order);
        if let Some(limit) = query.limit {
            sorted.truncate(limit);
        }

        let items = if query.group_by_month {
            let months = group_by_month(sorted, resolved_instant)
                .into_iter()
                .map(|group| MonthGroup {
                    key: group.key,
                    label: group.label,
                    items: cards(&group.items),
                })
                .collect();
            LaunchItems::Grouped { months }
        } else {
            LaunchItems::Flat {
                launches: cards(&sorted),
            }
        };

        Ok(LaunchListing {
            total,
            order: query.order,
            items,
        })
    }

    pub async fn launch_detail(&self, id: &str) -> ApiResult<LaunchDetail> {
        let launch: Launch = self
            .load_one::<RawLaunch, Launch>(Collection::Launches, id)
            .await?;

        let rocket = self
            .rockets()
            .await?
            .into_iter()
            .find(|r| flown_on(&launch, r));
        let site = self
            .sites()
            .await?
            .into_iter()
            .find(|s| launched_from(&launch, s));

        let vehicle_name = rocket
            .as_ref()
            .map(|r| r.name.as_str())
            .or_else(|| launch.vehicle_name());
        let family = rocket.as_ref().map_or_else(
            || vehicle_name.map_or(RocketFamily::Other, RocketFamily::from_name),
            |r| r.family,
        );

        let countdown = countdown_target(&launch)
            .is_some()
            .then(|| CountdownView::for_launch(&launch, Utc::now()));

        Ok(LaunchDetail {
            card: LaunchCard::from(&launch),
            rocket_facts: RocketFacts::new(vehicle_name.unwrap_or_default(), family),
            countdown,
            timeline: mission_timeline(family, vehicle_name),
            profile: MissionProfile::new(&launch.name, family),
            rocket,
            site,
            launch,
        })
    }

    /// Countdown snapshot taken now
    pub async fn countdown(&self, id: &str) -> ApiResult<CountdownView> {
        let launch: Launch = self
            .load_one::<RawLaunch, Launch>(Collection::Launches, id)
            .await?;
        Ok(CountdownView::for_launch(&launch, Utc::now()))
    }

    /// Snapshot plus a live ticker when the launch counts down
    pub async fn watch_countdown(
        &self,
        id: &str,
    ) -> ApiResult<(CountdownView, Option<CountdownTicker>)> {
        let view = self.countdown(id).await?;
        let ticker = view
            .target
            .map(|target| CountdownTicker::spawn(Some(target), self.countdown_tick));
        Ok((view, ticker))
    }

    pub async fn list_rockets(&self, active_only: bool) -> ApiResult<Vec<Rocket>> {
        let mut rockets = self.rockets().await?;
        if active_only {
            rockets.retain(|r| r.active);
        }
        Ok(rockets)
    }

    /// Rocket with its upcoming launches (soonest first) and latest past launches
    pub async fn rocket_detail(&self, id: &str) -> ApiResult<RocketDetail> {
        let rocket: Rocket = self
            .load_one::<RawRocket, Rocket>(Collection::Rockets, id)
            .await?;

        let (upcoming, past): (Vec<Launch>, Vec<Launch>) = self
            .launches()
            .await?
            .into_iter()
            .filter(|l| flown_on(l, &rocket))
            .partition(|l| l.status == LaunchStatus::Scheduled);

        let upcoming = sort_launches(upcoming, SortOrder::Asc);
        let mut past = sort_launches(past, SortOrder::Desc);
        past.truncate(ROCKET_PAST_LAUNCHES);

        Ok(RocketDetail {
            facts: RocketFacts::new(&rocket.name, rocket.family),
            upcoming: cards(&upcoming),
            past: cards(&past),
            rocket,
        })
    }

    pub async fn list_launch_sites(&self) -> ApiResult<Vec<LaunchSite>> {
        self.sites().await
    }

    pub async fn launch_site_detail(&self, id: &str) -> ApiResult<LaunchSiteDetail> {
        let site: LaunchSite = self
            .load_one::<RawLaunchSite, LaunchSite>(Collection::LaunchBases, id)
            .await?;

        let from_site: Vec<Launch> = self
            .launches()
            .await?
            .into_iter()
            .filter(|l| launched_from(l, &site))
            .collect();
        let mut launches = sort_launches(from_site, SortOrder::Desc);
        launches.truncate(SITE_LAUNCHES);

        let scheduled_count = launches
            .iter()
            .filter(|l| l.status == LaunchStatus::Scheduled)
            .count();

        Ok(LaunchSiteDetail {
            coordinates: site
                .latitude
                .zip(site.longitude)
                .map(|(lat, lon)| format_coordinates(lat, lon)),
            success_rate: success_rate(&launches),
            scheduled_count,
            launches: cards(&launches),
            site,
        })
    }

    pub async fn list_companies(&self) -> ApiResult<Vec<Company>> {
        self.load_all::<RawCompany, Company>(Collection::Companies)
            .await
    }

    pub async fn company_detail(&self, id: &str) -> ApiResult<CompanyDetail> {
        let company: Company = self
            .load_one::<RawCompany, Company>(Collection::Companies, id)
            .await?;

        let rockets: Vec<Rocket> = self
            .rockets()
            .await?
            .into_iter()
            .filter(|r| built_by(r, &company))
            .collect();
        let active_rockets = rockets.iter().filter(|r| r.active).count();

        let flown: Vec<Launch> = self
            .launches()
            .await?
            .into_iter()
            .filter(|l| rockets.iter().any(|r| flown_on(l, r)))
            .collect();
        let mut launches = sort_launches(flown, SortOrder::Desc);
        launches.truncate(COMPANY_LAUNCHES);

        Ok(CompanyDetail {
            company,
            rockets,
            active_rockets,
            launches: cards(&launches),
        })
    }

    /// Newest first; the newest article is featured
    pub async fn list_news(&self) -> ApiResult<NewsFeed> {
        let mut articles = self.articles().await?.into_iter();
        Ok(NewsFeed {
            featured: articles.next(),
            articles: articles.collect(),
        })
    }

    pub async fn news_detail(&self, id: &str) -> ApiResult<NewsDetail> {
        let article: News = self.load_one::<RawNews, News>(Collection::News, id).await?;

        let related = self
            .articles()
            .await?
            .into_iter()
            .filter(|item| !same_id(&item.article.id, &article.id))
            .take(RELATED_ARTICLES)
            .collect();

        Ok(NewsDetail {
            article: NewsItem::from(article),
            related,
        })
    }
}
