/// Chronological ordering, month grouping and filtering of launches.
///
/// Launches whose time is unknown or unparseable always sort after every dated
/// launch, in both directions, keeping their input order.
use crate::domain::{Launch, LaunchStatus};
use crate::services::resolver::resolved_instant;
use crate::utils::contains_ignore_case;
use chrono::{DateTime, Datelike, Utc};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SortOrder {
    /// Most recent / future-most first
    #[default]
    Desc,
    /// Soonest first
    Asc,
}

impl SortOrder {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "desc" | "newest" => Some(Self::Desc),
            "asc" | "oldest" | "soonest" => Some(Self::Asc),
            _ => None,
        }
    }
}

fn compare_instants(
    a: Option<DateTime<Utc>>,
    b: Option<DateTime<Utc>>,
    order: SortOrder,
) -> Ordering {
    match (a, b) {
        (Some(a), Some(b)) => match order {
            SortOrder::Desc => b.cmp(&a),
            SortOrder::Asc => a.cmp(&b),
        },
        (Some(_), None) => Ordering::Less,
        (None, Some(_)) => Ordering::Greater,
        (None, None) => Ordering::Equal,
    }
}

/// Stable sort by an optional instant, unknown instants last
pub fn sort_by_instant<T, F>(items: Vec<T>, order: SortOrder, instant_of: F) -> Vec<T>
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    let mut keyed: Vec<(Option<DateTime<Utc>>, T)> =
        items.into_iter().map(|item| (instant_of(&item), item)).collect();
    keyed.sort_by(|(a, _), (b, _)| compare_instants(*a, *b, order));
    keyed.into_iter().map(|(_, item)| item).collect()
}

/// Stable sort by resolved launch time
pub fn sort_launches(launches: Vec<Launch>, order: SortOrder) -> Vec<Launch> {
    sort_by_instant(launches, order, resolved_instant)
}

/// Calendar bucket of consecutive launches sharing a year-month
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthGroup<T> {
    /// `YYYY-MM`, absent for launches without a known time
    pub key: Option<String>,
    /// `October 2025`, or `Date unknown`
    pub label: String,
    pub items: Vec<T>,
}

/// Partition an already sorted sequence into month buckets, preserving order
pub fn group_by_month<T, F>(items: Vec<T>, instant_of: F) -> Vec<MonthGroup<T>>
where
    F: Fn(&T) -> Option<DateTime<Utc>>,
{
    let mut groups: Vec<MonthGroup<T>> = Vec::new();

    for item in items {
        let instant = instant_of(&item);
        let key = instant.map(|dt| format!("{:04}-{:02}", dt.year(), dt.month()));

        match groups.last_mut() {
            Some(group) if group.key == key => group.items.push(item),
            _ => {
                let label = instant.map_or_else(
                    || "Date unknown".to_string(),
                    |dt| dt.format("%B %Y").to_string(),
                );
                groups.push(MonthGroup {
                    key,
                    label,
                    items: vec![item],
                });
            }
        }
    }

    groups
}

/// List filters; every set criterion must match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LaunchFilter {
    pub status: Option<LaunchStatus>,
    /// Case-insensitive name search
    pub q: Option<String>,
    pub rocket: Option<String>,
    pub site: Option<String>,
    pub provider: Option<String>,
}

impl LaunchFilter {
    pub fn matches(&self, launch: &Launch) -> bool {
        fn field_matches(value: Option<&str>, wanted: Option<&String>) -> bool {
            match wanted.map(|w| w.trim()).filter(|w| !w.is_empty()) {
                Some(w) => value.is_some_and(|v| contains_ignore_case(v, w)),
                None => true,
            }
        }

        self.status.map_or(true, |s| launch.status == s)
            && field_matches(Some(&launch.name), self.q.as_ref())
            && field_matches(launch.vehicle_name(), self.rocket.as_ref())
            && field_matches(launch.site_name(), self.site.as_ref())
            && field_matches(launch.provider_name(), self.provider.as_ref())
    }

    pub fn apply(&self, launches: Vec<Launch>) -> Vec<Launch> {
        launches.into_iter().filter(|l| self.matches(l)).collect()
    }
}
