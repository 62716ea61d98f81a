/// Domain models for the application
use crate::utils::{first_present, FieldAccessor};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod raw;

/// Record identifier; integer or string depending on backend revision
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(untagged)]
pub enum RecordId {
    Int(i64),
    Text(String),
}

impl RecordId {
    /// Compare against an id taken from a request path
    pub fn matches(&self, raw: &str) -> bool {
        match self {
            Self::Int(n) => raw.trim().parse::<i64>().map(|r| r == *n).unwrap_or(false),
            Self::Text(s) => s == raw.trim(),
        }
    }
}

impl fmt::Display for RecordId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Int(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LaunchStatus {
    Scheduled,
    Successful,
    Failed,
    Cancelled,
}

impl LaunchStatus {
    pub fn parse(value: &str) -> Option<Self> {
        match value.trim().to_lowercase().as_str() {
            "scheduled" => Some(Self::Scheduled),
            "successful" => Some(Self::Successful),
            "failed" => Some(Self::Failed),
            "cancelled" => Some(Self::Cancelled),
            _ => None,
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Scheduled => "Scheduled",
            Self::Successful => "Successful",
            Self::Failed => "Failed",
            Self::Cancelled => "Cancelled",
        }
    }
}

/// Rocket family, classified once from the vehicle name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RocketFamily {
    Falcon,
    Starship,
    NewShepard,
    Other,
}

impl RocketFamily {
    pub fn from_name(name: &str) -> Self {
        if name.contains("Falcon") {
            Self::Falcon
        } else if name.contains("Starship") {
            Self::Starship
        } else if name.contains("New Shepard") {
            Self::NewShepard
        } else {
            Self::Other
        }
    }

    /// Whether the family recovers and reflies hardware
    pub const fn is_reusable(self) -> bool {
        !matches!(self, Self::Other)
    }

    /// Only the Falcon family flies the booster-landing phase.
    pub const fn has_booster_landing(self) -> bool {
        matches!(self, Self::Falcon)
    }

    pub const fn reusability_label(self) -> &'static str {
        if self.is_reusable() {
            "Fully/Partially Reusable"
        } else {
            "Expendable"
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct VehicleRef {
    pub id: Option<RecordId>,
    pub name: String,
    pub company_id: Option<RecordId>,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SiteRef {
    pub id: Option<RecordId>,
    pub name: String,
    pub location: Option<String>,
    pub state: Option<String>,
    pub country: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct ProviderRef {
    pub id: Option<RecordId>,
    pub name: String,
    pub slug: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Mission {
    pub id: Option<RecordId>,
    pub name: String,
    pub description: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Weather {
    pub summary: Option<String>,
    pub temp: Option<f64>,
    pub condition: Option<String>,
    pub wind_mph: Option<f64>,
    pub icon: Option<String>,
    pub updated: Option<String>,
}

/// Candidate time fields of a launch, kept verbatim
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LaunchTiming {
    pub t0: Option<String>,
    pub window_open: Option<String>,
    pub win_open: Option<String>,
    pub date: Option<String>,
    pub created_at: Option<String>,
    pub window_close: Option<String>,
    /// Backend-formatted display string
    pub date_str: Option<String>,
}

/// Canonical launch record
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Launch {
    pub id: RecordId,
    pub name: String,
    pub status: LaunchStatus,
    pub quicktext: Option<String>,
    pub launch_description: Option<String>,
    pub mission_description: Option<String>,
    pub description: Option<String>,
    pub timing: LaunchTiming,
    pub vehicle: Option<VehicleRef>,
    pub site: Option<SiteRef>,
    pub provider: Option<ProviderRef>,
    pub tags: Vec<String>,
    pub missions: Vec<Mission>,
    pub cospar_id: Option<String>,
    pub slug: Option<String>,
    pub suborbital: Option<bool>,
    pub weather: Option<Weather>,
}

impl Launch {
    /// Short card text: quicktext, then launch, mission and legacy descriptions
    pub fn summary(&self) -> Option<&str> {
        const ORDER: &[FieldAccessor<Launch>] = &[
            |l| l.quicktext.as_deref(),
            |l| l.launch_description.as_deref(),
            |l| l.mission_description.as_deref(),
            |l| l.description.as_deref(),
        ];
        first_present(self, ORDER)
    }

    pub fn vehicle_name(&self) -> Option<&str> {
        self.vehicle.as_ref().map(|v| v.name.as_str())
    }

    pub fn site_name(&self) -> Option<&str> {
        self.site.as_ref().map(|s| s.name.as_str())
    }

    pub fn provider_name(&self) -> Option<&str> {
        self.provider.as_ref().map(|p| p.name.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Rocket {
    pub id: RecordId,
    pub name: String,
    pub company: Option<String>,
    pub company_id: Option<RecordId>,
    pub description: Option<String>,
    /// Metres
    pub height: Option<f64>,
    /// Metres
    pub diameter: Option<f64>,
    /// Kilograms
    pub mass: Option<f64>,
    pub active: bool,
    pub family: RocketFamily,
    pub reusable: bool,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LaunchSite {
    pub id: RecordId,
    pub name: String,
    pub location: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Company {
    pub id: RecordId,
    pub name: String,
    pub description: Option<String>,
    pub founded: Option<i32>,
    pub founder: Option<String>,
    pub headquarters: Option<String>,
    pub employees: Option<u64>,
    pub website: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct News {
    pub id: RecordId,
    pub title: String,
    pub summary: Option<String>,
    /// Markdown body
    pub content: Option<String>,
    pub date: Option<String>,
    pub url: Option<String>,
    pub image_url: Option<String>,
}

/// Health check response
#[derive(Serialize)]
pub struct Health {
    pub status: &'static str,
    pub source: &'static str,
    pub now: DateTime<Utc>,
}
