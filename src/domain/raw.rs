/// Wire shapes returned by the backend and their normalization.
///
/// The backend has served launches both as flat legacy records
/// (`rocket`, `launchBase`, `date`) and as nested objects
/// (`vehicle`, `pad.location`, `provider`). Both are accepted here and folded
/// into the canonical records of [`crate::domain`].
use super::{
    Company, Launch, LaunchSite, LaunchStatus, LaunchTiming, Mission, News, ProviderRef,
    RecordId, Rocket, RocketFamily, SiteRef, VehicleRef, Weather,
};
use crate::errors::{ApiError, ApiResult};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::Value;

/// Deserialize a raw JSON record and normalize it into its canonical shape
pub fn decode_record<R, T>(value: Value) -> ApiResult<T>
where
    R: DeserializeOwned,
    T: TryFrom<R, Error = ApiError>,
{
    let raw: R = serde_json::from_value(value)?;
    T::try_from(raw)
}

/// Pull the record list out of a collection payload
pub fn extract_items(json: Value) -> Vec<Value> {
    match json {
        Value::Array(items) => items,
        Value::Object(mut map) => {
            for key in ["items", "results", "data"] {
                if let Some(Value::Array(items)) = map.remove(key) {
                    return items;
                }
            }
            vec![Value::Object(map)]
        }
        Value::Null => Vec::new(),
        other => vec![other],
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

fn positive(value: Option<f64>) -> Option<f64> {
    value.filter(|v| v.is_finite() && *v > 0.0)
}

fn required_name(value: Option<String>, kind: &str) -> ApiResult<String> {
    non_empty(value).ok_or_else(|| ApiError::InvalidRecord(format!("{kind} without a name")))
}

fn required_id(value: Option<RecordId>, kind: &str, name: &str) -> ApiResult<RecordId> {
    value.ok_or_else(|| ApiError::InvalidRecord(format!("{kind} '{name}' without an id")))
}

/// Vehicle given either by name or as a nested object
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawVehicle {
    Named(String),
    Nested {
        #[serde(default)]
        id: Option<RecordId>,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        company_id: Option<RecordId>,
        #[serde(default)]
        slug: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawLocation {
    Named(String),
    Nested {
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        state: Option<String>,
        #[serde(default)]
        statename: Option<String>,
        #[serde(default)]
        country: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawPad {
    Named(String),
    Nested {
        #[serde(default)]
        id: Option<RecordId>,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        location: Option<RawLocation>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawProvider {
    Named(String),
    Nested {
        #[serde(default)]
        id: Option<RecordId>,
        #[serde(default)]
        name: Option<String>,
        #[serde(default)]
        slug: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum RawTag {
    Text(String),
    Object {
        #[serde(default)]
        text: Option<String>,
    },
}

#[derive(Debug, Deserialize)]
pub struct RawMission {
    #[serde(default)]
    pub id: Option<RecordId>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub description: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawLaunch {
    pub id: Option<RecordId>,
    pub name: Option<String>,
    pub status: Option<String>,

    pub t0: Option<String>,
    pub window_open: Option<String>,
    pub win_open: Option<String>,
    pub date: Option<String>,
    pub created_at: Option<String>,
    pub window_close: Option<String>,
    pub win_close: Option<String>,
    pub date_str: Option<String>,

    pub quicktext: Option<String>,
    pub launch_description: Option<String>,
    pub mission_description: Option<String>,
    pub description: Option<String>,

    pub rocket: Option<String>,
    pub rocket_id: Option<RecordId>,
    #[serde(rename = "launchBase", alias = "launch_base")]
    pub launch_base: Option<String>,
    pub launch_base_id: Option<RecordId>,
    pub provider_id: Option<RecordId>,

    pub vehicle: Option<RawVehicle>,
    pub pad: Option<RawPad>,
    pub provider: Option<RawProvider>,
    pub tags: Option<Vec<RawTag>>,
    pub missions: Option<Vec<RawMission>>,

    pub cospar_id: Option<String>,
    pub slug: Option<String>,
    pub suborbital: Option<bool>,

    pub weather_summary: Option<String>,
    pub weather_temp: Option<f64>,
    pub weather_condition: Option<String>,
    pub weather_wind_mph: Option<f64>,
    pub weather_icon: Option<String>,
    pub weather_updated: Option<String>,
}

impl RawLaunch {
    /// Nested vehicle wins over the legacy `rocket` name
    fn take_vehicle(&mut self) -> Option<VehicleRef> {
        let nested = match self.vehicle.take() {
            Some(RawVehicle::Named(name)) => non_empty(Some(name)).map(|name| VehicleRef {
                name,
                ..VehicleRef::default()
            }),
            Some(RawVehicle::Nested {
                id,
                name,
                company_id,
                slug,
            }) => non_empty(name).map(|name| VehicleRef {
                id,
                name,
                company_id,
                slug: non_empty(slug),
            }),
            None => None,
        };
        nested.or_else(|| {
            non_empty(self.rocket.take()).map(|name| VehicleRef {
                id: self.rocket_id.take(),
                name,
                ..VehicleRef::default()
            })
        })
    }

    /// Nested pad wins over the legacy `launchBase` name
    fn take_site(&mut self) -> Option<SiteRef> {
        let nested = match self.pad.take() {
            Some(RawPad::Named(name)) => non_empty(Some(name)).map(|name| SiteRef {
                name,
                ..SiteRef::default()
            }),
            Some(RawPad::Nested { id, name, location }) => non_empty(name).map(|name| {
                let mut site = SiteRef {
                    id,
                    name,
                    ..SiteRef::default()
                };
                match location {
                    Some(RawLocation::Named(loc)) => site.location = non_empty(Some(loc)),
                    Some(RawLocation::Nested {
                        name,
                        state,
                        statename,
                        country,
                    }) => {
                        site.location = non_empty(name);
                        site.state = non_empty(statename).or_else(|| non_empty(state));
                        site.country = non_empty(country);
                    }
                    None => {}
                }
                site
            }),
            None => None,
        };
        nested.or_else(|| {
            non_empty(self.launch_base.take()).map(|name| SiteRef {
                id: self.launch_base_id.take(),
                name,
                ..SiteRef::default()
            })
        })
    }

    fn take_provider(&mut self) -> Option<ProviderRef> {
        match self.provider.take() {
            Some(RawProvider::Named(name)) => non_empty(Some(name)).map(|name| ProviderRef {
                id: self.provider_id.take(),
                name,
                slug: None,
            }),
            Some(RawProvider::Nested { id, name, slug }) => {
                non_empty(name).map(|name| ProviderRef {
                    id: id.or_else(|| self.provider_id.take()),
                    name,
                    slug: non_empty(slug),
                })
            }
            None => None,
        }
    }

    fn take_weather(&mut self) -> Option<Weather> {
        let weather = Weather {
            summary: non_empty(self.weather_summary.take()),
            temp: self.weather_temp.take(),
            condition: non_empty(self.weather_condition.take()),
            wind_mph: self.weather_wind_mph.take(),
            icon: non_empty(self.weather_icon.take()),
            updated: non_empty(self.weather_updated.take()),
        };
        (weather != Weather::default()).then_some(weather)
    }
}

impl TryFrom<RawLaunch> for Launch {
    type Error = ApiError;

    fn try_from(mut raw: RawLaunch) -> ApiResult<Self> {
        let name = required_name(raw.name.take(), "launch")?;
        let id = required_id(raw.id.take(), "launch", &name)?;

        let status_text = raw.status.take().unwrap_or_default();
        let status = LaunchStatus::parse(&status_text).ok_or_else(|| {
            ApiError::InvalidRecord(format!("launch '{name}' has unknown status '{status_text}'"))
        })?;

        let vehicle = raw.take_vehicle();
        let site = raw.take_site();
        let provider = raw.take_provider();
        let weather = raw.take_weather();

        let tags = raw
            .tags
            .take()
            .unwrap_or_default()
            .into_iter()
            .filter_map(|tag| match tag {
                RawTag::Text(text) => non_empty(Some(text)),
                RawTag::Object { text } => non_empty(text),
            })
            .collect();

        let missions = raw
            .missions
            .take()
            .unwrap_or_default()
            .into_iter()
            .filter_map(|m| {
                non_empty(m.name).map(|name| Mission {
                    id: m.id,
                    name,
                    description: non_empty(m.description),
                })
            })
            .collect();

        let timing = LaunchTiming {
            t0: non_empty(raw.t0),
            window_open: non_empty(raw.window_open),
            win_open: non_empty(raw.win_open),
            date: non_empty(raw.date),
            created_at: non_empty(raw.created_at),
            window_close: non_empty(raw.window_close).or_else(|| non_empty(raw.win_close)),
            date_str: non_empty(raw.date_str),
        };

        Ok(Launch {
            id,
            name,
            status,
            quicktext: non_empty(raw.quicktext),
            launch_description: non_empty(raw.launch_description),
            mission_description: non_empty(raw.mission_description),
            description: non_empty(raw.description),
            timing,
            vehicle,
            site,
            provider,
            tags,
            missions,
            cospar_id: non_empty(raw.cospar_id),
            slug: non_empty(raw.slug),
            suborbital: raw.suborbital,
            weather,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawRocket {
    pub id: Option<RecordId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub height: Option<f64>,
    pub diameter: Option<f64>,
    pub mass: Option<f64>,
    pub company: Option<String>,
    pub company_id: Option<RecordId>,
    #[serde(rename = "imageUrl", alias = "image_url")]
    pub image_url: Option<String>,
    pub active: Option<bool>,
    pub reusable: Option<bool>,
}

impl TryFrom<RawRocket> for Rocket {
    type Error = ApiError;

    fn try_from(raw: RawRocket) -> ApiResult<Self> {
        let name = required_name(raw.name, "rocket")?;
        let id = required_id(raw.id, "rocket", &name)?;
        let family = RocketFamily::from_name(&name);

        Ok(Rocket {
            id,
            company: non_empty(raw.company),
            company_id: raw.company_id,
            description: non_empty(raw.description),
            height: positive(raw.height),
            diameter: positive(raw.diameter),
            mass: positive(raw.mass),
            active: raw.active.unwrap_or(false),
            family,
            reusable: raw.reusable.unwrap_or_else(|| family.is_reusable()),
            image_url: non_empty(raw.image_url),
            name,
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawLaunchSite {
    pub id: Option<RecordId>,
    pub name: Option<String>,
    pub location: Option<String>,
    pub country: Option<String>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    pub description: Option<String>,
    #[serde(rename = "imageUrl", alias = "image_url")]
    pub image_url: Option<String>,
}

impl TryFrom<RawLaunchSite> for LaunchSite {
    type Error = ApiError;

    fn try_from(raw: RawLaunchSite) -> ApiResult<Self> {
        let name = required_name(raw.name, "launch site")?;
        let id = required_id(raw.id, "launch site", &name)?;

        Ok(LaunchSite {
            id,
            name,
            location: non_empty(raw.location),
            country: non_empty(raw.country),
            latitude: raw.latitude.filter(|v| (-90.0..=90.0).contains(v)),
            longitude: raw.longitude.filter(|v| (-180.0..=180.0).contains(v)),
            description: non_empty(raw.description),
            image_url: non_empty(raw.image_url),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawCompany {
    pub id: Option<RecordId>,
    pub name: Option<String>,
    pub description: Option<String>,
    pub founded: Option<i32>,
    pub founder: Option<String>,
    pub headquarters: Option<String>,
    pub employees: Option<u64>,
    pub website: Option<String>,
    #[serde(rename = "imageUrl", alias = "image_url")]
    pub image_url: Option<String>,
}

impl TryFrom<RawCompany> for Company {
    type Error = ApiError;

    fn try_from(raw: RawCompany) -> ApiResult<Self> {
        let name = required_name(raw.name, "company")?;
        let id = required_id(raw.id, "company", &name)?;

        Ok(Company {
            id,
            name,
            description: non_empty(raw.description),
            founded: raw.founded,
            founder: non_empty(raw.founder),
            headquarters: non_empty(raw.headquarters),
            employees: raw.employees,
            website: non_empty(raw.website),
            image_url: non_empty(raw.image_url),
        })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RawNews {
    pub id: Option<RecordId>,
    pub title: Option<String>,
    pub summary: Option<String>,
    pub content: Option<String>,
    pub date: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "imageUrl", alias = "image_url")]
    pub image_url: Option<String>,
}

impl TryFrom<RawNews> for News {
    type Error = ApiError;

    fn try_from(raw: RawNews) -> ApiResult<Self> {
        let title = non_empty(raw.title)
            .ok_or_else(|| ApiError::InvalidRecord("news article without a title".to_string()))?;
        let id = required_id(raw.id, "news article", &title)?;

        Ok(News {
            id,
            title,
            summary: non_empty(raw.summary),
            content: non_empty(raw.content),
            date: non_empty(raw.date),
            url: non_empty(raw.url),
            image_url: non_empty(raw.image_url),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn launch(value: Value) -> ApiResult<Launch> {
        decode_record::<RawLaunch, Launch>(value)
    }

    #[test]
    fn test_legacy_flat_launch() {
        let l = launch(json!({
            "id": "1",
            "name": "Starlink Mission",
            "date": "2025-10-23T10:30:00Z",
            "rocket": "Falcon 9",
            "launchBase": "Kennedy Space Center",
            "status": "scheduled",
            "description": "Deployment of 60 Starlink satellites."
        }))
        .unwrap();

        assert_eq!(l.id, RecordId::Text("1".to_string()));
        assert_eq!(l.status, LaunchStatus::Scheduled);
        assert_eq!(l.vehicle_name(), Some("Falcon 9"));
        assert_eq!(l.site_name(), Some("Kennedy Space Center"));
        assert_eq!(l.provider_name(), None);
        assert_eq!(l.timing.date.as_deref(), Some("2025-10-23T10:30:00Z"));
        assert_eq!(l.summary(), Some("Deployment of 60 Starlink satellites."));
    }

    #[test]
    fn test_nested_launch_prefers_nested_objects() {
        let l = launch(json!({
            "id": 4021,
            "name": "Crew-11",
            "status": "successful",
            "t0": "2025-08-01T15:43:00Z",
            "rocket": "Legacy Name",
            "vehicle": {"id": 1, "name": "Falcon 9", "company_id": 1, "slug": "falcon-9"},
            "pad": {
                "id": 2,
                "name": "LC-39A",
                "location": {"id": 61, "name": "Kennedy Space Center", "state": "FL",
                             "statename": "Florida", "country": "United States", "slug": "ksc"}
            },
            "provider": {"id": 1, "name": "SpaceX", "slug": "spacex"},
            "tags": [{"id": 1, "text": "Crewed"}, {"id": 2, "text": "ISS"}],
            "missions": [{"id": 9, "name": "Crew-11", "description": "Crew rotation"}],
            "quicktext": "Crew rotation flight",
            "weather_summary": "Clear",
            "weather_temp": 81.5
        }))
        .unwrap();

        assert_eq!(l.id, RecordId::Int(4021));
        assert_eq!(l.vehicle_name(), Some("Falcon 9"));
        let site = l.site.as_ref().unwrap();
        assert_eq!(site.name, "LC-39A");
        assert_eq!(site.location.as_deref(), Some("Kennedy Space Center"));
        assert_eq!(site.state.as_deref(), Some("Florida"));
        assert_eq!(site.country.as_deref(), Some("United States"));
        assert_eq!(l.provider_name(), Some("SpaceX"));
        assert_eq!(l.tags, vec!["Crewed".to_string(), "ISS".to_string()]);
        assert_eq!(l.missions.len(), 1);
        assert_eq!(l.summary(), Some("Crew rotation flight"));
        let weather = l.weather.as_ref().unwrap();
        assert_eq!(weather.summary.as_deref(), Some("Clear"));
        assert_eq!(weather.temp, Some(81.5));
    }

    #[test]
    fn test_window_close_alternate_name() {
        let l = launch(json!({
            "id": 1, "name": "x", "status": "scheduled", "win_close": "2025-10-23T11:00:00Z"
        }))
        .unwrap();
        assert_eq!(l.timing.window_close.as_deref(), Some("2025-10-23T11:00:00Z"));
        assert!(l.weather.is_none());
    }

    #[test]
    fn test_unknown_status_is_rejected() {
        let err = launch(json!({"id": 1, "name": "x", "status": "scrubbed"})).unwrap_err();
        assert!(matches!(err, ApiError::InvalidRecord(_)));
        assert!(err.to_string().contains("scrubbed"));
    }

    #[test]
    fn test_missing_status_is_rejected() {
        assert!(launch(json!({"id": 1, "name": "x"})).is_err());
    }

    #[test]
    fn test_launch_without_name_is_rejected() {
        assert!(launch(json!({"id": 1, "status": "failed"})).is_err());
    }

    #[test]
    fn test_rocket_specs_and_family() {
        let rocket: Rocket = decode_record::<RawRocket, Rocket>(json!({
            "id": "4",
            "name": "New Shepard",
            "height": 18,
            "diameter": 3.7,
            "mass": -1,
            "company": "Blue Origin",
            "imageUrl": "https://example.com/ns.png",
            "active": true
        }))
        .unwrap();
        assert_eq!(rocket.family, RocketFamily::NewShepard);
        assert!(rocket.reusable);
        assert_eq!(rocket.height, Some(18.0));
        assert_eq!(rocket.mass, None);
        assert_eq!(rocket.image_url.as_deref(), Some("https://example.com/ns.png"));
    }

    #[test]
    fn test_explicit_reusable_attribute_wins() {
        let rocket: Rocket = decode_record::<RawRocket, Rocket>(json!({
            "id": 1, "name": "Falcon 1", "reusable": false
        }))
        .unwrap();
        assert_eq!(rocket.family, RocketFamily::Falcon);
        assert!(!rocket.reusable);
    }

    #[test]
    fn test_site_coordinates_out_of_range_are_dropped() {
        let site: LaunchSite = decode_record::<RawLaunchSite, LaunchSite>(json!({
            "id": 1, "name": "Somewhere", "latitude": 128.0, "longitude": -80.6
        }))
        .unwrap();
        assert_eq!(site.latitude, None);
        assert_eq!(site.longitude, Some(-80.6));
    }

    #[test]
    fn test_extract_items_shapes() {
        assert_eq!(extract_items(json!([1, 2])).len(), 2);
        assert_eq!(extract_items(json!({"items": [1, 2, 3]})).len(), 3);
        assert_eq!(extract_items(json!({"results": [1]})).len(), 1);
        assert_eq!(extract_items(json!({"data": []})).len(), 0);
        assert_eq!(extract_items(json!({"id": 1})).len(), 1);
        assert!(extract_items(Value::Null).is_empty());
    }
}
