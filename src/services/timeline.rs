/// Idealized mission timeline and mission profile.
///
/// Offsets are fixed illustrative constants for the timeline widget, not
/// telemetry.
use crate::domain::RocketFamily;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissionPhase {
    /// Offset relative to liftoff, e.g. `T+00:02:31`
    pub time: &'static str,
    pub title: &'static str,
    pub description: String,
}

impl MissionPhase {
    fn new(time: &'static str, title: &'static str, description: impl Into<String>) -> Self {
        Self {
            time,
            title,
            description: description.into(),
        }
    }
}

/// Ordered mission phases for a vehicle.
///
/// The booster landing phase is present only for the Falcon family; every other
/// phase is unconditional and in fixed order.
pub fn mission_timeline(family: RocketFamily, vehicle_name: Option<&str>) -> Vec<MissionPhase> {
    let vehicle = vehicle_name.unwrap_or("The rocket");

    let mut phases = vec![
        MissionPhase::new(
            "T-00:00:00",
            "Liftoff",
            format!("{vehicle} main engines ignite and the vehicle clears the tower"),
        ),
        MissionPhase::new(
            "T+00:01:12",
            "Max-Q",
            "The vehicle passes through maximum dynamic pressure",
        ),
        MissionPhase::new("T+00:02:27", "MECO", "First stage main engine cutoff"),
        MissionPhase::new(
            "T+00:02:31",
            "Stage separation",
            "First and second stages separate; second stage engine ignites",
        ),
    ];

    if family.has_booster_landing() {
        phases.push(MissionPhase::new(
            "T+00:08:45",
            "Booster landing",
            "First stage booster touches down for recovery",
        ));
    }

    phases.push(MissionPhase::new(
        "T+01:04:29",
        "Payload deployment",
        "Target orbit reached; payload deployment begins",
    ));

    phases
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MissionKind {
    SatelliteDeployment,
    Crewed,
    CargoResupply,
    Navigation,
    Communications,
}

impl MissionKind {
    /// Classify by launch name; communications is the fallback
    pub fn from_launch_name(name: &str) -> Self {
        if name.contains("Starlink") {
            Self::SatelliteDeployment
        } else if name.contains("Crew") {
            Self::Crewed
        } else if name.contains("Cargo") || name.contains("Dragon") {
            Self::CargoResupply
        } else if name.contains("GPS") {
            Self::Navigation
        } else {
            Self::Communications
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::SatelliteDeployment => "Satellite deployment",
            Self::Crewed => "Crewed mission",
            Self::CargoResupply => "Cargo resupply",
            Self::Navigation => "Navigation satellite",
            Self::Communications => "Communications satellite",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum TargetOrbit {
    Leo,
    Geo,
    LeoIss,
    LunarTransfer,
}

impl TargetOrbit {
    /// Classify by launch name; LEO is the fallback
    pub fn from_launch_name(name: &str) -> Self {
        let has = |needle: &str| name.contains(needle);
        if has("Starlink") || has("OneWeb") {
            Self::Leo
        } else if has("GPS") || has("SES") {
            Self::Geo
        } else if has("ISS") || has("Dragon") || has("Crew") {
            Self::LeoIss
        } else if has("Moon") || has("Artemis") {
            Self::LunarTransfer
        } else {
            Self::Leo
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::Leo => "Low Earth Orbit (LEO)",
            Self::Geo => "Geostationary Orbit (GEO)",
            Self::LeoIss => "Low Earth Orbit (LEO) - ISS",
            Self::LunarTransfer => "Lunar transfer orbit",
        }
    }
}

/// Editorial mission summary shown next to the timeline
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissionProfile {
    pub kind: MissionKind,
    pub kind_label: &'static str,
    pub target_orbit: TargetOrbit,
    pub target_orbit_label: &'static str,
    pub booster_recovery: bool,
    pub fairing_recovery: bool,
}

impl MissionProfile {
    pub fn new(launch_name: &str, family: RocketFamily) -> Self {
        let kind = MissionKind::from_launch_name(launch_name);
        let target_orbit = TargetOrbit::from_launch_name(launch_name);
        let recovers = family.has_booster_landing();
        Self {
            kind,
            kind_label: kind.label(),
            target_orbit,
            target_orbit_label: target_orbit.label(),
            booster_recovery: recovers,
            fairing_recovery: recovers,
        }
    }
}
