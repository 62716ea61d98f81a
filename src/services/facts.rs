use crate::domain::RocketFamily;
use serde::Serialize;

/// Reference figures for one vehicle
struct VehicleSheet {
    name: &'static str,
    first_flight: u16,
    payload_leo: &'static str,
    payload_gto: &'static str,
    engines: &'static str,
}

const VEHICLE_SHEETS: &[VehicleSheet] = &[
    VehicleSheet {
        name: "Falcon 9",
        first_flight: 2010,
        payload_leo: "22,800 kg (50,265 lb)",
        payload_gto: "8,300 kg (18,300 lb)",
        engines: "9 × Merlin 1D (first stage), 1 × Merlin Vacuum (second stage)",
    },
    VehicleSheet {
        name: "Falcon Heavy",
        first_flight: 2018,
        payload_leo: "63,800 kg (140,660 lb)",
        payload_gto: "26,700 kg (58,860 lb)",
        engines: "27 × Merlin 1D (first stage), 1 × Merlin Vacuum (second stage)",
    },
    VehicleSheet {
        name: "Starship",
        first_flight: 2023,
        payload_leo: "100-150 metric tons (estimated)",
        payload_gto: "TBD",
        engines: "33 × Raptor (Super Heavy), 6 × Raptor (Starship)",
    },
    VehicleSheet {
        name: "New Shepard",
        first_flight: 2015,
        payload_leo: "Suborbital vehicle (not designed for LEO)",
        payload_gto: "N/A (suborbital)",
        engines: "1 × BE-3 (booster), 1 × BE-3PM (capsule)",
    },
];

/// Rocket fact sheet.
///
/// Figures exist only for the exact vehicle names listed above; any other
/// name gets `None`. Stage count and propellant fall back to the family.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RocketFacts {
    pub family: RocketFamily,
    pub stages: &'static str,
    pub reusability: &'static str,
    pub first_flight: Option<u16>,
    pub payload_leo: Option<&'static str>,
    pub payload_gto: Option<&'static str>,
    pub engines: Option<&'static str>,
    pub propellant: Option<&'static str>,
}

impl RocketFacts {
    pub fn new(name: &str, family: RocketFamily) -> Self {
        let name = name.trim();
        let sheet = VEHICLE_SHEETS.iter().find(|s| s.name == name);

        let stages = match (name, family) {
            ("Starship", _) => "Two (Super Heavy + Starship)",
            (_, RocketFamily::NewShepard) => "Single Stage (suborbital)",
            _ => "Two",
        };
        let propellant = match (name, family) {
            (_, RocketFamily::Falcon) => Some("RP-1 (Rocket Propellant-1) / Liquid Oxygen"),
            ("Starship", _) => Some("Liquid Methane / Liquid Oxygen"),
            ("New Shepard", _) => Some("Liquid Hydrogen / Liquid Oxygen"),
            _ => None,
        };

        Self {
            family,
            stages,
            reusability: family.reusability_label(),
            first_flight: sheet.map(|s| s.first_flight),
            payload_leo: sheet.map(|s| s.payload_leo),
            payload_gto: sheet.map(|s| s.payload_gto),
            engines: sheet.map(|s| s.engines),
            propellant,
        }
    }
}
