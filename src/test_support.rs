/// Record builders shared by unit tests.
use crate::domain::{Launch, LaunchStatus, LaunchTiming, RecordId, SiteRef, VehicleRef};

pub fn launch(id: i64, name: &str) -> Launch {
    Launch {
        id: RecordId::Int(id),
        name: name.to_string(),
        status: LaunchStatus::Scheduled,
        quicktext: None,
        launch_description: None,
        mission_description: None,
        description: None,
        timing: LaunchTiming::default(),
        vehicle: None,
        site: None,
        provider: None,
        tags: Vec::new(),
        missions: Vec::new(),
        cospar_id: None,
        slug: None,
        suborbital: None,
        weather: None,
    }
}

pub fn launch_with_timing(id: i64, timing: LaunchTiming) -> Launch {
    Launch {
        timing,
        ..launch(id, &format!("Launch {id}"))
    }
}

/// Launch whose legacy `date` field holds `date`
pub fn dated_launch(id: i64, date: &str) -> Launch {
    launch_with_timing(
        id,
        LaunchTiming {
            date: Some(date.to_string()),
            ..LaunchTiming::default()
        },
    )
}

pub fn with_vehicle(mut launch: Launch, name: &str) -> Launch {
    launch.vehicle = Some(VehicleRef {
        name: name.to_string(),
        ..VehicleRef::default()
    });
    launch
}

pub fn with_site(mut launch: Launch, name: &str) -> Launch {
    launch.site = Some(SiteRef {
        name: name.to_string(),
        ..SiteRef::default()
    });
    launch
}

pub fn with_status(mut launch: Launch, status: LaunchStatus) -> Launch {
    launch.status = status;
    launch
}
