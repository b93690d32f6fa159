// Compiled-in vehicles and default maintenance task templates

/// A selectable vehicle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Vehicle {
    pub name: &'static str,
    pub logo_asset_path: &'static str,
}

/// A maintenance task template, shown as a placeholder for vehicles with no history
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DefaultTask {
    pub task_name: &'static str,
    pub interval_miles: u32,
    pub interval_months: u32,
}

const VEHICLES: &[Vehicle] = &[
    Vehicle {
        name: "2008 BMW M3",
        logo_asset_path: "assets/logos/logo_2008_m3.svg",
    },
    Vehicle {
        name: "2013 BMW 335i M Sport Sedan",
        logo_asset_path: "assets/logos/logo_2013_335i.svg",
    },
    Vehicle {
        name: "2020 BMW X7 xDrive40i",
        logo_asset_path: "assets/logos/logo_2020_x7.svg",
    },
    Vehicle {
        name: "2021 BMW X3 sDrive30i",
        logo_asset_path: "assets/logos/logo_2021_x3.svg",
    },
];

const DEFAULT_TASKS: &[DefaultTask] = &[
    DefaultTask {
        task_name: "Oil Change",
        interval_miles: 7500,
        interval_months: 12,
    },
    DefaultTask {
        task_name: "Brake Fluid",
        interval_miles: 30000,
        interval_months: 24,
    },
    DefaultTask {
        task_name: "Coolant Flush",
        interval_miles: 60000,
        interval_months: 48,
    },
    DefaultTask {
        task_name: "Spark Plugs",
        interval_miles: 45000,
        interval_months: 36,
    },
    DefaultTask {
        task_name: "Air Filter",
        interval_miles: 15000,
        interval_months: 12,
    },
];

/// All known vehicles, in display order
pub fn list_vehicles() -> &'static [Vehicle] {
    VEHICLES
}

/// Default task templates, in display order
pub fn list_default_tasks() -> &'static [DefaultTask] {
    DEFAULT_TASKS
}

/// Look up a vehicle by its exact display name
pub fn find_vehicle(name: &str) -> Option<&'static Vehicle> {
    VEHICLES.iter().find(|v| v.name == name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_vehicles_not_empty_and_unique() {
        let vehicles = list_vehicles();
        assert!(!vehicles.is_empty());

        let names: HashSet<_> = vehicles.iter().map(|v| v.name).collect();
        assert_eq!(names.len(), vehicles.len());
    }

    #[test]
    fn test_default_tasks() {
        let tasks = list_default_tasks();
        assert_eq!(tasks.len(), 5);
        assert_eq!(tasks[0].task_name, "Oil Change");
        assert_eq!(tasks[0].interval_miles, 7500);
        assert_eq!(tasks[0].interval_months, 12);
    }

    #[test]
    fn test_find_vehicle() {
        let m3 = find_vehicle("2008 BMW M3").unwrap();
        assert_eq!(m3.logo_asset_path, "assets/logos/logo_2008_m3.svg");

        assert!(find_vehicle("2008 bmw m3").is_none());
        assert!(find_vehicle("1999 Civic").is_none());
    }
}
