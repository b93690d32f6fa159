// Presentation helpers: what a vehicle's table shows, and input warnings

use crate::catalog::{self, DefaultTask};
use crate::models::MaintenanceRecord;
use chrono::NaiveDate;

/// Shown in the date and mileage columns of a placeholder row
pub const PLACEHOLDER: &str = "—";

pub const COLUMNS: [&str; 4] = ["Task", "Last Date", "Last Mileage", "Notes"];

/// One row of a vehicle's maintenance table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DisplayRow {
    pub task: String,
    pub last_date: String,
    pub last_mileage: String,
    pub notes: String,
    /// True for default-task rows standing in for missing history
    pub placeholder: bool,
}

impl DisplayRow {
    fn cells(&self) -> [&str; 4] {
        [&self.task, &self.last_date, &self.last_mileage, &self.notes]
    }
}

impl From<&MaintenanceRecord> for DisplayRow {
    fn from(record: &MaintenanceRecord) -> Self {
        Self {
            task: record.task.clone(),
            last_date: record.last_date.clone().unwrap_or_default(),
            last_mileage: record.last_mileage.map(|m| m.to_string()).unwrap_or_default(),
            notes: record.notes.clone(),
            placeholder: false,
        }
    }
}

impl From<&DefaultTask> for DisplayRow {
    fn from(task: &DefaultTask) -> Self {
        Self {
            task: task.task_name.to_string(),
            last_date: PLACEHOLDER.to_string(),
            last_mileage: PLACEHOLDER.to_string(),
            notes: String::new(),
            placeholder: true,
        }
    }
}

/// Rows for a vehicle's table: its records, or the default tasks when it has none
pub fn display_rows(records: &[MaintenanceRecord]) -> Vec<DisplayRow> {
    if records.is_empty() {
        catalog::list_default_tasks().iter().map(DisplayRow::from).collect()
    } else {
        records.iter().map(DisplayRow::from).collect()
    }
}

/// Lay rows out as a plain-text table with a header line
pub fn format_table(rows: &[DisplayRow]) -> Vec<String> {
    let mut widths = COLUMNS.map(|c| c.chars().count());
    for row in rows {
        for (width, cell) in widths.iter_mut().zip(row.cells()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: [&str; 4]| {
        let padded: Vec<String> = cells
            .iter()
            .zip(widths)
            .map(|(cell, width)| format!("{:<width$}", cell, width = width))
            .collect();
        padded.join("  ").trim_end().to_string()
    };

    let mut lines = vec![line(COLUMNS)];
    lines.extend(rows.iter().map(|row| line(row.cells())));
    lines
}

/// Resolve a vehicle argument: a 1-based catalog position or a name
pub fn resolve_vehicle(input: &str) -> String {
    let input = input.trim();
    let vehicles = catalog::list_vehicles();

    match input.parse::<usize>() {
        Ok(n) if (1..=vehicles.len()).contains(&n) => vehicles[n - 1].name.to_string(),
        _ => input.to_string(),
    }
}

/// Warning for a vehicle name that is not in the catalog
pub fn unknown_vehicle_warning(name: &str) -> Option<String> {
    match catalog::find_vehicle(name) {
        Some(_) => None,
        None => Some(format!("'{}' is not a known vehicle; saving it anyway", name)),
    }
}

/// Warning for a date not in `YYYY-MM-DD` form. Dates are stored as entered.
pub fn date_warning(date: Option<&str>) -> Option<String> {
    let date = date?;
    match NaiveDate::parse_from_str(date, "%Y-%m-%d") {
        Ok(_) => None,
        Err(_) => Some(format!("'{}' is not a YYYY-MM-DD date; saving it as entered", date)),
    }
}
