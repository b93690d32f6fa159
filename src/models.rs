// Data models for the maintenance log

use crate::error::{Error, Result};
use serde::{Serialize, Serializer};

/// One persisted maintenance event
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MaintenanceRecord {
    pub id: i64,
    pub vehicle: String,
    pub task: String,
    pub last_date: Option<String>,
    pub last_mileage: Option<i64>,
    pub notes: String,
}

impl MaintenanceRecord {
    /// The record's data fields without its id
    pub fn to_row(&self) -> RecordRow {
        RecordRow {
            vehicle: self.vehicle.clone(),
            task: self.task.clone(),
            last_date: self.last_date.clone(),
            last_mileage: self.last_mileage,
            notes: self.notes.clone(),
        }
    }
}

/// A record's data fields without an id: insert input, export element and
/// decoded import element.
///
/// Serializes as the positional array `[vehicle, task, last_date,
/// last_mileage, notes]` used by export files.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecordRow {
    pub vehicle: String,
    pub task: String,
    pub last_date: Option<String>,
    pub last_mileage: Option<i64>,
    pub notes: String,
}

impl RecordRow {
    pub fn new(vehicle: impl Into<String>, task: impl Into<String>) -> Self {
        Self {
            vehicle: vehicle.into(),
            task: task.into(),
            ..Default::default()
        }
    }

    pub fn with_date(mut self, date: impl Into<String>) -> Self {
        self.last_date = Some(date.into());
        self
    }

    pub fn with_mileage(mut self, mileage: i64) -> Self {
        self.last_mileage = Some(mileage);
        self
    }

    pub fn with_notes(mut self, notes: impl Into<String>) -> Self {
        self.notes = notes.into();
        self
    }

    /// Build a row from raw form input.
    ///
    /// Every field is trimmed. An empty date or mileage becomes `None`, so a
    /// blank mileage is stored as NULL rather than 0. The task is not checked
    /// here; `Store::insert_record` rejects an empty one.
    pub fn from_form(vehicle: &str, task: &str, date: &str, mileage: &str, notes: &str) -> Result<Self> {
        Ok(Self {
            vehicle: vehicle.trim().to_string(),
            task: task.trim().to_string(),
            last_date: non_empty(date),
            last_mileage: parse_mileage(mileage)?,
            notes: notes.trim().to_string(),
        })
    }
}

impl Serialize for RecordRow {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        (
            &self.vehicle,
            &self.task,
            &self.last_date,
            &self.last_mileage,
            &self.notes,
        )
            .serialize(serializer)
    }
}

/// Parse a mileage field: blank is `None`, otherwise a non-negative integer
pub fn parse_mileage(input: &str) -> Result<Option<i64>> {
    let input = input.trim();
    if input.is_empty() {
        return Ok(None);
    }

    match input.parse::<i64>() {
        Ok(m) if m >= 0 => Ok(Some(m)),
        _ => Err(Error::Validation(format!(
            "Mileage must be a whole number of miles, got '{}'",
            input
        ))),
    }
}

fn non_empty(input: &str) -> Option<String> {
    let input = input.trim();
    (!input.is_empty()).then(|| input.to_string())
}
