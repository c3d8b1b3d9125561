//! Shape checks for scheduler input arriving as untyped JSON.
//!
//! Every failure is an `InvalidInput` naming the offending path, e.g.
//! `teams[3].track_id`. Unknown extra fields are ignored.

use serde_json::Value;

use crate::domain::{Assignment, Panel, Team};
use crate::error::{HackulusError, Result};
use crate::scheduler::assign::{PANEL_COUNT, assign};

/// A preview document: `{"panels": [...], "teams": [...]}`.
#[derive(Debug, Clone)]
pub struct SchedulerInput {
    pub panels: Vec<Panel>,
    pub teams: Vec<Team>,
}

impl SchedulerInput {
    /// Validate a raw JSON document into typed input.
    pub fn from_value(value: &Value) -> Result<Self> {
        let Value::Object(doc) = value else {
            return Err(HackulusError::invalid("input", "must be an object"));
        };
        let panels = panels_from_value(doc.get("panels").unwrap_or(&Value::Null))?;
        let teams = teams_from_value(doc.get("teams").unwrap_or(&Value::Null))?;
        Ok(Self { panels, teams })
    }

    /// Parse and validate a JSON string.
    pub fn from_json(text: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(text)?;
        Self::from_value(&value)
    }

    pub fn assign(&self) -> Result<Vec<Assignment>> {
        assign(&self.panels, &self.teams)
    }
}

/// Validate the `panels` argument: exactly four objects with integer `panel_id`.
pub fn panels_from_value(value: &Value) -> Result<Vec<Panel>> {
    let items = as_array(value, "panels")?;
    if items.len() != PANEL_COUNT {
        return Err(HackulusError::invalid(
            "panels",
            format!("expected exactly {} panels, got {}", PANEL_COUNT, items.len()),
        ));
    }

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let path = format!("panels[{}]", i);
            let panel_id = integer_field(item, &path, "panel_id")?;
            let name = item.get("name").and_then(Value::as_str).unwrap_or_default();
            Ok(Panel::new(panel_id, name))
        })
        .collect()
}

/// Validate the `teams` argument: an array, possibly empty, of objects with
/// integer `team_id` and `track_id`.
pub fn teams_from_value(value: &Value) -> Result<Vec<Team>> {
    let items = as_array(value, "teams")?;

    items
        .iter()
        .enumerate()
        .map(|(i, item)| {
            let path = format!("teams[{}]", i);
            let team_id = integer_field(item, &path, "team_id")?;
            let track_id = integer_field(item, &path, "track_id")?;
            Ok(Team::new(team_id, track_id))
        })
        .collect()
}

fn as_array<'a>(value: &'a Value, field: &str) -> Result<&'a Vec<Value>> {
    match value {
        Value::Array(items) => Ok(items),
        Value::Null => Err(HackulusError::invalid(field, "is required")),
        _ => Err(HackulusError::invalid(field, "must be an array")),
    }
}

fn integer_field(item: &Value, path: &str, key: &str) -> Result<i64> {
    if !item.is_object() {
        return Err(HackulusError::invalid(path, "must be an object"));
    }
    let field = format!("{}.{}", path, key);
    match item.get(key) {
        None | Some(Value::Null) => Err(HackulusError::invalid(field, "is required")),
        Some(Value::Number(n)) => n
            .as_i64()
            .ok_or_else(|| HackulusError::invalid(field, "must be an integer")),
        Some(_) => Err(HackulusError::invalid(field, "must be a number")),
    }
}
