//! Tagged decoding of tracker pages into [`Task`] records.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::{json, Value};

use super::TrackerSchema;
use crate::error::TrackerError;
use crate::ports::{Task, TaskStatus};

/// Title used when a page has no title text.
pub const UNTITLED: &str = "Untitled";

/// Body of a database query response.
#[derive(Debug, Deserialize)]
pub struct QueryResponse {
    /// Matching pages, in tracker order.
    #[serde(default)]
    pub results: Vec<Page>,
}

/// A single tracker page.
#[derive(Debug, Deserialize)]
pub struct Page {
    /// Opaque page identifier.
    pub id: String,
    /// Properties keyed by their display name.
    #[serde(default)]
    pub properties: HashMap<String, PropertyValue>,
}

/// A run of styled text; only the plain rendering is used.
#[derive(Debug, Deserialize)]
pub struct RichText {
    /// The unstyled text of this run.
    #[serde(default)]
    pub plain_text: String,
}

/// Selected option of a status property.
#[derive(Debug, Deserialize)]
pub struct StatusOption {
    /// Display name of the option.
    pub name: String,
}

/// A page property, tagged by its kind.
#[derive(Debug, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum PropertyValue {
    /// The page title.
    Title {
        /// Text runs making up the title.
        #[serde(default)]
        title: Vec<RichText>,
    },
    /// A rich-text field.
    RichText {
        /// Text runs making up the field.
        #[serde(default)]
        rich_text: Vec<RichText>,
    },
    /// A workflow status.
    Status {
        /// The selected option, if any.
        #[serde(default)]
        status: Option<StatusOption>,
    },
    /// Any property kind this workflow does not read.
    #[serde(other)]
    Other,
}

impl PropertyValue {
    fn kind(&self) -> &'static str {
        match self {
            Self::Title { .. } => "title",
            Self::RichText { .. } => "rich_text",
            Self::Status { .. } => "status",
            Self::Other => "other",
        }
    }
}

fn concat(runs: &[RichText]) -> String {
    runs.iter().map(|run| run.plain_text.as_str()).collect::<String>().trim().to_string()
}

fn wrong_kind(page: &Page, name: &str, expected: &str, found: &PropertyValue) -> TrackerError {
    TrackerError::Schema(format!(
        "page {}: property {name:?} should be {expected}, found {}",
        page.id,
        found.kind()
    ))
}

/// Extracts a title-typed property. Absent properties yield an empty string.
///
/// # Errors
///
/// Returns [`TrackerError::Schema`] if the property exists with another kind.
pub fn title_text(page: &Page, name: &str) -> Result<String, TrackerError> {
    match page.properties.get(name) {
        None => Ok(String::new()),
        Some(PropertyValue::Title { title }) => Ok(concat(title)),
        Some(other) => Err(wrong_kind(page, name, "title", other)),
    }
}

/// Extracts a rich-text property. Absent properties yield an empty string.
///
/// # Errors
///
/// Returns [`TrackerError::Schema`] if the property exists with another kind.
pub fn rich_text(page: &Page, name: &str) -> Result<String, TrackerError> {
    match page.properties.get(name) {
        None => Ok(String::new()),
        Some(PropertyValue::RichText { rich_text }) => Ok(concat(rich_text)),
        Some(other) => Err(wrong_kind(page, name, "rich_text", other)),
    }
}

/// Extracts the selected option of a status property, if one is set.
///
/// # Errors
///
/// Returns [`TrackerError::Schema`] if the property exists with another kind.
pub fn status_name(page: &Page, name: &str) -> Result<Option<String>, TrackerError> {
    match page.properties.get(name) {
        None | Some(PropertyValue::Status { status: None }) => Ok(None),
        Some(PropertyValue::Status { status: Some(option) }) => Ok(Some(option.name.clone())),
        Some(other) => Err(wrong_kind(page, name, "status", other)),
    }
}

/// Maps a page into a [`Task`] using the board's property names.
///
/// # Errors
///
/// Returns [`TrackerError::Schema`] if any of the task's properties has an
/// unexpected kind.
pub fn page_to_task(page: &Page, schema: &TrackerSchema) -> Result<Task, TrackerError> {
    let title = title_text(page, &schema.title_property)?;
    Ok(Task {
        id: page.id.clone(),
        title: if title.is_empty() { UNTITLED.to_string() } else { title },
        description: rich_text(page, &schema.description_property)?,
        acceptance: rich_text(page, &schema.acceptance_property)?,
    })
}

/// Decodes a query response body into tasks, preserving tracker order.
///
/// # Errors
///
/// Returns [`TrackerError::Decode`] for malformed JSON and
/// [`TrackerError::Schema`] for rows with mistyped properties.
pub fn decode_tasks(body: &str, schema: &TrackerSchema) -> Result<Vec<Task>, TrackerError> {
    let response: QueryResponse =
        serde_json::from_str(body).map_err(|e| TrackerError::Decode(e.to_string()))?;
    response.results.iter().map(|page| page_to_task(page, schema)).collect()
}

/// Builds the query body selecting pages in the pending state.
#[must_use]
pub fn pending_filter(schema: &TrackerSchema) -> Value {
    json!({
        "filter": {
            "property": schema.status_property,
            "status": { "equals": schema.status_value(TaskStatus::Pending) },
        }
    })
}

/// Builds the update body replacing the acceptance text and the status.
#[must_use]
pub fn update_payload(schema: &TrackerSchema, acceptance: &str, status: TaskStatus) -> Value {
    let mut properties = serde_json::Map::new();
    properties.insert(
        schema.acceptance_property.clone(),
        json!({ "rich_text": [{ "text": { "content": acceptance } }] }),
    );
    properties.insert(
        schema.status_property.clone(),
        json!({ "status": { "name": schema.status_value(status) } }),
    );
    json!({ "properties": properties })
}
