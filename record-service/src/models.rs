//! Movie record models
//!
//! Domain model for the records held by the service.

use serde::{Deserialize, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;

pub const MOVIE_ID: &str = "movie_id";
pub const TITLE: &str = "title";
pub const DIRECTOR: &str = "director";

/// Reasons an element of the backing document is not a usable record.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RecordError {
    #[error("missing required field `{0}`")]
    MissingField(&'static str),

    #[error("field `{0}` must be a string")]
    NotAString(&'static str),
}

/// A single movie record.
///
/// The record is the object exactly as it appeared in the backing document,
/// so every field, known or not, keeps its value and position. `movie_id`
/// keeps whatever JSON type the file used; lookups compare it as text through
/// [`Record::normalized_id`].
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(try_from = "Map<String, Value>")]
pub struct Record {
    fields: Map<String, Value>,
}

impl Record {
    /// Create a record with only the required fields
    pub fn new(movie_id: impl Into<Value>, title: impl Into<String>, director: impl Into<String>) -> Self {
        let mut fields = Map::new();
        fields.insert(MOVIE_ID.to_string(), movie_id.into());
        fields.insert(TITLE.to_string(), Value::String(title.into()));
        fields.insert(DIRECTOR.to_string(), Value::String(director.into()));
        Self { fields }
    }

    /// Append an extra field.
    ///
    /// Required fields cannot be replaced through this builder.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        let key = key.into();
        if ![MOVIE_ID, TITLE, DIRECTOR].contains(&key.as_str()) {
            self.fields.insert(key, value.into());
        }
        self
    }

    pub fn movie_id(&self) -> &Value {
        self.fields.get(MOVIE_ID).unwrap_or(&Value::Null)
    }

    pub fn title(&self) -> &str {
        self.text(TITLE)
    }

    pub fn director(&self) -> &str {
        self.text(DIRECTOR)
    }

    /// Any field of the record, required or not
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.get(key)
    }

    pub fn fields(&self) -> &Map<String, Value> {
        &self.fields
    }

    /// Identifier rendered as text: strings as-is, everything else as JSON.
    pub fn normalized_id(&self) -> String {
        match self.movie_id() {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        }
    }

    /// The `detail` text sent over gRPC.
    pub fn director_line(&self) -> String {
        format!("Director: {}", self.director())
    }

    fn text(&self, key: &str) -> &str {
        self.fields.get(key).and_then(Value::as_str).unwrap_or_default()
    }
}

impl TryFrom<Map<String, Value>> for Record {
    type Error = RecordError;

    fn try_from(fields: Map<String, Value>) -> Result<Self, Self::Error> {
        if !fields.contains_key(MOVIE_ID) {
            return Err(RecordError::MissingField(MOVIE_ID));
        }
        for key in [TITLE, DIRECTOR] {
            match fields.get(key) {
                Some(Value::String(_)) => {}
                Some(_) => return Err(RecordError::NotAString(key)),
                None => return Err(RecordError::MissingField(key)),
            }
        }
        Ok(Self { fields })
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        self.fields.serialize(serializer)
    }
}
