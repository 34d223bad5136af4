//! Todo item model.
//!
//! Priorities and statuses are persisted as their upper-case tags. Reading
//! them back is fail-open: an unknown or missing tag becomes the default
//! variant instead of an error.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::{Map, Value};
use thiserror::Error;
use uuid::Uuid;

/// Returned by the strict `FromStr` parsers when a tag is not recognised.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[error("'{value}' is not a valid {kind}")]
pub struct UnknownTag {
    kind: &'static str,
    value: String,
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Priority {
    High,
    #[default]
    Mid,
    Low,
}

impl Priority {
    pub const ALL: [Priority; 3] = [Priority::High, Priority::Mid, Priority::Low];

    pub fn as_str(self) -> &'static str {
        match self {
            Priority::High => "HIGH",
            Priority::Mid => "MID",
            Priority::Low => "LOW",
        }
    }
}

#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Status {
    #[default]
    Pending,
    Completed,
}

impl Status {
    pub const ALL: [Status; 2] = [Status::Pending, Status::Completed];

    pub fn as_str(self) -> &'static str {
        match self {
            Status::Pending => "PENDING",
            Status::Completed => "COMPLETED",
        }
    }
}

impl FromStr for Priority {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Priority::ALL
            .into_iter()
            .find(|p| p.as_str() == s)
            .ok_or_else(|| UnknownTag {
                kind: "Priority",
                value: s.to_string(),
            })
    }
}

impl FromStr for Status {
    type Err = UnknownTag;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Status::ALL
            .into_iter()
            .find(|st| st.as_str() == s)
            .ok_or_else(|| UnknownTag {
                kind: "Status",
                value: s.to_string(),
            })
    }
}

/// Fail-open conversion: unknown tags resolve to [`Priority::Mid`].
impl From<&str> for Priority {
    fn from(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

/// Fail-open conversion: unknown tags resolve to [`Status::Pending`].
impl From<&str> for Status {
    fn from(s: &str) -> Self {
        s.parse().unwrap_or_default()
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl Serialize for Priority {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

impl Serialize for Status {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.as_str())
    }
}

/// Any JSON value; only strings carry text.
#[derive(Deserialize)]
#[serde(untagged)]
enum RawText {
    Text(String),
    Other(serde::de::IgnoredAny),
}

/// Reads a string into `T`; any other JSON value (null, number, ...)
/// becomes `T::default()`.
fn fail_open<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + for<'a> From<&'a str>,
{
    Ok(match RawText::deserialize(deserializer)? {
        RawText::Text(text) => T::from(text.as_str()),
        RawText::Other(_) => T::default(),
    })
}

impl<'de> Deserialize<'de> for Priority {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        fail_open(deserializer)
    }
}

impl<'de> Deserialize<'de> for Status {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        fail_open(deserializer)
    }
}

/// Current local time as an ISO-8601 string with microseconds.
pub fn timestamp_now() -> String {
    chrono::Local::now()
        .naive_local()
        .format("%Y-%m-%dT%H:%M:%S%.6f")
        .to_string()
}

/// A single task owned by one user.
///
/// Text fields holding a non-string JSON value read back as empty; `id`
/// must be a string when present.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TodoItem {
    pub id: String,
    #[serde(deserialize_with = "fail_open")]
    pub title: String,
    #[serde(deserialize_with = "fail_open")]
    pub details: String,
    pub priority: Priority,
    pub status: Status,
    #[serde(deserialize_with = "fail_open")]
    pub owner: String,
    #[serde(deserialize_with = "fail_open")]
    pub created_at: String,
    #[serde(deserialize_with = "fail_open")]
    pub updated_at: String,
}

impl Default for TodoItem {
    fn default() -> Self {
        let now = timestamp_now();
        Self {
            id: Uuid::new_v4().to_string(),
            title: String::new(),
            details: String::new(),
            priority: Priority::default(),
            status: Status::default(),
            owner: String::new(),
            created_at: now.clone(),
            updated_at: now,
        }
    }
}

impl TodoItem {
    /// Builds a pending item with a fresh id and timestamps.
    pub fn new(
        title: impl Into<String>,
        details: impl Into<String>,
        priority: impl Into<Priority>,
        owner: impl Into<String>,
    ) -> Self {
        Self {
            title: title.into(),
            details: details.into(),
            priority: priority.into(),
            owner: owner.into(),
            ..Default::default()
        }
    }

    /// Refreshes `updated_at`.
    pub fn touch(&mut self) {
        self.updated_at = timestamp_now();
    }

    pub fn complete(&mut self) {
        self.status = Status::Completed;
        self.touch();
    }

    /// Every field as a JSON object, enums as their tags.
    pub fn to_dict(&self) -> Map<String, Value> {
        let mut map = Map::new();
        map.insert("id".into(), self.id.clone().into());
        map.insert("title".into(), self.title.clone().into());
        map.insert("details".into(), self.details.clone().into());
        map.insert("priority".into(), self.priority.as_str().into());
        map.insert("status".into(), self.status.as_str().into());
        map.insert("owner".into(), self.owner.clone().into());
        map.insert("created_at".into(), self.created_at.clone().into());
        map.insert("updated_at".into(), self.updated_at.clone().into());
        map
    }

    /// Reads an item from a possibly partial JSON object.
    ///
    /// Missing keys take their defaults and unknown enum tags fall back to
    /// `MID`/`PENDING`; non-string text fields read as empty. Only a
    /// non-string `id` is an error.
    pub fn from_dict(map: &Map<String, Value>) -> Result<Self, serde_json::Error> {
        serde_json::from_value(Value::Object(map.clone()))
    }
}
