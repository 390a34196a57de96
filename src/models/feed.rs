// src/models/feed.rs

//! Records as published by the upstream feed.
//!
//! Both feed endpoints wrap their rows in the same envelope:
//!
//! ```text
//! { "data": { "": [ { "columns": { ... } }, ... ] } }
//! ```

use serde::de::{DeserializeOwned, Error as _};
use serde::{Deserialize, Deserializer};

use crate::error::Result;

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    data: Rows<T>,
}

#[derive(Debug, Deserialize)]
struct Rows<T> {
    #[serde(rename = "")]
    rows: Vec<Row<T>>,
}

#[derive(Debug, Deserialize)]
struct Row<T> {
    columns: T,
}

/// Unwrap the feed envelope into its row payloads.
pub fn parse_rows<T: DeserializeOwned>(body: &[u8]) -> Result<Vec<T>> {
    let envelope: Envelope<T> = serde_json::from_slice(body)?;
    Ok(envelope.data.rows.into_iter().map(|r| r.columns).collect())
}

/// An organization registration listed by the feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedOrganization {
    /// Short id, stored as the organization name
    pub org_id: String,

    /// Display name, stored as the full name
    #[serde(default)]
    pub name: String,
}

/// A completed task listed by the feed.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct FeedTask {
    #[serde(deserialize_with = "numeric_key")]
    pub key: u64,

    pub student: String,

    pub title: String,

    /// Comma-separated category list
    #[serde(default)]
    pub types: String,
}

impl FeedTask {
    /// Category list split out of `types`.
    pub fn categories(&self) -> Vec<String> {
        split_categories(&self.types)
    }
}

/// Split a comma-separated category string, dropping empty entries.
pub fn split_categories(types: &str) -> Vec<String> {
    types
        .split(',')
        .map(str::trim)
        .filter(|c| !c.is_empty())
        .map(str::to_string)
        .collect()
}

/// Keys arrive either as JSON numbers or as numeric strings.
fn numeric_key<'de, D: Deserializer<'de>>(deserializer: D) -> std::result::Result<u64, D::Error> {
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum RawKey {
        Number(u64),
        Text(String),
    }

    match RawKey::deserialize(deserializer)? {
        RawKey::Number(n) => Ok(n),
        RawKey::Text(s) => s
            .trim()
            .parse()
            .map_err(|_| D::Error::custom(format!("task key '{s}' is not numeric"))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_organizations() {
        let body = br#"{"data":{"":[
            {"columns":{"org_id":"brlcad","name":"BRL-CAD"}},
            {"columns":{"org_id":"sugarlabs","name":"Sugar Labs"}}
        ]}}"#;

        let orgs: Vec<FeedOrganization> = parse_rows(body).unwrap();
        assert_eq!(orgs.len(), 2);
        assert_eq!(orgs[0].org_id, "brlcad");
        assert_eq!(orgs[1].name, "Sugar Labs");
    }

    #[test]
    fn test_parse_tasks_with_string_and_number_keys() {
        let body = br#"{"data":{"":[
            {"columns":{"key":101,"student":"A","title":"Fix docs","types":"Documentation, Code"}},
            {"columns":{"key":"102","student":"B","title":"Logo","types":""}}
        ]}}"#;

        let tasks: Vec<FeedTask> = parse_rows(body).unwrap();
        assert_eq!(tasks[0].key, 101);
        assert_eq!(tasks[0].categories(), vec!["Documentation", "Code"]);
        assert_eq!(tasks[1].key, 102);
        assert!(tasks[1].categories().is_empty());
    }

    #[test]
    fn test_rejects_non_numeric_key() {
        let body = br#"{"data":{"":[{"columns":{"key":"abc","student":"A","title":"T"}}]}}"#;
        assert!(parse_rows::<FeedTask>(body).is_err());
    }

    #[test]
    fn test_rejects_missing_envelope() {
        assert!(parse_rows::<FeedOrganization>(br#"{"rows":[]}"#).is_err());
    }

    #[test]
    fn test_split_categories_trims() {
        assert_eq!(
            split_categories("Code,  User Interface ,,Outreach"),
            vec!["Code", "User Interface", "Outreach"]
        );
    }
}
