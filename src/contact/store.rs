use std::fmt;
use std::fs;
use std::path::PathBuf;

use chrono::{DateTime, Utc};
use rand::distr::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{BackdropError, Result};

const DOCUMENT_ID_LEN: usize = 20;

/// Keys the store writes itself; caller fields may not shadow them
const RESERVED_KEYS: [&str; 2] = ["id", "createdAt"];

/// Slash-separated collection path, e.g. `artifacts/site/users/u1/contacts`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CollectionPath {
    segments: Vec<String>,
}

impl CollectionPath {
    pub fn new<I, S>(segments: I) -> Result<Self>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let segments: Vec<String> = segments.into_iter().map(Into::into).collect();
        if segments.is_empty() {
            return Err(BackdropError::Config("collection path is empty".into()));
        }
        if let Some(bad) = segments
            .iter()
            .find(|s| s.is_empty() || s.contains(['/', '\\']) || *s == "." || *s == "..")
        {
            return Err(BackdropError::Config(format!(
                "invalid collection path segment `{bad}`"
            )));
        }
        Ok(Self { segments })
    }

    /// Per-visitor contact submissions for an application
    pub fn contacts(app_id: &str, user_id: &str) -> Result<Self> {
        Self::new(["artifacts", app_id, "users", user_id, "contacts"])
    }

    pub fn segments(&self) -> &[String] {
        &self.segments
    }
}

impl fmt::Display for CollectionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.segments.join("/"))
    }
}

/// A stored record with its store-assigned id and timestamp
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Document {
    pub id: String,
    pub created_at: DateTime<Utc>,
    #[serde(flatten)]
    pub fields: Map<String, Value>,
}

/// Minimal document store: append a record under a collection
pub trait DocumentStore {
    /// Store `fields` as a new document; the store assigns id and timestamp
    fn add_document(&mut self, collection: &CollectionPath, fields: Map<String, Value>)
        -> Result<Document>;
}

/// Stores each document as a pretty-printed JSON file
/// `<root>/<collection>/<id>.json`
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    root: PathBuf,
}

impl JsonFileStore {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn collection_dir(&self, collection: &CollectionPath) -> PathBuf {
        collection
            .segments()
            .iter()
            .fold(self.root.clone(), |dir, segment| dir.join(segment))
    }

    pub fn get(&self, collection: &CollectionPath, id: &str) -> Result<Document> {
        let path = self.collection_dir(collection).join(format!("{id}.json"));
        let text = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&text)?)
    }

    /// All documents in a collection, oldest first
    pub fn list(&self, collection: &CollectionPath) -> Result<Vec<Document>> {
        let dir = self.collection_dir(collection);
        if !dir.exists() {
            return Ok(Vec::new());
        }

        let mut documents = Vec::new();
        for entry in fs::read_dir(dir)? {
            let path = entry?.path();
            if path.extension().is_some_and(|ext| ext == "json") {
                let text = fs::read_to_string(&path)?;
                documents.push(serde_json::from_str::<Document>(&text)?);
            }
        }
        documents.sort_by(|a, b| a.created_at.cmp(&b.created_at).then_with(|| a.id.cmp(&b.id)));
        Ok(documents)
    }

    fn new_id() -> String {
        rand::rng()
            .sample_iter(&Alphanumeric)
            .take(DOCUMENT_ID_LEN)
            .map(char::from)
            .collect()
    }
}

impl DocumentStore for JsonFileStore {
    fn add_document(&mut self, collection: &CollectionPath, fields: Map<String, Value>)
        -> Result<Document>
    {
        if let Some(key) = RESERVED_KEYS.iter().find(|key| fields.contains_key(**key)) {
            return Err(BackdropError::Config(format!(
                "field `{key}` is assigned by the store"
            )));
        }

        let dir = self.collection_dir(collection);
        fs::create_dir_all(&dir)?;

        let document = Document {
            id: Self::new_id(),
            created_at: Utc::now(),
            fields,
        };

        let path = dir.join(format!("{}.json", document.id));
        fs::write(&path, serde_json::to_string_pretty(&document)?)?;
        log::debug!("Stored document {} in {}", document.id, collection);

        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn fields(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn contacts_path_is_namespaced() {
        let path = CollectionPath::contacts("portfolio", "u1").unwrap();
        assert_eq!(path.to_string(), "artifacts/portfolio/users/u1/contacts");
    }

    #[test]
    fn rejects_traversal_segments() {
        assert!(CollectionPath::contacts("..", "u1").is_err());
        assert!(CollectionPath::contacts("app", "a/b").is_err());
        assert!(CollectionPath::contacts("", "u1").is_err());
        assert!(CollectionPath::new(Vec::<String>::new()).is_err());
    }

    #[test]
    fn add_then_get_returns_the_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path());
        let collection = CollectionPath::contacts("app", "u1").unwrap();

        let stored = store
            .add_document(&collection, fields(json!({ "name": "Ada" })))
            .unwrap();
        assert_eq!(stored.id.len(), DOCUMENT_ID_LEN);

        let loaded = store.get(&collection, &stored.id).unwrap();
        assert_eq!(loaded, stored);
        assert_eq!(loaded.fields["name"], "Ada");
    }

    #[test]
    fn document_json_uses_camel_case_timestamp() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path());
        let collection = CollectionPath::contacts("app", "u1").unwrap();
        let stored = store.add_document(&collection, Map::new()).unwrap();

        let path = dir
            .path()
            .join("artifacts/app/users/u1/contacts")
            .join(format!("{}.json", stored.id));
        let raw: Value = serde_json::from_str(&fs::read_to_string(path).unwrap()).unwrap();
        assert!(raw.get("createdAt").is_some());
        assert_eq!(raw["id"], stored.id.as_str());
    }

    #[test]
    fn reserved_field_names_are_refused() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path());
        let collection = CollectionPath::contacts("app", "u1").unwrap();

        for reserved in [json!({ "id": "mine", "name": "Ada" }), json!({ "createdAt": 0 })] {
            let err = store.add_document(&collection, fields(reserved)).unwrap_err();
            assert!(matches!(err, BackdropError::Config(_)));
        }
        assert!(store.list(&collection).unwrap().is_empty());
    }

    #[test]
    fn near_miss_field_names_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path());
        let collection = CollectionPath::contacts("app", "u1").unwrap();

        let stored = store
            .add_document(&collection, fields(json!({ "ID": "mine", "created_at": "today" })))
            .unwrap();
        let loaded = store.get(&collection, &stored.id).unwrap();
        assert_eq!(loaded, stored);
        assert_eq!(loaded.fields["ID"], "mine");
    }

    #[test]
    fn list_of_missing_collection_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonFileStore::new(dir.path());
        let collection = CollectionPath::contacts("app", "nobody").unwrap();
        assert!(store.list(&collection).unwrap().is_empty());
    }

    #[test]
    fn list_returns_every_document() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = JsonFileStore::new(dir.path());
        let collection = CollectionPath::contacts("app", "u1").unwrap();

        for n in 0..3 {
            store
                .add_document(&collection, fields(json!({ "n": n })))
                .unwrap();
        }
        assert_eq!(store.list(&collection).unwrap().len(), 3);
    }
}
