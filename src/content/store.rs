use std::sync::{Mutex, MutexGuard};

use serde::Deserialize;
use serde_json::Value;

use crate::content::{ContentKind, ContentLists};
use crate::error::ContentError;

/// The remote list contract: fetch a whole list, or replace it wholesale.
pub trait ContentStore: Send + Sync {
    fn fetch(&self, kind: ContentKind) -> Result<Vec<String>, ContentError>;
    fn replace(&self, kind: ContentKind, lines: &[String]) -> Result<(), ContentError>;
}

#[derive(Debug, Deserialize)]
struct SaveReply {
    success: bool,
    #[serde(default)]
    error: Option<String>,
}

/// Pull the list out of a `{"texts": [...]}` / `{"snippets": [...]}` body.
/// A missing field reads as an empty list.
fn parse_list(body: &Value, field: &str) -> Result<Vec<String>, ContentError> {
    let obj = body
        .as_object()
        .ok_or_else(|| ContentError::Malformed("expected a JSON object".to_string()))?;
    match obj.get(field) {
        None | Some(Value::Null) => Ok(Vec::new()),
        Some(Value::Array(items)) => items
            .iter()
            .map(|item| {
                item.as_str().map(str::to_string).ok_or_else(|| {
                    ContentError::Malformed(format!("non-string entry in `{field}`"))
                })
            })
            .collect(),
        Some(_) => Err(ContentError::Malformed(format!("`{field}` is not a list"))),
    }
}

fn check_reply(reply: SaveReply) -> Result<(), ContentError> {
    if reply.success {
        Ok(())
    } else {
        Err(ContentError::Rejected(
            reply.error.unwrap_or_else(|| "unknown error".to_string()),
        ))
    }
}

pub struct HttpContentStore {
    base_url: String,
    #[cfg(feature = "network")]
    client: reqwest::blocking::Client,
}

impl HttpContentStore {
    #[cfg(feature = "network")]
    pub fn new(base_url: &str, timeout: std::time::Duration) -> Result<Self, ContentError> {
        let client = reqwest::blocking::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ContentError::Network(e.to_string()))?;
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            client,
        })
    }

    #[cfg(not(feature = "network"))]
    pub fn new(base_url: &str, _timeout: std::time::Duration) -> Result<Self, ContentError> {
        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    pub fn url(&self, kind: ContentKind) -> String {
        format!("{}/api/{}", self.base_url, kind.endpoint())
    }
}

#[cfg(feature = "network")]
impl ContentStore for HttpContentStore {
    fn fetch(&self, kind: ContentKind) -> Result<Vec<String>, ContentError> {
        let response = self
            .client
            .get(self.url(kind))
            .send()
            .map_err(|e| ContentError::Network(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ContentError::Status(response.status().as_u16()));
        }
        let body: Value = response
            .json()
            .map_err(|e| ContentError::Malformed(e.to_string()))?;
        parse_list(&body, kind.field())
    }

    fn replace(&self, kind: ContentKind, lines: &[String]) -> Result<(), ContentError> {
        let mut payload = serde_json::Map::new();
        payload.insert(kind.field().to_string(), Value::from(lines.to_vec()));
        let response = self
            .client
            .post(self.url(kind))
            .json(&payload)
            .send()
            .map_err(|e| ContentError::Network(e.to_string()))?;
        if !response.status().is_success() {
            return Err(ContentError::Status(response.status().as_u16()));
        }
        let reply: SaveReply = response
            .json()
            .map_err(|e| ContentError::Malformed(e.to_string()))?;
        check_reply(reply)
    }
}

#[cfg(not(feature = "network"))]
impl ContentStore for HttpContentStore {
    fn fetch(&self, _kind: ContentKind) -> Result<Vec<String>, ContentError> {
        Err(ContentError::Unavailable)
    }

    fn replace(&self, _kind: ContentKind, _lines: &[String]) -> Result<(), ContentError> {
        Err(ContentError::Unavailable)
    }
}

/// In-process stand-in for the remote store, used for `--offline` and tests.
#[derive(Default)]
pub struct MemoryContentStore {
    lists: Mutex<ContentLists>,
    failing_fetches: Mutex<Vec<ContentKind>>,
    save_rejection: Mutex<Option<String>>,
}

fn lock<T>(m: &Mutex<T>) -> MutexGuard<'_, T> {
    m.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

impl MemoryContentStore {
    pub fn new(lists: ContentLists) -> Self {
        Self {
            lists: Mutex::new(lists),
            ..Self::default()
        }
    }

    /// Make fetches of `kind` fail until cleared.
    pub fn fail_fetch(&self, kind: ContentKind) {
        lock(&self.failing_fetches).push(kind);
    }

    /// Answer every save with `{"success": false, "error": message}`.
    pub fn reject_saves(&self, message: Option<&str>) {
        *lock(&self.save_rejection) = message.map(str::to_string);
    }

    pub fn snapshot(&self) -> ContentLists {
        lock(&self.lists).clone()
    }
}

impl ContentStore for MemoryContentStore {
    fn fetch(&self, kind: ContentKind) -> Result<Vec<String>, ContentError> {
        if lock(&self.failing_fetches).contains(&kind) {
            return Err(ContentError::Network(format!(
                "fetch of {} failed",
                kind.endpoint()
            )));
        }
        Ok(lock(&self.lists).get(kind).to_vec())
    }

    fn replace(&self, kind: ContentKind, lines: &[String]) -> Result<(), ContentError> {
        let rejection = lock(&self.save_rejection).clone();
        check_reply(SaveReply {
            success: rejection.is_none(),
            error: rejection,
        })?;
        lock(&self.lists).set(kind, lines.to_vec());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_parse_list_reads_field() {
        let body = json!({"texts": ["a", "b"]});
        assert_eq!(parse_list(&body, "texts").unwrap(), vec!["a", "b"]);
    }

    #[test]
    fn test_parse_list_missing_field_is_empty() {
        let body = json!({"other": 1});
        assert!(parse_list(&body, "snippets").unwrap().is_empty());
    }

    #[test]
    fn test_parse_list_rejects_bad_shapes() {
        assert!(matches!(
            parse_list(&json!(["a"]), "texts"),
            Err(ContentError::Malformed(_))
        ));
        assert!(matches!(
            parse_list(&json!({"texts": "a"}), "texts"),
            Err(ContentError::Malformed(_))
        ));
        assert!(matches!(
            parse_list(&json!({"texts": ["a", 3]}), "texts"),
            Err(ContentError::Malformed(_))
        ));
    }

    #[test]
    fn test_save_reply_error_message() {
        let reply: SaveReply =
            serde_json::from_value(json!({"success": false, "error": "disk full"})).unwrap();
        assert_eq!(
            check_reply(reply),
            Err(ContentError::Rejected("disk full".to_string()))
        );
        let reply: SaveReply = serde_json::from_value(json!({"success": true})).unwrap();
        assert_eq!(check_reply(reply), Ok(()));
    }

    #[test]
    fn test_http_url_layout() {
        let store =
            HttpContentStore::new("http://127.0.0.1:5000/", std::time::Duration::from_secs(1))
                .unwrap();
        assert_eq!(
            store.url(ContentKind::HtmlSnippets),
            "http://127.0.0.1:5000/api/html-snippets"
        );
    }

    #[test]
    fn test_memory_store_overwrites() {
        let store = MemoryContentStore::new(ContentLists {
            texts: vec!["old".to_string()],
            snippets: Vec::new(),
        });
        store
            .replace(ContentKind::TypingTexts, &["new".to_string()])
            .unwrap();
        assert_eq!(store.fetch(ContentKind::TypingTexts).unwrap(), vec!["new"]);
    }

    #[test]
    fn test_memory_store_failures() {
        let store = MemoryContentStore::default();
        store.fail_fetch(ContentKind::HtmlSnippets);
        assert!(store.fetch(ContentKind::HtmlSnippets).is_err());
        assert!(store.fetch(ContentKind::TypingTexts).is_ok());

        store.reject_saves(Some("read-only"));
        assert_eq!(
            store.replace(ContentKind::TypingTexts, &[]),
            Err(ContentError::Rejected("read-only".to_string()))
        );
    }
}
