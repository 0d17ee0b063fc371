//! Share-link store: mints a short random identifier mapping to a snapshot
//! of a poem at share time. Snapshots are independent of the saved-poem
//! collection; editing or deleting the original never mutates a share.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use rand::distributions::Alphanumeric;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::poems::NewPoem;

/// Length of minted share identifiers.
const SHARE_ID_LEN: usize = 12;

/// A poem snapshot published under a share id.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SharedPoem {
    pub share_id: String,
    #[serde(flatten)]
    pub poem: NewPoem,
    pub shared_at: DateTime<Utc>,
}

/// In-memory share map, safe for concurrent handler access.
pub struct ShareStore {
    inner: Mutex<HashMap<String, SharedPoem>>,
}

impl ShareStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Snapshot a poem under a fresh share id and return the record.
    pub fn share(&self, poem: NewPoem) -> SharedPoem {
        let shared = SharedPoem {
            share_id: mint_share_id(),
            poem,
            shared_at: Utc::now(),
        };
        let mut map = self.inner.lock().expect("share store mutex poisoned");
        map.insert(shared.share_id.clone(), shared.clone());
        shared
    }

    pub fn get(&self, share_id: &str) -> Option<SharedPoem> {
        let map = self.inner.lock().expect("share store mutex poisoned");
        map.get(share_id).cloned()
    }
}

impl Default for ShareStore {
    fn default() -> Self {
        Self::new()
    }
}

fn mint_share_id() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(SHARE_ID_LEN)
        .map(char::from)
        .collect::<String>()
        .to_lowercase()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::params::{EmotionalTone, PoemLength, PoemStyle};

    fn poem() -> NewPoem {
        NewPoem {
            title: None,
            content: "shared verse".into(),
            style: PoemStyle::FreeVerse,
            emotional_tone: EmotionalTone::Joyful,
            creative_style: 70.0,
            language_variety: 0.8,
            length: PoemLength::Short,
            word_repetition: 1.0,
        }
    }

    #[test]
    fn test_share_then_get_round_trip() {
        let store = ShareStore::new();
        let shared = store.share(poem());

        assert_eq!(shared.share_id.len(), SHARE_ID_LEN);
        let fetched = store.get(&shared.share_id).unwrap();
        assert_eq!(fetched.poem.content, "shared verse");
        assert_eq!(fetched.shared_at, shared.shared_at);
    }

    #[test]
    fn test_unknown_share_id_is_none() {
        let store = ShareStore::new();
        assert!(store.get("nope").is_none());
    }

    #[test]
    fn test_share_ids_distinct() {
        let store = ShareStore::new();
        let a = store.share(poem());
        let b = store.share(poem());
        assert_ne!(a.share_id, b.share_id);
    }
}
