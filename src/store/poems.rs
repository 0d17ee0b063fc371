//! In-memory saved-poem collection with a favorites index.
//!
//! Process-local and best-effort: poems live only as long as the service.
//! The store is never touched by the generation pipeline, only by explicit
//! user save/delete/favorite actions.

use std::collections::HashMap;
use std::sync::Mutex;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::engine::params::{EmotionalTone, PoemLength, PoemStyle};

// =============================================================================
// SavedPoem
// =============================================================================

/// Payload of a save request: the poem text plus the parameters it was
/// generated with.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewPoem {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    pub style: PoemStyle,
    pub emotional_tone: EmotionalTone,
    pub creative_style: f32,
    pub language_variety: f32,
    pub length: PoemLength,
    pub word_repetition: f32,
}

/// A stored poem. Created by an explicit user save action; mutated only by
/// favorite-toggle and delete.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedPoem {
    pub id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    pub content: String,
    pub style: PoemStyle,
    pub emotional_tone: EmotionalTone,
    pub creative_style: f32,
    pub language_variety: f32,
    pub length: PoemLength,
    pub word_repetition: f32,
    pub favorite: bool,
    pub created_at: DateTime<Utc>,
}

// =============================================================================
// PoemStore
// =============================================================================

/// Keyed collection of saved poems, safe for concurrent handler access.
pub struct PoemStore {
    inner: Mutex<HashMap<String, SavedPoem>>,
}

impl PoemStore {
    pub fn new() -> Self {
        Self {
            inner: Mutex::new(HashMap::new()),
        }
    }

    /// Persist a poem and return its generated id.
    pub fn save(&self, new: NewPoem) -> SavedPoem {
        let poem = SavedPoem {
            id: uuid::Uuid::new_v4().to_string(),
            title: new.title,
            content: new.content,
            style: new.style,
            emotional_tone: new.emotional_tone,
            creative_style: new.creative_style,
            language_variety: new.language_variety,
            length: new.length,
            word_repetition: new.word_repetition,
            favorite: false,
            created_at: Utc::now(),
        };
        let mut map = self.inner.lock().expect("poem store mutex poisoned");
        map.insert(poem.id.clone(), poem.clone());
        poem
    }

    pub fn get(&self, id: &str) -> Option<SavedPoem> {
        let map = self.inner.lock().expect("poem store mutex poisoned");
        map.get(id).cloned()
    }

    /// Remove a poem. Returns true if it existed.
    pub fn delete(&self, id: &str) -> bool {
        let mut map = self.inner.lock().expect("poem store mutex poisoned");
        map.remove(id).is_some()
    }

    /// Flip the favorite flag. Returns the new state, or None if unknown.
    pub fn toggle_favorite(&self, id: &str) -> Option<bool> {
        let mut map = self.inner.lock().expect("poem store mutex poisoned");
        map.get_mut(id).map(|poem| {
            poem.favorite = !poem.favorite;
            poem.favorite
        })
    }

    pub fn favorites(&self) -> Vec<SavedPoem> {
        let map = self.inner.lock().expect("poem store mutex poisoned");
        let mut poems: Vec<_> = map.values().filter(|p| p.favorite).cloned().collect();
        poems.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        poems
    }

    /// Case-insensitive search over content, style and tone.
    pub fn search(&self, query: &str) -> Vec<SavedPoem> {
        let query = query.to_lowercase();
        let map = self.inner.lock().expect("poem store mutex poisoned");
        let mut poems: Vec<_> = map
            .values()
            .filter(|p| {
                p.content.to_lowercase().contains(&query)
                    || p.style.as_str().contains(&query)
                    || p.emotional_tone.as_str().contains(&query)
                    || p.title
                        .as_deref()
                        .map(|t| t.to_lowercase().contains(&query))
                        .unwrap_or(false)
            })
            .cloned()
            .collect();
        poems.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        poems
    }

    pub fn by_style(&self, style: PoemStyle) -> Vec<SavedPoem> {
        let map = self.inner.lock().expect("poem store mutex poisoned");
        let mut poems: Vec<_> = map.values().filter(|p| p.style == style).cloned().collect();
        poems.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        poems
    }

    /// Most recently saved poems, newest first.
    pub fn recent(&self, limit: usize) -> Vec<SavedPoem> {
        let map = self.inner.lock().expect("poem store mutex poisoned");
        let mut poems: Vec<_> = map.values().cloned().collect();
        poems.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        poems.truncate(limit);
        poems
    }
}

impl Default for PoemStore {
    fn default() -> Self {
        Self::new()
    }
}
