use std::collections::HashMap;

use crate::api::types::TextureId;

/// Lifecycle of one texture request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TextureState {
    Pending,
    Ready,
    Failed,
}

#[derive(Debug, Clone)]
struct TextureEntry {
    path: String,
    state: TextureState,
}

/// Registry of texture paths requested by the scene.
/// Each distinct path gets one `TextureId`; the host loads them and reports
/// back with `mark_ready` / `mark_failed`.
#[derive(Debug, Default)]
pub struct TextureRegistry {
    by_path: HashMap<String, TextureId>,
    entries: Vec<TextureEntry>,
}

impl TextureRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Id for `path`, registering it as pending on first request.
    pub fn request(&mut self, path: &str) -> TextureId {
        if let Some(&id) = self.by_path.get(path) {
            return id;
        }
        let id = TextureId(self.entries.len() as u32);
        self.entries.push(TextureEntry {
            path: path.to_owned(),
            state: TextureState::Pending,
        });
        self.by_path.insert(path.to_owned(), id);
        id
    }

    pub fn get(&self, path: &str) -> Option<TextureId> {
        self.by_path.get(path).copied()
    }

    pub fn path(&self, id: TextureId) -> Option<&str> {
        self.entries.get(id.0 as usize).map(|e| e.path.as_str())
    }

    pub fn state(&self, id: TextureId) -> Option<TextureState> {
        self.entries.get(id.0 as usize).map(|e| e.state)
    }

    pub fn mark_ready(&mut self, id: TextureId) {
        self.set_state(id, TextureState::Ready);
    }

    pub fn mark_failed(&mut self, id: TextureId) {
        self.set_state(id, TextureState::Failed);
    }

    fn set_state(&mut self, id: TextureId, state: TextureState) {
        match self.entries.get_mut(id.0 as usize) {
            Some(entry) => entry.state = state,
            None => log::warn!("texture {:?} is not registered", id),
        }
    }

    /// Every registered texture with its path, in id order.
    pub fn iter(&self) -> impl Iterator<Item = (TextureId, &str)> {
        self.entries
            .iter()
            .enumerate()
            .map(|(i, e)| (TextureId(i as u32), e.path.as_str()))
    }

    pub fn pending_count(&self) -> usize {
        self.entries
            .iter()
            .filter(|e| e.state == TextureState::Pending)
            .count()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
