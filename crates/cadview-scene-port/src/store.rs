// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Incremental scene store.
//!
//! Entries keep insertion order, which doubles as display order and as the
//! z-order hint for the viewer. The store only holds shared references to the
//! caller's objects.

use std::fmt;
use std::sync::Arc;

use crate::color::{resolve_color, transmitted_alpha, ObjectOptions, PARENT_ALPHA};

/// Name given to context entries added by [`SceneStore::append_parent`].
pub const PARENT_NAME: &str = "parent";

/// One queued object with its resolved name, color and alpha.
pub struct SceneEntry<O: ?Sized> {
    /// Caller-owned object.
    pub object: Arc<O>,
    /// Display name.
    pub name: String,
    /// RGB color.
    pub color: [u8; 3],
    /// Alpha in `[0, 1]`.
    pub alpha: f64,
}

impl<O: ?Sized> SceneEntry<O> {
    /// Alpha as sent to the viewer (never fully opaque).
    pub fn transmitted_alpha(&self) -> f64 {
        transmitted_alpha(self.alpha)
    }
}

impl<O: ?Sized> Clone for SceneEntry<O> {
    fn clone(&self) -> Self {
        Self {
            object: Arc::clone(&self.object),
            name: self.name.clone(),
            color: self.color,
            alpha: self.alpha,
        }
    }
}

impl<O: ?Sized> fmt::Debug for SceneEntry<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneEntry")
            .field("name", &self.name)
            .field("color", &self.color)
            .field("alpha", &self.alpha)
            .finish_non_exhaustive()
    }
}

/// Ordered collection of pending display entries.
pub struct SceneStore<O: ?Sized> {
    entries: Vec<SceneEntry<O>>,
}

impl<O: ?Sized> Default for SceneStore<O> {
    fn default() -> Self {
        Self {
            entries: Vec::new(),
        }
    }
}

impl<O: ?Sized> fmt::Debug for SceneStore<O> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SceneStore")
            .field("entries", &self.entries)
            .finish()
    }
}

impl<O: ?Sized> SceneStore<O> {
    /// Empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one object.
    ///
    /// Without a name the entry becomes `obj_<index>`, the index being its
    /// position at insertion time.
    pub fn append(
        &mut self,
        object: Arc<O>,
        name: Option<String>,
        options: Option<&ObjectOptions>,
        default_color: [u8; 3],
    ) -> &SceneEntry<O> {
        let (color, alpha) = resolve_color(options, default_color);
        let name = name.unwrap_or_else(|| format!("obj_{}", self.entries.len()));
        self.push(SceneEntry {
            object,
            name,
            color,
            alpha,
        })
    }

    /// Append a translucent context entry named `parent`.
    pub fn append_parent(&mut self, object: Arc<O>, default_color: [u8; 3]) -> &SceneEntry<O> {
        self.push(SceneEntry {
            object,
            name: PARENT_NAME.to_owned(),
            color: default_color,
            alpha: PARENT_ALPHA,
        })
    }

    fn push(&mut self, entry: SceneEntry<O>) -> &SceneEntry<O> {
        let index = self.entries.len();
        self.entries.push(entry);
        &self.entries[index]
    }

    /// Drop every entry; naming restarts at `obj_0`.
    pub fn clear(&mut self) {
        self.entries.clear();
    }

    /// Keep only the first `len` entries.
    pub fn truncate(&mut self, len: usize) {
        self.entries.truncate(len);
    }

    /// Current entries in display order.
    pub fn entries(&self) -> &[SceneEntry<O>] {
        &self.entries
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Objects in display order.
    pub fn objects(&self) -> impl Iterator<Item = &Arc<O>> + '_ {
        self.entries.iter().map(|e| &e.object)
    }

    /// Names in display order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.iter().map(|e| e.name.as_str())
    }

    /// Colors in display order.
    pub fn colors(&self) -> impl Iterator<Item = [u8; 3]> + '_ {
        self.entries.iter().map(|e| e.color)
    }

    /// Alphas in display order.
    pub fn alphas(&self) -> impl Iterator<Item = f64> + '_ {
        self.entries.iter().map(|e| e.alpha)
    }
}
