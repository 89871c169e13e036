//! Scene records and the ordered scene store.
//!
//! A scene is one narrated time segment of the source video. The store
//! keeps scenes in insertion/display order (never re-sorted by time) and
//! exposes a pure-transformation API: every edit returns a new list, so a
//! snapshot taken at export start is insulated from later edits.

use std::sync::atomic::{AtomicU64, Ordering};

use serde::{Deserialize, Serialize};

use crate::timecode::format_seconds;

/// Placeholder narration for freshly added scenes.
const NEW_SCENE_NARRATION: &str = "New narration...";

/// Opaque stable scene identifier.
///
/// Assigned at creation, never reused, unrelated to position. Skipped on
/// serialization so exported documents never leak internal identity.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SceneId(String);

impl SceneId {
    /// Generate a fresh identifier, distinct from all previously generated
    /// ones within this process.
    pub fn generate() -> Self {
        Self(uuid_v4())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for SceneId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// One narrated time segment.
///
/// `start_time` and `end_time` are permissive time strings and are not
/// validated at storage time: they may be malformed or inverted
/// (`start >= end`). Handling that is the export pipeline's job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    #[serde(skip_serializing, default = "SceneId::generate")]
    pub id: SceneId,

    /// Start of the segment (`HH:MM:SS`, `MM:SS`, or `SS`).
    pub start_time: String,

    /// End of the segment (same formats as `start_time`).
    pub end_time: String,

    /// Narration text for this segment. No length bound.
    pub narration: String,
}

impl Scene {
    /// Start position in seconds.
    pub fn start_secs(&self) -> f64 {
        crate::timecode::parse_to_seconds(&self.start_time)
    }

    /// End position in seconds.
    pub fn end_secs(&self) -> f64 {
        crate::timecode::parse_to_seconds(&self.end_time)
    }
}

/// An id-less scene as produced by the generation collaborator and as
/// written to the structured sidecar.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDraft {
    pub start_time: String,
    pub end_time: String,
    pub narration: String,
}

/// Selector for the editable fields of a [`Scene`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SceneField {
    StartTime,
    EndTime,
    Narration,
}

/// Ordered, in-memory collection of scenes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SceneList {
    scenes: Vec<Scene>,
}

impl SceneList {
    /// An empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a store from generator output, assigning fresh ids in order.
    pub fn seeded(drafts: impl IntoIterator<Item = SceneDraft>) -> Self {
        Self {
            scenes: drafts
                .into_iter()
                .map(|draft| Scene {
                    id: SceneId::generate(),
                    start_time: draft.start_time,
                    end_time: draft.end_time,
                    narration: draft.narration,
                })
                .collect(),
        }
    }

    /// Replace exactly the named field on the scene matching `id`.
    ///
    /// No-op when `id` is absent. The new value is not validated.
    pub fn update(&self, id: &SceneId, field: SceneField, value: impl Into<String>) -> Self {
        let value = value.into();
        Self {
            scenes: self
                .scenes
                .iter()
                .map(|scene| {
                    if &scene.id == id {
                        let mut updated = scene.clone();
                        match field {
                            SceneField::StartTime => updated.start_time = value.clone(),
                            SceneField::EndTime => updated.end_time = value.clone(),
                            SceneField::Narration => updated.narration = value.clone(),
                        }
                        updated
                    } else {
                        scene.clone()
                    }
                })
                .collect(),
        }
    }

    /// Remove the scene matching `id`. No-op when absent; other scenes'
    /// ids are untouched.
    pub fn delete(&self, id: &SceneId) -> Self {
        Self {
            scenes: self
                .scenes
                .iter()
                .filter(|scene| &scene.id != id)
                .cloned()
                .collect(),
        }
    }

    /// Append a new zero-length scene starting where the last one ends
    /// (or at `00:00:00` for an empty store).
    pub fn add(&self) -> Self {
        let start_time = self
            .scenes
            .last()
            .map(|scene| scene.end_time.clone())
            .unwrap_or_else(|| format_seconds(0.0));

        let mut id = SceneId::generate();
        while self.scenes.iter().any(|scene| scene.id == id) {
            id = SceneId::generate();
        }

        let mut scenes = self.scenes.clone();
        scenes.push(Scene {
            id,
            start_time: start_time.clone(),
            end_time: start_time,
            narration: NEW_SCENE_NARRATION.to_string(),
        });
        Self { scenes }
    }

    /// Discard all scenes (project restart).
    pub fn clear(&self) -> Self {
        Self::new()
    }

    /// Immutable copy handed to the export pipeline at invocation start.
    pub fn snapshot(&self) -> Vec<Scene> {
        self.scenes.clone()
    }

    pub fn scenes(&self) -> &[Scene] {
        &self.scenes
    }

    pub fn get(&self, id: &SceneId) -> Option<&Scene> {
        self.scenes.iter().find(|scene| &scene.id == id)
    }

    pub fn len(&self) -> usize {
        self.scenes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.scenes.is_empty()
    }
}

/// Generate a UUIDv4-shaped identifier without an external dependency.
///
/// Seeded from the wall clock mixed with a process-local counter so that
/// back-to-back calls within the same nanosecond still differ.
fn uuid_v4() -> String {
    use std::time::{SystemTime, UNIX_EPOCH};

    static COUNTER: AtomicU64 = AtomicU64::new(0);

    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos())
        .unwrap_or(0);
    let count = COUNTER.fetch_add(1, Ordering::Relaxed) as u128;
    let seed = nanos ^ (count << 80);

    format!(
        "{:08x}-{:04x}-4{:03x}-{:04x}-{:012x}",
        (seed & 0xFFFFFFFF) as u32,
        ((seed >> 32) & 0xFFFF) as u16,
        ((seed >> 48) & 0x0FFF) as u16,
        (((seed >> 60) & 0x3F) | 0x80) as u16 | (((seed >> 66) & 0x3FF) as u16) << 6,
        (seed >> 76) & 0xFFFFFFFFFFFF,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft(start: &str, end: &str, narration: &str) -> SceneDraft {
        SceneDraft {
            start_time: start.to_string(),
            end_time: end.to_string(),
            narration: narration.to_string(),
        }
    }

    #[test]
    fn add_on_empty_store_yields_zero_timestamp_scene() {
        let store = SceneList::new().add();
        assert_eq!(store.len(), 1);
        let scene = &store.scenes()[0];
        assert_eq!(scene.start_time, "00:00:00");
        assert_eq!(scene.end_time, "00:00:00");
        assert_eq!(scene.narration, NEW_SCENE_NARRATION);
    }

    #[test]
    fn add_chains_from_last_scene_end() {
        let store = SceneList::seeded([draft("00:00:00", "00:01:30", "intro")]).add();
        let added = &store.scenes()[1];
        assert_eq!(added.start_time, "00:01:30");
        assert_eq!(added.end_time, "00:01:30");
    }

    #[test]
    fn generated_ids_are_unique() {
        let mut store = SceneList::new();
        for _ in 0..64 {
            store = store.add();
        }
        let mut ids: Vec<&str> = store.scenes().iter().map(|s| s.id.as_str()).collect();
        ids.sort_unstable();
        ids.dedup();
        assert_eq!(ids.len(), 64);
    }

    #[test]
    fn update_replaces_only_the_named_field() {
        let store = SceneList::seeded([draft("00:00:00", "00:00:05", "a")]);
        let id = store.scenes()[0].id.clone();

        let updated = store.update(&id, SceneField::EndTime, "00:00:09");
        assert_eq!(updated.scenes()[0].end_time, "00:00:09");
        assert_eq!(updated.scenes()[0].start_time, "00:00:00");
        assert_eq!(updated.scenes()[0].narration, "a");
        assert_eq!(updated.scenes()[0].id, id);
    }

    #[test]
    fn update_allows_inverted_ranges() {
        let store = SceneList::seeded([draft("00:00:10", "00:00:20", "a")]);
        let id = store.scenes()[0].id.clone();

        let updated = store.update(&id, SceneField::EndTime, "00:00:05");
        assert_eq!(updated.scenes()[0].end_time, "00:00:05");
    }

    #[test]
    fn update_with_unknown_id_is_a_noop() {
        let store = SceneList::seeded([draft("00:00:00", "00:00:05", "a")]);
        let updated = store.update(&SceneId::generate(), SceneField::Narration, "x");
        assert_eq!(updated, store);
    }

    #[test]
    fn delete_with_unknown_id_leaves_store_unchanged() {
        let store = SceneList::seeded([
            draft("00:00:00", "00:00:05", "a"),
            draft("00:00:05", "00:00:10", "b"),
        ]);
        let after = store.delete(&SceneId::generate());
        assert_eq!(after, store);
    }

    #[test]
    fn delete_removes_only_the_matching_scene() {
        let store = SceneList::seeded([
            draft("00:00:00", "00:00:05", "a"),
            draft("00:00:05", "00:00:10", "b"),
        ]);
        let first = store.scenes()[0].id.clone();
        let second = store.scenes()[1].id.clone();

        let after = store.delete(&first);
        assert_eq!(after.len(), 1);
        assert_eq!(after.scenes()[0].id, second);
    }

    #[test]
    fn clear_discards_all_scenes() {
        let store = SceneList::seeded([draft("00:00:00", "00:00:05", "a")]);
        assert!(store.clear().is_empty());
    }

    #[test]
    fn snapshot_is_insulated_from_later_edits() {
        let store = SceneList::seeded([draft("00:00:00", "00:00:05", "a")]);
        let id = store.scenes()[0].id.clone();
        let snapshot = store.snapshot();

        let _edited = store.update(&id, SceneField::Narration, "changed");
        assert_eq!(snapshot[0].narration, "a");
    }

    #[test]
    fn scene_serialization_omits_id() {
        let store = SceneList::seeded([draft("00:00:00", "00:00:05", "hello")]);
        let json = serde_json::to_value(&store.scenes()[0]).unwrap();
        assert!(json.get("id").is_none());
        assert_eq!(json["startTime"], "00:00:00");
        assert_eq!(json["endTime"], "00:00:05");
        assert_eq!(json["narration"], "hello");
    }
}
