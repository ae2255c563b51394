use crate::ids::{SceneId, TagId};

/// The part of a marker hook event that decides which tags land on a scene.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MarkerTagEvent {
    /// Scene the marker belongs to. Without it there is nothing to sync.
    pub scene_id: Option<SceneId>,
    /// The marker's primary tag, always merged when present.
    pub primary_tag_id: Option<TagId>,
    /// The marker's other tags, merged only in all-tags mode.
    pub tag_ids: Option<Vec<TagId>>,
}

impl MarkerTagEvent {
    pub fn for_scene(scene_id: SceneId) -> Self {
        Self {
            scene_id: Some(scene_id),
            ..Self::default()
        }
    }

    pub fn with_primary_tag(mut self, tag_id: TagId) -> Self {
        self.primary_tag_id = Some(tag_id);
        self
    }

    pub fn with_tags(mut self, tag_ids: impl IntoIterator<Item = TagId>) -> Self {
        self.tag_ids = Some(tag_ids.into_iter().collect());
        self
    }
}
