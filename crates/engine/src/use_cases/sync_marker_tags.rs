//! Marker tag sync use case.
//!
//! Merges a marker's primary tag (and, in all-tags mode, its other tags)
//! into the tags of the scene the marker belongs to.

use std::sync::Arc;

use markertag_domain::{plan_tag_update, MarkerTagEvent, SceneId, TagId, TagSet, TagUpdate};

use crate::infrastructure::ports::{GraphqlError, SceneTagPort};

/// What a sync run did.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SyncOutcome {
    /// The event named no scene; nothing was fetched or written.
    Skipped,
    /// The scene already carried every tag the event brings.
    NoNewTags { scene_id: SceneId },
    /// The scene's tag list was replaced with a larger one.
    TagsAdded { scene_id: SceneId, added: Vec<TagId> },
}

impl SyncOutcome {
    /// Message reported to the host, if any.
    pub fn message(&self) -> Option<String> {
        match self {
            Self::Skipped => None,
            Self::NoNewTags { .. } => Some("No new tag added".to_string()),
            Self::TagsAdded { scene_id, .. } => Some(format!("Added new tags to scene {scene_id}")),
        }
    }
}

pub struct SyncMarkerTags {
    scenes: Arc<dyn SceneTagPort>,
    all_tags: bool,
}

impl SyncMarkerTags {
    pub fn new(scenes: Arc<dyn SceneTagPort>, all_tags: bool) -> Self {
        Self { scenes, all_tags }
    }

    pub async fn execute(&self, event: &MarkerTagEvent) -> Result<SyncOutcome, GraphqlError> {
        let Some(scene_id) = event.scene_id.clone() else {
            return Ok(SyncOutcome::Skipped);
        };

        let previous: TagSet = self.scenes.scene_tags(&scene_id).await?.into_iter().collect();

        match plan_tag_update(&previous, event, self.all_tags) {
            TagUpdate::Unchanged => {
                tracing::debug!("No new tag added");
                Ok(SyncOutcome::NoNewTags { scene_id })
            }
            TagUpdate::Replace { next, added } => {
                self.scenes
                    .set_scene_tags(&scene_id, next.into_vec())
                    .await?;
                tracing::debug!("Added new tags to scene {}", scene_id);
                Ok(SyncOutcome::TagsAdded { scene_id, added })
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::ports::MockSceneTagPort;
    use mockall::predicate::*;

    fn scene(id: &str) -> SceneId {
        SceneId::new(id).unwrap()
    }

    fn tag(id: &str) -> TagId {
        TagId::new(id).unwrap()
    }

    fn tag_strings(tags: &[TagId]) -> Vec<String> {
        let mut ids: Vec<String> = tags.iter().map(|t| t.to_string()).collect();
        ids.sort();
        ids
    }

    #[tokio::test]
    async fn adds_new_primary_tag() {
        let mut scenes = MockSceneTagPort::new();

        scenes
            .expect_scene_tags()
            .with(eq(scene("123")))
            .times(1)
            .returning(|_| Ok(vec![tag("A")]));

        scenes
            .expect_set_scene_tags()
            .withf(|scene_id, tags| {
                scene_id.as_str() == "123" && tag_strings(tags) == vec!["A", "B"]
            })
            .times(1)
            .returning(|_, _| Ok(serde_json::json!({ "sceneUpdate": { "id": "123" } })));

        let use_case = SyncMarkerTags::new(Arc::new(scenes), false);
        let event = MarkerTagEvent::for_scene(scene("123")).with_primary_tag(tag("B"));

        let outcome = use_case.execute(&event).await.unwrap();

        assert_eq!(
            outcome,
            SyncOutcome::TagsAdded {
                scene_id: scene("123"),
                added: vec![tag("B")],
            }
        );
        assert_eq!(
            outcome.message().as_deref(),
            Some("Added new tags to scene 123")
        );
    }

    #[tokio::test]
    async fn existing_primary_tag_sends_no_mutation() {
        let mut scenes = MockSceneTagPort::new();

        scenes
            .expect_scene_tags()
            .returning(|_| Ok(vec![tag("A")]));
        scenes.expect_set_scene_tags().never();

        let use_case = SyncMarkerTags::new(Arc::new(scenes), false);
        let event = MarkerTagEvent::for_scene(scene("123")).with_primary_tag(tag("A"));

        let outcome = use_case.execute(&event).await.unwrap();

        assert_eq!(
            outcome,
            SyncOutcome::NoNewTags {
                scene_id: scene("123")
            }
        );
        assert_eq!(outcome.message().as_deref(), Some("No new tag added"));
    }

    #[tokio::test]
    async fn missing_scene_id_makes_no_calls() {
        let mut scenes = MockSceneTagPort::new();
        scenes.expect_scene_tags().never();
        scenes.expect_set_scene_tags().never();

        let use_case = SyncMarkerTags::new(Arc::new(scenes), true);
        let event = MarkerTagEvent::default().with_primary_tag(tag("B"));

        let outcome = use_case.execute(&event).await.unwrap();

        assert_eq!(outcome, SyncOutcome::Skipped);
        assert!(outcome.message().is_none());
    }

    #[tokio::test]
    async fn all_tags_mode_merges_tag_list() {
        let mut scenes = MockSceneTagPort::new();

        scenes
            .expect_scene_tags()
            .returning(|_| Ok(vec![tag("A")]));
        scenes
            .expect_set_scene_tags()
            .withf(|_, tags| tag_strings(tags) == vec!["A", "B", "C", "D"])
            .times(1)
            .returning(|_, _| Ok(serde_json::Value::Null));

        let use_case = SyncMarkerTags::new(Arc::new(scenes), true);
        let event = MarkerTagEvent::for_scene(scene("123"))
            .with_primary_tag(tag("B"))
            .with_tags([tag("C"), tag("D"), tag("A")]);

        let outcome = use_case.execute(&event).await.unwrap();

        match outcome {
            SyncOutcome::TagsAdded { added, .. } => {
                assert_eq!(tag_strings(&added), vec!["B", "C", "D"]);
            }
            other => panic!("unexpected outcome: {other:?}"),
        }
    }

    #[tokio::test]
    async fn tag_list_is_ignored_when_all_tags_is_off() {
        let mut scenes = MockSceneTagPort::new();

        scenes
            .expect_scene_tags()
            .returning(|_| Ok(vec![tag("A")]));
        scenes.expect_set_scene_tags().never();

        let use_case = SyncMarkerTags::new(Arc::new(scenes), false);
        let event = MarkerTagEvent::for_scene(scene("123"))
            .with_primary_tag(tag("A"))
            .with_tags([tag("C")]);

        let outcome = use_case.execute(&event).await.unwrap();
        assert!(matches!(outcome, SyncOutcome::NoNewTags { .. }));
    }

    #[tokio::test]
    async fn unauthorized_read_stops_before_mutation() {
        let mut scenes = MockSceneTagPort::new();

        scenes
            .expect_scene_tags()
            .times(1)
            .returning(|_| Err(GraphqlError::Unauthorized));
        scenes.expect_set_scene_tags().never();

        let use_case = SyncMarkerTags::new(Arc::new(scenes), false);
        let event = MarkerTagEvent::for_scene(scene("123")).with_primary_tag(tag("B"));

        let err = use_case.execute(&event).await.unwrap_err();
        assert!(matches!(err, GraphqlError::Unauthorized));
        assert!(err.is_fatal());
    }

    #[tokio::test]
    async fn unknown_scene_propagates_not_found() {
        let mut scenes = MockSceneTagPort::new();

        scenes
            .expect_scene_tags()
            .returning(|id| Err(GraphqlError::not_found("Scene", id)));
        scenes.expect_set_scene_tags().never();

        let use_case = SyncMarkerTags::new(Arc::new(scenes), false);
        let event = MarkerTagEvent::for_scene(scene("404")).with_primary_tag(tag("B"));

        let err = use_case.execute(&event).await.unwrap_err();
        assert_eq!(err.to_string(), "Scene not found: 404");
    }

    #[tokio::test]
    async fn failed_mutation_is_returned() {
        let mut scenes = MockSceneTagPort::new();

        scenes.expect_scene_tags().returning(|_| Ok(vec![]));
        scenes.expect_set_scene_tags().returning(|_, _| {
            Err(GraphqlError::Graphql(vec!["tag B does not exist".into()]))
        });

        let use_case = SyncMarkerTags::new(Arc::new(scenes), false);
        let event = MarkerTagEvent::for_scene(scene("1")).with_primary_tag(tag("B"));

        let err = use_case.execute(&event).await.unwrap_err();
        assert!(matches!(err, GraphqlError::Graphql(_)));
    }
}
