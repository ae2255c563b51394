//! Tag reconciliation.
//!
//! Given the tags a scene carries now and the marker event that fired, decide
//! whether the scene's tag list must be rewritten. Merges are additive only:
//! a planned update never drops an existing tag.

use crate::ids::TagId;
use crate::marker_event::MarkerTagEvent;
use crate::tag_set::TagSet;

/// Outcome of reconciling a scene's tags against a marker event.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TagUpdate {
    /// The event brings no tag the scene lacks.
    Unchanged,
    /// The scene's tag list must be replaced with `next`.
    Replace {
        /// Full tag list to send (previous tags first, then new ones).
        next: TagSet,
        /// Ids in `next` that the scene did not have.
        added: Vec<TagId>,
    },
}

impl TagUpdate {
    pub fn is_unchanged(&self) -> bool {
        matches!(self, Self::Unchanged)
    }
}

/// Compute the next tag set for a scene.
///
/// The primary tag is merged whenever the event carries one. The event's
/// full tag list is merged only when `all_tags` is set. The update is
/// planned only if the merged set is strictly larger than `previous`.
pub fn plan_tag_update(previous: &TagSet, event: &MarkerTagEvent, all_tags: bool) -> TagUpdate {
    let mut next = TagSet::new();

    if let Some(primary) = &event.primary_tag_id {
        next.extend_from(previous);
        next.insert(primary.clone());
    }

    if all_tags {
        if let Some(tag_ids) = &event.tag_ids {
            next.extend_from(previous);
            next.extend_from(tag_ids);
        }
    }

    if next.len() <= previous.len() {
        return TagUpdate::Unchanged;
    }

    let added = next.difference(previous);
    TagUpdate::Replace { next, added }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ids::SceneId;

    fn tag(id: &str) -> TagId {
        TagId::new(id).unwrap()
    }

    fn tags(ids: &[&str]) -> TagSet {
        ids.iter().map(|id| tag(id)).collect()
    }

    fn event() -> MarkerTagEvent {
        MarkerTagEvent::for_scene(SceneId::new("123").unwrap())
    }

    fn next_ids(update: &TagUpdate) -> Vec<&str> {
        match update {
            TagUpdate::Replace { next, .. } => next.iter().map(TagId::as_str).collect(),
            TagUpdate::Unchanged => Vec::new(),
        }
    }

    #[test]
    fn new_primary_tag_is_appended() {
        let previous = tags(&["A"]);
        let update = plan_tag_update(&previous, &event().with_primary_tag(tag("B")), false);

        assert_eq!(next_ids(&update), vec!["A", "B"]);
        match update {
            TagUpdate::Replace { next, added } => {
                assert_eq!(added, vec![tag("B")]);
                assert!(next.is_superset(&previous));
            }
            TagUpdate::Unchanged => panic!("expected an update"),
        }
    }

    #[test]
    fn existing_primary_tag_changes_nothing() {
        let previous = tags(&["A"]);
        let update = plan_tag_update(&previous, &event().with_primary_tag(tag("A")), false);
        assert!(update.is_unchanged());
    }

    #[test]
    fn missing_primary_tag_changes_nothing() {
        let previous = tags(&["A", "B"]);
        let update = plan_tag_update(&previous, &event().with_tags([tag("C")]), false);
        assert!(update.is_unchanged());
    }

    #[test]
    fn tag_list_is_ignored_unless_all_tags_is_enabled() {
        let previous = tags(&["A"]);
        let event = event().with_primary_tag(tag("A")).with_tags([tag("C"), tag("D")]);

        assert!(plan_tag_update(&previous, &event, false).is_unchanged());
        assert_eq!(
            next_ids(&plan_tag_update(&previous, &event, true)),
            vec!["A", "C", "D"]
        );
    }

    #[test]
    fn all_tags_merges_without_primary_tag() {
        let previous = tags(&["A"]);
        let event = event().with_tags([tag("A"), tag("E")]);
        assert_eq!(next_ids(&plan_tag_update(&previous, &event, true)), vec!["A", "E"]);
    }

    #[test]
    fn all_tags_with_nothing_new_changes_nothing() {
        let previous = tags(&["A", "B"]);
        let event = event().with_primary_tag(tag("B")).with_tags([tag("A")]);
        assert!(plan_tag_update(&previous, &event, true).is_unchanged());
    }

    #[test]
    fn empty_scene_gains_primary_tag() {
        let update = plan_tag_update(&TagSet::new(), &event().with_primary_tag(tag("Z")), false);
        assert_eq!(next_ids(&update), vec!["Z"]);
    }

    #[test]
    fn next_set_is_always_a_superset_when_planned() {
        let cases: Vec<(Vec<&str>, Option<&str>, Vec<&str>)> = vec![
            (vec![], Some("A"), vec![]),
            (vec!["A", "B"], Some("C"), vec!["D", "A"]),
            (vec!["A", "B", "C"], None, vec!["C", "D"]),
            (vec!["X"], Some("X"), vec!["X"]),
        ];

        for (prev, primary, list) in &cases {
            let previous = tags(prev);
            let mut event = event().with_tags(list.iter().map(|id| tag(id)));
            if let Some(primary) = primary {
                event = event.with_primary_tag(tag(primary));
            }

            match plan_tag_update(&previous, &event, true) {
                TagUpdate::Replace { next, added } => {
                    assert!(next.is_superset(&previous));
                    assert!(next.len() > previous.len());
                    assert_eq!(next.len(), previous.len() + added.len());
                }
                TagUpdate::Unchanged => {
                    let mut merged = previous.clone();
                    let extra: Vec<TagId> = list.iter().map(|id| tag(id)).collect();
                    merged.extend_from(&extra);
                    if let Some(primary) = primary {
                        merged.insert(tag(primary));
                    }
                    assert_eq!(merged.len(), previous.len());
                }
            }
        }
    }
}
