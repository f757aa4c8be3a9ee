//! Property-based tests for the badge tag models
//!
//! These tests use proptest to check the write invariants of the models
//! over arbitrary values: singular fields never duplicate, thumbnails stay
//! unique per dimensions, list writes replace the whole list in order, and
//! copies never write back to their source.

use std::collections::HashMap;

use proptest::prelude::*;

use crate::aka::{AkaBadgeDefinition, DataField, UserParam};
use crate::event::TaggedEvent;
use crate::nip01::RawEvent;
use crate::nip58::{BadgeAward, BadgeDefinition, BadgeEvent, ProfileBadgePair, ProfileBadges};
use crate::tags::ImageValue;

// =============================================================================
// Strategies
// =============================================================================

fn dimensions() -> impl Strategy<Value = Option<String>> {
    prop_oneof![
        Just(None),
        Just(Some("64x64".to_string())),
        Just(Some("128x128".to_string())),
        Just(Some("256x256".to_string())),
    ]
}

fn thumbnail() -> impl Strategy<Value = ImageValue> {
    ("[a-z]{1,8}", dimensions()).prop_map(|(url, dims)| ImageValue {
        url: format!("https://example.com/{}.png", url),
        dimensions: dims,
    })
}

fn pubkey() -> impl Strategy<Value = String> {
    "[0-9a-f]{64}"
}

// =============================================================================
// Plain fields
// =============================================================================

proptest! {
    #[test]
    fn prop_plain_fields_round_trip(value in ".*") {
        let mut def = BadgeDefinition::new(None, None);
        def.set_name(Some(value.as_str()));
        def.set_description(Some(value.as_str()));
        def.set_replaceable_d_tag(Some(value.as_str()));

        prop_assert_eq!(def.name(), Some(value.as_str()));
        prop_assert_eq!(def.description(), Some(value.as_str()));
        prop_assert_eq!(def.replaceable_d_tag(), Some(value.as_str()));

        def.set_name(None);
        def.set_description(None);
        def.set_replaceable_d_tag(None);
        prop_assert_eq!(def.name(), None);
        prop_assert_eq!(def.description(), None);
        prop_assert_eq!(def.replaceable_d_tag(), None);
    }

    #[test]
    fn prop_singular_fields_stay_single(values in prop::collection::vec(".*", 1..10)) {
        let mut def = AkaBadgeDefinition::new(None, None);
        for value in &values {
            def.definition_mut().set_name(Some(value.as_str()));
            def.set_apply_url(Some(value.as_str()));
            def.set_up_help(Some(value.as_str()));
        }

        let event = def.event();
        prop_assert_eq!(event.matching_tags("name").len(), 1);
        prop_assert_eq!(event.matching_tags("applyURL").len(), 1);
        prop_assert_eq!(event.matching_tags("upHelp").len(), 1);
        prop_assert_eq!(def.apply_url(), values.last().map(|s| s.as_str()));
    }
}

// =============================================================================
// Thumbnails
// =============================================================================

proptest! {
    #[test]
    fn prop_thumbnails_unique_per_dimensions(thumbs in prop::collection::vec(thumbnail(), 0..20)) {
        let mut def = BadgeDefinition::new(None, None);
        for thumb in &thumbs {
            def.add_thumbnail(thumb.clone());
        }

        let mut latest: HashMap<Option<String>, String> = HashMap::new();
        for thumb in &thumbs {
            latest.insert(thumb.dimensions.clone(), thumb.url.clone());
        }

        let stored = def.thumbnails();
        prop_assert_eq!(stored.len(), latest.len());
        for thumb in &stored {
            prop_assert_eq!(latest.get(&thumb.dimensions), Some(&thumb.url));
        }
    }

    #[test]
    fn prop_thumbnails_ordered_by_last_write(thumbs in prop::collection::vec(thumbnail(), 1..20)) {
        let mut def = BadgeDefinition::new(None, None);
        for thumb in &thumbs {
            def.add_thumbnail(thumb.clone());
        }

        // Each key sits where its last write happened, relative to the others.
        let mut expected: Vec<ImageValue> = Vec::new();
        for thumb in &thumbs {
            expected.retain(|t| t.dimensions != thumb.dimensions);
            expected.push(thumb.clone());
        }
        prop_assert_eq!(def.thumbnails(), expected);
    }
}

// =============================================================================
// List replacement
// =============================================================================

proptest! {
    #[test]
    fn prop_recipients_replace(
        first in prop::collection::vec(pubkey(), 0..5),
        second in prop::collection::vec(pubkey(), 0..5),
    ) {
        let mut award = BadgeAward::new(None, None);
        award.set_badge_reference("30009:alice:bravery");
        award.set_recipients(first.iter().cloned());
        award.set_recipients(second.iter().cloned());

        prop_assert_eq!(award.recipients(), second);
        prop_assert_eq!(award.badge_reference(), Some("30009:alice:bravery"));
    }

    #[test]
    fn prop_profile_pairs_interleave(
        refs in prop::collection::vec(("[a-z]{1,8}", "[0-9a-f]{8}"), 0..6),
    ) {
        let pairs: Vec<ProfileBadgePair> = refs
            .iter()
            .map(|(d, e)| ProfileBadgePair::new(format!("30009:alice:{}", d), e.clone()))
            .collect();

        let mut profile = ProfileBadges::new(None, None);
        profile.set_award_and_definition_pairs(&[ProfileBadgePair::new("old", "old")]);
        profile.set_award_and_definition_pairs(&pairs);

        let body: Vec<&Vec<String>> = profile
            .event()
            .tags()
            .iter()
            .filter(|tag| tag[0] == "a" || tag[0] == "e")
            .collect();
        prop_assert_eq!(body.len(), pairs.len() * 2);
        for (i, chunk) in body.chunks(2).enumerate() {
            prop_assert_eq!(chunk[0][0].as_str(), "a");
            prop_assert_eq!(chunk[1][0].as_str(), "e");
            prop_assert_eq!(&chunk[0][1], &pairs[i].definition[0]);
            prop_assert_eq!(&chunk[1][1], &pairs[i].award[0]);
        }
        prop_assert_eq!(profile.pairs(), pairs);
    }

    #[test]
    fn prop_aka_lists_replace(
        names in prop::collection::vec("[a-z]{1,8}", 0..5),
        labels in prop::collection::vec(proptest::option::of("[A-Z][a-z]{0,6}"), 0..5),
    ) {
        let params: Vec<UserParam> = names
            .iter()
            .map(|n| UserParam::new(n.clone(), "default"))
            .collect();
        let fields: Vec<DataField> = names
            .iter()
            .zip(labels.iter())
            .map(|(n, label)| DataField {
                name: n.clone(),
                label: label.clone(),
                description: None,
            })
            .collect();

        let mut def = AkaBadgeDefinition::new(None, None);
        def.set_user_params(&[UserParam::new("stale", "x")]);
        def.set_data_fields(&[DataField::new("stale")]);
        def.set_user_params(&params);
        def.set_data_fields(&fields);

        prop_assert_eq!(def.user_params(), params);
        prop_assert_eq!(def.data_fields(), fields);
    }
}

// =============================================================================
// Copies
// =============================================================================

proptest! {
    #[test]
    fn prop_create_from_never_touches_source(
        name in "[a-z]{1,8}",
        thumbs in prop::collection::vec(thumbnail(), 0..5),
    ) {
        let raw = RawEvent {
            kind: Some(1),
            tags: vec![vec!["name".to_string(), "source".to_string()]],
            content: "body".to_string(),
            ..RawEvent::default()
        };
        let source = TaggedEvent::new(None, Some(raw.clone()));

        let mut def = BadgeDefinition::create_from(&source);
        def.set_name(Some(name.as_str()));
        for thumb in thumbs {
            def.add_thumbnail(thumb);
        }

        prop_assert_eq!(source.raw_event(), raw);
    }
}
