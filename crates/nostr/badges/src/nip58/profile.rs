//! Profile badges (kind 30008)

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{BadgeEvent, KIND_PROFILE_BADGES, Nip58Error, PROFILE_BADGES_D_TAG, validate_common};
use crate::config::{Nip58Config, PairingMode};
use crate::event::{EventHost, TaggedEvent};
use crate::nip01::RawEvent;
use crate::tags::{A, D, E};

/// One displayed badge: a definition reference and the award granting it.
///
/// Both sides hold tag arguments without the tag name, e.g.
/// `definition = ["30009:alice:bravery"]` and
/// `award = ["<award event id>", "wss://relay"]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileBadgePair {
    pub definition: Vec<String>,
    pub award: Vec<String>,
}

impl ProfileBadgePair {
    /// Create a pair from a definition coordinate and an award event id.
    pub fn new(definition: impl Into<String>, award_event_id: impl Into<String>) -> Self {
        Self {
            definition: vec![definition.into()],
            award: vec![award_event_id.into()],
        }
    }

    /// Add a relay hint for the award event.
    pub fn with_relay(mut self, relay: impl Into<String>) -> Self {
        self.award.truncate(1);
        self.award.push(relay.into());
        self
    }

    /// Badge definition coordinate
    pub fn definition_ref(&self) -> Option<&str> {
        self.definition.first().map(|s| s.as_str())
    }

    /// Badge award event id
    pub fn award_id(&self) -> Option<&str> {
        self.award.first().map(|s| s.as_str())
    }

    pub fn relay_hint(&self) -> Option<&str> {
        self.award.get(1).map(|s| s.as_str())
    }

    fn from_tags(a: &[String], e: &[String]) -> Self {
        Self {
            definition: a[1..].to_vec(),
            award: e[1..].to_vec(),
        }
    }
}

/// The author's chosen badges, as ordered `a`/`e` tag pairs.
///
/// Consumers pair each `a` tag with the `e` tag right after it, so writes
/// always emit them interleaved in the order given.
#[derive(Debug, Clone)]
pub struct ProfileBadges {
    event: TaggedEvent,
}

impl ProfileBadges {
    /// Create profile badges, defaulting the kind to 30008 if `raw` has none.
    ///
    /// Any `d` tag other than a single `["d", "profile_badges"]` is replaced
    /// by it.
    pub fn new(host: Option<Arc<dyn EventHost>>, raw: Option<RawEvent>) -> Self {
        Self::from_event(TaggedEvent::new(host, raw))
    }

    /// Replace every displayed badge with `pairs`, in order.
    pub fn set_award_and_definition_pairs(&mut self, pairs: &[ProfileBadgePair]) {
        let tags = self.event.tags_mut();
        A.remove(tags);
        E.remove(tags);

        for pair in pairs {
            tags.push(A.build(pair.definition.iter().cloned()));
            tags.push(E.build(pair.award.iter().cloned()));
        }
        debug!("Set {} profile badge pairs", pairs.len());
    }

    /// Displayed badges, read with [`PairingMode::Strict`].
    pub fn pairs(&self) -> Vec<ProfileBadgePair> {
        self.pairs_with(PairingMode::Strict)
    }

    /// Displayed badges, read with the given pairing policy.
    ///
    /// Tags without arguments never form part of a pair.
    pub fn pairs_with(&self, mode: PairingMode) -> Vec<ProfileBadgePair> {
        let tags = self.event.tags();
        match mode {
            PairingMode::Strict => {
                let mut pairs = Vec::new();
                let mut pending: Option<&Vec<String>> = None;
                for tag in tags {
                    if A.matches(tag) {
                        pending = Some(tag).filter(|a| a.len() >= 2);
                    } else if E.matches(tag) {
                        // A bare `e` still closes the slot of the `a` before it.
                        if let Some(a) = pending.take()
                            && tag.len() >= 2
                        {
                            pairs.push(ProfileBadgePair::from_tags(a, tag));
                        }
                    }
                }
                pairs
            }
            PairingMode::ByName => {
                let definitions = A.all(tags).filter(|tag| tag.len() >= 2);
                let awards = E.all(tags).filter(|tag| tag.len() >= 2);
                definitions
                    .zip(awards)
                    .map(|(a, e)| ProfileBadgePair::from_tags(a, e))
                    .collect()
            }
        }
    }

    pub fn validate(&self) -> Result<(), Nip58Error> {
        self.validate_with(&Nip58Config::default())
    }

    pub fn validate_with(&self, config: &Nip58Config) -> Result<(), Nip58Error> {
        validate_common(&self.event, KIND_PROFILE_BADGES, config)?;
        if self.event.replaceable_d_tag() != Some(PROFILE_BADGES_D_TAG) {
            return Err(Nip58Error::MissingTag(format!(
                "d tag with value '{}' required",
                PROFILE_BADGES_D_TAG
            )));
        }
        Ok(())
    }
}

impl BadgeEvent for ProfileBadges {
    const KIND: u16 = KIND_PROFILE_BADGES;

    fn from_event(mut event: TaggedEvent) -> Self {
        event.default_kind(Self::KIND);
        let tagged = D.count(event.tags()) == 1
            && event.replaceable_d_tag() == Some(PROFILE_BADGES_D_TAG);
        if !tagged {
            D.set(event.tags_mut(), Some(D.build([PROFILE_BADGES_D_TAG])));
        }
        Self { event }
    }

    fn event(&self) -> &TaggedEvent {
        &self.event
    }

    fn event_mut(&mut self) -> &mut TaggedEvent {
        &mut self.event
    }

    fn into_event(self) -> TaggedEvent {
        self.event
    }
}
