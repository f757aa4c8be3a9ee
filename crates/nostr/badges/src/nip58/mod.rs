//! NIP-58: Badges
//!
//! Typed views over badge events. Each model wraps a [`TaggedEvent`] and
//! reads or writes its tags in place; nothing is cached on the side.
//!
//! - Badge Definition (kind 30009): name, description, image, thumbnails
//! - Badge Award (kind 8): badge reference and recipients
//! - Profile Badges (kind 30008): ordered award/definition pairs
//!
//! See: <https://github.com/nostr-protocol/nips/blob/master/58.md>

mod award;
mod definition;
mod profile;

pub use award::BadgeAward;
pub use definition::BadgeDefinition;
pub use profile::{ProfileBadgePair, ProfileBadges};

use thiserror::Error;
use tracing::debug;

use crate::config::Nip58Config;
use crate::event::TaggedEvent;
use crate::tags::{self, TagError};

/// Event kind for badge definitions (addressable)
pub const KIND_BADGE_DEFINITION: u16 = 30009;

/// Event kind for badge awards
pub const KIND_BADGE_AWARD: u16 = 8;

/// Event kind for profile badges (addressable)
pub const KIND_PROFILE_BADGES: u16 = 30008;

/// Fixed d tag value for profile badges
pub const PROFILE_BADGES_D_TAG: &str = "profile_badges";

/// Errors reported by badge validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum Nip58Error {
    #[error("wrong event kind: expected {expected}, got {got:?}")]
    WrongKind { expected: u16, got: Option<u16> },

    #[error("missing required tag: {0}")]
    MissingTag(String),

    #[error("invalid tag format: {0}")]
    InvalidTagFormat(#[from] TagError),
}

/// A typed model over one kind of badge event.
pub trait BadgeEvent: Sized {
    /// Kind this model defaults to and retags copies with.
    const KIND: u16;

    /// Wrap an event, applying the model's construction defaults.
    fn from_event(event: TaggedEvent) -> Self;

    fn event(&self) -> &TaggedEvent;

    fn event_mut(&mut self) -> &mut TaggedEvent;

    fn into_event(self) -> TaggedEvent;

    /// Build a model from a copy of another event's data, retagged to
    /// [`Self::KIND`]. Edits to the result never reach `event`.
    fn create_from(event: &TaggedEvent) -> Self {
        let mut copy = event.clone();
        debug!(
            "Creating kind {} model from kind {:?} event",
            Self::KIND,
            event.kind()
        );
        copy.set_kind(Self::KIND);
        Self::from_event(copy)
    }
}

/// Check the kind and, if configured, every known tag shape.
pub(crate) fn validate_common(
    event: &TaggedEvent,
    expected: u16,
    config: &Nip58Config,
) -> Result<(), Nip58Error> {
    if event.kind() != Some(expected) {
        return Err(Nip58Error::WrongKind {
            expected,
            got: event.kind(),
        });
    }
    if config.validate_tag_shapes {
        tags::validate_tags(event.tags())?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_common_checks_kind() {
        let event = TaggedEvent::default();
        assert_eq!(
            validate_common(&event, KIND_BADGE_AWARD, &Nip58Config::default()),
            Err(Nip58Error::WrongKind {
                expected: KIND_BADGE_AWARD,
                got: None
            })
        );
    }
}
