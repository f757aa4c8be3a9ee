//! NIP-58 badge models for OpenAgents.
//!
//! This crate provides typed read/write access to the tags of badge events:
//! - NIP-58 Badge Definition (kind 30009): name, description, image, thumbnails
//! - NIP-58 Badge Award (kind 8): badge reference and recipients
//! - NIP-58 Profile Badges (kind 30008): ordered award/definition pairs
//! - AKA Profiles badge definitions: apply URL, user params, data fields
//!
//! Models wrap a [`TaggedEvent`] and edit its tags in place. Signing and
//! publishing stay with the host library behind [`EventHost`].
//!
//! # Example
//!
//! ```
//! use nostr_badges::{BadgeDefinition, BadgeEvent, ImageValue};
//!
//! let mut badge = BadgeDefinition::new(None, None);
//! badge.set_replaceable_d_tag(Some("bravery"));
//! badge.set_name(Some("Medal of Bravery"));
//! badge.add_thumbnail(ImageValue::new("https://example.com/256.png").with_dimensions("256x256"));
//! badge.add_thumbnail(ImageValue::new("https://example.com/256-v2.png").with_dimensions("256x256"));
//!
//! assert_eq!(badge.thumbnails().len(), 1);
//! assert_eq!(badge.event().tag_value("name"), Some("Medal of Bravery"));
//! ```

mod aka;
mod config;
mod event;
pub mod nip01;
mod nip58;
pub mod tags;

#[cfg(test)]
mod tests;

// NIP-01: Event shapes exchanged with the host
pub use nip01::{Event, RawEvent, UnsignedEvent};

// Tag schema and image codec
pub use tags::{
    Cardinality, Dimensions, ImageInput, ImageValue, SCHEMA, TagError, TagSpec, decode_image,
    encode_image, validate_tag, validate_tags,
};

// Mutable event wrapper and host seam
pub use event::{EventError, EventHost, TaggedEvent};

// NIP-58: Badges
pub use nip58::{
    BadgeAward, BadgeDefinition, BadgeEvent, KIND_BADGE_AWARD, KIND_BADGE_DEFINITION,
    KIND_PROFILE_BADGES, Nip58Error, PROFILE_BADGES_D_TAG, ProfileBadgePair, ProfileBadges,
};

// AKA Profiles extension
pub use aka::{AkaBadgeDefinition, DataField, UserParam};

// Configuration
pub use config::{ConfigError, Nip58Config, PairingMode, load_config, save_config};
