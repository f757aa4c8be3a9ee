//! NIP-01: Basic event structure.
//!
//! This module holds the event shapes exchanged with the host library:
//! - `Event`: a complete signed event
//! - `UnsignedEvent`: everything but id and signature, ready to be signed
//! - `RawEvent`: a partial payload where any field may still be unset
//!
//! Hashing and Schnorr signing live in the host; see [`crate::EventHost`].

use serde::{Deserialize, Serialize};

/// A signed Nostr event.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Event {
    /// 32-bytes lowercase hex-encoded sha256 of the serialized event data
    pub id: String,
    /// 32-bytes lowercase hex-encoded public key of the event creator
    pub pubkey: String,
    /// Unix timestamp in seconds
    pub created_at: u64,
    /// Event kind (integer between 0 and 65535)
    pub kind: u16,
    /// Array of arrays of strings (tags)
    pub tags: Vec<Vec<String>>,
    /// Arbitrary string content
    pub content: String,
    /// 64-bytes lowercase hex signature
    pub sig: String,
}

/// An unsigned event (before signing).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnsignedEvent {
    /// 32-bytes lowercase hex-encoded public key of the event creator
    pub pubkey: String,
    /// Unix timestamp in seconds
    pub created_at: u64,
    /// Event kind
    pub kind: u16,
    /// Array of arrays of strings (tags)
    pub tags: Vec<Vec<String>>,
    /// Arbitrary string content
    pub content: String,
}

/// A raw event payload whose fields may not all be known yet.
///
/// This is what a freshly built event looks like before the host fills in
/// the author, timestamp, id and signature. Field names match the NIP-01
/// wire format so a payload can be read straight from relay JSON.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RawEvent {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pubkey: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub kind: Option<u16>,
    #[serde(default)]
    pub tags: Vec<Vec<String>>,
    #[serde(default)]
    pub content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sig: Option<String>,
}

impl RawEvent {
    /// Create an empty payload of the given kind.
    pub fn with_kind(kind: u16) -> Self {
        Self {
            kind: Some(kind),
            ..Self::default()
        }
    }
}

impl From<Event> for RawEvent {
    fn from(event: Event) -> Self {
        Self {
            id: Some(event.id),
            pubkey: Some(event.pubkey),
            created_at: Some(event.created_at),
            kind: Some(event.kind),
            tags: event.tags,
            content: event.content,
            sig: Some(event.sig),
        }
    }
}

impl From<UnsignedEvent> for RawEvent {
    fn from(event: UnsignedEvent) -> Self {
        Self {
            id: None,
            pubkey: Some(event.pubkey),
            created_at: Some(event.created_at),
            kind: Some(event.kind),
            tags: event.tags,
            content: event.content,
            sig: None,
        }
    }
}

/// Minimum kind for addressable events
pub const ADDRESSABLE_KIND_MIN: u16 = 30000;

/// Maximum kind for addressable events (inclusive)
pub const ADDRESSABLE_KIND_MAX: u16 = 39999;

/// Check if an event kind is addressable (30000-39999).
pub fn is_addressable_kind(kind: u16) -> bool {
    (ADDRESSABLE_KIND_MIN..=ADDRESSABLE_KIND_MAX).contains(&kind)
}

/// Create an address string for an addressable event.
///
/// The address format is: `<kind>:<pubkey>:<d-tag-value>`
///
/// ```
/// use nostr_badges::nip01::create_address;
///
/// let address = create_address(30009, "alice", "bravery");
/// assert_eq!(address, "30009:alice:bravery");
/// ```
pub fn create_address(kind: u16, pubkey: &str, d_tag: &str) -> String {
    format!("{}:{}:{}", kind, pubkey, d_tag)
}
