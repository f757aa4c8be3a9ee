//! Mutable event wrapper shared by every badge model.
//!
//! A [`TaggedEvent`] is an unsigned (or re-opened) event plus an optional
//! handle to the host library that will eventually sign and publish it.
//! Models read and write its tag list; nothing here talks to relays.

use std::fmt;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use thiserror::Error;
use tracing::debug;

use crate::nip01::{Event, RawEvent, UnsignedEvent};
use crate::tags;

/// Errors that can occur when handing an event to the host.
#[derive(Debug, Error)]
pub enum EventError {
    #[error("no host attached to event")]
    NoHost,

    #[error("event has no kind")]
    MissingKind,

    #[error("event has no author pubkey")]
    MissingPubkey,

    #[error("host error: {0}")]
    Host(String),
}

/// The host library that owns keys, signing, and relays.
///
/// Implemented by the application; this crate only calls it.
pub trait EventHost: fmt::Debug + Send + Sync {
    /// Sign an unsigned event, producing id and signature.
    fn sign(&self, event: UnsignedEvent) -> Result<Event, EventError>;

    /// Relay the host prefers others to look for its events on.
    fn relay_hint(&self) -> Option<String> {
        None
    }
}

/// An event whose tags may still be edited.
#[derive(Debug, Clone, Default)]
pub struct TaggedEvent {
    host: Option<Arc<dyn EventHost>>,
    raw: RawEvent,
}

impl TaggedEvent {
    /// Wrap a raw payload, or start from an empty one.
    pub fn new(host: Option<Arc<dyn EventHost>>, raw: Option<RawEvent>) -> Self {
        Self {
            host,
            raw: raw.unwrap_or_default(),
        }
    }

    pub fn host(&self) -> Option<&Arc<dyn EventHost>> {
        self.host.as_ref()
    }

    pub fn set_host(&mut self, host: Option<Arc<dyn EventHost>>) {
        self.host = host;
    }

    pub fn kind(&self) -> Option<u16> {
        self.raw.kind
    }

    pub fn set_kind(&mut self, kind: u16) {
        self.raw.kind = Some(kind);
    }

    /// Set the kind only if the payload did not carry one.
    pub fn default_kind(&mut self, kind: u16) {
        self.raw.kind.get_or_insert(kind);
    }

    pub fn pubkey(&self) -> Option<&str> {
        self.raw.pubkey.as_deref()
    }

    pub fn set_pubkey(&mut self, pubkey: impl Into<String>) {
        self.raw.pubkey = Some(pubkey.into());
    }

    pub fn created_at(&self) -> Option<u64> {
        self.raw.created_at
    }

    pub fn set_created_at(&mut self, created_at: u64) {
        self.raw.created_at = Some(created_at);
    }

    pub fn content(&self) -> &str {
        &self.raw.content
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.raw.content = content.into();
    }

    pub fn tags(&self) -> &[Vec<String>] {
        &self.raw.tags
    }

    pub fn tags_mut(&mut self) -> &mut Vec<Vec<String>> {
        &mut self.raw.tags
    }

    /// First argument of the first tag with this name.
    pub fn tag_value(&self, name: &str) -> Option<&str> {
        self.matching_tags(name)
            .into_iter()
            .next()
            .and_then(|tag| tag.get(1))
            .map(|s| s.as_str())
    }

    /// Every tag with this name, in event order.
    pub fn matching_tags(&self, name: &str) -> Vec<&Vec<String>> {
        self.raw
            .tags
            .iter()
            .filter(|tag| tag.first().map(|s| s.as_str()) == Some(name))
            .collect()
    }

    /// Remove every tag with this name.
    pub fn remove_tag(&mut self, name: &str) {
        self.raw
            .tags
            .retain(|tag| tag.first().map(|s| s.as_str()) != Some(name));
    }

    pub fn push_tag(&mut self, tag: Vec<String>) {
        self.raw.tags.push(tag);
    }

    /// Value of the `d` tag that makes this event addressable.
    pub fn replaceable_d_tag(&self) -> Option<&str> {
        tags::D.value(&self.raw.tags)
    }

    /// Relay hint from the attached host, if any.
    pub fn relay_hint(&self) -> Option<String> {
        self.host.as_ref().and_then(|host| host.relay_hint())
    }

    /// Copy of the underlying payload.
    pub fn raw_event(&self) -> RawEvent {
        self.raw.clone()
    }

    pub fn into_raw(self) -> RawEvent {
        self.raw
    }

    /// The event as it would be signed. Defaults `created_at` to now.
    pub fn to_unsigned(&self) -> Result<UnsignedEvent, EventError> {
        let kind = self.raw.kind.ok_or(EventError::MissingKind)?;
        let pubkey = self.raw.pubkey.clone().ok_or(EventError::MissingPubkey)?;
        let created_at = match self.raw.created_at {
            Some(ts) => ts,
            None => SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .map(|d| d.as_secs())
                .unwrap_or_default(),
        };

        Ok(UnsignedEvent {
            pubkey,
            created_at,
            kind,
            tags: self.raw.tags.clone(),
            content: self.raw.content.clone(),
        })
    }

    /// Sign through the attached host and record the result.
    pub fn sign(&mut self) -> Result<Event, EventError> {
        let host = self.host.clone().ok_or(EventError::NoHost)?;
        let unsigned = self.to_unsigned()?;
        debug!(
            "Signing event kind {} with {} tags",
            unsigned.kind,
            unsigned.tags.len()
        );

        let event = host.sign(unsigned)?;
        self.raw = RawEvent::from(event.clone());
        Ok(event)
    }
}

impl From<RawEvent> for TaggedEvent {
    fn from(raw: RawEvent) -> Self {
        Self::new(None, Some(raw))
    }
}

impl From<Event> for TaggedEvent {
    fn from(event: Event) -> Self {
        Self::new(None, Some(RawEvent::from(event)))
    }
}
