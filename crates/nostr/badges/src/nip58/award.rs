//! Badge award (kind 8)

use std::sync::Arc;

use tracing::debug;

use super::{BadgeDefinition, BadgeEvent, KIND_BADGE_AWARD, Nip58Error, validate_common};
use crate::config::Nip58Config;
use crate::event::{EventHost, TaggedEvent};
use crate::nip01::RawEvent;
use crate::tags::{A, P, TagError};

/// Badge award backed by event tags.
#[derive(Debug, Clone)]
pub struct BadgeAward {
    event: TaggedEvent,
}

impl BadgeAward {
    /// Create an award, defaulting the kind to 8 if `raw` has none.
    pub fn new(host: Option<Arc<dyn EventHost>>, raw: Option<RawEvent>) -> Self {
        Self::from_event(TaggedEvent::new(host, raw))
    }

    /// Start an award pointing at `definition`.
    ///
    /// The `a` tag is left unset if the definition has no coordinate yet.
    pub fn for_definition(host: Option<Arc<dyn EventHost>>, definition: &BadgeDefinition) -> Self {
        let mut award = Self::new(host, None);
        if let Some(coordinate) = definition.coordinate() {
            award.set_badge_reference(&coordinate);
        }
        award
    }

    /// Coordinate of the badge definition being awarded (`a` tag).
    pub fn badge_reference(&self) -> Option<&str> {
        A.value(self.event.tags())
    }

    pub fn set_badge_reference(&mut self, reference: &str) {
        A.set(self.event.tags_mut(), Some(A.build([reference])));
    }

    /// Awarded pubkeys (`p` tags), in event order.
    pub fn recipients(&self) -> Vec<String> {
        P.values(self.event.tags())
            .into_iter()
            .map(|s| s.to_string())
            .collect()
    }

    /// Replace every recipient with `pubkeys`, keeping their order.
    pub fn set_recipients<I, S>(&mut self, pubkeys: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let entries: Vec<Vec<String>> = pubkeys
            .into_iter()
            .map(|pubkey| {
                let pubkey: String = pubkey.into();
                P.build([pubkey])
            })
            .collect();
        debug!("Setting {} badge recipients", entries.len());
        P.replace_all(self.event.tags_mut(), entries);
    }

    pub fn validate(&self) -> Result<(), Nip58Error> {
        self.validate_with(&Nip58Config::default())
    }

    pub fn validate_with(&self, config: &Nip58Config) -> Result<(), Nip58Error> {
        validate_common(&self.event, KIND_BADGE_AWARD, config)?;
        match A.count(self.event.tags()) {
            0 => {
                return Err(Nip58Error::MissingTag("a tag required".to_string()));
            }
            1 => {}
            _ => {
                return Err(TagError::Duplicate(A.name).into());
            }
        }
        if P.count(self.event.tags()) == 0 {
            return Err(Nip58Error::MissingTag(
                "at least one p tag required".to_string(),
            ));
        }
        Ok(())
    }
}

impl BadgeEvent for BadgeAward {
    const KIND: u16 = KIND_BADGE_AWARD;

    fn from_event(mut event: TaggedEvent) -> Self {
        event.default_kind(Self::KIND);
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
