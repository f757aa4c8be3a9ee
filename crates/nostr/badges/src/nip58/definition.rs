//! Badge definition (kind 30009)

use std::sync::Arc;

use tracing::{debug, trace};

use super::{BadgeEvent, KIND_BADGE_DEFINITION, Nip58Error, validate_common};
use crate::config::Nip58Config;
use crate::event::{EventHost, TaggedEvent};
use crate::nip01::{RawEvent, create_address};
use crate::tags::{
    D, DESCRIPTION, IMAGE, ImageInput, ImageValue, NAME, THUMB, decode_image, encode_image,
};

/// Badge definition backed by event tags.
///
/// Singular fields (`d`, `name`, `description`, `image`) are replaced
/// wholesale on write, so at most one tag of each remains. Thumbnails are
/// keyed by their dimensions; see [`BadgeDefinition::add_thumbnail`].
#[derive(Debug, Clone)]
pub struct BadgeDefinition {
    event: TaggedEvent,
}

impl BadgeDefinition {
    /// Create a definition, defaulting the kind to 30009 if `raw` has none.
    pub fn new(host: Option<Arc<dyn EventHost>>, raw: Option<RawEvent>) -> Self {
        Self::from_event(TaggedEvent::new(host, raw))
    }

    /// The replaceable identifier (`d` tag).
    pub fn replaceable_d_tag(&self) -> Option<&str> {
        D.value(self.event.tags())
    }

    /// Set or clear the replaceable identifier.
    pub fn set_replaceable_d_tag(&mut self, identifier: Option<&str>) {
        D.set(self.event.tags_mut(), identifier.map(|d| D.build([d])));
    }

    /// Short badge name
    pub fn name(&self) -> Option<&str> {
        NAME.value(self.event.tags())
    }

    pub fn set_name(&mut self, name: Option<&str>) {
        NAME.set(self.event.tags_mut(), name.map(|n| NAME.build([n])));
    }

    pub fn description(&self) -> Option<&str> {
        DESCRIPTION.value(self.event.tags())
    }

    pub fn set_description(&mut self, description: Option<&str>) {
        DESCRIPTION.set(
            self.event.tags_mut(),
            description.map(|d| DESCRIPTION.build([d])),
        );
    }

    /// High-resolution badge image, decoded from the first `image` tag.
    pub fn image(&self) -> Option<ImageValue> {
        IMAGE.first(self.event.tags()).and_then(|tag| decode_image(tag))
    }

    /// Replace the image. `None`, or a record with an empty URL, clears it.
    pub fn set_image(&mut self, image: Option<ImageInput>) {
        let tag = image.and_then(|image| encode_image(IMAGE.name, image));
        IMAGE.set(self.event.tags_mut(), tag);
    }

    /// All thumbnails in event order. Bare `thumb` tags are skipped.
    pub fn thumbnails(&self) -> Vec<ImageValue> {
        THUMB
            .all(self.event.tags())
            .filter_map(|tag| {
                let image = decode_image(tag);
                if image.is_none() {
                    trace!("Skipping thumb tag without url");
                }
                image
            })
            .collect()
    }

    /// Add a thumbnail, replacing any existing one with the same dimensions.
    ///
    /// Thumbnails without dimensions form their own group of at most one.
    /// The new tag is appended, so a replaced thumbnail moves to the end
    /// while the others keep their order.
    pub fn add_thumbnail(&mut self, image: impl Into<ImageInput>) {
        let (url, dimensions) = image.into().into_parts();
        let tags = self.event.tags_mut();

        match dimensions {
            Some(dimensions) => {
                tags.retain(|tag| !(THUMB.matches(tag) && tag.get(2) == Some(&dimensions)));
                debug!("Setting {} thumbnail", dimensions);
                tags.push(THUMB.build([url, dimensions]));
            }
            None => {
                tags.retain(|tag| !(THUMB.matches(tag) && tag.len() < 3));
                debug!("Setting thumbnail without dimensions");
                tags.push(THUMB.build([url]));
            }
        }
    }

    /// Remove the thumbnail group for `dimensions`. Returns how many tags went.
    pub fn remove_thumbnail(&mut self, dimensions: Option<&str>) -> usize {
        let tags = self.event.tags_mut();
        let before = tags.len();
        tags.retain(|tag| {
            if !THUMB.matches(tag) {
                return true;
            }
            match dimensions {
                Some(d) => tag.get(2).map(|s| s.as_str()) != Some(d),
                None => tag.len() >= 3,
            }
        });
        before - tags.len()
    }

    /// The `<kind>:<pubkey>:<d>` address award events point at.
    pub fn coordinate(&self) -> Option<String> {
        let pubkey = self.event.pubkey()?;
        let d = self.replaceable_d_tag()?;
        let kind = self.event.kind().unwrap_or(KIND_BADGE_DEFINITION);
        Some(create_address(kind, pubkey, d))
    }

    pub fn validate(&self) -> Result<(), Nip58Error> {
        self.validate_with(&Nip58Config::default())
    }

    pub fn validate_with(&self, config: &Nip58Config) -> Result<(), Nip58Error> {
        validate_common(&self.event, KIND_BADGE_DEFINITION, config)?;
        if self.replaceable_d_tag().is_none() {
            return Err(Nip58Error::MissingTag("d tag required".to_string()));
        }
        Ok(())
    }
}

impl BadgeEvent for BadgeDefinition {
    const KIND: u16 = KIND_BADGE_DEFINITION;

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
