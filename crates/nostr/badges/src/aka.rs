//! AKA Profiles badge definitions.
//!
//! AKA Profiles issues badges through an external "apply" page. Its badge
//! definitions carry extra tags on top of NIP-58:
//!
//! - `["applyURL", <url>]`: page where a user applies for the badge
//! - `["userParam", <name>, <default value>]`: query parameters the apply
//!   page accepts, configured per badge
//! - `["upHelp", <text>]`: help for filling in those parameters
//! - `["field", <name>, <label>?, <description>?]`: data fields the apply
//!   page may return, copied onto the resulting award
//!
//! Every list field is replaced as a whole on write.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::config::Nip58Config;
use crate::event::{EventHost, TaggedEvent};
use crate::nip01::RawEvent;
use crate::nip58::{BadgeDefinition, BadgeEvent, KIND_BADGE_DEFINITION, Nip58Error};
use crate::tags::{APPLY_URL, FIELD, UP_HELP, USER_PARAM};

/// A query parameter the apply page accepts, with its configured default.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserParam {
    pub name: String,
    pub value: String,
}

impl UserParam {
    pub fn new(name: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            value: value.into(),
        }
    }
}

/// A data field the apply page may return when a badge is awarded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DataField {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub label: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl DataField {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            label: None,
            description: None,
        }
    }

    pub fn with_label(mut self, label: impl Into<String>) -> Self {
        self.label = Some(label.into());
        self
    }

    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    /// `[field, name]`, `[field, name, label]`, or
    /// `[field, name, label, description]`; a missing label before a
    /// description is written as `""`.
    fn to_tag(&self) -> Vec<String> {
        let mut args = vec![self.name.clone()];
        match (&self.label, &self.description) {
            (label, Some(description)) => {
                args.push(label.clone().unwrap_or_default());
                args.push(description.clone());
            }
            (Some(label), None) => args.push(label.clone()),
            (None, None) => {}
        }
        FIELD.build(args)
    }

    fn from_tag(tag: &[String]) -> Option<Self> {
        let non_empty = |i: usize| tag.get(i).filter(|s| !s.is_empty()).cloned();
        Some(Self {
            name: tag.get(1)?.clone(),
            label: non_empty(2),
            description: non_empty(3),
        })
    }
}

/// Badge definition with the AKA Profiles extension tags.
///
/// Standard fields are reached through [`definition`](Self::definition)
/// and [`definition_mut`](Self::definition_mut).
#[derive(Debug, Clone)]
pub struct AkaBadgeDefinition {
    definition: BadgeDefinition,
}

impl AkaBadgeDefinition {
    pub fn new(host: Option<Arc<dyn EventHost>>, raw: Option<RawEvent>) -> Self {
        Self::from_event(TaggedEvent::new(host, raw))
    }

    pub fn definition(&self) -> &BadgeDefinition {
        &self.definition
    }

    pub fn definition_mut(&mut self) -> &mut BadgeDefinition {
        &mut self.definition
    }

    pub fn into_definition(self) -> BadgeDefinition {
        self.definition
    }

    fn tags(&self) -> &[Vec<String>] {
        self.definition.event().tags()
    }

    fn tags_mut(&mut self) -> &mut Vec<Vec<String>> {
        self.definition.event_mut().tags_mut()
    }

    /// URL of the page where users apply for this badge.
    pub fn apply_url(&self) -> Option<&str> {
        APPLY_URL.value(self.tags())
    }

    pub fn set_apply_url(&mut self, url: Option<&str>) {
        APPLY_URL.set(self.tags_mut(), url.map(|u| APPLY_URL.build([u])));
    }

    /// Parameters the apply page accepts. Tags missing a name or value are
    /// skipped.
    pub fn user_params(&self) -> Vec<UserParam> {
        USER_PARAM
            .all(self.tags())
            .filter_map(|tag| match (tag.get(1), tag.get(2)) {
                (Some(name), Some(value)) => Some(UserParam::new(name.clone(), value.clone())),
                _ => None,
            })
            .collect()
    }

    pub fn set_user_params(&mut self, params: &[UserParam]) {
        debug!("Setting {} user params", params.len());
        let entries = params
            .iter()
            .map(|param| USER_PARAM.build([param.name.clone(), param.value.clone()]));
        USER_PARAM.replace_all(self.tags_mut(), entries.collect::<Vec<_>>());
    }

    /// Help text for the user params.
    pub fn up_help(&self) -> Option<&str> {
        UP_HELP.value(self.tags())
    }

    pub fn set_up_help(&mut self, help: Option<&str>) {
        UP_HELP.set(self.tags_mut(), help.map(|h| UP_HELP.build([h])));
    }

    /// Data fields the apply page may return. Tags without a name are skipped.
    pub fn data_fields(&self) -> Vec<DataField> {
        FIELD
            .all(self.tags())
            .filter_map(|tag| DataField::from_tag(tag))
            .collect()
    }

    pub fn set_data_fields(&mut self, fields: &[DataField]) {
        debug!("Setting {} data fields", fields.len());
        let entries: Vec<Vec<String>> = fields.iter().map(DataField::to_tag).collect();
        FIELD.replace_all(self.tags_mut(), entries);
    }

    pub fn validate(&self) -> Result<(), Nip58Error> {
        self.definition.validate()
    }

    pub fn validate_with(&self, config: &Nip58Config) -> Result<(), Nip58Error> {
        self.definition.validate_with(config)
    }
}

impl BadgeEvent for AkaBadgeDefinition {
    const KIND: u16 = KIND_BADGE_DEFINITION;

    fn from_event(event: TaggedEvent) -> Self {
        Self {
            definition: BadgeDefinition::from_event(event),
        }
    }

    fn event(&self) -> &TaggedEvent {
        self.definition.event()
    }

    fn event_mut(&mut self) -> &mut TaggedEvent {
        self.definition.event_mut()
    }

    fn into_event(self) -> TaggedEvent {
        self.definition.into_event()
    }
}

impl From<BadgeDefinition> for AkaBadgeDefinition {
    fn from(definition: BadgeDefinition) -> Self {
        Self { definition }
    }
}
