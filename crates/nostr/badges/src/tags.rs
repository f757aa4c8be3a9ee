//! Tag schema and codec.
//!
//! Every tag the badge models touch is described once in [`SCHEMA`]: its
//! name, whether an event may carry one or many of it, and how many
//! positional arguments follow the name. The generic accessors on
//! [`TagSpec`] are what the models use to read and write fields, so the
//! "one tag per singular field" rule is enforced in a single place.
//!
//! The image codec converts between `[name, url, dimensions?]` tags and
//! [`ImageValue`].

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::trace;

/// Errors that can occur while checking tag shapes.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TagError {
    #[error("empty tag")]
    Empty,

    #[error("unknown tag: {0}")]
    Unknown(String),

    #[error("{name} tag requires {expected} argument(s), got {got}")]
    TooFewArguments {
        name: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{name} tag takes at most {expected} argument(s), got {got}")]
    TooManyArguments {
        name: &'static str,
        expected: usize,
        got: usize,
    },

    #[error("{0} tag may appear only once")]
    Duplicate(&'static str),

    #[error("invalid dimensions: {0}")]
    InvalidDimensions(String),
}

/// How many tags of a given name an event may carry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Cardinality {
    /// At most one tag with this name
    Single,
    /// Any number of tags with this name
    Multi,
}

/// Shape of one tag name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TagSpec {
    /// Tag name (first element of the tag)
    pub name: &'static str,
    /// Single or multi valued
    pub cardinality: Cardinality,
    /// Positional arguments that must be present
    pub required: usize,
    /// Positional arguments that may follow the required ones
    pub optional: usize,
}

pub const D: TagSpec = TagSpec::single("d", 1, 0);
pub const NAME: TagSpec = TagSpec::single("name", 1, 0);
pub const DESCRIPTION: TagSpec = TagSpec::single("description", 1, 0);
pub const IMAGE: TagSpec = TagSpec::single("image", 1, 1);
pub const THUMB: TagSpec = TagSpec::multi("thumb", 1, 1);
pub const A: TagSpec = TagSpec::multi("a", 1, 1);
pub const E: TagSpec = TagSpec::multi("e", 1, 1);
pub const P: TagSpec = TagSpec::multi("p", 1, 1);
pub const APPLY_URL: TagSpec = TagSpec::single("applyURL", 1, 0);
pub const USER_PARAM: TagSpec = TagSpec::multi("userParam", 2, 0);
pub const UP_HELP: TagSpec = TagSpec::single("upHelp", 1, 0);
pub const FIELD: TagSpec = TagSpec::multi("field", 1, 2);

/// Every tag shape known to this crate.
pub const SCHEMA: &[TagSpec] = &[
    D,
    NAME,
    DESCRIPTION,
    IMAGE,
    THUMB,
    A,
    E,
    P,
    APPLY_URL,
    USER_PARAM,
    UP_HELP,
    FIELD,
];

/// Find the shape registered for a tag name.
pub fn lookup(name: &str) -> Option<&'static TagSpec> {
    SCHEMA.iter().find(|spec| spec.name == name)
}

/// Check one tag against its registered shape.
pub fn validate_tag(tag: &[String]) -> Result<&'static TagSpec, TagError> {
    let name = tag.first().ok_or(TagError::Empty)?;
    let spec = lookup(name).ok_or_else(|| TagError::Unknown(name.clone()))?;
    spec.validate(tag)?;
    Ok(spec)
}

/// Check every known tag in a list, including single-valued duplicates.
///
/// Tags with names outside [`SCHEMA`] are ignored; events routinely carry
/// tags this crate does not model.
pub fn validate_tags(tags: &[Vec<String>]) -> Result<(), TagError> {
    for tag in tags {
        match validate_tag(tag) {
            Ok(_) | Err(TagError::Unknown(_)) => {}
            Err(e) => return Err(e),
        }
    }

    for spec in SCHEMA
        .iter()
        .filter(|spec| spec.cardinality == Cardinality::Single)
    {
        if spec.count(tags) > 1 {
            return Err(TagError::Duplicate(spec.name));
        }
    }

    Ok(())
}

impl TagSpec {
    pub const fn single(name: &'static str, required: usize, optional: usize) -> Self {
        Self {
            name,
            cardinality: Cardinality::Single,
            required,
            optional,
        }
    }

    pub const fn multi(name: &'static str, required: usize, optional: usize) -> Self {
        Self {
            name,
            cardinality: Cardinality::Multi,
            required,
            optional,
        }
    }

    /// Whether a tag carries this name.
    pub fn matches(&self, tag: &[String]) -> bool {
        tag.first().map(|s| s.as_str()) == Some(self.name)
    }

    /// Check the argument count of a tag with this name.
    pub fn validate(&self, tag: &[String]) -> Result<(), TagError> {
        let got = tag.len().saturating_sub(1);
        if got < self.required {
            return Err(TagError::TooFewArguments {
                name: self.name,
                expected: self.required,
                got,
            });
        }
        let max = self.required + self.optional;
        if got > max {
            return Err(TagError::TooManyArguments {
                name: self.name,
                expected: max,
                got,
            });
        }
        Ok(())
    }

    /// All tags with this name, in event order.
    pub fn all<'a>(
        &self,
        tags: &'a [Vec<String>],
    ) -> impl Iterator<Item = &'a Vec<String>> + use<'a> {
        let name = self.name;
        tags.iter()
            .filter(move |tag| tag.first().map(|s| s.as_str()) == Some(name))
    }

    /// Number of tags with this name.
    pub fn count(&self, tags: &[Vec<String>]) -> usize {
        self.all(tags).count()
    }

    /// The first tag with this name.
    pub fn first<'a>(&self, tags: &'a [Vec<String>]) -> Option<&'a Vec<String>> {
        self.all(tags).next()
    }

    /// First argument of the first tag with this name.
    pub fn value<'a>(&self, tags: &'a [Vec<String>]) -> Option<&'a str> {
        self.first(tags)
            .and_then(|tag| tag.get(1))
            .map(|s| s.as_str())
    }

    /// First argument of every tag with this name, skipping bare tags.
    pub fn values<'a>(&self, tags: &'a [Vec<String>]) -> Vec<&'a str> {
        self.all(tags)
            .filter_map(|tag| tag.get(1))
            .map(|s| s.as_str())
            .collect()
    }

    /// Build a tag with this name from its arguments.
    pub fn build<I, S>(&self, args: I) -> Vec<String>
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut tag = vec![self.name.to_string()];
        tag.extend(args.into_iter().map(Into::into));
        tag
    }

    /// Remove every tag with this name. Returns how many were removed.
    pub fn remove(&self, tags: &mut Vec<Vec<String>>) -> usize {
        let before = tags.len();
        tags.retain(|tag| !self.matches(tag));
        before - tags.len()
    }

    /// Replace every tag with this name by a single tag, or by nothing.
    pub fn set(&self, tags: &mut Vec<Vec<String>>, tag: Option<Vec<String>>) {
        let removed = self.remove(tags);
        trace!(tag = self.name, removed, set = tag.is_some(), "replacing tag");
        if let Some(tag) = tag {
            tags.push(tag);
        }
    }

    /// Replace every tag with this name by the given tags, in order.
    pub fn replace_all<I>(&self, tags: &mut Vec<Vec<String>>, entries: I)
    where
        I: IntoIterator<Item = Vec<String>>,
    {
        let removed = self.remove(tags);
        let before = tags.len();
        tags.extend(entries);
        trace!(
            tag = self.name,
            removed,
            added = tags.len() - before,
            "replacing tag list"
        );
    }
}

/// Image dimensions (width x height in pixels)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Dimensions {
    pub width: u32,
    pub height: u32,
}

impl Dimensions {
    /// Create new dimensions
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// Parse from "widthxheight" string
    pub fn parse(s: &str) -> Result<Self, TagError> {
        let (width, height) = s.split_once('x').ok_or_else(|| {
            TagError::InvalidDimensions(format!("expected WIDTHxHEIGHT format, got '{}'", s))
        })?;

        let width: u32 = width
            .parse()
            .map_err(|_| TagError::InvalidDimensions(format!("invalid width: {}", width)))?;

        let height: u32 = height
            .parse()
            .map_err(|_| TagError::InvalidDimensions(format!("invalid height: {}", height)))?;

        Ok(Self { width, height })
    }
}

impl std::fmt::Display for Dimensions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// An image reference: URL plus optional `"<width>x<height>"` token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ImageValue {
    pub url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub dimensions: Option<String>,
}

impl ImageValue {
    pub fn new(url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            dimensions: None,
        }
    }

    pub fn with_dimensions(mut self, dimensions: impl Into<String>) -> Self {
        self.dimensions = Some(dimensions.into());
        self
    }

    /// Parsed dimensions, if present and well formed.
    pub fn parsed_dimensions(&self) -> Option<Dimensions> {
        self.dimensions
            .as_deref()
            .and_then(|d| Dimensions::parse(d).ok())
    }
}

/// What image setters accept: a bare URL or a full [`ImageValue`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImageInput {
    Url(String),
    Image(ImageValue),
}

impl ImageInput {
    /// URL and dimensions, with an empty dimensions string treated as none.
    pub fn into_parts(self) -> (String, Option<String>) {
        match self {
            ImageInput::Url(url) => (url, None),
            ImageInput::Image(image) => (
                image.url,
                image.dimensions.filter(|d| !d.is_empty()),
            ),
        }
    }
}

impl From<&str> for ImageInput {
    fn from(url: &str) -> Self {
        ImageInput::Url(url.to_string())
    }
}

impl From<String> for ImageInput {
    fn from(url: String) -> Self {
        ImageInput::Url(url)
    }
}

impl From<ImageValue> for ImageInput {
    fn from(image: ImageValue) -> Self {
        ImageInput::Image(image)
    }
}

/// Decode an `[name, url, dimensions?]` tag.
///
/// Returns `None` when the tag has no arguments.
pub fn decode_image(tag: &[String]) -> Option<ImageValue> {
    let url = tag.get(1)?;
    Some(ImageValue {
        url: url.clone(),
        dimensions: tag.get(2).cloned(),
    })
}

/// Encode an image as `[name, url]` or `[name, url, dimensions]`.
///
/// A bare URL is always encoded. A record with an empty URL yields `None`.
pub fn encode_image(name: &str, image: impl Into<ImageInput>) -> Option<Vec<String>> {
    match image.into() {
        ImageInput::Url(url) => Some(vec![name.to_string(), url]),
        ImageInput::Image(image) => {
            if image.url.is_empty() {
                return None;
            }
            let mut tag = vec![name.to_string(), image.url];
            if let Some(dimensions) = image.dimensions.filter(|d| !d.is_empty()) {
                tag.push(dimensions);
            }
            Some(tag)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tag(parts: &[&str]) -> Vec<String> {
        parts.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn test_decode_image() {
        assert_eq!(decode_image(&tag(&["image"])), None);
        assert_eq!(decode_image(&[]), None);
        assert_eq!(
            decode_image(&tag(&["image", "https://x/y.png"])),
            Some(ImageValue::new("https://x/y.png"))
        );
        assert_eq!(
            decode_image(&tag(&["thumb", "https://x/t.png", "256x256"])),
            Some(ImageValue::new("https://x/t.png").with_dimensions("256x256"))
        );
    }

    #[test]
    fn test_encode_image() {
        assert_eq!(
            encode_image("image", "https://x/y.png"),
            Some(tag(&["image", "https://x/y.png"]))
        );
        assert_eq!(
            encode_image(
                "thumb",
                ImageValue::new("https://x/t.png").with_dimensions("128x128")
            ),
            Some(tag(&["thumb", "https://x/t.png", "128x128"]))
        );
        assert_eq!(
            encode_image("image", ImageValue::new("https://x/y.png").with_dimensions("")),
            Some(tag(&["image", "https://x/y.png"]))
        );
        assert_eq!(encode_image("image", ImageValue::new("")), None);
    }

    #[test]
    fn test_dimensions_parse() {
        let dims = Dimensions::parse("1024x1024").unwrap();
        assert_eq!(dims, Dimensions::new(1024, 1024));
        assert_eq!(Dimensions::new(256, 512).to_string(), "256x512");

        assert!(Dimensions::parse("invalid").is_err());
        assert!(Dimensions::parse("1024").is_err());
        assert!(Dimensions::parse("1024x").is_err());
        assert!(Dimensions::parse("1x2x3").is_err());
    }

    #[test]
    fn test_parsed_dimensions() {
        let image = ImageValue::new("u").with_dimensions("64x32");
        assert_eq!(image.parsed_dimensions(), Some(Dimensions::new(64, 32)));
        assert_eq!(ImageValue::new("u").with_dimensions("big").parsed_dimensions(), None);
    }

    #[test]
    fn test_lookup_and_validate_tag() {
        assert_eq!(lookup("thumb"), Some(&THUMB));
        assert_eq!(lookup("nope"), None);

        assert!(validate_tag(&tag(&["d", "abc"])).is_ok());
        assert!(validate_tag(&tag(&["field", "score", "Score", "Final score"])).is_ok());
        assert_eq!(validate_tag(&[]), Err(TagError::Empty));
        assert_eq!(
            validate_tag(&tag(&["alt", "x"])),
            Err(TagError::Unknown("alt".to_string()))
        );
        assert_eq!(
            validate_tag(&tag(&["userParam", "name"])),
            Err(TagError::TooFewArguments {
                name: "userParam",
                expected: 2,
                got: 1
            })
        );
        assert_eq!(
            validate_tag(&tag(&["name", "a", "b"])),
            Err(TagError::TooManyArguments {
                name: "name",
                expected: 1,
                got: 2
            })
        );
    }

    #[test]
    fn test_validate_tags_rejects_duplicate_singles() {
        let tags = vec![
            tag(&["name", "one"]),
            tag(&["thumb", "a"]),
            tag(&["thumb", "b"]),
            tag(&["alt", "ignored"]),
        ];
        assert!(validate_tags(&tags).is_ok());

        let tags = vec![tag(&["name", "one"]), tag(&["name", "two"])];
        assert_eq!(validate_tags(&tags), Err(TagError::Duplicate("name")));
    }

    #[test]
    fn test_set_replaces_all() {
        let mut tags = vec![
            tag(&["name", "one"]),
            tag(&["d", "x"]),
            tag(&["name", "two"]),
        ];

        NAME.set(&mut tags, Some(NAME.build(["three"])));
        assert_eq!(tags, vec![tag(&["d", "x"]), tag(&["name", "three"])]);

        NAME.set(&mut tags, None);
        assert_eq!(tags, vec![tag(&["d", "x"])]);
    }

    #[test]
    fn test_replace_all_and_values() {
        let mut tags = vec![tag(&["p", "old"]), tag(&["d", "x"]), tag(&["p"])];
        P.replace_all(&mut tags, ["a", "b"].iter().map(|pk| P.build([*pk])));

        assert_eq!(P.values(&tags), vec!["a", "b"]);
        assert_eq!(tags[0], tag(&["d", "x"]));
        assert_eq!(P.count(&tags), 2);
    }
}
