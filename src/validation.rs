//! Declarative rules for an image draft.
//!
//! Every field is checked on its own and reports at most one message, so a
//! draft with three bad fields yields three errors.

use std::collections::BTreeMap;
use std::fmt;

use bytes::Bytes;
use serde::Serialize;

/// 10 MiB
pub const DEFAULT_MAX_IMAGE_BYTES: u64 = 10 * 1024 * 1024;

pub const TITLE_MIN_CHARS: usize = 2;
pub const TITLE_MAX_CHARS: usize = 20;
pub const DESCRIPTION_MAX_CHARS: usize = 65;

/// An image picked by the user, held in memory until upload.
#[derive(Debug, Clone, PartialEq)]
pub struct ImageFile {
    pub name: String,
    pub bytes: Bytes,
}

impl ImageFile {
    pub fn new(name: impl Into<String>, bytes: impl Into<Bytes>) -> Self {
        Self {
            name: name.into(),
            bytes: bytes.into(),
        }
    }

    pub fn byte_size(&self) -> u64 {
        self.bytes.len() as u64
    }
}

/// User input that has not been checked yet.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DraftRecord {
    pub title: String,
    pub description: String,
    pub image: Option<ImageFile>,
}

/// A draft that passed every rule. Only `validate` constructs one.
#[derive(Debug, Clone, PartialEq)]
pub struct ValidDraft {
    title: String,
    description: String,
    image: ImageFile,
}

impl ValidDraft {
    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn image(&self) -> &ImageFile {
        &self.image
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Field {
    Image,
    Title,
    Description,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Field::Image => "image",
            Field::Title => "title",
            Field::Description => "description",
        };
        f.write_str(name)
    }
}

/// Field-level messages, one per failing field.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct ValidationErrors(BTreeMap<Field, String>);

impl ValidationErrors {
    pub fn get(&self, field: Field) -> Option<&str> {
        self.0.get(&field).map(String::as_str)
    }

    pub fn contains(&self, field: Field) -> bool {
        self.0.contains_key(&field)
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = (Field, &str)> {
        self.0.iter().map(|(field, msg)| (*field, msg.as_str()))
    }

    fn insert(&mut self, field: Field, message: impl Into<String>) {
        self.0.insert(field, message.into());
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for (field, message) in self.iter() {
            if !first {
                f.write_str("; ")?;
            }
            write!(f, "{field}: {message}")?;
            first = false;
        }
        Ok(())
    }
}

impl std::error::Error for ValidationErrors {}

/// Bounds applied by `validate`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationRules {
    pub max_image_bytes: u64,
    pub title_min_chars: usize,
    pub title_max_chars: usize,
    pub description_max_chars: usize,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            max_image_bytes: DEFAULT_MAX_IMAGE_BYTES,
            title_min_chars: TITLE_MIN_CHARS,
            title_max_chars: TITLE_MAX_CHARS,
            description_max_chars: DESCRIPTION_MAX_CHARS,
        }
    }
}

impl ValidationRules {
    pub fn with_max_image_bytes(max_image_bytes: u64) -> Self {
        Self {
            max_image_bytes,
            ..Default::default()
        }
    }
}

pub fn validate(
    draft: &DraftRecord,
    rules: &ValidationRules,
) -> Result<ValidDraft, ValidationErrors> {
    let mut errors = ValidationErrors::default();

    if let Some(message) = check_image(draft.image.as_ref(), rules) {
        errors.insert(Field::Image, message);
    }
    if let Some(message) = check_title(&draft.title, rules) {
        errors.insert(Field::Title, message);
    }
    if let Some(message) = check_description(&draft.description, rules) {
        errors.insert(Field::Description, message);
    }

    match &draft.image {
        Some(image) if errors.is_empty() => Ok(ValidDraft {
            title: draft.title.clone(),
            description: draft.description.clone(),
            image: image.clone(),
        }),
        _ => Err(errors),
    }
}

fn check_image(image: Option<&ImageFile>, rules: &ValidationRules) -> Option<String> {
    match image {
        None => Some("Image is required".to_string()),
        Some(image) if image.bytes.is_empty() => Some("Image is required".to_string()),
        Some(image) if image.byte_size() > rules.max_image_bytes => Some(format!(
            "Image must be at most {}",
            format_size(rules.max_image_bytes)
        )),
        Some(_) => None,
    }
}

/// Whole mebibytes print as `NMB`, anything else as a byte count.
fn format_size(bytes: u64) -> String {
    const MIB: u64 = 1024 * 1024;
    if bytes >= MIB && bytes % MIB == 0 {
        format!("{}MB", bytes / MIB)
    } else {
        format!("{bytes} bytes")
    }
}

fn check_title(title: &str, rules: &ValidationRules) -> Option<String> {
    let len = title.chars().count();
    if len == 0 {
        Some("Title is required".to_string())
    } else if len < rules.title_min_chars {
        Some(format!("Minimum of {} characters", rules.title_min_chars))
    } else if len > rules.title_max_chars {
        Some(format!("Maximum of {} characters", rules.title_max_chars))
    } else {
        None
    }
}

fn check_description(description: &str, rules: &ValidationRules) -> Option<String> {
    if description.is_empty() {
        Some("Description is required".to_string())
    } else if description.chars().count() > rules.description_max_chars {
        Some(format!(
            "Maximum of {} characters",
            rules.description_max_chars
        ))
    } else {
        None
    }
}
