//! Validation annotations and their normalized validators.
//!
//! Annotations are what a model declares on a member. Validators are what
//! ends up in the compiled field. Translation is one-to-one and order
//! preserving.

use serde::{Deserialize, Serialize};

/// Mime type groups an asset link can be restricted to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MimeTypeGroup {
    Attachment,
    Plaintext,
    Image,
    Audio,
    Video,
    Richtext,
    Presentation,
    Spreadsheet,
    Pdfdocument,
    Archive,
    Code,
    Markup,
}

impl MimeTypeGroup {
    pub fn as_str(&self) -> &'static str {
        match self {
            MimeTypeGroup::Attachment => "attachment",
            MimeTypeGroup::Plaintext => "plaintext",
            MimeTypeGroup::Image => "image",
            MimeTypeGroup::Audio => "audio",
            MimeTypeGroup::Video => "video",
            MimeTypeGroup::Richtext => "richtext",
            MimeTypeGroup::Presentation => "presentation",
            MimeTypeGroup::Spreadsheet => "spreadsheet",
            MimeTypeGroup::Pdfdocument => "pdfdocument",
            MimeTypeGroup::Archive => "archive",
            MimeTypeGroup::Code => "code",
            MimeTypeGroup::Markup => "markup",
        }
    }
}

/// Unit of a file size bound.
#[allow(clippy::upper_case_acronyms)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum FileSizeUnit {
    Bytes,
    KB,
    MB,
}

impl FileSizeUnit {
    /// Number of bytes in one unit.
    pub fn multiplier(&self) -> u64 {
        match self {
            FileSizeUnit::Bytes => 1,
            FileSizeUnit::KB => 1024,
            FileSizeUnit::MB => 1024 * 1024,
        }
    }
}

/// A validation annotation as declared on a model member.
///
/// Manifest form is internally tagged:
/// `{ "type": "size", "min": 2, "max": 5, "helpText": "..." }`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum ValidationAnnotation {
    Size {
        min: Option<i64>,
        max: Option<i64>,
        help_text: Option<String>,
    },
    Range {
        min: Option<f64>,
        max: Option<f64>,
        help_text: Option<String>,
    },
    LinkContentType {
        content_type_ids: Vec<String>,
        help_text: Option<String>,
    },
    InValues {
        values: Vec<String>,
        help_text: Option<String>,
    },
    MimeType {
        mime_types: Vec<MimeTypeGroup>,
        help_text: Option<String>,
    },
    Regex {
        expression: String,
        flags: Option<String>,
        help_text: Option<String>,
    },
    Unique {
        help_text: Option<String>,
    },
    DateRange {
        min: Option<String>,
        max: Option<String>,
        help_text: Option<String>,
    },
    FileSize {
        min: Option<u64>,
        max: Option<u64>,
        min_unit: Option<FileSizeUnit>,
        max_unit: Option<FileSizeUnit>,
        help_text: Option<String>,
    },
    ImageSize {
        min_width: Option<u32>,
        max_width: Option<u32>,
        min_height: Option<u32>,
        max_height: Option<u32>,
        help_text: Option<String>,
    },
}

impl ValidationAnnotation {
    /// Size constraint with both bounds.
    pub fn size(min: i64, max: i64) -> Self {
        ValidationAnnotation::Size {
            min: Some(min),
            max: Some(max),
            help_text: None,
        }
    }

    /// Numeric range constraint with both bounds.
    pub fn range(min: f64, max: f64) -> Self {
        ValidationAnnotation::Range {
            min: Some(min),
            max: Some(max),
            help_text: None,
        }
    }

    /// Restrict entry links to the given content type ids.
    pub fn link_content_type<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValidationAnnotation::LinkContentType {
            content_type_ids: ids.into_iter().map(Into::into).collect(),
            help_text: None,
        }
    }

    /// Restrict values to a fixed list.
    pub fn in_values<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        ValidationAnnotation::InValues {
            values: values.into_iter().map(Into::into).collect(),
            help_text: None,
        }
    }

    /// Restrict asset links to the given mime type groups.
    pub fn mime_type(groups: impl IntoIterator<Item = MimeTypeGroup>) -> Self {
        ValidationAnnotation::MimeType {
            mime_types: groups.into_iter().collect(),
            help_text: None,
        }
    }

    /// Pattern constraint.
    pub fn regex(expression: impl Into<String>, flags: Option<&str>) -> Self {
        ValidationAnnotation::Regex {
            expression: expression.into(),
            flags: flags.map(String::from),
            help_text: None,
        }
    }

    pub fn unique() -> Self {
        ValidationAnnotation::Unique { help_text: None }
    }

    /// Date range with `yyyy-MM-dd` bounds.
    pub fn date_range(min: Option<&str>, max: Option<&str>) -> Self {
        ValidationAnnotation::DateRange {
            min: min.map(String::from),
            max: max.map(String::from),
            help_text: None,
        }
    }

    /// Asset file size bounds, each in its own unit.
    pub fn file_size(
        min: Option<(u64, FileSizeUnit)>,
        max: Option<(u64, FileSizeUnit)>,
    ) -> Self {
        ValidationAnnotation::FileSize {
            min: min.map(|(v, _)| v),
            max: max.map(|(v, _)| v),
            min_unit: min.map(|(_, u)| u),
            max_unit: max.map(|(_, u)| u),
            help_text: None,
        }
    }

    /// Image dimension bounds in pixels, as `(width, height)` pairs.
    pub fn image_size(min: Option<(u32, u32)>, max: Option<(u32, u32)>) -> Self {
        ValidationAnnotation::ImageSize {
            min_width: min.map(|(w, _)| w),
            max_width: max.map(|(w, _)| w),
            min_height: min.map(|(_, h)| h),
            max_height: max.map(|(_, h)| h),
            help_text: None,
        }
    }

    /// Attach a help text, replacing any existing one.
    pub fn with_help_text(mut self, text: impl Into<String>) -> Self {
        let text = Some(text.into());
        match &mut self {
            ValidationAnnotation::Size { help_text, .. }
            | ValidationAnnotation::Range { help_text, .. }
            | ValidationAnnotation::LinkContentType { help_text, .. }
            | ValidationAnnotation::InValues { help_text, .. }
            | ValidationAnnotation::MimeType { help_text, .. }
            | ValidationAnnotation::Regex { help_text, .. }
            | ValidationAnnotation::Unique { help_text }
            | ValidationAnnotation::DateRange { help_text, .. }
            | ValidationAnnotation::FileSize { help_text, .. }
            | ValidationAnnotation::ImageSize { help_text, .. } => *help_text = text,
        }
        self
    }
}

/// Normalized constraint carried by a [`Validator`].
#[derive(Debug, Clone, PartialEq)]
pub enum Constraint {
    Size {
        min: Option<i64>,
        max: Option<i64>,
    },
    Range {
        min: Option<f64>,
        max: Option<f64>,
    },
    /// Set of content type ids, first-seen order.
    LinkContentType {
        ids: Vec<String>,
    },
    InValues {
        values: Vec<String>,
    },
    MimeType {
        groups: Vec<MimeTypeGroup>,
    },
    Regex {
        expression: String,
        flags: Option<String>,
    },
    Unique,
    DateRange {
        min: Option<String>,
        max: Option<String>,
    },
    /// Bounds are kept in their declared units; `None` means unbounded, which
    /// is distinct from a zero minimum.
    FileSize {
        min: Option<u64>,
        max: Option<u64>,
        min_unit: Option<FileSizeUnit>,
        max_unit: Option<FileSizeUnit>,
    },
    ImageSize {
        min_width: Option<u32>,
        max_width: Option<u32>,
        min_height: Option<u32>,
        max_height: Option<u32>,
    },
}

impl Constraint {
    /// File size bounds converted to bytes.
    ///
    /// Returns `None` for non file size constraints. A missing unit counts as
    /// bytes.
    pub fn file_size_bytes(&self) -> Option<(Option<u64>, Option<u64>)> {
        match self {
            Constraint::FileSize {
                min,
                max,
                min_unit,
                max_unit,
            } => {
                let to_bytes = |value: &Option<u64>, unit: &Option<FileSizeUnit>| {
                    value.map(|v| v.saturating_mul(unit.unwrap_or(FileSizeUnit::Bytes).multiplier()))
                };
                Some((to_bytes(min, min_unit), to_bytes(max, max_unit)))
            }
            _ => None,
        }
    }
}

/// A normalized field validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(into = "serde_json::Value", try_from = "serde_json::Value")]
pub struct Validator {
    pub constraint: Constraint,
    pub help_text: Option<String>,
}

impl Validator {
    pub fn new(constraint: Constraint) -> Self {
        Self {
            constraint,
            help_text: None,
        }
    }

    /// Returns true for constraints on the number of items (or characters)
    /// rather than on each value.
    ///
    /// On collection fields these stay on the field; everything else moves
    /// to the items schema.
    pub fn is_size(&self) -> bool {
        matches!(self.constraint, Constraint::Size { .. })
    }
}

/// Translate one annotation into its validator.
pub fn translate_validation(annotation: &ValidationAnnotation) -> Validator {
    let (constraint, help_text) = match annotation {
        ValidationAnnotation::Size { min, max, help_text } => (
            Constraint::Size {
                min: *min,
                max: *max,
            },
            help_text,
        ),
        ValidationAnnotation::Range { min, max, help_text } => (
            Constraint::Range {
                min: *min,
                max: *max,
            },
            help_text,
        ),
        ValidationAnnotation::LinkContentType {
            content_type_ids,
            help_text,
        } => (
            Constraint::LinkContentType {
                ids: dedup(content_type_ids),
            },
            help_text,
        ),
        ValidationAnnotation::InValues { values, help_text } => (
            Constraint::InValues {
                values: values.clone(),
            },
            help_text,
        ),
        ValidationAnnotation::MimeType {
            mime_types,
            help_text,
        } => (
            Constraint::MimeType {
                groups: dedup(mime_types),
            },
            help_text,
        ),
        ValidationAnnotation::Regex {
            expression,
            flags,
            help_text,
        } => (
            Constraint::Regex {
                expression: expression.clone(),
                flags: flags.clone(),
            },
            help_text,
        ),
        ValidationAnnotation::Unique { help_text } => (Constraint::Unique, help_text),
        ValidationAnnotation::DateRange { min, max, help_text } => (
            Constraint::DateRange {
                min: min.clone(),
                max: max.clone(),
            },
            help_text,
        ),
        ValidationAnnotation::FileSize {
            min,
            max,
            min_unit,
            max_unit,
            help_text,
        } => (
            Constraint::FileSize {
                min: *min,
                max: *max,
                min_unit: *min_unit,
                max_unit: *max_unit,
            },
            help_text,
        ),
        ValidationAnnotation::ImageSize {
            min_width,
            max_width,
            min_height,
            max_height,
            help_text,
        } => (
            Constraint::ImageSize {
                min_width: *min_width,
                max_width: *max_width,
                min_height: *min_height,
                max_height: *max_height,
            },
            help_text,
        ),
    };

    Validator {
        constraint,
        help_text: help_text.clone(),
    }
}

/// Translate a member's annotations, keeping declaration order.
pub fn translate_validations(annotations: &[ValidationAnnotation]) -> Vec<Validator> {
    annotations.iter().map(translate_validation).collect()
}

fn dedup<T: Clone + PartialEq>(items: &[T]) -> Vec<T> {
    let mut out: Vec<T> = Vec::with_capacity(items.len());
    for item in items {
        if !out.contains(item) {
            out.push(item.clone());
        }
    }
    out
}
