//! Editor appearance annotations and widget controls.

use serde::{Deserialize, Serialize};

/// Ids of the built-in editor widgets.
pub mod widget_ids {
    pub const SINGLE_LINE: &str = "singleLine";
    pub const MULTIPLE_LINE: &str = "multipleLine";
    pub const MARKDOWN: &str = "markdown";
    pub const DROPDOWN: &str = "dropdown";
    pub const RADIO: &str = "radio";
    pub const CHECKBOX: &str = "checkbox";
    pub const BOOLEAN: &str = "boolean";
    pub const RATING: &str = "rating";
    pub const DATE_PICKER: &str = "datePicker";
    pub const NUMBER_EDITOR: &str = "numberEditor";
    pub const SLUG_EDITOR: &str = "slugEditor";
    pub const URL_EDITOR: &str = "urlEditor";
    pub const LIST_INPUT: &str = "listInput";
    pub const TAG_EDITOR: &str = "tagEditor";
    pub const ASSET_LINK_EDITOR: &str = "assetLinkEditor";
    pub const ENTRY_LINK_EDITOR: &str = "entryLinkEditor";
    pub const ENTRY_CARD_EDITOR: &str = "entryCardEditor";
    pub const LOCATION_EDITOR: &str = "locationEditor";
    pub const OBJECT_EDITOR: &str = "objectEditor";
}

/// Date format of the date picker widget.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum DateFormat {
    #[default]
    #[serde(rename = "dateonly")]
    DateOnly,
    #[serde(rename = "time")]
    Time,
    #[serde(rename = "timeZ")]
    TimeZone,
}

impl DateFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            DateFormat::DateOnly => "dateonly",
            DateFormat::Time => "time",
            DateFormat::TimeZone => "timeZ",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        match s {
            "dateonly" => Some(DateFormat::DateOnly),
            "time" => Some(DateFormat::Time),
            "timeZ" => Some(DateFormat::TimeZone),
            _ => None,
        }
    }
}

/// Appearance annotation on a model member.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum AppearanceAnnotation {
    /// Any widget or UI extension, by id.
    Extension {
        extension_id: String,
        help_text: Option<String>,
    },
    Boolean {
        true_label: String,
        false_label: String,
        help_text: Option<String>,
    },
    Rating {
        number_of_stars: u32,
        help_text: Option<String>,
    },
    DatePicker {
        #[serde(default)]
        date_format: DateFormat,
        clock_format: Option<String>,
        help_text: Option<String>,
    },
}

impl AppearanceAnnotation {
    pub fn extension(extension_id: impl Into<String>) -> Self {
        AppearanceAnnotation::Extension {
            extension_id: extension_id.into(),
            help_text: None,
        }
    }

    pub fn boolean(true_label: impl Into<String>, false_label: impl Into<String>) -> Self {
        AppearanceAnnotation::Boolean {
            true_label: true_label.into(),
            false_label: false_label.into(),
            help_text: None,
        }
    }

    pub fn rating(number_of_stars: u32) -> Self {
        AppearanceAnnotation::Rating {
            number_of_stars,
            help_text: None,
        }
    }

    pub fn date_picker(date_format: DateFormat, clock_format: Option<&str>) -> Self {
        AppearanceAnnotation::DatePicker {
            date_format,
            clock_format: clock_format.map(String::from),
            help_text: None,
        }
    }

    pub fn with_help_text(mut self, text: impl Into<String>) -> Self {
        let text = Some(text.into());
        match &mut self {
            AppearanceAnnotation::Extension { help_text, .. }
            | AppearanceAnnotation::Boolean { help_text, .. }
            | AppearanceAnnotation::Rating { help_text, .. }
            | AppearanceAnnotation::DatePicker { help_text, .. } => *help_text = text,
        }
        self
    }
}

/// Widget specific settings of a control.
#[derive(Debug, Clone, PartialEq)]
pub enum WidgetSettings {
    Plain {
        help_text: Option<String>,
    },
    Boolean {
        help_text: Option<String>,
        true_label: String,
        false_label: String,
    },
    Rating {
        help_text: Option<String>,
        star_count: u32,
    },
    DatePicker {
        help_text: Option<String>,
        date_format: DateFormat,
        clock_format: Option<String>,
    },
}

impl WidgetSettings {
    pub fn help_text(&self) -> Option<&str> {
        match self {
            WidgetSettings::Plain { help_text }
            | WidgetSettings::Boolean { help_text, .. }
            | WidgetSettings::Rating { help_text, .. }
            | WidgetSettings::DatePicker { help_text, .. } => help_text.as_deref(),
        }
    }
}

/// A widget not yet bound to a field.
#[derive(Debug, Clone, PartialEq)]
pub struct Widget {
    pub widget_id: String,
    pub settings: WidgetSettings,
}

impl Widget {
    /// Bind this widget to a field.
    pub fn bind(self, field_id: impl Into<String>) -> WidgetControl {
        WidgetControl::new(field_id, self.widget_id, self.settings)
    }
}

/// Editor binding of one field.
///
/// Controls read from the service keep their received encoding and are
/// written back unchanged unless their id or settings were modified.
/// Equality ignores that encoding.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(into = "crate::wire::WireControl", from = "crate::wire::WireControl")]
pub struct WidgetControl {
    pub field_id: String,
    pub widget_id: String,
    pub settings: WidgetSettings,
    pub(crate) received: Option<crate::wire::WireControl>,
}

impl WidgetControl {
    pub fn new(
        field_id: impl Into<String>,
        widget_id: impl Into<String>,
        settings: WidgetSettings,
    ) -> Self {
        Self {
            field_id: field_id.into(),
            widget_id: widget_id.into(),
            settings,
            received: None,
        }
    }
}

impl PartialEq for WidgetControl {
    fn eq(&self, other: &Self) -> bool {
        self.field_id == other.field_id
            && self.widget_id == other.widget_id
            && self.settings == other.settings
    }
}

/// Translate an appearance annotation into an unbound widget.
pub fn translate_appearance(annotation: &AppearanceAnnotation) -> Widget {
    match annotation {
        AppearanceAnnotation::Extension {
            extension_id,
            help_text,
        } => Widget {
            widget_id: extension_id.clone(),
            settings: WidgetSettings::Plain {
                help_text: help_text.clone(),
            },
        },
        AppearanceAnnotation::Boolean {
            true_label,
            false_label,
            help_text,
        } => Widget {
            widget_id: widget_ids::BOOLEAN.to_string(),
            settings: WidgetSettings::Boolean {
                help_text: help_text.clone(),
                true_label: true_label.clone(),
                false_label: false_label.clone(),
            },
        },
        AppearanceAnnotation::Rating {
            number_of_stars,
            help_text,
        } => Widget {
            widget_id: widget_ids::RATING.to_string(),
            settings: WidgetSettings::Rating {
                help_text: help_text.clone(),
                star_count: *number_of_stars,
            },
        },
        AppearanceAnnotation::DatePicker {
            date_format,
            clock_format,
            help_text,
        } => Widget {
            widget_id: widget_ids::DATE_PICKER.to_string(),
            settings: WidgetSettings::DatePicker {
                help_text: help_text.clone(),
                date_format: *date_format,
                clock_format: clock_format.clone(),
            },
        },
    }
}
