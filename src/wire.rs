//! JSON encoding used by the Content Management API.
//!
//! Domain types serialize through these shapes (`#[serde(into, from)]`).
//! Reading is lenient: remote content types may use field kinds and
//! validations this crate does not model, and those are dropped rather than
//! failing the whole document. Only ids and versions of remote definitions
//! are ever acted on.

use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use tracing::debug;

use crate::appearance::{widget_ids, DateFormat, WidgetControl, WidgetSettings};
use crate::client::EditorInterface;
use crate::types::{ContentTypeDefinition, FieldDefinition, FieldKind, ItemsSchema, LinkType};
use crate::validation::{Constraint, MimeTypeGroup, Validator};

#[derive(Debug, Default, Serialize, Deserialize)]
pub(crate) struct WireSys {
    #[serde(default, skip_serializing_if = "String::is_empty")]
    id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    version: Option<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireContentType {
    #[serde(default)]
    sys: WireSys,
    #[serde(default)]
    name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    display_field: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    description: Option<String>,
    #[serde(default)]
    fields: Vec<WireField>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireField {
    id: String,
    #[serde(default)]
    name: String,
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    link_type: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    items: Option<WireItems>,
    #[serde(default)]
    required: bool,
    #[serde(default)]
    localized: bool,
    #[serde(default)]
    disabled: bool,
    #[serde(default)]
    omitted: bool,
    #[serde(default)]
    validations: Vec<Value>,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireItems {
    #[serde(rename = "type")]
    kind: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    link_type: Option<String>,
    #[serde(default)]
    validations: Vec<Value>,
}

impl From<ContentTypeDefinition> for WireContentType {
    fn from(def: ContentTypeDefinition) -> Self {
        Self {
            sys: WireSys {
                id: def.id,
                version: def.version,
            },
            name: def.name,
            display_field: def.display_field,
            description: def.description,
            fields: def.fields.into_iter().map(WireField::from).collect(),
        }
    }
}

impl From<WireContentType> for ContentTypeDefinition {
    fn from(wire: WireContentType) -> Self {
        let id = wire.sys.id;
        let fields = wire
            .fields
            .into_iter()
            .filter_map(|f| {
                let field_id = f.id.clone();
                let field = FieldDefinition::try_from(f);
                if let Err(kind) = &field {
                    debug!(content_type = %id, field = %field_id, kind = %kind, "skipping field of unsupported kind");
                }
                field.ok()
            })
            .collect();

        Self {
            id,
            name: wire.name,
            display_field: wire.display_field,
            description: wire.description,
            fields,
            version: wire.sys.version,
        }
    }
}

impl From<FieldDefinition> for WireField {
    fn from(field: FieldDefinition) -> Self {
        Self {
            id: field.id,
            name: field.name,
            kind: field.kind.as_str().to_string(),
            link_type: field.link_type.map(|l| l.as_str().to_string()),
            items: field.items.map(|items| WireItems {
                kind: items.kind.as_str().to_string(),
                link_type: items.link_type.map(|l| l.as_str().to_string()),
                validations: items.validations.into_iter().map(Value::from).collect(),
            }),
            required: field.required,
            localized: field.localized,
            disabled: field.disabled,
            omitted: field.omitted,
            validations: field.validations.into_iter().map(Value::from).collect(),
        }
    }
}

impl TryFrom<WireField> for FieldDefinition {
    /// The unsupported kind name.
    type Error = String;

    fn try_from(wire: WireField) -> Result<Self, Self::Error> {
        let kind = FieldKind::parse(&wire.kind).ok_or(wire.kind)?;
        let items = match wire.items {
            Some(items) => Some(ItemsSchema {
                kind: FieldKind::parse(&items.kind).ok_or(items.kind)?,
                link_type: items.link_type.as_deref().and_then(LinkType::parse),
                validations: read_validations(items.validations),
            }),
            None => None,
        };

        Ok(Self {
            id: wire.id,
            name: wire.name,
            kind,
            disabled: wire.disabled,
            omitted: wire.omitted,
            localized: wire.localized,
            required: wire.required,
            link_type: wire.link_type.as_deref().and_then(LinkType::parse),
            validations: read_validations(wire.validations),
            items,
        })
    }
}

fn read_validations(values: Vec<Value>) -> Vec<Validator> {
    values
        .into_iter()
        .filter_map(|v| match Validator::try_from(v) {
            Ok(validator) => Some(validator),
            Err(e) => {
                debug!("skipping validation: {}", e);
                None
            }
        })
        .collect()
}

// --- Validators ---

fn bounds<T: Serialize>(min: &Option<T>, max: &Option<T>) -> Value {
    let mut obj = Map::new();
    if let Some(min) = min {
        obj.insert("min".to_string(), json!(min));
    }
    if let Some(max) = max {
        obj.insert("max".to_string(), json!(max));
    }
    Value::Object(obj)
}

impl From<Validator> for Value {
    fn from(validator: Validator) -> Self {
        let (key, body) = match &validator.constraint {
            Constraint::Size { min, max } => ("size", bounds(min, max)),
            Constraint::Range { min, max } => ("range", bounds(min, max)),
            Constraint::LinkContentType { ids } => ("linkContentType", json!(ids)),
            Constraint::InValues { values } => ("in", json!(values)),
            Constraint::MimeType { groups } => (
                "linkMimetypeGroup",
                json!(groups.iter().map(MimeTypeGroup::as_str).collect::<Vec<_>>()),
            ),
            Constraint::Regex { expression, flags } => {
                let mut obj = Map::new();
                obj.insert("pattern".to_string(), json!(expression));
                if let Some(flags) = flags {
                    obj.insert("flags".to_string(), json!(flags));
                }
                ("regexp", Value::Object(obj))
            }
            Constraint::Unique => ("unique", Value::Bool(true)),
            Constraint::DateRange { min, max } => ("dateRange", bounds(min, max)),
            c @ Constraint::FileSize { .. } => {
                let (min, max) = c.file_size_bytes().unwrap_or_default();
                ("assetFileSize", bounds(&min, &max))
            }
            Constraint::ImageSize {
                min_width,
                max_width,
                min_height,
                max_height,
            } => (
                "assetImageDimensions",
                json!({
                    "width": bounds(min_width, max_width),
                    "height": bounds(min_height, max_height),
                }),
            ),
        };

        let mut obj = Map::new();
        obj.insert(key.to_string(), body);
        if let Some(message) = validator.help_text {
            obj.insert("message".to_string(), Value::String(message));
        }
        Value::Object(obj)
    }
}

fn strings(value: &Value) -> Vec<String> {
    value
        .as_array()
        .map(|arr| {
            arr.iter()
                .map(|v| v.as_str().map(String::from).unwrap_or_else(|| v.to_string()))
                .collect()
        })
        .unwrap_or_default()
}

fn bound_u32(value: &Value, key: &str) -> Option<u32> {
    value
        .get(key)
        .and_then(Value::as_u64)
        .and_then(|v| u32::try_from(v).ok())
}

fn bound_str(value: &Value, key: &str) -> Option<String> {
    value.get(key).and_then(Value::as_str).map(String::from)
}

impl TryFrom<Value> for Validator {
    type Error = String;

    fn try_from(value: Value) -> Result<Self, Self::Error> {
        let Some(obj) = value.as_object() else {
            return Err(format!("expected object, got {}", value));
        };
        let help_text = obj.get("message").and_then(Value::as_str).map(String::from);

        let constraint = if let Some(v) = obj.get("size") {
            Constraint::Size {
                min: v.get("min").and_then(Value::as_i64),
                max: v.get("max").and_then(Value::as_i64),
            }
        } else if let Some(v) = obj.get("range") {
            Constraint::Range {
                min: v.get("min").and_then(Value::as_f64),
                max: v.get("max").and_then(Value::as_f64),
            }
        } else if let Some(v) = obj.get("linkContentType") {
            Constraint::LinkContentType { ids: strings(v) }
        } else if let Some(v) = obj.get("in") {
            Constraint::InValues { values: strings(v) }
        } else if let Some(v) = obj.get("linkMimetypeGroup") {
            Constraint::MimeType {
                groups: strings(v)
                    .into_iter()
                    .filter_map(|g| serde_json::from_value(Value::String(g)).ok())
                    .collect(),
            }
        } else if let Some(v) = obj.get("regexp") {
            Constraint::Regex {
                expression: bound_str(v, "pattern").unwrap_or_default(),
                flags: bound_str(v, "flags"),
            }
        } else if obj.contains_key("unique") {
            Constraint::Unique
        } else if let Some(v) = obj.get("dateRange") {
            Constraint::DateRange {
                min: bound_str(v, "min"),
                max: bound_str(v, "max"),
            }
        } else if let Some(v) = obj.get("assetFileSize") {
            Constraint::FileSize {
                min: v.get("min").and_then(Value::as_u64),
                max: v.get("max").and_then(Value::as_u64),
                min_unit: None,
                max_unit: None,
            }
        } else if let Some(v) = obj.get("assetImageDimensions") {
            let width = v.get("width").cloned().unwrap_or_default();
            let height = v.get("height").cloned().unwrap_or_default();
            Constraint::ImageSize {
                min_width: bound_u32(&width, "min"),
                max_width: bound_u32(&width, "max"),
                min_height: bound_u32(&height, "min"),
                max_height: bound_u32(&height, "max"),
            }
        } else {
            let keys: Vec<&str> = obj.keys().map(String::as_str).collect();
            return Err(format!("unsupported validation: {}", keys.join(", ")));
        };

        Ok(Validator {
            constraint,
            help_text,
        })
    }
}

// --- Editor interface ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct WireControl {
    field_id: String,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    widget_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    widget_namespace: Option<String>,
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    settings: Map<String, Value>,
    #[serde(flatten)]
    extra: Map<String, Value>,
}

/// Settings keys read into [`WidgetSettings`].
const SETTINGS_KEYS: &[&str] = &[
    "helpText",
    "trueLabel",
    "falseLabel",
    "stars",
    "format",
    "ampm",
];

impl From<WidgetControl> for WireControl {
    fn from(mut control: WidgetControl) -> Self {
        // Unmodified remote controls go back exactly as they were read.
        let received = control.received.take();
        if let Some(received) = &received {
            if WidgetControl::from(received.clone()) == control {
                return received.clone();
            }
        }

        // Edited remote controls keep what this crate does not model,
        // as long as they still point at the same widget.
        let (widget_namespace, mut settings, extra) = match received {
            Some(received) if received.widget_id == control.widget_id => {
                let mut settings = received.settings;
                for key in SETTINGS_KEYS {
                    settings.remove(*key);
                }
                (received.widget_namespace, settings, received.extra)
            }
            _ => (None, Map::new(), Map::new()),
        };
        if let Some(help_text) = control.settings.help_text() {
            settings.insert("helpText".to_string(), json!(help_text));
        }
        match control.settings {
            WidgetSettings::Plain { .. } => {}
            WidgetSettings::Boolean {
                true_label,
                false_label,
                ..
            } => {
                settings.insert("trueLabel".to_string(), json!(true_label));
                settings.insert("falseLabel".to_string(), json!(false_label));
            }
            WidgetSettings::Rating { star_count, .. } => {
                settings.insert("stars".to_string(), json!(star_count));
            }
            WidgetSettings::DatePicker {
                date_format,
                clock_format,
                ..
            } => {
                settings.insert("format".to_string(), json!(date_format.as_str()));
                if let Some(clock_format) = clock_format {
                    settings.insert("ampm".to_string(), json!(clock_format));
                }
            }
        }

        Self {
            field_id: control.field_id,
            widget_id: control.widget_id,
            widget_namespace,
            settings,
            extra,
        }
    }
}

impl From<WireControl> for WidgetControl {
    fn from(wire: WireControl) -> Self {
        let settings = &wire.settings;
        let help_text = settings
            .get("helpText")
            .and_then(Value::as_str)
            .map(String::from);
        let text = |key: &str| settings.get(key).and_then(Value::as_str).map(String::from);

        let settings = match wire.widget_id.as_str() {
            widget_ids::BOOLEAN => WidgetSettings::Boolean {
                help_text,
                true_label: text("trueLabel").unwrap_or_default(),
                false_label: text("falseLabel").unwrap_or_default(),
            },
            widget_ids::RATING => WidgetSettings::Rating {
                help_text,
                star_count: settings
                    .get("stars")
                    .and_then(|v| {
                        v.as_u64()
                            .or_else(|| v.as_str().and_then(|s| s.parse().ok()))
                    })
                    .and_then(|v| u32::try_from(v).ok())
                    .unwrap_or(5),
            },
            widget_ids::DATE_PICKER => WidgetSettings::DatePicker {
                help_text,
                date_format: text("format")
                    .as_deref()
                    .and_then(DateFormat::parse)
                    .unwrap_or_default(),
                clock_format: text("ampm"),
            },
            _ => WidgetSettings::Plain { help_text },
        };

        Self {
            field_id: wire.field_id.clone(),
            widget_id: wire.widget_id.clone(),
            settings,
            received: Some(wire),
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct WireEditorInterface {
    #[serde(default)]
    sys: WireSys,
    #[serde(default)]
    controls: Vec<WireControl>,
}

impl From<EditorInterface> for WireEditorInterface {
    fn from(config: EditorInterface) -> Self {
        Self {
            sys: WireSys {
                id: String::new(),
                version: Some(config.version),
            },
            controls: config.controls.into_iter().map(WireControl::from).collect(),
        }
    }
}

impl From<WireEditorInterface> for EditorInterface {
    fn from(wire: WireEditorInterface) -> Self {
        Self {
            controls: wire.controls.into_iter().map(WidgetControl::from).collect(),
            version: wire.sys.version.unwrap_or_default(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::validation::FileSizeUnit;
    use pretty_assertions::assert_eq;

    fn validator(constraint: Constraint) -> Validator {
        Validator::new(constraint)
    }

    #[test]
    fn content_type_wire_shape() {
        let mut def = ContentTypeDefinition::new("something", "SomethingElse");
        def.display_field = Some("title".into());
        let mut field = FieldDefinition::new("tags", "Tags", FieldKind::Array);
        field.required = true;
        field.items = Some(ItemsSchema {
            kind: FieldKind::Symbol,
            link_type: None,
            validations: vec![validator(Constraint::InValues {
                values: vec!["a".into()],
            })],
        });
        def.fields.push(field);

        let value = serde_json::to_value(&def).unwrap();
        assert_eq!(
            value,
            json!({
                "sys": { "id": "something" },
                "name": "SomethingElse",
                "displayField": "title",
                "fields": [{
                    "id": "tags",
                    "name": "Tags",
                    "type": "Array",
                    "items": {
                        "type": "Symbol",
                        "validations": [{ "in": ["a"] }]
                    },
                    "required": true,
                    "localized": false,
                    "disabled": false,
                    "omitted": false,
                    "validations": []
                }]
            })
        );
    }

    #[test]
    fn remote_content_type_read_leniently() {
        let def: ContentTypeDefinition = serde_json::from_value(json!({
            "sys": { "id": "blogPost", "version": 12, "type": "ContentType" },
            "name": "Blog post",
            "displayField": "title",
            "fields": [
                { "id": "title", "name": "Title", "type": "Symbol",
                  "validations": [{ "unique": true }, { "nodes": {} }] },
                { "id": "body", "name": "Body", "type": "RichText" },
                { "id": "hero", "name": "Hero", "type": "Link", "linkType": "Asset" }
            ]
        }))
        .unwrap();

        assert_eq!(def.id, "blogPost");
        assert_eq!(def.version, Some(12));
        assert_eq!(def.fields.len(), 2);
        assert_eq!(def.fields[0].validations.len(), 1);
        assert_eq!(def.fields[1].link_type, Some(LinkType::Asset));
    }

    #[test]
    fn validator_wire_shapes() {
        let cases = vec![
            (
                Validator {
                    constraint: Constraint::Size {
                        min: Some(2),
                        max: Some(5),
                    },
                    help_text: Some("Too many or too few!".into()),
                },
                json!({ "size": { "min": 2, "max": 5 }, "message": "Too many or too few!" }),
            ),
            (
                validator(Constraint::Regex {
                    expression: "ss".into(),
                    flags: Some("gi".into()),
                }),
                json!({ "regexp": { "pattern": "ss", "flags": "gi" } }),
            ),
            (validator(Constraint::Unique), json!({ "unique": true })),
            (
                validator(Constraint::MimeType {
                    groups: vec![MimeTypeGroup::Image, MimeTypeGroup::Pdfdocument],
                }),
                json!({ "linkMimetypeGroup": ["image", "pdfdocument"] }),
            ),
            (
                validator(Constraint::FileSize {
                    min: Some(1),
                    max: None,
                    min_unit: Some(FileSizeUnit::MB),
                    max_unit: None,
                }),
                json!({ "assetFileSize": { "min": 1048576 } }),
            ),
            (
                validator(Constraint::ImageSize {
                    min_width: Some(200),
                    max_width: None,
                    min_height: Some(200),
                    max_height: None,
                }),
                json!({ "assetImageDimensions": {
                    "width": { "min": 200 },
                    "height": { "min": 200 }
                } }),
            ),
        ];

        for (validator, expected) in cases {
            assert_eq!(Value::from(validator), expected);
        }
    }

    #[test]
    fn unknown_validation_rejected() {
        let err = Validator::try_from(json!({ "enabledMarks": ["bold"] })).unwrap_err();
        assert!(err.contains("enabledMarks"));
    }

    #[test]
    fn controls_read_by_widget_id() {
        let config: EditorInterface = serde_json::from_value(json!({
            "sys": { "version": 4 },
            "controls": [
                { "fieldId": "title", "widgetId": "singleLine" },
                { "fieldId": "done", "widgetId": "boolean",
                  "settings": { "trueLabel": "Yes", "falseLabel": "No" } },
                { "fieldId": "score", "widgetId": "rating", "settings": { "stars": "7" } },
                { "fieldId": "when", "widgetId": "datePicker",
                  "settings": { "format": "timeZ", "ampm": "24", "helpText": "pick" } },
                { "fieldId": "slug" }
            ]
        }))
        .unwrap();

        assert_eq!(config.version, 4);
        assert_eq!(config.controls.len(), 5);
        assert_eq!(
            config.controls[0].settings,
            WidgetSettings::Plain { help_text: None }
        );
        assert_eq!(
            config.controls[1].settings,
            WidgetSettings::Boolean {
                help_text: None,
                true_label: "Yes".into(),
                false_label: "No".into()
            }
        );
        assert_eq!(
            config.controls[2].settings,
            WidgetSettings::Rating {
                help_text: None,
                star_count: 7
            }
        );
        assert_eq!(
            config.controls[3].settings,
            WidgetSettings::DatePicker {
                help_text: Some("pick".into()),
                date_format: DateFormat::TimeZone,
                clock_format: Some("24".into())
            }
        );
        assert_eq!(config.controls[4].widget_id, "");
    }

    #[test]
    fn control_wire_shape() {
        let control = WidgetControl::new(
            "when",
            "datePicker",
            WidgetSettings::DatePicker {
                help_text: Some("pick a day".into()),
                date_format: DateFormat::DateOnly,
                clock_format: None,
            },
        );
        assert_eq!(
            serde_json::to_value(&control).unwrap(),
            json!({
                "fieldId": "when",
                "widgetId": "datePicker",
                "settings": { "helpText": "pick a day", "format": "dateonly" }
            })
        );
    }

    #[test]
    fn untouched_controls_round_trip_verbatim() {
        let input = json!({
            "sys": { "version": 4 },
            "controls": [
                {
                    "fieldId": "slug",
                    "widgetId": "my-app",
                    "widgetNamespace": "app",
                    "settings": { "helpText": "h", "customKey": "keep me" }
                },
                { "fieldId": "score", "widgetId": "rating", "settings": { "stars": "7" } }
            ]
        });

        let config: EditorInterface = serde_json::from_value(input.clone()).unwrap();
        assert_eq!(
            config.controls[1].settings,
            WidgetSettings::Rating {
                help_text: None,
                star_count: 7
            }
        );
        assert_eq!(serde_json::to_value(&config).unwrap(), input);
    }

    #[test]
    fn merged_control_is_reencoded_and_neighbours_kept() {
        let mut config: EditorInterface = serde_json::from_value(json!({
            "sys": { "version": 4 },
            "controls": [
                {
                    "fieldId": "slug",
                    "widgetId": "my-app",
                    "widgetNamespace": "app",
                    "settings": { "helpText": "h", "customKey": "keep me" }
                },
                { "fieldId": "score", "widgetId": "rating", "settings": { "stars": "7" } }
            ]
        }))
        .unwrap();

        config.merge(&[WidgetControl::new(
            "score",
            widget_ids::RATING,
            WidgetSettings::Rating {
                help_text: None,
                star_count: 3,
            },
        )]);
        config.controls[0].settings = WidgetSettings::Plain {
            help_text: Some("edited".into()),
        };

        let value = serde_json::to_value(&config).unwrap();
        assert_eq!(
            value["controls"],
            json!([
                {
                    "fieldId": "slug",
                    "widgetId": "my-app",
                    "widgetNamespace": "app",
                    "settings": { "customKey": "keep me", "helpText": "edited" }
                },
                { "fieldId": "score", "widgetId": "rating", "settings": { "stars": 3 } }
            ])
        );
    }
}
