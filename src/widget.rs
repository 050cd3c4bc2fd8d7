//! Field widget selection and value coercion
//!
//! Every [`FieldKind`] maps to exactly one [`Widget`]. Unrecognized kinds get
//! a single-line text input. Text-like widgets keep user input as strings;
//! the server is responsible for converting them to the column type.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde_json::Value;

use model_console_api::FieldKind;

use crate::error::{Error, Result};

/// Display format of the local date-time picker (minute precision)
const DATETIME_LOCAL_FORMAT: &str = "%Y-%m-%dT%H:%M";

/// Editable input used for a field
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Widget {
    /// Checkbox holding a boolean
    Toggle,
    /// Text area; JSON is forwarded as raw text
    MultiLineText,
    /// Number input holding the textual form of a number
    Numeric,
    /// Local date-time picker
    DateTimeLocal,
    /// Single-line text input
    Text,
}

/// What a widget shows or what the user entered into it
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetValue {
    Checked(bool),
    Text(String),
}

/// Pick the widget for a field kind
pub fn widget_for(kind: &FieldKind) -> Widget {
    match kind {
        FieldKind::Boolean => Widget::Toggle,
        FieldKind::Json => Widget::MultiLineText,
        FieldKind::Int | FieldKind::BigInt | FieldKind::Float | FieldKind::Decimal => Widget::Numeric,
        FieldKind::DateTime => Widget::DateTimeLocal,
        FieldKind::String | FieldKind::Other(_) => Widget::Text,
    }
}

impl Widget {
    pub fn name(&self) -> &'static str {
        match self {
            Widget::Toggle => "toggle",
            Widget::MultiLineText => "textarea",
            Widget::Numeric => "number",
            Widget::DateTimeLocal => "datetime-local",
            Widget::Text => "text",
        }
    }

    /// Render a draft value (absent when the draft has no entry)
    pub fn display(&self, value: Option<&Value>) -> WidgetValue {
        let value = value.filter(|v| !v.is_null());
        match self {
            Widget::Toggle => WidgetValue::Checked(value.map(is_truthy).unwrap_or(false)),
            Widget::MultiLineText => WidgetValue::Text(match value {
                None => String::new(),
                Some(Value::String(s)) => s.clone(),
                Some(other) => serde_json::to_string_pretty(other).unwrap_or_default(),
            }),
            Widget::DateTimeLocal => WidgetValue::Text(match value {
                None => String::new(),
                Some(v) => datetime_local(v),
            }),
            Widget::Numeric | Widget::Text => WidgetValue::Text(match value {
                None => String::new(),
                Some(v) => plain_text(v),
            }),
        }
    }

    /// Turn what the user entered into the value stored in the draft.
    ///
    /// Only a toggle takes a checked state; every other widget holds text.
    pub fn accept(&self, input: WidgetValue) -> Result<Value> {
        match (self, input) {
            (Widget::Toggle, WidgetValue::Checked(checked)) => Ok(Value::Bool(checked)),
            (Widget::Toggle, WidgetValue::Text(raw)) => Ok(self.parse_input(&raw)),
            (_, WidgetValue::Checked(_)) => Err(Error::invalid(format!(
                "a {} input does not take a checked value",
                self.name()
            ))),
            (_, WidgetValue::Text(raw)) => Ok(Value::String(raw)),
        }
    }

    /// Coerce free-form text (command-line input) for this widget
    pub fn parse_input(&self, raw: &str) -> Value {
        match self {
            Widget::Toggle => Value::Bool(matches!(
                raw.trim().to_ascii_lowercase().as_str(),
                "true" | "1" | "yes" | "on" | "y"
            )),
            _ => Value::String(raw.to_string()),
        }
    }
}

fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().map(|f| f != 0.0).unwrap_or(true),
        Value::String(s) => !s.is_empty(),
        Value::Array(_) | Value::Object(_) => true,
    }
}

fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

/// Truncate a stored date-time to minute precision in UTC.
///
/// Strings that don't parse as a date are shown unchanged.
fn datetime_local(value: &Value) -> String {
    let parsed = match value {
        Value::String(s) if s.is_empty() => return String::new(),
        Value::String(s) => parse_datetime(s),
        Value::Number(n) => n.as_i64().and_then(DateTime::<Utc>::from_timestamp_millis),
        _ => None,
    };

    match parsed {
        Some(dt) => dt.format(DATETIME_LOCAL_FORMAT).to_string(),
        None => plain_text(value),
    }
}

fn parse_datetime(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }
    ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%dT%H:%M", "%Y-%m-%d %H:%M:%S"]
        .iter()
        .find_map(|fmt| NaiveDateTime::parse_from_str(s, fmt).ok())
        .map(|naive| naive.and_utc())
}
