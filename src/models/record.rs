//! Flattened result records.
//!
//! Rally returns each object as a JSON object whose fields mix scalars,
//! nulls, embedded references (`{"_ref": ".../Iteration/12345.js", ...}`)
//! and arrays of references. A [`Record`] collapses all of these into plain
//! strings while keeping the field order of the response.

use serde::ser::{Serialize, SerializeMap, Serializer};
use serde_json::{Map, Value};

/// Marker field identifying an embedded reference object.
pub const REF_FIELD: &str = "_ref";

/// Scalar values are cut to this many characters.
pub const MAX_VALUE_CHARS: usize = 255;

/// The flattened value of one field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FieldValue {
    /// The source value was JSON `null`.
    Empty,
    /// A scalar rendered as a string, at most [`MAX_VALUE_CHARS`] characters.
    Text(String),
    /// Identifier of a single referenced object.
    Reference(String),
    /// Identifiers of referenced objects, in source order.
    References(Vec<String>),
}

impl FieldValue {
    /// The value as a single string, if it is not a reference list.
    ///
    /// `Empty` reads as `""`.
    pub fn as_str(&self) -> Option<&str> {
        match self {
            FieldValue::Empty => Some(""),
            FieldValue::Text(s) | FieldValue::Reference(s) => Some(s),
            FieldValue::References(_) => None,
        }
    }

    /// The reference identifiers, if this is a reference list.
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            FieldValue::References(ids) => Some(ids),
            _ => None,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Empty => Ok(()),
            FieldValue::Text(s) | FieldValue::Reference(s) => f.write_str(s),
            FieldValue::References(ids) => f.write_str(&ids.join(", ")),
        }
    }
}

impl Serialize for FieldValue {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            FieldValue::Empty => serializer.serialize_str(""),
            FieldValue::Text(s) | FieldValue::Reference(s) => serializer.serialize_str(s),
            FieldValue::References(ids) => ids.serialize(serializer),
        }
    }
}

/// One flattened result item: field names mapped to values, in the order
/// the fields appeared in the response.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Record {
    fields: Vec<(String, FieldValue)>,
}

impl Record {
    /// Flatten one result object.
    ///
    /// Nested objects without a `_ref` marker produce no field at all.
    /// Array elements without a marker are skipped.
    pub fn from_json_object(object: &Map<String, Value>) -> Self {
        let fields = object
            .iter()
            .filter_map(|(name, value)| flatten_value(value).map(|v| (name.clone(), v)))
            .collect();

        Self { fields }
    }

    /// Look up a field by name.
    pub fn get(&self, name: &str) -> Option<&FieldValue> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, value)| value)
    }

    /// Field names in order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.fields.iter().map(|(name, _)| name.as_str())
    }

    /// Fields in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &FieldValue)> {
        self.fields.iter().map(|(name, value)| (name.as_str(), value))
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl FromIterator<(String, FieldValue)> for Record {
    fn from_iter<I: IntoIterator<Item = (String, FieldValue)>>(iter: I) -> Self {
        Self {
            fields: iter.into_iter().collect(),
        }
    }
}

impl Serialize for Record {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.fields.len()))?;
        for (name, value) in &self.fields {
            map.serialize_entry(name, value)?;
        }
        map.end()
    }
}

fn flatten_value(value: &Value) -> Option<FieldValue> {
    match value {
        Value::Object(object) => object_reference(object).map(FieldValue::Reference),
        Value::Array(items) => Some(FieldValue::References(
            items
                .iter()
                .filter_map(|item| item.as_object().and_then(object_reference))
                .collect(),
        )),
        Value::Null => Some(FieldValue::Empty),
        Value::String(s) => Some(FieldValue::Text(truncate(s))),
        Value::Bool(_) | Value::Number(_) => Some(FieldValue::Text(truncate(&value.to_string()))),
    }
}

fn object_reference(object: &Map<String, Value>) -> Option<String> {
    object
        .get(REF_FIELD)
        .and_then(Value::as_str)
        .map(|url| reference_id(url).to_string())
}

/// Extract the identifier from a reference URL: the text between the last
/// `/` and the last `.js`.
///
/// ```
/// use rallyapi::reference_id;
///
/// assert_eq!(
///     reference_id("https://rally1.rallydev.com/slm/webservice/1.39/iteration/12345.js"),
///     "12345"
/// );
/// ```
pub fn reference_id(url: &str) -> &str {
    let tail = match url.rfind('/') {
        Some(slash) => &url[slash + 1..],
        None => url,
    };

    match tail.rfind(".js") {
        Some(end) => &tail[..end],
        None => tail,
    }
}

fn truncate(s: &str) -> String {
    match s.char_indices().nth(MAX_VALUE_CHARS) {
        Some((cut, _)) => s[..cut].to_string(),
        None => s.to_string(),
    }
}
