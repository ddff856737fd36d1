use crate::{Error, Result};

/// AMF0 type markers
pub mod markers {
    pub const NUMBER: u8 = 0x00;
    pub const BOOLEAN: u8 = 0x01;
    pub const STRING: u8 = 0x02;
    pub const OBJECT: u8 = 0x03;
    pub const MOVIE_CLIP: u8 = 0x04; // reserved
    pub const NULL: u8 = 0x05;
    pub const UNDEFINED: u8 = 0x06;
    pub const REFERENCE: u8 = 0x07;
    pub const ECMA_ARRAY: u8 = 0x08;
    pub const OBJECT_END: u8 = 0x09;
    pub const STRICT_ARRAY: u8 = 0x0A;
    pub const DATE: u8 = 0x0B;
    pub const LONG_STRING: u8 = 0x0C;
    pub const UNSUPPORTED: u8 = 0x0D;
    pub const RECORDSET: u8 = 0x0E; // reserved
    pub const XML_DOCUMENT: u8 = 0x0F;
    pub const TYPED_OBJECT: u8 = 0x10;
    pub const AVMPLUS_OBJECT: u8 = 0x11;
}

/// AMF0 value tree, restricted to the types RTMP actually puts on the wire.
///
/// The object-end sentinel (`00 00 09`) is not a value; it is produced and
/// consumed by the Object/EcmaArray codecs only.
#[derive(Debug, Clone, PartialEq)]
pub enum Amf0Value {
    Number(f64),
    Boolean(bool),
    String(String),
    Object(Amf0Object),
    EcmaArray(Amf0EcmaArray),
    StrictArray(Vec<Amf0Value>),
    Null,
    Undefined,
}

/// An AMF0 anonymous object: an ordered list of properties.
///
/// Iteration yields properties in insertion order, and `set` on an existing
/// key replaces the value in place without moving the key.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Amf0Object {
    properties: Vec<(String, Amf0Value)>,
}

impl Amf0Object {
    pub fn new() -> Self {
        Amf0Object {
            properties: Vec::new(),
        }
    }

    /// Get a property value by key
    pub fn get(&self, key: &str) -> Option<&Amf0Value> {
        self.properties
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v)
    }

    /// Set a property, replacing in place if the key already exists
    pub fn set(&mut self, key: impl Into<String>, value: Amf0Value) {
        let key = key.into();
        for prop in self.properties.iter_mut() {
            if prop.0 == key {
                prop.1 = value;
                return;
            }
        }
        self.properties.push((key, value));
    }

    /// Iterate properties in insertion order
    pub fn iter(&self) -> impl Iterator<Item = &(String, Amf0Value)> {
        self.properties.iter()
    }

    pub fn len(&self) -> usize {
        self.properties.len()
    }

    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Serialized size of the property list, without marker or terminator
    pub(crate) fn properties_size(&self) -> usize {
        self.properties
            .iter()
            .map(|(k, v)| 2 + k.len() + v.size())
            .sum()
    }
}

/// An AMF0 ECMA array: an ordered property list plus the advisory
/// element count carried on the wire. The count is not validated against
/// the property list; termination is always by the object-end sentinel.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Amf0EcmaArray {
    pub count: u32,
    pub properties: Amf0Object,
}

impl Amf0EcmaArray {
    pub fn new() -> Self {
        Amf0EcmaArray::default()
    }

    pub fn get(&self, key: &str) -> Option<&Amf0Value> {
        self.properties.get(key)
    }

    pub fn set(&mut self, key: impl Into<String>, value: Amf0Value) {
        self.properties.set(key, value);
    }
}

impl Amf0Value {
    /// The wire marker of this value
    pub fn marker(&self) -> u8 {
        match self {
            Amf0Value::Number(_) => markers::NUMBER,
            Amf0Value::Boolean(_) => markers::BOOLEAN,
            Amf0Value::String(_) => markers::STRING,
            Amf0Value::Object(_) => markers::OBJECT,
            Amf0Value::EcmaArray(_) => markers::ECMA_ARRAY,
            Amf0Value::StrictArray(_) => markers::STRICT_ARRAY,
            Amf0Value::Null => markers::NULL,
            Amf0Value::Undefined => markers::UNDEFINED,
        }
    }

    /// Serialized size in bytes, marker and terminator included
    pub fn size(&self) -> usize {
        match self {
            Amf0Value::Number(_) => 1 + 8,
            Amf0Value::Boolean(_) => 1 + 1,
            Amf0Value::String(s) => 1 + 2 + s.len(),
            Amf0Value::Object(obj) => 1 + obj.properties_size() + 3,
            Amf0Value::EcmaArray(arr) => 1 + 4 + arr.properties.properties_size() + 3,
            Amf0Value::StrictArray(values) => {
                1 + 4 + values.iter().map(|v| v.size()).sum::<usize>()
            }
            Amf0Value::Null | Amf0Value::Undefined => 1,
        }
    }

    /// Extract number value
    pub fn as_number(&self) -> Option<f64> {
        match self {
            Amf0Value::Number(n) => Some(*n),
            _ => None,
        }
    }

    /// Extract string reference
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Amf0Value::String(s) => Some(s.as_str()),
            _ => None,
        }
    }

    /// Extract boolean value
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            Amf0Value::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Extract object reference (Object or EcmaArray)
    pub fn as_object(&self) -> Option<&Amf0Object> {
        match self {
            Amf0Value::Object(obj) => Some(obj),
            Amf0Value::EcmaArray(arr) => Some(&arr.properties),
            _ => None,
        }
    }

    /// Check if null or undefined
    pub fn is_null(&self) -> bool {
        matches!(self, Amf0Value::Null | Amf0Value::Undefined)
    }
}

/// Human-readable marker name, for error messages
pub(crate) fn marker_name(marker: u8) -> &'static str {
    match marker {
        markers::NUMBER => "Number",
        markers::BOOLEAN => "Boolean",
        markers::STRING => "String",
        markers::OBJECT => "Object",
        markers::MOVIE_CLIP => "MovieClip",
        markers::NULL => "Null",
        markers::UNDEFINED => "Undefined",
        markers::REFERENCE => "Reference",
        markers::ECMA_ARRAY => "EcmaArray",
        markers::OBJECT_END => "ObjectEnd",
        markers::STRICT_ARRAY => "StrictArray",
        markers::DATE => "Date",
        markers::LONG_STRING => "LongString",
        markers::UNSUPPORTED => "Unsupported",
        markers::RECORDSET => "RecordSet",
        markers::XML_DOCUMENT => "XmlDocument",
        markers::TYPED_OBJECT => "TypedObject",
        markers::AVMPLUS_OBJECT => "AvmPlusObject",
        _ => "Forbidden",
    }
}

/// Check that a leading marker names a decodable value.
///
/// Reserved markers fail with `IllegalMarker`; markers the format defines
/// but this codec does not implement fail with `Unsupported`.
pub(crate) fn check_marker(marker: u8) -> Result<()> {
    match marker {
        markers::NUMBER
        | markers::BOOLEAN
        | markers::STRING
        | markers::OBJECT
        | markers::NULL
        | markers::UNDEFINED
        | markers::ECMA_ARRAY
        | markers::STRICT_ARRAY => Ok(()),
        markers::REFERENCE
        | markers::DATE
        | markers::LONG_STRING
        | markers::UNSUPPORTED
        | markers::XML_DOCUMENT
        | markers::TYPED_OBJECT
        | markers::AVMPLUS_OBJECT => Err(Error::unsupported(format!(
            "{} is not supported",
            marker_name(marker)
        ))),
        _ => Err(Error::illegal_marker(format!(
            "marker {} ({}) is illegal",
            marker,
            marker_name(marker)
        ))),
    }
}
