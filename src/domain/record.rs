//! TXT wire format of did:dnssec records.
//!
//! Every record carries a payload of the form
//!
//! ```text
//! v=did:dnssec; t=<type>; d=<data>
//! ```
//!
//! where
//!
//!    `type` is `m` for a map pointer, `a` for an array pointer and `p` for a
//! primitive.
//!    `data` is the comma separated list of base64 encoded child keys for a
//! map, the decimal child count for an array, or `<kind>=<payload>` for a
//! primitive. String payloads are URL-safe base64 without padding, all other
//! payloads are their plain text rendering.

use std::fmt;
use std::str::FromStr;

use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use itertools::Itertools;

use crate::domain::error::{DomainError, DomainResult};
use crate::domain::{Value, ValueKind};

pub const VERSION: &str = "did:dnssec";
pub const CLASS_IN: &str = "IN";
pub const TYPE_TXT: &str = "TXT";
pub const DEFAULT_TTL: u32 = 3600;

/// Maximum length of a single DNS character-string.
const MAX_CHARACTER_STRING: usize = 255;

/// Encodes a map key as a DNS label.
pub fn encode_label(key: &str) -> String {
    URL_SAFE_NO_PAD.encode(key.as_bytes())
}

/// Decodes a DNS label produced by [`encode_label`] back into the key text.
pub fn decode_label(label: &str) -> DomainResult<String> {
    let bytes = URL_SAFE_NO_PAD
        .decode(label)
        .map_err(|e| DomainError::InvalidKeyLabel {
            label: label.to_string(),
            reason: e.to_string(),
        })?;
    String::from_utf8(bytes).map_err(|e| DomainError::InvalidKeyLabel {
        label: label.to_string(),
        reason: e.to_string(),
    })
}

/// The three record kinds of the protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RecordType {
    MapPointer,
    ArrayPointer,
    Primitive,
}

impl RecordType {
    pub fn tag(&self) -> &'static str {
        match self {
            RecordType::MapPointer => "m",
            RecordType::ArrayPointer => "a",
            RecordType::Primitive => "p",
        }
    }

    fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "m" => Some(RecordType::MapPointer),
            "a" => Some(RecordType::ArrayPointer),
            "p" => Some(RecordType::Primitive),
            _ => None,
        }
    }
}

/// Parsed TXT payload: the record type and its value list.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordValue {
    pub kind: RecordType,
    pub values: Vec<String>,
}

impl RecordValue {
    /// Map pointer listing the base64 labels of `keys`.
    pub fn map<'a>(keys: impl IntoIterator<Item = &'a str>) -> Self {
        Self {
            kind: RecordType::MapPointer,
            values: keys.into_iter().map(encode_label).collect(),
        }
    }

    pub fn array(len: usize) -> Self {
        Self {
            kind: RecordType::ArrayPointer,
            values: vec![len.to_string()],
        }
    }

    /// Primitive record `<kind>=<payload>`; the payload is taken verbatim.
    fn primitive(kind: ValueKind, payload: &str) -> Self {
        Self {
            kind: RecordType::Primitive,
            values: vec![format!("{kind}={payload}")],
        }
    }

    /// Primitive record for a scalar value, None for containers.
    ///
    /// Strings are base64 encoded, other scalars use their text rendering.
    pub fn scalar(value: &Value) -> Option<Self> {
        match value {
            Value::String(s) => Some(Self::primitive(ValueKind::String, &encode_label(s))),
            Value::Int(_) | Value::Float(_) | Value::Bool(_) => {
                Some(Self::primitive(value.kind(), &value.as_string()))
            }
            Value::Array | Value::Map => None,
        }
    }

    /// Child count of an array pointer.
    pub fn array_len(&self) -> DomainResult<usize> {
        let value = self.single("array")?;
        value
            .parse()
            .map_err(|e: std::num::ParseIntError| DomainError::InvalidArrayLength {
                value: value.to_string(),
                reason: e.to_string(),
            })
    }

    /// Decodes the scalar carried by a primitive record.
    pub fn primitive_value(&self) -> DomainResult<Value> {
        let entry = self.single("primitive")?;
        let parts: Vec<&str> = entry.split('=').collect();
        let [kind, payload] = parts[..] else {
            return Err(DomainError::InvalidRecordValue {
                value: entry.to_string(),
                reason: "primitive must be <kind>=<payload>".to_string(),
            });
        };
        let kind: ValueKind = kind.parse().map_err(DomainError::InvalidPrimitiveType)?;

        let invalid = |reason: String| DomainError::InvalidPrimitiveValue {
            kind,
            payload: payload.to_string(),
            reason,
        };
        match kind {
            ValueKind::String => {
                let bytes = URL_SAFE_NO_PAD
                    .decode(payload)
                    .map_err(|e| invalid(e.to_string()))?;
                let text = String::from_utf8(bytes).map_err(|e| invalid(e.to_string()))?;
                Ok(Value::String(text))
            }
            ValueKind::Int => payload
                .parse()
                .map(Value::Int)
                .map_err(|e: std::num::ParseIntError| invalid(e.to_string())),
            ValueKind::Float => {
                let f: f64 = payload
                    .parse()
                    .map_err(|e: std::num::ParseFloatError| invalid(e.to_string()))?;
                if !f.is_finite() {
                    return Err(invalid("not a finite number".to_string()));
                }
                Ok(Value::Float(f))
            }
            ValueKind::Bool => payload
                .parse()
                .map(Value::Bool)
                .map_err(|e: std::str::ParseBoolError| invalid(e.to_string())),
            ValueKind::Array | ValueKind::Map => {
                Err(DomainError::InvalidPrimitiveType(kind.to_string()))
            }
        }
    }

    fn single(&self, kind: &'static str) -> DomainResult<&str> {
        match self.values.as_slice() {
            [value] => Ok(value),
            values => Err(DomainError::MultipleValues {
                kind,
                values: values.to_vec(),
            }),
        }
    }
}

impl fmt::Display for RecordValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "v={}; t={}; d={}",
            VERSION,
            self.kind.tag(),
            self.values.iter().join(",")
        )
    }
}

impl FromStr for RecordValue {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let cleaned: String = s
            .trim()
            .trim_matches('"')
            .trim_matches('\'')
            .trim()
            .chars()
            .filter(|c| *c != ' ' && *c != '\t')
            .collect();
        let invalid = |reason: String| DomainError::InvalidRecordValue {
            value: cleaned.clone(),
            reason,
        };

        let mut version = None;
        let mut tag = None;
        let mut data = None;
        for pair in cleaned.split(';') {
            let parts: Vec<&str> = pair.split('=').collect();
            let (key, value) = match parts[..] {
                [key, value] => (key, value.to_string()),
                [key, kind, payload] => (key, format!("{kind}={payload}")),
                _ => return Err(invalid(format!("malformed pair {pair:?}"))),
            };
            match key {
                "v" => version = Some(value),
                "t" => tag = Some(value),
                "d" => data = Some(value),
                _ => {}
            }
        }

        if version.as_deref() != Some(VERSION) {
            return Err(invalid(format!("invalid record version {version:?}")));
        }
        let data = data
            .filter(|d| !d.is_empty())
            .ok_or_else(|| invalid("empty record data".to_string()))?;
        let tag = tag.unwrap_or_default();
        let kind = RecordType::from_tag(&tag)
            .ok_or_else(|| invalid(format!("invalid value type {tag:?}, expected p, a or m")))?;

        let values = match kind {
            RecordType::MapPointer | RecordType::ArrayPointer => {
                data.split(',').map(str::to_string).collect()
            }
            RecordType::Primitive => vec![data],
        };
        Ok(Self { kind, values })
    }
}

/// A TXT resource record of the published zone.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResourceRecord {
    pub name: String,
    pub class: String,
    pub rtype: String,
    pub ttl: u32,
    /// Unquoted TXT text
    pub text: String,
}

impl ResourceRecord {
    pub fn txt(name: impl Into<String>, ttl: u32, value: &RecordValue) -> Self {
        Self {
            name: name.into(),
            class: CLASS_IN.to_string(),
            rtype: TYPE_TXT.to_string(),
            ttl,
            text: value.to_string(),
        }
    }

    /// Quoted zone-file rendering of the text, split into 255 byte
    /// character-strings.
    pub fn data(&self) -> String {
        let mut chunks = Vec::new();
        let mut current = String::new();
        for c in self.text.chars() {
            let escaped = matches!(c, '"' | '\\');
            let width = c.len_utf8() + usize::from(escaped);
            if current.len() + width > MAX_CHARACTER_STRING {
                chunks.push(std::mem::take(&mut current));
            }
            if escaped {
                current.push('\\');
            }
            current.push(c);
        }
        chunks.push(current);
        chunks.iter().map(|chunk| format!("\"{chunk}\"")).join(" ")
    }

    pub fn is_txt(&self) -> bool {
        self.class.eq_ignore_ascii_case(CLASS_IN) && self.rtype.eq_ignore_ascii_case(TYPE_TXT)
    }
}

impl fmt::Display for ResourceRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{}\t{}\t{}\t{}\t{}",
            self.name,
            self.class,
            self.ttl,
            self.rtype,
            self.data()
        )
    }
}

impl FromStr for ResourceRecord {
    type Err = DomainError;

    /// Parses a zone line `NAME CLASS TTL TYPE DATA`, fields separated by
    /// tabs or spaces.
    fn from_str(line: &str) -> Result<Self, Self::Err> {
        let invalid = |reason: &str| DomainError::InvalidZoneLine {
            line: line.to_string(),
            reason: reason.to_string(),
        };

        let mut rest = line.trim();
        let mut fields = Vec::with_capacity(4);
        for _ in 0..4 {
            let end = rest
                .find(char::is_whitespace)
                .ok_or_else(|| invalid("expected NAME CLASS TTL TYPE DATA"))?;
            fields.push(&rest[..end]);
            rest = rest[end..].trim_start();
        }
        let ttl = fields[2].parse().map_err(|_| invalid("invalid ttl"))?;
        let text = parse_character_strings(rest).map_err(invalid)?;

        Ok(Self {
            name: fields[0].to_string(),
            class: fields[1].to_string(),
            rtype: fields[3].to_string(),
            ttl,
            text,
        })
    }
}

/// Joins the character-strings of a TXT data field.
///
/// Accepts quoted strings with backslash escapes, or a single bare word.
fn parse_character_strings(data: &str) -> Result<String, &'static str> {
    let data = data.trim();
    if data.is_empty() {
        return Err("missing data");
    }
    if !data.starts_with('"') {
        return Ok(data.to_string());
    }

    let mut text = String::new();
    let mut chars = data.chars();
    loop {
        match chars.next() {
            None => return Ok(text),
            Some(c) if c.is_whitespace() => continue,
            Some('"') => loop {
                match chars.next() {
                    Some('\\') => text.push(chars.next().ok_or("dangling escape")?),
                    Some('"') => break,
                    Some(c) => text.push(c),
                    None => return Err("unterminated string"),
                }
            },
            Some(_) => return Err("data must be quoted strings"),
        }
    }
}

/// Renders records as zone-file lines, one per record.
pub fn render_zone(records: &[ResourceRecord]) -> String {
    records.iter().map(|rr| format!("{rr}\n")).collect()
}
