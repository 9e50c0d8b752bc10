//! Domain-level errors (no I/O concerns)

use thiserror::Error;

use crate::domain::ValueKind;

/// Domain errors represent malformed input, tree invariant violations and
/// wire protocol violations.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid did syntax: {did}: {reason}")]
    InvalidDid { did: String, reason: String },

    #[error("invalid domain name: {name}: {reason}")]
    InvalidDomainName { name: String, reason: String },

    #[error("invalid JSON document: {0}")]
    Json(#[from] serde_json::Error),

    #[error("document must be a JSON object, got {0}")]
    NotAnObject(String),

    #[error("invalid primitive type; value = {0}")]
    InvalidPrimitive(String),

    #[error("integer out of range: {0}")]
    IntegerOutOfRange(String),

    #[error("invalid node type; type = {0}")]
    InvalidNodeType(ValueKind),

    #[error("document tree is empty")]
    EmptyTree,

    #[error("cannot add child {key:?} to scalar node of type {kind}")]
    ScalarParent { key: String, kind: ValueKind },

    #[error("duplicate key {0:?} in map node")]
    DuplicateKey(String),

    #[error("node not found in document tree")]
    NodeNotFound,

    #[error("float is not finite: {0}")]
    NonFiniteFloat(f64),

    #[error("invalid record value: {value}: {reason}")]
    InvalidRecordValue { value: String, reason: String },

    #[error("invalid zone line: {line}: {reason}")]
    InvalidZoneLine { line: String, reason: String },

    #[error("no valid record found at {0}")]
    NoValidRecord(String),

    #[error("got multiple values for {kind} type; values = {values:?}")]
    MultipleValues {
        kind: &'static str,
        values: Vec<String>,
    },

    #[error("invalid primitive type; got = {0}")]
    InvalidPrimitiveType(String),

    #[error("invalid {kind} value {payload:?}: {reason}")]
    InvalidPrimitiveValue {
        kind: ValueKind,
        payload: String,
        reason: String,
    },

    #[error("invalid array length {value:?}: {reason}")]
    InvalidArrayLength { value: String, reason: String },

    #[error("invalid key label {label:?}: {reason}")]
    InvalidKeyLabel { label: String, reason: String },
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
