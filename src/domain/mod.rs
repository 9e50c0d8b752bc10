//! Domain layer: document tree, DID syntax and the TXT wire protocol
//!
//! This layer is independent of external concerns (no I/O, no CLI, no config loading).

pub mod arena;
pub mod did;
pub mod display;
pub mod encoder;
pub mod error;
pub mod json;
pub mod record;
pub mod value;

pub use arena::{DocumentTree, NodeData, TreeNode};
pub use did::{normalize_fqdn, Did};
pub use display::TreeDisplay;
pub use encoder::{encode, encode_with_ttl};
pub use error::{DomainError, DomainResult};
pub use json::{export_json, import_json};
pub use record::{decode_label, encode_label, render_zone, RecordType, RecordValue, ResourceRecord};
pub use value::{Value, ValueKind};
