//! Publish JSON DID documents as DNS TXT records and resolve them back.
//!
//! A document is imported into an arena-backed [`DocumentTree`], encoded as
//! one TXT record per node under `_did.<base>` and, on the way back, rebuilt
//! by recursive TXT lookups starting at the root record of a
//! `did:dnssec:<fqdn>` identifier.
//!
//! ```ignore
//! let tree = did_dnssec::import_json(br#"{"id": "did:dnssec:example.com"}"#)?;
//! let zone = did_dnssec::render_zone(&did_dnssec::encode(&tree, "example.com."));
//!
//! let lookup = did_dnssec::ZoneTxtLookup::parse(&zone)?;
//! let resolver = did_dnssec::DidResolver::new(std::sync::Arc::new(lookup));
//! let resolved = resolver.resolve("did:dnssec:example.com")?;
//! assert!(resolved.same_structure(&tree));
//! ```

pub mod application;
pub mod cli;
pub mod config;
pub mod domain;
pub mod exitcode;
pub mod infrastructure;
pub mod util;

pub use application::services::{DidResolver, DocumentService};
pub use config::Settings;
pub use domain::{
    encode, encode_with_ttl, export_json, import_json, render_zone, Did, DocumentTree, NodeData,
    RecordType, RecordValue, ResourceRecord, Value, ValueKind,
};
pub use infrastructure::traits::TxtLookup;
pub use infrastructure::{DnsTxtLookup, ZoneTxtLookup};
