//! DID resolution service
//!
//! Rebuilds a document tree by walking the TXT records published under
//! `_did.<fqdn>`.

use std::sync::Arc;

use generational_arena::Index;
use tracing::{debug, info, instrument};

use crate::application::{ApplicationResult, IoResultExt};
use crate::domain::{
    decode_label, Did, DocumentTree, DomainError, RecordType, RecordValue, Value,
};
use crate::infrastructure::traits::TxtLookup;

/// Service resolving `did:dnssec` identifiers through a [`TxtLookup`].
pub struct DidResolver {
    lookup: Arc<dyn TxtLookup>,
}

impl DidResolver {
    /// Create a new resolver on top of a TXT lookup.
    pub fn new(lookup: Arc<dyn TxtLookup>) -> Self {
        Self { lookup }
    }

    /// Resolve a DID into its document tree.
    ///
    /// The DID is validated before any lookup is made. The first lookup
    /// error or record violation aborts the whole resolution.
    #[instrument(level = "debug", skip(self))]
    pub fn resolve(&self, did: &str) -> ApplicationResult<DocumentTree> {
        let did: Did = did.parse()?;
        self.resolve_did(&did)
    }

    /// Resolve an already validated DID.
    pub fn resolve_did(&self, did: &Did) -> ApplicationResult<DocumentTree> {
        let mut tree = DocumentTree::new();
        self.resolve_node(&mut tree, None, &did.root_name())?;
        info!("resolving done: {} ({} nodes)", did, tree.len());
        Ok(tree)
    }

    /// Looks up `name`, inserts the node it describes below `parent` and
    /// descends into its children.
    fn resolve_node(
        &self,
        tree: &mut DocumentTree,
        parent: Option<(Index, &str)>,
        name: &str,
    ) -> ApplicationResult<()> {
        debug!("resolving {}...", name);
        let record = self.fetch_record(name)?;

        match record.kind {
            RecordType::MapPointer => {
                let idx = insert(tree, parent, Value::Map)?;
                for label in &record.values {
                    let key = decode_label(label)?;
                    self.resolve_node(tree, Some((idx, key.as_str())), &format!("{label}.{name}"))?;
                }
            }
            RecordType::ArrayPointer => {
                let len = record.array_len()?;
                let idx = insert(tree, parent, Value::Array)?;
                for i in 0..len {
                    let key = i.to_string();
                    self.resolve_node(tree, Some((idx, key.as_str())), &format!("{i}.{name}"))?;
                }
            }
            RecordType::Primitive => {
                insert(tree, parent, record.primitive_value()?)?;
            }
        }
        Ok(())
    }

    /// First TXT entry at `name` that parses as a record value.
    fn fetch_record(&self, name: &str) -> ApplicationResult<RecordValue> {
        let entries = self.lookup.lookup_txt(name).with_lookup_context(name)?;
        entries
            .iter()
            .find_map(|entry| match entry.parse::<RecordValue>() {
                Ok(record) => Some(record),
                Err(e) => {
                    debug!("skipping TXT entry at {}: {}", name, e);
                    None
                }
            })
            .ok_or_else(|| DomainError::NoValidRecord(name.to_string()).into())
    }
}

fn insert(
    tree: &mut DocumentTree,
    parent: Option<(Index, &str)>,
    value: Value,
) -> ApplicationResult<Index> {
    match parent {
        None => Ok(tree.insert_root(value)),
        Some((idx, key)) => Ok(tree.add_child(idx, key, value)?),
    }
}
