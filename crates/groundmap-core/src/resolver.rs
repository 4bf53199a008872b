//! Name resolution for identifiers in external namespaces.
//!
//! The cascade and the report writer only see the [`NameResolver`] trait.
//! Lookups are soft: a missing answer is `None`, never an error.

use crate::bundle::{is_absent_field, IdentifierBundle, UP};
use crate::error::{GroundingError, Result};
use crate::tsv::read_rows;
use parking_lot::Mutex;
use std::collections::HashMap;
use std::fs::File;
use std::io::Read;
use std::path::Path;

pub trait NameResolver {
    /// A preferred name derived from the whole bundle.
    fn preferred_display_name(&self, _db_refs: &IdentifierBundle) -> Option<String> {
        None
    }

    /// Curated display name (e.g. the HGNC symbol for a protein accession).
    fn display_name(&self, namespace: &str, id: &str) -> Option<String>;

    /// Secondary name for the same identifier (e.g. the database gene name).
    fn fallback_display_name(&self, namespace: &str, id: &str) -> Option<String>;

    /// Short mnemonic used in curation reports (e.g. `EGFR_HUMAN`).
    fn mnemonic(&self, namespace: &str, id: &str) -> Option<String>;
}

/// Resolves nothing.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullResolver;

impl NameResolver for NullResolver {
    fn display_name(&self, _namespace: &str, _id: &str) -> Option<String> {
        None
    }

    fn fallback_display_name(&self, _namespace: &str, _id: &str) -> Option<String> {
        None
    }

    fn mnemonic(&self, _namespace: &str, _id: &str) -> Option<String> {
        None
    }
}

// ============================================================================
// File-backed resolver
// ============================================================================

pub const ACCESSION_COLUMNS: usize = 4;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AccessionRecord {
    pub curated_name: Option<String>,
    pub gene_name: Option<String>,
    pub mnemonic: Option<String>,
}

/// Offline names for one namespace, loaded from a tab-separated file:
///
/// ```text
/// accession  curated_name  gene_name  mnemonic
/// P00533     EGFR          EGFR       EGFR_HUMAN
/// ```
///
/// Empty or `None` cells are absent. Identifiers from other namespaces are
/// never resolved.
#[derive(Debug, Clone)]
pub struct AccessionTable {
    namespace: String,
    records: HashMap<String, AccessionRecord>,
}

impl AccessionTable {
    pub fn new(namespace: impl Into<String>) -> Self {
        Self {
            namespace: namespace.into(),
            records: HashMap::new(),
        }
    }

    /// Load a table for the protein accession namespace.
    pub fn load(path: &Path) -> Result<Self> {
        Self::load_for(path, UP)
    }

    pub fn load_for(path: &Path, namespace: &str) -> Result<Self> {
        let file = File::open(path).map_err(|e| GroundingError::io(path, e))?;
        Self::from_reader(file, namespace, &path.display().to_string())
    }

    pub fn from_reader<R: Read>(reader: R, namespace: &str, origin: &str) -> Result<Self> {
        let mut table = Self::new(namespace);
        read_rows(reader, origin, ACCESSION_COLUMNS, |fields, _line| {
            let cell = |i: usize| (!is_absent_field(fields[i])).then(|| fields[i].to_string());
            table.insert(
                fields[0],
                AccessionRecord {
                    curated_name: cell(1),
                    gene_name: cell(2),
                    mnemonic: cell(3),
                },
            );
            Ok(())
        })?;
        tracing::debug!(origin, namespace, records = table.len(), "loaded accession names");
        Ok(table)
    }

    pub fn insert(&mut self, accession: impl Into<String>, record: AccessionRecord) {
        self.records.insert(accession.into(), record);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }

    fn record(&self, namespace: &str, id: &str) -> Option<&AccessionRecord> {
        if namespace != self.namespace {
            return None;
        }
        self.records.get(id)
    }
}

impl NameResolver for AccessionTable {
    fn display_name(&self, namespace: &str, id: &str) -> Option<String> {
        self.record(namespace, id)?.curated_name.clone()
    }

    fn fallback_display_name(&self, namespace: &str, id: &str) -> Option<String> {
        self.record(namespace, id)?.gene_name.clone()
    }

    fn mnemonic(&self, namespace: &str, id: &str) -> Option<String> {
        self.record(namespace, id)?.mnemonic.clone()
    }
}

// ============================================================================
// Memoization
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
enum LookupKind {
    Primary,
    Fallback,
    Mnemonic,
}

type LookupKey = (LookupKind, String, String);

/// Remembers every answer (including misses) of an inner resolver.
pub struct CachedResolver<R> {
    inner: R,
    cache: Mutex<HashMap<LookupKey, Option<String>>>,
}

impl<R: NameResolver> CachedResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    pub fn inner(&self) -> &R {
        &self.inner
    }

    /// Number of distinct lookups answered so far.
    pub fn cached_lookups(&self) -> usize {
        self.cache.lock().len()
    }

    fn cached(
        &self,
        kind: LookupKind,
        namespace: &str,
        id: &str,
        lookup: impl FnOnce(&R) -> Option<String>,
    ) -> Option<String> {
        let key = (kind, namespace.to_string(), id.to_string());
        if let Some(hit) = self.cache.lock().get(&key) {
            return hit.clone();
        }
        // Lock is not held across the inner lookup.
        let answer = lookup(&self.inner);
        self.cache.lock().insert(key, answer.clone());
        answer
    }
}

impl<R: NameResolver> NameResolver for CachedResolver<R> {
    fn preferred_display_name(&self, db_refs: &IdentifierBundle) -> Option<String> {
        self.inner.preferred_display_name(db_refs)
    }

    fn display_name(&self, namespace: &str, id: &str) -> Option<String> {
        self.cached(LookupKind::Primary, namespace, id, |r| {
            r.display_name(namespace, id)
        })
    }

    fn fallback_display_name(&self, namespace: &str, id: &str) -> Option<String> {
        self.cached(LookupKind::Fallback, namespace, id, |r| {
            r.fallback_display_name(namespace, id)
        })
    }

    fn mnemonic(&self, namespace: &str, id: &str) -> Option<String> {
        self.cached(LookupKind::Mnemonic, namespace, id, |r| r.mnemonic(namespace, id))
    }
}
