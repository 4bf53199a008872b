//! Curation report writer.
//!
//! One tab-separated line per (raw text, namespace, identifier, count) with a
//! trailing mnemonic column:
//!
//! ```text
//! ROS  None  None     2
//! ROS  UP    P00533   1  EGFR_HUMAN
//! ```
//!
//! Fields are written unquoted; tabs and line breaks inside a value become
//! spaces so every line keeps five columns.

use crate::aggregate::CurationEntry;
use crate::bundle::{NONE_PLACEHOLDER, UP};
use crate::error::{GroundingError, Result};
use crate::resolver::NameResolver;
use std::borrow::Cow;
use std::fs::File;
use std::io::Write;
use std::path::Path;

/// Write `entries` to `path`, replacing any existing file.
///
/// Mnemonics are looked up only for `UP` identifiers.
pub fn write_curation_report(
    path: &Path,
    entries: &[CurationEntry],
    resolver: &dyn NameResolver,
) -> Result<()> {
    write_curation_report_for(path, entries, resolver, UP)
}

/// Like [`write_curation_report`], resolving mnemonics for `mnemonic_namespace`.
pub fn write_curation_report_for(
    path: &Path,
    entries: &[CurationEntry],
    resolver: &dyn NameResolver,
    mnemonic_namespace: &str,
) -> Result<()> {
    let file = File::create(path).map_err(|e| GroundingError::io(path, e))?;
    write_curation_report_to(file, entries, resolver, mnemonic_namespace)
        .map_err(|e| relabel(e, &path.display().to_string()))?;
    tracing::debug!(path = %path.display(), entries = entries.len(), "wrote curation report");
    Ok(())
}

/// Write `entries` to any writer, resolving mnemonics for `mnemonic_namespace`.
pub fn write_curation_report_to<W: Write>(
    writer: W,
    entries: &[CurationEntry],
    resolver: &dyn NameResolver,
    mnemonic_namespace: &str,
) -> Result<()> {
    let mut wtr = csv::WriterBuilder::new()
        .delimiter(b'\t')
        .has_headers(false)
        .quote_style(csv::QuoteStyle::Never)
        .from_writer(writer);

    for entry in entries {
        for grounding in &entry.groundings {
            let mnemonic = match (grounding.namespace.as_deref(), grounding.identifier.as_deref()) {
                (Some(ns), Some(id)) if ns == mnemonic_namespace => {
                    resolver.mnemonic(ns, id).unwrap_or_default()
                }
                _ => String::new(),
            };
            let count = grounding.count.to_string();
            let row = [
                field(&entry.text),
                field(grounding.namespace.as_deref().unwrap_or(NONE_PLACEHOLDER)),
                field(grounding.identifier.as_deref().unwrap_or(NONE_PLACEHOLDER)),
                Cow::Borrowed(count.as_str()),
                field(&mnemonic),
            ];
            wtr.write_record(row.iter().map(|value| value.as_bytes()))
                .map_err(|e| GroundingError::csv("<report>", e))?;
        }
    }

    wtr.flush().map_err(|e| GroundingError::io("<report>", e))?;
    Ok(())
}

fn field(value: &str) -> Cow<'_, str> {
    if value.contains(['\t', '\n', '\r']) {
        Cow::Owned(value.replace(['\t', '\n', '\r'], " "))
    } else {
        Cow::Borrowed(value)
    }
}

fn relabel(err: GroundingError, origin: &str) -> GroundingError {
    match err {
        GroundingError::Csv { source, .. } => GroundingError::csv(origin, source),
        GroundingError::Io { source, .. } => GroundingError::io(origin, source),
        other => other,
    }
}
