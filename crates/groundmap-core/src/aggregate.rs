//! Corpus statistics for curating the grounding table.
//!
//! The typical loop: aggregate a large reading output by raw text, drop the
//! texts the table already covers, write a curation report, and have an
//! analyst add rows for the frequent ungrounded or inconsistently grounded
//! texts.

use crate::bundle::IdentifierBundle;
use crate::statement::{Agent, AgentStatement};
use crate::table::GroundingTable;
use serde::Serialize;
use std::collections::BTreeMap;

/// How often one (namespace, identifier) pair was seen for a raw text.
///
/// Both sides are `None` for ungrounded occurrences.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroundingCount {
    pub namespace: Option<String>,
    pub identifier: Option<String>,
    pub count: usize,
}

impl GroundingCount {
    pub fn ungrounded(count: usize) -> Self {
        Self {
            namespace: None,
            identifier: None,
            count,
        }
    }

    pub fn grounded(namespace: &str, identifier: &str, count: usize) -> Self {
        Self {
            namespace: Some(namespace.to_string()),
            identifier: Some(identifier.to_string()),
            count,
        }
    }
}

/// Everything observed for one raw text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CurationEntry {
    pub text: String,
    /// Sorted by descending count.
    pub groundings: Vec<GroundingCount>,
    /// Number of agents carrying this raw text.
    pub total: usize,
}

/// Every present agent, in statement order then slot order.
pub fn all_agents<S: AgentStatement>(stmts: &[S]) -> Vec<&Agent> {
    stmts.iter().flat_map(|stmt| stmt.agents()).collect()
}

/// The raw text of each agent, `None` where it has none.
pub fn agent_texts<'a>(agents: &[&'a Agent]) -> Vec<Option<&'a str>> {
    agents.iter().map(|agent| agent.text()).collect()
}

/// Group agents by raw text and count the exact bundles seen for each.
///
/// A bundle contributes one [`GroundingCount`] per non-text pair (all sharing
/// the bundle's count), or a single ungrounded count if it holds only the text.
/// Agents without raw text are skipped. Entries are ordered by descending
/// total; equal totals fall back to raw-text order.
pub fn aggregate_by_text<S: AgentStatement>(stmts: &[S]) -> Vec<CurationEntry> {
    let mut by_text: BTreeMap<&str, BTreeMap<&IdentifierBundle, usize>> = BTreeMap::new();
    for agent in stmts.iter().flat_map(|stmt| stmt.agents()) {
        let Some(text) = agent.text() else {
            continue;
        };
        *by_text
            .entry(text)
            .or_default()
            .entry(&agent.db_refs)
            .or_insert(0) += 1;
    }

    let mut grouped_by_text: Vec<CurationEntry> = by_text
        .into_iter()
        .map(|(text, bundles)| {
            let mut total = 0;
            let mut groundings = Vec::new();
            for (db_refs, count) in bundles {
                if db_refs.is_ungrounded() {
                    groundings.push(GroundingCount::ungrounded(count));
                }
                for (db, id) in db_refs.groundings() {
                    groundings.push(GroundingCount::grounded(db, id, count));
                }
                total += count;
            }
            groundings.sort_by(|a, b| b.count.cmp(&a.count));
            CurationEntry {
                text: text.to_string(),
                groundings,
                total,
            }
        })
        .collect();

    grouped_by_text.sort_by(|a, b| b.total.cmp(&a.total));
    grouped_by_text
}

/// Raw texts of ungrounded agents with their mention counts, most frequent first.
pub fn ungrounded_texts<S: AgentStatement>(stmts: &[S]) -> Vec<(String, usize)> {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for agent in stmts.iter().flat_map(|stmt| stmt.agents()) {
        if !agent.db_refs.is_ungrounded() {
            continue;
        }
        if let Some(text) = agent.text() {
            *counts.entry(text).or_insert(0) += 1;
        }
    }

    let mut ranked: Vec<(String, usize)> = counts
        .into_iter()
        .map(|(text, count)| (text.to_string(), count))
        .collect();
    ranked.sort_by(|a, b| b.1.cmp(&a.1));
    ranked
}

/// First-evidence sentences of statements mentioning `text`, once per matching agent.
pub fn sentences_for_text<'a, S: AgentStatement>(text: &str, stmts: &'a [S]) -> Vec<&'a str> {
    let mut sentences = Vec::new();
    for stmt in stmts {
        for agent in stmt.agents() {
            if agent.text() != Some(text) {
                continue;
            }
            if let Some(sentence) = stmt.evidence_text() {
                sentences.push(sentence);
            }
        }
    }
    sentences
}

/// Keep only the entries whose raw text the table does not cover yet.
pub fn uncovered_entries(
    entries: Vec<CurationEntry>,
    table: &GroundingTable,
) -> Vec<CurationEntry> {
    entries
        .into_iter()
        .filter(|entry| !table.contains(&entry.text))
        .collect()
}
