//! Statements and the agents embedded in them.
//!
//! The normalization passes only need to enumerate a statement's agent slots
//! and read its first evidence sentence; that contract is [`AgentStatement`].
//! [`Statement`] is the JSON record the CLI reads and writes.

use crate::bundle::IdentifierBundle;
use crate::error::{GroundingError, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// A named entity mention.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Agent {
    pub name: String,
    #[serde(default)]
    pub db_refs: IdentifierBundle,
}

impl Agent {
    pub fn new(name: impl Into<String>, db_refs: IdentifierBundle) -> Self {
        Self {
            name: name.into(),
            db_refs,
        }
    }

    /// An agent as the reader emits it: named by, and grounded only to, its text.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        Self {
            db_refs: IdentifierBundle::from_text(text.clone()),
            name: text,
        }
    }

    pub fn text(&self) -> Option<&str> {
        self.db_refs.text()
    }
}

/// Supporting evidence for a statement.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evidence {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source_api: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pmid: Option<String>,
}

impl Evidence {
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: Some(text.into()),
            ..Default::default()
        }
    }
}

/// What the normalization passes need from a statement.
///
/// Agent slots may be empty (`None`), e.g. a complex missing a member or a
/// modification with no enzyme.
pub trait AgentStatement: Clone {
    fn agent_list(&self) -> &[Option<Agent>];

    fn agent_list_mut(&mut self) -> &mut [Option<Agent>];

    /// Text of the first evidence item, if any.
    fn evidence_text(&self) -> Option<&str>;

    /// Present agents, in slot order.
    fn agents(&self) -> std::iter::Flatten<std::slice::Iter<'_, Option<Agent>>> {
        self.agent_list().iter().flatten()
    }

    fn agents_mut(&mut self) -> std::iter::Flatten<std::slice::IterMut<'_, Option<Agent>>> {
        self.agent_list_mut().iter_mut().flatten()
    }
}

/// A statement record as exchanged in JSON statement files.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statement {
    #[serde(rename = "type")]
    pub stmt_type: String,
    #[serde(default)]
    pub agents: Vec<Option<Agent>>,
    #[serde(default)]
    pub evidence: Vec<Evidence>,
}

impl Statement {
    pub fn new(stmt_type: impl Into<String>, agents: Vec<Option<Agent>>) -> Self {
        Self {
            stmt_type: stmt_type.into(),
            agents,
            evidence: Vec::new(),
        }
    }

    pub fn with_evidence(mut self, evidence: Evidence) -> Self {
        self.evidence.push(evidence);
        self
    }
}

impl AgentStatement for Statement {
    fn agent_list(&self) -> &[Option<Agent>] {
        &self.agents
    }

    fn agent_list_mut(&mut self) -> &mut [Option<Agent>] {
        &mut self.agents
    }

    fn evidence_text(&self) -> Option<&str> {
        self.evidence.first().and_then(|ev| ev.text.as_deref())
    }
}

/// Read a JSON array of statements.
pub fn load_statements(path: &Path) -> Result<Vec<Statement>> {
    let text = fs::read_to_string(path).map_err(|e| GroundingError::io(path, e))?;
    serde_json::from_str(&text).map_err(|e| GroundingError::json(path.display().to_string(), e))
}

/// Write statements as a pretty-printed JSON array, replacing `path`.
pub fn save_statements(path: &Path, statements: &[Statement]) -> Result<()> {
    let json = serde_json::to_string_pretty(statements)
        .map_err(|e| GroundingError::json(path.display().to_string(), e))?;
    fs::write(path, json).map_err(|e| GroundingError::io(path, e))
}
