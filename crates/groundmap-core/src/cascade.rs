//! Name cascade: choose a display name for each agent.
//!
//! Strategies are tried in order and the first one to produce a name wins:
//!
//! 1. the preferred-name namespace (`INDRA`) used verbatim
//! 2. the resolver's curated name for the primary namespace (`UP`)
//! 3. the resolver's fallback name for the same identifier
//!
//! When all of them come up empty the agent keeps its name.

use crate::bundle::{IdentifierBundle, INDRA, UP};
use crate::resolver::NameResolver;
use crate::statement::AgentStatement;
use std::fmt;

/// Terminal state of one agent in one cascade pass.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Resolution {
    Preferred,
    Primary,
    Fallback,
    Unresolved,
}

impl fmt::Display for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Resolution::Preferred => "preferred",
            Resolution::Primary => "primary",
            Resolution::Fallback => "fallback",
            Resolution::Unresolved => "unresolved",
        };
        f.write_str(s)
    }
}

/// One step of the cascade.
pub trait NameStrategy {
    /// The state an agent ends in when this strategy answers.
    fn resolution(&self) -> Resolution;

    fn resolve(&self, db_refs: &IdentifierBundle, resolver: &dyn NameResolver) -> Option<String>;
}

fn non_empty(id: Option<&str>) -> Option<&str> {
    id.filter(|s| !s.is_empty())
}

/// Use the identifier in `namespace` as the name, without consulting the resolver
/// unless the namespace is missing.
pub struct PreferredName {
    pub namespace: String,
}

impl NameStrategy for PreferredName {
    fn resolution(&self) -> Resolution {
        Resolution::Preferred
    }

    fn resolve(&self, db_refs: &IdentifierBundle, resolver: &dyn NameResolver) -> Option<String> {
        match non_empty(db_refs.get(&self.namespace)) {
            Some(name) => Some(name.to_string()),
            None => resolver.preferred_display_name(db_refs),
        }
    }
}

/// Ask the resolver for the curated name of the identifier in `namespace`.
pub struct CuratedName {
    pub namespace: String,
}

impl NameStrategy for CuratedName {
    fn resolution(&self) -> Resolution {
        Resolution::Primary
    }

    fn resolve(&self, db_refs: &IdentifierBundle, resolver: &dyn NameResolver) -> Option<String> {
        let id = non_empty(db_refs.get(&self.namespace))?;
        resolver.display_name(&self.namespace, id)
    }
}

/// Ask the resolver for the secondary name of the identifier in `namespace`.
pub struct FallbackName {
    pub namespace: String,
}

impl NameStrategy for FallbackName {
    fn resolution(&self) -> Resolution {
        Resolution::Fallback
    }

    fn resolve(&self, db_refs: &IdentifierBundle, resolver: &dyn NameResolver) -> Option<String> {
        let id = non_empty(db_refs.get(&self.namespace))?;
        resolver.fallback_display_name(&self.namespace, id)
    }
}

/// A rename that changed an agent's name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenameEvent {
    /// 1-based position of the statement in the input.
    pub statement_index: usize,
    pub statement_count: usize,
    pub old_name: String,
    pub new_name: String,
    pub resolution: Resolution,
}

impl fmt::Display for RenameEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Map {} of {}: {} --> {}",
            self.statement_index, self.statement_count, self.old_name, self.new_name
        )
    }
}

/// Renamed statements plus the audit trail of the pass.
#[derive(Debug, Clone)]
pub struct RenameOutcome<S> {
    pub statements: Vec<S>,
    pub events: Vec<RenameEvent>,
}

pub struct NameCascade<'a> {
    resolver: &'a dyn NameResolver,
    strategies: Vec<Box<dyn NameStrategy + 'a>>,
}

impl<'a> NameCascade<'a> {
    /// The standard cascade: `INDRA`, then curated and fallback names for `UP`.
    pub fn new(resolver: &'a dyn NameResolver) -> Self {
        Self::with_namespaces(resolver, INDRA, UP)
    }

    pub fn with_namespaces(resolver: &'a dyn NameResolver, preferred: &str, primary: &str) -> Self {
        Self {
            resolver,
            strategies: vec![
                Box::new(PreferredName {
                    namespace: preferred.to_string(),
                }),
                Box::new(CuratedName {
                    namespace: primary.to_string(),
                }),
                Box::new(FallbackName {
                    namespace: primary.to_string(),
                }),
            ],
        }
    }

    /// A cascade with a custom strategy chain.
    pub fn with_strategies(
        resolver: &'a dyn NameResolver,
        strategies: Vec<Box<dyn NameStrategy + 'a>>,
    ) -> Self {
        Self {
            resolver,
            strategies,
        }
    }

    /// Run the chain for one bundle. `None` means every strategy declined.
    pub fn resolve(&self, db_refs: &IdentifierBundle) -> (Resolution, Option<String>) {
        for strategy in &self.strategies {
            if let Some(name) = strategy.resolve(db_refs, self.resolver) {
                return (strategy.resolution(), Some(name));
            }
        }
        (Resolution::Unresolved, None)
    }

    /// Return a renamed copy of `stmts`.
    pub fn rename_agents<S: AgentStatement>(&self, stmts: &[S]) -> Vec<S> {
        self.rename_agents_with_log(stmts).statements
    }

    /// Return a renamed copy of `stmts` along with every name change made.
    pub fn rename_agents_with_log<S: AgentStatement>(&self, stmts: &[S]) -> RenameOutcome<S> {
        let mut mapped_stmts = stmts.to_vec();
        let mut events = Vec::new();

        for (stmt_ix, stmt) in mapped_stmts.iter_mut().enumerate() {
            for agent in stmt.agents_mut() {
                let (resolution, name) = self.resolve(&agent.db_refs);
                let Some(new_name) = name else {
                    continue;
                };
                if new_name == agent.name {
                    continue;
                }
                let event = RenameEvent {
                    statement_index: stmt_ix + 1,
                    statement_count: stmts.len(),
                    old_name: std::mem::replace(&mut agent.name, new_name.clone()),
                    new_name,
                    resolution,
                };
                tracing::info!(stage = %resolution, "{event}");
                events.push(event);
            }
        }

        RenameOutcome {
            statements: mapped_stmts,
            events,
        }
    }
}
