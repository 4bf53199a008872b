//! Grounding mapper: apply the grounding table to every agent.

use crate::statement::AgentStatement;
use crate::table::GroundingTable;

/// Rewrites agent identifier bundles from a [`GroundingTable`].
pub struct GroundingMapper<'a> {
    table: &'a GroundingTable,
}

impl<'a> GroundingMapper<'a> {
    pub fn new(table: &'a GroundingTable) -> Self {
        Self { table }
    }

    /// Return a copy of `stmts` in which every agent whose raw text is in the
    /// table carries the table's bundle instead of its own.
    ///
    /// The bundle is replaced wholesale, never merged; agents without raw
    /// text or with text unknown to the table keep their bundle.
    pub fn map_agents<S: AgentStatement>(&self, stmts: &[S]) -> Vec<S> {
        let mut mapped_stmts = stmts.to_vec();
        let mut mapped = 0usize;

        for stmt in &mut mapped_stmts {
            for agent in stmt.agents_mut() {
                let Some(agent_text) = agent.db_refs.text() else {
                    continue;
                };
                if let Some(entry) = self.table.lookup(agent_text) {
                    agent.db_refs = entry.clone();
                    mapped += 1;
                }
            }
        }

        tracing::debug!(
            statements = stmts.len(),
            agents_mapped = mapped,
            "applied grounding table"
        );
        mapped_stmts
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bundle::{IdentifierBundle, TEXT, UP};
    use crate::statement::{Agent, Statement};

    fn ros_table() -> GroundingTable {
        GroundingTable::build([["ROS", "UP", "P00533", "", ""]]).unwrap()
    }

    #[test]
    fn known_text_gets_table_bundle() {
        let table = ros_table();
        let stmts = vec![Statement::new(
            "Activation",
            vec![Some(Agent::from_text("ROS")), Some(Agent::from_text("unknownterm"))],
        )];

        let mapped = GroundingMapper::new(&table).map_agents(&stmts);

        let expected: IdentifierBundle = [(TEXT, "ROS"), (UP, "P00533")].into_iter().collect();
        let agents: Vec<&Agent> = mapped[0].agents.iter().flatten().collect();
        assert_eq!(agents[0].db_refs, expected);
        assert_eq!(agents[1].db_refs, IdentifierBundle::from_text("unknownterm"));
        // Names are left to the cascade.
        assert_eq!(agents[0].name, "ROS");
    }

    #[test]
    fn bundle_is_replaced_not_merged() {
        let table = ros_table();
        let db_refs: IdentifierBundle = [(TEXT, "ROS"), ("CHEBI", "CHEBI:26523")]
            .into_iter()
            .collect();
        let stmts = vec![Statement::new("Activation", vec![Some(Agent::new("ROS", db_refs))])];

        let mapped = GroundingMapper::new(&table).map_agents(&stmts);

        let agent = mapped[0].agents[0].as_ref().unwrap();
        assert_eq!(agent.db_refs.get("CHEBI"), None);
        assert_eq!(agent.db_refs.get(UP), Some("P00533"));
    }

    #[test]
    fn empty_slots_and_textless_agents_are_skipped() {
        let table = ros_table();
        let no_text: IdentifierBundle = [(UP, "P04637")].into_iter().collect();
        let stmts = vec![Statement::new(
            "Complex",
            vec![None, Some(Agent::new("TP53", no_text.clone()))],
        )];

        let mapped = GroundingMapper::new(&table).map_agents(&stmts);

        assert!(mapped[0].agents[0].is_none());
        assert_eq!(mapped[0].agents[1].as_ref().unwrap().db_refs, no_text);
    }

    #[test]
    fn input_is_not_mutated() {
        let table = ros_table();
        let stmts = vec![Statement::new("Activation", vec![Some(Agent::from_text("ROS"))])];
        let before = stmts.clone();

        let _ = GroundingMapper::new(&table).map_agents(&stmts);

        assert_eq!(stmts, before);
    }
}
