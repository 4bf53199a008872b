use groundmap_core::{
    aggregate_by_text, ungrounded_texts, Agent, AgentStatement, GroundingCount, GroundingMapper,
    GroundingTable, IdentifierBundle, NameCascade, NameResolver, Statement, TEXT, UP,
};
use proptest::prelude::*;

fn table() -> GroundingTable {
    GroundingTable::build([
        ["ROS", "UP", "P00533", "", ""],
        ["ERK", "FPLX", "ERK", "UP", "P28482"],
        ["p53", "UP", "P04637", "INDRA", "TP53"],
        ["foo", "", "", "None", "None"],
    ])
    .unwrap()
}

struct ProteinNames;

impl NameResolver for ProteinNames {
    fn display_name(&self, namespace: &str, id: &str) -> Option<String> {
        match (namespace, id) {
            ("UP", "P00533") => Some("EGFR".to_string()),
            _ => None,
        }
    }

    fn fallback_display_name(&self, namespace: &str, id: &str) -> Option<String> {
        match (namespace, id) {
            ("UP", "P28482") => Some("MAPK1".to_string()),
            _ => None,
        }
    }

    fn mnemonic(&self, _namespace: &str, _id: &str) -> Option<String> {
        None
    }
}

#[test]
fn map_then_rename_pipeline() {
    let table = table();
    let stmts = vec![
        Statement::new(
            "Phosphorylation",
            vec![Some(Agent::from_text("ERK")), Some(Agent::from_text("ROS"))],
        ),
        Statement::new("Activation", vec![None, Some(Agent::from_text("p53"))]),
        Statement::new("Activation", vec![Some(Agent::from_text("foo"))]),
    ];

    let mapped = GroundingMapper::new(&table).map_agents(&stmts);
    let outcome = NameCascade::new(&ProteinNames).rename_agents_with_log(&mapped);

    let names: Vec<&str> = outcome
        .statements
        .iter()
        .flat_map(|s| s.agents())
        .map(|a| a.name.as_str())
        .collect();
    assert_eq!(names, vec!["MAPK1", "EGFR", "TP53", "foo"]);
    assert_eq!(outcome.events.len(), 3);

    // `foo` reduced to text only in the table, so it stays ungrounded.
    assert_eq!(
        ungrounded_texts(&outcome.statements),
        vec![("foo".to_string(), 1)]
    );
}

#[test]
fn aggregation_after_mapping_reflects_table() {
    let table = table();
    let stmts = vec![Statement::new(
        "Complex",
        vec![
            Some(Agent::from_text("ROS")),
            Some(Agent::from_text("ROS")),
            Some(Agent::from_text("NOX4")),
        ],
    )];

    let entries = aggregate_by_text(&GroundingMapper::new(&table).map_agents(&stmts));

    assert_eq!(entries[0].text, "ROS");
    assert_eq!(entries[0].groundings, vec![GroundingCount::grounded(UP, "P00533", 2)]);
    assert_eq!(entries[1].text, "NOX4");
    assert_eq!(entries[1].groundings, vec![GroundingCount::ungrounded(1)]);
}

fn arb_agent() -> impl Strategy<Value = Option<Agent>> {
    let text = prop::sample::select(vec!["ROS", "ERK", "p53", "foo", "NOX4", "MEK"]);
    let extra = prop::option::of(prop::sample::select(vec!["P00533", "Q02750"]));
    prop::option::of((text, extra).prop_map(|(text, up)| {
        let mut db_refs = IdentifierBundle::from_text(text);
        if let Some(up) = up {
            db_refs = db_refs.with(UP, up);
        }
        Agent::new(text, db_refs)
    }))
}

fn arb_statements() -> impl Strategy<Value = Vec<Statement>> {
    prop::collection::vec(
        prop::collection::vec(arb_agent(), 0..4)
            .prop_map(|agents| Statement::new("Activation", agents)),
        0..8,
    )
}

proptest! {
    #[test]
    fn mapping_is_idempotent(stmts in arb_statements()) {
        let table = table();
        let mapper = GroundingMapper::new(&table);
        let once = mapper.map_agents(&stmts);
        let twice = mapper.map_agents(&once);
        prop_assert_eq!(once, twice);
    }

    #[test]
    fn passes_never_mutate_their_input(stmts in arb_statements()) {
        let table = table();
        let before = stmts.clone();
        let _ = GroundingMapper::new(&table).map_agents(&stmts);
        let _ = NameCascade::new(&ProteinNames).rename_agents(&stmts);
        prop_assert_eq!(stmts, before);
    }

    #[test]
    fn aggregate_totals_match_text_bearing_agents(stmts in arb_statements()) {
        let with_text = stmts
            .iter()
            .flat_map(|s| s.agents())
            .filter(|a| a.db_refs.get(TEXT).is_some())
            .count();
        let total: usize = aggregate_by_text(&stmts).iter().map(|e| e.total).sum();
        prop_assert_eq!(total, with_text);
    }
}
