use std::collections::HashSet;

use serde_json::json;

use super::*;
use crate::record::ExampleRecord;
use crate::relation::Arity;

fn record(value: serde_json::Value) -> ExampleRecord {
    serde_json::from_value(value).unwrap()
}

#[test]
fn test_builtin_names_are_unique() {
    let registry = TaskRegistry::builtin();
    let names: HashSet<&str> = registry.tasks().iter().map(|t| t.name.as_str()).collect();
    assert_eq!(names.len(), registry.len());
    assert!(registry.len() > 50);
}

#[test]
fn test_builtin_covers_every_domain() {
    let registry = TaskRegistry::builtin();
    for domain in Domain::ALL {
        assert!(registry.tasks().iter().any(|t| t.domain == domain), "{domain}");
    }
}

#[test]
fn test_builtin_strategies() {
    let registry = TaskRegistry::builtin();
    let strategy = |name: &str| registry.get(name).unwrap().strategy.clone();

    assert_eq!(
        strategy("compound_disease_relation_extraction").relation_arity(),
        Some(Arity::Pair)
    );
    assert_eq!(
        strategy("drug_drug_relation_extraction").relation_arity(),
        Some(Arity::Triple)
    );
    assert_eq!(
        strategy("chemical_text_summary").judge_template(),
        Some("text_summary")
    );
    assert_eq!(
        strategy("biological_harmful_QA").judge_template(),
        Some("harmful_QA")
    );
    assert_eq!(
        strategy("physics_problem_solving").judge_template(),
        Some("physics_problem_solving")
    );
    assert_eq!(strategy("retrosynthesis"), ScoringStrategy::Reaction);
    assert_eq!(strategy("balancing_chemical_equation"), ScoringStrategy::Filling);
    assert!(registry.get("no_such_task").is_none());
}

#[test]
fn test_generation_tasks_are_opt_in() {
    let builtin = TaskRegistry::builtin();
    assert!(builtin
        .tasks()
        .iter()
        .all(|t| t.strategy != ScoringStrategy::FreeTextGeneration));
    assert!(builtin.get("molecule_captioning").is_none());

    let extended = TaskRegistry::builtin().with_generation_tasks();
    assert_eq!(extended.len(), builtin.len() + 3);
    for name in [
        "molecule_captioning",
        "protein_description_generation",
        "single_cell_analysis",
    ] {
        assert_eq!(
            extended.get(name).unwrap().strategy,
            ScoringStrategy::FreeTextGeneration
        );
    }
    assert_eq!(
        extended.get("single_cell_analysis").unwrap().level,
        Level::L5
    );
}

#[test]
fn test_selector_domain_and_level() {
    let selector = TaskSelector::task("molecular_property_prediction")
        .in_domain(Domain::Chemistry)
        .at_level(Level::L3);

    let hit = record(json!({
        "domain": "Chemistry",
        "details": {"task": "molecular_property_prediction", "level": "L3"}
    }));
    let wrong_level = record(json!({
        "domain": "Chemistry",
        "details": {"task": "molecular_property_prediction", "level": "L1"}
    }));
    let wrong_domain = record(json!({
        "domain": "Biology",
        "details": {"task": "molecular_property_prediction", "level": "L3"}
    }));

    assert!(selector.matches(&hit));
    assert!(!selector.matches(&wrong_level));
    assert!(!selector.matches(&wrong_domain));
}

#[test]
fn test_selector_field() {
    let r = record(json!({"details": {"task": "a", "subtask": "b"}}));
    assert!(TaskSelector::task("a").matches(&r));
    assert!(!TaskSelector::task("b").matches(&r));
    assert!(TaskSelector::subtask("b").matches(&r));
    assert!(!TaskSelector::subtask("a").matches(&record(json!({}))));
}

#[test]
fn test_partition_by_domain() {
    let registry = TaskRegistry::builtin();
    let records = vec![
        record(json!({"domain": "Chemistry", "details": {"subtask": "text_summary"}})),
        record(json!({"domain": "Biology", "details": {"subtask": "text_summary"}})),
        record(json!({"domain": "Biology", "details": {"subtask": "text_summary"}})),
        record(json!({"domain": "Physics", "details": {"task": "unknown"}})),
    ];

    let partition = registry.partition(&records);
    assert_eq!(partition.per_task.len(), registry.len());
    assert_eq!(partition.unmatched, 1);

    let count = |name: &str| {
        let i = registry
            .tasks()
            .iter()
            .position(|t| t.name == name)
            .unwrap();
        partition.per_task[i].len()
    };
    assert_eq!(count("chemical_text_summary"), 1);
    assert_eq!(count("biological_text_summary"), 2);
    assert_eq!(count("physics_text_summary"), 0);
}

#[test]
fn test_display() {
    assert_eq!(Domain::Materials.to_string(), "Materials");
    assert_eq!(Level::L4.to_string(), "L4");
    assert_eq!(ScoringStrategy::judge("x").name(), "judge");
}
