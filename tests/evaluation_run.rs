//! End-to-end evaluation over the builtin task table.

use std::fs;

use sciscore::judge::{DecodingParams, JudgeClient, MockJudgeBackend};
use sciscore::{
    Domain, Evaluator, Level, PromptLibrary, RunReport, TaskRegistry, TaskScore, load_records,
};
use tempfile::TempDir;

const RECORDS: &str = r#"
{"response": "(C) because the ring strains", "answer": "(C)", "type": "filling", "domain": "Chemistry", "details": {"task": "balancing_chemical_equation", "level": "L3"}}
{"response": "CCO.O", "answer": "CCO", "type": "reaction-filling", "domain": "Chemistry", "details": {"task": "reaction_prediction", "level": "L3"}}
{"response": "C1=CC", "answer": "CCN", "type": "filling", "domain": "Chemistry", "details": {"task": "reaction_prediction", "level": "L3"}}
{"response": "A concise summary.", "answer": "The reference summary.", "type": "generation", "domain": "Chemistry", "details": {"subtask": "text_summary", "level": "L2"}}
{"response": null, "answer": "Skipped.", "type": "generation", "domain": "Chemistry", "details": {"subtask": "text_summary", "level": "L2"}}
{"response": "(aspirin, reye syndrome)", "answer": "(aspirin, reye syndrome)", "type": "relation", "domain": "Biology", "details": {"subtask": "compound_disease_relation_extraction", "level": "L2"}}
{"response": "x", "answer": "y", "type": "filling", "domain": "Chemistry", "details": {"task": "not_a_benchmark_task"}}
"#;

const PROMPTS: &str = r#"{
    "text_summary": {
        "system": "Grade the candidate summary from 0 to 5.",
        "user": "Reference: {answer}\nCandidate: {response}",
        "type": "score"
    }
}"#;

fn write(dir: &TempDir, name: &str, contents: &str) -> std::path::PathBuf {
    let path = dir.path().join(name);
    fs::write(&path, contents).unwrap();
    path
}

#[tokio::test]
async fn test_full_run_writes_nested_report() {
    let dir = TempDir::new().unwrap();
    let records = load_records(write(&dir, "records.jsonl", RECORDS)).unwrap();
    assert_eq!(records.len(), 7);

    let prompts = PromptLibrary::load(write(&dir, "prompts.json", PROMPTS)).unwrap();
    let judge = JudgeClient::new(
        MockJudgeBackend::new().with_default_reply("Rating: 4"),
        DecodingParams::default(),
    );
    let evaluator = Evaluator::new(TaskRegistry::builtin())
        .with_prompts(prompts)
        .with_judge(judge);

    let report = evaluator.run(&records).await.unwrap();

    assert_eq!(
        report.get(Domain::Chemistry, Level::L3, "balancing_chemical_equation"),
        Some(&TaskScore::Scalar(1.0))
    );
    assert_eq!(
        report.get(Domain::Chemistry, Level::L3, "reaction_prediction"),
        Some(&TaskScore::Scalar(0.5))
    );
    assert_eq!(
        report.get(Domain::Chemistry, Level::L2, "chemical_text_summary"),
        Some(&TaskScore::Scalar(4.0))
    );
    assert_eq!(evaluator.judge().unwrap().backend().total_calls(), 1);

    // No word vectors configured.
    assert_eq!(
        report.get(
            Domain::Biology,
            Level::L2,
            "compound_disease_relation_extraction"
        ),
        Some(&TaskScore::Unavailable)
    );
    assert_eq!(report.len(), TaskRegistry::builtin().len());

    let out = dir.path().join("out").join("outputs.json");
    report.write_to(&out).unwrap();
    let back: RunReport = serde_json::from_str(&fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(back, report);
}

#[tokio::test]
async fn test_empty_run_scores_every_task() {
    let evaluator: Evaluator<MockJudgeBackend> = Evaluator::new(TaskRegistry::builtin());

    let report = evaluator.run(&[]).await.unwrap();

    assert_eq!(report.len(), TaskRegistry::builtin().len());
    assert_eq!(
        report.get(Domain::Chemistry, Level::L3, "reaction_prediction"),
        Some(&TaskScore::Scalar(0.0))
    );
}
