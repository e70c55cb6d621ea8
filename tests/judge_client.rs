//! Integration tests for the batched judge client against a scripted backend.

use std::time::Duration;

use sciscore::judge::{
    BackoffTable, Conversation, DecodingParams, ErrorClass, JudgeClient, JudgeResponse,
    MockJudgeBackend, MockOutcome, RetryPolicy,
};
use sciscore::{VerdictGrammar, aggregate_responses};
use tokio::time::Instant;

fn conversation(user: &str) -> Conversation {
    Conversation::new().system("You are a strict grader.").user(user)
}

#[tokio::test(start_paused = true)]
async fn test_batches_preserve_order_and_recover() {
    let backend = MockJudgeBackend::new()
        .script(
            "q1",
            [
                MockOutcome::Fail(ErrorClass::Timeout),
                MockOutcome::Reply("Rating: 2".to_string()),
            ],
        )
        .script("q3", [MockOutcome::Reply("Rating: 5".to_string())]);
    let client = JudgeClient::new(backend.with_default_reply("Rating: 3"), DecodingParams::default())
        .with_batch_size(2);

    let conversations = (0..5).map(|i| conversation(&format!("q{i}"))).collect();
    let responses = client.run(conversations).await;

    let texts: Vec<&str> = responses.iter().map(JudgeResponse::text_or_empty).collect();
    assert_eq!(
        texts,
        ["Rating: 3", "Rating: 2", "Rating: 3", "Rating: 5", "Rating: 3"]
    );
    assert_eq!(client.backend().calls_for("q1"), 2);
    assert_eq!(client.backend().total_calls(), 6);
}

#[tokio::test(start_paused = true)]
async fn test_exhausted_request_becomes_sentinel_and_scores_as_out_of_grammar() {
    let backend = MockJudgeBackend::new()
        .with_default_reply("Rating: 4")
        .always_fail("bad", ErrorClass::Unavailable);
    let client = JudgeClient::new(backend, DecodingParams::default());

    let responses = client
        .run(vec![conversation("good"), conversation("bad")])
        .await;

    assert_eq!(responses[0].text(), Some("Rating: 4"));
    let JudgeResponse::Failed(state) = &responses[1] else {
        panic!("expected failure sentinel");
    };
    assert_eq!(state.attempts, 6);
    assert_eq!(state.last_error, Some(ErrorClass::Unavailable));

    assert_eq!(aggregate_responses(VerdictGrammar::Rating, &responses), 4.0);
}

#[tokio::test(start_paused = true)]
async fn test_custom_backoff_table_is_honored() {
    let backend = MockJudgeBackend::new().script(
        "q",
        [
            MockOutcome::Fail(ErrorClass::Api),
            MockOutcome::Reply("(C)".to_string()),
        ],
    );
    let policy = RetryPolicy::default().with_backoff(BackoffTable::uniform(Duration::from_secs(2)));
    let client = JudgeClient::new(backend, DecodingParams::default()).with_policy(policy);

    let start = Instant::now();
    let responses = client.run(vec![conversation("q")]).await;

    assert_eq!(responses[0].text(), Some("(C)"));
    assert!(start.elapsed() >= Duration::from_secs(2));
    assert!(start.elapsed() < Duration::from_secs(5));
    assert_eq!(
        aggregate_responses(VerdictGrammar::Lettered, &responses),
        1.0
    );
}

#[tokio::test(start_paused = true)]
async fn test_malformed_request_recovers_on_outer_pass() {
    let backend = MockJudgeBackend::new().script(
        "q",
        [
            MockOutcome::Fail(ErrorClass::MalformedRequest),
            MockOutcome::Reply("Rating: 3".to_string()),
        ],
    );
    let client = JudgeClient::new(backend, DecodingParams::default());

    let responses = client.run(vec![conversation("q")]).await;

    assert_eq!(responses[0].text(), Some("Rating: 3"));
    assert_eq!(client.backend().calls_for("q"), 2);
    assert_eq!(
        aggregate_responses(VerdictGrammar::Rating, &responses),
        3.0
    );
}
