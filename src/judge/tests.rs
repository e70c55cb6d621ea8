use std::time::Duration;

use serial_test::serial;
use tokio::time::Instant;

use super::*;

fn conversations(n: usize) -> Vec<Conversation> {
    (0..n)
        .map(|i| Conversation::new().system("judge").user(format!("q{i}")))
        .collect()
}

fn client(backend: MockJudgeBackend) -> JudgeClient<MockJudgeBackend> {
    JudgeClient::new(backend, DecodingParams::default())
}

mod classification_tests {
    use super::*;

    #[test]
    fn test_status_classes() {
        for status in [400, 404, 413, 422] {
            assert_eq!(ErrorClass::from_status(status), ErrorClass::MalformedRequest);
        }
        assert_eq!(ErrorClass::from_status(401), ErrorClass::Authentication);
        assert_eq!(ErrorClass::from_status(403), ErrorClass::Authentication);
        assert_eq!(ErrorClass::from_status(429), ErrorClass::RateLimited);
        assert_eq!(ErrorClass::from_status(503), ErrorClass::Unavailable);
        assert_eq!(ErrorClass::from_status(500), ErrorClass::Api);
        assert_eq!(ErrorClass::from_status(502), ErrorClass::Api);
    }

    #[test]
    fn test_error_class_round_trip() {
        for class in [
            ErrorClass::MalformedRequest,
            ErrorClass::RateLimited,
            ErrorClass::Api,
            ErrorClass::Authentication,
            ErrorClass::Timeout,
            ErrorClass::Connection,
            ErrorClass::Unavailable,
        ] {
            assert_eq!(JudgeError::for_class(class, "x").class(), class);
        }
        assert_eq!(
            JudgeError::from_status(429, "slow down").class(),
            ErrorClass::RateLimited
        );
    }

    #[test]
    fn test_only_malformed_is_final() {
        assert!(!ErrorClass::MalformedRequest.is_retryable());
        assert!(ErrorClass::Timeout.is_retryable());
        assert!(ErrorClass::Authentication.is_retryable());
    }
}

mod policy_tests {
    use super::*;

    #[test]
    fn test_default_backoff_table() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_inner_attempts, 3);
        assert_eq!(policy.max_outer_passes, 1);
        assert_eq!(policy.delay_for(ErrorClass::RateLimited), Duration::from_secs(40));
        assert_eq!(policy.delay_for(ErrorClass::Api), Duration::from_secs(5));
        assert_eq!(policy.delay_for(ErrorClass::Unavailable), Duration::from_secs(1));
        assert_eq!(policy.delay_for(ErrorClass::MalformedRequest), Duration::from_secs(1));
        for class in [
            ErrorClass::Authentication,
            ErrorClass::Timeout,
            ErrorClass::Connection,
        ] {
            assert_eq!(policy.delay_for(class), Duration::from_secs(10));
        }
    }

    #[test]
    fn test_should_retry_budget() {
        let policy = RetryPolicy::default();
        assert!(policy.should_retry(ErrorClass::Api, 1));
        assert!(policy.should_retry(ErrorClass::Api, 2));
        assert!(!policy.should_retry(ErrorClass::Api, 3));
        assert!(!policy.should_retry(ErrorClass::MalformedRequest, 1));
    }

    #[test]
    fn test_builders() {
        let policy = RetryPolicy::default()
            .with_max_inner_attempts(0)
            .with_max_outer_passes(2)
            .with_backoff(BackoffTable::uniform(Duration::from_millis(5)));
        assert_eq!(policy.max_inner_attempts, 1);
        assert_eq!(policy.max_outer_passes, 2);
        assert_eq!(policy.delay_for(ErrorClass::RateLimited), Duration::from_millis(5));
    }
}

mod request_tests {
    use super::*;

    #[test]
    fn test_conversation_builder() {
        let conv = Conversation::new().system("s").user("u1").assistant("a").user("u2");
        assert_eq!(conv.len(), 4);
        assert_eq!(conv.turns()[0].role, Role::System);
        assert_eq!(conv.last_user(), Some("u2"));
        assert!(Conversation::new().last_user().is_none());
    }

    #[test]
    fn test_build_request_body() {
        let conv = Conversation::new().system("be strict").user("is it right?");
        let params = DecodingParams::default().with_model("judge-model");

        let request = HttpJudgeBackend::build_request(&conv, &params).unwrap();
        let body = serde_json::to_value(&request).unwrap();

        assert_eq!(body["model"], "judge-model");
        assert_eq!(body["messages"][0]["role"], "system");
        assert_eq!(body["messages"][0]["content"], "be strict");
        assert_eq!(body["messages"][1]["role"], "user");
        assert_eq!(body["max_completion_tokens"], 64);
        assert_eq!(body["top_p"], 1.0);
        assert_eq!(body["response_format"]["type"], "text");
    }

    #[test]
    fn test_endpoint_joins_base_url() {
        let backend =
            HttpJudgeBackend::new("http://localhost:9/v1/", "key", Duration::from_secs(1))
                .unwrap();
        assert_eq!(backend.endpoint(), "http://localhost:9/v1/chat/completions");
        assert!(format!("{backend:?}").contains("<redacted>"));
    }

    #[test]
    fn test_sentinel_reads_as_empty() {
        let failed = JudgeResponse::Failed(RetryState::default());
        assert_eq!(failed.text_or_empty(), "");
        assert!(failed.is_failure());
        assert_eq!(JudgeResponse::Text("ok".into()).text(), Some("ok"));
    }
}

mod client_tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_empty_input() {
        let client = client(MockJudgeBackend::new());
        assert!(client.run(Vec::new()).await.is_empty());
        assert_eq!(client.backend().total_calls(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_order_preserved_across_batches() {
        let client = client(MockJudgeBackend::new()).with_batch_size(3);
        let responses = client.run(conversations(10)).await;

        assert_eq!(responses.len(), 10);
        for (i, response) in responses.iter().enumerate() {
            assert_eq!(response.text(), Some(format!("q{i}").as_str()));
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_hundred_requests_with_retries() {
        let backend = MockJudgeBackend::new()
            .script(
                "q42",
                [
                    MockOutcome::Fail(ErrorClass::RateLimited),
                    MockOutcome::Fail(ErrorClass::RateLimited),
                    MockOutcome::Reply("verdict 42".to_string()),
                ],
            )
            .always_fail("q7", ErrorClass::Api);
        let client = client(backend);

        let responses = client.run(conversations(100)).await;

        assert_eq!(responses.len(), 100);
        assert_eq!(responses[42], JudgeResponse::Text("verdict 42".to_string()));
        assert_eq!(
            responses[7],
            JudgeResponse::Failed(RetryState {
                attempts: 6,
                last_error: Some(ErrorClass::Api),
            })
        );
        for (i, response) in responses.iter().enumerate() {
            if i != 7 && i != 42 {
                assert_eq!(response.text(), Some(format!("q{i}").as_str()));
            }
        }

        assert_eq!(client.backend().calls_for("q42"), 3);
        assert_eq!(client.backend().calls_for("q7"), 6);
        assert_eq!(client.backend().total_calls(), 98 + 3 + 6);
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_delay_applies() {
        let backend = MockJudgeBackend::new().script(
            "q0",
            [
                MockOutcome::Fail(ErrorClass::RateLimited),
                MockOutcome::Reply("ok".to_string()),
            ],
        );
        let client = client(backend);

        let start = Instant::now();
        let responses = client.run(conversations(1)).await;

        assert_eq!(responses[0].text(), Some("ok"));
        assert!(start.elapsed() >= Duration::from_secs(40));
    }

    #[tokio::test(start_paused = true)]
    async fn test_backoff_only_suspends_its_own_request() {
        let backend = MockJudgeBackend::new()
            .script(
                "q0",
                [
                    MockOutcome::Fail(ErrorClass::RateLimited),
                    MockOutcome::Reply("a".to_string()),
                ],
            )
            .script(
                "q1",
                [
                    MockOutcome::Fail(ErrorClass::RateLimited),
                    MockOutcome::Reply("b".to_string()),
                ],
            );
        let client = client(backend);

        let start = Instant::now();
        let responses = client.run(conversations(2)).await;

        assert_eq!(responses[0].text(), Some("a"));
        assert_eq!(responses[1].text(), Some("b"));
        assert!(start.elapsed() < Duration::from_secs(80));
    }

    #[tokio::test(start_paused = true)]
    async fn test_malformed_request_gets_one_try_per_pass() {
        let backend = MockJudgeBackend::new().always_fail("q0", ErrorClass::MalformedRequest);
        let client = client(backend);

        let responses = client.run(conversations(2)).await;

        assert_eq!(
            responses[0],
            JudgeResponse::Failed(RetryState {
                attempts: 2,
                last_error: Some(ErrorClass::MalformedRequest),
            })
        );
        assert_eq!(responses[1].text(), Some("q1"));
        assert_eq!(client.backend().calls_for("q0"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_outer_pass_reissues_malformed_failure() {
        let backend = MockJudgeBackend::new().script(
            "q0",
            [
                MockOutcome::Fail(ErrorClass::MalformedRequest),
                MockOutcome::Reply("ok".to_string()),
            ],
        );
        let client = client(backend);

        let responses = client.run(conversations(1)).await;

        assert_eq!(responses[0], JudgeResponse::Text("ok".to_string()));
        assert_eq!(client.backend().calls_for("q0"), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_outer_pass_recovers() {
        let backend = MockJudgeBackend::new().script(
            "q0",
            [
                MockOutcome::Fail(ErrorClass::Timeout),
                MockOutcome::Fail(ErrorClass::Connection),
                MockOutcome::Fail(ErrorClass::Unavailable),
                MockOutcome::Reply("late".to_string()),
            ],
        );
        let client = client(backend);

        let responses = client.run(conversations(1)).await;

        assert_eq!(responses[0].text(), Some("late"));
        assert_eq!(client.backend().calls_for("q0"), 4);
    }

    #[tokio::test(start_paused = true)]
    async fn test_no_outer_pass() {
        let backend = MockJudgeBackend::new().always_fail("q0", ErrorClass::Authentication);
        let client =
            client(backend).with_policy(RetryPolicy::default().with_max_outer_passes(0));

        let responses = client.run(conversations(1)).await;

        assert!(responses[0].is_failure());
        assert_eq!(client.backend().calls_for("q0"), 3);
    }

    #[tokio::test(start_paused = true)]
    async fn test_runs_are_deterministic() {
        let client = client(MockJudgeBackend::new().always_fail("q3", ErrorClass::Api));
        let first = client.run(conversations(5)).await;
        let second = client.run(conversations(5)).await;
        assert_eq!(first, second);
    }
}

mod config_tests {
    use super::*;
    use std::env;

    const VARS: [&str; 6] = [
        "SCISCORE_JUDGE_MODEL",
        "SCISCORE_JUDGE_BASE_URL",
        "SCISCORE_JUDGE_BATCH_SIZE",
        "SCISCORE_JUDGE_MAX_TOKENS",
        "SCISCORE_JUDGE_TEMPERATURE",
        "OPENAI_API_KEY",
    ];

    fn clear() {
        for var in VARS {
            unsafe { env::remove_var(var) };
        }
    }

    #[test]
    #[serial]
    fn test_defaults() {
        clear();
        let config = JudgeConfig::from_env();
        assert_eq!(config.model, "gpt-4o");
        assert_eq!(config.base_url, "https://api.openai.com/v1");
        assert_eq!(config.batch_size, 100);
        assert_eq!(config.max_tokens, 64);
        assert_eq!(config.temperature, 0.0);
        assert!(!config.has_credentials());
    }

    #[test]
    #[serial]
    fn test_overrides() {
        clear();
        unsafe {
            env::set_var("SCISCORE_JUDGE_MODEL", "local-judge");
            env::set_var("SCISCORE_JUDGE_BATCH_SIZE", "8");
            env::set_var("SCISCORE_JUDGE_MAX_TOKENS", "not-a-number");
            env::set_var("SCISCORE_JUDGE_TEMPERATURE", "0.5");
            env::set_var("OPENAI_API_KEY", "sk-test");
        }

        let config = JudgeConfig::from_env();
        clear();

        assert_eq!(config.model, "local-judge");
        assert_eq!(config.batch_size, 8);
        assert_eq!(config.max_tokens, 64);
        assert_eq!(config.temperature, 0.5);
        assert!(config.has_credentials());
        assert!(!format!("{config:?}").contains("sk-test"));

        let params = config.decoding_params();
        assert_eq!(params.model, "local-judge");
        assert_eq!(params.temperature, 0.5);
    }

    #[test]
    #[serial]
    fn test_zero_batch_size_falls_back() {
        clear();
        unsafe { env::set_var("SCISCORE_JUDGE_BATCH_SIZE", "0") };
        let config = JudgeConfig::from_env();
        clear();
        assert_eq!(config.batch_size, 100);
    }
}
