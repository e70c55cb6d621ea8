use futures_util::future::join_all;
use tracing::{debug, info, warn};

use super::backend::JudgeBackend;
use super::retry::RetryPolicy;
use super::types::{Conversation, DecodingParams, JudgeRequest, JudgeResponse, RetryState};
use crate::constants::DEFAULT_JUDGE_BATCH_SIZE;

/// Ordered, batched, retrying dispatcher over a [`JudgeBackend`].
///
/// Requests in a batch run concurrently; batches run one after another, each waiting
/// for all of its requests (including backoff sleeps and the outer pass) to finish.
/// Output always has the input's length and order. Failures never escape: a request
/// that exhausts its budget yields [`JudgeResponse::Failed`].
pub struct JudgeClient<B> {
    backend: B,
    params: DecodingParams,
    policy: RetryPolicy,
    batch_size: usize,
}

impl<B: std::fmt::Debug> std::fmt::Debug for JudgeClient<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JudgeClient")
            .field("backend", &self.backend)
            .field("model", &self.params.model)
            .field("batch_size", &self.batch_size)
            .field("policy", &self.policy)
            .finish()
    }
}

impl<B: JudgeBackend> JudgeClient<B> {
    pub fn new(backend: B, params: DecodingParams) -> Self {
        Self {
            backend,
            params,
            policy: RetryPolicy::default(),
            batch_size: DEFAULT_JUDGE_BATCH_SIZE,
        }
    }

    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    pub fn with_batch_size(mut self, batch_size: usize) -> Self {
        self.batch_size = batch_size.max(1);
        self
    }

    pub fn backend(&self) -> &B {
        &self.backend
    }

    pub fn params(&self) -> &DecodingParams {
        &self.params
    }

    pub fn policy(&self) -> &RetryPolicy {
        &self.policy
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    /// Judges every conversation; `result[i]` answers `conversations[i]`.
    pub async fn run(&self, conversations: Vec<Conversation>) -> Vec<JudgeResponse> {
        let requests: Vec<JudgeRequest> = conversations
            .into_iter()
            .enumerate()
            .map(|(position, conversation)| JudgeRequest {
                position,
                conversation,
            })
            .collect();

        let total = requests.len();
        let mut responses = Vec::with_capacity(total);
        for (batch, chunk) in requests.chunks(self.batch_size).enumerate() {
            debug!(batch, size = chunk.len(), "Dispatching judge batch");
            responses.extend(self.run_batch(batch, chunk).await);
        }

        let failed = responses.iter().filter(|r| r.is_failure()).count();
        info!(
            requests = total,
            failed,
            model = %self.params.model,
            "Judge run complete"
        );
        responses
    }

    async fn run_batch(&self, batch: usize, requests: &[JudgeRequest]) -> Vec<JudgeResponse> {
        let mut responses = join_all(
            requests
                .iter()
                .map(|request| self.dispatch(request, RetryState::default())),
        )
        .await;

        for pass in 1..=self.policy.max_outer_passes {
            let pending: Vec<(usize, RetryState)> = responses
                .iter()
                .enumerate()
                .filter_map(|(i, response)| match response {
                    JudgeResponse::Failed(state) => Some((i, *state)),
                    JudgeResponse::Text(_) => None,
                })
                .collect();
            if pending.is_empty() {
                break;
            }

            warn!(
                batch,
                pass,
                failed = pending.len(),
                "Re-issuing failed judge requests"
            );

            let retried = join_all(
                pending
                    .iter()
                    .map(|&(i, state)| self.dispatch(&requests[i], state)),
            )
            .await;

            for ((i, _), response) in pending.into_iter().zip(retried) {
                responses[i] = response;
            }
        }

        responses
    }

    /// One pass of the inner retry loop for `request`, continuing from `state`.
    async fn dispatch(&self, request: &JudgeRequest, mut state: RetryState) -> JudgeResponse {
        let mut attempts_this_pass = 0u32;
        loop {
            match self
                .backend
                .complete(&request.conversation, &self.params)
                .await
            {
                Ok(text) => return JudgeResponse::Text(text),
                Err(err) => {
                    let class = err.class();
                    attempts_this_pass += 1;
                    state.record_failure(class);

                    if !self.policy.should_retry(class, attempts_this_pass) {
                        warn!(
                            position = request.position,
                            attempts = state.attempts,
                            error_class = ?class,
                            error = %err,
                            "Judge request failed"
                        );
                        return JudgeResponse::Failed(state);
                    }

                    let delay = self.policy.delay_for(class);
                    debug!(
                        position = request.position,
                        attempt = attempts_this_pass,
                        error_class = ?class,
                        delay_ms = delay.as_millis() as u64,
                        "Retrying judge request"
                    );
                    tokio::time::sleep(delay).await;
                }
            }
        }
    }
}
