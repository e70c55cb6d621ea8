use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;

use super::backend::JudgeBackend;
use super::error::{ErrorClass, JudgeError};
use super::types::{Conversation, DecodingParams};

/// One scripted result for a call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MockOutcome {
    Reply(String),
    Fail(ErrorClass),
}

#[derive(Debug, Clone)]
enum Script {
    Sequence(VecDeque<MockOutcome>),
    AlwaysFail(ErrorClass),
}

/// Scripted judge keyed by each conversation's last user message.
///
/// Unscripted conversations (and exhausted sequences) get the default reply, or an
/// echo of the user message when no default is set.
#[derive(Debug, Default)]
pub struct MockJudgeBackend {
    scripts: Mutex<HashMap<String, Script>>,
    calls: Mutex<HashMap<String, u32>>,
    total_calls: AtomicUsize,
    default_reply: Option<String>,
}

impl MockJudgeBackend {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_default_reply(mut self, reply: impl Into<String>) -> Self {
        self.default_reply = Some(reply.into());
        self
    }

    /// Plays `outcomes` in order for calls whose last user message is `user`.
    pub fn script<I>(self, user: impl Into<String>, outcomes: I) -> Self
    where
        I: IntoIterator<Item = MockOutcome>,
    {
        self.scripts
            .lock()
            .insert(user.into(), Script::Sequence(outcomes.into_iter().collect()));
        self
    }

    /// Every call for `user` fails with `class`.
    pub fn always_fail(self, user: impl Into<String>, class: ErrorClass) -> Self {
        self.scripts
            .lock()
            .insert(user.into(), Script::AlwaysFail(class));
        self
    }

    pub fn calls_for(&self, user: &str) -> u32 {
        self.calls.lock().get(user).copied().unwrap_or(0)
    }

    pub fn total_calls(&self) -> usize {
        self.total_calls.load(Ordering::SeqCst)
    }

    fn next_outcome(&self, user: &str) -> MockOutcome {
        let mut scripts = self.scripts.lock();
        let scripted = match scripts.get_mut(user) {
            Some(Script::AlwaysFail(class)) => Some(MockOutcome::Fail(*class)),
            Some(Script::Sequence(queue)) => queue.pop_front(),
            None => None,
        };

        scripted.unwrap_or_else(|| {
            MockOutcome::Reply(
                self.default_reply
                    .clone()
                    .unwrap_or_else(|| user.to_string()),
            )
        })
    }
}

#[async_trait]
impl JudgeBackend for MockJudgeBackend {
    async fn complete(
        &self,
        conversation: &Conversation,
        _params: &DecodingParams,
    ) -> Result<String, JudgeError> {
        let user = conversation.last_user().unwrap_or_default().to_string();
        self.total_calls.fetch_add(1, Ordering::SeqCst);
        *self.calls.lock().entry(user.clone()).or_insert(0) += 1;

        match self.next_outcome(&user) {
            MockOutcome::Reply(text) => Ok(text),
            MockOutcome::Fail(class) => Err(JudgeError::for_class(
                class,
                format!("scripted failure for '{user}'"),
            )),
        }
    }
}
