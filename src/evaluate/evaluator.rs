use std::borrow::Cow;

use tracing::{debug, info, warn};

use crate::aggregate::aggregate_responses;
use crate::embedding::WordVectors;
use crate::judge::{HttpJudgeBackend, JudgeBackend, JudgeClient};
use crate::prompts::PromptLibrary;
use crate::record::ExampleRecord;
use crate::scoring::{
    RelationScorer, ScoringError, score_classification, score_filling, score_generation,
    score_reaction,
};
use crate::tasks::{ScoringStrategy, TaskRegistry, TaskSpec};

use super::error::EvalError;
use super::report::{RunReport, TaskScore};

/// Scores every registered task over one set of records.
///
/// Optional resources gate strategies: relation tasks need word vectors, judge tasks
/// need both a judge client and a prompt library. A task whose resource is missing
/// reports [`TaskScore::Unavailable`].
pub struct Evaluator<B = HttpJudgeBackend> {
    registry: TaskRegistry,
    word_vectors: Option<WordVectors>,
    prompts: Option<PromptLibrary>,
    judge: Option<JudgeClient<B>>,
}

impl<B> std::fmt::Debug for Evaluator<B> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Evaluator")
            .field("tasks", &self.registry.len())
            .field("word_vectors", &self.word_vectors.as_ref().map(WordVectors::len))
            .field("prompts", &self.prompts.as_ref().map(PromptLibrary::len))
            .field("judge", &self.judge.is_some())
            .finish()
    }
}

impl<B: JudgeBackend> Evaluator<B> {
    pub fn new(registry: TaskRegistry) -> Self {
        Self {
            registry,
            word_vectors: None,
            prompts: None,
            judge: None,
        }
    }

    pub fn with_word_vectors(mut self, vectors: WordVectors) -> Self {
        self.word_vectors = Some(vectors);
        self
    }

    pub fn with_prompts(mut self, prompts: PromptLibrary) -> Self {
        self.prompts = Some(prompts);
        self
    }

    pub fn with_judge(mut self, judge: JudgeClient<B>) -> Self {
        self.judge = Some(judge);
        self
    }

    pub fn registry(&self) -> &TaskRegistry {
        &self.registry
    }

    pub fn judge(&self) -> Option<&JudgeClient<B>> {
        self.judge.as_ref()
    }

    pub async fn run(&self, records: &[ExampleRecord]) -> Result<RunReport, EvalError> {
        let partition = self.registry.partition(records);
        info!(
            records = records.len(),
            tasks = self.registry.len(),
            unmatched = partition.unmatched,
            "Starting evaluation"
        );

        let mut report = RunReport::new();
        for (task, task_records) in self.registry.tasks().iter().zip(&partition.per_task) {
            let score = self.score_task(task, task_records).await?;
            info!(
                task = %task.name,
                domain = %task.domain,
                level = %task.level,
                strategy = task.strategy.name(),
                records = task_records.len(),
                score = ?score,
                "Task scored"
            );
            report.insert(task.domain, task.level, task.name.clone(), score);
        }

        Ok(report)
    }

    pub async fn score_task(
        &self,
        task: &TaskSpec,
        records: &[&ExampleRecord],
    ) -> Result<TaskScore, EvalError> {
        let scored = match &task.strategy {
            ScoringStrategy::Classification => score_classification(records).map(TaskScore::Scalar),
            ScoringStrategy::Reaction => score_reaction(records).map(TaskScore::Scalar),
            ScoringStrategy::Filling => Ok(TaskScore::Scalar(score_filling(records))),
            ScoringStrategy::RelationTuple | ScoringStrategy::RelationTriplet => {
                Ok(self.score_relation(task, records))
            }
            ScoringStrategy::FreeTextGeneration => Ok(score_free_text(records)),
            ScoringStrategy::JudgeBased { .. } => {
                return self.score_judge_task(&task.name, records).await;
            }
        };

        Ok(scored.unwrap_or_else(|e: ScoringError| {
            warn!(task = %task.name, error = %e, "Task scoring failed");
            TaskScore::Unavailable
        }))
    }

    fn score_relation(&self, task: &TaskSpec, records: &[&ExampleRecord]) -> TaskScore {
        let (Some(vectors), Some(arity)) = (&self.word_vectors, task.strategy.relation_arity())
        else {
            debug!(task = %task.name, "No word vectors loaded; relation task unavailable");
            return TaskScore::Unavailable;
        };

        let predictions: Vec<Option<&str>> = records.iter().map(|r| r.response_text()).collect();
        let answers: Vec<Cow<'_, str>> = records.iter().map(|r| r.answer_text()).collect();
        let answers: Vec<&str> = answers.iter().map(|a| a.as_ref()).collect();

        let score = RelationScorer::new(vectors, arity).score_texts(&predictions, &answers);
        TaskScore::Scalar(score.score)
    }

    /// Scores a judge task by name.
    ///
    /// Records with an empty response or answer are skipped. An unregistered name is
    /// an error; missing judge, prompts, template or grammar make the task unavailable.
    pub async fn score_judge_task(
        &self,
        task_name: &str,
        records: &[&ExampleRecord],
    ) -> Result<TaskScore, EvalError> {
        let task = self.judge_task(task_name)?;
        let (Some(judge), Some(prompts)) = (&self.judge, &self.prompts) else {
            debug!(task = task_name, "Judge or prompts not configured; task unavailable");
            return Ok(TaskScore::Unavailable);
        };

        let kept: Vec<&ExampleRecord> = records
            .iter()
            .copied()
            .filter(|r| r.response_text().is_some_and(|s| !s.is_empty()) && !r.answer.is_empty())
            .collect();
        if kept.is_empty() {
            return Ok(TaskScore::Scalar(0.0));
        }

        let prepared = prompts.get(judge_template(task)).and_then(|template| {
            let grammar = template.grammar()?;
            let conversations = kept
                .iter()
                .map(|r| template.render(r))
                .collect::<Result<Vec<_>, _>>()?;
            Ok((grammar, conversations))
        });
        let (grammar, conversations) = match prepared {
            Ok(prepared) => prepared,
            Err(e) => {
                warn!(task = task_name, error = %e, "Judge prompt unusable; task unavailable");
                return Ok(TaskScore::Unavailable);
            }
        };

        debug!(
            task = task_name,
            requests = conversations.len(),
            skipped = records.len() - kept.len(),
            %grammar,
            "Dispatching judge requests"
        );
        let responses = judge.run(conversations).await;
        Ok(TaskScore::Scalar(aggregate_responses(grammar, &responses)))
    }

    fn judge_task(&self, task_name: &str) -> Result<&TaskSpec, EvalError> {
        let task = self
            .registry
            .get(task_name)
            .ok_or_else(|| EvalError::UnknownTask {
                name: task_name.to_string(),
            })?;
        if task.strategy.judge_template().is_none() {
            return Err(EvalError::NotJudgeTask {
                name: task_name.to_string(),
            });
        }
        Ok(task)
    }
}

fn judge_template(task: &TaskSpec) -> &str {
    task.strategy.judge_template().unwrap_or(&task.name)
}

fn score_free_text(records: &[&ExampleRecord]) -> TaskScore {
    let answers: Vec<Cow<'_, str>> = records.iter().map(|r| r.answer_text()).collect();
    let pairs: Vec<(&str, &str)> = records
        .iter()
        .zip(&answers)
        .map(|(r, a)| (r.response_text().unwrap_or_default(), a.as_ref()))
        .collect();

    TaskScore::Metrics(score_generation(&pairs).into_metrics())
}
