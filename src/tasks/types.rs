use std::fmt;

use serde::{Deserialize, Serialize};

use crate::record::ExampleRecord;
use crate::relation::Arity;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Domain {
    Biology,
    Chemistry,
    Materials,
    Physics,
}

impl Domain {
    pub const ALL: [Domain; 4] = [
        Domain::Biology,
        Domain::Chemistry,
        Domain::Materials,
        Domain::Physics,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Domain::Biology => "Biology",
            Domain::Chemistry => "Chemistry",
            Domain::Materials => "Materials",
            Domain::Physics => "Physics",
        }
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Benchmark difficulty tier, `L1` (recall) to `L5` (open-ended application).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Level {
    L1,
    L2,
    L3,
    L4,
    L5,
}

impl Level {
    pub fn as_str(self) -> &'static str {
        match self {
            Level::L1 => "L1",
            Level::L2 => "L2",
            Level::L3 => "L3",
            Level::L4 => "L4",
            Level::L5 => "L5",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How a task's records are turned into a score.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum ScoringStrategy {
    /// True/false and multiple-choice accuracy.
    Classification,
    /// Multiple-choice or product-fragment accuracy.
    Reaction,
    /// Answer-substring accuracy.
    Filling,
    RelationTuple,
    RelationTriplet,
    /// BLEU / ROUGE metrics.
    FreeTextGeneration,
    /// LLM judge verdicts under the named prompt template.
    JudgeBased { template: String },
}

impl ScoringStrategy {
    pub fn judge(template: impl Into<String>) -> Self {
        ScoringStrategy::JudgeBased {
            template: template.into(),
        }
    }

    pub fn relation_arity(&self) -> Option<Arity> {
        match self {
            ScoringStrategy::RelationTuple => Some(Arity::Pair),
            ScoringStrategy::RelationTriplet => Some(Arity::Triple),
            _ => None,
        }
    }

    pub fn judge_template(&self) -> Option<&str> {
        match self {
            ScoringStrategy::JudgeBased { template } => Some(template),
            _ => None,
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            ScoringStrategy::Classification => "classification",
            ScoringStrategy::Reaction => "reaction",
            ScoringStrategy::Filling => "filling",
            ScoringStrategy::RelationTuple => "relation_tuple",
            ScoringStrategy::RelationTriplet => "relation_triplet",
            ScoringStrategy::FreeTextGeneration => "free_text_generation",
            ScoringStrategy::JudgeBased { .. } => "judge",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SelectorField {
    Task,
    Subtask,
}

/// Which records belong to a task: `details.task` or `details.subtask` equal to a
/// value, optionally narrowed by `domain` and `details.level`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSelector {
    pub field: SelectorField,
    pub value: String,
    pub domain: Option<Domain>,
    pub level: Option<Level>,
}

impl TaskSelector {
    pub fn task(value: impl Into<String>) -> Self {
        Self {
            field: SelectorField::Task,
            value: value.into(),
            domain: None,
            level: None,
        }
    }

    pub fn subtask(value: impl Into<String>) -> Self {
        Self {
            field: SelectorField::Subtask,
            value: value.into(),
            domain: None,
            level: None,
        }
    }

    pub fn in_domain(mut self, domain: Domain) -> Self {
        self.domain = Some(domain);
        self
    }

    pub fn at_level(mut self, level: Level) -> Self {
        self.level = Some(level);
        self
    }

    pub fn matches(&self, record: &ExampleRecord) -> bool {
        let field = match self.field {
            SelectorField::Task => record.details.task.as_deref(),
            SelectorField::Subtask => record.details.subtask.as_deref(),
        };
        if field != Some(self.value.as_str()) {
            return false;
        }

        if let Some(domain) = self.domain
            && record.domain.as_deref() != Some(domain.as_str())
        {
            return false;
        }

        if let Some(level) = self.level
            && record.details.level.as_deref() != Some(level.as_str())
        {
            return false;
        }

        true
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TaskSpec {
    pub name: String,
    pub domain: Domain,
    pub level: Level,
    pub strategy: ScoringStrategy,
    pub selector: TaskSelector,
}

impl TaskSpec {
    pub fn new(
        name: impl Into<String>,
        domain: Domain,
        level: Level,
        strategy: ScoringStrategy,
        selector: TaskSelector,
    ) -> Self {
        Self {
            name: name.into(),
            domain,
            level,
            strategy,
            selector,
        }
    }
}
