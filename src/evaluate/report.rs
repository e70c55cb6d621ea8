use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::tasks::{Domain, Level};

use super::error::EvalError;

/// One task's outcome. `Unavailable` serializes as JSON `null`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum TaskScore {
    Scalar(f64),
    Metrics(BTreeMap<String, f64>),
    Unavailable,
}

impl TaskScore {
    pub fn as_scalar(&self) -> Option<f64> {
        match self {
            TaskScore::Scalar(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_available(&self) -> bool {
        !matches!(self, TaskScore::Unavailable)
    }
}

/// `domain → level → task → score`, ordered at every level.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RunReport {
    scores: BTreeMap<Domain, BTreeMap<Level, BTreeMap<String, TaskScore>>>,
}

impl RunReport {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, domain: Domain, level: Level, task: impl Into<String>, score: TaskScore) {
        self.scores
            .entry(domain)
            .or_default()
            .entry(level)
            .or_default()
            .insert(task.into(), score);
    }

    pub fn get(&self, domain: Domain, level: Level, task: &str) -> Option<&TaskScore> {
        self.scores.get(&domain)?.get(&level)?.get(task)
    }

    /// Looks a task up by name alone.
    pub fn find(&self, task: &str) -> Option<&TaskScore> {
        self.iter()
            .find(|(_, _, name, _)| *name == task)
            .map(|(_, _, _, score)| score)
    }

    pub fn iter(&self) -> impl Iterator<Item = (Domain, Level, &str, &TaskScore)> {
        self.scores.iter().flat_map(|(&domain, levels)| {
            levels.iter().flat_map(move |(&level, tasks)| {
                tasks
                    .iter()
                    .map(move |(name, score)| (domain, level, name.as_str(), score))
            })
        })
    }

    /// Number of tasks in the report.
    pub fn len(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.scores.is_empty()
    }

    pub fn to_json_pretty(&self) -> Result<String, EvalError> {
        serde_json::to_string_pretty(self).map_err(|source| EvalError::Serialize { source })
    }

    /// Writes the pretty-printed report, creating parent directories as needed.
    pub fn write_to(&self, path: impl AsRef<Path>) -> Result<(), EvalError> {
        let path = path.as_ref();
        let io_err = |source| EvalError::Io {
            path: path.to_path_buf(),
            source,
        };

        if let Some(parent) = path.parent()
            && !parent.as_os_str().is_empty()
        {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(path, self.to_json_pretty()?).map_err(io_err)?;

        info!(path = %path.display(), tasks = self.len(), "Report written");
        Ok(())
    }
}
