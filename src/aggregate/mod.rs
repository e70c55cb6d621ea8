//! Reduces judge verdict texts to one task score.

pub mod error;


pub use error::AggregateError;

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::judge::JudgeResponse;

/// How a judge phrases its verdict.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum VerdictGrammar {
    /// Free text; "yes" anywhere (any case) means correct.
    TrueFalse,
    /// `... Rating: N ...` with a single digit `N`.
    Rating,
    /// `... (X) ...` with `X` one of `A`..`E`.
    Lettered,
}

impl VerdictGrammar {
    pub fn as_str(self) -> &'static str {
        match self {
            VerdictGrammar::TrueFalse => "T/F",
            VerdictGrammar::Rating => "score",
            VerdictGrammar::Lettered => "MCQ",
        }
    }

    /// The verdict's numeric value, or `None` if the text is out of grammar.
    pub fn interpret(self, verdict: &str) -> Option<f64> {
        match self {
            VerdictGrammar::TrueFalse => Some(if verdict.to_lowercase().contains("yes") {
                1.0
            } else {
                0.0
            }),
            VerdictGrammar::Rating => {
                let (_, rest) = verdict.split_once("Rating:")?;
                let digit = rest.trim_start().chars().next()?.to_digit(10)?;
                Some(f64::from(digit))
            }
            VerdictGrammar::Lettered => {
                let (_, rest) = verdict.split_once('(')?;
                letter_value(rest.chars().next()?)
            }
        }
    }
}

fn letter_value(letter: char) -> Option<f64> {
    match letter {
        'A' => Some(0.5),
        'B' => Some(0.75),
        'C' => Some(1.0),
        'D' => Some(0.25),
        'E' => Some(0.0),
        _ => None,
    }
}

impl fmt::Display for VerdictGrammar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for VerdictGrammar {
    type Err = AggregateError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "T/F" => Ok(VerdictGrammar::TrueFalse),
            "score" => Ok(VerdictGrammar::Rating),
            "MCQ" => Ok(VerdictGrammar::Lettered),
            other => Err(AggregateError::UnknownGrammar {
                tag: other.to_string(),
            }),
        }
    }
}

impl TryFrom<String> for VerdictGrammar {
    type Error = AggregateError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<VerdictGrammar> for String {
    fn from(value: VerdictGrammar) -> Self {
        value.as_str().to_string()
    }
}

/// Mean verdict value over in-grammar texts; `0.0` if none qualify.
pub fn aggregate<S: AsRef<str>>(grammar: VerdictGrammar, verdicts: &[S]) -> f64 {
    let values: Vec<f64> = verdicts
        .iter()
        .filter_map(|v| grammar.interpret(v.as_ref()))
        .collect();

    debug!(
        %grammar,
        verdicts = verdicts.len(),
        in_grammar = values.len(),
        "Aggregating judge verdicts"
    );

    if values.is_empty() {
        0.0
    } else {
        values.iter().sum::<f64>() / values.len() as f64
    }
}

/// [`aggregate`] over client output; failure sentinels read as empty text.
pub fn aggregate_responses(grammar: VerdictGrammar, responses: &[JudgeResponse]) -> f64 {
    let texts: Vec<&str> = responses.iter().map(JudgeResponse::text_or_empty).collect();
    aggregate(grammar, &texts)
}
