use std::borrow::Cow;

use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

/// Gold answer: usually text, occasionally structured JSON.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Answer {
    Text(String),
    Other(Value),
}

impl Answer {
    /// Text form; non-string answers are rendered as compact JSON.
    pub fn as_text(&self) -> Cow<'_, str> {
        match self {
            Answer::Text(s) => Cow::Borrowed(s),
            Answer::Other(v) => Cow::Owned(v.to_string()),
        }
    }

    pub fn is_empty(&self) -> bool {
        match self {
            Answer::Text(s) => s.is_empty(),
            Answer::Other(Value::Null) => true,
            Answer::Other(_) => false,
        }
    }
}

impl Default for Answer {
    fn default() -> Self {
        Answer::Text(String::new())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecordDetails {
    #[serde(default)]
    pub task: Option<String>,
    #[serde(default)]
    pub subtask: Option<String>,
    #[serde(default)]
    pub level: Option<String>,
}

/// Multiple-choice options, label-aligned (`label[i]` names `text[i]`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Choices {
    #[serde(default)]
    pub text: Vec<Value>,
    #[serde(default)]
    pub label: Vec<String>,
}

impl Choices {
    /// Option text for `label`; non-string options are rendered as JSON.
    pub fn text_for(&self, label: &str) -> Option<String> {
        let index = self.label.iter().position(|l| l == label)?;
        self.text.get(index).map(option_text)
    }

    /// Texts of every option except `label`.
    pub fn texts_except(&self, label: &str) -> Vec<String> {
        self.label
            .iter()
            .zip(&self.text)
            .filter(|(l, _)| l.as_str() != label)
            .map(|(_, t)| option_text(t))
            .collect()
    }
}

fn option_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExampleRecord {
    /// Model output; `null` when generation failed.
    #[serde(default)]
    pub response: Option<String>,

    #[serde(default)]
    pub answer: Answer,

    /// Question type, e.g. `mcq-4-choices`, `true_or_false`, `filling`.
    /// Some datasets store it as a list; the first entry wins.
    #[serde(
        rename = "type",
        default,
        deserialize_with = "one_or_first",
        skip_serializing_if = "Option::is_none"
    )]
    pub record_type: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub domain: Option<String>,

    #[serde(default)]
    pub details: RecordDetails,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub choices: Option<Choices>,

    #[serde(
        rename = "answerKey",
        default,
        skip_serializing_if = "Option::is_none"
    )]
    pub answer_key: Option<String>,

    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ExampleRecord {
    pub fn response_text(&self) -> Option<&str> {
        self.response.as_deref()
    }

    pub fn answer_text(&self) -> Cow<'_, str> {
        self.answer.as_text()
    }

    pub fn record_type(&self) -> &str {
        self.record_type.as_deref().unwrap_or_default()
    }

    pub fn is_multiple_choice(&self) -> bool {
        self.record_type().contains("mcq")
    }
}

fn one_or_first<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum OneOrMany {
        One(String),
        Many(Vec<String>),
    }

    Ok(
        match Option::<OneOrMany>::deserialize(deserializer)? {
            None => None,
            Some(OneOrMany::One(s)) => Some(s),
            Some(OneOrMany::Many(v)) => v.into_iter().next(),
        },
    )
}
