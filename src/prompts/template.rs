use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::info;

use crate::aggregate::VerdictGrammar;
use crate::judge::Conversation;
use crate::record::ExampleRecord;

use super::error::PromptError;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PromptTemplate {
    pub system: String,
    pub user: String,
    /// Verdict grammar tag; validated when the template is used.
    #[serde(rename = "type")]
    pub kind: String,
}

impl PromptTemplate {
    pub fn new(
        system: impl Into<String>,
        user: impl Into<String>,
        grammar: VerdictGrammar,
    ) -> Self {
        Self {
            system: system.into(),
            user: user.into(),
            kind: grammar.as_str().to_string(),
        }
    }

    pub fn grammar(&self) -> Result<VerdictGrammar, PromptError> {
        Ok(self.kind.parse()?)
    }

    /// System turn plus the user template filled from `record`.
    pub fn render(&self, record: &ExampleRecord) -> Result<Conversation, PromptError> {
        let fields = serde_json::to_value(record).map_err(|source| PromptError::Parse { source })?;
        let user = render_fields(&self.user, &fields)?;
        Ok(Conversation::new().system(self.system.clone()).user(user))
    }
}

/// Replaces each `{name}` in `template` with `fields[name]` (or `fields.details[name]`).
///
/// Strings are inserted verbatim; other JSON values as compact JSON.
pub fn render_fields(template: &str, fields: &Value) -> Result<String, PromptError> {
    let mut out = String::with_capacity(template.len());
    let mut chars = template.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '{' if chars.peek() == Some(&'{') => {
                chars.next();
                out.push('{');
            }
            '}' if chars.peek() == Some(&'}') => {
                chars.next();
                out.push('}');
            }
            '{' => {
                let mut name = String::new();
                loop {
                    match chars.next() {
                        Some('}') => break,
                        Some('{') | None => {
                            return Err(PromptError::MalformedTemplate {
                                reason: format!("unclosed field '{{{name}'"),
                            });
                        }
                        Some(ch) => name.push(ch),
                    }
                }
                out.push_str(&lookup(fields, name.trim())?);
            }
            '}' => {
                return Err(PromptError::MalformedTemplate {
                    reason: "single '}' encountered".to_string(),
                });
            }
            other => out.push(other),
        }
    }

    Ok(out)
}

fn lookup(fields: &Value, name: &str) -> Result<String, PromptError> {
    let value = fields
        .get(name)
        .or_else(|| fields.get("details").and_then(|d| d.get(name)))
        .ok_or_else(|| PromptError::MissingField {
            field: name.to_string(),
        })?;

    Ok(match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    })
}

/// Named templates loaded from one file.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PromptLibrary {
    templates: BTreeMap<String, PromptTemplate>,
}

impl PromptLibrary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, PromptError> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|source| PromptError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let library = Self::from_json_str(&raw)?;
        info!(path = %path.display(), templates = library.len(), "Prompt templates loaded");
        Ok(library)
    }

    pub fn from_json_str(raw: &str) -> Result<Self, PromptError> {
        let templates = serde_json::from_str(raw).map_err(|source| PromptError::Parse { source })?;
        Ok(Self { templates })
    }

    pub fn with_template(mut self, name: impl Into<String>, template: PromptTemplate) -> Self {
        self.templates.insert(name.into(), template);
        self
    }

    pub fn get(&self, name: &str) -> Result<&PromptTemplate, PromptError> {
        self.templates
            .get(name)
            .ok_or_else(|| PromptError::UnknownTemplate {
                name: name.to_string(),
            })
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.templates.keys().map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.templates.len()
    }

    pub fn is_empty(&self) -> bool {
        self.templates.is_empty()
    }
}
