//! Exact-rule scorers for closed-form answers.

use tracing::debug;

use crate::record::ExampleRecord;

use super::error::ScoringError;

const MCQ_FALLBACK_KEYS: [char; 4] = ['D', 'C', 'B', 'A'];

/// True/false verdict check against a `Yes` / `No` answer.
pub fn true_false_correct(response: &str, answer: &str) -> bool {
    let response = response.trim().to_lowercase();
    if response.contains(&answer.to_lowercase()) {
        return true;
    }
    if response.contains("true") {
        answer == "Yes"
    } else if response.contains("false") {
        answer == "No"
    } else {
        false
    }
}

/// Multiple-choice check against `answerKey`.
///
/// A bare letter must equal the key. Otherwise the response is correct if it quotes the
/// correct option's text and no wrong option's text; failing that, the first of
/// `D, C, B, A` that appears in letter position decides.
pub fn multiple_choice_correct(record: &ExampleRecord) -> Result<bool, ScoringError> {
    let Some(response) = record.response_text() else {
        return Ok(false);
    };
    let response = response.trim();
    let key = record
        .answer_key
        .as_deref()
        .ok_or_else(|| ScoringError::InvalidInput {
            reason: "multiple-choice record has no answerKey".to_string(),
        })?;

    let mut chars = response.chars();
    let Some(first) = chars.next() else {
        return Ok(false);
    };
    if chars.next().is_none() {
        return Ok(response == key);
    }

    let choices = record
        .choices
        .as_ref()
        .ok_or_else(|| ScoringError::InvalidInput {
            reason: "multiple-choice record has no choices".to_string(),
        })?;
    let correct = choices
        .text_for(key)
        .ok_or_else(|| ScoringError::InvalidInput {
            reason: format!("answerKey '{key}' is not a choice label"),
        })?;

    if response.contains(&correct)
        && !choices
            .texts_except(key)
            .iter()
            .any(|wrong| response.contains(wrong.as_str()))
    {
        return Ok(true);
    }

    for candidate in MCQ_FALLBACK_KEYS {
        if letter_selected(response, first, candidate) {
            return Ok(key.len() == 1 && key.starts_with(candidate));
        }
    }
    Ok(false)
}

fn letter_selected(response: &str, first: char, key: char) -> bool {
    first == key
        || [
            format!("{key}."),
            format!("{key}\n"),
            format!("{key})"),
            format!("{key} "),
            format!("\"{key}"),
            format!("{key}\""),
        ]
        .iter()
        .any(|pattern| response.contains(pattern.as_str()))
}

/// Accuracy over a mix of true/false and multiple-choice records.
///
/// Records with no response count as wrong. Empty input scores `0.0`.
pub fn score_classification(records: &[&ExampleRecord]) -> Result<f64, ScoringError> {
    if records.is_empty() {
        return Ok(0.0);
    }

    let mut correct = 0usize;
    for record in records {
        let Some(response) = record.response_text() else {
            continue;
        };
        let record_type = record.record_type();
        let hit = if record.is_multiple_choice() {
            multiple_choice_correct(record)?
        } else if record_type.contains("true") {
            true_false_correct(response, &record.answer_text())
        } else {
            return Err(ScoringError::UnknownRecordType {
                record_type: record_type.to_string(),
                scorer: "classification",
            });
        };
        correct += usize::from(hit);
    }

    debug!(correct, total = records.len(), "Classification scored");
    Ok(correct as f64 / records.len() as f64)
}

/// Reaction prediction / retrosynthesis: multiple-choice or product filling.
///
/// A filling response is split on `.` into candidate fragments; it is correct if any
/// non-empty fragment occurs in the answer.
pub fn score_reaction(records: &[&ExampleRecord]) -> Result<f64, ScoringError> {
    if records.is_empty() {
        return Ok(0.0);
    }

    let mut correct = 0usize;
    for record in records {
        let record_type = record.record_type();
        let hit = if record.is_multiple_choice() {
            multiple_choice_correct(record)?
        } else if matches!(record_type, "filling" | "reaction-filling") {
            let answer = record.answer_text();
            record.response_text().is_some_and(|response| {
                response
                    .trim()
                    .split('.')
                    .any(|fragment| !fragment.is_empty() && answer.contains(fragment))
            })
        } else {
            return Err(ScoringError::UnknownRecordType {
                record_type: record_type.to_string(),
                scorer: "reaction",
            });
        };
        correct += usize::from(hit);
    }

    debug!(correct, total = records.len(), "Reaction scored");
    Ok(correct as f64 / records.len() as f64)
}

/// Fraction of records whose trimmed response contains the trimmed answer.
pub fn score_filling(records: &[&ExampleRecord]) -> f64 {
    if records.is_empty() {
        return 0.0;
    }

    let correct = records
        .iter()
        .filter(|record| {
            record
                .response_text()
                .is_some_and(|response| response.trim().contains(record.answer_text().trim()))
        })
        .count();

    correct as f64 / records.len() as f64
}
