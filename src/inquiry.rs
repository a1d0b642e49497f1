//! Interactive inquiry phase.
//!
//! Service and plugin modules declare the questions they want answered; this
//! module presents them through `dialoguer` and records the answers. In
//! non-interactive mode no prompt is ever shown and the result stays empty.

use dialoguer::{Confirm, Input, MultiSelect, Select};
use serde_json::Value;

use crate::error::Result;

/// Answers keyed by question name. Produced once per inquiry pass and
/// immutable afterwards.
pub type InquiryResult = serde_json::Map<String, Value>;

/// The kind of prompt a question is presented as.
#[derive(Debug, Clone, PartialEq)]
pub enum QuestionKind {
    Text,
    Confirm,
    Select,
    MultiSelect,
}

/// A single prompt produced by a module's inquiry hook.
#[derive(Debug, Clone)]
pub struct Question {
    /// Key under which the answer is recorded
    pub name: String,
    /// Help text shown to the user
    pub message: String,
    pub kind: QuestionKind,
    /// Default answer, interpreted per kind
    pub default: Value,
    /// Available choices for select questions
    pub choices: Vec<String>,
}

impl Question {
    pub fn text(name: &str, message: &str) -> Self {
        Self {
            name: name.to_string(),
            message: message.to_string(),
            kind: QuestionKind::Text,
            default: Value::Null,
            choices: Vec::new(),
        }
    }

    pub fn confirm(name: &str, message: &str) -> Self {
        Self { kind: QuestionKind::Confirm, ..Self::text(name, message) }
    }

    pub fn select(name: &str, message: &str, choices: Vec<String>) -> Self {
        Self { kind: QuestionKind::Select, choices, ..Self::text(name, message) }
    }

    pub fn multi_select(name: &str, message: &str, choices: Vec<String>) -> Self {
        Self { kind: QuestionKind::MultiSelect, choices, ..Self::text(name, message) }
    }

    pub fn with_default(mut self, default: Value) -> Self {
        self.default = default;
        self
    }
}

/// Presents every question in order and collects the answers.
///
/// Returns `None` without prompting when `non_interactive` is set, regardless
/// of what the questions would otherwise ask.
pub fn prompt_all(questions: &[Question], non_interactive: bool) -> Result<Option<InquiryResult>> {
    if non_interactive {
        log::debug!("Non-interactive mode, skipping {} question(s)", questions.len());
        return Ok(None);
    }

    let mut answers = InquiryResult::new();
    for question in questions {
        let answer = ask_question(question)?;
        answers.insert(question.name.clone(), answer);
    }
    Ok(Some(answers))
}

/// Presents a single question through the matching dialoguer prompt.
pub fn ask_question(question: &Question) -> Result<Value> {
    match question.kind {
        QuestionKind::Text => prompt_text(question),
        QuestionKind::Confirm => prompt_confirm(question),
        QuestionKind::Select => prompt_select(question),
        QuestionKind::MultiSelect => prompt_multi_select(question),
    }
}

fn default_string(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        _ => value.to_string(),
    }
}

fn prompt_text(question: &Question) -> Result<Value> {
    let input = Input::new()
        .with_prompt(&question.message)
        .default(default_string(&question.default))
        .interact_text()?;
    Ok(Value::String(input))
}

fn prompt_confirm(question: &Question) -> Result<Value> {
    let default_value = question.default.as_bool().unwrap_or(false);
    let result = Confirm::new()
        .with_prompt(&question.message)
        .default(default_value)
        .interact()?;
    Ok(Value::Bool(result))
}

fn prompt_select(question: &Question) -> Result<Value> {
    let default_index = question
        .default
        .as_str()
        .and_then(|default| question.choices.iter().position(|choice| choice == default))
        .unwrap_or(0);
    let selection = Select::new()
        .with_prompt(&question.message)
        .items(&question.choices)
        .default(default_index)
        .interact()?;
    Ok(Value::String(question.choices[selection].clone()))
}

fn prompt_multi_select(question: &Question) -> Result<Value> {
    let selections = MultiSelect::new()
        .with_prompt(&question.message)
        .items(&question.choices)
        .interact()?;
    let chosen = selections
        .into_iter()
        .map(|index| Value::String(question.choices[index].clone()))
        .collect();
    Ok(Value::Array(chosen))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn non_interactive_mode_skips_all_prompts() {
        let questions = vec![
            Question::text("projectName", "Project name"),
            Question::confirm("useGit", "Initialize git repository?"),
        ];
        let result = prompt_all(&questions, true).unwrap();
        assert!(result.is_none());
    }

    #[test]
    fn empty_question_list_yields_empty_answers() {
        let result = prompt_all(&[], false).unwrap();
        assert_eq!(result, Some(InquiryResult::new()));
    }

    #[test]
    fn question_builders_set_kind_and_default() {
        let question =
            Question::select("lang", "Language", vec!["js".into(), "ts".into()])
                .with_default(json!("ts"));
        assert_eq!(question.kind, QuestionKind::Select);
        assert_eq!(question.default, json!("ts"));
        assert_eq!(question.choices, vec!["js", "ts"]);
    }

    #[test]
    fn default_string_renders_non_strings() {
        assert_eq!(default_string(&json!("abc")), "abc");
        assert_eq!(default_string(&Value::Null), "");
        assert_eq!(default_string(&json!(42)), "42");
    }
}
