//! JSON interchange
//!
//! The payload is an array of question objects in the record shape
//! (camelCase keys, `type` beside `content`). Items are read field by field
//! so one bad field does not hide the others.

use crate::decode::{malformed, malformed_content, unknown_type, Decoded};
use quiz_core::{Difficulty, Draft, Question, QuestionId, QuizError};
use quiz_registry::TypeRegistry;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

pub fn export(records: &[Question]) -> Result<String, QuizError> {
    serde_json::to_string_pretty(records).map_err(|e| QuizError::Parse(format!("json: {}", e)))
}

/// Parse the payload into its items
pub fn parse_payload(payload: &str) -> Result<Vec<Value>, QuizError> {
    match serde_json::from_str(payload) {
        Ok(Value::Array(items)) => Ok(items),
        Ok(_) => Err(QuizError::Parse("json: payload must be an array of questions".to_string())),
        Err(e) => Err(QuizError::Parse(format!("json: {}", e))),
    }
}

struct FieldReader<'a> {
    object: &'a Map<String, Value>,
    findings: Vec<quiz_core::Finding>,
}

impl<'a> FieldReader<'a> {
    /// Read `key`; absent and `null` are `None`, a bad value is a finding
    fn get<T: DeserializeOwned>(&mut self, key: &str) -> Option<T> {
        let value = self.object.get(key).filter(|v| !v.is_null())?;
        match T::deserialize(value) {
            Ok(v) => Some(v),
            Err(e) => {
                self.findings.push(malformed(key, e.to_string()));
                None
            }
        }
    }
}

pub(crate) fn decode_item(item: &Value, registry: &TypeRegistry) -> Decoded {
    let Some(object) = item.as_object() else {
        return Decoded::rejected(vec![malformed("", "Item is not a JSON object")]);
    };
    let mut fields = FieldReader {
        object,
        findings: Vec::new(),
    };

    let entry = match fields.get::<String>("type") {
        None => None,
        Some(tag) => match registry.resolve(&tag) {
            Ok(entry) => Some(entry),
            Err(e) => return Decoded::rejected(vec![unknown_type(&e)]),
        },
    };

    let difficulty = fields.get::<String>("difficulty").and_then(|text| match text.parse::<Difficulty>() {
        Ok(d) => Some(d),
        Err(e) => {
            fields.findings.push(malformed("difficulty", e.to_string()));
            None
        }
    });

    let mut draft = Draft {
        question_type: entry.map(|e| e.kind),
        title: fields.get("title").unwrap_or_default(),
        description: fields.get("description"),
        difficulty,
        topics: fields.get("topics").unwrap_or_default(),
        tags: fields.get("tags").unwrap_or_default(),
        xp_reward: fields.get("xpReward").unwrap_or(0),
        time_limit: fields.get("timeLimit"),
        hints: fields.get("hints").unwrap_or_default(),
        explanation: fields.get("explanation"),
        is_public: fields.get("isPublic").unwrap_or(false),
        content: None,
    };

    if let (Some(entry), Some(value)) = (entry, object.get("content").filter(|v| !v.is_null())) {
        match entry.decode(value.clone()) {
            Ok(content) => draft.content = Some(content),
            Err(e) => fields.findings.push(malformed_content(e.to_string())),
        }
    }

    let existing = fields
        .get::<String>("id")
        .filter(|id| !id.trim().is_empty())
        .map(QuestionId::new);
    Decoded::new(draft, existing, fields.findings)
}
