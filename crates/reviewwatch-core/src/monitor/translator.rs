//! Turns homework records into chat messages

use serde_json::{Map, Value};

use crate::error::{Result, ShapeError, ValueError};
use crate::models::{Homework, Verdict, REQUIRED_KEYS};

/// Build the status-change message for one homework record
pub fn parse_status(item: &Value) -> Result<String> {
    Ok(parse_homework(item)?.status_message())
}

/// Validate a raw record and convert it into a [`Homework`]
pub fn parse_homework(item: &Value) -> Result<Homework> {
    let Some(record) = item.as_object() else {
        return Err(ShapeError::NotAMapping { what: "homework" }.into());
    };

    let missing: Vec<&'static str> = REQUIRED_KEYS
        .into_iter()
        .filter(|key| !record.contains_key(*key))
        .collect();
    if !missing.is_empty() {
        return Err(ShapeError::MissingItemKeys(missing).into());
    }

    let homework_name = match &record["homework_name"] {
        Value::Null => String::new(),
        Value::String(name) => name.clone(),
        _ => {
            return Err(ShapeError::WrongType {
                key: "homework_name",
                expected: "строкой",
            }
            .into())
        }
    };
    if homework_name.is_empty() {
        return Err(ValueError::EmptyName {
            id: display_id(&record["id"]),
        }
        .into());
    }

    let status = match &record["status"] {
        Value::String(status) => status.parse::<Verdict>()?,
        other => return Err(ValueError::UnknownStatus(other.to_string()).into()),
    };

    Ok(Homework {
        id: record["id"].clone(),
        status,
        homework_name,
        reviewer_comment: optional_text(record, "reviewer_comment"),
        date_updated: optional_text(record, "date_updated"),
        lesson_name: optional_text(record, "lesson_name"),
    })
}

fn display_id(id: &Value) -> String {
    match id {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn optional_text(record: &Map<String, Value>, key: &str) -> Option<String> {
    record.get(key).and_then(Value::as_str).map(str::to_string)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use pretty_assertions::assert_eq;
    use rstest::rstest;
    use serde_json::json;

    fn homework(status: &str, name: &str) -> Value {
        json!({
            "id": 1,
            "status": status,
            "homework_name": name,
            "reviewer_comment": "",
            "date_updated": "",
            "lesson_name": "",
        })
    }

    #[test]
    fn test_approved_message() {
        let message = parse_status(&homework("approved", "Sprint 4")).unwrap();
        assert_eq!(
            message,
            "Изменился статус проверки работы \"Sprint 4\". Работа проверена: ревьюеру всё понравилось. Ура!"
        );
    }

    #[rstest]
    #[case("reviewing", "Работа взята на проверку ревьюером.")]
    #[case("rejected", "Работа проверена: у ревьюера есть замечания.")]
    fn test_other_verdicts(#[case] status: &str, #[case] phrase: &str) {
        let message = parse_status(&homework(status, "hw.zip")).unwrap();
        assert_eq!(
            message,
            format!("Изменился статус проверки работы \"hw.zip\". {phrase}")
        );
    }

    #[test]
    fn test_translation_is_deterministic() {
        let item = homework("rejected", "Sprint 7");
        assert_eq!(parse_status(&item).unwrap(), parse_status(&item).unwrap());
    }

    #[test]
    fn test_missing_keys_are_listed_exactly() {
        let item = json!({"id": 1, "status": "approved", "homework_name": "x"});
        match parse_status(&item) {
            Err(Error::Shape(ShapeError::MissingItemKeys(keys))) => {
                assert_eq!(keys, vec!["date_updated", "lesson_name", "reviewer_comment"]);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_every_single_missing_key_is_reported() {
        for key in REQUIRED_KEYS {
            let mut item = homework("approved", "x");
            item.as_object_mut().unwrap().remove(key);
            match parse_status(&item) {
                Err(Error::Shape(ShapeError::MissingItemKeys(keys))) => assert_eq!(keys, vec![key]),
                other => panic!("unexpected result for {key}: {other:?}"),
            }
        }
    }

    #[test]
    fn test_item_must_be_an_object() {
        assert!(matches!(
            parse_status(&json!(["approved"])),
            Err(Error::Shape(ShapeError::NotAMapping { .. }))
        ));
    }

    #[rstest]
    #[case(json!(""))]
    #[case(json!(null))]
    fn test_empty_name_mentions_id(#[case] name: Value) {
        let mut item = homework("approved", "x");
        item["homework_name"] = name;
        item["id"] = json!(12345);
        let err = parse_status(&item).unwrap_err();
        assert!(matches!(err, Error::Value(ValueError::EmptyName { ref id }) if id == "12345"));
        assert!(err.to_string().contains("id=12345"));
    }

    #[rstest]
    #[case(json!(5))]
    #[case(json!(["Sprint 4"]))]
    #[case(json!(true))]
    fn test_non_string_name_is_a_shape_error(#[case] name: Value) {
        let mut item = homework("approved", "x");
        item["homework_name"] = name;
        assert!(matches!(
            parse_status(&item),
            Err(Error::Shape(ShapeError::WrongType { key: "homework_name", .. }))
        ));
    }

    #[rstest]
    #[case("unknown")]
    #[case("")]
    #[case("APPROVED")]
    fn test_unknown_status(#[case] status: &str) {
        let err = parse_status(&homework(status, "x")).unwrap_err();
        assert!(matches!(err, Error::Value(ValueError::UnknownStatus(ref s)) if s == status));
        assert!(err.to_string().contains(&format!("\"{status}\"")));
    }

    #[test]
    fn test_parse_homework_keeps_optional_fields() {
        let mut item = homework("reviewing", "Sprint 1");
        item["reviewer_comment"] = json!("Looks good");
        item["lesson_name"] = json!(null);
        let parsed = parse_homework(&item).unwrap();
        assert_eq!(parsed.status, Verdict::Reviewing);
        assert_eq!(parsed.reviewer_comment.as_deref(), Some("Looks good"));
        assert_eq!(parsed.lesson_name, None);
        assert_eq!(parsed.id, json!(1));
    }
}
