//! Structural checks for the status endpoint payload

use serde_json::Value;

use crate::error::{Result, ShapeError};
use crate::models::PollResponse;

/// Check that the payload matches the documented response shape
pub fn validate_response(payload: &Value) -> Result<()> {
    checked_parts(payload).map(|_| ())
}

/// Validate the payload and take it apart into a [`PollResponse`]
pub fn into_poll_response(payload: Value) -> Result<PollResponse> {
    let (homeworks, current_date) = checked_parts(&payload)?;

    Ok(PollResponse {
        homeworks: homeworks.to_vec(),
        current_date,
    })
}

/// The `homeworks` list and the `current_date` cursor of a well-formed payload
fn checked_parts(payload: &Value) -> Result<(&[Value], i64)> {
    let Some(object) = payload.as_object() else {
        return Err(ShapeError::NotAMapping { what: "Ответ API" }.into());
    };

    let homeworks = object
        .get("homeworks")
        .ok_or(ShapeError::MissingKey("homeworks"))?;
    let current_date = object
        .get("current_date")
        .ok_or(ShapeError::MissingKey("current_date"))?;

    let homeworks = homeworks.as_array().ok_or(ShapeError::WrongType {
        key: "homeworks",
        expected: "списком",
    })?;
    let current_date = current_date.as_i64().ok_or(ShapeError::WrongType {
        key: "current_date",
        expected: "целым числом",
    })?;

    Ok((homeworks.as_slice(), current_date))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use rstest::rstest;
    use serde_json::json;

    fn shape_error(payload: Value) -> ShapeError {
        match validate_response(&payload) {
            Err(Error::Shape(err)) => err,
            other => panic!("expected a shape error, got {other:?}"),
        }
    }

    #[test]
    fn test_valid_response() {
        let payload = json!({"homeworks": [], "current_date": 1_700_000_000});
        assert!(validate_response(&payload).is_ok());
    }

    #[rstest]
    #[case(json!([]))]
    #[case(json!("homeworks"))]
    #[case(json!(null))]
    #[case(json!(42))]
    fn test_not_a_mapping(#[case] payload: Value) {
        assert!(matches!(shape_error(payload), ShapeError::NotAMapping { .. }));
    }

    #[rstest]
    #[case(json!({"current_date": 1}), "homeworks")]
    #[case(json!({"homeworks": []}), "current_date")]
    #[case(json!({}), "homeworks")]
    fn test_missing_key(#[case] payload: Value, #[case] key: &'static str) {
        assert_eq!(shape_error(payload), ShapeError::MissingKey(key));
    }

    #[rstest]
    #[case(json!({"homeworks": {}, "current_date": 1}))]
    #[case(json!({"homeworks": "[]", "current_date": 1}))]
    #[case(json!({"homeworks": null, "current_date": 1}))]
    fn test_homeworks_not_a_list(#[case] payload: Value) {
        assert!(matches!(
            shape_error(payload),
            ShapeError::WrongType { key: "homeworks", .. }
        ));
    }

    #[test]
    fn test_current_date_must_be_integer() {
        let payload = json!({"homeworks": [], "current_date": "yesterday"});
        assert!(matches!(
            shape_error(payload),
            ShapeError::WrongType { key: "current_date", .. }
        ));
    }

    #[rstest]
    #[case(json!({"homeworks": []}), ShapeError::MissingKey("current_date"))]
    #[case(
        json!({"homeworks": 5, "current_date": 1}),
        ShapeError::WrongType { key: "homeworks", expected: "списком" }
    )]
    #[case(
        json!({"homeworks": [], "current_date": 1.5}),
        ShapeError::WrongType { key: "current_date", expected: "целым числом" }
    )]
    fn test_into_poll_response_reports_same_error_as_validation(
        #[case] payload: Value,
        #[case] expected: ShapeError,
    ) {
        assert_eq!(shape_error(payload.clone()), expected);
        match into_poll_response(payload) {
            Err(Error::Shape(err)) => assert_eq!(err, expected),
            other => panic!("expected a shape error, got {other:?}"),
        }
    }

    #[test]
    fn test_into_poll_response_keeps_order() {
        let payload = json!({
            "homeworks": [{"id": 1}, {"id": 2}],
            "current_date": 1_700_000_123,
        });
        let response = into_poll_response(payload).unwrap();
        assert_eq!(response.current_date, 1_700_000_123);
        assert_eq!(response.homeworks, vec![json!({"id": 1}), json!({"id": 2})]);
    }
}
