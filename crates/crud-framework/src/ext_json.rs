//! The extended-JSON payloads consumed by grid/form widgets.
//!
//! Records are wrapped with a success flag and their attributes are keyed the
//! way form fields are named (`strange_rabbit[name]`). Collections are
//! `{"results": <count>, "rows": [...]}`. Payloads are standard JSON.

use crate::error::CrudError;
use crate::validation::{ValidationErrors, BASE};
use serde::Serialize;
use serde_json::{json, Map, Value};

/// `{"success": true, "data": {"<key>[<attr>]": value, ...}}`.
pub fn record<T: Serialize>(key: &str, item: &T) -> Result<Value, CrudError> {
    let data = match serde_json::to_value(item)? {
        Value::Object(fields) => fields
            .into_iter()
            .map(|(attr, value)| (field_name(key, &attr), value))
            .collect::<Map<_, _>>(),
        other => {
            return Err(CrudError::Serialization(format!(
                "{} serialized to {}, expected an object",
                key, other
            )))
        }
    };
    Ok(json!({ "success": true, "data": data }))
}

/// `{"results": total, "rows": [...]}` with plain record objects as rows.
pub fn collection<T: Serialize>(items: &[T], total: usize) -> Result<Value, CrudError> {
    let rows = items
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(json!({ "results": total, "rows": rows }))
}

pub fn success() -> Value {
    json!({ "success": true })
}

pub fn failure() -> Value {
    json!({ "success": false })
}

/// `{"success": false, "errors": {"<key>[<attr>]": "msg, msg"}}`; base errors
/// stay under `base`.
pub fn invalid(key: &str, errors: &ValidationErrors) -> Value {
    let fields: Map<String, Value> = errors
        .iter()
        .map(|(attr, messages)| {
            let name = if attr == BASE {
                BASE.to_string()
            } else {
                field_name(key, attr)
            };
            (name, Value::String(messages.join(", ")))
        })
        .collect();
    json!({ "success": false, "errors": fields })
}

pub fn to_body(payload: &Value) -> Result<String, CrudError> {
    Ok(serde_json::to_string(payload)?)
}

fn field_name(key: &str, attr: &str) -> String {
    format!("{}[{}]", key, attr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Flange {
        id: u32,
        title: String,
    }

    #[test]
    fn test_record_payload_uses_form_field_names() {
        let payload = record("flange", &Flange { id: 4, title: "Wide".into() }).unwrap();
        assert_eq!(
            payload,
            json!({"success": true, "data": {"flange[id]": 4, "flange[title]": "Wide"}})
        );
    }

    #[test]
    fn test_non_object_record_is_rejected() {
        assert!(matches!(
            record("flange", &42),
            Err(CrudError::Serialization(_))
        ));
    }

    #[test]
    fn test_collection_payload() {
        let items = vec![
            Flange { id: 1, title: "A".into() },
            Flange { id: 2, title: "B".into() },
        ];
        let payload = collection(&items, 2).unwrap();
        assert_eq!(payload["results"], 2);
        assert_eq!(payload["rows"][1], json!({"id": 2, "title": "B"}));
    }

    #[test]
    fn test_invalid_payload() {
        let mut errors = ValidationErrors::new();
        errors.add("name", "can't be blank");
        errors.add("name", "is too short");
        errors.add_to_base("Rabbit is hiding");
        let payload = invalid("strange_rabbit", &errors);
        assert_eq!(
            payload,
            json!({
                "success": false,
                "errors": {
                    "strange_rabbit[name]": "can't be blank, is too short",
                    "base": "Rabbit is hiding"
                }
            })
        );
    }

    #[test]
    fn test_flags_serialize_as_standard_json() {
        assert_eq!(to_body(&failure()).unwrap(), r#"{"success":false}"#);
        assert_eq!(to_body(&success()).unwrap(), r#"{"success":true}"#);
    }
}
