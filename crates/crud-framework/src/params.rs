//! Request parameter decoding.
//!
//! Query strings and urlencoded form bodies use bracket nesting, so
//! `flange[title]=Wide&flange[tags][]=a` becomes
//! `{"flange": {"title": "Wide", "tags": ["a"]}}`. Form values stay strings;
//! resources that want numbers read them through [`coerce`].

use crate::error::CrudError;
use serde_json::{Map, Value};

/// Decoded request parameters.
pub type Params = Map<String, Value>;

/// Decode an urlencoded string (query string or form body).
pub fn parse_urlencoded(input: &str) -> Params {
    let mut params = Params::new();
    for pair in input.split('&').filter(|pair| !pair.is_empty()) {
        let (key, value) = pair.split_once('=').unwrap_or((pair, ""));
        let key = decode_component(key);
        if key.is_empty() {
            continue;
        }
        insert_nested(&mut params, &key, Value::String(decode_component(value)));
    }
    params
}

/// Decode a JSON object body. An empty body is no parameters; anything
/// else that is not an object is a [`CrudError::BadRequest`].
pub fn parse_json(body: &str) -> Result<Params, CrudError> {
    if body.trim().is_empty() {
        return Ok(Params::new());
    }
    let value: Value = serde_json::from_str(body)
        .map_err(|e| CrudError::BadRequest(format!("malformed JSON body: {}", e)))?;
    match value {
        Value::Object(params) => Ok(params),
        other => Err(CrudError::BadRequest(format!(
            "expected a JSON object, got {}",
            other
        ))),
    }
}

/// Copy `from` into `into`; maps are merged key by key, anything else
/// replaces what was there.
pub fn merge(into: &mut Params, from: Params) {
    for (key, value) in from {
        let slot = into.entry(key).or_insert(Value::Null);
        match (slot, value) {
            (Value::Object(existing), Value::Object(incoming)) => merge(existing, incoming),
            (slot, value) => *slot = value,
        }
    }
}

fn decode_component(raw: &str) -> String {
    let spaced = raw.replace('+', " ");
    urlencoding::decode(&spaced)
        .map(|decoded| decoded.into_owned())
        .unwrap_or(spaced)
}

/// `a[b][c]` -> `["a", "b", "c"]`, `a[]` -> `["a", ""]`.
fn split_key(key: &str) -> Vec<&str> {
    match key.find('[') {
        Some(open) if key.ends_with(']') && open > 0 => {
            let mut parts = vec![&key[..open]];
            parts.extend(key[open + 1..key.len() - 1].split("]["));
            parts
        }
        _ => vec![key],
    }
}

fn insert_nested(params: &mut Params, key: &str, value: Value) {
    let parts = split_key(key);
    insert_path(params, &parts, value);
}

fn insert_path(map: &mut Params, parts: &[&str], value: Value) {
    let Some((&head, rest)) = parts.split_first() else {
        return;
    };
    match rest.first() {
        None => {
            map.insert(head.to_string(), value);
        }
        Some(&"") => {
            let slot = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Array(Vec::new()));
            match slot {
                Value::Array(items) => items.push(value),
                other => *other = Value::Array(vec![value]),
            }
        }
        Some(_) => {
            let slot = map
                .entry(head.to_string())
                .or_insert_with(|| Value::Object(Map::new()));
            if !slot.is_object() {
                *slot = Value::Object(Map::new());
            }
            if let Value::Object(child) = slot {
                insert_path(child, rest, value);
            }
        }
    }
}

/// Deserializers for attributes that arrive as strings from HTML forms but
/// as native values from JSON.
///
/// ```
/// use crud_framework::params::coerce;
/// use serde::Deserialize;
///
/// #[derive(Deserialize)]
/// struct Attrs {
///     #[serde(default, deserialize_with = "coerce::optional_number")]
///     ear_count: Option<u32>,
/// }
///
/// let form: Attrs = serde_json::from_str(r#"{"ear_count": "4"}"#).unwrap();
/// let json: Attrs = serde_json::from_str(r#"{"ear_count": 4}"#).unwrap();
/// let blank: Attrs = serde_json::from_str(r#"{"ear_count": ""}"#).unwrap();
/// assert_eq!((form.ear_count, json.ear_count, blank.ear_count), (Some(4), Some(4), None));
/// ```
pub mod coerce {
    use serde::de::{self, Deserialize, Deserializer};
    use std::fmt::Display;
    use std::str::FromStr;

    #[derive(serde::Deserialize)]
    #[serde(untagged)]
    enum Lenient<N> {
        Native(N),
        Text(String),
    }

    /// A number, or a string holding one.
    pub fn number<'de, D, N>(deserializer: D) -> Result<N, D::Error>
    where
        D: Deserializer<'de>,
        N: Deserialize<'de> + FromStr,
        N::Err: Display,
    {
        match Lenient::<N>::deserialize(deserializer)? {
            Lenient::Native(n) => Ok(n),
            Lenient::Text(s) => s.trim().parse().map_err(de::Error::custom),
        }
    }

    /// Like [`number`], but `null` and blank strings are `None`.
    pub fn optional_number<'de, D, N>(deserializer: D) -> Result<Option<N>, D::Error>
    where
        D: Deserializer<'de>,
        N: Deserialize<'de> + FromStr,
        N::Err: Display,
    {
        match Option::<Lenient<N>>::deserialize(deserializer)? {
            None => Ok(None),
            Some(Lenient::Native(n)) => Ok(Some(n)),
            Some(Lenient::Text(s)) if s.trim().is_empty() => Ok(None),
            Some(Lenient::Text(s)) => s.trim().parse().map(Some).map_err(de::Error::custom),
        }
    }

    /// `true`/`false`, or the strings a checkbox sends (`"1"`, `"0"`, `"on"`...).
    pub fn flag<'de, D>(deserializer: D) -> Result<bool, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Lenient::<bool>::deserialize(deserializer)? {
            Lenient::Native(b) => Ok(b),
            Lenient::Text(s) => match s.trim().to_ascii_lowercase().as_str() {
                "1" | "true" | "on" | "yes" => Ok(true),
                "0" | "false" | "off" | "no" | "" => Ok(false),
                other => Err(de::Error::custom(format!("invalid flag: {}", other))),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_nested_form_fields() {
        let params = parse_urlencoded(
            "strange_rabbit%5Bname%5D=Harvey+the+Tall&strange_rabbit[ear_count]=3&commit=Create",
        );
        assert_eq!(
            Value::Object(params),
            json!({
                "strange_rabbit": {"name": "Harvey the Tall", "ear_count": "3"},
                "commit": "Create"
            })
        );
    }

    #[test]
    fn test_arrays_and_deep_nesting() {
        let params = parse_urlencoded("f[tags][]=a&f[tags][]=b&f[size][inner]=2&flag");
        assert_eq!(
            Value::Object(params),
            json!({"f": {"tags": ["a", "b"], "size": {"inner": "2"}}, "flag": ""})
        );
    }

    #[test]
    fn test_odd_keys() {
        let params = parse_urlencoded("=x&&[a]=1&b[=2");
        assert_eq!(Value::Object(params), json!({"[a]": "1", "b[": "2"}));
    }

    #[test]
    fn test_json_body() {
        let params = parse_json(r#"{"flange": {"title": "Wide"}}"#).unwrap();
        assert_eq!(params["flange"]["title"], "Wide");
        assert!(parse_json("  ").unwrap().is_empty());
        assert!(matches!(parse_json("[1]"), Err(CrudError::BadRequest(_))));
        assert!(matches!(parse_json("{oops"), Err(CrudError::BadRequest(_))));
    }

    #[test]
    fn test_merge_prefers_incoming_values() {
        let mut params = parse_urlencoded("format=xml&flange[title]=A&flange[size]=1");
        merge(&mut params, parse_json(r#"{"flange": {"title": "B"}, "format": "ext_json"}"#).unwrap());
        assert_eq!(
            Value::Object(params),
            json!({"format": "ext_json", "flange": {"title": "B", "size": "1"}})
        );
    }

    #[test]
    fn test_coerce_flag() {
        #[derive(serde::Deserialize)]
        struct Attrs {
            #[serde(deserialize_with = "coerce::flag")]
            fluffy: bool,
        }
        let on: Attrs = serde_json::from_value(json!({"fluffy": "on"})).unwrap();
        let off: Attrs = serde_json::from_value(json!({"fluffy": false})).unwrap();
        assert!(on.fluffy);
        assert!(!off.fluffy);
        assert!(serde_json::from_value::<Attrs>(json!({"fluffy": "maybe"})).is_err());
    }

    #[test]
    fn test_coerce_numbers_from_form_strings() {
        #[derive(Debug, serde::Deserialize)]
        struct Attrs {
            #[serde(deserialize_with = "coerce::number")]
            ear_count: u32,
            #[serde(default, deserialize_with = "coerce::optional_number")]
            weight: Option<f64>,
        }
        let form: Attrs = serde_json::from_value(json!({"ear_count": " 3 ", "weight": "1.5"})).unwrap();
        assert_eq!((form.ear_count, form.weight), (3, Some(1.5)));
        let native: Attrs = serde_json::from_value(json!({"ear_count": 4, "weight": null})).unwrap();
        assert_eq!((native.ear_count, native.weight), (4, None));
    }

    #[test]
    fn test_coerce_number_rejects_words() {
        #[derive(Debug, serde::Deserialize)]
        struct Attrs {
            #[serde(deserialize_with = "coerce::number")]
            #[allow(dead_code)]
            ear_count: u32,
        }
        assert!(serde_json::from_value::<Attrs>(json!({"ear_count": "three"})).is_err());
        assert!(serde_json::from_value::<Attrs>(json!({"ear_count": "-1"})).is_err());
    }
}
