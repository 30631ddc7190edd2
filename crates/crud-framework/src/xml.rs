//! XML serialization of records, collections and validation errors.
//!
//! Records are first turned into a `serde_json::Value` and then written
//! element by element, so any `Serialize` resource works:
//!
//! ```text
//! <?xml version="1.0" encoding="UTF-8"?>
//! <strange-rabbit>
//!   <id type="integer">1</id>
//!   <name>Harvey</name>
//!   <ear-count type="integer">3</ear-count>
//!   <site-id nil="true"/>
//! </strange-rabbit>
//! ```
//!
//! Attribute names are dasherized; numbers and booleans carry a `type`
//! attribute; arrays are `type="array"` with singularized child elements.

use crate::error::CrudError;
use crate::inflect;
use crate::validation::ValidationErrors;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event};
use quick_xml::Writer;
use serde::Serialize;
use serde_json::Value;

type XmlWriter = Writer<Vec<u8>>;

/// One record under `<element>`.
pub fn record<T: Serialize>(element: &str, item: &T) -> Result<String, CrudError> {
    let value = serde_json::to_value(item)?;
    document(|w| write_value(w, element, &value))
}

/// Records under `<collection type="array">`, one `<element>` each.
pub fn collection<T: Serialize>(
    collection: &str,
    element: &str,
    items: &[T],
) -> Result<String, CrudError> {
    let values = items
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;
    document(|w| {
        let mut start = BytesStart::new(collection);
        start.push_attribute(("type", "array"));
        emit(w, Event::Start(start))?;
        for value in &values {
            write_value(w, element, value)?;
        }
        emit(w, Event::End(BytesEnd::new(collection)))
    })
}

/// `<errors><error>Name can't be blank</error></errors>`.
pub fn errors(errors: &ValidationErrors) -> Result<String, CrudError> {
    document(|w| {
        emit(w, Event::Start(BytesStart::new("errors")))?;
        for message in errors.full_messages() {
            text_element(w, BytesStart::new("error"), &message)?;
        }
        emit(w, Event::End(BytesEnd::new("errors")))
    })
}

fn document(
    body: impl FnOnce(&mut XmlWriter) -> Result<(), CrudError>,
) -> Result<String, CrudError> {
    let mut writer = Writer::new_with_indent(Vec::new(), b' ', 2);
    emit(
        &mut writer,
        Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), None)),
    )?;
    body(&mut writer)?;
    String::from_utf8(writer.into_inner()).map_err(CrudError::serialization)
}

fn emit(writer: &mut XmlWriter, event: Event<'_>) -> Result<(), CrudError> {
    writer.write_event(event).map_err(CrudError::serialization)
}

fn text_element(writer: &mut XmlWriter, start: BytesStart<'_>, text: &str) -> Result<(), CrudError> {
    let name = String::from_utf8_lossy(start.name().as_ref()).into_owned();
    emit(writer, Event::Start(start))?;
    emit(writer, Event::Text(BytesText::new(text)))?;
    emit(writer, Event::End(BytesEnd::new(name)))
}

fn write_value(writer: &mut XmlWriter, name: &str, value: &Value) -> Result<(), CrudError> {
    let tag = inflect::dasherize(name);
    let mut start = BytesStart::new(tag.as_str());
    match value {
        Value::Null => {
            start.push_attribute(("nil", "true"));
            emit(writer, Event::Empty(start))
        }
        Value::Bool(b) => {
            start.push_attribute(("type", "boolean"));
            text_element(writer, start, &b.to_string())
        }
        Value::Number(n) => {
            let kind = if n.is_f64() { "float" } else { "integer" };
            start.push_attribute(("type", kind));
            text_element(writer, start, &n.to_string())
        }
        Value::String(s) => text_element(writer, start, s),
        Value::Array(items) => {
            start.push_attribute(("type", "array"));
            emit(writer, Event::Start(start))?;
            let child = inflect::singularize(name);
            for item in items {
                write_value(writer, &child, item)?;
            }
            emit(writer, Event::End(BytesEnd::new(tag.as_str())))
        }
        Value::Object(fields) => {
            emit(writer, Event::Start(start))?;
            for (key, field) in fields {
                write_value(writer, key, field)?;
            }
            emit(writer, Event::End(BytesEnd::new(tag.as_str())))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use quick_xml::Reader;

    #[derive(Serialize)]
    struct Rabbit {
        id: u32,
        name: String,
        ear_count: u32,
        fluffy: bool,
        site_id: Option<u32>,
        tags: Vec<String>,
    }

    fn harvey() -> Rabbit {
        Rabbit {
            id: 1,
            name: "Harvey & co".to_string(),
            ear_count: 3,
            fluffy: true,
            site_id: None,
            tags: vec!["tall".to_string()],
        }
    }

    /// Element names in document order.
    fn element_names(xml: &str) -> Vec<String> {
        let mut reader = Reader::from_str(xml);
        let mut names = Vec::new();
        loop {
            match reader.read_event().unwrap() {
                Event::Start(e) | Event::Empty(e) => {
                    names.push(String::from_utf8(e.name().as_ref().to_vec()).unwrap())
                }
                Event::Eof => break,
                _ => {}
            }
        }
        names
    }

    #[test]
    fn test_record() {
        let xml = record("strange-rabbit", &harvey()).unwrap();
        assert!(xml.starts_with("<?xml version=\"1.0\" encoding=\"UTF-8\"?>"));
        assert!(xml.contains("<id type=\"integer\">1</id>"));
        assert!(xml.contains("<name>Harvey &amp; co</name>"));
        assert!(xml.contains("<ear-count type=\"integer\">3</ear-count>"));
        assert!(xml.contains("<fluffy type=\"boolean\">true</fluffy>"));
        assert!(xml.contains("<site-id nil=\"true\"/>"));
        assert_eq!(
            element_names(&xml),
            vec!["strange-rabbit", "id", "name", "ear-count", "fluffy", "site-id", "tags", "tag"]
        );
    }

    #[test]
    fn test_collection() {
        let xml = collection("strange-rabbits", "strange-rabbit", &[harvey(), harvey()]).unwrap();
        assert!(xml.contains("<strange-rabbits type=\"array\">"));
        let names = element_names(&xml);
        assert_eq!(names.iter().filter(|n| *n == "strange-rabbit").count(), 2);

        let empty = collection::<Rabbit>("strange-rabbits", "strange-rabbit", &[]).unwrap();
        assert_eq!(element_names(&empty), vec!["strange-rabbits"]);
    }

    #[test]
    fn test_errors() {
        let mut errs = ValidationErrors::new();
        errs.add("name", "is required");
        errs.add_to_base("Rabbit is hiding");
        let xml = errors(&errs).unwrap();
        assert!(xml.contains("<error>Name is required</error>"));
        assert!(xml.contains("<error>Rabbit is hiding</error>"));
        assert_eq!(element_names(&xml), vec!["errors", "error", "error"]);
    }
}
