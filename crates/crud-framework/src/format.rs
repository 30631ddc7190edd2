//! Response formats negotiated per request.

use crate::error::CrudError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Format {
    #[default]
    Html,
    Xml,
    ExtJson,
}

impl Format {
    pub const ALL: [Format; 3] = [Format::Html, Format::Xml, Format::ExtJson];

    pub fn as_str(&self) -> &'static str {
        match self {
            Format::Html => "html",
            Format::Xml => "xml",
            Format::ExtJson => "ext_json",
        }
    }

    pub fn content_type(&self) -> &'static str {
        match self {
            Format::Html => "text/html; charset=utf-8",
            Format::Xml => "application/xml; charset=utf-8",
            Format::ExtJson => "application/json; charset=utf-8",
        }
    }
}

impl fmt::Display for Format {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Format {
    type Err = CrudError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "" | "html" => Ok(Format::Html),
            "xml" => Ok(Format::Xml),
            "ext_json" => Ok(Format::ExtJson),
            _ => Err(CrudError::UnknownFormat(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_known_formats() {
        for format in Format::ALL {
            assert_eq!(format.as_str().parse::<Format>().unwrap(), format);
        }
        assert_eq!("XML".parse::<Format>().unwrap(), Format::Xml);
        assert_eq!("".parse::<Format>().unwrap(), Format::default());
    }

    #[test]
    fn test_unknown_format() {
        let err = "yaml".parse::<Format>().unwrap_err();
        assert!(matches!(err, CrudError::UnknownFormat(f) if f == "yaml"));
    }

    #[test]
    fn test_content_types() {
        assert!(Format::Xml.content_type().starts_with("application/xml"));
        assert!(Format::ExtJson.content_type().starts_with("application/json"));
        assert_eq!(Format::ExtJson.to_string(), "ext_json");
    }
}
