//! A single-word resource: the flange.

use async_trait::async_trait;
use crud_framework::{Resource, Site, ValidationErrors};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A flange, owned by the site it was created under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Flange {
    pub id: u32,
    pub title: String,
    /// Optional catalogue key, unique only by convention.
    pub key: Option<String>,
    pub site_id: Option<u32>,
}

impl Flange {
    pub fn new(id: u32, title: impl Into<String>) -> Self {
        Self {
            id,
            title: title.into(),
            key: None,
            site_id: None,
        }
    }
}

/// Attributes submitted by the new-flange form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlangeCreate {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub key: Option<String>,
}

/// Attributes submitted by the edit form. Absent fields are left alone.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FlangeUpdate {
    pub title: Option<String>,
    pub key: Option<String>,
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum FlangeError {
    #[error("Title can't be blank")]
    BlankTitle,

    #[error("Title is too long (maximum is {max} characters)")]
    TitleTooLong { max: usize },
}

/// Longest title the admin accepts.
pub const MAX_TITLE_LEN: usize = 255;

impl From<FlangeError> for ValidationErrors {
    fn from(e: FlangeError) -> Self {
        let mut errors = ValidationErrors::new();
        match e {
            FlangeError::BlankTitle => errors.add("title", "can't be blank"),
            FlangeError::TitleTooLong { max } => {
                errors.add("title", format!("is too long (maximum is {} characters)", max))
            }
        }
        errors
    }
}

fn check_title(title: &str) -> Result<(), FlangeError> {
    if title.trim().is_empty() {
        return Err(FlangeError::BlankTitle);
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(FlangeError::TitleTooLong { max: MAX_TITLE_LEN });
    }
    Ok(())
}

/// Blank form fields arrive as empty strings.
fn blank_to_none(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

#[async_trait]
impl Resource for Flange {
    type Id = u32;
    type Create = FlangeCreate;
    type Update = FlangeUpdate;
    type Error = FlangeError;

    fn id(&self) -> &u32 {
        &self.id
    }

    fn from_create_params(id: u32, params: FlangeCreate) -> Result<Self, FlangeError> {
        Ok(Self {
            id,
            title: params.title.trim().to_string(),
            key: blank_to_none(params.key),
            site_id: None,
        })
    }

    fn assign_site(&mut self, site: &Site) {
        self.site_id = Some(site.id);
    }

    async fn on_create(&mut self) -> Result<(), FlangeError> {
        check_title(&self.title)
    }

    async fn on_update(&mut self, update: FlangeUpdate) -> Result<(), FlangeError> {
        if let Some(title) = update.title {
            check_title(&title)?;
            self.title = title.trim().to_string();
        }
        if update.key.is_some() {
            self.key = blank_to_none(update.key);
        }
        Ok(())
    }
}
