//! A multi-word resource, to exercise name derivation
//! (`StrangeRabbit`, `strange_rabbit`, `strange_rabbits`).

use async_trait::async_trait;
use crud_framework::params::coerce;
use crud_framework::{Resource, Site, ValidationErrors};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Rabbits with more ears than this are not merely strange.
pub const MAX_EARS: u32 = 8;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StrangeRabbit {
    pub id: u32,
    pub name: String,
    pub ear_count: u32,
    pub fluffy: bool,
    pub site_id: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StrangeRabbitCreate {
    #[serde(default)]
    pub name: String,
    #[serde(default = "default_ear_count", deserialize_with = "coerce::number")]
    pub ear_count: u32,
    #[serde(default, deserialize_with = "coerce::flag")]
    pub fluffy: bool,
}

fn default_ear_count() -> u32 {
    2
}

impl Default for StrangeRabbitCreate {
    fn default() -> Self {
        Self {
            name: String::new(),
            ear_count: default_ear_count(),
            fluffy: false,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StrangeRabbitUpdate {
    pub name: Option<String>,
    #[serde(default, deserialize_with = "coerce::optional_number")]
    pub ear_count: Option<u32>,
    #[serde(default, deserialize_with = "optional_flag")]
    pub fluffy: Option<bool>,
}

fn optional_flag<'de, D>(deserializer: D) -> Result<Option<bool>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    coerce::flag(deserializer).map(Some)
}

#[derive(Debug, Clone, Error, PartialEq)]
pub enum StrangeRabbitError {
    #[error("Name can't be blank")]
    BlankName,

    #[error("Ear count must be at most {max}, got {requested}")]
    TooManyEars { requested: u32, max: u32 },
}

impl From<StrangeRabbitError> for ValidationErrors {
    fn from(e: StrangeRabbitError) -> Self {
        let mut errors = ValidationErrors::new();
        match e {
            StrangeRabbitError::BlankName => errors.add("name", "can't be blank"),
            StrangeRabbitError::TooManyEars { max, .. } => {
                errors.add("ear_count", format!("must be at most {}", max))
            }
        }
        errors
    }
}

impl StrangeRabbit {
    fn validate(&self) -> Result<(), StrangeRabbitError> {
        if self.name.trim().is_empty() {
            return Err(StrangeRabbitError::BlankName);
        }
        if self.ear_count > MAX_EARS {
            return Err(StrangeRabbitError::TooManyEars {
                requested: self.ear_count,
                max: MAX_EARS,
            });
        }
        Ok(())
    }
}

#[async_trait]
impl Resource for StrangeRabbit {
    type Id = u32;
    type Create = StrangeRabbitCreate;
    type Update = StrangeRabbitUpdate;
    type Error = StrangeRabbitError;

    fn id(&self) -> &u32 {
        &self.id
    }

    fn from_create_params(id: u32, params: StrangeRabbitCreate) -> Result<Self, StrangeRabbitError> {
        Ok(Self {
            id,
            name: params.name.trim().to_string(),
            ear_count: params.ear_count,
            fluffy: params.fluffy,
            site_id: None,
        })
    }

    fn assign_site(&mut self, site: &Site) {
        self.site_id = Some(site.id);
    }

    async fn on_create(&mut self) -> Result<(), StrangeRabbitError> {
        self.validate()
    }

    async fn on_update(&mut self, update: StrangeRabbitUpdate) -> Result<(), StrangeRabbitError> {
        if let Some(name) = update.name {
            self.name = name.trim().to_string();
        }
        if let Some(ear_count) = update.ear_count {
            self.ear_count = ear_count;
        }
        if let Some(fluffy) = update.fluffy {
            self.fluffy = fluffy;
        }
        self.validate()
    }
}
