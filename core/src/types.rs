//! Domain DTOs for the PetFriends API.
//!
//! # Design
//! These types mirror the mock-server's schema but are defined independently
//! so the scenario suite catches drift between the two crates. The service
//! sends `age` as either a string or a number; the client always keeps it as
//! a string.

use std::fmt;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Deserializer, Serialize};

use crate::error::ApiError;

/// Email and password pair used to obtain an auth key.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

/// Key issued by `GET /api/key`, sent back in the `auth_key` header.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct AuthKey {
    pub key: String,
}

impl AuthKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self { key: key.into() }
    }
}

/// A single pet record as returned by the service.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    #[serde(deserialize_with = "string_or_number")]
    pub age: String,
    #[serde(default)]
    pub pet_photo: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub created_at: Option<String>,
}

impl Pet {
    pub fn has_photo(&self) -> bool {
        !self.pet_photo.is_empty()
    }
}

/// Body of `GET /api/pets`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct PetList {
    pub pets: Vec<Pet>,
}

impl PetList {
    pub fn contains_id(&self, id: &str) -> bool {
        self.pets.iter().any(|p| p.id == id)
    }
}

/// Collection filter for `GET /api/pets`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum PetFilter {
    #[default]
    All,
    MyPets,
}

impl PetFilter {
    /// Value of the `filter` query parameter.
    pub fn as_query_value(&self) -> &'static str {
        match self {
            PetFilter::All => "",
            PetFilter::MyPets => "my_pets",
        }
    }
}

impl TryFrom<&str> for PetFilter {
    type Error = String;

    fn try_from(value: &str) -> Result<Self, Self::Error> {
        match value {
            "" => Ok(PetFilter::All),
            "my_pets" => Ok(PetFilter::MyPets),
            other => Err(format!("unknown pet filter {other:?}")),
        }
    }
}

/// The editable fields of a pet, submitted on create and update.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PetFields {
    pub name: String,
    pub animal_type: String,
    pub age: String,
}

impl PetFields {
    pub fn new(name: impl Into<String>, animal_type: impl Into<String>, age: impl fmt::Display) -> Self {
        Self {
            name: name.into(),
            animal_type: animal_type.into(),
            age: age.to_string(),
        }
    }

    pub(crate) fn as_form(&self) -> [(&'static str, &str); 3] {
        [
            ("name", self.name.as_str()),
            ("animal_type", self.animal_type.as_str()),
            ("age", self.age.as_str()),
        ]
    }
}

/// A photo attachment read fully into memory.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Photo {
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl Photo {
    /// Read a photo from disk. A missing file is reported as
    /// `ApiError::MissingPhoto` rather than a generic I/O error.
    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, ApiError> {
        let path = path.as_ref();
        if !path.is_file() {
            return Err(ApiError::MissingPhoto(path.to_path_buf()));
        }
        let bytes = std::fs::read(path).map_err(|source| ApiError::PhotoRead {
            path: PathBuf::from(path),
            source,
        })?;
        let file_name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "photo".to_string());
        Ok(Self {
            content_type: content_type_for(&file_name).to_string(),
            file_name,
            bytes,
        })
    }
}

/// Media type guessed from the file extension.
pub fn content_type_for(file_name: &str) -> &'static str {
    let ext = file_name
        .rsplit_once('.')
        .map(|(_, ext)| ext.to_ascii_lowercase())
        .unwrap_or_default();
    match ext.as_str() {
        "jpg" | "jpeg" => "image/jpeg",
        "png" => "image/png",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "xlsx" => "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        "txt" => "text/plain",
        _ => "application/octet-stream",
    }
}

fn string_or_number<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    #[derive(Deserialize)]
    #[serde(untagged)]
    enum Raw {
        Str(String),
        Num(serde_json::Number),
    }

    Ok(match Raw::deserialize(deserializer)? {
        Raw::Str(s) => s,
        Raw::Num(n) => n.to_string(),
    })
}
