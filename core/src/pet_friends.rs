//! One method per remote operation, each returning what the server said.
//!
//! `PetFriends` pairs the request builder with a `Transport`. Its methods
//! return `Ok(ApiResponse)` for every status code; `Err` means the request
//! could not be made at all (missing photo, transport failure).

use std::path::Path;

use tracing::{debug, warn};

use crate::client::PetFriendsClient;
use crate::error::ApiError;
use crate::http::HttpRequest;
use crate::response::{ApiResponse, ResponseBody};
use crate::transport::{Transport, UreqTransport};
use crate::types::{AuthKey, Credentials, PetFields, PetFilter, Photo};

#[derive(Debug, Clone)]
pub struct PetFriends<T = UreqTransport> {
    client: PetFriendsClient,
    transport: T,
}

impl PetFriends<UreqTransport> {
    pub fn new(base_url: &str) -> Self {
        Self::with_transport(base_url, UreqTransport::new())
    }
}

impl<T: Transport> PetFriends<T> {
    pub fn with_transport(base_url: &str, transport: T) -> Self {
        Self {
            client: PetFriendsClient::new(base_url),
            transport,
        }
    }

    pub fn get_api_key(&self, email: &str, password: &str) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_get_api_key(&Credentials::new(email, password)))
    }

    /// `get_api_key` followed by a typed view of the key. Fails when the
    /// response does not carry one.
    pub fn login(&self, credentials: &Credentials) -> Result<AuthKey, ApiError> {
        self.get_api_key(&credentials.email, &credentials.password)?.decode()
    }

    pub fn get_list_of_pets(&self, auth_key: &AuthKey, filter: PetFilter) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_list_pets(auth_key, filter))
    }

    pub fn add_new_pet(
        &self,
        auth_key: &AuthKey,
        name: &str,
        animal_type: &str,
        age: &str,
        photo_path: impl AsRef<Path>,
    ) -> Result<ApiResponse, ApiError> {
        let photo = Photo::from_path(photo_path)?;
        let fields = PetFields::new(name, animal_type, age);
        self.send(self.client.build_add_new_pet(auth_key, &fields, photo))
    }

    pub fn add_new_pet_simple(
        &self,
        auth_key: &AuthKey,
        name: &str,
        animal_type: &str,
        age: &str,
    ) -> Result<ApiResponse, ApiError> {
        let fields = PetFields::new(name, animal_type, age);
        self.send(self.client.build_add_new_pet_simple(auth_key, &fields))
    }

    pub fn add_pet_photo(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        photo_path: impl AsRef<Path>,
    ) -> Result<ApiResponse, ApiError> {
        let photo = Photo::from_path(photo_path)?;
        self.send(self.client.build_add_pet_photo(auth_key, pet_id, photo))
    }

    pub fn update_pet_info(
        &self,
        auth_key: &AuthKey,
        pet_id: &str,
        name: &str,
        animal_type: &str,
        age: impl std::fmt::Display,
    ) -> Result<ApiResponse, ApiError> {
        let fields = PetFields::new(name, animal_type, age);
        self.send(self.client.build_update_pet_info(auth_key, pet_id, &fields))
    }

    pub fn delete_pet(&self, auth_key: &AuthKey, pet_id: &str) -> Result<ApiResponse, ApiError> {
        self.send(self.client.build_delete_pet(auth_key, pet_id))
    }

    fn send(&self, request: HttpRequest) -> Result<ApiResponse, ApiError> {
        let method = request.method;
        let path = request.path.clone();
        let response = self.client.parse(self.transport.execute(request)?);
        if let ResponseBody::Text(text) = &response.body {
            if response.is_success() && !text.is_empty() {
                warn!(%method, url = %path, "successful response is not JSON");
            }
        }
        debug!(%method, url = %path, status = response.status, "api call finished");
        Ok(response)
    }
}
