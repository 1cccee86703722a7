//! Stateless HTTP request builder and response parser for the PetFriends API.
//!
//! # Design
//! `PetFriendsClient` holds only a `base_url` and carries no mutable state
//! between calls. Each remote operation has a `build_*` method producing an
//! `HttpRequest`; every response goes through the single `parse` method,
//! which never fails. Interpreting the status is left to the caller.

use urlencoding::encode;

use crate::http::{HttpMethod, HttpRequest, HttpResponse};
use crate::multipart::MultipartForm;
use crate::response::{ApiResponse, ResponseBody};
use crate::types::{AuthKey, Credentials, PetFields, PetFilter, Photo};

/// Header carrying the issued key on authorized endpoints.
pub const AUTH_HEADER: &str = "auth_key";

#[derive(Debug, Clone)]
pub struct PetFriendsClient {
    base_url: String,
}

impl PetFriendsClient {
    pub fn new(base_url: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        }
    }

    pub fn build_get_api_key(&self, credentials: &Credentials) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/api/key", self.base_url),
            headers: vec![
                ("email".to_string(), credentials.email.clone()),
                ("password".to_string(), credentials.password.clone()),
            ],
            body: None,
        }
    }

    pub fn build_list_pets(&self, auth_key: &AuthKey, filter: PetFilter) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Get,
            path: format!("{}/api/pets?filter={}", self.base_url, filter.as_query_value()),
            headers: auth_headers(auth_key),
            body: None,
        }
    }

    pub fn build_add_new_pet(&self, auth_key: &AuthKey, fields: &PetFields, photo: Photo) -> HttpRequest {
        let form = fields_form(fields).photo("pet_photo", photo);
        multipart_request(HttpMethod::Post, format!("{}/api/pets", self.base_url), auth_key, &form)
    }

    pub fn build_add_new_pet_simple(&self, auth_key: &AuthKey, fields: &PetFields) -> HttpRequest {
        multipart_request(
            HttpMethod::Post,
            format!("{}/api/create_pet_simple", self.base_url),
            auth_key,
            &fields_form(fields),
        )
    }

    pub fn build_add_pet_photo(&self, auth_key: &AuthKey, pet_id: &str, photo: Photo) -> HttpRequest {
        let form = MultipartForm::new().photo("pet_photo", photo);
        multipart_request(
            HttpMethod::Post,
            format!("{}/api/pets/set_photo/{}", self.base_url, encode(pet_id)),
            auth_key,
            &form,
        )
    }

    pub fn build_update_pet_info(&self, auth_key: &AuthKey, pet_id: &str, fields: &PetFields) -> HttpRequest {
        multipart_request(
            HttpMethod::Put,
            format!("{}/api/pets/{}", self.base_url, encode(pet_id)),
            auth_key,
            &fields_form(fields),
        )
    }

    pub fn build_delete_pet(&self, auth_key: &AuthKey, pet_id: &str) -> HttpRequest {
        HttpRequest {
            method: HttpMethod::Delete,
            path: format!("{}/api/pets/{}", self.base_url, encode(pet_id)),
            headers: auth_headers(auth_key),
            body: None,
        }
    }

    /// Turn any response into an `ApiResponse`, whatever its status.
    pub fn parse(&self, response: HttpResponse) -> ApiResponse {
        ApiResponse {
            status: response.status,
            body: ResponseBody::parse(&response.body),
        }
    }
}

fn auth_headers(auth_key: &AuthKey) -> Vec<(String, String)> {
    vec![(AUTH_HEADER.to_string(), auth_key.key.clone())]
}

fn fields_form(fields: &PetFields) -> MultipartForm {
    fields
        .as_form()
        .into_iter()
        .fold(MultipartForm::new(), |form, (name, value)| form.text(name, value))
}

fn multipart_request(method: HttpMethod, path: String, auth_key: &AuthKey, form: &MultipartForm) -> HttpRequest {
    let mut headers = auth_headers(auth_key);
    headers.push(("content-type".to_string(), form.content_type()));
    HttpRequest {
        method,
        path,
        headers,
        body: Some(form.encode()),
    }
}
