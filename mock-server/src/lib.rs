//! In-process emulation of the PetFriends HTTP API.
//!
//! Reproduces the endpoints, status codes and HTML error pages of the live
//! service closely enough for the client's scenario suite, including two
//! validation gaps the live service is known to have: any file is accepted
//! as a pet photo, and `create_pet_simple` accepts empty fields.

use std::{
    collections::HashMap,
    sync::Arc,
    time::{SystemTime, UNIX_EPOCH},
};

use axum::{
    extract::{multipart::MultipartRejection, Multipart, Path, Query, State},
    http::{HeaderMap, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post, put},
    Json, Router,
};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::RwLock};
use tracing::{debug, info};
use uuid::Uuid;

/// Credentials of the user every fresh store starts with.
pub const SEED_EMAIL: &str = "tester@petfriends.local";
pub const SEED_PASSWORD: &str = "correct-horse";

pub const USER_NOT_FOUND: &str = "This user wasn't found in database";
pub const MISSING_AUTH_KEY: &str = "Please provide 'auth_key' Header";

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq, Eq)]
pub struct Pet {
    pub id: String,
    pub name: String,
    pub animal_type: String,
    pub age: String,
    pub pet_photo: String,
    pub user_id: String,
    pub created_at: String,
}

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct PetList {
    pub pets: Vec<Pet>,
}

#[derive(Clone, Debug)]
struct User {
    id: String,
    password: String,
}

/// Users, issued keys and pets. Pets are kept newest first.
#[derive(Debug, Default)]
pub struct Store {
    users: HashMap<String, User>,
    keys: HashMap<String, String>,
    pets: Vec<Pet>,
}

impl Store {
    /// One known user, plus one pet owned by somebody else so the
    /// unfiltered listing is never empty.
    pub fn seeded() -> Self {
        let mut store = Store::default();
        store.add_user(SEED_EMAIL, SEED_PASSWORD);
        let stranger = store.add_user("stranger@petfriends.local", &Uuid::new_v4().to_string());
        store.insert_pet(&stranger, "Барсик", "кот", "3", String::new());
        store
    }

    pub fn add_user(&mut self, email: &str, password: &str) -> String {
        let id = Uuid::new_v4().simple().to_string();
        self.users.insert(
            email.to_string(),
            User {
                id: id.clone(),
                password: password.to_string(),
            },
        );
        id
    }

    fn issue_key(&mut self, user_id: &str) -> String {
        if let Some((key, _)) = self.keys.iter().find(|(_, owner)| owner.as_str() == user_id) {
            return key.clone();
        }
        let key = format!("{}{}", Uuid::new_v4().simple(), Uuid::new_v4().simple());
        self.keys.insert(key.clone(), user_id.to_string());
        key
    }

    fn insert_pet(&mut self, user_id: &str, name: &str, animal_type: &str, age: &str, pet_photo: String) -> Pet {
        let pet = Pet {
            id: Uuid::new_v4().simple().to_string(),
            name: name.to_string(),
            animal_type: animal_type.to_string(),
            age: age.to_string(),
            pet_photo,
            user_id: user_id.to_string(),
            created_at: unix_now(),
        };
        self.pets.insert(0, pet.clone());
        pet
    }

    fn owned_pet_mut(&mut self, user_id: &str, pet_id: &str) -> Option<&mut Pet> {
        self.pets.iter_mut().find(|p| p.id == pet_id && p.user_id == user_id)
    }
}

pub type Db = Arc<RwLock<Store>>;

pub fn app() -> Router {
    let db: Db = Arc::new(RwLock::new(Store::seeded()));
    Router::new()
        .route("/api/key", get(get_api_key))
        .route("/api/pets", get(list_pets).post(create_pet))
        .route("/api/create_pet_simple", post(create_pet_simple))
        .route("/api/pets/set_photo/{id}", post(set_photo))
        .route("/api/pets/{id}", put(update_pet).delete(delete_pet))
        .with_state(db)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    axum::serve(listener, app()).await
}

/// Error page in the shape the live service renders: HTML with the
/// message entity-escaped.
#[derive(Debug)]
struct Failure {
    status: StatusCode,
    message: String,
}

impl Failure {
    fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }
}

impl IntoResponse for Failure {
    fn into_response(self) -> Response {
        let title = self.status.canonical_reason().unwrap_or("Error");
        let page = format!(
            "<!doctype html>\n<html lang=en>\n<title>{code} {title}</title>\n<h1>{title}</h1>\n<p>{msg}</p>\n",
            code = self.status.as_u16(),
            msg = escape_html(&self.message),
        );
        (self.status, Html(page)).into_response()
    }
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&#34;"),
            '\'' => out.push_str("&#x27;"),
            c => out.push(c),
        }
    }
    out
}

fn unix_now() -> String {
    let secs = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64())
        .unwrap_or_default();
    format!("{secs:.6}")
}

fn header<'a>(headers: &'a HeaderMap, name: &str) -> Option<&'a str> {
    headers.get(name).and_then(|v| v.to_str().ok())
}

fn authorize(store: &Store, headers: &HeaderMap) -> Result<String, Failure> {
    header(headers, "auth_key")
        .and_then(|key| store.keys.get(key))
        .cloned()
        .ok_or_else(|| Failure::new(StatusCode::FORBIDDEN, MISSING_AUTH_KEY))
}

#[derive(Debug, Default)]
struct Upload {
    content_type: String,
    bytes: Vec<u8>,
}

impl Upload {
    fn data_uri(&self) -> String {
        format!("data:{};base64,{}", self.content_type, STANDARD.encode(&self.bytes))
    }
}

#[derive(Debug, Default)]
struct Form {
    fields: HashMap<String, String>,
    photo: Option<Upload>,
}

impl Form {
    fn field(&self, name: &str) -> &str {
        self.fields.get(name).map(String::as_str).unwrap_or("")
    }
}

/// Read a multipart body. A non-multipart request is answered with 415.
async fn read_form(multipart: Result<Multipart, MultipartRejection>) -> Result<Form, Failure> {
    let mut multipart =
        multipart.map_err(|e| Failure::new(StatusCode::UNSUPPORTED_MEDIA_TYPE, e.body_text()))?;
    let mut form = Form::default();
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| Failure::new(StatusCode::BAD_REQUEST, e.body_text()))?
    {
        let name = field.name().unwrap_or_default().to_string();
        let is_file = field.file_name().is_some();
        let content_type = field
            .content_type()
            .unwrap_or("application/octet-stream")
            .to_string();
        let bytes = field
            .bytes()
            .await
            .map_err(|e| Failure::new(StatusCode::BAD_REQUEST, e.body_text()))?;
        if is_file && name == "pet_photo" {
            form.photo = Some(Upload {
                content_type,
                bytes: bytes.to_vec(),
            });
        } else {
            form.fields.insert(name, String::from_utf8_lossy(&bytes).into_owned());
        }
    }
    Ok(form)
}

async fn get_api_key(State(db): State<Db>, headers: HeaderMap) -> Result<Json<serde_json::Value>, Failure> {
    let email = header(&headers, "email").unwrap_or_default();
    let password = header(&headers, "password").unwrap_or_default();
    let mut store = db.write().await;
    let user_id = match store.users.get(email) {
        Some(user) if user.password == password => user.id.clone(),
        _ => return Err(Failure::new(StatusCode::FORBIDDEN, USER_NOT_FOUND)),
    };
    let key = store.issue_key(&user_id);
    debug!(%email, "issued api key");
    Ok(Json(serde_json::json!({ "key": key })))
}

#[derive(Deserialize)]
struct ListQuery {
    #[serde(default)]
    filter: String,
}

async fn list_pets(
    State(db): State<Db>,
    headers: HeaderMap,
    Query(query): Query<ListQuery>,
) -> Result<Json<PetList>, Failure> {
    let store = db.read().await;
    let user_id = authorize(&store, &headers)?;
    let pets = match query.filter.as_str() {
        "" => store.pets.clone(),
        "my_pets" => store.pets.iter().filter(|p| p.user_id == user_id).cloned().collect(),
        other => {
            return Err(Failure::new(
                StatusCode::BAD_REQUEST,
                format!("Filter value '{other}' is incorrect"),
            ))
        }
    };
    Ok(Json(PetList { pets }))
}

async fn create_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Pet>, Failure> {
    let user_id = authorize(&*db.read().await, &headers)?;
    let form = read_form(multipart).await?;
    // Any content type is stored as-is; the live service does not check it.
    let photo = form
        .photo
        .as_ref()
        .ok_or_else(|| Failure::new(StatusCode::BAD_REQUEST, "Please provide 'pet_photo'"))?;
    let pet = db.write().await.insert_pet(
        &user_id,
        form.field("name"),
        form.field("animal_type"),
        form.field("age"),
        photo.data_uri(),
    );
    info!(pet_id = %pet.id, "created pet with photo");
    Ok(Json(pet))
}

async fn create_pet_simple(
    State(db): State<Db>,
    headers: HeaderMap,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Pet>, Failure> {
    let user_id = authorize(&*db.read().await, &headers)?;
    let form = read_form(multipart).await?;
    // Empty fields are accepted, matching the live service.
    let pet = db.write().await.insert_pet(
        &user_id,
        form.field("name"),
        form.field("animal_type"),
        form.field("age"),
        String::new(),
    );
    info!(pet_id = %pet.id, "created pet");
    Ok(Json(pet))
}

async fn set_photo(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Pet>, Failure> {
    let user_id = authorize(&*db.read().await, &headers)?;
    let form = read_form(multipart).await?;
    let photo = form
        .photo
        .ok_or_else(|| Failure::new(StatusCode::BAD_REQUEST, "Please provide 'pet_photo'"))?;
    let mut store = db.write().await;
    let pet = store.owned_pet_mut(&user_id, &id).ok_or_else(|| pet_not_found(&id))?;
    pet.pet_photo = photo.data_uri();
    Ok(Json(pet.clone()))
}

async fn update_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Result<Json<Pet>, Failure> {
    let user_id = authorize(&*db.read().await, &headers)?;
    let form = read_form(multipart).await?;
    let mut store = db.write().await;
    let pet = store.owned_pet_mut(&user_id, &id).ok_or_else(|| pet_not_found(&id))?;
    if let Some(name) = form.fields.get("name") {
        pet.name = name.clone();
    }
    if let Some(animal_type) = form.fields.get("animal_type") {
        pet.animal_type = animal_type.clone();
    }
    if let Some(age) = form.fields.get("age") {
        pet.age = age.clone();
    }
    Ok(Json(pet.clone()))
}

async fn delete_pet(
    State(db): State<Db>,
    headers: HeaderMap,
    Path(id): Path<String>,
) -> Result<StatusCode, Failure> {
    let mut store = db.write().await;
    let user_id = authorize(&store, &headers)?;
    let before = store.pets.len();
    store.pets.retain(|p| !(p.id == id && p.user_id == user_id));
    if store.pets.len() == before {
        return Err(pet_not_found(&id));
    }
    info!(pet_id = %id, "deleted pet");
    Ok(StatusCode::OK)
}

fn pet_not_found(id: &str) -> Failure {
    Failure::new(StatusCode::BAD_REQUEST, format!("Pet with id '{id}' wasn't found"))
}
