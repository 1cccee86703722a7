//! Synchronous API client for the PetFriends pet-management service.
//!
//! # Overview
//! `PetFriendsClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network (host-does-IO pattern). `PetFriends`
//! pairs it with a `Transport` and exposes one method per remote operation.
//!
//! # Design
//! - Every call returns `ApiResponse { status, body }`. Non-2xx statuses are
//!   data; `ApiError` is reserved for calls that could not be made.
//! - Photo attachments are read from disk before a request is built, so a
//!   missing file fails without a network round-trip.
//! - DTOs are defined independently from the mock-server crate; the scenario
//!   suite catches schema drift.

pub mod client;
pub mod config;
pub mod error;
pub mod http;
pub mod multipart;
pub mod pet_friends;
pub mod response;
pub mod transport;
pub mod types;

pub use client::PetFriendsClient;
pub use config::Settings;
pub use error::ApiError;
pub use http::{HttpMethod, HttpRequest, HttpResponse};
pub use pet_friends::PetFriends;
pub use response::{ApiResponse, ResponseBody};
pub use transport::{Transport, UreqTransport};
pub use types::{AuthKey, Credentials, Pet, PetFields, PetFilter, PetList, Photo};
