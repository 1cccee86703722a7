//! Shared setup for the scenario suite.
//!
//! With `PETFRIENDS_BASE_URL` set, scenarios run against that service using
//! credentials from the environment. Otherwise each scenario starts its own
//! mock server on a random port.

#![allow(dead_code)]

use std::path::PathBuf;

use petfriends_core::{AuthKey, Credentials, Pet, PetFilter, PetFriends, PetList, Settings};
use tracing_subscriber::EnvFilter;

pub struct Suite {
    pub pf: PetFriends,
    pub settings: Settings,
}

impl Suite {
    /// Authenticate with the valid credentials.
    pub fn auth_key(&self) -> AuthKey {
        self.pf.login(&self.settings.valid).expect("valid credentials must yield a key")
    }

    pub fn my_pets(&self, key: &AuthKey) -> PetList {
        let resp = self.pf.get_list_of_pets(key, PetFilter::MyPets).unwrap();
        assert_eq!(resp.status, 200, "my_pets listing failed: {:?}", resp.body);
        resp.decode().unwrap()
    }

    /// First pet owned by the caller, creating one when the list is empty.
    pub fn ensure_my_pet(&self, key: &AuthKey) -> Pet {
        let pets = self.my_pets(key);
        if let Some(pet) = pets.pets.into_iter().next() {
            return pet;
        }
        let resp = self
            .pf
            .add_new_pet(key, "Артур", "попугай", "1", image("popug.jpg"))
            .unwrap();
        assert_eq!(resp.status, 200, "precondition pet creation failed: {:?}", resp.body);
        self.my_pets(key)
            .pets
            .into_iter()
            .next()
            .expect("freshly created pet is listed")
    }
}

pub fn suite() -> Suite {
    init_tracing();
    let settings = match std::env::var(petfriends_core::config::ENV_BASE_URL) {
        Ok(_) => Settings::from_env().expect("live run needs PETFRIENDS_EMAIL and PETFRIENDS_PASSWORD"),
        Err(_) => Settings::with_credentials(
            &spawn_mock(),
            Credentials::new(petfriends_mock::SEED_EMAIL, petfriends_mock::SEED_PASSWORD),
        ),
    };
    Suite {
        pf: PetFriends::new(&settings.base_url),
        settings,
    }
}

/// Path of a fixture under `tests/images/`.
pub fn image(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR")).join("tests/images").join(name)
}

pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("petfriends_core=debug")),
        )
        .with_test_writer()
        .try_init();
}

/// Start a fresh mock server and return its base URL.
pub fn spawn_mock() -> String {
    let std_listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
    let addr = std_listener.local_addr().unwrap();
    std_listener.set_nonblocking(true).unwrap();

    std::thread::spawn(move || {
        let rt = tokio::runtime::Builder::new_current_thread()
            .enable_all()
            .build()
            .unwrap();
        rt.block_on(async {
            let listener = tokio::net::TcpListener::from_std(std_listener).unwrap();
            petfriends_mock::run(listener).await
        })
        .unwrap();
    });

    format!("http://{addr}")
}
