use crate::models::{FlightOffer, LodgingOffer, UserProfile};
use serde::de::DeserializeOwned;
use std::collections::{BTreeSet, HashMap};
use std::fs::File;
use std::io::BufReader;
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while loading a catalog collection
#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse {path}: {source}")]
    Json {
        path: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Read-only reference data shared by all searches
///
/// Loaded once at startup; searches copy what they need out of it.
#[derive(Debug, Clone, Default)]
pub struct Catalog {
    flights: Vec<FlightOffer>,
    users: HashMap<String, UserProfile>,
    lodging: Vec<LodgingOffer>,
}

impl Catalog {
    pub fn new(flights: Vec<FlightOffer>, users: Vec<UserProfile>, lodging: Vec<LodgingOffer>) -> Self {
        let users = users
            .into_iter()
            .map(|user| (user.user_id.clone(), user))
            .collect();

        Self {
            flights,
            users,
            lodging,
        }
    }

    /// Load all three collections from JSON files
    ///
    /// A missing or malformed file only empties its own collection; the
    /// failure is logged and the other collections still load.
    pub fn load(flights_path: &Path, users_path: &Path, lodging_path: &Path) -> Self {
        let flights = load_or_empty::<FlightOffer>(flights_path, "flights");
        let users = load_or_empty::<UserProfile>(users_path, "user profiles");
        let lodging = load_or_empty::<LodgingOffer>(lodging_path, "lodging offers");

        tracing::info!(
            "Loaded {} flights, {} users and {} lodging offers",
            flights.len(),
            users.len(),
            lodging.len()
        );

        Self::new(flights, users, lodging)
    }

    pub fn flights(&self) -> &[FlightOffer] {
        &self.flights
    }

    pub fn user(&self, user_id: &str) -> Option<&UserProfile> {
        self.users.get(user_id)
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }

    pub fn lodging(&self) -> &[LodgingOffer] {
        &self.lodging
    }

    /// Distinct origin codes, sorted
    pub fn origins(&self) -> Vec<String> {
        self.flights
            .iter()
            .map(|f| f.origin.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }

    /// Distinct destination codes, sorted
    pub fn destinations(&self) -> Vec<String> {
        self.flights
            .iter()
            .map(|f| f.destination.clone())
            .collect::<BTreeSet<_>>()
            .into_iter()
            .collect()
    }
}

/// Parse a JSON array of records from `path`
pub fn load_collection<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, CatalogError> {
    let display = path.display().to_string();

    let file = File::open(path).map_err(|source| CatalogError::Io {
        path: display.clone(),
        source,
    })?;

    serde_json::from_reader(BufReader::new(file)).map_err(|source| CatalogError::Json {
        path: display,
        source,
    })
}

fn load_or_empty<T: DeserializeOwned>(path: &Path, label: &str) -> Vec<T> {
    match load_collection(path) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!("Could not load {}, continuing with none: {}", label, e);
            Vec::new()
        }
    }
}
