use std::{path::Path, sync::Arc};

use tokio::fs;
use tracing::info;

use super::{DocumentStore, JsonCollection};
use crate::errors::ServiceError;

pub const APPLIED_USERS: &str = "appliedUsers";
pub const SERVICES: &str = "services";
pub const PRODUCTS: &str = "products";
pub const BOOKINGS: &str = "bookings";

/// The four collections the car-doctor API works against.
///
/// Built once at startup and shared by every handler; cloning only bumps
/// reference counts.
#[derive(Clone)]
pub struct Database {
    pub applied_users: Arc<dyn DocumentStore>,
    pub services: Arc<dyn DocumentStore>,
    pub products: Arc<dyn DocumentStore>,
    pub bookings: Arc<dyn DocumentStore>,
}

impl Database {
    /// Open (or create) the file-backed collections under `<data_dir>/<name>/`.
    pub async fn open(data_dir: impl AsRef<Path>, name: &str) -> Result<Self, ServiceError> {
        let root = data_dir.as_ref().join(name);
        fs::create_dir_all(&root).await.map_err(ServiceError::storage)?;

        let open = |collection: &'static str| JsonCollection::open(collection, root.join(format!("{collection}.json")));
        let db = Self {
            applied_users: open(APPLIED_USERS).await?,
            services: open(SERVICES).await?,
            products: open(PRODUCTS).await?,
            bookings: open(BOOKINGS).await?,
        };
        info!(root = %root.display(), "document collections ready");
        Ok(db)
    }

    /// Assemble from already-built stores, e.g. alternative backends.
    pub fn from_stores(
        applied_users: Arc<dyn DocumentStore>,
        services: Arc<dyn DocumentStore>,
        products: Arc<dyn DocumentStore>,
        bookings: Arc<dyn DocumentStore>,
    ) -> Self {
        Self { applied_users, services, products, bookings }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{Filter, FindOptions};
    use serde_json::json;

    #[tokio::test]
    async fn opens_four_named_collections() -> Result<(), anyhow::Error> {
        let dir = std::env::temp_dir().join(format!("car_doctor_db_{}", uuid::Uuid::new_v4()));
        let db = Database::open(&dir, "carDoctors").await?;
        assert_eq!(db.applied_users.name(), "appliedUsers");
        assert_eq!(db.services.name(), "services");
        assert_eq!(db.products.name(), "products");
        assert_eq!(db.bookings.name(), "bookings");
        for c in [APPLIED_USERS, SERVICES, PRODUCTS, BOOKINGS] {
            assert!(fs::metadata(dir.join("carDoctors").join(format!("{c}.json"))).await.is_ok());
        }

        // collections are independent
        let doc = json!({"email": "a@x.com"}).as_object().cloned().unwrap();
        db.bookings.insert_one(doc).await?;
        assert!(db.products.find(&Filter::all(), &FindOptions::default()).await?.is_empty());
        assert_eq!(db.bookings.find(&Filter::all(), &FindOptions::default()).await?.len(), 1);

        let _ = fs::remove_dir_all(&dir).await;
        Ok(())
    }
}
