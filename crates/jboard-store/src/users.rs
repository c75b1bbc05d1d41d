//! User repository.

use bson::oid::ObjectId;
use bson::{doc, DateTime};
use mongodb::{Collection, Database};

use jboard_models::User;

use crate::error::StoreResult;
use crate::metrics;

const COLLECTION: &str = "users";

#[derive(Debug, Clone)]
pub struct UserRepository {
    collection: Collection<User>,
}

impl UserRepository {
    pub fn new(database: &Database) -> Self {
        Self {
            collection: database.collection(COLLECTION),
        }
    }

    /// Insert a new user. Unique-index violations on name or email surface
    /// as `StoreError::Duplicate`.
    pub async fn create(&self, mut user: User) -> StoreResult<User> {
        metrics::observe(COLLECTION, "insert", async {
            let result = self.collection.insert_one(&user).await?;
            user.id = result.inserted_id.as_object_id();
            Ok(user)
        })
        .await
    }

    pub async fn find_by_id(&self, id: ObjectId) -> StoreResult<Option<User>> {
        metrics::observe(COLLECTION, "find_by_id", async {
            Ok(self.collection.find_one(doc! { "_id": id }).await?)
        })
        .await
    }

    pub async fn find_by_email(&self, email: &str) -> StoreResult<Option<User>> {
        metrics::observe(COLLECTION, "find_by_email", async {
            Ok(self.collection.find_one(doc! { "email": email }).await?)
        })
        .await
    }

    pub async fn find_by_name(&self, name: &str) -> StoreResult<Option<User>> {
        metrics::observe(COLLECTION, "find_by_name", async {
            Ok(self.collection.find_one(doc! { "name": name }).await?)
        })
        .await
    }

    /// Update name and/or email, returning the updated document.
    pub async fn update_profile(
        &self,
        id: ObjectId,
        name: Option<&str>,
        email: Option<&str>,
    ) -> StoreResult<Option<User>> {
        let mut set = doc! { "updatedAt": DateTime::now() };
        if let Some(name) = name {
            set.insert("name", name);
        }
        if let Some(email) = email {
            set.insert("email", email);
        }

        metrics::observe(COLLECTION, "update_profile", async {
            let updated = self
                .collection
                .find_one_and_update(doc! { "_id": id }, doc! { "$set": set })
                .return_document(mongodb::options::ReturnDocument::After)
                .await?;
            Ok(updated)
        })
        .await
    }

    /// Replace the stored password hash.
    pub async fn update_password(&self, id: ObjectId, password_hash: &str) -> StoreResult<()> {
        metrics::observe(COLLECTION, "update_password", async {
            self.collection
                .update_one(
                    doc! { "_id": id },
                    doc! { "$set": { "password": password_hash, "updatedAt": DateTime::now() } },
                )
                .await?;
            Ok(())
        })
        .await
    }
}
