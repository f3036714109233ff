// tasktracker-service/src/utils/user_storage.rs
use crate::models::{ServiceError, User};
use crate::utils::storage::{unique_violation, Store};
use log::info;

impl Store {
    // Save a new user; emails are unique
    pub fn insert_user(&self, user: User) -> Result<User, ServiceError> {
        self.write(|tables| {
            if tables.users.values().any(|u| u.email == user.email) {
                return Err(unique_violation("users.email"));
            }
            tables.users.insert(user.id.clone(), user.clone());
            info!("✅ Saved user: {}", user.id);
            Ok(user)
        })
    }

    pub fn find_user_by_email(&self, email: &str) -> Result<Option<User>, ServiceError> {
        self.read(|tables| tables.users.values().find(|u| u.email == email).cloned())
    }

    pub fn find_user_by_id(&self, id: &str) -> Result<Option<User>, ServiceError> {
        self.read(|tables| tables.users.get(id).cloned())
    }
}
