use log::{debug, info};
use std::sync::Arc;

use super::users_model::{NewUser, User};
use super::users_traits::{UserRepositoryTrait, UserServiceTrait};
use crate::errors::{DatabaseError, Error, Result};

/// Service for registering and looking up user profiles
pub struct UserService {
    repository: Arc<dyn UserRepositoryTrait>,
}

impl UserService {
    pub fn new(repository: Arc<dyn UserRepositoryTrait>) -> Self {
        Self { repository }
    }
}

#[async_trait::async_trait]
impl UserServiceTrait for UserService {
    async fn register_user(&self, new_user: NewUser) -> Result<User> {
        new_user.validate()?;
        debug!("Registering {} profile", new_user.role);

        let user = self.repository.create(new_user).await.map_err(|e| match e {
            Error::Database(DatabaseError::UniqueViolation(_)) => {
                Error::ConstraintViolation("A user with this email already exists".to_string())
            }
            other => other,
        })?;

        info!("Registered user {} with role {}", user.id, user.role);
        Ok(user)
    }

    fn get_user(&self, user_id: &str) -> Result<User> {
        self.repository
            .get_by_id(user_id)?
            .ok_or_else(|| Error::not_found("User", user_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::users::{Language, Role};
    use async_trait::async_trait;
    use chrono::Utc;
    use std::sync::Mutex;

    #[derive(Default)]
    struct MockUserRepository {
        users: Mutex<Vec<User>>,
    }

    #[async_trait]
    impl UserRepositoryTrait for MockUserRepository {
        async fn create(&self, new_user: NewUser) -> Result<User> {
            let mut users = self.users.lock().unwrap();
            let email = new_user.email.clone().unwrap_or_default();
            if users.iter().any(|u| u.email == email) {
                return Err(DatabaseError::UniqueViolation("users.email".into()).into());
            }
            let now = Utc::now().naive_utc();
            let user = User {
                id: format!("user-{}", users.len() + 1),
                name: new_user.name.unwrap_or_default(),
                email,
                phone: new_user.phone,
                role: new_user.role,
                language: new_user.language,
                verified: false,
                created_at: now,
                updated_at: now,
            };
            users.push(user.clone());
            Ok(user)
        }

        fn get_by_id(&self, user_id: &str) -> Result<Option<User>> {
            Ok(self
                .users
                .lock()
                .unwrap()
                .iter()
                .find(|u| u.id == user_id)
                .cloned())
        }
    }

    fn donor(email: &str) -> NewUser {
        NewUser {
            name: Some("Sami".to_string()),
            email: Some(email.to_string()),
            phone: None,
            role: Role::Donor,
            language: Language::En,
        }
    }

    #[tokio::test]
    async fn test_register_then_get() {
        let service = UserService::new(Arc::new(MockUserRepository::default()));
        let user = service.register_user(donor("sami@example.org")).await.unwrap();
        assert_eq!(user.role, Role::Donor);
        assert_eq!(service.get_user(&user.id).unwrap(), user);
    }

    #[tokio::test]
    async fn test_duplicate_email_is_constraint_violation() {
        let service = UserService::new(Arc::new(MockUserRepository::default()));
        service.register_user(donor("dup@example.org")).await.unwrap();
        let err = service.register_user(donor("dup@example.org")).await.unwrap_err();
        assert!(matches!(err, Error::ConstraintViolation(_)));
    }

    #[tokio::test]
    async fn test_invalid_profile_never_reaches_repository() {
        let repository = Arc::new(MockUserRepository::default());
        let service = UserService::new(repository.clone());
        let mut user = donor("x@example.org");
        user.name = None;
        assert!(service.register_user(user).await.is_err());
        assert!(repository.users.lock().unwrap().is_empty());
    }

    #[test]
    fn test_get_unknown_user_is_not_found() {
        let service = UserService::new(Arc::new(MockUserRepository::default()));
        assert!(matches!(service.get_user("nobody"), Err(Error::NotFound(_))));
    }
}
