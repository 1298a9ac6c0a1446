use serde_json::Value;
use tracing::info;
use uuid::Uuid;

use super::Facade;
use crate::auth::password::{hash_password, validate_password};
use crate::domain::base::as_str;
use crate::domain::{FieldMap, User};
use crate::error::ApiError;
use crate::policy::{self, Identity};

/// Field set for user registration.
#[derive(Debug)]
pub struct NewUser {
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password: String,
    pub is_admin: bool,
}

// Fields a user may not change on themselves without an admin credential.
const ADMIN_ONLY_USER_FIELDS: [&str; 3] = ["email", "password", "is_admin"];

impl Facade {
    /// Register a user. Anonymous callers may create regular accounts;
    /// granting the admin flag requires an admin credential.
    pub async fn create_user(
        &self,
        caller: Option<&Identity>,
        new: NewUser,
    ) -> Result<User, ApiError> {
        policy::ensure_may_grant_admin(caller, new.is_admin)?;

        let email = new.email.trim().to_lowercase();
        if self
            .users
            .find_first_by_attribute("email", &email)
            .await
            .is_some()
        {
            return Err(ApiError::Conflict("email already registered".into()));
        }

        validate_password(&new.password)?;
        let digest = hash_password(&new.password)?;
        let user = User::new(new.first_name, new.last_name, email, digest, new.is_admin)?;
        self.users.add(user.clone()).await?;

        info!(user_id = %user.meta.id, email = %user.email, "user created");
        Ok(user)
    }

    /// Startup seed for the first admin account. Skips silently when the
    /// email is already registered, so restarts stay idempotent.
    pub async fn bootstrap_admin(
        &self,
        first_name: &str,
        last_name: &str,
        email: &str,
        password: &str,
    ) -> Result<Option<User>, ApiError> {
        let email = email.trim().to_lowercase();
        if self
            .users
            .find_first_by_attribute("email", &email)
            .await
            .is_some()
        {
            return Ok(None);
        }
        validate_password(password)?;
        let digest = hash_password(password)?;
        let admin = User::new(first_name.into(), last_name.into(), email, digest, true)?;
        self.users.add(admin.clone()).await?;
        info!(user_id = %admin.meta.id, email = %admin.email, "admin account seeded");
        Ok(Some(admin))
    }

    pub async fn get_user(&self, user_id: Uuid) -> Option<User> {
        self.users.get(user_id).await
    }

    pub async fn get_user_by_email(&self, email: &str) -> Option<User> {
        self.users
            .find_first_by_attribute("email", &email.trim().to_lowercase())
            .await
    }

    /// Full user listing, admin only.
    pub async fn list_users(&self, caller: &Identity) -> Result<Vec<User>, ApiError> {
        policy::ensure_admin(caller)?;
        Ok(self.users.get_all().await)
    }

    /// Partial profile update. Non-admins may only touch their own
    /// first/last name; email uniqueness is re-checked on change and a new
    /// password is hashed before it reaches the repository.
    pub async fn update_user(
        &self,
        caller: &Identity,
        user_id: Uuid,
        mut fields: FieldMap,
    ) -> Result<User, ApiError> {
        policy::ensure_self_or_admin(caller, user_id)?;
        if !caller.is_admin {
            for field in ADMIN_ONLY_USER_FIELDS {
                if fields.contains_key(field) {
                    return Err(ApiError::Forbidden(
                        "only admins can modify email, password or admin status",
                    ));
                }
            }
        }

        if self.users.get(user_id).await.is_none() {
            return Err(ApiError::NotFound("user"));
        }

        if let Some(value) = fields.get("email") {
            let email = as_str("email", value)?.trim().to_lowercase();
            if let Some(existing) = self.users.find_first_by_attribute("email", &email).await {
                if existing.meta.id != user_id {
                    return Err(ApiError::Conflict("email already in use".into()));
                }
            }
            fields.insert("email".into(), Value::String(email));
        }

        if let Some(value) = fields.get("password") {
            let plain = as_str("password", value)?;
            validate_password(&plain)?;
            fields.insert("password".into(), Value::String(hash_password(&plain)?));
        }

        self.users
            .update_fields(user_id, &fields)
            .await?
            .ok_or(ApiError::NotFound("user"))
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_support::registered_user;
    use super::*;
    use crate::auth::password::verify_password;
    use serde_json::json;

    fn fields(value: serde_json::Value) -> FieldMap {
        value.as_object().unwrap().clone()
    }

    #[tokio::test]
    async fn anonymous_cannot_mint_admins() {
        let facade = Facade::new();
        let err = facade
            .create_user(
                None,
                NewUser {
                    first_name: "Eve".into(),
                    last_name: "Root".into(),
                    email: "eve@example.com".into(),
                    password: "password123".into(),
                    is_admin: true,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
        assert!(facade.get_user_by_email("eve@example.com").await.is_none());
    }

    #[tokio::test]
    async fn non_admin_credential_cannot_mint_admins_either() {
        let facade = Facade::new();
        let caller = registered_user(&facade, "plain@example.com", false).await;
        let err = facade
            .create_user(
                Some(&caller),
                NewUser {
                    first_name: "Eve".into(),
                    last_name: "Root".into(),
                    email: "eve@example.com".into(),
                    password: "password123".into(),
                    is_admin: true,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn duplicate_email_is_a_conflict() {
        let facade = Facade::new();
        registered_user(&facade, "dup@example.com", false).await;
        let err = facade
            .create_user(
                None,
                NewUser {
                    first_name: "Other".into(),
                    last_name: "Person".into(),
                    email: "DUP@example.com ".into(),
                    password: "password123".into(),
                    is_admin: false,
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));
    }

    #[tokio::test]
    async fn password_round_trip_and_no_plaintext() {
        let facade = Facade::new();
        let user = facade
            .create_user(
                None,
                NewUser {
                    first_name: "Ada".into(),
                    last_name: "Lovelace".into(),
                    email: "ada@example.com".into(),
                    password: "enginecode42".into(),
                    is_admin: false,
                },
            )
            .await
            .unwrap();
        assert!(verify_password("enginecode42", &user.password_hash).unwrap());
        assert!(!verify_password("wrong", &user.password_hash).unwrap());
        assert!(!user.password_hash.contains("enginecode42"));
    }

    #[tokio::test]
    async fn listing_users_needs_admin() {
        let facade = Facade::new();
        let caller = registered_user(&facade, "plain@example.com", false).await;
        assert!(matches!(
            facade.list_users(&caller).await.unwrap_err(),
            ApiError::Forbidden(_)
        ));

        let admin = registered_user(&facade, "root@example.com", true).await;
        assert_eq!(facade.list_users(&admin).await.unwrap().len(), 2);
    }

    #[tokio::test]
    async fn self_update_is_limited_to_names() {
        let facade = Facade::new();
        let caller = registered_user(&facade, "plain@example.com", false).await;

        let updated = facade
            .update_user(&caller, caller.user_id, fields(json!({ "first_name": "New" })))
            .await
            .unwrap();
        assert_eq!(updated.first_name, "New");

        let err = facade
            .update_user(&caller, caller.user_id, fields(json!({ "is_admin": true })))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));

        let err = facade
            .update_user(&caller, caller.user_id, fields(json!({ "email": "x@y.z" })))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn admin_email_change_rechecks_uniqueness() {
        let facade = Facade::new();
        let target = registered_user(&facade, "target@example.com", false).await;
        registered_user(&facade, "taken@example.com", false).await;
        let admin = registered_user(&facade, "root@example.com", true).await;

        let err = facade
            .update_user(
                &admin,
                target.user_id,
                fields(json!({ "email": "taken@example.com" })),
            )
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Conflict(_)));

        let updated = facade
            .update_user(
                &admin,
                target.user_id,
                fields(json!({ "email": "fresh@example.com" })),
            )
            .await
            .unwrap();
        assert_eq!(updated.email, "fresh@example.com");
    }

    #[tokio::test]
    async fn admin_password_change_is_rehashed() {
        let facade = Facade::new();
        let target = registered_user(&facade, "target@example.com", false).await;
        let admin = registered_user(&facade, "root@example.com", true).await;

        let updated = facade
            .update_user(
                &admin,
                target.user_id,
                fields(json!({ "password": "brandnewpass" })),
            )
            .await
            .unwrap();
        assert!(verify_password("brandnewpass", &updated.password_hash).unwrap());

        let err = facade
            .update_user(&admin, target.user_id, fields(json!({ "password": "short" })))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Validation(_)));
    }

    #[tokio::test]
    async fn updating_a_stranger_is_forbidden() {
        let facade = Facade::new();
        let caller = registered_user(&facade, "a@example.com", false).await;
        let other = registered_user(&facade, "b@example.com", false).await;
        let err = facade
            .update_user(&caller, other.user_id, fields(json!({ "first_name": "Hax" })))
            .await
            .unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
    }

    #[tokio::test]
    async fn bootstrap_admin_is_idempotent() {
        let facade = Facade::new();
        let first = facade
            .bootstrap_admin("Root", "Admin", "root@example.com", "adminpass123")
            .await
            .unwrap();
        assert!(first.is_some());
        let second = facade
            .bootstrap_admin("Root", "Admin", "root@example.com", "adminpass123")
            .await
            .unwrap();
        assert!(second.is_none());
    }

    #[tokio::test]
    async fn empty_update_still_refreshes_updated_at() {
        let facade = Facade::new();
        let caller = registered_user(&facade, "a@example.com", false).await;
        let before = facade.get_user(caller.user_id).await.unwrap();
        tokio::time::sleep(std::time::Duration::from_millis(2)).await;
        let after = facade
            .update_user(&caller, caller.user_id, FieldMap::new())
            .await
            .unwrap();
        assert!(after.meta.updated_at > before.meta.updated_at);
        assert_eq!(after.first_name, before.first_name);
        assert_eq!(after.email, before.email);
    }
}
