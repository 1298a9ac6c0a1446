use lazy_static::lazy_static;
use regex::Regex;

use super::base::{as_bool, as_str, EntityMeta};
use super::FieldMap;
use crate::error::ApiError;
use crate::storage::StoredEntity;

const NAME_MAX: usize = 50;

pub(crate) fn is_valid_email(email: &str) -> bool {
    lazy_static! {
        static ref EMAIL_RE: Regex = Regex::new(r"^[^@\s]+@[^@\s]+$").unwrap();
    }
    EMAIL_RE.is_match(email)
}

/// Account with personal details and an admin flag. The password is held
/// only as an argon2 digest; hashing happens in the facade before the
/// entity is constructed or updated.
#[derive(Debug, Clone)]
pub struct User {
    pub meta: EntityMeta,
    pub first_name: String,
    pub last_name: String,
    pub email: String,
    pub password_hash: String,
    pub is_admin: bool,
}

fn validate_name(field: &str, value: &str) -> Result<(), ApiError> {
    if value.chars().count() > NAME_MAX {
        return Err(ApiError::Validation(format!(
            "{field} must be at most {NAME_MAX} characters"
        )));
    }
    Ok(())
}

fn validate_email(email: &str) -> Result<(), ApiError> {
    if !is_valid_email(email) {
        return Err(ApiError::Validation("email is not valid".into()));
    }
    Ok(())
}

impl User {
    pub fn new(
        first_name: String,
        last_name: String,
        email: String,
        password_hash: String,
        is_admin: bool,
    ) -> Result<Self, ApiError> {
        validate_name("first_name", &first_name)?;
        validate_name("last_name", &last_name)?;
        validate_email(&email)?;
        Ok(Self {
            meta: EntityMeta::new(),
            first_name,
            last_name,
            email,
            password_hash,
            is_admin,
        })
    }
}

impl StoredEntity for User {
    fn id(&self) -> uuid::Uuid {
        self.meta.id
    }

    fn attribute(&self, name: &str) -> Option<String> {
        match name {
            "email" => Some(self.email.clone()),
            "first_name" => Some(self.first_name.clone()),
            "last_name" => Some(self.last_name.clone()),
            _ => None,
        }
    }

    // The "password" key carries an already-hashed digest here; the facade
    // hashes the plaintext before building the field map.
    fn apply_fields(&mut self, fields: &FieldMap) -> Result<(), ApiError> {
        for (key, value) in fields {
            match key.as_str() {
                "first_name" => {
                    let v = as_str("first_name", value)?;
                    validate_name("first_name", &v)?;
                    self.first_name = v;
                }
                "last_name" => {
                    let v = as_str("last_name", value)?;
                    validate_name("last_name", &v)?;
                    self.last_name = v;
                }
                "email" => {
                    let v = as_str("email", value)?;
                    validate_email(&v)?;
                    self.email = v;
                }
                "is_admin" => self.is_admin = as_bool("is_admin", value)?,
                "password" => self.password_hash = as_str("password", value)?,
                _ => {}
            }
        }
        Ok(())
    }

    fn touch(&mut self) {
        self.meta.touch();
    }
}
