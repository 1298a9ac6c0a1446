pub mod amenity;
pub mod base;
pub mod place;
pub mod review;
pub mod user;

pub use amenity::Amenity;
pub use base::EntityMeta;
pub use place::Place;
pub use review::Review;
pub use user::User;

/// Update payloads arrive as raw JSON field maps; unknown keys are ignored.
pub type FieldMap = serde_json::Map<String, serde_json::Value>;
