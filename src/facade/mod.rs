mod amenities;
mod places;
mod reviews;
mod users;

pub use places::NewPlace;
pub use reviews::NewReview;
pub use users::NewUser;

use crate::domain::{Amenity, Place, Review, User};
use crate::storage::{InMemoryRepository, Repository};

/// Single composition point for every logical operation: resolves foreign
/// references, enforces the authorization policy and the entity validators,
/// and only then touches a repository. Handlers never reach past it.
pub struct Facade {
    users: Box<dyn Repository<User>>,
    places: Box<dyn Repository<Place>>,
    reviews: Box<dyn Repository<Review>>,
    amenities: Box<dyn Repository<Amenity>>,
}

impl Facade {
    pub fn new() -> Self {
        Self {
            users: Box::new(InMemoryRepository::new()),
            places: Box::new(InMemoryRepository::new()),
            reviews: Box::new(InMemoryRepository::new()),
            amenities: Box::new(InMemoryRepository::new()),
        }
    }
}

impl Default for Facade {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::policy::Identity;

    pub async fn registered_user(facade: &Facade, email: &str, is_admin: bool) -> Identity {
        let user = if is_admin {
            facade
                .bootstrap_admin("Root", "Admin", email, "adminpass123")
                .await
                .expect("bootstrap admin")
                .expect("admin seeded")
        } else {
            facade
                .create_user(
                    None,
                    NewUser {
                        first_name: "Test".into(),
                        last_name: "User".into(),
                        email: email.into(),
                        password: "password123".into(),
                        is_admin: false,
                    },
                )
                .await
                .expect("create user")
        };
        Identity::new(user.meta.id, user.is_admin)
    }

    pub async fn listed_place(facade: &Facade, owner: &Identity, amenities: &[&str]) -> Place {
        let (place, _) = facade
            .create_place(
                owner,
                NewPlace {
                    title: "Loft".into(),
                    description: "Bright and quiet".into(),
                    price: 120.0,
                    latitude: 48.85,
                    longitude: 2.35,
                    owner_id: None,
                    amenities: amenities.iter().map(|s| s.to_string()).collect(),
                },
            )
            .await
            .expect("create place");
        place
    }
}
