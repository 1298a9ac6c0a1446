use uuid::Uuid;

use crate::error::ApiError;

/// Claims the bearer token vouches for. Trusted as-is by the decision
/// functions; nothing here re-queries the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Identity {
    pub user_id: Uuid,
    pub is_admin: bool,
}

impl Identity {
    pub fn new(user_id: Uuid, is_admin: bool) -> Self {
        Self { user_id, is_admin }
    }
}

/// Admin-only operations (user listing).
pub fn ensure_admin(caller: &Identity) -> Result<(), ApiError> {
    if caller.is_admin {
        Ok(())
    } else {
        Err(ApiError::Forbidden("admin privileges required"))
    }
}

/// Creating a user with the admin flag set needs a valid admin credential;
/// anonymous registration is fine otherwise.
pub fn ensure_may_grant_admin(caller: Option<&Identity>, wants_admin: bool) -> Result<(), ApiError> {
    if !wants_admin {
        return Ok(());
    }
    match caller {
        Some(identity) if identity.is_admin => Ok(()),
        _ => Err(ApiError::Forbidden(
            "admin privileges required to create admin users",
        )),
    }
}

/// Profile updates: the target user themselves or an admin.
pub fn ensure_self_or_admin(caller: &Identity, target_user_id: Uuid) -> Result<(), ApiError> {
    if caller.is_admin || caller.user_id == target_user_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden("you can only modify your own profile"))
    }
}

/// Decide who a new place belongs to. Non-admins always own what they
/// create; admins may name any owner and default to themselves.
pub fn resolve_place_owner(
    caller: &Identity,
    requested_owner: Option<Uuid>,
) -> Result<Uuid, ApiError> {
    match requested_owner {
        None => Ok(caller.user_id),
        Some(owner) if owner == caller.user_id || caller.is_admin => Ok(owner),
        Some(_) => Err(ApiError::Forbidden(
            "you cannot create a place for another user",
        )),
    }
}

/// Place mutation: the owner or an admin.
pub fn ensure_place_editable(caller: &Identity, owner_id: Uuid) -> Result<(), ApiError> {
    if caller.is_admin || caller.user_id == owner_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden("you can only modify your own places"))
    }
}

/// Ownership transfer is an admin-only field.
pub fn ensure_may_change_owner(caller: &Identity, payload_has_owner: bool) -> Result<(), ApiError> {
    if payload_has_owner && !caller.is_admin {
        Err(ApiError::Forbidden("you cannot modify the owner of a place"))
    } else {
        Ok(())
    }
}

/// Owners may not review their own places.
pub fn ensure_not_place_owner(caller: &Identity, place_owner_id: Uuid) -> Result<(), ApiError> {
    if caller.user_id == place_owner_id {
        Err(ApiError::Forbidden("you cannot review your own place"))
    } else {
        Ok(())
    }
}

/// Review mutation and deletion are author-only; there is deliberately no
/// admin override here.
pub fn ensure_review_author(caller: &Identity, author_id: Uuid) -> Result<(), ApiError> {
    if caller.user_id == author_id {
        Ok(())
    } else {
        Err(ApiError::Forbidden("only the author can modify a review"))
    }
}
