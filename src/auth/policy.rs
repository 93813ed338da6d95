//! Pure access predicates, evaluated after the caller has been authenticated.

use uuid::Uuid;

use crate::{
    auth::claims::Identity,
    error::{AppError, ACCESS_DENIED},
};

pub fn admin_only(identity: &Identity) -> Result<(), AppError> {
    if identity.is_admin() {
        Ok(())
    } else {
        Err(AppError::AdminRequired)
    }
}

pub fn self_or_admin(identity: &Identity, owner_id: Uuid) -> Result<(), AppError> {
    if identity.is_admin() || identity.id == owner_id {
        Ok(())
    } else {
        Err(AppError::Forbidden(ACCESS_DENIED.into()))
    }
}
