use super::claims::Principal;
use crate::error::ApiError;

/// A resource that records the user who created it.
pub trait Owned {
    fn owner_id(&self) -> i32;
}

/// Strict equality of owner and caller. There is no admin override.
pub fn check_ownership(resource_owner_id: i32, principal_id: i32) -> bool {
    resource_owner_id == principal_id
}

/// Reject with `Forbidden` unless `principal` owns `resource`.
///
/// The caller must already have loaded `resource`; a missing resource is a
/// `NotFound` and never reaches this check.
pub fn authorize_mutation<R: Owned>(
    principal: &Principal,
    resource: &R,
    action: &str,
    kind: &str,
) -> Result<(), ApiError> {
    let principal_id = principal.user_id()?;

    if check_ownership(resource.owner_id(), principal_id) {
        Ok(())
    } else {
        tracing::warn!(
            "User {} attempted to {} {} owned by user {}",
            principal_id,
            action,
            kind,
            resource.owner_id()
        );
        Err(ApiError::forbidden(format!(
            "You are not authorized to {} this {}",
            action, kind
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::claims::Claims;
    use chrono::{Duration, Utc};

    struct Post(i32);

    impl Owned for Post {
        fn owner_id(&self) -> i32 {
            self.0
        }
    }

    fn principal(id: i32) -> Principal {
        Principal::from(Claims::new(id, Utc::now(), Duration::hours(1)))
    }

    #[test]
    fn owner_may_mutate() {
        assert!(authorize_mutation(&principal(3), &Post(3), "delete", "thread").is_ok());
    }

    #[test]
    fn non_owner_is_forbidden() {
        let err = authorize_mutation(&principal(4), &Post(3), "update", "comment").unwrap_err();
        assert!(matches!(err, ApiError::Forbidden(_)));
        assert_eq!(err.message(), "You are not authorized to update this comment");
    }

    #[test]
    fn check_is_plain_equality() {
        assert!(check_ownership(10, 10));
        assert!(!check_ownership(10, 11));
        assert!(!check_ownership(0, 1));
    }
}
