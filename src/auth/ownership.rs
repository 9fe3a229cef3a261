use uuid::Uuid;

use crate::error::AuthError;

/// Allow a mutation only when the authenticated subject owns the resource.
///
/// A denial is `Forbidden`: the caller is known but may not act here.
pub fn authorize_mutation(subject: Uuid, resource_owner: Uuid) -> Result<(), AuthError> {
    if subject == resource_owner {
        Ok(())
    } else {
        tracing::warn!(
            subject = %subject,
            owner = %resource_owner,
            "Mutation denied for non-owner"
        );
        Err(AuthError::Forbidden)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_owner_is_allowed() {
        let a = Uuid::new_v4();
        assert!(authorize_mutation(a, a).is_ok());
    }

    #[test]
    fn test_other_subject_is_forbidden() {
        let a = Uuid::new_v4();
        let b = Uuid::new_v4();
        assert_eq!(authorize_mutation(a, b), Err(AuthError::Forbidden));
    }
}
