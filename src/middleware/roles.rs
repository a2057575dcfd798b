//! Role checks
//!
//! Owners hold every admin privilege, with one exception: they cannot touch
//! admin accounts or hand out the admin role.

use crate::{
    error::{AppError, AppResult},
    models::Role,
};

/// Required-role sets used by handlers
pub const ADMIN: &[Role] = &[Role::Admin];
pub const ADMIN_OR_OWNER: &[Role] = &[Role::Admin, Role::Owner];
pub const MANAGERS: &[Role] = &[Role::Admin, Role::Owner, Role::Leader];
pub const LEADER: &[Role] = &[Role::Leader];

/// Whether `role` satisfies any of `required`. An empty set allows everyone.
pub fn permits(role: Role, required: &[Role]) -> bool {
    if required.is_empty() {
        return true;
    }
    match role {
        Role::Owner => required.contains(&Role::Owner) || required.contains(&Role::Admin),
        other => required.contains(&other),
    }
}

/// Check an actor may modify or delete an account, optionally giving it a new role
pub fn ensure_can_manage(actor: Role, target: Role, requested: Option<Role>) -> AppResult<()> {
    if !actor.is_admin() {
        return Err(AppError::forbidden());
    }
    if actor == Role::Owner {
        if target == Role::Admin {
            return Err(AppError::Forbidden(
                "Owners cannot modify admin accounts".to_string(),
            ));
        }
        if requested == Some(Role::Admin) {
            return Err(AppError::Forbidden(
                "Owners cannot grant the admin role".to_string(),
            ));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_requirement_allows_all() {
        assert!(permits(Role::User, &[]));
    }

    #[test]
    fn test_owner_inherits_admin() {
        assert!(permits(Role::Owner, ADMIN));
        assert!(permits(Role::Owner, ADMIN_OR_OWNER));
        assert!(!permits(Role::Owner, LEADER));
    }

    #[test]
    fn test_exact_role_match() {
        assert!(permits(Role::Leader, MANAGERS));
        assert!(!permits(Role::Leader, ADMIN_OR_OWNER));
        assert!(!permits(Role::User, MANAGERS));
        assert!(permits(Role::Admin, ADMIN));
        assert!(!permits(Role::Admin, &[Role::Owner]));
    }

    #[test]
    fn test_owner_cannot_touch_admins() {
        assert!(ensure_can_manage(Role::Owner, Role::Admin, None).is_err());
        assert!(ensure_can_manage(Role::Owner, Role::User, Some(Role::Admin)).is_err());
        assert!(ensure_can_manage(Role::Owner, Role::User, Some(Role::Leader)).is_ok());
    }

    #[test]
    fn test_admin_can_manage_anyone() {
        assert!(ensure_can_manage(Role::Admin, Role::Admin, Some(Role::Admin)).is_ok());
        assert!(ensure_can_manage(Role::Admin, Role::Owner, None).is_ok());
    }

    #[test]
    fn test_non_admin_cannot_manage() {
        assert!(ensure_can_manage(Role::Leader, Role::User, None).is_err());
    }
}
