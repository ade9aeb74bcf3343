//! Role-based authorization guard

use crate::auth::models::UserRole;

/// Roles a route accepts. An empty set leaves the route unrestricted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RequiredRoles(&'static [UserRole]);

impl RequiredRoles {
    pub const ANY: RequiredRoles = RequiredRoles(&[]);

    pub const fn new(roles: &'static [UserRole]) -> Self {
        Self(roles)
    }

    pub fn roles(&self) -> &'static [UserRole] {
        self.0
    }

    /// Check a caller's verified role against this declaration
    pub fn allows(&self, role: Option<UserRole>) -> bool {
        is_authorized(self.0, role)
    }
}

/// Grant iff `required` is empty or contains the caller's role.
///
/// A caller without a verified token has no role and only passes
/// unrestricted routes.
pub fn is_authorized(required: &[UserRole], role: Option<UserRole>) -> bool {
    required.is_empty() || role.is_some_and(|role| required.contains(&role))
}

#[cfg(test)]
mod tests {
    use super::*;

    const STAFF: RequiredRoles = RequiredRoles::new(&[UserRole::Instructor, UserRole::Admin]);

    #[test]
    fn test_staff_route() {
        assert!(!STAFF.allows(Some(UserRole::Student)));
        assert!(STAFF.allows(Some(UserRole::Instructor)));
        assert!(STAFF.allows(Some(UserRole::Admin)));
        assert!(!STAFF.allows(None));
    }

    #[test]
    fn test_unrestricted_route() {
        assert!(RequiredRoles::ANY.allows(Some(UserRole::Student)));
        assert!(RequiredRoles::ANY.allows(Some(UserRole::Admin)));
        assert!(RequiredRoles::ANY.allows(None));
    }

    #[test]
    fn test_single_role() {
        assert!(is_authorized(&[UserRole::Admin], Some(UserRole::Admin)));
        assert!(!is_authorized(&[UserRole::Admin], Some(UserRole::Instructor)));
    }
}
