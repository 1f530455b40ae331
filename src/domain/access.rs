use super::Role;

/// An authenticated principal, resolved from a bearer token before any
/// protected handler runs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Caller {
    pub user_id: i32,
    pub role: Role,
}

impl Caller {
    #[must_use]
    pub const fn new(user_id: i32, role: Role) -> Self {
        Self { user_id, role }
    }

    #[must_use]
    pub const fn is_admin(&self) -> bool {
        matches!(self.role, Role::Admin)
    }

    /// Admins may modify anything; everyone else only what they own.
    #[must_use]
    pub const fn can_modify(&self, owner_id: i32) -> bool {
        self.is_admin() || self.user_id == owner_id
    }

    pub const fn require_admin(&self) -> Result<(), InsufficientPermissions> {
        if self.is_admin() {
            Ok(())
        } else {
            Err(InsufficientPermissions)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
#[error("Forbidden: Insufficient permissions")]
pub struct InsufficientPermissions;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn owner_and_admin_can_modify() {
        let reviewer = Caller::new(7, Role::Reviewer);
        let admin = Caller::new(1, Role::Admin);

        assert!(reviewer.can_modify(7));
        assert!(!reviewer.can_modify(8));
        assert!(admin.can_modify(7));
        assert!(admin.can_modify(8));
    }

    #[test]
    fn only_admin_passes_admin_gate() {
        assert!(Caller::new(1, Role::Admin).require_admin().is_ok());
        assert_eq!(
            Caller::new(2, Role::Reviewer).require_admin(),
            Err(InsufficientPermissions)
        );
    }
}
