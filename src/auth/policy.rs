//! Role gating as a declarative allow-set table.
//!
//! Gated handlers name their route here and call [`authorize`]; routes absent
//! from the table are open to any authenticated caller.

use crate::shared::error::{ApiError, ApiResult};
use crate::shared::models::{Role, User};

pub struct RoutePolicy {
    pub route: &'static str,
    pub allow: &'static [Role],
}

pub const POLICY: &[RoutePolicy] = &[
    RoutePolicy {
        route: "guides.create",
        allow: &[Role::Admin],
    },
    RoutePolicy {
        route: "guides.create_version",
        allow: &[Role::Admin],
    },
    RoutePolicy {
        route: "analytics.overview",
        allow: &[Role::Admin],
    },
    RoutePolicy {
        route: "analytics.sessions",
        allow: &[Role::Admin],
    },
];

pub fn allowed_roles(route: &str) -> Option<&'static [Role]> {
    POLICY.iter().find(|p| p.route == route).map(|p| p.allow)
}

pub fn authorize(user: &User, route: &str) -> ApiResult<()> {
    match allowed_roles(route) {
        Some(allow) if !allow.contains(&user.role) => {
            Err(ApiError::forbidden("Insufficient permissions"))
        }
        _ => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user_with_role(role: Role) -> User {
        User::new("u@example.com".into(), "hash".into(), role)
    }

    #[test]
    fn admin_routes_deny_non_admins() {
        for route in ["guides.create", "guides.create_version", "analytics.overview"] {
            assert!(authorize(&user_with_role(Role::Admin), route).is_ok());
            assert!(authorize(&user_with_role(Role::Agent), route).is_err());
            assert!(authorize(&user_with_role(Role::Customer), route).is_err());
        }
    }

    #[test]
    fn unlisted_routes_are_open() {
        assert!(authorize(&user_with_role(Role::Customer), "guides.list").is_ok());
        assert_eq!(allowed_roles("guides.list"), None);
    }
}
