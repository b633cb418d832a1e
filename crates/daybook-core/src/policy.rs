//! Role based resource limits
//!
//! The only place that decides how many items of a resource type an account
//! may own. Call sites ask the policy once per operation instead of checking
//! roles inline.

use crate::prelude::*;

/// Number of owned items per resource type for the `user` role
pub const DEFAULT_USER_LIMIT: u32 = 5;

#[derive(Clone, Copy, Debug)]
pub struct RoleFeaturePolicy {
	user_limit: u32,
}

impl RoleFeaturePolicy {
	pub fn new(user_limit: u32) -> Self {
		Self { user_limit }
	}

	/// Limit of owned items of `resource` for an account with `role`
	pub fn limit_for(&self, role: Role, _resource: ResourceType) -> Limit {
		match role {
			Role::Admin | Role::Premium => Limit::Unlimited,
			Role::User => Limit::Limited(self.user_limit),
		}
	}

	/// Like [`limit_for`](Self::limit_for), for a resource type given by name.
	///
	/// Unknown names fail with `InvalidResourceType`.
	pub fn limit_for_name(&self, role: Role, resource: &str) -> ClResult<Limit> {
		Ok(self.limit_for(role, resource.parse()?))
	}
}

impl Default for RoleFeaturePolicy {
	fn default() -> Self {
		Self::new(DEFAULT_USER_LIMIT)
	}
}

#[cfg(test)]
mod tests {
	use super::*;

	#[test]
	fn test_user_role_is_capped_for_every_type() {
		let policy = RoleFeaturePolicy::default();
		for resource in ResourceType::ALL {
			assert_eq!(policy.limit_for(Role::User, resource), Limit::Limited(5));
		}
	}

	#[test]
	fn test_privileged_roles_are_unlimited() {
		let policy = RoleFeaturePolicy::default();
		for resource in ResourceType::ALL {
			assert_eq!(policy.limit_for(Role::Premium, resource), Limit::Unlimited);
			assert_eq!(policy.limit_for(Role::Admin, resource), Limit::Unlimited);
		}
	}

	#[test]
	fn test_custom_user_limit() {
		let policy = RoleFeaturePolicy::new(2);
		assert_eq!(policy.limit_for(Role::User, ResourceType::Contact), Limit::Limited(2));
	}

	#[test]
	fn test_unknown_resource_name_fails_fast() {
		let policy = RoleFeaturePolicy::default();
		assert!(matches!(
			policy.limit_for_name(Role::Admin, "notebook"),
			Err(Error::InvalidResourceType(_))
		));
		assert_eq!(policy.limit_for_name(Role::User, "tasks").ok(), Some(Limit::Limited(5)));
	}
}

// vim: ts=4
