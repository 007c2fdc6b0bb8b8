// Authorization Policy Model

use serde::{Deserialize, Serialize};
use std::fmt;

/// Policy effect
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Effect {
    #[default]
    Allow,
    Deny,
}

impl fmt::Display for Effect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Effect::Allow => write!(f, "ALLOW"),
            Effect::Deny => write!(f, "DENY"),
        }
    }
}

/// Authorization rule.
///
/// Empty `usernames` / `resources` mean "any". `permissions` is mandatory:
/// a policy without permission patterns never applies.
///
/// Built by value and handed to `AccessManager::add_policy`:
///
/// ```
/// use courier_core::domain::Policy;
///
/// let policy = Policy::new()
///     .id("ops-read")
///     .for_username("ops-*")
///     .for_resource("msg:queue:*")
///     .permission("msg::Describe*");
/// assert_eq!(policy.permissions.len(), 1);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Policy {
    pub id: Option<String>,
    pub description: Option<String>,
    pub usernames: Vec<String>,
    pub resources: Vec<String>,
    pub permissions: Vec<String>,
    pub effect: Effect,
}

impl Policy {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn id(mut self, id: impl Into<String>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn description(mut self, text: impl Into<String>) -> Self {
        self.description = Some(text.into());
        self
    }

    pub fn for_username(mut self, pattern: impl Into<String>) -> Self {
        self.usernames.push(pattern.into());
        self
    }

    pub fn for_resource(mut self, pattern: impl Into<String>) -> Self {
        self.resources.push(pattern.into());
        self
    }

    pub fn permission(mut self, pattern: impl Into<String>) -> Self {
        self.permissions.push(pattern.into());
        self
    }

    pub fn deny(mut self) -> Self {
        self.effect = Effect::Deny;
        self
    }

    pub fn allows(&self) -> bool {
        self.effect == Effect::Allow
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builder_defaults_to_allow() {
        let policy = Policy::new().permission("msg::*");
        assert!(policy.allows());
        assert!(policy.usernames.is_empty());
        assert!(policy.resources.is_empty());
    }

    #[test]
    fn test_deserialize_from_config_shape() {
        let policy: Policy = serde_json::from_value(serde_json::json!({
            "id": "deny-secret",
            "resources": ["msg:queue:secret*"],
            "permissions": ["*"],
            "effect": "DENY"
        }))
        .unwrap();

        assert_eq!(policy.effect, Effect::Deny);
        assert_eq!(policy.id.as_deref(), Some("deny-secret"));
        assert!(policy.usernames.is_empty());
        assert!(policy.description.is_none());
    }
}
