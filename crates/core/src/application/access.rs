// Access Manager - policy evaluation with deny-override
//
// Policies are evaluated in insertion order. A matching DENY ends the scan,
// a matching ALLOW is remembered while later policies may still deny.
// Nothing matching means deny.

use crate::domain::pattern::{any_matches, GlobPattern};
use crate::domain::{Effect, Policy};
use crate::error::{AppError, Result};
use tracing::debug;

/// Policy with its patterns compiled
#[derive(Debug, Clone)]
struct CompiledPolicy {
    id: Option<String>,
    usernames: Vec<GlobPattern>,
    resources: Vec<GlobPattern>,
    permissions: Vec<GlobPattern>,
    effect: Effect,
}

impl CompiledPolicy {
    fn compile(policy: Policy) -> Result<Self> {
        let compile_all = |patterns: &[String]| -> Result<Vec<GlobPattern>> {
            patterns
                .iter()
                .map(|p| GlobPattern::compile(p).map_err(AppError::from))
                .collect()
        };

        Ok(Self {
            usernames: compile_all(&policy.usernames)?,
            resources: compile_all(&policy.resources)?,
            permissions: compile_all(&policy.permissions)?,
            id: policy.id,
            effect: policy.effect,
        })
    }

    fn applies_to(&self, resource: &str, subject: &str, permission: &str) -> bool {
        if !self.usernames.is_empty() && !any_matches(&self.usernames, subject) {
            return false;
        }
        if !self.resources.is_empty() && !any_matches(&self.resources, resource) {
            return false;
        }
        any_matches(&self.permissions, permission)
    }
}

/// Outcome of a policy evaluation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub granted: bool,
    /// Id of the policy that decided, when it has one
    pub policy_id: Option<String>,
}

/// Ordered rule list owned by one engine instance.
///
/// Populate at startup, then share read-only (e.g. behind an `Arc`).
#[derive(Debug, Clone, Default)]
pub struct AccessManager {
    policies: Vec<CompiledPolicy>,
}

impl AccessManager {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a policy. Fails with `AppError::Config` on an invalid pattern.
    pub fn add_policy(&mut self, policy: Policy) -> Result<()> {
        self.policies.push(CompiledPolicy::compile(policy)?);
        Ok(())
    }

    pub fn len(&self) -> usize {
        self.policies.len()
    }

    pub fn is_empty(&self) -> bool {
        self.policies.is_empty()
    }

    pub fn evaluate(&self, resource: &str, subject: &str, permission: &str) -> Decision {
        let mut decision = Decision {
            granted: false,
            policy_id: None,
        };

        for policy in &self.policies {
            if !policy.applies_to(resource, subject, permission) {
                continue;
            }
            match policy.effect {
                Effect::Deny => {
                    decision = Decision {
                        granted: false,
                        policy_id: policy.id.clone(),
                    };
                    break;
                }
                Effect::Allow => {
                    if !decision.granted {
                        decision = Decision {
                            granted: true,
                            policy_id: policy.id.clone(),
                        };
                    }
                }
            }
        }

        debug!(
            resource,
            subject,
            permission,
            granted = decision.granted,
            policy = decision.policy_id.as_deref().unwrap_or("-"),
            "Access evaluated"
        );

        decision
    }

    pub fn is_granted(&self, resource: &str, subject: &str, permission: &str) -> bool {
        self.evaluate(resource, subject, permission).granted
    }
}
