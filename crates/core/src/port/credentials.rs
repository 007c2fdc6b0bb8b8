// Credential Verification Port

/// Verifies an access key / secret pair. Opaque to the core: only the
/// resolved subject name reaches the policy engine.
pub trait CredentialVerifier: Send + Sync {
    fn valid_credentials(&self, name: &str, secret: &str) -> bool;
}
