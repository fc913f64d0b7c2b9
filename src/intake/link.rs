//! Signed public intake links
//!
//! A link token embeds {mission_id, tenant_id} so the public form resolves
//! tenant context without a lookup. Tokens are signed with a keyed SHA-256
//! digest; a token that fails verification is rejected before any store
//! access, so the bare-capability-token gap of unsigned links is closed.

use crate::error::AppError;
use sha2::{Digest, Sha256};
use uuid::Uuid;

/// Resolved contents of a verified link token
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntakeLink {
    pub mission_id: Uuid,
    pub tenant_id: String,
}

/// Issues and verifies link tokens
#[derive(Clone)]
pub struct LinkSigner {
    secret: String,
}

impl LinkSigner {
    pub fn new(secret: impl Into<String>) -> Self {
        Self {
            secret: secret.into(),
        }
    }

    /// Token shape: `<mission>.<tenant>.<signature>`. The tenant segment may
    /// itself contain dots; parsing takes the first and last separators.
    pub fn issue(&self, mission_id: Uuid, tenant_id: &str) -> String {
        let mission = mission_id.simple().to_string();
        let signature = self.signature(&mission, tenant_id);
        format!("{}.{}.{}", mission, tenant_id, signature)
    }

    /// Verify a token and resolve its contents
    pub fn verify(&self, token: &str) -> Result<IntakeLink, AppError> {
        let invalid = || AppError::Validation("Invalid intake link".to_string());

        let (mission, rest) = token.split_once('.').ok_or_else(invalid)?;
        let (tenant, signature) = rest.rsplit_once('.').ok_or_else(invalid)?;
        if tenant.is_empty() {
            return Err(invalid());
        }

        let mission_id = Uuid::parse_str(mission).map_err(|_| invalid())?;
        if self.signature(mission, tenant) != signature {
            return Err(invalid());
        }

        Ok(IntakeLink {
            mission_id,
            tenant_id: tenant.to_string(),
        })
    }

    fn signature(&self, mission: &str, tenant: &str) -> String {
        let mut hasher = Sha256::new();
        hasher.update(self.secret.as_bytes());
        hasher.update(b":");
        hasher.update(mission.as_bytes());
        hasher.update(b":");
        hasher.update(tenant.as_bytes());
        format!("{:x}", hasher.finalize())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_issue_and_verify_round_trip() {
        let signer = LinkSigner::new("test-secret-0123456789");
        let mission_id = Uuid::new_v4();
        let token = signer.issue(mission_id, "acme-school");

        let link = signer.verify(&token).unwrap();
        assert_eq!(link.mission_id, mission_id);
        assert_eq!(link.tenant_id, "acme-school");
    }

    #[test]
    fn test_tenant_with_dots_survives() {
        let signer = LinkSigner::new("test-secret-0123456789");
        let mission_id = Uuid::new_v4();
        let token = signer.issue(mission_id, "acme.school.mx");

        let link = signer.verify(&token).unwrap();
        assert_eq!(link.tenant_id, "acme.school.mx");
    }

    #[test]
    fn test_tampered_tenant_is_rejected() {
        let signer = LinkSigner::new("test-secret-0123456789");
        let token = signer.issue(Uuid::new_v4(), "acme-school");
        let tampered = token.replace("acme-school", "other-school");

        assert!(signer.verify(&tampered).is_err());
    }

    #[test]
    fn test_wrong_secret_is_rejected() {
        let issuer = LinkSigner::new("secret-a-0123456789");
        let verifier = LinkSigner::new("secret-b-0123456789");
        let token = issuer.issue(Uuid::new_v4(), "acme-school");

        assert!(verifier.verify(&token).is_err());
    }

    #[test]
    fn test_garbage_token_is_rejected() {
        let signer = LinkSigner::new("test-secret-0123456789");
        assert!(signer.verify("not-a-token").is_err());
        assert!(signer.verify("a.b").is_err());
        assert!(signer.verify("").is_err());
    }
}
