use async_trait::async_trait;

use super::ValidatorRule;
use crate::certificate::{Certificate, CertificateBucket};
use crate::error::{ValidationError, ValidationResult};
use crate::report::Report;

/// Rejects certificates found in a bucket of blacklisted certificates.
/// An empty bucket always passes.
pub struct BlacklistRule {
    certificates: Box<dyn CertificateBucket>,
}

impl BlacklistRule {
    pub fn new(certificates: impl CertificateBucket + 'static) -> Self {
        Self {
            certificates: Box::new(certificates),
        }
    }
}

#[async_trait]
impl ValidatorRule for BlacklistRule {
    async fn validate(
        &self,
        certificate: &Certificate,
        _report: &mut Report,
    ) -> ValidationResult<()> {
        for cert in self.certificates.certificates()? {
            if cert == *certificate {
                return Err(ValidationError::failed("Certificate is blacklisted."));
            }
        }
        Ok(())
    }
}
