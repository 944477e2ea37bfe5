use async_trait::async_trait;

use super::ValidatorRule;
use crate::certificate::{Certificate, CertificateBucket};
use crate::error::{ValidationError, ValidationResult};
use crate::report::Report;

/// Accepts only certificates found in a bucket of whitelisted certificates.
/// An empty bucket always fails.
pub struct WhitelistRule {
    certificates: Box<dyn CertificateBucket>,
}

impl WhitelistRule {
    pub fn new(certificates: impl CertificateBucket + 'static) -> Self {
        Self {
            certificates: Box::new(certificates),
        }
    }
}

#[async_trait]
impl ValidatorRule for WhitelistRule {
    async fn validate(
        &self,
        certificate: &Certificate,
        _report: &mut Report,
    ) -> ValidationResult<()> {
        for cert in self.certificates.certificates()? {
            if cert == *certificate {
                return Ok(());
            }
        }
        Err(ValidationError::failed("Certificate is not in whitelist."))
    }
}
