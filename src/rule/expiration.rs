use async_trait::async_trait;
use time::{Duration, OffsetDateTime};

use super::ValidatorRule;
use crate::certificate::Certificate;
use crate::error::{ValidationError, ValidationResult};
use crate::report::Report;

/// Validation making sure the current time lies within the certificate's
/// validity window.
pub struct ExpirationRule;

#[async_trait]
impl ValidatorRule for ExpirationRule {
    async fn validate(
        &self,
        certificate: &Certificate,
        _report: &mut Report,
    ) -> ValidationResult<()> {
        let cert = certificate.parse()?;
        let now = OffsetDateTime::now_utc();

        if now < cert.validity().not_before.to_datetime() {
            return Err(ValidationError::failed("Certificate is not yet valid."));
        }
        if now > cert.validity().not_after.to_datetime() {
            return Err(ValidationError::failed("Certificate is expired."));
        }
        Ok(())
    }
}

/// Validation making sure the certificate doesn't expire in the next
/// `millis` milliseconds.
pub struct ExpirationSoonRule {
    millis: i64,
}

impl ExpirationSoonRule {
    pub fn new(millis: i64) -> Self {
        Self { millis }
    }
}

#[async_trait]
impl ValidatorRule for ExpirationSoonRule {
    async fn validate(
        &self,
        certificate: &Certificate,
        _report: &mut Report,
    ) -> ValidationResult<()> {
        let cert = certificate.parse()?;
        let not_after = cert.validity().not_after.to_datetime();
        let threshold = OffsetDateTime::now_utc() + Duration::milliseconds(self.millis);

        if not_after < threshold {
            return Err(ValidationError::Failed(format!(
                "Certificate expires in less than {} milliseconds.",
                self.millis
            )));
        }
        Ok(())
    }
}
