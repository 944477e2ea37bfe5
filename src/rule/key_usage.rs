use async_trait::async_trait;

use super::ValidatorRule;
use crate::certificate::Certificate;
use crate::error::{ValidationError, ValidationResult};
use crate::report::Report;

/// Key usage bits as defined by RFC 5280 section 4.2.1.3.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyUsage {
    DigitalSignature = 0,
    NonRepudiation = 1,
    KeyEncipherment = 2,
    DataEncipherment = 3,
    KeyAgreement = 4,
    KeyCertSign = 5,
    CrlSign = 6,
    EncipherOnly = 7,
    DecipherOnly = 8,
}

/// Validation of certificate key usage. The key usage bits asserted by the
/// certificate must exactly match the expected set.
pub struct KeyUsageRule {
    expected: u16,
}

impl KeyUsageRule {
    pub fn new(usages: impl IntoIterator<Item = KeyUsage>) -> Self {
        let expected = usages
            .into_iter()
            .fold(0u16, |mask, usage| mask | (1 << usage as u16));
        Self { expected }
    }
}

#[async_trait]
impl ValidatorRule for KeyUsageRule {
    async fn validate(
        &self,
        certificate: &Certificate,
        _report: &mut Report,
    ) -> ValidationResult<()> {
        let cert = certificate.parse()?;
        let key_usage = cert
            .key_usage()?
            .ok_or_else(|| {
                ValidationError::failed("Certificate does not contain key usage extension.")
            })?
            .value
            .flags;

        // Only the nine defined bits take part in the comparison.
        if key_usage & 0x1ff != self.expected {
            return Err(ValidationError::failed(
                "Certificate key usage does not match expected key usage.",
            ));
        }
        Ok(())
    }
}
