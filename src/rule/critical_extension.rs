use async_trait::async_trait;

use super::ValidatorRule;
use crate::certificate::Certificate;
use crate::error::{ValidationError, ValidationResult};
use crate::report::Report;

/// Rejects certificates carrying critical extensions outside a recognized
/// set of extension OIDs.
pub struct CriticalExtensionRecognizedRule {
    recognized: Vec<String>,
}

impl CriticalExtensionRecognizedRule {
    pub fn new<I, S>(recognized: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            recognized: recognized.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl ValidatorRule for CriticalExtensionRecognizedRule {
    async fn validate(
        &self,
        certificate: &Certificate,
        _report: &mut Report,
    ) -> ValidationResult<()> {
        let cert = certificate.parse()?;

        for ext in cert.extensions() {
            if !ext.critical {
                continue;
            }
            let oid = ext.oid.to_id_string();
            if !self.recognized.contains(&oid) {
                return Err(ValidationError::Failed(format!(
                    "Certificate contains unrecognized critical extension '{oid}'."
                )));
            }
        }
        Ok(())
    }
}

/// Requires every listed extension OID to be present as a critical extension
/// in the certificate.
pub struct CriticalExtensionRequiredRule {
    required: Vec<String>,
}

impl CriticalExtensionRequiredRule {
    pub fn new<I, S>(required: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            required: required.into_iter().map(Into::into).collect(),
        }
    }
}

#[async_trait]
impl ValidatorRule for CriticalExtensionRequiredRule {
    async fn validate(
        &self,
        certificate: &Certificate,
        _report: &mut Report,
    ) -> ValidationResult<()> {
        let cert = certificate.parse()?;
        let critical: Vec<String> = cert
            .extensions()
            .iter()
            .filter(|ext| ext.critical)
            .map(|ext| ext.oid.to_id_string())
            .collect();

        for oid in &self.required {
            if !critical.contains(oid) {
                return Err(ValidationError::Failed(format!(
                    "Certificate doesn't contain critical extension '{oid}'."
                )));
            }
        }
        Ok(())
    }
}
