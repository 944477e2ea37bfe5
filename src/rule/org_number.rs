use std::sync::LazyLock;

use async_trait::async_trait;
use regex::Regex;

use super::ValidatorRule;
use super::principal_name::{PrincipalNameProvider, attribute_values};
use crate::certificate::Certificate;
use crate::error::{ValidationError, ValidationResult};
use crate::report::Report;

static SERIAL_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:NTRNO-)?([0-9]{9})$").expect("known-good pattern"));
static ORGANIZATION_IDENTIFIER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^PSD[A-Z]{2}-[A-Z]{2,8}-([0-9]{9})$").expect("known-good pattern"));
static ORGANIZATION_NAME: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^.+-\s*([0-9]{9})\s*$").expect("known-good pattern"));

/// A Norwegian organization number found in a certificate subject, together
/// with the organization name when the subject carries one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NorwegianOrganization {
    number: String,
    name: Option<String>,
}

impl NorwegianOrganization {
    pub fn number(&self) -> &str {
        &self.number
    }

    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

/// Validation of the Norwegian organization number in a certificate subject.
///
/// The number is looked for in the `serialNumber` attribute (plain nine
/// digits, optionally with an `NTRNO-` prefix), then in the organization
/// identifier attribute 2.5.4.97 (PSD2 form `PSDNO-FSA-<nine digits>`), then
/// as a nine-digit suffix of the organization name. The configured provider
/// decides whether the extracted number is acceptable.
pub struct NorwegianOrganizationNumberRule {
    provider: Box<dyn PrincipalNameProvider>,
}

impl NorwegianOrganizationNumberRule {
    pub fn new(provider: impl PrincipalNameProvider + 'static) -> Self {
        Self {
            provider: Box::new(provider),
        }
    }

    /// Extract the organization number from the certificate subject, or
    /// `None` when no attribute carries one in a recognized form.
    pub fn extract_number(
        certificate: &Certificate,
    ) -> ValidationResult<Option<NorwegianOrganization>> {
        let cert = certificate.parse()?;
        let subject = cert.subject();
        let organization_name = attribute_values(subject, "O").into_iter().next();

        for value in attribute_values(subject, "serialNumber") {
            if let Some(captures) = SERIAL_NUMBER.captures(&value) {
                return Ok(Some(NorwegianOrganization {
                    number: captures[1].to_string(),
                    name: organization_name,
                }));
            }
        }

        for value in attribute_values(subject, "2.5.4.97") {
            if let Some(captures) = ORGANIZATION_IDENTIFIER.captures(&value) {
                return Ok(Some(NorwegianOrganization {
                    number: captures[1].to_string(),
                    name: organization_name,
                }));
            }
        }

        if let Some(name) = organization_name {
            if let Some(captures) = ORGANIZATION_NAME.captures(&name) {
                let number = captures[1].to_string();
                return Ok(Some(NorwegianOrganization {
                    number,
                    name: Some(name),
                }));
            }
        }

        Ok(None)
    }
}

impl Default for NorwegianOrganizationNumberRule {
    /// Accepts any extracted organization number.
    fn default() -> Self {
        Self::new(|_: &str| true)
    }
}

#[async_trait]
impl ValidatorRule for NorwegianOrganizationNumberRule {
    async fn validate(
        &self,
        certificate: &Certificate,
        _report: &mut Report,
    ) -> ValidationResult<()> {
        match Self::extract_number(certificate)? {
            Some(organization) if self.provider.validate(organization.number()) => Ok(()),
            _ => Err(ValidationError::failed("Organization number not detected.")),
        }
    }
}
