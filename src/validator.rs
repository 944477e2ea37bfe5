use crate::certificate::Certificate;
use crate::error::ValidationResult;
use crate::report::Report;
use crate::rule::{Chain, ValidatorRule};

/// Entry point for validating certificates against a configured rule.
pub struct Validator {
    rule: Box<dyn ValidatorRule>,
}

impl Validator {
    pub fn new(rule: impl ValidatorRule + 'static) -> Self {
        Self {
            rule: Box::new(rule),
        }
    }

    pub async fn validate(&self, certificate: &Certificate) -> ValidationResult<()> {
        self.rule.check(certificate).await
    }

    pub async fn validate_with_report(
        &self,
        certificate: &Certificate,
        report: &mut Report,
    ) -> ValidationResult<()> {
        self.rule.validate(certificate, report).await
    }

    pub async fn validate_der(&self, der: impl AsRef<[u8]>) -> ValidationResult<()> {
        let certificate = Certificate::from_der(der)?;
        self.validate(&certificate).await
    }

    pub async fn is_valid(&self, certificate: &Certificate) -> bool {
        self.validate(certificate).await.is_ok()
    }
}

/// Builder collecting rules into a [`Chain`]-backed [`Validator`].
#[derive(Default)]
pub struct ValidatorBuilder {
    rules: Vec<Box<dyn ValidatorRule>>,
}

impl ValidatorBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_rule(mut self, rule: impl ValidatorRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }

    pub fn build(self) -> Validator {
        Validator::new(Chain::new(self.rules))
    }
}
