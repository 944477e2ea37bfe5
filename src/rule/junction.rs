use async_trait::async_trait;

use super::ValidatorRule;
use crate::certificate::Certificate;
use crate::error::{ValidationError, ValidationResult};
use crate::report::Report;

/// Ordered AND-composition of rules.
///
/// Children run in registration order against one shared report, so a
/// mutation made by an earlier rule is visible to later rules. The first
/// failure short-circuits and propagates unchanged.
#[derive(Default)]
pub struct Chain {
    rules: Vec<Box<dyn ValidatorRule>>,
}

impl Chain {
    pub fn new(rules: Vec<Box<dyn ValidatorRule>>) -> Self {
        Self { rules }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn add_rule(mut self, rule: impl ValidatorRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }
}

#[async_trait]
impl ValidatorRule for Chain {
    async fn validate(
        &self,
        certificate: &Certificate,
        report: &mut Report,
    ) -> ValidationResult<()> {
        for rule in &self.rules {
            rule.validate(certificate, report).await?;
        }
        Ok(())
    }
}

/// OR-composition of rules.
///
/// Each child is attempted in registration order against an isolated copy of
/// the incoming report; the first success is committed verbatim and the
/// mutations of failed siblings are discarded. If every child fails, one
/// terminal error is raised whose message enumerates each child's message in
/// registration order.
#[derive(Default)]
pub struct AnyOf {
    rules: Vec<Box<dyn ValidatorRule>>,
}

impl AnyOf {
    pub fn new(rules: Vec<Box<dyn ValidatorRule>>) -> Self {
        Self { rules }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn add_rule(mut self, rule: impl ValidatorRule + 'static) -> Self {
        self.rules.push(Box::new(rule));
        self
    }
}

#[async_trait]
impl ValidatorRule for AnyOf {
    async fn validate(
        &self,
        certificate: &Certificate,
        report: &mut Report,
    ) -> ValidationResult<()> {
        let mut errors = Vec::new();

        for rule in &self.rules {
            let mut attempt = report.clone();
            match rule.validate(certificate, &mut attempt).await {
                Ok(()) => {
                    *report = attempt;
                    return Ok(());
                }
                Err(e) => errors.push(e),
            }
        }

        let mut message = String::from("Or-junction failed with results:");
        for e in &errors {
            message.push_str("\n* ");
            message.push_str(&e.to_string());
        }

        Err(ValidationError::Failed(message))
    }
}
