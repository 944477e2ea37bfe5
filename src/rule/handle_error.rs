use async_trait::async_trait;
use tracing::debug;

use super::ValidatorRule;
use crate::certificate::Certificate;
use crate::error::{ValidationError, ValidationResult};
use crate::report::Report;

/// Decides what happens to an error raised by a wrapped rule: re-raise it
/// (typically converted to a terminal failure preserving the message) or
/// return `Ok` to have the validation treated as passed.
pub trait ErrorHandler: Send + Sync {
    fn handle(&self, error: ValidationError) -> ValidationResult<()>;
}

impl<F> ErrorHandler for F
where
    F: Fn(ValidationError) -> ValidationResult<()> + Send + Sync,
{
    fn handle(&self, error: ValidationError) -> ValidationResult<()> {
        self(error)
    }
}

/// Wraps one rule and optionally an [`ErrorHandler`].
///
/// If the wrapped rule fails and a handler is configured, the handler decides
/// the outcome. Without a handler, any error from the wrapped rule is
/// swallowed and validation is treated as passed; this surprising default is
/// kept for compatibility. Either way the incoming report is left unchanged
/// when the wrapped rule did not succeed.
pub struct HandleErrorRule {
    rule: Box<dyn ValidatorRule>,
    handler: Option<Box<dyn ErrorHandler>>,
}

impl HandleErrorRule {
    pub fn new(rule: impl ValidatorRule + 'static) -> Self {
        Self {
            rule: Box::new(rule),
            handler: None,
        }
    }

    pub fn with_handler(
        handler: impl ErrorHandler + 'static,
        rule: impl ValidatorRule + 'static,
    ) -> Self {
        Self {
            rule: Box::new(rule),
            handler: Some(Box::new(handler)),
        }
    }
}

#[async_trait]
impl ValidatorRule for HandleErrorRule {
    async fn validate(
        &self,
        certificate: &Certificate,
        report: &mut Report,
    ) -> ValidationResult<()> {
        let mut attempt = report.clone();
        match self.rule.validate(certificate, &mut attempt).await {
            Ok(()) => {
                *report = attempt;
                Ok(())
            }
            Err(e) => match &self.handler {
                Some(handler) => handler.handle(e),
                None => {
                    debug!("Swallowed validation error: {}", e);
                    Ok(())
                }
            },
        }
    }
}
