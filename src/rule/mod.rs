//! Validation rules and their composition
//!
//! A rule validates one certificate against a shared, mutable [`Report`].
//! Rules compose through [`Chain`] (AND semantics over one shared report) and
//! [`AnyOf`] (OR semantics over isolated report copies), and errors can be
//! converted or swallowed at a [`HandleErrorRule`] boundary.

mod blacklist;
mod crl;
mod critical_extension;
mod expiration;
mod handle_error;
mod junction;
mod key_usage;
mod org_number;
mod policy;
mod principal_name;
mod whitelist;

use async_trait::async_trait;

use crate::certificate::Certificate;
use crate::error::ValidationResult;
use crate::report::Report;

pub use blacklist::BlacklistRule;
pub use crl::CrlRule;
pub use critical_extension::{CriticalExtensionRecognizedRule, CriticalExtensionRequiredRule};
pub use expiration::{ExpirationRule, ExpirationSoonRule};
pub use handle_error::{ErrorHandler, HandleErrorRule};
pub use junction::{AnyOf, Chain};
pub use key_usage::{KeyUsage, KeyUsageRule};
pub use org_number::{NorwegianOrganization, NorwegianOrganizationNumberRule};
pub use policy::{POLICY, PolicyRule};
pub use principal_name::{
    Principal, PrincipalNameProvider, PrincipalNameRule, SimplePrincipalNameProvider,
};
pub use whitelist::WhitelistRule;

/// A single validation unit.
///
/// The two-argument form is canonical: it may read and mutate the report,
/// and fails with [`ValidationError::Failed`] on business rejection or with
/// an infrastructure variant on malformed input.
///
/// [`ValidationError::Failed`]: crate::error::ValidationError::Failed
#[async_trait]
pub trait ValidatorRule: Send + Sync {
    async fn validate(
        &self,
        certificate: &Certificate,
        report: &mut Report,
    ) -> ValidationResult<()>;

    /// Validate against a throwaway report.
    async fn check(&self, certificate: &Certificate) -> ValidationResult<()> {
        let mut report = Report::new();
        self.validate(certificate, &mut report).await
    }
}
