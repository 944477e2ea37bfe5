use std::collections::HashSet;

use async_trait::async_trait;
use x509_parser::prelude::X509Name;

use super::ValidatorRule;
use crate::certificate::Certificate;
use crate::error::{ValidationError, ValidationResult};
use crate::report::Report;

/// Which principal of the certificate a name rule inspects.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Principal {
    Subject,
    Issuer,
}

impl Principal {
    fn label(self) -> &'static str {
        match self {
            Self::Subject => "subject",
            Self::Issuer => "issuer",
        }
    }
}

/// Decides whether a principal name value is acceptable.
pub trait PrincipalNameProvider: Send + Sync {
    fn validate(&self, value: &str) -> bool;
}

impl<F> PrincipalNameProvider for F
where
    F: Fn(&str) -> bool + Send + Sync,
{
    fn validate(&self, value: &str) -> bool {
        self(value)
    }
}

/// Provider accepting a fixed set of values.
#[derive(Debug, Clone, Default)]
pub struct SimplePrincipalNameProvider {
    accepted: HashSet<String>,
}

impl SimplePrincipalNameProvider {
    pub fn new<I, S>(accepted: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            accepted: accepted.into_iter().map(Into::into).collect(),
        }
    }
}

impl PrincipalNameProvider for SimplePrincipalNameProvider {
    fn validate(&self, value: &str) -> bool {
        self.accepted.contains(value)
    }
}

/// Validation of a subject or issuer principal. With a field configured, the
/// values of that attribute (short name like `C` or a dotted OID) are offered
/// to the provider one by one; without a field, the provider sees the
/// formatted principal as a whole. One accepted value passes the rule.
pub struct PrincipalNameRule {
    field: Option<String>,
    provider: Box<dyn PrincipalNameProvider>,
    principal: Principal,
}

impl PrincipalNameRule {
    /// Rule over one subject attribute.
    pub fn new(
        field: impl Into<String>,
        provider: impl PrincipalNameProvider + 'static,
    ) -> Self {
        Self::of(Some(field.into()), provider, Principal::Subject)
    }

    pub fn of(
        field: Option<String>,
        provider: impl PrincipalNameProvider + 'static,
        principal: Principal,
    ) -> Self {
        Self {
            field,
            provider: Box::new(provider),
            principal,
        }
    }
}

#[async_trait]
impl ValidatorRule for PrincipalNameRule {
    async fn validate(
        &self,
        certificate: &Certificate,
        _report: &mut Report,
    ) -> ValidationResult<()> {
        let cert = certificate.parse()?;
        let name = match self.principal {
            Principal::Subject => cert.subject(),
            Principal::Issuer => cert.issuer(),
        };

        let values = match &self.field {
            Some(field) => attribute_values(name, field),
            None => vec![name.to_string()],
        };

        if values.iter().any(|value| self.provider.validate(value)) {
            return Ok(());
        }

        Err(ValidationError::Failed(format!(
            "Validation of {} principal({}) failed.",
            self.principal.label(),
            self.field.as_deref().unwrap_or("null")
        )))
    }
}

/// String values of one attribute of a distinguished name. The attribute is
/// named by a short name or a dotted OID; an unknown name yields no values.
pub(crate) fn attribute_values(name: &X509Name<'_>, field: &str) -> Vec<String> {
    let Some(oid) = attribute_oid(field) else {
        return Vec::new();
    };

    name.iter_attributes()
        .filter(|attr| attr.attr_type().to_id_string() == oid)
        .filter_map(|attr| attr.as_str().ok().map(str::to_string))
        .collect()
}

fn attribute_oid(field: &str) -> Option<String> {
    if !field.is_empty() && field.chars().all(|c| c.is_ascii_digit() || c == '.') {
        return Some(field.to_string());
    }

    let oid = match field.to_ascii_uppercase().as_str() {
        "CN" => "2.5.4.3",
        "SERIALNUMBER" => "2.5.4.5",
        "C" => "2.5.4.6",
        "L" => "2.5.4.7",
        "ST" => "2.5.4.8",
        "O" => "2.5.4.10",
        "OU" => "2.5.4.11",
        _ => return None,
    };
    Some(oid.to_string())
}
