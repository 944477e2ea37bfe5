use std::collections::HashSet;

use async_trait::async_trait;
use x509_parser::prelude::ParsedExtension;

use super::ValidatorRule;
use crate::certificate::Certificate;
use crate::error::{ValidationError, ValidationResult};
use crate::report::{Property, Report};

/// Report property holding the set of accepted policies matched by the
/// certificate. Written on successful validation.
pub static POLICY: Property<HashSet<String>> = Property::new("rule.policy.matched");

/// Validator checking certificate policies. At least one of the accepted
/// policies must be present in the certificate. An accepted policy is either
/// a complete policy OID or a wildcard ending with `*`, which matches any
/// policy OID starting with the preceding prefix.
pub struct PolicyRule {
    accepted_policies: HashSet<String>,
}

impl PolicyRule {
    pub fn new<I, S>(accepted_policies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            accepted_policies: accepted_policies.into_iter().map(Into::into).collect(),
        }
    }

    fn matching_policies(&self, certificate_policies: &HashSet<String>) -> HashSet<String> {
        let mut matching = HashSet::new();
        for accepted in &self.accepted_policies {
            for policy in certificate_policies {
                if policy == accepted || wildcard_matches(accepted, policy) {
                    matching.insert(policy.clone());
                }
            }
        }
        matching
    }
}

fn wildcard_matches(accepted: &str, policy: &str) -> bool {
    match accepted.strip_suffix('*') {
        Some(prefix) => policy.starts_with(prefix),
        None => false,
    }
}

fn certificate_policy_identifiers(certificate: &Certificate) -> ValidationResult<HashSet<String>> {
    let cert = certificate.parse()?;
    let mut identifiers = HashSet::new();

    for ext in cert.extensions() {
        if let ParsedExtension::CertificatePolicies(policies) = ext.parsed_extension() {
            for policy in policies.iter() {
                identifiers.insert(policy.policy_id.to_id_string());
            }
        }
    }

    Ok(identifiers)
}

#[async_trait]
impl ValidatorRule for PolicyRule {
    async fn validate(
        &self,
        certificate: &Certificate,
        report: &mut Report,
    ) -> ValidationResult<()> {
        let declared = certificate_policy_identifiers(certificate)?;
        let matching = self.matching_policies(&declared);

        if matching.is_empty() {
            return Err(ValidationError::failed(
                "No accepted policies found in certificate.",
            ));
        }

        report.set(&POLICY, matching);
        Ok(())
    }
}
