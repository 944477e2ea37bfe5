use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, warn};

use super::ValidatorRule;
use crate::certificate::Certificate;
use crate::crl::CrlFetcher;
use crate::error::{ValidationError, ValidationResult};
use crate::report::Report;

/// Revocation check against the CRLs published at the certificate's
/// distribution points.
///
/// A certificate without distribution points passes, as does a distribution
/// point for which no CRL is available; availability policy lives in the
/// fetcher, not here.
pub struct CrlRule {
    fetcher: Arc<dyn CrlFetcher>,
}

impl CrlRule {
    pub fn new(fetcher: Arc<dyn CrlFetcher>) -> Self {
        Self { fetcher }
    }
}

#[async_trait]
impl ValidatorRule for CrlRule {
    async fn validate(
        &self,
        certificate: &Certificate,
        _report: &mut Report,
    ) -> ValidationResult<()> {
        let distribution_points = certificate.crl_distribution_points()?;
        if distribution_points.is_empty() {
            debug!("No CRL distribution points found in certificate");
            return Ok(());
        }

        for url in &distribution_points {
            match self.fetcher.get(url).await? {
                Some(crl) => {
                    if crl.is_revoked(certificate.serial())? {
                        warn!(
                            "Certificate with serial {} is revoked",
                            hex::encode(certificate.serial())
                        );
                        return Err(ValidationError::failed("Certificate is revoked."));
                    }
                }
                None => debug!("No CRL available for {}", url),
            }
        }

        Ok(())
    }
}
