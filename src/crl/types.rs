use ::time::OffsetDateTime;
use x509_parser::prelude::*;

use crate::error::{ValidationError, ValidationResult};

/// A Certificate Revocation List, kept in DER form and parsed on demand.
#[derive(Debug, Clone)]
pub struct Crl {
    der_data: Vec<u8>,
}

impl Crl {
    /// Create a new CRL from DER data
    pub fn from_der(der_data: Vec<u8>) -> ValidationResult<Self> {
        // Validate that we can parse it
        let _ = CertificateRevocationList::from_der(&der_data)
            .map_err(|e| ValidationError::Parse(e.into()))?;

        Ok(Self { der_data })
    }

    fn parse(&self) -> ValidationResult<CertificateRevocationList<'_>> {
        let (_, crl) = CertificateRevocationList::from_der(&self.der_data)
            .map_err(|e| ValidationError::Parse(e.into()))?;
        Ok(crl)
    }

    /// Canonical encoded bytes, as persisted by disk caches.
    pub fn as_der(&self) -> &[u8] {
        &self.der_data
    }

    pub fn issuer(&self) -> ValidationResult<String> {
        Ok(self.parse()?.tbs_cert_list.issuer.to_string())
    }

    pub fn this_update(&self) -> ValidationResult<OffsetDateTime> {
        Ok(self.parse()?.tbs_cert_list.this_update.to_datetime())
    }

    /// Scheduled next-update time, if the CRL declares one.
    pub fn next_update(&self) -> ValidationResult<Option<OffsetDateTime>> {
        Ok(self
            .parse()?
            .tbs_cert_list
            .next_update
            .map(|t| t.to_datetime()))
    }

    /// Whether the declared next-update time has already passed. A CRL
    /// without a next-update time is never considered stale.
    pub fn is_stale(&self) -> ValidationResult<bool> {
        Ok(match self.next_update()? {
            Some(next_update) => next_update < OffsetDateTime::now_utc(),
            None => false,
        })
    }

    /// Check whether a certificate serial number (big-endian bytes) is listed
    /// as revoked by this CRL.
    pub fn is_revoked(&self, serial: &[u8]) -> ValidationResult<bool> {
        let crl = self.parse()?;

        Ok(crl
            .tbs_cert_list
            .revoked_certificates
            .iter()
            .any(|revoked| revoked.user_certificate.to_bytes_be() == serial))
    }
}

impl PartialEq for Crl {
    fn eq(&self, other: &Self) -> bool {
        self.der_data == other.der_data
    }
}

impl Eq for Crl {}
