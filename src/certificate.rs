use std::sync::Arc;

use x509_parser::prelude::*;

use crate::error::{ValidationError, ValidationResult};

/// An immutable, DER-backed certificate with extracted metadata.
///
/// Certificates are compared by their encoded bytes; two certificates are
/// equal exactly when their DER encodings are equal.
#[derive(Debug, Clone)]
pub struct Certificate {
    raw: Arc<Vec<u8>>,
    serial: Vec<u8>,
    subject: String,
    issuer: String,
}

impl Certificate {
    /// Create a certificate from DER-encoded bytes
    pub fn from_der(der: impl AsRef<[u8]>) -> ValidationResult<Self> {
        let der_bytes = der.as_ref();
        let (_, cert) =
            X509Certificate::from_der(der_bytes).map_err(|e| ValidationError::Parse(e.into()))?;

        let serial = cert.tbs_certificate.serial.to_bytes_be();
        let subject = cert.subject().to_string();
        let issuer = cert.issuer().to_string();

        Ok(Self {
            raw: Arc::new(der_bytes.to_vec()),
            serial,
            subject,
            issuer,
        })
    }

    /// Parse the certificate from the stored DER bytes
    pub fn parse(&self) -> ValidationResult<X509Certificate<'_>> {
        let (_, cert) =
            X509Certificate::from_der(&self.raw).map_err(|e| ValidationError::Parse(e.into()))?;
        Ok(cert)
    }

    pub fn as_der(&self) -> &[u8] {
        &self.raw
    }

    /// Serial number as big-endian bytes.
    pub fn serial(&self) -> &[u8] {
        &self.serial
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn issuer(&self) -> &str {
        &self.issuer
    }

    /// Extract CRL distribution point URLs from the certificate.
    ///
    /// Only full-name URI entries are returned; relative distribution point
    /// names are ignored.
    pub fn crl_distribution_points(&self) -> ValidationResult<Vec<String>> {
        let cert = self.parse()?;
        let mut urls = Vec::new();

        for ext in cert.extensions() {
            if let ParsedExtension::CRLDistributionPoints(points) = ext.parsed_extension() {
                for point in &points.points {
                    if let Some(DistributionPointName::FullName(names)) = &point.distribution_point
                    {
                        for name in names {
                            if let GeneralName::URI(uri) = name {
                                urls.push((*uri).to_string());
                            }
                        }
                    }
                }
            }
        }

        Ok(urls)
    }
}

impl PartialEq for Certificate {
    fn eq(&self, other: &Self) -> bool {
        self.raw == other.raw
    }
}

impl Eq for Certificate {}

/// A source of certificates for scanning rules such as blacklists and
/// whitelists. Implementations may be backed by files, stores or remote
/// services; failures surface as [`ValidationError::Bucket`].
pub trait CertificateBucket: Send + Sync {
    fn certificates(&self) -> ValidationResult<Vec<Certificate>>;
}

/// In-memory certificate bucket.
#[derive(Debug, Clone, Default)]
pub struct SimpleCertificateBucket {
    certificates: Vec<Certificate>,
}

impl SimpleCertificateBucket {
    pub fn new(certificates: impl IntoIterator<Item = Certificate>) -> Self {
        Self {
            certificates: certificates.into_iter().collect(),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    pub fn add(&mut self, certificate: Certificate) {
        self.certificates.push(certificate);
    }
}

impl CertificateBucket for SimpleCertificateBucket {
    fn certificates(&self) -> ValidationResult<Vec<Certificate>> {
        Ok(self.certificates.clone())
    }
}
