pub mod certificate;
pub mod config;
pub mod crl;
pub mod error;
pub mod report;
pub mod rule;
pub mod telemetry;
pub mod validator;

pub use certificate::{Certificate, CertificateBucket, SimpleCertificateBucket};
pub use error::{ValidationError, ValidationResult};
pub use report::{Property, Report};
pub use rule::ValidatorRule;
pub use validator::{Validator, ValidatorBuilder};
