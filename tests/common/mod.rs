#![allow(dead_code)]

use cert_validator::Certificate;
use cert_validator::crl::Crl;
use rcgen::{
    BasicConstraints, CertificateParams, CertificateRevocationListParams, CustomExtension,
    DistinguishedName, DnType, IsCa, Issuer, KeyIdMethod, KeyPair, KeyUsagePurpose,
    RevokedCertParams, SerialNumber,
};
use time::{Duration, OffsetDateTime};

pub struct TestCa {
    pub issuer: Issuer<'static, KeyPair>,
    pub certificate: Certificate,
}

pub fn test_ca() -> TestCa {
    let mut params = CertificateParams::default();
    let key_pair = KeyPair::generate().unwrap();

    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, "Test CA Root");
    dn.push(DnType::OrganizationName, "Test Organization");
    params.distinguished_name = dn;

    params.is_ca = IsCa::Ca(BasicConstraints::Unconstrained);
    params.key_usages = vec![
        KeyUsagePurpose::DigitalSignature,
        KeyUsagePurpose::KeyCertSign,
        KeyUsagePurpose::CrlSign,
    ];

    let cert = params.self_signed(&key_pair).unwrap();
    let certificate = Certificate::from_der(cert.der()).unwrap();
    let issuer = Issuer::new(params, key_pair);

    TestCa {
        issuer,
        certificate,
    }
}

/// Issue a leaf certificate after letting the caller adjust the parameters.
pub fn leaf_with(ca: &TestCa, configure: impl FnOnce(&mut CertificateParams)) -> Certificate {
    let mut params = CertificateParams::default();
    let key_pair = KeyPair::generate().unwrap();

    let mut dn = DistinguishedName::new();
    dn.push(DnType::CommonName, "test.example.com");
    dn.push(DnType::OrganizationName, "Test Organization");
    params.distinguished_name = dn;
    params.is_ca = IsCa::NoCa;

    configure(&mut params);

    let cert = params.signed_by(&key_pair, &ca.issuer).unwrap();
    Certificate::from_der(cert.der()).unwrap()
}

pub fn leaf(ca: &TestCa) -> Certificate {
    leaf_with(ca, |_| {})
}

pub fn leaf_with_serial(ca: &TestCa, serial: &[u8]) -> Certificate {
    let serial = serial.to_vec();
    leaf_with(ca, move |params| {
        params.serial_number = Some(SerialNumber::from(serial));
    })
}

/// Build a CRL signed by the test CA, revoking the given serial numbers.
pub fn crl(
    ca: &TestCa,
    revoked_serials: &[&[u8]],
    this_update: OffsetDateTime,
    next_update: OffsetDateTime,
) -> Crl {
    let params = CertificateRevocationListParams {
        this_update,
        next_update,
        crl_number: SerialNumber::from(1234u64),
        issuing_distribution_point: None,
        revoked_certs: revoked_serials
            .iter()
            .map(|serial| RevokedCertParams {
                serial_number: SerialNumber::from(serial.to_vec()),
                revocation_time: this_update,
                reason_code: None,
                invalidity_date: None,
            })
            .collect(),
        key_identifier_method: KeyIdMethod::Sha256,
    };

    let signed = params.signed_by(&ca.issuer).unwrap();
    Crl::from_der(signed.der().as_ref().to_vec()).unwrap()
}

/// A CRL whose next-update time is comfortably in the future.
pub fn fresh_crl(ca: &TestCa, revoked_serials: &[&[u8]]) -> Crl {
    let now = OffsetDateTime::now_utc();
    crl(ca, revoked_serials, now - Duration::hours(1), now + Duration::days(7))
}

/// A CRL whose next-update time has already passed.
pub fn stale_crl(ca: &TestCa, revoked_serials: &[&[u8]]) -> Crl {
    let now = OffsetDateTime::now_utc();
    crl(ca, revoked_serials, now - Duration::days(7), now - Duration::hours(1))
}

fn der(tag: u8, content: &[u8]) -> Vec<u8> {
    assert!(content.len() < 128, "short-form length only");
    let mut out = vec![tag, content.len() as u8];
    out.extend_from_slice(content);
    out
}

/// A syntactically valid CRL whose optional nextUpdate field is absent.
/// rcgen always emits nextUpdate, so this one is assembled by hand; the
/// signature is a placeholder, which parsing does not check.
pub fn crl_without_next_update() -> Crl {
    let algorithm = der(0x30, &encode_oid("1.2.840.10045.4.3.2"));

    let mut attribute = encode_oid("2.5.4.3");
    attribute.extend(der(0x0c, b"Test CA Root"));
    let issuer = der(0x30, &der(0x31, &der(0x30, &attribute)));

    let this_update = der(0x17, b"250101000000Z");

    let mut tbs_content = algorithm.clone();
    tbs_content.extend(&issuer);
    tbs_content.extend(&this_update);

    let mut content = der(0x30, &tbs_content);
    content.extend(&algorithm);
    content.extend(der(0x03, &[0x00]));

    Crl::from_der(der(0x30, &content)).unwrap()
}

fn encode_oid(oid: &str) -> Vec<u8> {
    let arcs: Vec<u64> = oid.split('.').map(|part| part.parse().unwrap()).collect();
    assert!(arcs.len() >= 2, "OID needs at least two arcs");

    let mut body = vec![(40 * arcs[0] + arcs[1]) as u8];
    for &arc in &arcs[2..] {
        let mut chunk = vec![(arc & 0x7f) as u8];
        let mut rest = arc >> 7;
        while rest > 0 {
            chunk.push((rest & 0x7f) as u8 | 0x80);
            rest >>= 7;
        }
        chunk.reverse();
        body.extend(chunk);
    }

    let mut out = vec![0x06, body.len() as u8];
    out.extend(body);
    out
}

/// DER for a certificatePolicies extension value listing the given policy
/// OIDs, suitable for test certificates only (short-form lengths).
pub fn certificate_policies_extension(policy_oids: &[&str]) -> CustomExtension {
    let mut inner = Vec::new();
    for oid in policy_oids {
        let encoded = encode_oid(oid);
        inner.extend([0x30, encoded.len() as u8]);
        inner.extend(encoded);
    }

    let mut value = vec![0x30, inner.len() as u8];
    value.extend(inner);

    CustomExtension::from_oid_content(&[2, 5, 29, 32], value)
}
