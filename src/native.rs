//! In-process field extraction with `x509-parser`.
//!
//! Output mirrors the layout `openssl x509` prints for the same options so
//! callers can switch backends without reworking their parsing.

use crate::error::{Error, Result};
use crate::openssl::trim_trailing_newlines;
use crate::types::CertField;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use chrono::DateTime;
use x509_parser::der_parser::oid::Oid;
use x509_parser::objects::{oid2sn, oid_registry};
use x509_parser::pem::parse_x509_pem;
use x509_parser::prelude::*;

const PEM_LINE_WIDTH: usize = 64;
const SIGNATURE_BYTES_PER_LINE: usize = 18;
const KEY_BYTES_PER_LINE: usize = 15;

/// Extracts `field` from the PEM certificate in `pem`.
pub fn extract(field: CertField, pem: &str) -> Result<String> {
    let der = pem_to_der(pem)?;
    let (_, x509) = X509Certificate::from_der(&der)?;

    let output = match field {
        CertField::ParsedText => parsed_text(&x509),
        CertField::PublicKey => public_key_pem(&x509),
        CertField::StartDate => format!("notBefore={}", format_time(&x509.validity().not_before)),
        CertField::EndDate => format!("notAfter={}", format_time(&x509.validity().not_after)),
        CertField::Signature => signature_block(&x509, 4),
    };

    Ok(trim_trailing_newlines(&output).to_string())
}

fn pem_to_der(pem: &str) -> Result<Vec<u8>> {
    let (_, block) = parse_x509_pem(pem.as_bytes())?;

    if block.label != "CERTIFICATE" {
        return Err(Error::Pem(format!(
            "expected a CERTIFICATE block, found {}",
            block.label
        )));
    }

    Ok(block.contents)
}

fn public_key_pem(x509: &X509Certificate<'_>) -> String {
    let encoded = STANDARD.encode(x509.public_key().raw);

    let mut pem = String::from("-----BEGIN PUBLIC KEY-----\n");
    for chunk in encoded.as_bytes().chunks(PEM_LINE_WIDTH) {
        // base64 output is ASCII, so every chunk is valid UTF-8
        pem.push_str(&String::from_utf8_lossy(chunk));
        pem.push('\n');
    }
    pem.push_str("-----END PUBLIC KEY-----");
    pem
}

/// `Mon DD HH:MM:SS YYYY GMT` with a space-padded day, as `openssl` prints.
fn format_time(time: &ASN1Time) -> String {
    match DateTime::from_timestamp(time.timestamp(), 0) {
        Some(dt) => dt.format("%b %e %H:%M:%S %Y GMT").to_string(),
        None => time.to_string(),
    }
}

fn oid_name(oid: &Oid<'_>) -> String {
    match oid2sn(oid, oid_registry()) {
        Ok(name) => name.to_string(),
        Err(_) => oid.to_id_string(),
    }
}

fn hex_lines(bytes: &[u8], per_line: usize, indent: usize) -> String {
    let pad = " ".repeat(indent);
    let lines: Vec<String> = bytes
        .chunks(per_line)
        .map(|chunk| {
            let hex: Vec<String> = chunk.iter().map(|b| format!("{:02x}", b)).collect();
            format!("{}{}", pad, hex.join(":"))
        })
        .collect();
    lines.join(":\n")
}

fn signature_block(x509: &X509Certificate<'_>, indent: usize) -> String {
    let pad = " ".repeat(indent);
    let signature: &[u8] = &x509.signature_value.data;

    format!(
        "{pad}Signature Algorithm: {}\n{pad}Signature Value:\n{}",
        oid_name(&x509.signature_algorithm.algorithm),
        hex_lines(signature, SIGNATURE_BYTES_PER_LINE, indent + 4),
    )
}

fn parsed_text(x509: &X509Certificate<'_>) -> String {
    let version = x509.version().0;
    let mut out = String::new();

    out.push_str("Certificate:\n");
    out.push_str("    Data:\n");
    out.push_str(&format!(
        "        Version: {} (0x{:x})\n",
        version + 1,
        version
    ));
    out.push_str("        Serial Number:\n");
    out.push_str(&format!("            {}\n", x509.raw_serial_as_string()));
    out.push_str(&format!(
        "        Signature Algorithm: {}\n",
        oid_name(&x509.signature_algorithm.algorithm)
    ));
    out.push_str(&format!("        Issuer: {}\n", x509.issuer()));
    out.push_str("        Validity\n");
    out.push_str(&format!(
        "            Not Before: {}\n",
        format_time(&x509.validity().not_before)
    ));
    out.push_str(&format!(
        "            Not After : {}\n",
        format_time(&x509.validity().not_after)
    ));
    out.push_str(&format!("        Subject: {}\n", x509.subject()));

    let spki = x509.public_key();
    out.push_str("        Subject Public Key Info:\n");
    out.push_str(&format!(
        "            Public Key Algorithm: {}\n",
        oid_name(&spki.algorithm.algorithm)
    ));
    if let Ok(x509_parser::public_key::PublicKey::RSA(rsa)) = spki.parsed() {
        out.push_str(&format!(
            "                Public-Key: ({} bit)\n",
            rsa.key_size()
        ));
    }
    let key_bytes: &[u8] = &spki.subject_public_key.data;
    out.push_str(&hex_lines(key_bytes, KEY_BYTES_PER_LINE, 16));
    out.push('\n');

    let extensions = x509.extensions();
    if !extensions.is_empty() {
        out.push_str("        X509v3 extensions:\n");
        for ext in extensions {
            let critical = if ext.critical { " critical" } else { "" };
            out.push_str(&format!(
                "            {}:{}\n",
                oid_name(&ext.oid),
                critical
            ));
            for line in extension_lines(ext) {
                out.push_str(&format!("                {}\n", line));
            }
        }
    }

    out.push_str(&signature_block(x509, 4));
    out.push('\n');
    out
}

fn extension_lines(ext: &X509Extension<'_>) -> Vec<String> {
    match ext.parsed_extension() {
        ParsedExtension::SubjectAlternativeName(san) => {
            let names: Vec<String> = san.general_names.iter().map(format_general_name).collect();
            vec![names.join(", ")]
        }
        ParsedExtension::BasicConstraints(bc) => {
            let mut line = if bc.ca { "CA:TRUE" } else { "CA:FALSE" }.to_string();
            if let Some(len) = bc.path_len_constraint {
                line.push_str(&format!(", pathlen:{}", len));
            }
            vec![line]
        }
        ParsedExtension::KeyUsage(ku) => vec![key_usage_names(ku).join(", ")],
        ParsedExtension::ExtendedKeyUsage(eku) => {
            vec![extended_key_usage_names(eku).join(", ")]
        }
        ParsedExtension::SubjectKeyIdentifier(kid) => vec![colon_hex_upper(kid.0)],
        ParsedExtension::AuthorityKeyIdentifier(aki) => match &aki.key_identifier {
            Some(kid) => vec![colon_hex_upper(kid.0)],
            None => Vec::new(),
        },
        _ => hex_lines(ext.value, KEY_BYTES_PER_LINE, 0)
            .lines()
            .map(str::to_string)
            .collect(),
    }
}

fn format_general_name(name: &GeneralName<'_>) -> String {
    match name {
        GeneralName::DNSName(dns) => format!("DNS:{}", dns),
        GeneralName::RFC822Name(email) => format!("email:{}", email),
        GeneralName::URI(uri) => format!("URI:{}", uri),
        GeneralName::IPAddress(ip) => format!("IP Address:{}", format_ip(ip)),
        other => format!("{:?}", other),
    }
}

fn format_ip(bytes: &[u8]) -> String {
    if let Ok(v4) = <[u8; 4]>::try_from(bytes) {
        std::net::IpAddr::from(v4).to_string()
    } else if let Ok(v6) = <[u8; 16]>::try_from(bytes) {
        std::net::IpAddr::from(v6).to_string()
    } else {
        colon_hex_upper(bytes)
    }
}

fn colon_hex_upper(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{:02X}", b))
        .collect::<Vec<_>>()
        .join(":")
}

fn key_usage_names(ku: &KeyUsage) -> Vec<&'static str> {
    let mut names = Vec::new();
    if ku.digital_signature() {
        names.push("Digital Signature");
    }
    if ku.non_repudiation() {
        names.push("Non Repudiation");
    }
    if ku.key_encipherment() {
        names.push("Key Encipherment");
    }
    if ku.data_encipherment() {
        names.push("Data Encipherment");
    }
    if ku.key_agreement() {
        names.push("Key Agreement");
    }
    if ku.key_cert_sign() {
        names.push("Certificate Sign");
    }
    if ku.crl_sign() {
        names.push("CRL Sign");
    }
    names
}

fn extended_key_usage_names(eku: &ExtendedKeyUsage<'_>) -> Vec<String> {
    let mut names = Vec::new();
    if eku.server_auth {
        names.push("TLS Web Server Authentication".to_string());
    }
    if eku.client_auth {
        names.push("TLS Web Client Authentication".to_string());
    }
    if eku.code_signing {
        names.push("Code Signing".to_string());
    }
    if eku.email_protection {
        names.push("E-mail Protection".to_string());
    }
    if eku.time_stamping {
        names.push("Time Stamping".to_string());
    }
    if eku.ocsp_signing {
        names.push("OCSP Signing".to_string());
    }
    for oid in &eku.other {
        names.push(oid.to_id_string());
    }
    names
}

#[cfg(test)]
mod tests {
    use super::*;

    fn self_signed() -> (String, Vec<u8>) {
        let cert = rcgen::generate_simple_self_signed(vec!["localhost".to_string()]).unwrap();
        (cert.serialize_pem().unwrap(), cert.get_key_pair().public_key_der())
    }

    #[test]
    fn test_public_key_pem_wraps_spki() {
        let (pem, spki_der) = self_signed();
        let key_pem = extract(CertField::PublicKey, &pem).unwrap();

        assert!(key_pem.starts_with("-----BEGIN PUBLIC KEY-----\n"));
        assert!(key_pem.ends_with("\n-----END PUBLIC KEY-----"));
        assert!(key_pem.lines().all(|l| l.len() <= PEM_LINE_WIDTH));

        let body: String = key_pem
            .lines()
            .filter(|l| !l.starts_with("-----"))
            .collect();
        assert_eq!(STANDARD.decode(body).unwrap(), spki_der);
    }

    #[test]
    fn test_dates() {
        let (pem, _) = self_signed();

        let start = extract(CertField::StartDate, &pem).unwrap();
        let end = extract(CertField::EndDate, &pem).unwrap();

        // rcgen defaults to 1975-01-01 .. 4096-01-01
        assert_eq!(start, "notBefore=Jan  1 00:00:00 1975 GMT");
        assert_eq!(end, "notAfter=Jan  1 00:00:00 4096 GMT");
    }

    #[test]
    fn test_signature_block() {
        let (pem, _) = self_signed();
        let sig = extract(CertField::Signature, &pem).unwrap();
        let mut lines = sig.lines();

        let algorithm = lines.next().unwrap();
        assert!(algorithm.starts_with("    Signature Algorithm: "));
        assert!(algorithm.to_lowercase().contains("sha256"));
        assert_eq!(lines.next(), Some("    Signature Value:"));
        // ECDSA signatures are DER sequences
        let first = lines.next().unwrap();
        assert!(first.starts_with("        30:"));
        assert!(!sig.ends_with('\n'));
    }

    #[test]
    fn test_parsed_text_lists_san() {
        let (pem, _) = self_signed();
        let text = extract(CertField::ParsedText, &pem).unwrap();

        assert!(text.starts_with("Certificate:\n    Data:\n"));
        assert!(text.contains("Version: 3 (0x2)"));
        assert!(text.contains("Not Before: Jan  1 00:00:00 1975 GMT"));
        assert!(text.contains("DNS:localhost"));
        assert!(text.contains("Signature Value:"));
        assert!(!text.contains("BEGIN CERTIFICATE"));
        assert!(!text.ends_with('\n'));
        assert!(text.ends_with(sig_last_line(&pem).as_str()));
    }

    fn sig_last_line(pem: &str) -> String {
        let sig = extract(CertField::Signature, pem).unwrap();
        sig.lines().last().unwrap().to_string()
    }

    #[test]
    fn test_no_field_ends_with_newline() {
        let (pem, _) = self_signed();
        for field in CertField::ALL {
            let value = extract(field, &pem).unwrap();
            assert!(!value.ends_with('\n'), "{:?} ends with a newline", field);
        }
    }

    #[test]
    fn test_rejects_non_certificate_block() {
        let pem = "-----BEGIN PUBLIC KEY-----\nAAAA\n-----END PUBLIC KEY-----\n";
        let err = extract(CertField::PublicKey, pem).unwrap_err();
        assert!(matches!(err, Error::Pem(_)));
    }

    #[test]
    fn test_rejects_garbage() {
        assert!(extract(CertField::StartDate, "not a certificate").is_err());

        let pem = "-----BEGIN CERTIFICATE-----\nAAAA\n-----END CERTIFICATE-----\n";
        let err = extract(CertField::StartDate, pem).unwrap_err();
        assert!(matches!(err, Error::X509Parse(_)));
    }

    #[test]
    fn test_format_ip() {
        assert_eq!(format_ip(&[127, 0, 0, 1]), "127.0.0.1");
        let mut v6 = [0u8; 16];
        v6[15] = 1;
        assert_eq!(format_ip(&v6), "::1");
        assert_eq!(format_ip(&[1, 2]), "01:02");
    }

    #[test]
    fn test_hex_lines_layout() {
        let bytes: Vec<u8> = (0u8..20).collect();
        let out = hex_lines(&bytes, 18, 8);
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].starts_with("        00:01:"));
        assert!(lines[0].ends_with("10:11:"));
        assert_eq!(lines[1], "        12:13");
    }
}
