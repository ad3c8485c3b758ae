use crate::error::Result;
use crate::native;
use crate::openssl::OpensslTool;
use crate::types::{Backend, CertField, CertificateFields};
use std::fs;
use std::path::Path;

/// A PEM certificate and the backend its accessors run through.
///
/// Construction never validates the text; problems surface when a field
/// is requested.
#[derive(Debug, Clone)]
pub struct Certificate {
    pem: String,
    backend: Backend,
}

impl Certificate {
    pub fn from_pem(pem: impl Into<String>) -> Self {
        Self {
            pem: pem.into(),
            backend: Backend::default(),
        }
    }

    pub fn load_pem(path: impl AsRef<Path>) -> Result<Self> {
        let pem = fs::read_to_string(path)?;
        Ok(Self::from_pem(pem))
    }

    pub fn with_backend(mut self, backend: Backend) -> Self {
        self.backend = backend;
        self
    }

    pub fn with_openssl(self, program: impl Into<std::path::PathBuf>) -> Self {
        self.with_backend(Backend::Openssl(OpensslTool::new(program)))
    }

    pub fn pem(&self) -> &str {
        &self.pem
    }

    pub fn backend(&self) -> &Backend {
        &self.backend
    }

    /// Human-readable dump of the whole certificate.
    pub fn parsed_text(&self) -> Result<String> {
        self.field(CertField::ParsedText)
    }

    /// Subject public key as a `PUBLIC KEY` PEM block.
    pub fn public_key_pem(&self) -> Result<String> {
        self.field(CertField::PublicKey)
    }

    /// `notBefore=<date>`
    pub fn start_date(&self) -> Result<String> {
        self.field(CertField::StartDate)
    }

    /// `notAfter=<date>`
    pub fn end_date(&self) -> Result<String> {
        self.field(CertField::EndDate)
    }

    /// Signature algorithm and signature value.
    pub fn signature(&self) -> Result<String> {
        self.field(CertField::Signature)
    }

    pub fn field(&self, field: CertField) -> Result<String> {
        tracing::debug!(field = field.name(), backend = self.backend.name(), "extracting");

        match &self.backend {
            Backend::Openssl(tool) => tool.extract(field, &self.pem),
            Backend::Native => native::extract(field, &self.pem),
        }
    }

    /// Every field, stopping at the first failure.
    pub fn fields(&self) -> Result<CertificateFields> {
        Ok(CertificateFields {
            public_key_pem: self.public_key_pem()?,
            parsed_text: self.parsed_text()?,
            end_date: self.end_date()?,
            start_date: self.start_date()?,
            signature: self.signature()?,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Error;
    use crate::openssl::is_available;
    use std::io::Write;

    fn test_pem() -> String {
        rcgen::generate_simple_self_signed(vec!["cert.example.com".to_string()])
            .unwrap()
            .serialize_pem()
            .unwrap()
    }

    fn openssl_or_skip(test: &str) -> Option<OpensslTool> {
        let tool = OpensslTool::default();
        if is_available(&tool) {
            Some(tool)
        } else {
            eprintln!("openssl not available, skipping {}", test);
            None
        }
    }

    #[test]
    fn test_default_backend() {
        let cert = Certificate::from_pem("anything");
        assert_eq!(cert.pem(), "anything");
        assert_eq!(cert.backend().name(), "openssl");
    }

    #[test]
    fn test_load_pem_from_file() {
        let pem = test_pem();
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(pem.as_bytes()).unwrap();

        let cert = Certificate::load_pem(file.path()).unwrap();
        assert_eq!(cert.pem(), pem);
    }

    #[test]
    fn test_load_pem_missing_file() {
        let err = Certificate::load_pem("/nonexistent/cert.pem").unwrap_err();
        assert!(matches!(err, Error::Io(_)));
    }

    #[test]
    fn test_native_fields() {
        let cert = Certificate::from_pem(test_pem()).with_backend(Backend::Native);
        let fields = cert.fields().unwrap();

        assert!(fields.public_key_pem.starts_with("-----BEGIN PUBLIC KEY-----"));
        assert!(fields.parsed_text.contains("DNS:cert.example.com"));
        assert!(fields.start_date.starts_with("notBefore="));
        assert!(fields.end_date.starts_with("notAfter="));
        assert!(fields.signature.contains("Signature Value:"));
        for field in CertField::ALL {
            assert!(!fields.get(field).ends_with('\n'));
        }
    }

    #[test]
    fn test_missing_tool_fails_every_accessor() {
        let cert = Certificate::from_pem(test_pem()).with_openssl("/nonexistent/openssl");
        assert!(matches!(cert.public_key_pem(), Err(Error::Spawn { .. })));
        assert!(matches!(cert.fields(), Err(Error::Spawn { .. })));
    }

    #[test]
    fn test_openssl_matches_native() {
        let Some(tool) = openssl_or_skip("test_openssl_matches_native") else {
            return;
        };
        let pem = test_pem();
        let external = Certificate::from_pem(pem.clone()).with_backend(Backend::Openssl(tool));
        let native = Certificate::from_pem(pem).with_backend(Backend::Native);

        assert_eq!(
            external.public_key_pem().unwrap(),
            native.public_key_pem().unwrap()
        );
        assert_eq!(external.start_date().unwrap(), native.start_date().unwrap());
        assert_eq!(external.end_date().unwrap(), native.end_date().unwrap());
        assert_eq!(external.signature().unwrap(), native.signature().unwrap());

        let external_text = external.parsed_text().unwrap();
        let native_text = native.parsed_text().unwrap();
        assert!(!external_text.ends_with('\n'));
        assert!(!native_text.ends_with('\n'));
    }

    #[test]
    fn test_openssl_text_and_signature() {
        let Some(tool) = openssl_or_skip("test_openssl_text_and_signature") else {
            return;
        };
        let pem = test_pem();
        let cert = Certificate::from_pem(pem.clone()).with_backend(Backend::Openssl(tool));

        let text = cert.parsed_text().unwrap();
        assert!(text.contains("cert.example.com"));
        assert!(!text.contains(pem.trim_end()));
        assert!(!text.ends_with('\n'));

        let signature = cert.signature().unwrap();
        assert!(signature.contains("Signature"));
        assert!(!signature.contains("Validity"));
        assert!(!signature.ends_with('\n'));
    }

    #[test]
    fn test_openssl_rejects_garbage() {
        let Some(tool) = openssl_or_skip("test_openssl_rejects_garbage") else {
            return;
        };
        let cert = Certificate::from_pem("not a certificate\n").with_backend(Backend::Openssl(tool));

        match cert.start_date() {
            Err(Error::Command { stderr, .. }) => assert!(!stderr.is_empty()),
            other => panic!("unexpected result: {other:?}"),
        }
    }
}
