use crate::openssl::OpensslTool;

/// One of the fields a [`crate::Certificate`] can produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CertField {
    ParsedText,
    PublicKey,
    StartDate,
    EndDate,
    Signature,
}

impl CertField {
    pub const ALL: [CertField; 5] = [
        CertField::PublicKey,
        CertField::ParsedText,
        CertField::EndDate,
        CertField::StartDate,
        CertField::Signature,
    ];

    pub fn name(&self) -> &'static str {
        match self {
            CertField::ParsedText => "parsed cert",
            CertField::PublicKey => "pk pem",
            CertField::StartDate => "start date",
            CertField::EndDate => "end date",
            CertField::Signature => "signature value",
        }
    }
}

impl std::str::FromStr for CertField {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" | "parsed-text" => Ok(CertField::ParsedText),
            "pubkey" | "public-key" | "pk" => Ok(CertField::PublicKey),
            "startdate" | "start-date" | "not-before" => Ok(CertField::StartDate),
            "enddate" | "end-date" | "not-after" => Ok(CertField::EndDate),
            "signature" | "sig" => Ok(CertField::Signature),
            _ => Err(crate::Error::InvalidInput(format!("Unknown field: {}", s))),
        }
    }
}

/// Where field extraction happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Backend {
    /// Pipe the PEM text through the external `openssl x509` command.
    Openssl(OpensslTool),
    /// Decode the certificate in-process with `x509-parser`.
    Native,
}

impl Default for Backend {
    fn default() -> Self {
        Backend::Openssl(OpensslTool::default())
    }
}

impl Backend {
    pub fn name(&self) -> &'static str {
        match self {
            Backend::Openssl(_) => "openssl",
            Backend::Native => "native",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Plain,
    Pretty,
    #[cfg(feature = "json")]
    Json,
}

impl std::str::FromStr for OutputFormat {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "plain" => Ok(OutputFormat::Plain),
            "pretty" => Ok(OutputFormat::Pretty),
            #[cfg(feature = "json")]
            "json" => Ok(OutputFormat::Json),
            _ => Err(crate::Error::InvalidInput(format!("Invalid format: {}", s))),
        }
    }
}

#[cfg(feature = "json")]
use serde::{Deserialize, Serialize};

/// Every field of a certificate, as returned by [`crate::Certificate::fields`].
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "json", derive(Serialize, Deserialize))]
pub struct CertificateFields {
    pub public_key_pem: String,
    pub parsed_text: String,
    pub end_date: String,
    pub start_date: String,
    pub signature: String,
}

impl CertificateFields {
    pub fn get(&self, field: CertField) -> &str {
        match field {
            CertField::ParsedText => &self.parsed_text,
            CertField::PublicKey => &self.public_key_pem,
            CertField::StartDate => &self.start_date,
            CertField::EndDate => &self.end_date,
            CertField::Signature => &self.signature,
        }
    }
}
