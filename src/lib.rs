//! certshell - pull fields out of PEM X.509 certificates
//!
//! A [`Certificate`] wraps PEM text and exposes five accessors:
//!
//! - the human-readable text dump,
//! - the subject public key as a `PUBLIC KEY` PEM block,
//! - the `notBefore` and `notAfter` dates,
//! - the signature algorithm and signature value.
//!
//! By default every accessor pipes the PEM text through `openssl x509` and
//! returns what the tool prints, minus trailing newlines. Anything the tool
//! writes to stderr is reported as an error. The [`Backend::Native`]
//! backend produces the same fields in-process with `x509-parser`.
//!
//! # Examples
//!
//! ```no_run
//! use certshell::Certificate;
//!
//! let pem = std::fs::read_to_string("server.pem").unwrap();
//! let cert = Certificate::from_pem(pem);
//!
//! println!("{}", cert.public_key_pem().unwrap());
//! println!("{}", cert.end_date().unwrap());
//! ```
//!
//! ## Without the openssl binary
//!
//! ```no_run
//! use certshell::{Backend, Certificate};
//!
//! let cert = Certificate::load_pem("server.pem")
//!     .unwrap()
//!     .with_backend(Backend::Native);
//!
//! let fields = cert.fields().unwrap();
//! println!("{}", fields.signature);
//! ```

pub mod cert;
pub mod display;
pub mod error;
pub mod native;
pub mod openssl;
pub mod types;

#[cfg(feature = "cli")]
pub mod cli;

pub use error::{Error, Result};

pub use cert::Certificate;
pub use display::{display_fields, display_plain};
pub use openssl::OpensslTool;
pub use types::{Backend, CertField, CertificateFields, OutputFormat};
