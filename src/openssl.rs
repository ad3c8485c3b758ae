//! Field extraction through the external `openssl` command.
//!
//! Each field maps to a fixed `openssl x509` argument vector. The PEM text
//! is written to the child's stdin and whatever the tool prints on stdout
//! is returned after trimming. Anything the tool prints on stderr turns
//! the call into an error, even when it exits with status 0.

use crate::error::{Error, Result};
use crate::types::CertField;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::thread;

pub const DEFAULT_PROGRAM: &str = "openssl";

const PARSED_TEXT_ARGS: &[&str] = &["x509", "-text", "-noout"];
const PUBLIC_KEY_ARGS: &[&str] = &["x509", "-pubkey", "-noout"];
const START_DATE_ARGS: &[&str] = &["x509", "-startdate", "-noout"];
const END_DATE_ARGS: &[&str] = &["x509", "-enddate", "-noout"];
// Only the signature algorithm and the signature value survive these options.
const SIGNATURE_ARGS: &[&str] = &[
    "x509",
    "-text",
    "-noout",
    "-certopt",
    "ca_default,no_validity,no_serial,no_subject,no_extensions,no_signame",
];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OpensslTool {
    program: PathBuf,
}

impl Default for OpensslTool {
    fn default() -> Self {
        Self::new(DEFAULT_PROGRAM)
    }
}

impl OpensslTool {
    pub fn new(program: impl Into<PathBuf>) -> Self {
        Self {
            program: program.into(),
        }
    }

    pub fn program(&self) -> &Path {
        &self.program
    }

    pub fn args_for(field: CertField) -> &'static [&'static str] {
        match field {
            CertField::ParsedText => PARSED_TEXT_ARGS,
            CertField::PublicKey => PUBLIC_KEY_ARGS,
            CertField::StartDate => START_DATE_ARGS,
            CertField::EndDate => END_DATE_ARGS,
            CertField::Signature => SIGNATURE_ARGS,
        }
    }

    /// Runs the field's `openssl x509` invocation over `pem` and
    /// post-processes the output.
    pub fn extract(&self, field: CertField, pem: &str) -> Result<String> {
        let stdout = self.run(Self::args_for(field), pem)?;

        let output = match field {
            CertField::ParsedText => strip_echoed_input(&stdout, pem),
            _ => stdout,
        };

        Ok(trim_trailing_newlines(&output).to_string())
    }

    /// `openssl version`, trimmed.
    pub fn version(&self) -> Result<String> {
        let stdout = self.run(&["version"], "")?;
        Ok(trim_trailing_newlines(&stdout).to_string())
    }

    /// Spawns the program with `args`, feeds `input` on stdin and returns
    /// stdout.
    ///
    /// # Errors
    ///
    /// [`Error::Spawn`] if the program cannot be started, [`Error::Command`]
    /// if it exits unsuccessfully or writes anything to stderr.
    pub fn run(&self, args: &[&str], input: &str) -> Result<String> {
        tracing::debug!(
            program = %self.program.display(),
            ?args,
            input_len = input.len(),
            "running external command"
        );

        let mut child = Command::new(&self.program)
            .args(args)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .spawn()
            .map_err(|source| Error::Spawn {
                program: self.program.display().to_string(),
                source,
            })?;

        let mut stdin = child.stdin.take().ok_or_else(|| {
            Error::Io(io::Error::new(
                io::ErrorKind::BrokenPipe,
                "child stdin was not captured",
            ))
        })?;

        // Fed from a separate thread so a child that fills its stdout pipe
        // before draining stdin cannot block us.
        let input = input.to_owned();
        let writer = thread::spawn(move || stdin.write_all(input.as_bytes()));

        let output = child.wait_with_output()?;

        match writer.join() {
            Ok(Ok(())) => {}
            // The child stopped reading; its exit status and stderr say why.
            Ok(Err(e)) if e.kind() == io::ErrorKind::BrokenPipe => {}
            Ok(Err(e)) => return Err(Error::Io(e)),
            Err(_) => {
                return Err(Error::Io(io::Error::new(
                    io::ErrorKind::Other,
                    "stdin writer thread panicked",
                )))
            }
        }

        if !output.status.success() || !output.stderr.is_empty() {
            let stderr = String::from_utf8_lossy(&output.stderr).into_owned();
            tracing::warn!(
                program = %self.program.display(),
                status = ?output.status.code(),
                %stderr,
                "external command failed"
            );
            return Err(Error::Command {
                status: output.status.code(),
                stderr,
            });
        }

        tracing::debug!(stdout_len = output.stdout.len(), "external command finished");

        Ok(String::from_utf8(output.stdout)?)
    }
}

fn strip_echoed_input(output: &str, pem: &str) -> String {
    if pem.is_empty() {
        return output.to_string();
    }
    output.replace(pem, "")
}

pub(crate) fn trim_trailing_newlines(s: &str) -> &str {
    s.trim_end_matches('\n')
}

/// True when the program answers `version` successfully.
pub fn is_available(tool: &OpensslTool) -> bool {
    tool.version().is_ok()
}
