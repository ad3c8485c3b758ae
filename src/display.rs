use crate::error::Result;
use crate::types::{CertField, CertificateFields, OutputFormat};
use colored::Colorize;

pub fn display_fields(fields: &CertificateFields, format: OutputFormat) -> Result<String> {
    match format {
        OutputFormat::Plain => Ok(display_plain(fields)),
        OutputFormat::Pretty => Ok(display_pretty(fields)),
        #[cfg(feature = "json")]
        OutputFormat::Json => display_json(fields),
    }
}

/// One `<name>: <value>` entry per field.
pub fn display_plain(fields: &CertificateFields) -> String {
    CertField::ALL
        .iter()
        .map(|field| format!("{}: {}\n", field.name(), fields.get(*field)))
        .collect()
}

fn section_title(field: CertField) -> &'static str {
    match field {
        CertField::ParsedText => "Parsed Certificate",
        CertField::PublicKey => "Public Key",
        CertField::StartDate => "Start Date",
        CertField::EndDate => "End Date",
        CertField::Signature => "Signature",
    }
}

fn display_pretty(fields: &CertificateFields) -> String {
    let mut output = String::new();

    output.push_str(&format!("\n{}\n", "Certificate Fields".bold().cyan()));
    output.push_str(&format!("{}\n\n", "=".repeat(80)));

    for field in CertField::ALL {
        let value = fields.get(field);
        let multiline = value.contains('\n');

        if multiline {
            output.push_str(&format!("{}:\n", section_title(field).bold().yellow()));
            output.push_str(&format!("{}\n", "-".repeat(80)));
            for line in value.lines() {
                output.push_str(&format!("  {}\n", line));
            }
            output.push('\n');
        } else {
            output.push_str(&format!(
                "{}: {}\n\n",
                section_title(field).bold().yellow(),
                value.dimmed()
            ));
        }
    }

    output.push_str(&format!("{}\n", "=".repeat(80)));
    output
}

#[cfg(feature = "json")]
fn display_json(fields: &CertificateFields) -> Result<String> {
    Ok(serde_json::to_string_pretty(fields)?)
}
