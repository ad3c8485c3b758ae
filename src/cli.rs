use crate::cert::Certificate;
use crate::display::display_fields;
use crate::error::{Error, Result};
use crate::openssl::OpensslTool;
use crate::types::{Backend, CertField, OutputFormat};
use clap::{Parser, Subcommand};
use colored::Colorize;
use std::io::Read;
use std::path::{Path, PathBuf};

#[derive(Parser)]
#[command(name = "certshell")]
#[command(version, about = "Extract fields from PEM X.509 certificates", long_about = None)]
pub struct Cli {
    #[arg(
        short,
        long,
        global = true,
        default_value = "openssl",
        help = "Extraction backend: openssl or native"
    )]
    pub backend: String,

    #[arg(
        long,
        global = true,
        env = "CERTSHELL_OPENSSL",
        default_value = "openssl",
        help = "openssl program name or path"
    )]
    pub openssl: PathBuf,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    #[command(about = "Print the human-readable certificate dump")]
    Text {
        #[arg(default_value = "-", help = "PEM file, '-' for stdin")]
        input: PathBuf,
    },

    #[command(about = "Print the subject public key as PEM")]
    Pubkey {
        #[arg(default_value = "-", help = "PEM file, '-' for stdin")]
        input: PathBuf,
    },

    #[command(about = "Print the notBefore date")]
    Startdate {
        #[arg(default_value = "-", help = "PEM file, '-' for stdin")]
        input: PathBuf,
    },

    #[command(about = "Print the notAfter date")]
    Enddate {
        #[arg(default_value = "-", help = "PEM file, '-' for stdin")]
        input: PathBuf,
    },

    #[command(about = "Print the signature algorithm and value")]
    Signature {
        #[arg(default_value = "-", help = "PEM file, '-' for stdin")]
        input: PathBuf,
    },

    #[command(about = "Print every field")]
    All {
        #[arg(default_value = "-", help = "PEM file, '-' for stdin")]
        input: PathBuf,

        #[arg(
            short,
            long,
            default_value = "plain",
            help = "Output format: plain, pretty or json"
        )]
        format: String,
    },

    #[command(about = "Check that the openssl program can be run")]
    Doctor,
}

/// Installs the stderr log subscriber, filtered by `CERTSHELL_LOG`.
///
/// # Errors
///
/// Will return `Err` if a global subscriber is already installed
pub fn trace_init() -> Result<()> {
    use tracing_subscriber::EnvFilter;

    let env_filter =
        EnvFilter::try_from_env("CERTSHELL_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init()
        .map_err(|e| Error::Logging(e.to_string()))
}

fn parse_backend(name: &str, openssl: PathBuf) -> Result<Backend> {
    match name.to_lowercase().as_str() {
        "openssl" => Ok(Backend::Openssl(OpensslTool::new(openssl))),
        "native" => Ok(Backend::Native),
        _ => Err(Error::InvalidInput(format!("Invalid backend: {}", name))),
    }
}

fn read_input(input: &Path) -> Result<Certificate> {
    if input.as_os_str() == "-" {
        let mut pem = String::new();
        std::io::stdin().read_to_string(&mut pem)?;
        Ok(Certificate::from_pem(pem))
    } else {
        Certificate::load_pem(input)
    }
}

fn print_field(input: &Path, backend: Backend, field: CertField) -> Result<()> {
    let cert = read_input(input)?.with_backend(backend);
    println!("{}", cert.field(field)?);
    Ok(())
}

pub fn run_cli() -> Result<()> {
    let cli = Cli::parse();
    trace_init()?;

    let backend = parse_backend(&cli.backend, cli.openssl.clone())?;

    match cli.command {
        Commands::Text { input } => print_field(&input, backend, CertField::ParsedText)?,
        Commands::Pubkey { input } => print_field(&input, backend, CertField::PublicKey)?,
        Commands::Startdate { input } => print_field(&input, backend, CertField::StartDate)?,
        Commands::Enddate { input } => print_field(&input, backend, CertField::EndDate)?,
        Commands::Signature { input } => print_field(&input, backend, CertField::Signature)?,

        Commands::All { input, format } => {
            let output_format = format.parse::<OutputFormat>()?;
            let cert = read_input(&input)?.with_backend(backend);
            let fields = cert.fields()?;
            print!("{}", display_fields(&fields, output_format)?);
            if output_format != OutputFormat::Plain {
                println!();
            }
        }

        Commands::Doctor => {
            let tool = OpensslTool::new(cli.openssl);
            let version = tool.version()?;
            println!("{}", "openssl is available".green().bold());
            println!("  {}: {}", "Program".cyan(), tool.program().display());
            println!("  {}: {}", "Version".cyan(), version);
        }
    }

    Ok(())
}
