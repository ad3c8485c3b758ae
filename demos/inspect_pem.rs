use certshell::{display_plain, Backend, Certificate};
use std::env;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    if args.len() < 2 {
        eprintln!("Usage: {} <cert.pem> [openssl|native]", args[0]);
        std::process::exit(1);
    }

    let backend = match args.get(2).map(String::as_str) {
        Some("native") => Backend::Native,
        _ => Backend::default(),
    };

    let cert = Certificate::load_pem(&args[1])?.with_backend(backend);
    let fields = cert.fields()?;

    print!("{}", display_plain(&fields));

    Ok(())
}
