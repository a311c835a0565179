use clap::Parser;
use std::io::Write;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "mdmml")]
#[command(version = "0.1.0")]
#[command(about = "Markdown + MML to Standard MIDI File compiler", long_about = None)]
struct Args {
    /// Input Markdown file path or http(s) URL
    input: String,

    /// Output MIDI file (writes to stdout if not specified)
    #[arg(short, long)]
    output: Option<PathBuf>,
}

fn main() -> Result<(), mdmml::Error> {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .init();

    let args = Args::parse();

    let src = read_input(&args.input)?;
    let smf = mdmml::convert(&src)?;

    match &args.output {
        Some(path) => std::fs::write(path, &smf)?,
        None => {
            let mut stdout = std::io::stdout().lock();
            stdout.write_all(&smf)?;
            stdout.flush()?;
        }
    }

    Ok(())
}

/// Read a local file, or download the input when it looks like a URL
fn read_input(input: &str) -> Result<Vec<u8>, mdmml::Error> {
    if input.starts_with("http://") || input.starts_with("https://") {
        return download(input);
    }
    std::fs::read(input).map_err(|e| {
        mdmml::Error::Io(std::io::Error::new(
            e.kind(),
            format!("Failed to open '{}': {}", input, e),
        ))
    })
}

#[cfg(feature = "remote")]
fn download(url: &str) -> Result<Vec<u8>, mdmml::Error> {
    tracing::info!(url, "downloading input");
    let response = reqwest::blocking::get(url)
        .and_then(|r| r.error_for_status())
        .map_err(|e| mdmml::Error::Fetch(e.to_string()))?;
    let body = response
        .bytes()
        .map_err(|e| mdmml::Error::Fetch(e.to_string()))?;
    Ok(body.to_vec())
}

#[cfg(not(feature = "remote"))]
fn download(url: &str) -> Result<Vec<u8>, mdmml::Error> {
    Err(mdmml::Error::Fetch(format!(
        "{}: built without the `remote` feature",
        url
    )))
}
