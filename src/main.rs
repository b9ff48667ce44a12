use std::fs;
use std::io::{self, Read};

use anyhow::{bail, Context, Result};
use clap::Parser;
use env_logger::Env;
use log::info;

use v2rayconf::{generate, parse_with, GeneratorSettings, ParseOptions};

/// Turn a proxy share link into a v2ray/xray configuration
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Share link to convert (read from stdin when omitted)
    #[arg(short, long, value_name = "LINK")]
    link: Option<String>,

    /// Generator settings file (.toml, .yaml or .yml)
    #[arg(short, long, value_name = "FILE")]
    settings: Option<String>,

    /// Write the result here instead of stdout
    #[arg(short, long, value_name = "OUTPUT_FILE")]
    output: Option<String>,

    /// Print the parsed server instead of the full configuration
    #[arg(long)]
    parse_only: bool,

    /// Skip TLS certificate verification on the proxy outbound
    #[arg(long)]
    allow_insecure: bool,
}

fn read_link(args: &Args) -> Result<String> {
    if let Some(link) = &args.link {
        return Ok(link.clone());
    }
    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Failed to read share link from stdin")?;
    Ok(input)
}

fn main() -> Result<()> {
    // Initialize the logger
    env_logger::init_from_env(Env::default().default_filter_or("info"));

    let args = Args::parse();

    let link = read_link(&args)?;
    if link.trim().is_empty() {
        bail!("No share link given; pass --link or pipe one on stdin");
    }

    let options = ParseOptions {
        allow_insecure: args.allow_insecure,
    };
    let server = parse_with(&link, &options).context("Failed to parse share link")?;
    info!("Parsed {} server '{}'", server.config_type, server.remarks);

    let output = if args.parse_only {
        serde_json::to_string_pretty(&server).context("Failed to serialize server")?
    } else {
        let settings = match &args.settings {
            Some(path) => GeneratorSettings::from_file(path)
                .with_context(|| format!("Failed to load settings from {}", path))?,
            None => GeneratorSettings::default(),
        };
        generate(&server, &settings).context("Failed to generate configuration")?
    };

    match &args.output {
        Some(path) => {
            fs::write(path, &output).with_context(|| format!("Failed to write {}", path))?;
            info!("Configuration written to {}", path);
        }
        None => println!("{}", output),
    }

    Ok(())
}
