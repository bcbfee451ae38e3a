//! PDF signing tool - command-line interface
//! Created: 2025-06-06
//!
//! Subcommands:
//!   sign     stamp a signature image into prepared fields
//!   verify   compare a document against a digest or an audit record
//!   prepare  convert editor fields to PDF space

use std::path::Path;
use std::process;

use clap::{Arg, ArgAction, ArgGroup, ArgMatches, Command};
use serde::de::DeserializeOwned;
use serde::Serialize;
use tracing::{debug, error, info, warn};

use pdfsign::{
    AuditRecord, Error, Logger, PreparationRequest, PreparedField, Result, SigningConfig,
    SigningRequest, SigningService, VerificationRequest,
};

/// Exit status when a document does not match its reference digest.
const EXIT_MISMATCH: i32 = 2;

#[tokio::main]
async fn main() {
    let matches = build_cli().get_matches();

    let level = if matches.get_flag("quiet") {
        "error"
    } else {
        matches.get_one::<String>("verbose").map(String::as_str).unwrap_or("info")
    };
    Logger::with_level(level).init();

    let config = match load_config(matches.get_one::<String>("config")).await {
        Ok(config) => config,
        Err(e) => {
            error!("❌ Failed to load config: {}", e);
            process::exit(1);
        }
    };
    let service = SigningService::new(config);

    let outcome = match matches.subcommand() {
        Some(("sign", sub)) => run_sign(service, sub).await,
        Some(("verify", sub)) => run_verify(service, sub).await,
        Some(("prepare", sub)) => run_prepare(service, sub).await,
        _ => Err(Error::input("no subcommand given")),
    };

    match outcome {
        Ok(code) => process::exit(code),
        Err(e) => {
            error!("❌ {}", e);
            process::exit(1);
        }
    }
}

fn build_cli() -> Command {
    Command::new("pdfsign")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Place signature fields on PDF pages and stamp them with a signature image")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("config")
                .short('c')
                .long("config")
                .value_name("FILE")
                .global(true)
                .help("Configuration file (JSON/YAML)"),
        )
        .arg(
            Arg::new("verbose")
                .short('v')
                .long("verbose")
                .value_name("LEVEL")
                .value_parser(["error", "warn", "info", "debug", "trace"])
                .default_value("info")
                .global(true)
                .help("Set logging verbosity"),
        )
        .arg(
            Arg::new("quiet")
                .short('q')
                .long("quiet")
                .action(ArgAction::SetTrue)
                .global(true)
                .help("Suppress all output except errors"),
        )
        .subcommand(
            Command::new("sign")
                .about("Stamp a signature image into every signature field")
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .value_name("PDF")
                        .required(true)
                        .help("Document to sign"),
                )
                .arg(
                    Arg::new("signature")
                        .short('s')
                        .long("signature")
                        .value_name("IMAGE")
                        .required(true)
                        .help("PNG or JPEG signature image"),
                )
                .arg(
                    Arg::new("fields")
                        .short('f')
                        .long("fields")
                        .value_name("FILE")
                        .required(true)
                        .help("Prepared fields in PDF space (JSON/YAML)"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("PDF")
                        .required(true)
                        .help("Where to write the signed document"),
                )
                .arg(
                    Arg::new("record")
                        .short('r')
                        .long("record")
                        .value_name("FILE")
                        .help("Write the audit record as JSON"),
                )
                .arg(
                    Arg::new("name")
                        .long("name")
                        .value_name("NAME")
                        .help("Document name for the audit record"),
                )
                .arg(
                    Arg::new("force")
                        .long("force")
                        .action(ArgAction::SetTrue)
                        .help("Overwrite an existing output file"),
                ),
        )
        .subcommand(
            Command::new("verify")
                .about("Check a document against a digest or an audit record")
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .value_name("PDF")
                        .required(true)
                        .help("Document to check"),
                )
                .arg(
                    Arg::new("digest")
                        .short('d')
                        .long("digest")
                        .value_name("HEX")
                        .help("Reference SHA-256 digest"),
                )
                .arg(
                    Arg::new("record")
                        .short('r')
                        .long("record")
                        .value_name("FILE")
                        .help("Audit record written by `sign`; updated on a match"),
                )
                .group(
                    ArgGroup::new("reference")
                        .args(["digest", "record"])
                        .required(true),
                ),
        )
        .subcommand(
            Command::new("prepare")
                .about("Convert editor fields to PDF space")
                .arg(
                    Arg::new("input")
                        .short('i')
                        .long("input")
                        .value_name("FILE")
                        .required(true)
                        .help("Fields and page geometry (JSON/YAML)"),
                )
                .arg(
                    Arg::new("output")
                        .short('o')
                        .long("output")
                        .value_name("FILE")
                        .help("Write prepared fields here instead of stdout"),
                ),
        )
}

async fn load_config(path: Option<&String>) -> Result<SigningConfig> {
    match path {
        Some(path) => SigningConfig::load(path).await,
        None => Ok(SigningConfig::default()),
    }
}

/// Reads a JSON or YAML document, trying JSON first.
async fn read_structured<T: DeserializeOwned>(path: &str) -> Result<T> {
    let content = tokio::fs::read_to_string(path).await?;
    serde_json::from_str(&content)
        .or_else(|_| serde_yaml::from_str(&content))
        .map_err(|e| Error::SerializationError(format!("{}: {}", path, e)))
}

async fn write_json<T: Serialize>(path: Option<&String>, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value)?;
    match path {
        Some(path) => {
            tokio::fs::write(path, json).await?;
            debug!("Wrote {}", path);
        }
        None => println!("{}", json),
    }
    Ok(())
}

fn required<'a>(matches: &'a ArgMatches, id: &str) -> Result<&'a String> {
    matches
        .get_one::<String>(id)
        .ok_or_else(|| Error::input(format!("--{} is required", id)))
}

async fn run_sign(service: SigningService, matches: &ArgMatches) -> Result<i32> {
    let input = required(matches, "input")?;
    let output = required(matches, "output")?;

    if Path::new(output).exists() && !matches.get_flag("force") {
        return Err(Error::input(format!(
            "output file already exists: {} (use --force to overwrite)",
            output
        )));
    }

    let fields: Vec<PreparedField> = read_structured(required(matches, "fields")?).await?;
    let request = SigningRequest {
        document: tokio::fs::read(input).await?,
        signature_image: tokio::fs::read(required(matches, "signature")?).await?,
        fields,
        file_name: matches.get_one::<String>("name").cloned().or_else(|| {
            Path::new(input)
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
        }),
    };

    info!("Signing {} with {} fields", input, request.fields.len());
    let response = tokio::task::spawn_blocking(move || service.sign(&request))
        .await
        .map_err(|e| Error::InternalError(format!("signing task failed: {}", e)))??;

    tokio::fs::write(output, &response.document).await?;

    for issue in &response.issues {
        warn!("⚠️  {}", issue);
    }
    info!(
        "✅ Wrote {} ({}/{} signature fields placed)",
        output, response.fields_processed, response.fields_submitted
    );
    info!("   Original digest: {}", response.original_digest);
    info!("   Signed digest:   {}", response.result_digest);

    if let Some(record_path) = matches.get_one::<String>("record") {
        write_json(Some(record_path), &response.record).await?;
        info!("📋 Audit record written to {}", record_path);
    }

    Ok(0)
}

async fn run_verify(service: SigningService, matches: &ArgMatches) -> Result<i32> {
    let document = tokio::fs::read(required(matches, "input")?).await?;

    let response = if let Some(record_path) = matches.get_one::<String>("record") {
        let mut record: AuditRecord = read_structured(record_path).await?;
        if document.is_empty() {
            return Err(Error::input("document is missing"));
        }
        let response = record.verify(service.hasher(), &document);
        if response.matches {
            write_json(Some(record_path), &record).await?;
        }
        response
    } else {
        let request = VerificationRequest {
            reference_digest: required(matches, "digest")?.clone(),
            document,
        };
        service.verify(&request)?
    };

    write_json(None, &response).await?;

    if response.matches {
        info!("✅ Document is intact");
        Ok(0)
    } else {
        warn!("❌ Document does not match the reference digest");
        Ok(EXIT_MISMATCH)
    }
}

async fn run_prepare(service: SigningService, matches: &ArgMatches) -> Result<i32> {
    let request: PreparationRequest = read_structured(required(matches, "input")?).await?;
    let preparation = service.prepare(&request);

    for issue in &preparation.skipped {
        warn!("⚠️  Skipped {}", issue);
    }
    write_json(matches.get_one::<String>("output"), &preparation).await?;
    Ok(0)
}
