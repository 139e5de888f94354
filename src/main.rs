use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error;

use headers_editor::editor::HeadersEditor;
use headers_editor::model::HeaderRecord;
use headers_editor::EditorConfig;

#[derive(Debug, Error)]
enum CliError {
    #[error("failed to read {0}: {1}")]
    Io(String, std::io::Error),
    #[error("invalid AMF document {0}: {1}")]
    Json(String, serde_json::Error),
    #[error("no headers at {0} in the AMF document")]
    MissingPointer(String),
}

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Format {
    Text,
    Json,
}

#[derive(Parser, Debug)]
#[command(author, version, about = "Reconcile HTTP headers text with an AMF headers model", long_about = None)]
struct Args {
    /// Headers text file, `-` for stdin
    #[arg(default_value = "-")]
    headers: String,

    /// Editor config (TOML)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// AMF JSON-LD document
    #[arg(short, long)]
    amf: Option<PathBuf>,

    /// JSON pointer to the header nodes inside the AMF document
    #[arg(short, long)]
    pointer: Option<String>,

    /// Override the Content-Type header
    #[arg(long)]
    content_type: Option<String>,

    /// Report validation errors
    #[arg(long)]
    validate: bool,

    /// Switch to the source view before printing
    #[arg(short, long)]
    source: bool,

    #[arg(short, long, value_enum, default_value = "text")]
    format: Format,
}

#[derive(Serialize)]
struct Output<'a> {
    value: &'a str,
    content_type: Option<&'a str>,
    invalid: bool,
    model: &'a [HeaderRecord],
}

fn read_input(path: &str) -> Result<String, CliError> {
    if path == "-" {
        let mut buf = String::new();
        std::io::stdin()
            .read_to_string(&mut buf)
            .map_err(|e| CliError::Io("stdin".to_string(), e))?;
        return Ok(buf);
    }
    std::fs::read_to_string(path).map_err(|e| CliError::Io(path.to_string(), e))
}

fn load_amf(editor: &mut HeadersEditor, path: &PathBuf, pointer: Option<&str>) -> Result<(), CliError> {
    let name = path.display().to_string();
    let content = std::fs::read_to_string(path).map_err(|e| CliError::Io(name.clone(), e))?;
    let amf: Value = serde_json::from_str(&content).map_err(|e| CliError::Json(name, e))?;

    let headers = match pointer {
        Some(p) => amf
            .pointer(p)
            .cloned()
            .ok_or_else(|| CliError::MissingPointer(p.to_string()))?,
        None => amf.clone(),
    };

    editor.set_amf(Some(&amf));
    editor.set_amf_headers(Some(headers));
    log::info!("loaded {} header(s) from {}", editor.view_model().len(), path.display());
    Ok(())
}

fn run(args: Args) -> Result<(), CliError> {
    let config = match &args.config {
        Some(path) => EditorConfig::from_file(path),
        None => EditorConfig::default(),
    };
    let mut editor = HeadersEditor::new(config);

    editor.add_listener(|n| log::debug!("{:?}", n.event));

    if let Some(path) = &args.amf {
        load_amf(&mut editor, path, args.pointer.as_deref())?;
    }

    let text = read_input(&args.headers)?;
    editor.set_value(text);

    if let Some(ct) = args.content_type {
        editor.set_content_type(Some(ct));
    }

    if args.source {
        async_std::task::block_on(editor.set_source_mode(true));
    }

    if args.validate && !editor.validate() {
        for (name, err) in editor.validation_report() {
            log::warn!("{name}: {err}");
        }
    }

    let value = match editor.source_view() {
        Some(view) => view.value().to_string(),
        None => editor.model_to_value(None),
    };

    match args.format {
        Format::Text => println!("{value}"),
        Format::Json => {
            let output = Output {
                value: &value,
                content_type: editor.content_type(),
                invalid: editor.invalid(),
                model: editor.view_model(),
            };
            match serde_json::to_string_pretty(&output) {
                Ok(json) => println!("{json}"),
                Err(err) => log::error!("failed to serialize output: {err}"),
            }
        }
    }

    Ok(())
}

fn main() {
    env_logger::init();

    if let Err(err) = run(Args::parse()) {
        log::error!("{err}");
        std::process::exit(1);
    }
}
