//! File and stream plumbing around [`parse`](crate::parse): read a source,
//! render the resulting document, write it out.

use crate::api::parse_named;
use crate::error::ConfError;
use crate::serialization::Document;
use log::debug;
use miette::Diagnostic;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Name shown in diagnostics for text read from standard input.
pub const STDIN_NAME: &str = "<stdin>";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Yaml,
    Json,
}

impl OutputFormat {
    /// `.json` selects JSON; any other extension, or none, selects YAML.
    pub fn from_path(path: &Path) -> Self {
        match path.extension().and_then(|ext| ext.to_str()) {
            Some(ext) if ext.eq_ignore_ascii_case("json") => OutputFormat::Json,
            _ => OutputFormat::Yaml,
        }
    }
}

#[derive(Error, Debug, Diagnostic)]
pub enum ConvertError {
    #[error("failed to read {}", path.display())]
    #[diagnostic(code(convert::read))]
    Read {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to read standard input")]
    #[diagnostic(code(convert::stdin))]
    Stdin(#[source] io::Error),

    #[error("failed to write {}", path.display())]
    #[diagnostic(code(convert::write))]
    Write {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("failed to render YAML")]
    #[diagnostic(code(convert::yaml))]
    Yaml(#[from] serde_yaml::Error),

    #[error("failed to render JSON")]
    #[diagnostic(code(convert::json))]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Conf(#[from] ConfError),
}

/// Reads the source text from `input`, or from standard input when `None`.
/// Returns the text together with the name to use in diagnostics.
///
/// # Errors
/// Returns `ConvertError::Read` or `ConvertError::Stdin` on I/O failure.
pub fn read_source(input: Option<&Path>) -> Result<(String, String), ConvertError> {
    match input {
        Some(path) => {
            let text = fs::read_to_string(path).map_err(|source| ConvertError::Read {
                path: path.to_path_buf(),
                source,
            })?;
            Ok((text, path.display().to_string()))
        }
        None => {
            let text = io::read_to_string(io::stdin()).map_err(ConvertError::Stdin)?;
            Ok((text, STDIN_NAME.to_string()))
        }
    }
}

/// Renders `document` in `format`. YAML output keeps non-ASCII text as is.
///
/// # Errors
/// Returns the serializer's error wrapped in `ConvertError`.
pub fn render(document: &Document, format: OutputFormat) -> Result<String, ConvertError> {
    match format {
        OutputFormat::Yaml => Ok(document.to_yaml()?),
        OutputFormat::Json => {
            let mut json = document.to_json()?;
            json.push('\n');
            Ok(json)
        }
    }
}

/// Parses `text` and writes the rendered document to `output`. Nothing is
/// written if parsing fails.
///
/// # Errors
/// Returns `ConvertError::Conf` for syntax or resolution failures and
/// `ConvertError::Write` if the output cannot be written.
pub fn convert_str(
    text: &str,
    source_name: &str,
    output: &Path,
    format: OutputFormat,
) -> Result<Document, ConvertError> {
    let document = parse_named(text, source_name)?;
    let rendered = render(&document, format)?;
    fs::write(output, rendered).map_err(|source| ConvertError::Write {
        path: output.to_path_buf(),
        source,
    })?;
    debug!(
        "wrote {} top-level key(s) from {source_name} to {}",
        document.len(),
        output.display()
    );
    Ok(document)
}

/// Reads `input` (or standard input), converts it and writes `output`.
///
/// # Errors
/// See [`read_source`] and [`convert_str`].
pub fn convert(
    input: Option<&Path>,
    output: &Path,
    format: OutputFormat,
) -> Result<Document, ConvertError> {
    let (text, source_name) = read_source(input)?;
    convert_str(&text, &source_name, output, format)
}
