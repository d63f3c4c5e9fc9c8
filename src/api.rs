use crate::error::ConfError;
use crate::parser::{recognize_named, DEFAULT_SOURCE_NAME};
use crate::resolver::resolve;
use crate::serialization::Document;

/// Recognizes and resolves a configuration source in one step.
///
/// # Errors
///
/// Returns `ConfError::Syntax` if the text does not match the grammar, or
/// `ConfError::Resolution` if a constant reference cannot be resolved.
pub fn parse(source: &str) -> Result<Document, ConfError> {
    parse_named(source, DEFAULT_SOURCE_NAME)
}

/// Like [`parse`], with `file_name` shown in diagnostics.
///
/// # Errors
///
/// Returns `ConfError::Syntax` if the text does not match the grammar, or
/// `ConfError::Resolution` if a constant reference cannot be resolved.
pub fn parse_named(source: &str, file_name: &str) -> Result<Document, ConfError> {
    let program = recognize_named(source, file_name)?;
    Ok(resolve(program)?)
}

#[cfg(test)]
mod tests {
    use crate::parse;

    #[test]
    fn test_simple_parse_to_json() {
        let source = r"
        timeout is 1.5;
        struct {
            name = 'My App',
            config = struct {
                host = 'localhost',
                port = 8080,
                timeout = #(timeout)
            }
        }
    ";

        let expected_json = serde_json::json!({
            "name": "My App",
            "config": {
                "host": "localhost",
                "port": 8080,
                "timeout": 1.5,
            }
        });

        let document = parse(source).unwrap();
        let result = document.to_json().unwrap();
        let result_json: serde_json::Value = serde_json::from_str(&result).unwrap();

        assert_eq!(result_json, expected_json);
        assert!(result_json["config"]["port"].is_i64());
        assert!(result_json["config"]["timeout"].is_f64());
    }

    #[test]
    fn test_simple_parse_to_yaml() {
        let source = "struct { name = 'My App', version = 1.0, workers = 4 }";

        let expected_yaml = "name: My App\nversion: 1.0\nworkers: 4\n";

        let document = parse(source).unwrap();
        let result = document.to_yaml().unwrap();

        assert_eq!(result, expected_yaml);
    }

    #[test]
    fn test_nested_yaml_sorts_keys() {
        let source = "struct { server = struct { port = 8080, host = 'localhost' } }";

        let expected_yaml = "server:\n  host: localhost\n  port: 8080\n";

        assert_eq!(parse(source).unwrap().to_yaml().unwrap(), expected_yaml);
    }

    #[test]
    fn test_empty_document_serialization() {
        let document = parse("").unwrap();
        assert_eq!(document.to_json().unwrap(), "{}");
        assert_eq!(document.to_yaml().unwrap(), "{}\n");
    }
}
