use miette::{Diagnostic, NamedSource, SourceSpan};
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum ConfError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Resolution(#[from] ResolutionError),
}

/// The first point where the input stops matching the grammar.
#[derive(Error, Debug, Diagnostic, Clone)]
pub enum SyntaxError {
    #[error("unexpected {found} at line {line}, column {column}: expected {expected}")]
    #[diagnostic(
        code(syntax::unexpected_token),
        help("The parser found a token it did not expect in this position.")
    )]
    UnexpectedToken {
        #[source_code]
        src: NamedSource<String>,
        #[label("expected {expected}, but found this")]
        span: SourceSpan,
        found: String,
        expected: String,
        line: usize,
        column: usize,
    },

    #[error("unexpected end of input at line {line}, column {column}: expected {expected}")]
    #[diagnostic(
        code(syntax::unexpected_eof),
        help("The input ended before the construct was complete.")
    )]
    UnexpectedEof {
        #[source_code]
        src: NamedSource<String>,
        #[label("input ended here")]
        span: SourceSpan,
        expected: String,
        line: usize,
        column: usize,
    },

    #[error("unterminated string starting at line {line}, column {column}")]
    #[diagnostic(
        code(syntax::unterminated_string),
        help("Close the string with a single quote. Strings cannot contain `'`.")
    )]
    UnterminatedString {
        #[source_code]
        src: NamedSource<String>,
        #[label("string starts here")]
        span: SourceSpan,
        line: usize,
        column: usize,
    },

    #[error("unexpected character `{character}` at line {line}, column {column}")]
    #[diagnostic(
        code(syntax::unexpected_character),
        help("Names may only contain lowercase letters and underscores.")
    )]
    UnexpectedCharacter {
        #[source_code]
        src: NamedSource<String>,
        #[label("not valid here")]
        span: SourceSpan,
        character: char,
        line: usize,
        column: usize,
    },

    #[error("invalid number `{literal}` at line {line}, column {column}")]
    #[diagnostic(
        code(syntax::invalid_number),
        help("Integers must fit in a signed 64-bit value, and an exponent needs a decimal point (`1.0e5`).")
    )]
    InvalidNumber {
        #[source_code]
        src: NamedSource<String>,
        #[label("cannot be represented")]
        span: SourceSpan,
        literal: String,
        line: usize,
        column: usize,
    },

    #[error("structures nested deeper than {limit} levels at line {line}, column {column}")]
    #[diagnostic(
        code(syntax::nesting_too_deep),
        help("Flatten the structure or move inner parts into constants.")
    )]
    NestingTooDeep {
        #[source_code]
        src: NamedSource<String>,
        #[label("this structure is too deeply nested")]
        span: SourceSpan,
        limit: usize,
        line: usize,
        column: usize,
    },
}

impl SyntaxError {
    pub fn span(&self) -> SourceSpan {
        match self {
            SyntaxError::UnexpectedToken { span, .. }
            | SyntaxError::UnexpectedEof { span, .. }
            | SyntaxError::UnterminatedString { span, .. }
            | SyntaxError::UnexpectedCharacter { span, .. }
            | SyntaxError::InvalidNumber { span, .. }
            | SyntaxError::NestingTooDeep { span, .. } => *span,
        }
    }

    /// 1-based line and column of the offending input.
    pub fn line_and_column(&self) -> (usize, usize) {
        match self {
            SyntaxError::UnexpectedToken { line, column, .. }
            | SyntaxError::UnexpectedEof { line, column, .. }
            | SyntaxError::UnterminatedString { line, column, .. }
            | SyntaxError::UnexpectedCharacter { line, column, .. }
            | SyntaxError::InvalidNumber { line, column, .. }
            | SyntaxError::NestingTooDeep { line, column, .. } => (*line, *column),
        }
    }
}

#[derive(Error, Debug, Diagnostic, Clone)]
pub enum ResolutionError {
    #[error("undefined constant `{name}`")]
    #[diagnostic(code(resolver::undefined_constant))]
    UndefinedConstant {
        name: String,
        #[source_code]
        src: NamedSource<String>,
        #[label("no constant named `{name}` is declared before this point")]
        span: SourceSpan,
        #[help]
        help: Option<String>,
    },
}

impl ResolutionError {
    /// The identifier that could not be resolved.
    pub fn name(&self) -> &str {
        match self {
            ResolutionError::UndefinedConstant { name, .. } => name,
        }
    }

    pub fn span(&self) -> SourceSpan {
        match self {
            ResolutionError::UndefinedConstant { span, .. } => *span,
        }
    }
}
