pub mod api;
pub mod ast;
pub mod convert;
pub mod error;
pub mod lexer;
pub mod parser;
pub mod resolver;
pub mod serialization;
pub mod utils;

pub use api::{parse, parse_named};
pub use error::{ConfError, ResolutionError, SyntaxError};
pub use parser::{recognize, recognize_named};
pub use resolver::resolve;
pub use serialization::{Document, Mapping, Value};
