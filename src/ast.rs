use miette::{NamedSource, SourceSpan};

/// A recognized program: the top-level statements in document order, plus the
/// source they came from so later passes can point back into it.
#[derive(Debug, PartialEq, Clone)]
pub struct Program {
    pub statements: Vec<Statement>,
    pub source: SourceFile,
}

#[derive(Debug, PartialEq, Clone)]
pub struct SourceFile {
    pub name: String,
    pub text: String,
}

impl SourceFile {
    pub fn new(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            text: text.into(),
        }
    }

    pub fn named_source(&self) -> NamedSource<String> {
        NamedSource::new(&self.name, self.text.clone())
    }
}

#[derive(Debug, PartialEq, Clone)]
pub enum Statement {
    ConstDecl(ConstDecl),
    Struct(StructLit),
}

/// `name is value;`
#[derive(Debug, PartialEq, Clone)]
pub struct ConstDecl {
    pub name: String,
    pub value: ValueExpr,
    pub pos_start: usize,
    pub pos_end: usize,
}

/// `struct { name = value, ... }`
#[derive(Debug, PartialEq, Clone)]
pub struct StructLit {
    pub fields: Vec<Field>,
    pub pos_start: usize,
    pub pos_end: usize,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Field {
    pub name: String,
    pub value: ValueExpr,
}

#[derive(Debug, PartialEq, Clone)]
pub struct ValueExpr {
    pub kind: ValueKind,
    pub pos_start: usize,
    pub pos_end: usize,
}

#[derive(Debug, PartialEq, Clone)]
pub enum ValueKind {
    Number(Number),
    String(String),
    Struct(StructLit),
    /// `#(name)`, looked up only during resolution.
    ConstRef(String),
}

#[derive(Debug, PartialEq, Clone, Copy)]
pub enum Number {
    Integer(i64),
    Float(f64),
}

impl ValueExpr {
    pub fn get_source_span(&self) -> SourceSpan {
        (self.pos_start, self.pos_end - self.pos_start).into()
    }
}
