use crate::ast::{Number, Program, SourceFile, Statement, StructLit, ValueExpr, ValueKind};
use crate::error::ResolutionError;
use crate::serialization::{Document, Mapping, Value};
use log::{debug, trace};
use std::collections::HashMap;

/// Constants declared so far in one resolution pass.
#[derive(Debug, Default)]
pub struct ConstantTable {
    constants: HashMap<String, Value>,
}

impl ConstantTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Binds `name`, returning the value it replaces if it was already declared.
    pub fn declare(&mut self, name: String, value: Value) -> Option<Value> {
        self.constants.insert(name, value)
    }

    pub fn lookup(&self, name: &str) -> Option<&Value> {
        self.constants.get(name)
    }

    pub fn len(&self) -> usize {
        self.constants.len()
    }

    pub fn is_empty(&self) -> bool {
        self.constants.is_empty()
    }
}

/// Folds a recognized program into a `Document`.
///
/// Statements are visited once, in document order. A `#(name)` only sees
/// constants declared before the statement containing it.
///
/// # Errors
/// Returns a `ResolutionError` at the first reference to a name that is not
/// yet declared.
pub fn resolve(program: Program) -> Result<Document, ResolutionError> {
    let Program { statements, source } = program;
    let resolver = Resolver {
        source: &source,
        declarations: declaration_sites(&statements),
    };
    let mut constants = ConstantTable::new();
    let mut root = Mapping::new();

    for (index, statement) in statements.into_iter().enumerate() {
        match statement {
            Statement::ConstDecl(decl) => {
                let value = resolver.resolve_value(decl.value, &constants, index)?;
                trace!("declaring constant `{}`", decl.name);
                if constants.declare(decl.name.clone(), value).is_some() {
                    debug!("constant `{}` redeclared, keeping the later value", decl.name);
                }
            }
            Statement::Struct(lit) => {
                for (key, value) in resolver.resolve_struct(lit, &constants, index)? {
                    if root.insert(key.clone(), value).is_some() {
                        debug!("top-level key `{key}` overwritten by a later structure");
                    }
                }
            }
        }
    }

    debug!(
        "resolved {} with {} constant(s) and {} top-level key(s)",
        source.name,
        constants.len(),
        root.len()
    );
    Ok(Document::new(root))
}

/// Read-only context for one pass. The mutable constant table is passed
/// alongside rather than stored here.
struct Resolver<'a> {
    source: &'a SourceFile,
    /// Statement index of every declaration of each name, used only to
    /// explain failed lookups.
    declarations: HashMap<String, Vec<usize>>,
}

impl Resolver<'_> {
    fn resolve_value(
        &self,
        expr: ValueExpr,
        constants: &ConstantTable,
        statement: usize,
    ) -> Result<Value, ResolutionError> {
        let span = expr.get_source_span();
        match expr.kind {
            ValueKind::Number(Number::Integer(n)) => Ok(Value::Integer(n)),
            ValueKind::Number(Number::Float(n)) => Ok(Value::Float(n)),
            ValueKind::String(s) => Ok(Value::String(s)),
            ValueKind::Struct(lit) => self
                .resolve_struct(lit, constants, statement)
                .map(Value::Map),
            ValueKind::ConstRef(name) => match constants.lookup(&name) {
                Some(value) => Ok(value.clone()),
                None => Err(ResolutionError::UndefinedConstant {
                    help: self.explain_undefined(&name, statement),
                    name,
                    src: self.source.named_source(),
                    span,
                }),
            },
        }
    }

    /// Duplicate field names resolve left to right, the last one winning.
    fn resolve_struct(
        &self,
        lit: StructLit,
        constants: &ConstantTable,
        statement: usize,
    ) -> Result<Mapping, ResolutionError> {
        let mut map = Mapping::new();
        for field in lit.fields {
            let value = self.resolve_value(field.value, constants, statement)?;
            if map.insert(field.name.clone(), value).is_some() {
                debug!("field `{}` repeated in one structure, keeping the later value", field.name);
            }
        }
        Ok(map)
    }

    fn explain_undefined(&self, name: &str, statement: usize) -> Option<String> {
        let sites = self.declarations.get(name)?;
        if sites.contains(&statement) {
            Some(format!(
                "`{name}` is being declared by this statement; a constant cannot refer to itself"
            ))
        } else if sites.iter().any(|&site| site > statement) {
            Some(format!(
                "`{name}` is declared later in the file; constants must be declared before they are used"
            ))
        } else {
            None
        }
    }
}

fn declaration_sites(statements: &[Statement]) -> HashMap<String, Vec<usize>> {
    let mut sites: HashMap<String, Vec<usize>> = HashMap::new();
    for (index, statement) in statements.iter().enumerate() {
        if let Statement::ConstDecl(decl) = statement {
            sites.entry(decl.name.clone()).or_default().push(index);
        }
    }
    sites
}
