use crate::ast::*;
use crate::error::SyntaxError;
use crate::lexer::{Lexer, Token, TokenType};
use crate::utils::get_line_and_column;
use log::trace;

/// Name used in diagnostics when the caller does not supply one.
pub const DEFAULT_SOURCE_NAME: &str = "<input>";

/// Deepest `struct` nesting accepted. Recognition and resolution both recurse
/// once per level, so this bounds their stack use.
pub const MAX_NESTING_DEPTH: usize = 64;

/// Recognizes `source_text` as a program.
///
/// # Errors
/// Returns a `SyntaxError` at the first token that does not fit the grammar.
pub fn recognize(source_text: &str) -> Result<Program, SyntaxError> {
    recognize_named(source_text, DEFAULT_SOURCE_NAME)
}

/// Like [`recognize`], with `file_name` attached to any diagnostic.
///
/// # Errors
/// Returns a `SyntaxError` at the first token that does not fit the grammar.
pub fn recognize_named(source_text: &str, file_name: &str) -> Result<Program, SyntaxError> {
    Parser::new_with_name(source_text, file_name.to_string()).parse_program()
}

/// A recursive descent parser, one method per grammar rule.
#[derive(Debug)]
pub struct Parser<'a> {
    source_name: String,
    tokens: Vec<Token>,
    position: usize,
    depth: usize,
    source_text: &'a str,
}

impl<'a> Parser<'a> {
    pub fn new(source_text: &'a str) -> Self {
        Self::new_with_name(source_text, DEFAULT_SOURCE_NAME.to_string())
    }

    pub fn new_with_name(source_text: &'a str, name: String) -> Self {
        let tokens: Vec<Token> = Lexer::new(source_text)
            .lex()
            .into_iter()
            .filter(|t| t.ttype != TokenType::Whitespace)
            .collect();

        Self {
            source_name: name,
            tokens,
            position: 0,
            depth: 0,
            source_text,
        }
    }

    // === Grammar Rules ===

    /// program := (const_decl | struct_lit)*
    pub fn parse_program(&mut self) -> Result<Program, SyntaxError> {
        let mut statements = Vec::new();

        loop {
            let statement = match self.current_token().ttype {
                TokenType::Eof => break,
                TokenType::Identifier(_) => Statement::ConstDecl(self.parse_const_decl()?),
                TokenType::Struct => Statement::Struct(self.parse_struct()?),
                _ => return self.err_unexpected("a constant declaration or `struct`"),
            };
            statements.push(statement);
        }

        trace!(
            "recognized {} top-level statement(s) in {}",
            statements.len(),
            self.source_name
        );

        Ok(Program {
            statements,
            source: SourceFile::new(&self.source_name, self.source_text),
        })
    }

    /// const_decl := IDENT "is" value ";"
    fn parse_const_decl(&mut self) -> Result<ConstDecl, SyntaxError> {
        let pos_start = self.current_token().pos_start;
        let name = self.parse_identifier("a constant name")?;
        self.expect(TokenType::Is)?;
        let value = self.parse_value()?;
        let pos_end = self.current_token().pos_end;
        self.expect(TokenType::Semicolon)?;

        Ok(ConstDecl {
            name,
            value,
            pos_start,
            pos_end,
        })
    }

    /// struct_lit := "struct" "{" pair_list? "}"
    /// pair_list := pair ("," pair)*
    fn parse_struct(&mut self) -> Result<StructLit, SyntaxError> {
        let pos_start = self.current_token().pos_start;
        if self.depth >= MAX_NESTING_DEPTH {
            return self.err_too_deep();
        }
        self.depth += 1;
        self.expect(TokenType::Struct)?;
        self.expect(TokenType::LBrace)?;

        let mut fields = Vec::new();
        if !self.check(&TokenType::RBrace) {
            fields.push(self.parse_field()?);
            while self.match_token(&TokenType::Comma) {
                fields.push(self.parse_field()?);
            }
        }

        let pos_end = self.current_token().pos_end;
        self.expect(TokenType::RBrace)?;
        self.depth -= 1;

        Ok(StructLit {
            fields,
            pos_start,
            pos_end,
        })
    }

    /// pair := IDENT "=" value
    fn parse_field(&mut self) -> Result<Field, SyntaxError> {
        let name = self.parse_identifier("a field name")?;
        self.expect(TokenType::Equals)?;
        let value = self.parse_value()?;
        Ok(Field { name, value })
    }

    /// value := NUMBER | STRING | struct_lit | const_ref
    fn parse_value(&mut self) -> Result<ValueExpr, SyntaxError> {
        let start_token = self.current_token().clone();

        let kind = match start_token.ttype {
            TokenType::Number(literal) => {
                self.advance();
                ValueKind::Number(self.parse_number(
                    &literal,
                    start_token.pos_start,
                    start_token.pos_end,
                )?)
            }
            TokenType::String(s) => {
                self.advance();
                ValueKind::String(s)
            }
            TokenType::Struct => ValueKind::Struct(self.parse_struct()?),
            TokenType::HashParen => return self.parse_const_ref(),
            _ => return self.err_unexpected("a value"),
        };

        Ok(ValueExpr {
            kind,
            pos_start: start_token.pos_start,
            pos_end: self.previous_token().pos_end,
        })
    }

    /// const_ref := "#(" IDENT ")"
    fn parse_const_ref(&mut self) -> Result<ValueExpr, SyntaxError> {
        let pos_start = self.current_token().pos_start;
        self.expect(TokenType::HashParen)?;
        let name = self.parse_identifier("a constant name")?;
        let pos_end = self.current_token().pos_end;
        self.expect(TokenType::RParen)?;

        Ok(ValueExpr {
            kind: ValueKind::ConstRef(name),
            pos_start,
            pos_end,
        })
    }

    // === Terminals ===

    fn parse_identifier(&mut self, expected: &str) -> Result<String, SyntaxError> {
        if let TokenType::Identifier(name) = &self.current_token().ttype {
            let name = name.clone();
            self.advance();
            Ok(name)
        } else {
            self.err_unexpected(expected)
        }
    }

    /// A literal with a decimal point is a float, anything else an integer.
    fn parse_number(
        &self,
        literal: &str,
        pos_start: usize,
        pos_end: usize,
    ) -> Result<Number, SyntaxError> {
        let number = if literal.contains('.') {
            literal.parse::<f64>().ok().map(Number::Float)
        } else {
            literal.parse::<i64>().ok().map(Number::Integer)
        };

        number.ok_or_else(|| {
            let (line, column) = get_line_and_column(self.source_text, pos_start);
            SyntaxError::InvalidNumber {
                src: self.named_source(),
                span: (pos_start, pos_end - pos_start).into(),
                literal: literal.to_string(),
                line,
                column,
            }
        })
    }

    // === Token Helper Methods ===

    /// The lexer always terminates the stream with `Eof`, so this never runs off the end.
    fn current_token(&self) -> &Token {
        let index = self.position.min(self.tokens.len() - 1);
        &self.tokens[index]
    }

    fn previous_token(&self) -> &Token {
        &self.tokens[self.position.saturating_sub(1)]
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() - 1 {
            self.position += 1;
        }
    }

    fn expect(&mut self, expected: TokenType) -> Result<(), SyntaxError> {
        if self.check(&expected) {
            self.advance();
            Ok(())
        } else {
            self.err_unexpected(&expected.to_string())
        }
    }

    fn match_token(&mut self, ttype: &TokenType) -> bool {
        if self.check(ttype) {
            self.advance();
            true
        } else {
            false
        }
    }

    fn check(&self, ttype: &TokenType) -> bool {
        std::mem::discriminant(&self.current_token().ttype) == std::mem::discriminant(ttype)
    }

    fn named_source(&self) -> miette::NamedSource<String> {
        miette::NamedSource::new(&self.source_name, self.source_text.to_string())
    }

    fn err_too_deep<T>(&self) -> Result<T, SyntaxError> {
        let token = self.current_token();
        let (line, column) = get_line_and_column(self.source_text, token.pos_start);
        Err(SyntaxError::NestingTooDeep {
            src: self.named_source(),
            span: (token.pos_start, token.pos_end - token.pos_start).into(),
            limit: MAX_NESTING_DEPTH,
            line,
            column,
        })
    }

    fn err_unexpected<T>(&self, expected: &str) -> Result<T, SyntaxError> {
        let token = self.current_token();
        let src = self.named_source();
        let span = (token.pos_start, token.pos_end - token.pos_start).into();
        let (line, column) = get_line_and_column(self.source_text, token.pos_start);

        Err(match &token.ttype {
            TokenType::Eof => SyntaxError::UnexpectedEof {
                src,
                span,
                expected: expected.to_string(),
                line,
                column,
            },
            TokenType::UnterminatedString => SyntaxError::UnterminatedString {
                src,
                span,
                line,
                column,
            },
            TokenType::Unknown(character) => SyntaxError::UnexpectedCharacter {
                src,
                span,
                character: *character,
                line,
                column,
            },
            found => SyntaxError::UnexpectedToken {
                src,
                span,
                found: found.to_string(),
                expected: expected.to_string(),
                line,
                column,
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use miette::Report;

    fn parse_ok(source: &str) -> Program {
        match recognize_named(source, "test.conf") {
            Ok(program) => program,
            Err(err) => panic!("{:?}", Report::new(err)),
        }
    }

    fn parse_err(source: &str) -> SyntaxError {
        match recognize_named(source, "test.conf") {
            Ok(program) => panic!("expected a syntax error, got {program:#?}"),
            Err(err) => err,
        }
    }

    fn only_struct(program: &Program) -> &StructLit {
        assert_eq!(program.statements.len(), 1);
        match &program.statements[0] {
            Statement::Struct(s) => s,
            other => panic!("expected a struct, got {other:?}"),
        }
    }

    #[test]
    fn test_empty_input() {
        let program = parse_ok("");
        assert!(program.statements.is_empty());
        assert_eq!(program.source.name, "test.conf");
    }

    #[test]
    fn test_whitespace_only_input() {
        assert!(parse_ok(" \n\t\n ").statements.is_empty());
    }

    #[test]
    fn test_empty_struct() {
        let program = parse_ok("struct {}");
        assert!(only_struct(&program).fields.is_empty());
    }

    #[test]
    fn test_simple_pair() {
        let program = parse_ok("struct { port = 8080 }");
        let s = only_struct(&program);
        assert_eq!(s.fields.len(), 1);
        assert_eq!(s.fields[0].name, "port");
        assert_eq!(s.fields[0].value.kind, ValueKind::Number(Number::Integer(8080)));
    }

    #[test]
    fn test_number_kinds() {
        let program = parse_ok("struct { a = 1.5, b = -3, c = 5., d = .25, e = +7 }");
        let kinds: Vec<&ValueKind> = only_struct(&program)
            .fields
            .iter()
            .map(|f| &f.value.kind)
            .collect();
        assert_eq!(
            kinds,
            vec![
                &ValueKind::Number(Number::Float(1.5)),
                &ValueKind::Number(Number::Integer(-3)),
                &ValueKind::Number(Number::Float(5.0)),
                &ValueKind::Number(Number::Float(0.25)),
                &ValueKind::Number(Number::Integer(7)),
            ]
        );
    }

    #[test]
    fn test_const_decl_and_ref() {
        let program = parse_ok("port is 8080; struct { server = #(port) }");
        assert_eq!(program.statements.len(), 2);
        match &program.statements[0] {
            Statement::ConstDecl(decl) => {
                assert_eq!(decl.name, "port");
                assert_eq!(decl.value.kind, ValueKind::Number(Number::Integer(8080)));
            }
            other => panic!("expected a declaration, got {other:?}"),
        }
        match &program.statements[1] {
            Statement::Struct(s) => {
                assert_eq!(s.fields[0].value.kind, ValueKind::ConstRef("port".to_string()));
            }
            other => panic!("expected a struct, got {other:?}"),
        }
    }

    #[test]
    fn test_undeclared_ref_is_still_recognized() {
        let program = parse_ok("struct { x = #(missing) }");
        let s = only_struct(&program);
        assert_eq!(s.fields[0].value.kind, ValueKind::ConstRef("missing".to_string()));
    }

    #[test]
    fn test_nested_struct() {
        let program = parse_ok("struct { server = struct { port = 8080 } }");
        let s = only_struct(&program);
        match &s.fields[0].value.kind {
            ValueKind::Struct(inner) => {
                assert_eq!(inner.fields[0].name, "port");
            }
            other => panic!("expected a nested struct, got {other:?}"),
        }
    }

    #[test]
    fn test_struct_valued_constant() {
        let program = parse_ok("defaults is struct { retries = 3 };");
        match &program.statements[0] {
            Statement::ConstDecl(decl) => {
                assert!(matches!(decl.value.kind, ValueKind::Struct(_)));
            }
            other => panic!("expected a declaration, got {other:?}"),
        }
    }

    #[test]
    fn test_value_spans() {
        let source = "struct { name = 'test', ref = #(name) }";
        let program = parse_ok(source);
        let s = only_struct(&program);
        let name = &s.fields[0].value;
        assert_eq!(&source[name.pos_start..name.pos_end], "'test'");
        let reference = &s.fields[1].value;
        assert_eq!(&source[reference.pos_start..reference.pos_end], "#(name)");
        assert_eq!(&source[s.pos_start..s.pos_end], source);
    }

    #[test]
    fn test_missing_semicolon() {
        let err = parse_err("port is 8080 struct {}");
        match err {
            SyntaxError::UnexpectedToken {
                found, expected, ..
            } => {
                assert_eq!(found, "`struct`");
                assert_eq!(expected, "`;`");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_missing_closing_brace() {
        let err = parse_err("struct { port = 8080");
        assert!(matches!(err, SyntaxError::UnexpectedEof { .. }));
    }

    #[test]
    fn test_trailing_comma_is_rejected() {
        let err = parse_err("struct { a = 1, }");
        assert!(matches!(err, SyntaxError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_unterminated_string() {
        let err = parse_err("struct { name = 'oops }");
        assert!(matches!(err, SyntaxError::UnterminatedString { .. }));
        assert_eq!(err.line_and_column(), (1, 17));
    }

    #[test]
    fn test_stray_character() {
        let err = parse_err("struct { Port = 1 }");
        match err {
            SyntaxError::UnexpectedCharacter { character, .. } => assert_eq!(character, 'P'),
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_integer_overflow() {
        let err = parse_err("struct { big = 99999999999999999999 }");
        match err {
            SyntaxError::InvalidNumber { literal, .. } => {
                assert_eq!(literal, "99999999999999999999");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_keyword_as_field_name() {
        let err = parse_err("struct { struct = 1 }");
        assert!(matches!(err, SyntaxError::UnexpectedToken { .. }));
    }

    #[test]
    fn test_error_position_on_later_line() {
        let err = parse_err("a is 1;\nb is 2\nstruct {}");
        assert_eq!(err.line_and_column(), (3, 1));
    }
}
