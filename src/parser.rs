use crate::ast::*;
use crate::error::{ParseError, ParseResult};
use crate::lexer::{Token, TokenKind};
use crate::stream::TokenStream;

/// Default bound on `if`/`foreach` nesting.
pub const DEFAULT_MAX_DEPTH: usize = 64;

/// Recursive-descent parser over a [`TokenStream`].
///
/// Directive bodies are parsed by recursing into [`Parser::parse_template_until`]
/// with the keywords that close them; the enclosing directive consumes the
/// closing `{{ keyword }}` itself.
pub struct Parser {
    stream: TokenStream,
    depth: usize,
    max_depth: usize,
}

impl Parser {
    pub fn new(stream: TokenStream) -> Self {
        Self::with_max_depth(stream, DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(stream: TokenStream, max_depth: usize) -> Self {
        Self {
            stream,
            depth: 0,
            max_depth,
        }
    }

    /// Parse the whole stream into a template.
    pub fn parse(&mut self) -> ParseResult<Template> {
        let template = self.parse_template_until(&[])?;
        // With no stop keywords the loop only ends at end of input.
        debug_assert!(self.stream.is_exhausted());
        Ok(template)
    }

    /// Parse text and blocks until end of input or until `{{` is followed by
    /// one of `stop_keywords`. The stopping `{{` is left unconsumed.
    pub fn parse_template_until(&mut self, stop_keywords: &[&str]) -> ParseResult<Template> {
        let mut nodes = Vec::new();
        loop {
            let Some(current) = self.stream.peek() else {
                break;
            };

            match current.kind {
                TokenKind::LBrace2 => {
                    let stops = matches!(
                        self.stream.peek_next(),
                        Some(next) if next.kind == TokenKind::Keyword
                            && stop_keywords.contains(&next.lexeme.as_str())
                    );
                    if stops {
                        break;
                    }
                    nodes.push(self.parse_expression_or_directive()?);
                }
                TokenKind::Text => {
                    if let Some(token) = self.stream.next() {
                        nodes.push(Node::Text(token.lexeme));
                    }
                }
                _ => {
                    return Err(ParseError::UnexpectedTemplateToken {
                        found: current.clone(),
                    })
                }
            }
        }
        Ok(Template::new(nodes))
    }

    fn parse_expression_or_directive(&mut self) -> ParseResult<Node> {
        self.expect(TokenKind::LBrace2)?;

        let (kind, lexeme) = match self.stream.peek() {
            Some(next) => (next.kind, next.lexeme.clone()),
            None => return Err(ParseError::unexpected("expression or directive", None)),
        };

        match kind {
            TokenKind::Keyword => match lexeme.as_str() {
                "if" => self.parse_if(),
                "foreach" => self.parse_foreach(),
                _ => Err(ParseError::UnknownDirective { keyword: lexeme }),
            },
            TokenKind::RBrace2 => Err(ParseError::EmptyPath),
            // `{{ unless x }}`: a word followed by another word is a directive
            // we don't know, not a malformed expression.
            TokenKind::Identifier
                if matches!(self.stream.peek_next(), Some(t) if t.kind == TokenKind::Identifier) =>
            {
                Err(ParseError::UnknownDirective { keyword: lexeme })
            }
            _ => Ok(Node::Expression(self.parse_expression()?)),
        }
    }

    /// `ident ("." ident)* "}}"`. Consumes the closing braces.
    fn parse_expression(&mut self) -> ParseResult<Expression> {
        let mut parts = vec![self.parse_identifier()?];
        while matches!(self.stream.peek(), Some(t) if t.kind == TokenKind::Dot) {
            self.stream.next();
            parts.push(self.parse_identifier()?);
        }
        self.expect(TokenKind::RBrace2)?;

        Ok(Expression {
            path: PropertyPath::new(parts)?,
        })
    }

    fn parse_if(&mut self) -> ParseResult<Node> {
        self.expect_keyword("if")?;
        self.enter()?;

        let condition = self.parse_expression()?;
        let then_branch = self.parse_template_until(&["else", "endif"])?;

        self.expect(TokenKind::LBrace2)?;
        let mut else_branch = None;
        if matches!(self.stream.peek(), Some(t) if t.is_keyword("else")) {
            self.expect_keyword("else")?;
            self.expect(TokenKind::RBrace2)?;
            else_branch = Some(self.parse_template_until(&["endif"])?);
            self.expect(TokenKind::LBrace2)?;
        }
        self.expect_keyword("endif")?;
        self.expect(TokenKind::RBrace2)?;

        self.leave();
        Ok(Node::If(IfNode {
            condition,
            then_branch,
            else_branch,
        }))
    }

    fn parse_foreach(&mut self) -> ParseResult<Node> {
        self.expect_keyword("foreach")?;
        self.enter()?;

        let loop_var = self.parse_identifier()?;
        self.expect(TokenKind::Colon)?;
        let collection = self.parse_expression()?;
        let body = self.parse_template_until(&["endforeach"])?;

        self.expect(TokenKind::LBrace2)?;
        self.expect_keyword("endforeach")?;
        self.expect(TokenKind::RBrace2)?;

        self.leave();
        Ok(Node::Foreach(ForeachNode {
            loop_var,
            collection,
            body,
        }))
    }

    fn parse_identifier(&mut self) -> ParseResult<String> {
        match self.stream.next() {
            Some(Token {
                kind: TokenKind::Identifier,
                lexeme,
            }) => Ok(lexeme),
            other => Err(ParseError::unexpected(TokenKind::Identifier.to_string(), other)),
        }
    }

    fn expect(&mut self, kind: TokenKind) -> ParseResult<()> {
        match self.stream.next() {
            Some(t) if t.kind == kind => Ok(()),
            other => Err(ParseError::unexpected(kind.to_string(), other)),
        }
    }

    fn expect_keyword(&mut self, word: &str) -> ParseResult<()> {
        match self.stream.next() {
            Some(t) if t.is_keyword(word) => Ok(()),
            other => Err(ParseError::unexpected(
                format!("{} `{}`", TokenKind::Keyword, word),
                other,
            )),
        }
    }

    fn enter(&mut self) -> ParseResult<()> {
        if self.depth >= self.max_depth {
            return Err(ParseError::NestingTooDeep {
                max_depth: self.max_depth,
            });
        }
        self.depth += 1;
        Ok(())
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}

/// Parse a whole token stream with the default nesting bound.
pub fn parse_template(stream: TokenStream) -> ParseResult<Template> {
    Parser::new(stream).parse()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::lexer::tokenize;

    fn parse(tokens: Vec<Token>) -> ParseResult<Template> {
        parse_template(TokenStream::new(tokens))
    }

    fn parse_src(src: &str) -> ParseResult<Template> {
        parse(tokenize(src))
    }

    fn expr(path: &[&str]) -> Expression {
        Expression {
            path: PropertyPath::new(path.iter().map(|s| s.to_string()).collect()).unwrap(),
        }
    }

    #[test]
    fn text_only() {
        let template = parse(vec![Token::text("hello")]).unwrap();
        assert_eq!(template.nodes, vec![Node::Text("hello".into())]);
    }

    #[test]
    fn empty_stream_is_empty_template() {
        assert_eq!(parse(vec![]).unwrap(), Template::default());
    }

    #[test]
    fn dotted_expression() {
        let template = parse(vec![
            Token::lbrace2(),
            Token::ident("a"),
            Token::dot(),
            Token::ident("b"),
            Token::dot(),
            Token::ident("c"),
            Token::rbrace2(),
        ])
        .unwrap();
        assert_eq!(template.nodes, vec![Node::Expression(expr(&["a", "b", "c"]))]);
    }

    #[test]
    fn if_with_else_from_tokens() {
        let template = parse(vec![
            Token::lbrace2(),
            Token::keyword("if"),
            Token::ident("cond"),
            Token::rbrace2(),
            Token::lbrace2(),
            Token::ident("user"),
            Token::dot(),
            Token::ident("name"),
            Token::rbrace2(),
            Token::lbrace2(),
            Token::keyword("else"),
            Token::rbrace2(),
            Token::lbrace2(),
            Token::ident("fallback"),
            Token::rbrace2(),
            Token::lbrace2(),
            Token::keyword("endif"),
            Token::rbrace2(),
        ])
        .unwrap();

        assert_eq!(
            template.nodes,
            vec![Node::If(IfNode {
                condition: expr(&["cond"]),
                then_branch: Template::new(vec![Node::Expression(expr(&["user", "name"]))]),
                else_branch: Some(Template::new(vec![Node::Expression(expr(&["fallback"]))])),
            })]
        );
    }

    #[test]
    fn if_without_else() {
        let template = parse_src("{{ if x }}yes{{ endif }}tail").unwrap();
        assert_eq!(
            template.nodes,
            vec![
                Node::If(IfNode {
                    condition: expr(&["x"]),
                    then_branch: Template::new(vec![Node::Text("yes".into())]),
                    else_branch: None,
                }),
                Node::Text("tail".into()),
            ]
        );
    }

    #[test]
    fn foreach_with_empty_body() {
        let template = parse_src("{{ foreach item : model.items }}{{ endforeach }}").unwrap();
        assert_eq!(
            template.nodes,
            vec![Node::Foreach(ForeachNode {
                loop_var: "item".into(),
                collection: expr(&["model", "items"]),
                body: Template::default(),
            })]
        );
    }

    #[test]
    fn nested_directives() {
        let src = "{{ foreach row : model.rows }}\
                   {{ foreach cell : row.cells }}{{ if cell }}{{ cell }}{{ endif }}{{ endforeach }}\
                   {{ endforeach }}";
        let template = parse_src(src).unwrap();

        let inner_if = Node::If(IfNode {
            condition: expr(&["cell"]),
            then_branch: Template::new(vec![Node::Expression(expr(&["cell"]))]),
            else_branch: None,
        });
        let inner = Node::Foreach(ForeachNode {
            loop_var: "cell".into(),
            collection: expr(&["row", "cells"]),
            body: Template::new(vec![inner_if]),
        });
        assert_eq!(
            template.nodes,
            vec![Node::Foreach(ForeachNode {
                loop_var: "row".into(),
                collection: expr(&["model", "rows"]),
                body: Template::new(vec![inner]),
            })]
        );
    }

    #[test]
    fn stop_keyword_is_left_unconsumed() {
        let mut parser = Parser::new(TokenStream::new(tokenize("a{{ endif }}")));
        let body = parser.parse_template_until(&["endif"]).unwrap();
        assert_eq!(body.nodes, vec![Node::Text("a".into())]);
        assert_eq!(parser.stream.peek(), Some(&Token::lbrace2()));
        assert_eq!(parser.stream.peek_next(), Some(&Token::keyword("endif")));
    }

    #[test]
    fn missing_closing_braces() {
        assert_eq!(
            parse_src("{{ model.name"),
            Err(ParseError::UnexpectedEof {
                expected: "RBRACE2".into()
            })
        );
        assert_eq!(
            parse_src("{{ if x }}a{{ endif"),
            Err(ParseError::UnexpectedEof {
                expected: "RBRACE2".into()
            })
        );
    }

    #[test]
    fn missing_endif() {
        assert_eq!(
            parse_src("{{ if x }}a"),
            Err(ParseError::UnexpectedEof {
                expected: "LBRACE2".into()
            })
        );
    }

    #[test]
    fn mismatched_closing_keyword() {
        let err = parse_src("{{ if x }}a{{ endforeach }}").unwrap_err();
        assert_eq!(err, ParseError::UnknownDirective { keyword: "endforeach".into() });
    }

    #[test]
    fn foreach_requires_colon() {
        assert_eq!(
            parse_src("{{ foreach item items }}{{ endforeach }}"),
            Err(ParseError::UnexpectedToken {
                expected: "COLON".into(),
                found: Token::ident("items"),
            })
        );
    }

    #[test]
    fn foreach_loop_var_is_not_a_path() {
        assert_eq!(
            parse_src("{{ foreach a.b : items }}{{ endforeach }}"),
            Err(ParseError::UnexpectedToken {
                expected: "COLON".into(),
                found: Token::dot(),
            })
        );
    }

    #[test]
    fn unknown_directives() {
        assert_eq!(
            parse_src("{{ unless x }}y"),
            Err(ParseError::UnknownDirective { keyword: "unless".into() })
        );
        assert_eq!(
            parse_src("{{ endif }}"),
            Err(ParseError::UnknownDirective { keyword: "endif".into() })
        );
    }

    #[test]
    fn empty_expression() {
        assert_eq!(parse_src("{{ }}"), Err(ParseError::EmptyPath));
    }

    #[test]
    fn dangling_dot() {
        assert_eq!(
            parse_src("{{ a. }}"),
            Err(ParseError::UnexpectedToken {
                expected: "IDENTIFIER".into(),
                found: Token::rbrace2(),
            })
        );
    }

    #[test]
    fn stray_closing_braces() {
        assert_eq!(
            parse_src("a}}"),
            Err(ParseError::UnexpectedTemplateToken {
                found: Token::rbrace2()
            })
        );
    }

    #[test]
    fn nesting_is_bounded() {
        let src = "{{ if a }}".repeat(3) + &"{{ endif }}".repeat(3);
        let mut parser = Parser::with_max_depth(TokenStream::new(tokenize(&src)), 2);
        assert_eq!(
            parser.parse(),
            Err(ParseError::NestingTooDeep { max_depth: 2 })
        );

        let mut parser = Parser::with_max_depth(TokenStream::new(tokenize(&src)), 3);
        assert!(parser.parse().is_ok());
    }
}
