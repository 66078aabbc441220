//! RDL parser: token stream -> named-group parse tree.
//! No parameter interpretation happens here; parameter groups are kept
//! as raw token strings for the region builder.
use crate::ast::{mod_group_name, ParseNode, MODS, REGION_PARAMS};
use crate::error::RegionError;
use crate::lexer::{Spanned, Token};

/// Deepest mod block nesting the parser accepts. Well above what the region
/// builder follows; anything deeper is rejected before recursion can exhaust
/// the stack.
pub const MAX_NESTING: usize = 64;

struct Parser<'a> {
    tokens: &'a [Spanned],
    pos: usize,
    filename: String,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Spanned], filename: &str) -> Self {
        Parser {
            tokens,
            pos: 0,
            filename: filename.to_owned(),
        }
    }

    fn cur(&self) -> &Spanned {
        &self.tokens[self.pos.min(self.tokens.len() - 1)]
    }

    fn peek(&self) -> &Token {
        &self.cur().token
    }

    fn cur_line(&self) -> u32 {
        self.cur().line
    }

    fn advance(&mut self) {
        if self.pos < self.tokens.len() - 1 {
            self.pos += 1;
        }
    }

    fn err(&self, msg: impl Into<String>) -> RegionError {
        RegionError::syntax(&self.filename, self.cur_line(), msg)
    }

    fn skip_newlines(&mut self) {
        while self.peek() == &Token::Newline {
            self.advance();
        }
    }

    fn expect(&mut self, expected: Token, shown: &str) -> Result<(), RegionError> {
        if self.peek() == &expected {
            self.advance();
            Ok(())
        } else {
            Err(self.err(format!("expected '{}', got {:?}", shown, self.peek())))
        }
    }

    fn expect_word(&mut self, expected: &str) -> Result<u32, RegionError> {
        let line = self.cur_line();
        match self.peek() {
            Token::Word(w) if w == expected => {
                self.advance();
                Ok(line)
            }
            other => Err(self.err(format!("expected '{}', got {:?}", expected, other))),
        }
    }

    fn take_word(&mut self) -> Result<String, RegionError> {
        if let Token::Word(w) = self.peek().clone() {
            self.advance();
            Ok(w)
        } else {
            Err(self.err(format!("expected mod identifier, got {:?}", self.peek())))
        }
    }

    /// Collect parameter tokens up to (and consuming) `close`.
    fn param_tokens(&mut self, close: Token, shown: &str) -> Result<Vec<String>, RegionError> {
        let mut out = Vec::new();
        loop {
            if self.peek() == &close {
                self.advance();
                return Ok(out);
            }
            match self.peek().as_param_text() {
                Some(text) => {
                    out.push(text);
                    self.advance();
                }
                None => {
                    return Err(
                        self.err(format!("expected '{}', got {:?}", shown, self.peek()))
                    );
                }
            }
        }
    }

    fn parse_file(&mut self) -> Result<ParseNode, RegionError> {
        self.skip_newlines();
        let line = self.expect_word("region")?;
        let mut root = ParseNode::new("region", line);

        self.expect(Token::LBrace, "{")?;
        let params_line = self.cur_line();
        let params = self.param_tokens(Token::RBrace, "}")?;
        root.children
            .push(ParseNode::with_tokens(REGION_PARAMS, params_line, params));

        self.skip_newlines();
        let mods_line = self.expect_word("mods")?;
        let mut mods = ParseNode::new(MODS, mods_line);
        self.expect(Token::LBrace, "{")?;
        mods.children = self.parse_mod_list(0)?;
        root.children.push(mods);

        self.skip_newlines();
        if self.peek() != &Token::Eof {
            return Err(self.err(format!("unexpected {:?} after mods block", self.peek())));
        }
        Ok(root)
    }

    /// Parse mods until the closing `}` of the enclosing block.
    fn parse_mod_list(&mut self, depth: usize) -> Result<Vec<ParseNode>, RegionError> {
        if depth > MAX_NESTING {
            return Err(self.err(format!(
                "mods nested too deeply (more than {} levels)",
                MAX_NESTING
            )));
        }
        let mut mods = Vec::new();
        loop {
            self.skip_newlines();
            match self.peek() {
                Token::RBrace => {
                    self.advance();
                    return Ok(mods);
                }
                Token::Eof => return Err(self.err("unexpected end of file, expected '}'")),
                _ => mods.push(self.parse_mod(depth)?),
            }
        }
    }

    fn parse_mod(&mut self, depth: usize) -> Result<ParseNode, RegionError> {
        let prefix = mod_group_name(depth);
        let line = self.cur_line();
        let identifier = self.take_word()?;
        let mut node = ParseNode::new(prefix.as_str(), line);
        node.children.push(ParseNode::with_tokens(
            format!("{}_identifier", prefix),
            line,
            vec![identifier],
        ));

        if self.peek() == &Token::LParen {
            let l = self.cur_line();
            self.advance();
            let params = self.param_tokens(Token::RParen, ")")?;
            node.children
                .push(ParseNode::with_tokens(format!("{}_params", prefix), l, params));
        }

        if self.peek() == &Token::LBracket {
            let l = self.cur_line();
            self.advance();
            let params = self.param_tokens(Token::RBracket, "]")?;
            node.children.push(ParseNode::with_tokens(
                format!("{}_params_additional", prefix),
                l,
                params,
            ));
        }

        if self.peek() == &Token::LBrace {
            self.advance();
            node.children.extend(self.parse_mod_list(depth + 1)?);
        }

        Ok(node)
    }
}

/// Parse a lexed RDL file into its parse tree.
pub fn parse(tokens: &[Spanned], filename: &str) -> Result<ParseNode, RegionError> {
    if tokens.is_empty() {
        return Err(RegionError::syntax(filename, 1, "empty token stream"));
    }
    Parser::new(tokens, filename).parse_file()
}
