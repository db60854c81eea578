use crate::{
    convert::StructuralConverter,
    error::RenderError,
    lexing::{Lexer, LinkTable, Token},
};

use super::{
    builder::DocumentBuilder,
    cursor::TokenCursor,
    router::route_code,
    types::{Diagnostic, RenderBlock, RenderedDocument},
};

/// Walks the token stream once, emitting render blocks as it goes.
///
/// Top level and blockquote bodies share [`dispatch`](Self::dispatch); a
/// blockquote re-enters it for every token up to its end marker, so nested
/// quotes pair their markers through the recursion.
pub struct Dispatcher<'a, L: ?Sized, C: ?Sized> {
    lexer: &'a L,
    converter: &'a C,
    links: &'a LinkTable,
    cursor: TokenCursor<'a>,
    builder: DocumentBuilder,
}

impl<'a, L, C> Dispatcher<'a, L, C>
where
    L: Lexer + ?Sized,
    C: StructuralConverter + ?Sized,
{
    pub fn new(lexer: &'a L, converter: &'a C, tokens: &'a [Token], links: &'a LinkTable) -> Self {
        Self {
            lexer,
            converter,
            links,
            cursor: TokenCursor::new(tokens),
            builder: DocumentBuilder::new(),
        }
    }

    pub fn run(mut self) -> Result<RenderedDocument, RenderError> {
        while let Some((position, token)) = self.next() {
            self.dispatch(position, token)?;
        }
        Ok(self.builder.finish())
    }

    fn next(&mut self) -> Option<(usize, &'a Token)> {
        let position = self.cursor.position();
        self.cursor.advance().map(|token| (position, token))
    }

    /// Handles one token. Returns text the token contributes to an enclosing
    /// blockquote, if any.
    fn dispatch(&mut self, position: usize, token: &'a Token) -> Result<Option<String>, RenderError> {
        match token {
            Token::Table(table) => self.builder.push(RenderBlock::Table(table.clone())),
            Token::Space => {}
            Token::Heading { depth, text } => {
                let text = self.lexer.resolve_inline(text, self.links);
                self.builder.push(RenderBlock::Heading {
                    depth: *depth,
                    text,
                });
            }
            Token::Paragraph { text } => {
                let data = self.lexer.resolve_inline(text, self.links);
                self.builder.push(RenderBlock::Paragraph { data: data.clone() });
                return Ok(Some(data));
            }
            Token::Text { text } => return Ok(Some(text.clone())),
            Token::BlockquoteStart => self.blockquote(position)?,
            Token::Code { lang, text } => match route_code(lang.as_deref(), text, self.converter)? {
                Some(block) => self.builder.push(block),
                None => {
                    self.builder.warn(Diagnostic::UnrecognizedCodeLanguage {
                        lang: lang.clone(),
                        position,
                    });
                    self.builder.push(RenderBlock::Unknown {
                        token: token.clone(),
                    });
                }
            },
            other => {
                self.builder.warn(Diagnostic::UnrecognizedTokenKind {
                    token: other.kind(),
                    position,
                });
                self.builder.push(RenderBlock::Unknown {
                    token: other.clone(),
                });
            }
        }
        Ok(None)
    }

    fn blockquote(&mut self, opened_at: usize) -> Result<(), RenderError> {
        let mut body = String::new();
        loop {
            match self.next() {
                None => return Err(RenderError::UnterminatedBlockquote { opened_at }),
                Some((_, Token::BlockquoteEnd)) => break,
                Some((position, token)) => {
                    if let Some(text) = self.dispatch(position, token)? {
                        body.push_str(&text);
                    }
                }
            }
        }
        self.builder.push(RenderBlock::Blockquote { text: body });
        Ok(())
    }
}
