//! The render transformer: lexed tokens to the Ledge document model.
//!
//! ## Module Structure
//!
//! - **`cursor`**: [`TokenCursor`], forward iteration with lookahead
//! - **`dispatch`**: Per-token handling and blockquote recursion
//! - **`router`**: Fenced code routing by sub-language tag
//! - **`builder`**: [`DocumentBuilder`], the ordered output sink
//! - **`types`**: [`RenderBlock`] and the document model
//!
//! ## Flow
//!
//! ```text
//! markdown ──lex──► tokens ──cursor──► dispatch ─┬─► builder ──► RenderedDocument
//!                                                └─► router ──► converter
//! ```

pub mod builder;
pub mod cursor;
pub mod dispatch;
pub mod router;
pub mod types;

#[cfg(test)]
mod tests;

use crate::{
    convert::{LedgeConverter, StructuralConverter},
    error::RenderError,
    lexing::{Lexer, PulldownLexer},
};

pub use builder::DocumentBuilder;
pub use cursor::TokenCursor;
pub use dispatch::Dispatcher;
pub use router::{SubLanguage, ToolKind, route_code, select_by_type};
pub use types::{Diagnostic, RenderBlock, RenderedDocument, ToolsetData, ToolsetPayload};

/// Renders markdown into a [`RenderedDocument`].
///
/// Holds only its collaborators; every call builds a fresh cursor and output,
/// so one renderer can serve any number of independent calls.
#[derive(Debug, Default, Clone)]
pub struct Renderer<L = PulldownLexer, C = LedgeConverter> {
    lexer: L,
    converter: C,
}

impl Renderer {
    /// A renderer with the pulldown lexer and Ledge converter.
    pub fn new() -> Self {
        Self::default()
    }
}

impl<L, C> Renderer<L, C>
where
    L: Lexer,
    C: StructuralConverter,
{
    pub fn with_parts(lexer: L, converter: C) -> Self {
        Self { lexer, converter }
    }

    pub fn lexer(&self) -> &L {
        &self.lexer
    }

    pub fn render(&self, markdown: &str) -> Result<RenderedDocument, RenderError> {
        let lexed = self.lexer.lex(markdown);
        log::debug!("lexed {} tokens", lexed.tokens.len());
        Dispatcher::new(&self.lexer, &self.converter, &lexed.tokens, &lexed.links).run()
    }
}

/// Renders `markdown` with the default renderer.
pub fn render_markdown(markdown: &str) -> Result<RenderedDocument, RenderError> {
    Renderer::new().render(markdown)
}
