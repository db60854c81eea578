pub mod convert;
pub mod error;
pub mod lexing;
pub mod render;

// Re-export key types for easier usage
pub use convert::{Config, ConverterResult, LedgeConverter, ListNode, StructuralConverter};
pub use error::{ConvertError, RenderError};
pub use lexing::{LexedDocument, Lexer, LexerOptions, LinkTable, PulldownLexer, Table, Token};
pub use render::{Diagnostic, RenderBlock, RenderedDocument, Renderer, render_markdown};
