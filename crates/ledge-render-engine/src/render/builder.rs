use super::types::{Diagnostic, RenderBlock, RenderedDocument};

/// Accumulates render blocks in source order.
#[derive(Debug, Default)]
pub struct DocumentBuilder {
    blocks: Vec<RenderBlock>,
    diagnostics: Vec<Diagnostic>,
}

impl DocumentBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, block: RenderBlock) {
        self.blocks.push(block);
    }

    /// Records a non-fatal diagnostic and mirrors it to the log.
    pub fn warn(&mut self, diagnostic: Diagnostic) {
        match &diagnostic {
            Diagnostic::UnrecognizedTokenKind { .. } => log::warn!("{diagnostic}"),
            Diagnostic::UnrecognizedCodeLanguage { .. } => log::debug!("{diagnostic}"),
        }
        self.diagnostics.push(diagnostic);
    }

    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }

    pub fn finish(self) -> RenderedDocument {
        RenderedDocument {
            blocks: self.blocks,
            diagnostics: self.diagnostics,
        }
    }
}
