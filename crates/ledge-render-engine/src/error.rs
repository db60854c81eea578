use thiserror::Error;

/// Fatal failures that abort a render.
#[derive(Debug, Error)]
pub enum RenderError {
    /// The token stream ended while a blockquote was still open.
    #[error("blockquote opened at token {opened_at} is never closed")]
    UnterminatedBlockquote { opened_at: usize },

    /// The structural converter could not produce the shape a fenced block needs.
    #[error("failed to convert `{language}` block: {source}")]
    Converter {
        language: String,
        #[source]
        source: ConvertError,
    },
}

/// Failures raised while turning a fenced body into tables, lists and config.
#[derive(Debug, Error)]
pub enum ConvertError {
    #[error("invalid config line `{line}`: {source}")]
    InvalidConfig {
        line: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("config line `{line}` is not a JSON object")]
    ConfigNotObject { line: String },

    /// A shape that needs the items of a list found none.
    #[error("body contains no list")]
    MissingList,
}
