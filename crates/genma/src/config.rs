//! Genma Configuration

/// Document and selection options
#[derive(Debug, Clone)]
pub struct Config {
    /// Document URL
    pub url: String,

    /// Log a warning when a selection matches nothing
    pub warn_on_empty_selection: bool,

    /// Keep whitespace-only text nodes when parsing markup
    pub keep_whitespace_text: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            url: "about:blank".to_string(),
            warn_on_empty_selection: true,
            keep_whitespace_text: false,
        }
    }
}
