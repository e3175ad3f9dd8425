//! Submit document images to AWS Textract for form analysis and render the
//! detected blocks as a colored overlay for debugging.

pub mod analysis;
pub mod config;
pub mod render;

#[cfg(test)]
mod test_support;

pub use analysis::{AnalyzeError, DocumentAnalyzer, DocumentSource, TextractAnalyzer};
pub use config::{AnalyzerConfig, ConfigError, LogLevel};
pub use render::{generate_debug_image, RenderError};

use tracing_subscriber::EnvFilter;

/// Installs the global `tracing` subscriber. `RUST_LOG` wins over `level`.
pub fn init_logging(level: LogLevel) {
    // An embedding application may already own the global subscriber; keep theirs.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level.as_filter())),
        )
        .with_writer(std::io::stderr)
        .try_init();
}
