//! Error types for the groove-engine binary.

/// Errors that can stop the engine before or during the run loop.
#[derive(Debug, thiserror::Error)]
pub enum EngineError {
    /// Configuration could not be loaded.
    #[error("config error: {source}")]
    Config {
        /// The underlying configuration error.
        #[from]
        source: groove_core::ConfigError,
    },
}
