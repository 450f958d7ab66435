//! Error types for XSLT engine operations

/// Result type for XSLT engine operations
pub type Result<T> = std::result::Result<T, Error>;

/// Unified error type for all XSLT engine operations
///
/// An `Err` only signals that a step failed. The human-readable details
/// have already been reported through the diagnostic hook by the engine.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// XML parsing failed
    #[error("XML parsing error: {0}")]
    XmlParse(String),

    /// XSLT compilation failed
    #[error("XSLT compilation error: {0}")]
    XsltCompile(String),

    /// XSLT transformation failed
    #[error("XSLT transformation error: {0}")]
    XsltTransform(String),

    /// Result serialization failed
    #[error("serialization error: {0}")]
    Serialize(String),

    /// The engine could not be reached at all
    #[error("Engine not available: {0}")]
    EngineUnavailable(String),

    /// Engine-wide settings were rejected
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a new XML parsing error
    pub fn xml_parse<S: Into<String>>(msg: S) -> Self {
        Error::XmlParse(msg.into())
    }

    /// Create a new XSLT compilation error
    pub fn xslt_compile<S: Into<String>>(msg: S) -> Self {
        Error::XsltCompile(msg.into())
    }

    /// Create a new XSLT transformation error
    pub fn xslt_transform<S: Into<String>>(msg: S) -> Self {
        Error::XsltTransform(msg.into())
    }

    /// Create a new serialization error
    pub fn serialize<S: Into<String>>(msg: S) -> Self {
        Error::Serialize(msg.into())
    }
}
