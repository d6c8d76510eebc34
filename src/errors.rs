use failure::Fail;

#[derive(Debug, Fail)]
pub enum ChatbotError {
    #[fail(display = "Invalid corpus: {}", _0)]
    InvalidCorpus(String),
    #[fail(display = "Intent '{}' is defined more than once", _0)]
    DuplicateIntent(String),
    #[fail(display = "Intent '{}' has no responses", _0)]
    MissingResponses(String),
    #[fail(display = "Unknown intent: '{}'", _0)]
    UnknownIntent(String),
    #[fail(
        display = "Expected {} features but found {}, the model file may be stale",
        expected, found
    )]
    DimensionMismatch { expected: usize, found: usize },
    #[fail(display = "Invalid configuration: {}", _0)]
    InvalidConfiguration(String),
    #[fail(display = "Cannot train classifier: {}", _0)]
    Training(String),
    #[fail(display = "Internal error: {}", _0)]
    InternalError(String),
}

pub type Result<T> = ::std::result::Result<T, ::failure::Error>;
