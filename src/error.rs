// Per-field read errors. The aggregator turns every one of these into a zero contribution.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StatError {
    #[error("missing field {key}")]
    MissingField { key: &'static str },

    #[error("field {key} is not a valid number: {value:?}")]
    MalformedNumber { key: &'static str, value: String },

    #[error("field {key} is not finite: {value:?}")]
    NonFiniteNumber { key: &'static str, value: String },

    #[error("bad start timestamp {value:?}: {source}")]
    MalformedTimestamp {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
}
