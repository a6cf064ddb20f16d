use thiserror::Error;

/// Failures of the payload pipeline. Any of these aborts the whole run.
#[derive(Debug, Error)]
pub enum ParseError {
    #[error("invalid scheme: expected {expected}://")]
    Scheme { expected: String },

    #[error("base64 error: {source} | cleaned: {cleaned}")]
    Decode {
        cleaned: String,
        #[source]
        source: base64::DecodeError,
    },

    #[error("json error: {source} | data: {data}")]
    RequestFormat {
        data: String,
        #[source]
        source: serde_json::Error,
    },
}
