use snafu::Snafu;

/// Failure of one backend call.
///
/// The dispatcher never shows these to the user beyond one fixed bubble; the
/// variants exist so the log says what went wrong.
#[derive(Debug, Snafu)]
#[snafu(visibility(pub))]
pub enum RequestError {
    #[snafu(display("request to '{endpoint}' failed at {stage}: {details}"))]
    Transport {
        stage: &'static str,
        endpoint: String,
        details: String,
    },
    #[snafu(display("reply from '{endpoint}' on `{stage}` is not valid JSON: {source}"))]
    Decode {
        stage: &'static str,
        endpoint: String,
        source: serde_json::Error,
    },
    #[snafu(display("failed to read attachment '{name}': {details}"))]
    ReadAttachment {
        stage: &'static str,
        name: String,
        details: String,
    },
}

impl RequestError {
    pub fn stage(&self) -> &'static str {
        match self {
            Self::Transport { stage, .. }
            | Self::Decode { stage, .. }
            | Self::ReadAttachment { stage, .. } => stage,
        }
    }
}

pub type RequestResult<T> = Result<T, RequestError>;
