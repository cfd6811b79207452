use std::fmt;

/// Errors from the payment processor client
#[derive(Debug)]
pub enum PaymentError {
    Http(reqwest::Error),
    /// Non-success response; carries the processor's own message when it sent one
    Api { status: u16, message: String },
    MissingClientSecret,
}

impl fmt::Display for PaymentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Http(e) => write!(f, "HTTP error: {e}"),
            Self::Api { status, message } => {
                write!(f, "Payment API error ({status}): {message}")
            }
            Self::MissingClientSecret => write!(f, "Payment intent has no client secret"),
        }
    }
}

impl std::error::Error for PaymentError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Http(e) => Some(e),
            _ => None,
        }
    }
}

impl From<reqwest::Error> for PaymentError {
    fn from(err: reqwest::Error) -> Self {
        Self::Http(err)
    }
}

pub type Result<T> = std::result::Result<T, PaymentError>;
