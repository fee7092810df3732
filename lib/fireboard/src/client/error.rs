#[derive(Debug)]
pub enum Error {
    MissingCredentials,
    InvalidCredentials,
    NotLoggedIn,
    Unauthorized,
    UrlParse(url::ParseError),
    Network(reqwest::Error),
    Status(u16),
    Json(serde_json::Error),
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ErrorKind {
    /// Bad credentials, or a missing or expired token.
    Auth,
    /// The service could not be reached or did not answer in time.
    Network,
    /// The service answered with an error status or an unreadable body.
    Api,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::MissingCredentials
            | Self::InvalidCredentials
            | Self::NotLoggedIn
            | Self::Unauthorized => ErrorKind::Auth,
            Self::Network(_) => ErrorKind::Network,
            Self::UrlParse(_) | Self::Status(_) | Self::Json(_) => ErrorKind::Api,
        }
    }
}

impl From<url::ParseError> for Error {
    fn from(err: url::ParseError) -> Self {
        Self::UrlParse(err)
    }
}

impl From<reqwest::Error> for Error {
    fn from(err: reqwest::Error) -> Self {
        Self::Network(err)
    }
}

impl From<serde_json::Error> for Error {
    fn from(err: serde_json::Error) -> Self {
        Self::Json(err)
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        match self {
            Self::MissingCredentials => write!(f, "Username or password not set"),
            Self::InvalidCredentials => write!(f, "Invalid username or password"),
            Self::NotLoggedIn => write!(f, "Not logged in"),
            Self::Unauthorized => write!(f, "Token rejected by server"),
            Self::UrlParse(err) => write!(f, "URL parse error: {err}"),
            Self::Network(err) => write!(f, "Network error: {err}"),
            Self::Status(code) => write!(f, "Unexpected status code: {code}"),
            Self::Json(err) => write!(f, "JSON error: {err}"),
        }
    }
}

impl std::error::Error for Error {}
