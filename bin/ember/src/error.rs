use std::fmt;

use crate::{Binding, ConfigError, LocalId};

#[derive(Debug)]
pub enum Error {
    FireBoard(fireboard::Error),
    Config(ConfigError),
    AlreadyBound(Binding, LocalId),
    NotBound(Binding),
}

impl From<fireboard::Error> for Error {
    fn from(err: fireboard::Error) -> Self {
        Self::FireBoard(err)
    }
}

impl From<ConfigError> for Error {
    fn from(err: ConfigError) -> Self {
        Self::Config(err)
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::FireBoard(err) => write!(f, "fireboard error: {err}"),
            Self::Config(err) => write!(f, "config error: {err}"),
            Self::AlreadyBound(binding, id) => write!(f, "{binding} is already bound to {id}"),
            Self::NotBound(binding) => write!(f, "{binding} is not bound"),
        }
    }
}

impl std::error::Error for Error {}
