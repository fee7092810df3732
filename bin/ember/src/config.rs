use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use serde::Deserialize;

use crate::{Binding, LocalId};

const DEFAULT_UPDATE_FREQUENCY: u64 = 5;
const MIN_UPDATE_FREQUENCY: u64 = 5;
const MAX_UPDATE_FREQUENCY: u64 = 24 * 60;

/// A host device to mirror a FireBoard or one of its channels into.
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct BindingConfig {
    pub id: LocalId,
    pub hardware_id: String,
    pub channel: Option<u32>,
}

impl BindingConfig {
    pub fn binding(&self) -> Binding {
        match self.channel {
            Some(channel) => Binding::channel(&self.hardware_id, channel),
            None => Binding::device(&self.hardware_id),
        }
    }
}

#[derive(Clone)]
pub struct Config {
    pub username: String,
    pub password: String,
    /// Minutes between two polls.
    pub update_frequency: u64,
    pub api_url: Option<String>,
    pub bindings: Vec<BindingConfig>,
}

impl Config {
    pub fn from_env() -> Result<Config, ConfigError> {
        Self::from_vars(|name| std::env::var(name).ok())
    }

    pub fn from_vars<F>(var: F) -> Result<Config, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut error = ConfigError::default();

        let update_frequency = match var("UPDATE_FREQUENCY") {
            Some(value) => value.trim().parse().unwrap_or_else(|_| {
                error.insert("UPDATE_FREQUENCY", format!("not a number of minutes: {value}"));
                DEFAULT_UPDATE_FREQUENCY
            }),
            None => DEFAULT_UPDATE_FREQUENCY,
        };

        let bindings = match var("BINDINGS") {
            Some(value) => serde_json::from_str(&value).unwrap_or_else(|err| {
                error.insert("BINDINGS", format!("invalid bindings: {err}"));
                vec![]
            }),
            None => vec![],
        };

        let config = Config {
            username: var("FIREBOARD_USER").unwrap_or_default(),
            password: var("FIREBOARD_PASS").unwrap_or_default(),
            update_frequency,
            api_url: var("FIREBOARD_API").filter(|url| !url.is_empty()),
            bindings,
        };

        if let Err(validation) = config.validate() {
            error.errors.extend(validation.errors);
        }

        if error.errors.is_empty() {
            Ok(config)
        } else {
            Err(error)
        }
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let mut error = ConfigError::default();

        if self.username.chars().count() < 5 {
            error.insert(
                "FIREBOARD_USER",
                "enter your FireBoard login name (email address)",
            );
        }

        if self.password.is_empty() {
            error.insert("FIREBOARD_PASS", "enter your FireBoard login password");
        }

        if !(MIN_UPDATE_FREQUENCY..=MAX_UPDATE_FREQUENCY).contains(&self.update_frequency) {
            error.insert(
                "UPDATE_FREQUENCY",
                "update frequency must be at least 5 min and no more than 24 hours",
            );
        }

        if error.errors.is_empty() {
            Ok(())
        } else {
            Err(error)
        }
    }

    pub fn update_interval(&self) -> Duration {
        Duration::from_secs(self.update_frequency * 60)
    }
}

/// Validation failures keyed by the offending setting.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ConfigError {
    pub errors: BTreeMap<&'static str, String>,
}

impl ConfigError {
    pub fn login_failed() -> Self {
        let mut error = ConfigError::default();
        let message = "login to FireBoard server failed, check login, password";
        error.insert("FIREBOARD_USER", message);
        error.insert("FIREBOARD_PASS", message);
        error
    }

    fn insert(&mut self, field: &'static str, message: impl Into<String>) {
        self.errors.insert(field, message.into());
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (index, (field, message)) in self.errors.iter().enumerate() {
            if index > 0 {
                write!(f, "; ")?;
            }
            write!(f, "{field}: {message}")?;
        }
        Ok(())
    }
}

impl std::error::Error for ConfigError {}
