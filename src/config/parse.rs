//! Environment variable parsing utilities.

use std::str::FromStr;

use super::ConfigError;

/// Get environment variable with default value.
pub fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}

/// Get optional environment variable (None if empty or missing).
pub fn env_opt(key: &str) -> Option<String> {
    std::env::var(key).ok().filter(|s| !s.is_empty())
}

/// Parse environment variable with type conversion.
pub fn env_parse<T: FromStr>(key: &str, default: T) -> Result<T, ConfigError>
where
    T::Err: std::fmt::Display,
{
    match std::env::var(key) {
        Ok(v) if !v.is_empty() => v.parse().map_err(|e: T::Err| ConfigError::Parse {
            key: key.into(),
            value: v,
            error: e.to_string(),
        }),
        _ => Ok(default),
    }
}

/// Split a command string into program + arguments on whitespace.
///
/// No shell quoting; invocations that need quoting go in a wrapper script.
pub fn split_command(s: &str) -> Vec<String> {
    s.split_whitespace().map(String::from).collect()
}

/// Read a stage command from the environment and split it.
///
/// A command that splits to nothing (set but blank) is rejected here so the
/// run fails before any stage starts.
pub fn env_command(key: &str, default: &str) -> Result<Vec<String>, ConfigError> {
    let command = split_command(&env_or(key, default));
    if command.is_empty() {
        return Err(ConfigError::Invalid {
            key: key.into(),
            message: "command is empty".into(),
        });
    }
    Ok(command)
}
