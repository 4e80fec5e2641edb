use serde::{Deserialize, Serialize};
use std::{fs::File, io::BufReader, path::Path};

use crate::{Error, InternalResult};

/// What `/` yields when the divisor is zero.
///
/// `Zero` substitutes `0` of the operand type, which is indistinguishable from
/// a genuine zero quotient. `Error` reports [`crate::eval::EvalError::DivisionByZero`].
#[derive(
    Debug,
    Clone,
    Copy,
    PartialEq,
    Eq,
    Default,
    Serialize,
    Deserialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum DivisionByZeroPolicy {
    #[default]
    Zero,
    Error,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EvalConfig {
    #[serde(default)]
    pub division_by_zero: DivisionByZeroPolicy,

    /// Register the built-in functions (`and`, `or`, `not`, `if`, `len`, `contains`).
    #[serde(default = "default_true")]
    pub builtins: bool,
}

impl Default for EvalConfig {
    fn default() -> Self {
        Self {
            division_by_zero: DivisionByZeroPolicy::default(),
            builtins: default_true(),
        }
    }
}

impl EvalConfig {
    // JSONファイルから設定を読み込む
    pub fn from_file<P: AsRef<Path>>(path: P) -> InternalResult<Self> {
        from_file(path)
    }
}

pub fn from_file<T: for<'de> Deserialize<'de>, P: AsRef<Path>>(path: P) -> InternalResult<T> {
    let file = File::open(path)
        .map_err(|e| Error::Config(format!("Failed to open config file: {}", e)))?;
    let reader = BufReader::new(file);
    let config = serde_json::from_reader(reader)
        .map_err(|e| Error::Config(format!("Failed to parse config file: {}", e)))?;
    Ok(config)
}

pub fn from_str<T: for<'de> Deserialize<'de>>(s: &str) -> InternalResult<T> {
    let config = serde_json::from_str(s)
        .map_err(|e| Error::Config(format!("Failed to parse config: {}", e)))?;
    Ok(config)
}

fn default_true() -> bool {
    true
}
