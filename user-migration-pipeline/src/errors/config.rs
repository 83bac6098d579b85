use thiserror::Error;

/// An unrecognised spelling of a pipeline setting.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
#[error("Invalid {setting}: {value} (expected one of: {expected})")]
pub struct ParseSettingError {
    pub setting: &'static str,
    pub value: String,
    pub expected: &'static str,
}
