//! Module for reading and writing models and results as JSON
use std::fs;
use std::path::Path;

use thiserror::Error;

use crate::model::{LinearModel, LinearResult};

/// Errors arising while reading or writing models and results
#[derive(Error, Debug)]
pub enum IoError {
    /// The file could not be read or written
    #[error("unable to access file: {0}")]
    File(#[from] std::io::Error),
    /// The data was not valid JSON for the expected shape
    ///
    /// This also covers models with an operation other than "min" or "max"
    #[error("unable to parse JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parse a [`LinearModel`] from a JSON string
pub fn model_from_json(data: &str) -> Result<LinearModel, IoError> {
    Ok(serde_json::from_str(data)?)
}

/// Read a [`LinearModel`] from a JSON file
pub fn read_model<P: AsRef<Path>>(path: P) -> Result<LinearModel, IoError> {
    let data = fs::read_to_string(path)?;
    model_from_json(&data)
}

/// Serialize a [`LinearModel`] to a JSON string
pub fn model_to_json(model: &LinearModel) -> Result<String, IoError> {
    Ok(serde_json::to_string_pretty(model)?)
}

/// Serialize a [`LinearResult`] to a JSON string
pub fn result_to_json(result: &LinearResult) -> Result<String, IoError> {
    Ok(serde_json::to_string_pretty(result)?)
}

/// Write a [`LinearResult`] to a JSON file
pub fn write_result<P: AsRef<Path>>(path: P, result: &LinearResult) -> Result<(), IoError> {
    let data = result_to_json(result)?;
    fs::write(path, data)?;
    Ok(())
}
