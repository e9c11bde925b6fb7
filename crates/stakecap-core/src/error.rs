//! Error types for Stakecap.
use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DatasetError {
    #[error("io: {0}")] Io(String),
    #[error("malformed pool record: {0}")] Schema(String),
    #[error("csv export: {0}")] Csv(String),
}

#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParamsError {
    #[error("{name} = {value} out of range, expected {expected}")] OutOfRange { name: &'static str, value: f64, expected: &'static str },
    #[error("unknown saturation mode: {0}")] UnknownSaturationMode(String),
    #[error("unknown rewards mode: {0}")] UnknownRewardsMode(String),
    #[error("unknown zoom level: {0}")] UnknownZoomLevel(String),
}

#[derive(Error, Debug)]
pub enum StakecapError {
    #[error(transparent)] Dataset(#[from] DatasetError),
    #[error(transparent)] Params(#[from] ParamsError),
    #[error("config: {0}")] Config(String),
}
