use thiserror::Error;

#[derive(Error, Debug)]
pub enum PredictionError {
    #[error("Missing required input: {0}")]
    MissingInput(&'static str),

    #[error("Invalid calibration: {0}")]
    InvalidCalibration(String),

    #[error("Calibration file error: {0}")]
    CalibrationIo(#[from] std::io::Error),

    #[error("Calibration parse error: {0}")]
    CalibrationParse(#[from] serde_json::Error),
}
