use std::io;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Error)]
pub enum GeometryError {
    #[error("expected {expected} coordinates, found {found}")]
    Arity { expected: usize, found: usize },
    #[error("coordinates must be finite numbers")]
    NonFinite,
    #[error("a vector space needs exactly 3 basis vectors, found {0}")]
    BasisCount(usize),
    #[error("division by zero")]
    DivisionByZero,
    #[error("invalid camera: {0}")]
    InvalidCamera(String),
    #[error("primitive #{index} is invalid: {reason}")]
    InvalidPrimitive { index: usize, reason: String },
}

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("max distance must be a positive finite number, got {0}")]
    MaxDistance(f64),
    #[error("failed to build render thread pool")]
    ThreadPool(#[source] rayon::ThreadPoolBuildError),
}

#[derive(Debug, Error)]
pub enum SessionError {
    #[error("input facility failed")]
    Input(#[source] io::Error),
    #[error("output facility failed")]
    Output(#[source] io::Error),
}
