use thiserror::Error;

#[derive(Error, Debug)]
pub enum BarError {
    #[error("unknown time zone: {name}")]
    UnknownTimeZone { name: String },

    #[error("progress is not yet complete")]
    NotComplete,
}

pub type BarResult<T> = Result<T, BarError>;
