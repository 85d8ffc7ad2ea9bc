use thiserror::Error;

/// Failure to read a GPX document. Fatal to the load it belongs to.
#[derive(Error, Debug)]
pub enum GpxError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("Missing attribute {attribute} on <{element}>")]
    MissingAttribute {
        element: &'static str,
        attribute: &'static str,
    },

    #[error("Invalid number in <{element}>: {value:?}")]
    InvalidNumber { element: &'static str, value: String },

    #[error("Invalid time {0:?}")]
    InvalidTime(String),

    #[error("Track point without a <time> element")]
    MissingTime,

    #[error("No tracks found in GPX file")]
    NoTracks,
}

impl From<quick_xml::events::attributes::AttrError> for GpxError {
    fn from(e: quick_xml::events::attributes::AttrError) -> Self {
        GpxError::Xml(e.into())
    }
}

/// A statistic could not be computed. Callers recover by falling back to a
/// simpler statistic; this is never a hard failure.
#[derive(Error, Debug, Clone, Copy, PartialEq)]
pub enum StatsError {
    #[error("no data")]
    NoData,

    #[error("{values} values but {timestamps} timestamps")]
    LengthMismatch { values: usize, timestamps: usize },

    #[error("series contains NaN")]
    ContainsNaN,
}

#[derive(Error, Debug)]
pub enum SettingsError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Invalid settings: {0}")]
    Invalid(String),
}
