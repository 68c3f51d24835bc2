//! Errors for this crate

use wasm_bindgen::JsValue;

/// All the known errors returned by this crate.
#[derive(Debug, snafu::Snafu)]
#[snafu(visibility(pub(crate)))]
pub enum ParticleError {
    /// A partial or full config that isn't valid JSON for our schema
    #[snafu(display("Couldn't parse particle config: {source}"))]
    ConfigParse {
        /// The parent error type
        source: serde_json::Error,
    },

    /// The config couldn't be turned back into JSON
    #[snafu(display("Couldn't serialize particle config: {source}"))]
    ConfigSerialize {
        /// The parent error type
        source: serde_json::Error,
    },

    /// A colour string we don't understand
    #[snafu(display("Invalid colour `{value}`, expected rgba(), rgb() or #hex"))]
    InvalidColor {
        /// The offending string
        value: String,
    },

    /// Some part of the browser environment we need isn't there
    #[snafu(display("Browser API unavailable: {what}"))]
    Environment {
        /// What was missing
        what: String,
    },
}

impl From<ParticleError> for JsValue {
    fn from(error: ParticleError) -> Self {
        js_sys::Error::new(&error.to_string()).into()
    }
}
