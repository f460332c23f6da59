//! # UI Error Types
//!
//! Only configuration, settings persistence and atlas setup fail at
//! runtime. Protocol misuse (unbalanced begin/end, push/pop) panics.

use tessera_draw::AtlasError;
use thiserror::Error;

/// Errors that can occur while setting up or persisting the UI.
#[derive(Error, Debug)]
pub enum UiError {
    /// Reading or writing a settings file failed.
    #[error("settings i/o: {0}")]
    Io(#[from] std::io::Error),

    /// A settings or style document is malformed.
    #[error("settings parse: {0}")]
    SettingsParse(#[from] toml::de::Error),

    /// Settings could not be serialized.
    #[error("settings serialize: {0}")]
    SettingsSerialize(#[from] toml::ser::Error),

    /// The font atlas failed to build.
    #[error("font atlas: {0}")]
    Atlas(#[from] AtlasError),

    /// The atlas has no font at the requested index.
    #[error("font atlas has no font {0}")]
    MissingFont(usize),
}

/// Result type for UI setup and persistence.
pub type UiResult<T> = Result<T, UiError>;
