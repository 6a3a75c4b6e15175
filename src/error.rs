#[derive(thiserror::Error, Debug)]
pub enum FritzError {
    #[error("http request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("Request forbidden. Are you logged in, is the sid correct and recent?")]
    Forbidden,

    #[error("cannot parse xml: `{0}`")]
    Protocol(#[from] serde_xml_rs::Error),

    #[error("fritz login failed - sid is still the default after login attempt")]
    LoginFailed,

    #[error("not connected - call connect first")]
    NotConnected,

    #[error("device not found: `{0}`")]
    DeviceNotFound(String),

    #[error("device doesn't support switch commands")]
    SwitchCommandNotSupported,

    #[error("device doesn't support temperature")]
    TemperatureNotSupported,

    #[error("invalid switch state")]
    InvalidSwitchState,

    #[error("unknown answer of url request: {0:?}")]
    UnknownAnswer(String),
}

pub type Result<T> = std::result::Result<T, FritzError>;
