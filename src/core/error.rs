use thiserror::Error;

#[derive(Error, Debug)]
pub enum ForgeError {
    #[error("Zone catalog is empty")]
    EmptyCatalog,

    #[error("Zone module has no sockets: {0}")]
    ModuleWithoutSockets(String),

    #[error("Zone blueprint not found: {0}")]
    UnknownBlueprint(String),

    #[error("Invalid zone blueprint: {0}")]
    InvalidBlueprint(String),

    #[error("Invalid configuration: {0}")]
    InvalidConfig(String),

    #[error("Generation run has not been started")]
    RunNotStarted,

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("TOML parse error: {0}")]
    TomlError(#[from] toml::de::Error),

    #[error("Serialization error: {0}")]
    SerdeError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, ForgeError>;
