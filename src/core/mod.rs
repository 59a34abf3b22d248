pub mod config;
pub mod error;
pub mod types;

pub use config::{config, set_config, GenerationConfig};
pub use error::{ForgeError, Result};
pub use types::{BlueprintIndex, ModuleId, RunId, SocketRef};
