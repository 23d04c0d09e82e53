pub mod env;
mod loader;

pub use env::{
    AppConfig, ClassifierConfig, DirectoryConfig, GmailConfig, OllamaConfig, SourceConfig,
    VoiceConfig,
};
pub use loader::load_config;
