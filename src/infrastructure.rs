//! Infrastructure layer for fetching, parsing, persistence and configuration
//!
//! This module provides the results page parser, the HTTP and file document
//! sources, the archive store, and the configuration and logging setup.

pub mod archive_store;
pub mod config;
pub mod harvest_error;
pub mod http_client;
pub mod logging;
pub mod parsing;
pub mod parsing_error;

// Re-export commonly used items
pub use archive_store::{ArchiveStore, FsArchiveStore, archive_index};
pub use config::{AppConfig, ConfigManager, LoggingConfig, OutputConfig, SourceConfig};
pub use harvest_error::{HarvestError, HarvestResult};
pub use http_client::{
    DocumentSource, FileDocumentSource, HttpClient, HttpClientConfig, HttpDocumentSource,
};
pub use logging::{get_log_directory, init_logging, init_logging_with_config};
pub use parsing::{ParsingConfig, ParsingError, ParsingResult};
