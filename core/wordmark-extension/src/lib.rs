//! Host lifecycle hooks for Wordmark.
//!
//! - [`Background`]: the initialization hook and the add-word action
//! - [`ContentScript`]: the per-page pass: load, walk, log
//! - [`ExtensionConfig`]: storage location, log filter and walker options
//! - [`init_tracing`]: installs the tracing subscriber

mod background;
mod config;
mod error;
mod logging;
mod page;

pub use background::{AddWordOutcome, Background};
pub use config::ExtensionConfig;
pub use error::{ExtensionError, ExtensionResult};
pub use logging::{init_tracing, LOG_ENV};
pub use page::{ContentScript, PageReport};
