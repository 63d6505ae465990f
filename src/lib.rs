//! View Configuration Library
//!
//! Settings and resolution for view frameworks that run as several isolated
//! instances in one process: per-instance configuration with duplication,
//! class-to-configuration resolution by namespace, and deferred layout
//! lookup.

pub mod cli;
pub mod configuration;
pub mod entity;
pub mod error;
pub mod format;
pub mod framework;
pub mod layout;
pub mod load_paths;
pub mod logging;
pub mod manifest;
pub mod types;

pub use configuration::Configuration;
pub use entity::{Layout, Loadable, NullLayout, View};
pub use error::{ErrorCode, ViewError, ViewResult};
pub use framework::{Framework, FrameworkTable};
pub use layout::{ClassRegistry, LayoutFinder};
pub use types::{ClassName, Namespace};
