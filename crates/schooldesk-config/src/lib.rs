//! # Schooldesk Config
//!
//! Configuration structures loaded from environment variables:
//!
//! - [`api`]: Backend base URL and request timeout
//! - [`navigation`]: Redirect destinations used by route guards
//!
//! # Example
//!
//! ```ignore
//! use schooldesk_config::{ApiConfig, NavigationConfig};
//!
//! let api = ApiConfig::from_env();
//! let navigation = NavigationConfig::from_env();
//! ```

pub mod api;
pub mod navigation;

pub use api::ApiConfig;
pub use navigation::NavigationConfig;
