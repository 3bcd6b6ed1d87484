//! Core library for the `weather` lookup.
//!
//! This crate defines:
//! - Configuration & credentials handling
//! - The place catalog and suggestion filter
//! - Abstraction over the weather provider (WeatherAPI.com)
//! - The presentation mapper from condition text to background style
//! - The search-and-display controller and the async session that drives it
//!
//! It is used by `weather-cli`, but can also be reused by other front ends.

pub mod config;
pub mod controller;
pub mod error;
pub mod model;
pub mod presentation;
pub mod provider;
pub mod session;
pub mod suggest;

pub use config::{Config, ProviderConfig};
pub use controller::{Controller, Effect, Event, Phase, Resolution, ViewState};
pub use error::{FetchError, SessionClosed};
pub use model::{WeatherRequest, WeatherResult};
pub use presentation::PresentationToken;
pub use provider::{WeatherProvider, provider_from_config};
pub use session::{Session, SessionHandle};
pub use suggest::Catalog;
