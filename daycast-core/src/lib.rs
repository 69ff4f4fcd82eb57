//! Core library for the `daycast` weather screen.
//!
//! This crate defines:
//! - The search → resolve → fetch → select pipeline (debounced location search,
//!   last-writer-wins forecast fetching, day selection)
//! - Abstractions over location search, forecast and preference backends
//! - Configuration and shared domain models
//!
//! It is used by `daycast-cli`, but carries no presentation of its own.

pub mod config;
pub mod error;
pub mod model;
pub mod pipeline;
pub mod preferences;
pub mod provider;

pub use config::{Config, ProviderConfig};
pub use error::{FetchError, PreferenceError, ResolutionError};
pub use model::{CandidateLocation, ForecastDay, ForecastPayload, ResolvedLocation};
pub use pipeline::{ScreenSettings, ScreenView, SessionState, Transition, WeatherScreen};
pub use preferences::{FilePreferenceStore, MemoryPreferenceStore, PreferenceStore};
pub use provider::{ForecastClient, LocationResolver, ProviderId, WeatherProvider};
