pub mod classification;
pub mod config;
pub mod currency;
pub mod error;
pub mod integrity;
pub mod profile;
pub mod ratios;
pub mod types;

#[cfg(feature = "risk")]
pub mod risk;

#[cfg(feature = "risk")]
pub mod sampling;

#[cfg(feature = "compliance")]
pub mod compliance;

#[cfg(all(feature = "risk", feature = "compliance"))]
pub mod pipeline;

pub use config::EngineConfig;
pub use error::AuditError;
pub use types::*;

/// Standard result type for all engine operations
pub type AuditResult<T> = Result<T, AuditError>;
