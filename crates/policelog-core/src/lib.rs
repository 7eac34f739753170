//! Police Log Core: shared record types, configuration, persistence seam.

pub mod config;
pub mod error;
pub mod sink;
pub mod types;

pub use config::{DataPaths, GeocoderConfig, ListingConfig, PoliceLogConfig};
pub use error::{Error, Result};
pub use sink::ReportSink;
pub use types::{ArrestRecord, ChargeType, Coordinates, RawRow};
