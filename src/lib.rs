pub mod adapter;
pub mod calibration;
#[cfg(feature = "cli")]
pub mod cli;
pub mod config;
pub mod error;
pub mod layout;
pub mod model;
pub mod persist;
pub mod presets;
pub mod session;
pub mod snapshot;
pub mod spread;
pub mod store;
pub mod transfer;

#[cfg(feature = "cli")]
pub use cli::run;
pub use config::{Config, load_config};
pub use layout::{Algorithm, LayoutReport, compute_layout, place, suggest_algorithm};
pub use session::{AlbumSession, PhotoImport};
pub use store::{CollageStore, PlaceOutcome, StoreEvent};
