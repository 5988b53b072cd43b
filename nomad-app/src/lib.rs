pub mod error;
pub mod seed;
pub mod state;
pub mod stats;

pub use error::{AppError, ErrorKind};
pub use state::NomadApp;
pub use stats::ProfileStats;
