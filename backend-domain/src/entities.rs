// Domain entities
pub mod reading;
pub mod runtime_config;
pub mod scored_reading;
pub mod zone_location;

pub use reading::*;
pub use runtime_config::*;
pub use scored_reading::*;
pub use zone_location::*;
