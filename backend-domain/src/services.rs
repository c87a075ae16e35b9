// Domain services
pub mod explanation;
pub mod injector;
pub mod isolation_forest;
pub mod scorer;

pub use explanation::*;
pub use injector::*;
pub use isolation_forest::*;
pub use scorer::*;
