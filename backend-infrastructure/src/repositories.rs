pub mod csv_readings;

pub use csv_readings::*;
