pub mod dashboard_queries;
pub mod readings_queries;
