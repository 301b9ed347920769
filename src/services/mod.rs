pub mod export_service;
pub mod job_store;
pub mod pipeline_service;
pub mod search_service;
pub mod summary_service;
