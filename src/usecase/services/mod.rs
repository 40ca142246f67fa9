pub mod load_service;
pub mod report_service;
