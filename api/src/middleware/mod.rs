pub mod access_log;
pub mod cors;
pub mod request_id;
