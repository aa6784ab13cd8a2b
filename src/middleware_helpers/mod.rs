pub mod csrf;
pub mod request_id;
