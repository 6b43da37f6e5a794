pub mod paginate;
pub mod request_queue;
