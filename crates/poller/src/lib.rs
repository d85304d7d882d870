pub mod backoff;
pub mod poller;
pub mod source;
