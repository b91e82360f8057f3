pub mod model;
pub mod poller;
pub mod status;
