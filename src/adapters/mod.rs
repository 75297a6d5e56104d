pub mod api_server;

pub use api_server::start_api_server;
