pub mod batch;
pub mod request;
pub mod ward;

pub use batch::*;
pub use request::*;
pub use ward::*;
