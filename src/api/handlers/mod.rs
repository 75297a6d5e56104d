pub mod health;
pub mod predict;

pub use health::*;
pub use predict::*;

/// Short per-request id used to correlate log lines.
pub(crate) fn request_id() -> String {
    let mut id = uuid::Uuid::new_v4().simple().to_string();
    id.truncate(8);
    id
}
