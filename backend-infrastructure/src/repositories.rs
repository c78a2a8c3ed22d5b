pub mod attendance_store;
pub mod check_in_store;
pub mod checkpoint_store;
pub mod fine_setting_store;
pub mod fine_store;
pub mod roster_store;
pub mod schema;
pub mod sqlite_store;

pub use sqlite_store::*;
