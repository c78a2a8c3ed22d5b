pub mod check_in_handlers;
pub mod checkpoint_handlers;
pub mod fine_handlers;
pub mod ops_handlers;
pub mod setting_handlers;
pub mod shift_handlers;

pub use check_in_handlers::*;
pub use checkpoint_handlers::*;
pub use fine_handlers::*;
pub use ops_handlers::*;
pub use setting_handlers::*;
pub use shift_handlers::*;
