// Domain entities

pub mod attendance;
pub mod check_in;
pub mod checkpoint;
pub mod fine;
pub mod fine_setting;
pub mod model;
pub mod shift;

pub use attendance::*;
pub use check_in::*;
pub use checkpoint::*;
pub use fine::*;
pub use fine_setting::*;
pub use model::*;
pub use shift::*;
