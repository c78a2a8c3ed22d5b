// Domain services: pure rule evaluation, no I/O

pub mod classifier;
pub mod fine_rules;
pub mod geofence;
pub mod qr_token;

pub use classifier::*;
pub use fine_rules::*;
pub use geofence::*;
