pub mod evaluation_scheduler;
pub mod ledger_service;

pub use evaluation_scheduler::*;
pub use ledger_service::*;
