pub mod shift_locks;

pub use shift_locks::ShiftLocks;
