pub mod checkpoint_queries;
pub mod fine_queries;
pub mod fine_setting_queries;
pub mod shift_queries;
