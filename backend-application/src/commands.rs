pub mod check_in_commands;
pub mod checkpoint_commands;
pub mod evaluation_commands;
pub mod fine_commands;
pub mod fine_setting_commands;
pub mod roster_commands;
