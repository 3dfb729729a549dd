pub mod commands;
pub mod picker;
pub mod prompt;
pub mod registry;
pub mod tools;
