pub mod clean_pycache;
pub mod context;
pub mod file_counter;
pub mod file_ops;
