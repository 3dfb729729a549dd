pub mod cache_cleaner;
pub mod context_generator;
pub mod file_ops;
pub mod file_selector;
pub mod file_stats;
pub mod ignore;
pub mod tree;
