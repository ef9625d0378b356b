// Include handlers module directly from handlers.rs
#[path = "handlers.rs"]
pub mod handlers;

// Re-export commonly used handler functions for convenience
pub use handlers::{
    FetchSettings, expand_path, load_urls_from_file, load_urls_from_source, parse_url_line,
    run_fetch,
};

// Re-export batch and report functionality from sitepulse-core
pub use sitepulse_core::batch::{BatchOptions, BatchResultCallback, execute_batch};
pub use sitepulse_core::report::{ReportFormat, generate_results_table, generate_summary};
