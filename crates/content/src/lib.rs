#![forbid(unsafe_code)]

pub mod config;
pub mod error;
pub mod progress;
pub mod scan;
pub mod source;
pub mod store;

pub use config::ContentConfig;
pub use error::{ContentError, ScanError};
pub use progress::{InMemoryProgress, PracticeProgress};
pub use scan::{InvalidFile, ScanReport, scan_json_tree};
pub use source::{ContentSource, FsSource, HttpSource, InMemorySource};
pub use store::ContentStore;
