pub mod operations;

pub use operations::{backup_path, read_source, write_source, SourceFile, WriteOptions};
