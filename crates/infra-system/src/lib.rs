// Suno Infrastructure - System Adapters
// Implements: ConsoleChannel, LogFileStore

pub mod console;
pub mod log_files;

pub use console::StdoutConsole;
pub use log_files::FsLogFileStore;
