//! # Cli
//!
//! This module contains everything needed for parsing the CLI arguments for
//! py2cpp.

use clap::{Parser, ValueEnum};

/// Struct containing the CLI configuration for py2cpp.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// The Python source file to transpile.
    #[arg(index = 1)]
    pub input: std::path::PathBuf,

    /// Seed the type registry with Qt widget classes as pointer types.
    #[arg(long)]
    pub using_qt: bool,

    /// Whether to dump the parsed AST (for debugging).
    #[arg(long)]
    pub dump_parsed: bool,

    /// Specify the log level of the transpiler.
    #[arg(value_enum, short, long, default_value_t = LogLevel::default())]
    pub verbosity: LogLevel,
}

impl Cli {
    pub fn init() -> Self {
        Cli::parse()
    }
}

/// Enum for specifying the log level of py2cpp.
#[derive(ValueEnum, Clone, Default, Debug)]
pub enum LogLevel {
    /// The default log level. Only critical errors will be logged.
    #[default]
    #[value(alias("0"))]
    Error,

    /// A log level where warnings (like unsupported source constructs) are
    /// logged as well.
    #[value(alias("1"))]
    Warn,

    /// Also log information about the general state of the transpiler.
    #[value(alias("2"))]
    Info,

    /// Log everything which happens internally in the transpiler.
    #[value(alias("3"))]
    Debug,

    /// Log extra information.
    #[value(alias("4"))]
    Trace,
}

impl From<&LogLevel> for log::Level {
    fn from(value: &LogLevel) -> Self {
        match value {
            LogLevel::Error => log::Level::Error,
            LogLevel::Warn => log::Level::Warn,
            LogLevel::Info => log::Level::Info,
            LogLevel::Debug => log::Level::Debug,
            LogLevel::Trace => log::Level::Trace,
        }
    }
}
