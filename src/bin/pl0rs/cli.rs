//! Everything needed for parsing the CLI arguments of `pl0rs`.

use clap::{Parser, ValueEnum};

/// Struct containing the CLI configuration for `pl0rs`.
///
/// Unlike `why`'s multi-command CLI, this toolchain has exactly one
/// pipeline (read `inputFile.txt`, write `outputFile.txt`), so there is no
/// subcommand here, just the three echo flags spec.md §6 mandates plus a
/// log-level flag for internal tracing.
#[derive(Parser, Debug)]
#[command(author, version, about)]
pub struct Cli {
    /// Echo the lexer listing to standard output.
    #[arg(short = 'l', long = "lex-listing")]
    pub echo_lexer_listing: bool,

    /// Echo the generated code listing to standard output.
    #[arg(short = 'a', long = "code-listing")]
    pub echo_code_listing: bool,

    /// Echo the VM execution trace to standard output.
    #[arg(short = 'v', long = "vm-trace")]
    pub echo_vm_trace: bool,

    /// Specify the log level of the toolchain's internal tracing (distinct
    /// from `-v`, which echoes the VM's own data trace regardless of log
    /// level).
    #[arg(value_enum, long = "log-level", default_value_t = LogLevel::default())]
    pub log_level: LogLevel,
}

impl Cli {
    pub fn init() -> Self {
        Cli::parse()
    }
}

/// Log level for `pl0rs`'s internal tracing via the `log` facade.
#[derive(ValueEnum, Clone, Default, Debug)]
pub enum LogLevel {
    #[default]
    #[value(alias("0"))]
    Error,

    #[value(alias("1"))]
    Warn,

    #[value(alias("2"))]
    Info,

    #[value(alias("3"))]
    Debug,

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
