use std::fmt;

use clap::ValueEnum;

#[derive(Debug, Default, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub(crate) enum LogLevel {
    /// Completely disables logging
    Off,
    /// Only errors from the gateway crates
    Error,
    /// Warnings and errors from the gateway crates
    Warn,
    /// Info, warning and error messages from the gateway crates
    #[default]
    Info,
    /// Debug, info, warning and error messages from the gateway crates
    Debug,
    /// Trace, debug, info, warning and error messages from all dependencies
    Trace,
}

impl LogLevel {
    pub(crate) fn as_filter_str(&self) -> &'static str {
        match self {
            LogLevel::Off => "off",
            LogLevel::Error => "rest_bridge_gateway=error,gateway_server=error,runtime=error,runtime_local=error,off",
            LogLevel::Warn => "rest_bridge_gateway=warn,gateway_server=warn,runtime=warn,runtime_local=warn,off",
            LogLevel::Info => "rest_bridge_gateway=info,gateway_server=info,runtime=info,runtime_local=info,off",
            LogLevel::Debug => {
                "rest_bridge_gateway=debug,gateway_server=debug,runtime=debug,runtime_local=debug,off"
            }
            LogLevel::Trace => "trace",
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, ValueEnum)]
pub(crate) enum LogStyle {
    /// Standard text
    Text,
    /// JSON objects
    Json,
}

impl fmt::Display for LogStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LogStyle::Text => f.write_str("text"),
            LogStyle::Json => f.write_str("json"),
        }
    }
}
