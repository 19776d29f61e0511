//! CLI argument parsing for the demonstration binary

use clap::{Parser, ValueEnum};

/// Output format for the final profiling result
#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable report emitted through the log (default)
    Text,
    /// JSON on stdout for machine parsing
    Json,
}

#[derive(Parser, Debug)]
#[command(name = "medir")]
#[command(version)]
#[command(about = "Hierarchical wall-clock profiler demonstration", long_about = None)]
pub struct Cli {
    /// Base unit for the synthetic workload sleeps (e.g. 25ms, 1s)
    #[arg(long = "unit", value_name = "DURATION", default_value = "50ms")]
    pub unit: String,

    /// Label for the root scope
    #[arg(long = "label", value_name = "NAME", default_value = "demo")]
    pub label: String,

    /// Emit TRACE diagnostics for every open/pause/resume/close transition
    #[arg(long = "trace")]
    pub trace: bool,

    /// Output format for the final result
    #[arg(long = "format", value_enum, default_value = "text")]
    pub format: OutputFormat,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::parse_from(["medir"]);
        assert_eq!(cli.unit, "50ms");
        assert_eq!(cli.label, "demo");
        assert!(!cli.trace);
        assert!(matches!(cli.format, OutputFormat::Text));
    }

    #[test]
    fn test_cli_parses_unit_and_label() {
        let cli = Cli::parse_from(["medir", "--unit", "5ms", "--label", "smoke"]);
        assert_eq!(cli.unit, "5ms");
        assert_eq!(cli.label, "smoke");
    }

    #[test]
    fn test_cli_parses_json_format() {
        let cli = Cli::parse_from(["medir", "--format", "json"]);
        assert!(matches!(cli.format, OutputFormat::Json));
    }

    #[test]
    fn test_cli_parses_trace_flag() {
        let cli = Cli::parse_from(["medir", "--trace"]);
        assert!(cli.trace);
    }
}
