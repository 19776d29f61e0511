use std::thread::sleep;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use medir::category::Category;
use medir::cli::{Cli, OutputFormat};
use medir::duration::parse_duration;
use medir::json_output::JsonReport;
use medir::session::ProfilingSession;
use tracing_subscriber::EnvFilter;

/// Initialize tracing subscriber; TRACE directive when transition
/// diagnostics are requested, INFO otherwise
fn init_tracing(verbose: bool) {
    let level = if verbose {
        tracing::Level::TRACE
    } else {
        tracing::Level::INFO
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive(level.into()))
        .with_writer(std::io::stderr)
        .init();
}

/// The canonical nested workload: CPU work interleaved with TCP, SQL and SMB
/// access, every sleep scaled by `unit`
fn run_workload(session: &ProfilingSession, unit: Duration, label: &str) {
    let _root = session.scope_named_in(label, Category::Cpu);
    sleep(unit * 4);
    session.increment_counter("counter-1", 1000);
    {
        let _tcp = session.scope_in(Category::Tcp);
        sleep(unit * 6);
        {
            let _sql = session.scope_in(Category::Sql);
            session.increment_counter("counter-2", 333);
            sleep(unit * 10);
        }
        sleep(unit * 4);
    }
    sleep(unit * 2);
    {
        let _smb = session.scope_in(Category::Smb);
        sleep(unit * 6);
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.trace);

    let unit = parse_duration(&cli.unit)?;
    let session = ProfilingSession::new();
    session.set_trace_enabled(cli.trace);

    run_workload(&session, unit, &cli.label);

    if let OutputFormat::Json = cli.format {
        let report = JsonReport::from_sample_set(&session.snapshot());
        println!("{}", report.to_json());
    }
    Ok(())
}
