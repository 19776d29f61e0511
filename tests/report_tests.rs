//! Integration tests for report isolation of labeled nested scopes
//!
//! A labeled scope reports its own local totals at close time, independent
//! of whatever those totals are merged into afterwards.

use std::thread::sleep;
use std::time::Duration;

use medir::category::Category;
use medir::report;
use medir::session::ProfilingSession;
use serial_test::serial;

#[test]
#[serial]
fn test_labeled_scope_reports_only_its_own_totals() {
    let session = ProfilingSession::new();
    {
        let _root = session.scope_named_in("root", Category::Cpu);
        sleep(Duration::from_millis(100));
        {
            let _method1 = session.scope_named_in("method1", Category::Cpu);
            {
                let _tcp = session.scope_in(Category::Tcp);
                sleep(Duration::from_millis(150));
            }
            sleep(Duration::from_millis(50));
            {
                let _smb = session.scope_in(Category::Smb);
                sleep(Duration::from_millis(100));
            }
        }
        // right after method1 closed, the finalized set is method1's own
        let method1 = session.last_finalized().expect("method1 finalized");
        assert_eq!(method1.subject(), Some("method1"));
        let tcp_local = method1.sample(Category::Tcp).elapsed();
        let cpu_local = method1.sample(Category::Cpu).elapsed();
        assert!(tcp_local >= Duration::from_millis(150));
        assert!(tcp_local < Duration::from_millis(250));
        // the 100ms of root CPU before method1 must not show up here
        assert!(cpu_local < Duration::from_millis(100));

        sleep(Duration::from_millis(100));

        // the ancestor's eventual totals dominate the local ones
        let root_cpu = session.snapshot().sample(Category::Cpu).elapsed();
        assert!(cpu_local <= root_cpu);
    }

    // after full unwind the root holds the cumulative totals
    let set = session.snapshot();
    assert!(set.sample(Category::Tcp).elapsed() >= Duration::from_millis(150));
    assert!(set.sample(Category::Cpu).elapsed() >= Duration::from_millis(200));
}

#[test]
#[serial]
fn test_local_totals_never_exceed_ancestor_cumulative_totals() {
    let session = ProfilingSession::new();
    let mut local_sql = Duration::ZERO;
    {
        let _root = session.scope_in(Category::Cpu);
        for _ in 0..2 {
            let _inner = session.scope_named_in("query", Category::Sql);
            sleep(Duration::from_millis(50));
        }
        if let Some(finalized) = session.last_finalized() {
            local_sql = finalized.sample(Category::Sql).elapsed();
        }
    }
    let cumulative_sql = session.snapshot().sample(Category::Sql).elapsed();
    assert!(local_sql > Duration::ZERO);
    assert!(local_sql <= cumulative_sql);
}

#[test]
fn test_rendered_report_reflects_the_finalized_set() {
    let session = ProfilingSession::new();
    {
        let _root = session.scope_named_in("run", Category::Cpu);
        session.increment_counter("items", 3);
    }

    let finalized = session.last_finalized().expect("root finalized");
    let lines = report::render("run", &finalized);
    assert_eq!(lines[0], report::BANNER);
    assert_eq!(lines[1], "\u{25c2}[run]");
    assert!(lines.contains(&"[items] 3".to_string()));
    assert_eq!(lines.last().map(String::as_str), Some(report::BANNER));
}

#[test]
fn test_forced_report_uses_the_last_finalized_set() {
    let session = ProfilingSession::new();
    // nothing finalized yet: must not panic, must log nothing
    session.report("early");

    {
        let _root = session.scope_in(Category::Cpu);
    }
    // root closed; a forced report of the final totals is available
    session.report("after-run");
    assert!(session.last_finalized().is_some());
}
