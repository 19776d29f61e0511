//! Medir - hierarchical wall-clock profiler with category-level time attribution
//!
//! Wrap regions of code in nestable scopes that attribute elapsed wall-clock
//! time to a closed set of work categories (CPU, SQL, TCP, ...). Closing a
//! nested scope folds its measurements into the enclosing scope without ever
//! double-counting the child's time against the parent's category; the
//! report shows per-category totals, named counters and the unaccounted
//! residue.
//!
//! ```
//! use medir::category::Category;
//! use medir::session::ProfilingSession;
//!
//! let session = ProfilingSession::new();
//! {
//!     let _work = session.scope_in(Category::Cpu);
//!     // ... compute ...
//!     {
//!         let _query = session.scope_in(Category::Sql);
//!         session.increment_counter("rows", 42);
//!         // ... query ...
//!     }
//! }
//! assert_eq!(session.snapshot().counter("rows"), 42);
//! ```

pub mod category;
pub mod cli;
pub mod duration;
pub mod json_output;
pub mod report;
pub mod sample;
pub mod sample_set;
pub mod session;
pub mod timekeeping;
