//! Work categories that measured time is attributed to
//!
//! The set is closed on purpose: every `SampleSet` carries one sample per
//! category at all times, so adding a variant here is all it takes to track a
//! new kind of work everywhere.

use std::fmt;

/// Kinds of work a scope can attribute wall-clock time to
///
/// Declaration order is the report order. The discriminant doubles as the
/// index into the dense per-category sample array.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub enum Category {
    /// In-process computation
    Cpu,
    /// Local file I/O
    File,
    /// GPU work
    Gpu,
    /// Anything not covered by a more specific category
    #[default]
    Other,
    /// REST calls to remote services
    Rest,
    /// SMB network shares
    Smb,
    /// Database access
    Sql,
    /// Raw TCP traffic
    Tcp,
}

impl Category {
    /// Number of categories; length of every per-category array
    pub const COUNT: usize = 8;

    /// All categories in declaration (= report) order
    pub const ALL: [Category; Category::COUNT] = [
        Category::Cpu,
        Category::File,
        Category::Gpu,
        Category::Other,
        Category::Rest,
        Category::Smb,
        Category::Sql,
        Category::Tcp,
    ];

    /// Index into a dense per-category array
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Uppercase label used in reports and trace lines
    pub const fn label(self) -> &'static str {
        match self {
            Category::Cpu => "CPU",
            Category::File => "FILE",
            Category::Gpu => "GPU",
            Category::Other => "OTHER",
            Category::Rest => "REST",
            Category::Smb => "SMB",
            Category::Sql => "SQL",
            Category::Tcp => "TCP",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}
