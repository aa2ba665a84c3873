/// Default tooltip timeout, in seconds.
pub const DEFAULT_TIMEOUT_SECS: f64 = 3.0;

/// User preferences.
///
/// Read once per page pass; the content walker never writes it back.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Settings {
    pub enable_highlighting: bool,
    /// Added after the first release. Records written before it existed
    /// are read as `true`.
    pub enable_page_stats: bool,
    /// Seconds the tooltip collaborator keeps a description visible.
    /// Stored as written, fractions included.
    pub timeout: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            enable_highlighting: true,
            enable_page_stats: true,
            timeout: DEFAULT_TIMEOUT_SECS,
        }
    }
}
