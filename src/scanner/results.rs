#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScanResults {
    /// Files extracted successfully, with or without chunks
    pub files_scanned: usize,
    /// Files excluded as tests
    pub files_skipped: usize,
    /// Files that could not be read or decoded
    pub files_failed: usize,
    pub chunks_written: usize,
    /// Unterminated bodies that were left out
    pub spans_dropped: usize,
}
