pub mod entry_scanner;
pub mod suffix_filter;

pub use entry_scanner::{EntryScanner, MatchSet, MatchedEntry, ScanStatistics};
pub use suffix_filter::{base_name, SuffixFilter};
