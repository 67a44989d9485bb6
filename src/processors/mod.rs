pub mod rft_merger;

pub use rft_merger::{merge_rft_ertobs, MergeSummary, RftMerger};
