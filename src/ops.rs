pub mod merge_all;

pub use merge_all::{merge, MergeAll, MergeAllOp};
