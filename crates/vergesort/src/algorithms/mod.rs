pub mod bidirectional;
pub mod buffer;
pub mod common;
pub mod heap_sort;
pub mod merge;
pub mod pdqsort_like;
pub mod quick_merge_sort;
pub mod random_access;
pub mod scan;
