pub mod annotator;
pub mod extractors;
pub mod label_policy;
pub mod scroller;
