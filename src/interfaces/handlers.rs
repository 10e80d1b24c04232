pub mod annotator;
pub mod system;
