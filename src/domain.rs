pub mod colorizer;
pub mod entities;
pub mod rescaler;
pub mod use_cases;
