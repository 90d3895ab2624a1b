pub mod check;
pub mod progress;
pub mod search;
