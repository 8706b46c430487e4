pub mod error;
pub mod numerics;
