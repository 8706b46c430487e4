mod conv_direct;
pub use conv_direct::{ConvDirectNaiveBwd, ConvDirectNaiveFwd, ConvDirectNaiveWrw};
mod db;
pub use db::SolverDb;
pub mod naive_cpu;
mod registry;
pub use registry::SolverRegistry;
mod solver;
pub use solver::{Solver, SolverConstruction};
