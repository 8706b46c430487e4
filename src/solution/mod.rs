mod serialize;
pub use serialize::SerializationMetadata;
mod solution;
pub use solution::{Solution, SolverId};
