use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Forward,
    Backward,
    BackwardWeights,
}

impl Direction {
    // Short tag used when deriving network signatures
    pub fn tag(&self) -> &'static str {
        match self {
            Direction::Forward => "F",
            Direction::Backward => "B",
            Direction::BackwardWeights => "W",
        }
    }
}
