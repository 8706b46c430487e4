use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DataType {
    U8,
    F16,
    F32,
}

impl DataType {
    pub fn bytes_per_element(&self) -> usize {
        match self {
            DataType::U8 => 1,
            DataType::F16 => 2,
            DataType::F32 => 4,
        }
    }

    // Short tag used when deriving network signatures
    pub fn tag(&self) -> &'static str {
        match self {
            DataType::U8 => "u8",
            DataType::F16 => "f16",
            DataType::F32 => "f32",
        }
    }
}
