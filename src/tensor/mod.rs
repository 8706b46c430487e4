mod buffer;
pub use buffer::Buffer;
mod data_type;
pub use data_type::DataType;
mod tensor_desc;
pub use tensor_desc::TensorDesc;
