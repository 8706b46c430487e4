mod context;
pub use context::ExecutionContext;
mod handle;
pub use handle::Handle;
mod invoke_params;
pub use invoke_params::{ConvInvokeParams, FusedInvokeParams, InvokeParams};
mod invoker;
pub use invoker::{ConstructionParams, Invoker, InvokerFactory};
mod invoker_cache;
pub use invoker_cache::{CacheKey, InvokerCache};
