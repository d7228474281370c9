mod async_error;
mod async_state;
mod descriptor;
mod options;
mod state_container;
mod stream_ext;
pub mod mock;

#[cfg(test)]
mod unit_tests;

pub use async_error::*;
pub use async_state::*;
pub use descriptor::*;
pub use options::*;
pub use state_container::*;
pub use stream_ext::*;

use std::future::Future;
use std::pin::Pin;

/// The boxed future every wrapped operation is erased to.
pub type OperationFuture<T, E> = Pin<Box<dyn Future<Output = Result<T, E>> + Send + 'static>>;
