//! Callback delivery on a single main execution context.

mod dispatcher;
mod main_context;

pub use dispatcher::{CatalogDispatcher, RequestHandle};
pub use main_context::{main_context, MainContext, MainLoop};
