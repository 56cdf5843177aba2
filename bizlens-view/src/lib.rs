mod registry;
mod view;

pub use registry::ViewRegistry;
pub use view::{parse_params, Result, View, ViewError, ViewOutput};
