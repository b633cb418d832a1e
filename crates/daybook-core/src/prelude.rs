pub use crate::app::App;
pub use daybook_types::prelude::*;

// vim: ts=4
