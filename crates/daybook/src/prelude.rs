pub use daybook_core::prelude::*;

// vim: ts=4
