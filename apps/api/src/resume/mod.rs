//! Resume editor core: section store, settings, generation, pagination.

pub mod handlers;
pub mod layout;
pub mod model;
pub mod settings;
pub mod store;
