//! SeaORM entities.

pub mod document;
