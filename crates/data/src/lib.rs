//! Catalog loading and on-disk user snapshots.

pub mod load;
pub mod schema;
pub mod store;

pub use load::*;
pub use schema::*;
pub use store::*;
