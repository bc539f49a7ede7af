//! Card pack draw resolution. Keep this crate free of IO and platform concerns.

pub mod catalog;
pub mod config;
pub mod draw;
pub mod inventory;
pub mod ledger;
pub mod persistence;
pub mod player;
pub mod rarity;
pub mod rng;
pub mod session;
pub mod synthetic;

pub use catalog::*;
pub use config::*;
pub use draw::*;
pub use inventory::*;
pub use ledger::*;
pub use persistence::*;
pub use player::*;
pub use rarity::*;
pub use rng::*;
pub use session::*;
pub use synthetic::*;
