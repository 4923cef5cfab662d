// Application layer: the ledger store and what it hands to presentation.

pub mod error;
pub mod store;
pub mod view;

pub use error::*;
pub use store::*;
pub use view::*;
