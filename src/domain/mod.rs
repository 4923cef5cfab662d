mod display;
mod filter;
mod ledger;
mod money;
mod transaction;

pub use display::*;
pub use filter::*;
pub use ledger::*;
pub use money::*;
pub use transaction::*;
