mod command;
pub mod constants;
mod control;
mod packet;
mod transactions;

pub use command::*;
pub use constants::*;
pub use control::*;
pub use packet::*;
pub use transactions::*;
