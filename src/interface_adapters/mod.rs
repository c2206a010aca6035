// Interface adapters: wire protocol and network handling.

pub mod net;
pub mod protocol;
pub mod state;
pub mod utils;
