mod convert;
mod provider;

pub use convert::*;
pub use provider::*;
