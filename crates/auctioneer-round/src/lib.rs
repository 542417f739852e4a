pub mod dispatch;
pub mod solicit;
pub mod winner;

pub use dispatch::*;
pub use solicit::*;
pub use winner::*;
