pub mod frame;
pub mod message;
pub mod options;
pub mod track;

pub use frame::*;
pub use message::*;
pub use options::*;
pub use track::*;
