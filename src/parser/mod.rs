pub mod decoder;
pub mod helpers;
pub mod main;
pub mod position;
pub mod stream;

pub use decoder::*;
pub use main::*;
pub use position::*;
pub use stream::*;
