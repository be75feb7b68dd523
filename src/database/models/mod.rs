pub mod code;
pub mod good_deed;
pub mod lot;
pub mod quiz;
pub mod user;

pub use code::*;
pub use good_deed::*;
pub use lot::*;
pub use quiz::*;
pub use user::*;
