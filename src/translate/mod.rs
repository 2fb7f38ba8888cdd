pub mod interface;
pub mod google;
pub mod libre;
pub mod factory;

pub use interface::*;
pub use factory::*;
