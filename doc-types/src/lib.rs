pub mod codes;
pub mod datatypes;
pub mod node;
pub mod resources;

pub use codes::*;
pub use datatypes::*;
pub use node::*;
pub use resources::*;
