pub mod building;
pub mod location;
pub mod request;
pub mod series;

pub use building::*;
pub use location::*;
pub use request::*;
pub use series::*;
