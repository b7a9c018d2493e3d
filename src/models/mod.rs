// Domain records and request validation

pub mod member;
pub mod session;
pub mod trainer;
pub mod validation;

pub use member::*;
pub use session::*;
pub use trainer::*;
pub use validation::*;
