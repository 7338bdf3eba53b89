pub mod admins;
pub mod assignment;
pub mod batch_validation;
pub mod colleges;
pub mod security;
pub mod tenure;

pub use admins::*;
pub use security::*;
pub use assignment::*;
pub use batch_validation::*;
pub use colleges::*;
pub use tenure::*;
