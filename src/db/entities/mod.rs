pub mod admin;
pub mod college;
pub mod member;
pub mod tenure_record;

pub mod prelude {
    pub use super::admin::{self, AdminRole, Entity as Admin};
    pub use super::college::{self, Entity as College};
    pub use super::member::{self, Entity as Member};
    pub use super::tenure_record::{self, Entity as TenureRecord};
}
