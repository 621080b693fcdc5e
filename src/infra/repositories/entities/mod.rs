//! SeaORM entity definitions.
//!
//! Database-specific row types, kept separate from the domain models
//! they map into.

pub mod user;

#[allow(unused_imports)]
pub use user::{ActiveModel as UserActiveModel, Entity as UserEntity, Model as UserModel};
