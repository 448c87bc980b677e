//! Users module - profiles and caller identity.

mod users_model;
mod users_service;
mod users_traits;

pub use users_model::{Identity, Language, NewUser, Role, User, UserSummary};
pub use users_service::UserService;
pub use users_traits::{UserRepositoryTrait, UserServiceTrait};
