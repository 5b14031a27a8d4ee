//! MySQL repository implementations.

mod blacklist_repository_impl;
mod role_repository_impl;
mod token_repository_impl;
mod user_repository_impl;

pub use blacklist_repository_impl::MySqlBlacklistRepository;
pub use role_repository_impl::MySqlRoleRepository;
pub use token_repository_impl::MySqlTokenRepository;
pub use user_repository_impl::MySqlUserRepository;
