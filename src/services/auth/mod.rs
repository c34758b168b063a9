pub mod access_jwt;
pub mod bearer;
pub mod factory;
pub mod reporter;

#[cfg(test)]
pub mod testing;

pub use access_jwt::AuthService;
pub use factory::build_auth_service;
