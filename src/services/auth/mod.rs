pub mod factory;
pub mod principal;

pub use factory::build_jwt_strategy;
