pub mod account;
pub mod application;
