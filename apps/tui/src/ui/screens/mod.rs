pub mod details;
pub mod globe;
