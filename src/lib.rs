pub mod compile;
pub mod config;
pub mod extract;
pub mod normalize;
pub mod schema;
pub mod web;
