pub mod account;
pub mod post;
pub mod relationship;
