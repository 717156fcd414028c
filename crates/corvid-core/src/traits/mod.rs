pub mod directory;
pub mod post_source;

pub use self::{
    directory::{Account, AccountDirectory},
    post_source::{Post, PostSource},
};
