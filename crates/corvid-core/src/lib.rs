pub mod consts;
pub mod traits;
