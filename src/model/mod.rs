//! The administrable models, each implementing [`Resource`](crud_framework::Resource).

pub mod flange;
pub mod strange_rabbit;

pub use flange::*;
pub use strange_rabbit::*;
