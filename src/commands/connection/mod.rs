pub mod add;
pub mod manage;
pub mod model;
