pub mod axis;
pub mod human;
