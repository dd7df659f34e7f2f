pub mod direction;
pub mod marker;
pub mod point;
