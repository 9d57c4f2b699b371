pub mod model;
pub mod string;
