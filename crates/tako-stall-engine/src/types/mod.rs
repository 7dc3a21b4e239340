/*
[INPUT]:  Menu vocabulary and order line shapes
[OUTPUT]: Typed Rust structs/enums with serialization support
[POS]:    Data layer - type definitions shared across engine modules
[UPDATE]: When menu items or line fields change
*/

pub mod enums;
pub mod models;

pub use enums::*;
pub use models::*;
