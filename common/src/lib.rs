pub mod comparison;
pub mod currency;
pub mod item;
pub mod key_value;
pub mod list;
pub mod store;
pub mod supermarket;
