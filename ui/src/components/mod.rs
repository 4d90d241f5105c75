pub mod api;
pub mod app;
pub mod browser_storage;
pub mod dish_recommendation;
pub mod grocery_list;
pub mod header;
pub mod item_recommendation;
pub mod list_state;
pub mod price_comparison;
pub mod supermarket_list;
