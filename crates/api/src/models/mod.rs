//! Domain models for the API service.

pub mod cart;
pub mod catalog;
pub mod order;
pub mod user;

pub use cart::{Cart, CartItem, CartItemView, PricedCartLine};
pub use catalog::{Category, CategoryInput, Product, ProductInput};
pub use order::{NewOrderItem, Order, OrderItem, OrderSnapshot, build_order_lines};
pub use user::User;
