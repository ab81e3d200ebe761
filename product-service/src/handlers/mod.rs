pub mod health;
pub mod products;

pub use health::{health_check, metrics, readiness_check};
pub use products::{
    create_product, delete_product, get_product, list_products, missing_product_id,
    update_product,
};

pub async fn greeting() -> &'static str {
    "Hello there!"
}
