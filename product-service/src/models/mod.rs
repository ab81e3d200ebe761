pub mod product;

pub use product::{Product, ProductDraft, ProductId, ProductPatch};
