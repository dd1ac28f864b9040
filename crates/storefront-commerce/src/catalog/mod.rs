//! Product catalog module.
//!
//! Contains categories and the category tree service, products and the
//! product mapper, and the product query service.

mod categories;
mod category;
mod index;
mod mapper;
mod product;
mod products;

pub use categories::{CategoryService, CATEGORY_COLLECTION, CATEGORY_FIELDS};
pub use category::{Category, CategoryNode};
pub use index::CategoryIndex;
pub use mapper::{display_price, ProductMapper};
pub use product::{
    CategoryJunction, CategoryRef, FileObject, GalleryJunction, Link, ProductView, RawProduct,
    RawTag, RawVariant, TagJunction, VariantView,
};
pub use products::{ProductQuery, ProductService, PRODUCT_COLLECTION, PRODUCT_FIELDS};
