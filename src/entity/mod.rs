pub mod categories;
pub mod products;
pub mod profiles;
pub mod reviews;

pub use categories::Entity as Categories;
pub use products::Entity as Products;
pub use profiles::Entity as Profiles;
pub use reviews::Entity as Reviews;
