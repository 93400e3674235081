pub mod catalog_service;
pub mod category_service;
pub mod detail_service;
pub mod filter;
pub mod listing_service;
pub mod product_service;
pub mod profile_service;
pub mod review_service;
pub mod session_service;
