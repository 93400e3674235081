//! In-process narrowing of an already loaded catalog.

use crate::{dto::categories::CategoryFilterOption, models::ProductCard};

pub const ALL_CATEGORIES: &str = "all";

/// Category buttons offered by the marketplace filter bar, in display order.
pub const CATEGORY_FILTERS: &[CategoryFilterOption] = &[
    CategoryFilterOption { name: "All", slug: "all" },
    CategoryFilterOption { name: "Mobile", slug: "mobile" },
    CategoryFilterOption { name: "Laptop", slug: "laptop" },
    CategoryFilterOption { name: "Tablet", slug: "tablet" },
    CategoryFilterOption { name: "Desktop", slug: "desktop" },
    CategoryFilterOption { name: "Camera", slug: "camera" },
    CategoryFilterOption { name: "Headphone", slug: "headphone" },
    CategoryFilterOption { name: "Smart Watch", slug: "smart-watch" },
    CategoryFilterOption { name: "Refrigerator", slug: "refrigerator" },
    CategoryFilterOption { name: "Furniture", slug: "furniture" },
    CategoryFilterOption { name: "Cycle", slug: "cycle" },
    CategoryFilterOption { name: "Book", slug: "book" },
    CategoryFilterOption { name: "Stationery", slug: "stationery" },
    CategoryFilterOption { name: "Sports Item", slug: "sports-item" },
    CategoryFilterOption { name: "Kitchen Item", slug: "kitchen-item" },
    CategoryFilterOption { name: "Beauty Product", slug: "beauty-product" },
    CategoryFilterOption { name: "Home Decor", slug: "home-decor" },
    CategoryFilterOption { name: "Electronics", slug: "electronics" },
];

/// Lower-case `name` and join its whitespace-separated words with hyphens.
pub fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

pub fn matches_category(product: &ProductCard, slug: &str) -> bool {
    if slug == ALL_CATEGORIES {
        return true;
    }
    product
        .category
        .as_deref()
        .is_some_and(|name| slugify(name) == slug)
}

pub fn matches_query(product: &ProductCard, query: &str) -> bool {
    query.is_empty() || product.title.to_lowercase().contains(&query.to_lowercase())
}

/// Keep the products in `slug` whose title contains `query`, preserving order.
pub fn filter_products(products: &[ProductCard], slug: &str, query: &str) -> Vec<ProductCard> {
    products
        .iter()
        .filter(|p| matches_category(p, slug) && matches_query(p, query))
        .cloned()
        .collect()
}
