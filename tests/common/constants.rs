//! Shared payloads for end-to-end tests

pub const PIZZA: &str = "pizza";
pub const DRINKS: &str = "drinks";

/// `GET /categories` body with two categories
pub const CATEGORIES_BODY: &str = r#"["pizza", "drinks"]"#;

/// `GET /products?category=pizza` body, shaped like the real service
/// (extra fields included)
pub const PIZZA_PRODUCTS_BODY: &str = r#"[
    {"id": 1, "title": "Margherita", "description": "Tomato, mozzarella, basil",
     "image": "https://img.example/margherita.png", "price": 8.5,
     "category": "pizza", "rating": {"rate": 4.6, "count": 210}},
    {"id": 2, "title": "Diavola", "description": "Spicy salami",
     "image": "https://img.example/diavola.png", "price": 10.0,
     "category": "pizza", "rating": {"rate": 4.2, "count": 95}}
]"#;

/// A single extra pizza, for accumulation tests
pub const CALZONE_BODY: &str = r#"[
    {"title": "Calzone", "description": "Folded", "image": "https://img.example/calzone.png",
     "price": 11.5}
]"#;

pub const DRINKS_PRODUCTS_BODY: &str = r#"[
    {"title": "Cola", "description": "Cold", "image": "https://img.example/cola.png", "price": 2.0}
]"#;
