use std::fmt;

/// Every key the storefront caches under.
///
/// The rendered strings are shared with other deployments of the API and
/// must not change.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum CacheKey {
    LatestProducts,
    Categories,
    AllProducts,
    Product(String),
    AllOrders,
    MyOrders(String),
    Order(String),
    AllCoupons,
    AdminStats,
    AdminPieChart,
    AdminBarChart,
    AdminLineChart,
}

impl CacheKey {
    pub fn product(id: impl fmt::Display) -> Self {
        Self::Product(id.to_string())
    }

    pub fn order(id: impl fmt::Display) -> Self {
        Self::Order(id.to_string())
    }

    pub fn my_orders(user_id: impl fmt::Display) -> Self {
        Self::MyOrders(user_id.to_string())
    }

    /// Keys holding product listings, independent of any single product
    pub const PRODUCT_LISTINGS: [CacheKey; 3] =
        [Self::LatestProducts, Self::Categories, Self::AllProducts];

    /// Keys holding admin dashboard payloads
    pub const ADMIN_CHARTS: [CacheKey; 4] = [
        Self::AdminStats,
        Self::AdminPieChart,
        Self::AdminLineChart,
        Self::AdminBarChart,
    ];
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::LatestProducts => f.write_str("latest-products"),
            Self::Categories => f.write_str("categories"),
            Self::AllProducts => f.write_str("all-products"),
            Self::Product(id) => write!(f, "product-{id}"),
            Self::AllOrders => f.write_str("all-orders"),
            Self::MyOrders(user_id) => write!(f, "my-orders-{user_id}"),
            Self::Order(id) => write!(f, "order-{id}"),
            Self::AllCoupons => f.write_str("all-coupons"),
            Self::AdminStats => f.write_str("admin-stats"),
            Self::AdminPieChart => f.write_str("admin-pie-chart"),
            Self::AdminBarChart => f.write_str("admin-bar-chart"),
            Self::AdminLineChart => f.write_str("admin-line-chart"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_strings() {
        let cases = [
            (CacheKey::LatestProducts, "latest-products"),
            (CacheKey::Categories, "categories"),
            (CacheKey::AllProducts, "all-products"),
            (CacheKey::product(42), "product-42"),
            (CacheKey::AllOrders, "all-orders"),
            (CacheKey::my_orders("u_1"), "my-orders-u_1"),
            (CacheKey::order(7), "order-7"),
            (CacheKey::AllCoupons, "all-coupons"),
            (CacheKey::AdminStats, "admin-stats"),
            (CacheKey::AdminPieChart, "admin-pie-chart"),
            (CacheKey::AdminBarChart, "admin-bar-chart"),
            (CacheKey::AdminLineChart, "admin-line-chart"),
        ];
        for (key, expected) in cases {
            assert_eq!(key.to_string(), expected);
        }
    }
}
