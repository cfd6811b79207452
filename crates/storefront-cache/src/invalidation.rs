//! Mapping from a write to the cache keys it makes stale.

use std::collections::BTreeSet;

use crate::keys::CacheKey;

/// Describes a write for the purpose of cache invalidation.
///
/// The three flags are independent. `admin` starts out set because almost
/// every write moves at least one dashboard figure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvalidationEvent {
    pub product: bool,
    pub order: bool,
    pub admin: bool,
    pub user_id: Option<String>,
    pub order_id: Option<String>,
    pub product_ids: Vec<String>,
}

impl Default for InvalidationEvent {
    fn default() -> Self {
        Self {
            product: false,
            order: false,
            admin: true,
            user_id: None,
            order_id: None,
            product_ids: Vec::new(),
        }
    }
}

impl InvalidationEvent {
    /// A product write, optionally naming the products touched
    pub fn product<I, S>(ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        Self {
            product: true,
            product_ids: ids.into_iter().map(|id| id.to_string()).collect(),
            ..Self::default()
        }
    }

    /// An order write for the given user and order
    pub fn order(user_id: Option<String>, order_id: Option<String>) -> Self {
        Self {
            order: true,
            user_id,
            order_id,
            ..Self::default()
        }
    }

    /// Also treat the event as a product write for `ids`
    pub fn with_products<I, S>(mut self, ids: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: ToString,
    {
        self.product = true;
        self.product_ids
            .extend(ids.into_iter().map(|id| id.to_string()));
        self
    }

    pub fn without_admin(mut self) -> Self {
        self.admin = false;
        self
    }

    /// Keys that must be evicted for this event.
    ///
    /// Order keys whose id is unknown are skipped; there is nothing cached
    /// under them.
    pub fn stale_keys(&self) -> BTreeSet<CacheKey> {
        let mut keys = BTreeSet::new();

        if self.product {
            keys.extend(CacheKey::PRODUCT_LISTINGS);
            keys.extend(self.product_ids.iter().map(CacheKey::product));
        }

        if self.order {
            keys.insert(CacheKey::AllOrders);
            if let Some(user_id) = &self.user_id {
                keys.insert(CacheKey::my_orders(user_id));
            }
            if let Some(order_id) = &self.order_id {
                keys.insert(CacheKey::order(order_id));
            }
        }

        if self.admin {
            keys.extend(CacheKey::ADMIN_CHARTS);
        }

        keys
    }
}
