// --- Catalogue ---

/// Number of products returned by the latest-products endpoint.
pub const LATEST_PRODUCTS_LIMIT: i64 = 5;

// --- Dashboard ---

/// Number of orders shown in the dashboard's latest transactions.
pub const LATEST_TRANSACTIONS_LIMIT: i64 = 4;

// --- Database ---

pub const DB_MAX_CONNECTIONS: u32 = 20;

// --- Payments ---

/// Currency for payment intents. Amounts are sent in its minor unit (paise).
pub const PAYMENT_CURRENCY: &str = "inr";

/// Placeholder customer registered with the processor for every checkout.
pub const DEFAULT_CUSTOMER_NAME: &str = "Default Name";
pub const DEFAULT_CUSTOMER_EMAIL: &str = "customer@example.com";
pub const DEFAULT_CUSTOMER_LINE1: &str = "123 Street";
pub const DEFAULT_CUSTOMER_CITY: &str = "City";
pub const DEFAULT_CUSTOMER_STATE: &str = "state";
pub const DEFAULT_CUSTOMER_POSTAL_CODE: &str = "12345";
pub const DEFAULT_CUSTOMER_COUNTRY: &str = "India";
