//! Admin dashboard payloads.
//!
//! Each builder issues its store queries concurrently, then reduces the rows
//! with the helpers from `storefront_stats`. Handlers wrap these in the
//! read-through cache; nothing here touches the cache itself.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use storefront_db::{
    Gender, Order, OrderFilter, OrderStatus, ProductFilter, ProductPage, Role, Store, StoreError,
    UserFilter,
};
use storefront_stats::{
    age_on, calc_percentage, count_by_month, inventory_ratios, sum_by_month, AgeGroups,
    CategoryRatios, DateRange, RevenueDistribution, Window,
};

use crate::constants::LATEST_TRANSACTIONS_LIMIT;

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardStats {
    pub change_in_percentage: ChangeInPercentage,
    pub count: EntityCounts,
    pub chart: OrderChart,
    pub category_count: CategoryRatios,
    pub users_gender_ratio: GenderRatio,
    pub latest_transaction: Vec<Transaction>,
}

/// Month-over-month change, in percent
#[derive(Debug, Serialize, Deserialize)]
pub struct ChangeInPercentage {
    pub revenue: f64,
    pub product: f64,
    pub user: f64,
    pub order: f64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct EntityCounts {
    pub user: i64,
    pub product: i64,
    pub order: i64,
    pub revenue: f64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderChart {
    pub order_monthly_count: Vec<u64>,
    pub order_monthly_revenue: Vec<f64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct GenderRatio {
    pub male: i64,
    pub female: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct Transaction {
    #[serde(rename = "_id")]
    pub id: i64,
    pub discount: f64,
    pub amount: f64,
    /// Number of line items
    pub quantity: usize,
    pub status: OrderStatus,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PieCharts {
    pub order_fulfillment: OrderFulfillment,
    pub product_categories_ratio: CategoryRatios,
    pub stock_availability: StockAvailability,
    pub revenue_distribution: RevenueDistribution,
    pub users_age_group: AgeGroups,
    pub admin_customer: AdminCustomer,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct OrderFulfillment {
    pub processing: i64,
    pub shipped: i64,
    pub delivered: i64,
}

#[derive(Debug, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StockAvailability {
    pub in_stock: i64,
    pub out_of_stock: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct AdminCustomer {
    pub admin: i64,
    pub customer: i64,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct BarCharts {
    pub products: Vec<u64>,
    pub users: Vec<u64>,
    pub orders: Vec<u64>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct LineCharts {
    pub users: Vec<u64>,
    pub products: Vec<u64>,
    pub discount: Vec<f64>,
    pub revenue: Vec<f64>,
}

fn product_filter(range: DateRange) -> ProductFilter {
    ProductFilter {
        created_after: Some(range.start),
        created_before: Some(range.end),
        ..ProductFilter::default()
    }
}

fn order_filter(range: DateRange) -> OrderFilter {
    OrderFilter {
        created_after: Some(range.start),
        created_before: Some(range.end),
        ..OrderFilter::default()
    }
}

fn user_filter(range: DateRange) -> UserFilter {
    UserFilter {
        created_after: Some(range.start),
        created_before: Some(range.end),
        ..UserFilter::default()
    }
}

fn revenue(orders: &[Order]) -> f64 {
    orders.iter().map(|o| o.total).sum()
}

async fn category_ratios(store: &dyn Store, total: i64) -> Result<CategoryRatios, StoreError> {
    let categories = store.product_categories().await?;
    inventory_ratios(&categories, total, |category| async move {
        store.count_products(&ProductFilter::category(category)).await
    })
    .await
}

pub async fn stats(store: &dyn Store, now: DateTime<Utc>) -> Result<DashboardStats, StoreError> {
    let this_month = DateRange::this_month(now);
    let last_month = DateRange::last_month(now);
    let six_months = DateRange::trailing_months(now, 6);

    let all_products = ProductFilter::default();
    let all_users = UserFilter::default();
    let all_orders = OrderFilter::default();
    let female = UserFilter::gender(Gender::Female);
    let (products_now, products_before) = (product_filter(this_month), product_filter(last_month));
    let (users_now, users_before) = (user_filter(this_month), user_filter(last_month));
    let (orders_now, orders_before) = (order_filter(this_month), order_filter(last_month));
    let recent_orders = order_filter(six_months);

    let (
        this_month_products,
        last_month_products,
        this_month_users,
        last_month_users,
        this_month_orders,
        last_month_orders,
        product_count,
        user_count,
        orders,
        six_month_orders,
        female_count,
        latest,
    ) = tokio::try_join!(
        store.count_products(&products_now),
        store.count_products(&products_before),
        store.count_users(&users_now),
        store.count_users(&users_before),
        store.find_orders(&orders_now, None),
        store.find_orders(&orders_before, None),
        store.count_products(&all_products),
        store.count_users(&all_users),
        store.find_orders(&all_orders, None),
        store.find_orders(&recent_orders, None),
        store.count_users(&female),
        store.find_orders(&all_orders, Some(LATEST_TRANSACTIONS_LIMIT)),
    )?;

    let category_count = category_ratios(store, product_count).await?;

    let change_in_percentage = ChangeInPercentage {
        revenue: calc_percentage(revenue(&this_month_orders), revenue(&last_month_orders)),
        product: calc_percentage(this_month_products as f64, last_month_products as f64),
        user: calc_percentage(this_month_users as f64, last_month_users as f64),
        order: calc_percentage(
            this_month_orders.len() as f64,
            last_month_orders.len() as f64,
        ),
    };

    let count = EntityCounts {
        user: user_count,
        product: product_count,
        order: orders.len() as i64,
        revenue: revenue(&orders),
    };

    let chart = OrderChart {
        order_monthly_count: count_by_month(
            six_month_orders.iter().map(|o| o.created_at),
            Window::SixMonths,
            now,
        ),
        order_monthly_revenue: sum_by_month(
            six_month_orders.iter().map(|o| (o.created_at, o.total)),
            Window::SixMonths,
            now,
        ),
    };

    let latest_transaction = latest
        .into_iter()
        .map(|o| Transaction {
            id: o.id,
            discount: o.discount,
            amount: o.total,
            quantity: o.order_items.len(),
            status: o.status,
        })
        .collect();

    Ok(DashboardStats {
        change_in_percentage,
        count,
        chart,
        category_count,
        users_gender_ratio: GenderRatio {
            male: user_count - female_count,
            female: female_count,
        },
        latest_transaction,
    })
}

pub async fn pie(store: &dyn Store, now: DateTime<Utc>) -> Result<PieCharts, StoreError> {
    let processing_filter = OrderFilter::status(OrderStatus::Processing);
    let shipped_filter = OrderFilter::status(OrderStatus::Shipped);
    let delivered_filter = OrderFilter::status(OrderStatus::Delivered);
    let all_products = ProductFilter::default();
    let out_of_stock_filter = ProductFilter {
        out_of_stock: true,
        ..ProductFilter::default()
    };
    let all_orders = OrderFilter::default();
    let admin_filter = UserFilter::role(Role::Admin);
    let customer_filter = UserFilter::role(Role::User);
    let all_users = UserFilter::default();

    let (
        processing,
        shipped,
        delivered,
        product_count,
        out_of_stock,
        orders,
        admins,
        customers,
        users,
    ) = tokio::try_join!(
        store.count_orders(&processing_filter),
        store.count_orders(&shipped_filter),
        store.count_orders(&delivered_filter),
        store.count_products(&all_products),
        store.count_products(&out_of_stock_filter),
        store.find_orders(&all_orders, None),
        store.count_users(&admin_filter),
        store.count_users(&customer_filter),
        store.find_users(&all_users),
    )?;

    let product_categories_ratio = category_ratios(store, product_count).await?;

    let sum = |field: fn(&Order) -> f64| orders.iter().map(field).sum::<f64>();
    let revenue_distribution = RevenueDistribution::new(
        sum(|o| o.total),
        sum(|o| o.discount),
        sum(|o| o.shipping_charges),
        sum(|o| o.tax),
    );

    let today = now.date_naive();
    let users_age_group = AgeGroups::from_ages(users.iter().map(|u| age_on(u.dob, today)));

    Ok(PieCharts {
        order_fulfillment: OrderFulfillment {
            processing,
            shipped,
            delivered,
        },
        product_categories_ratio,
        stock_availability: StockAvailability {
            in_stock: product_count - out_of_stock,
            out_of_stock,
        },
        revenue_distribution,
        users_age_group,
        admin_customer: AdminCustomer {
            admin: admins,
            customer: customers,
        },
    })
}

pub async fn bar(store: &dyn Store, now: DateTime<Utc>) -> Result<BarCharts, StoreError> {
    let six_months = DateRange::trailing_months(now, 6);
    let twelve_months = DateRange::trailing_months(now, 12);

    let (product_range, user_range) = (product_filter(six_months), user_filter(six_months));
    let order_range = order_filter(twelve_months);
    let page = ProductPage::default();

    let (products, users, orders) = tokio::try_join!(
        store.find_products(&product_range, &page),
        store.find_users(&user_range),
        store.find_orders(&order_range, None),
    )?;

    Ok(BarCharts {
        products: count_by_month(products.iter().map(|p| p.created_at), Window::SixMonths, now),
        users: count_by_month(users.iter().map(|u| u.created_at), Window::SixMonths, now),
        orders: count_by_month(orders.iter().map(|o| o.created_at), Window::TwelveMonths, now),
    })
}

pub async fn line(store: &dyn Store, now: DateTime<Utc>) -> Result<LineCharts, StoreError> {
    let twelve_months = DateRange::trailing_months(now, 12);

    let order_range = order_filter(twelve_months);
    let user_range = user_filter(twelve_months);
    let product_range = product_filter(twelve_months);
    let page = ProductPage::default();

    let (orders, users, products) = tokio::try_join!(
        store.find_orders(&order_range, None),
        store.find_users(&user_range),
        store.find_products(&product_range, &page),
    )?;

    Ok(LineCharts {
        users: count_by_month(users.iter().map(|u| u.created_at), Window::TwelveMonths, now),
        products: count_by_month(products.iter().map(|p| p.created_at), Window::TwelveMonths, now),
        discount: sum_by_month(
            orders.iter().map(|o| (o.created_at, o.discount)),
            Window::TwelveMonths,
            now,
        ),
        revenue: sum_by_month(
            orders.iter().map(|o| (o.created_at, o.total)),
            Window::TwelveMonths,
            now,
        ),
    })
}
