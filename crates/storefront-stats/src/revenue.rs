use serde::{Deserialize, Serialize};

/// Share of marketing spend taken out of gross income, in percent.
const MARKETING_COST_PERCENT: f64 = 30.0;

/// Breakdown of gross order income for the revenue pie chart
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RevenueDistribution {
    pub net_margin: f64,
    pub discount: f64,
    /// Shipping charges
    pub production_cost: f64,
    /// Tax
    pub burnt: f64,
    pub marketing_cost: f64,
}

impl RevenueDistribution {
    pub fn new(gross_income: f64, discount: f64, shipping: f64, tax: f64) -> Self {
        let marketing_cost = (gross_income * MARKETING_COST_PERCENT / 100.0).round();
        Self {
            net_margin: gross_income - discount - shipping - tax - marketing_cost,
            discount,
            production_cost: shipping,
            burnt: tax,
            marketing_cost,
        }
    }
}
