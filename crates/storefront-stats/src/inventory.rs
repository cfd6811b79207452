use std::fmt;
use std::future::Future;

use futures::future::try_join_all;
use serde::de::{Deserialize, Deserializer, MapAccess, Visitor};
use serde::ser::{Serialize, SerializeMap, Serializer};

/// Share of total inventory per category, in input order.
///
/// Serializes as a JSON object whose keys keep the order of the categories
/// the ratios were computed for. Percentages are rounded individually and
/// need not add up to 100.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CategoryRatios(Vec<(String, i64)>);

impl CategoryRatios {
    pub fn get(&self, category: &str) -> Option<i64> {
        self.0
            .iter()
            .find(|(name, _)| name == category)
            .map(|(_, pct)| *pct)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, i64)> {
        self.0.iter().map(|(name, pct)| (name.as_str(), *pct))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl Serialize for CategoryRatios {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (name, pct) in &self.0 {
            map.serialize_entry(name, pct)?;
        }
        map.end()
    }
}

impl<'de> Deserialize<'de> for CategoryRatios {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        struct RatiosVisitor;

        impl<'de> Visitor<'de> for RatiosVisitor {
            type Value = CategoryRatios;

            fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str("a map of category to percentage")
            }

            fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<Self::Value, A::Error> {
                let mut entries = Vec::with_capacity(access.size_hint().unwrap_or(0));
                while let Some((name, pct)) = access.next_entry::<String, i64>()? {
                    entries.push((name, pct));
                }
                Ok(CategoryRatios(entries))
            }
        }

        deserializer.deserialize_map(RatiosVisitor)
    }
}

/// Rounded percentage of `count` in `total`. A zero total yields 0.
pub fn ratio_percent(count: i64, total: i64) -> i64 {
    if total <= 0 {
        return 0;
    }
    ((count as f64 / total as f64) * 100.0).round() as i64
}

/// Compute each category's share of `total_products`.
///
/// `count` is called once per category and the resulting queries run
/// concurrently; the first error aborts the whole computation.
pub async fn inventory_ratios<F, Fut, E>(
    categories: &[String],
    total_products: i64,
    count: F,
) -> Result<CategoryRatios, E>
where
    F: Fn(String) -> Fut,
    Fut: Future<Output = Result<i64, E>>,
{
    let counts = try_join_all(categories.iter().cloned().map(&count)).await?;

    Ok(CategoryRatios(
        categories
            .iter()
            .zip(counts)
            .map(|(category, n)| (category.clone(), ratio_percent(n, total_products)))
            .collect(),
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;
    use std::convert::Infallible;

    async fn ratios(counts: &[(&str, i64)], total: i64) -> CategoryRatios {
        let table: HashMap<String, i64> = counts
            .iter()
            .map(|(name, n)| (name.to_string(), *n))
            .collect();
        let categories: Vec<String> = counts.iter().map(|(name, _)| name.to_string()).collect();
        inventory_ratios(&categories, total, |category| {
            let n = table.get(&category).copied().unwrap_or(0);
            async move { Ok::<_, Infallible>(n) }
        })
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn test_even_split() {
        let result = ratios(&[("a", 2), ("b", 2)], 4).await;
        assert_eq!(result.get("a"), Some(50));
        assert_eq!(result.get("b"), Some(50));
    }

    #[tokio::test]
    async fn test_rounds_per_entry() {
        let result = ratios(&[("a", 1)], 3).await;
        assert_eq!(result.get("a"), Some(33));

        // Three thirds round to 33 each and do not add up to 100
        let result = ratios(&[("a", 1), ("b", 1), ("c", 1)], 3).await;
        assert_eq!(result.iter().map(|(_, p)| p).sum::<i64>(), 99);
    }

    #[tokio::test]
    async fn test_zero_total_yields_zero() {
        let result = ratios(&[("a", 0), ("b", 0)], 0).await;
        assert_eq!(result.get("a"), Some(0));
        assert_eq!(result.get("b"), Some(0));
    }

    #[tokio::test]
    async fn test_serializes_in_input_order() {
        let result = ratios(&[("zebra", 1), ("apple", 1)], 2).await;
        let json = serde_json::to_string(&result).unwrap();
        assert_eq!(json, r#"{"zebra":50,"apple":50}"#);
    }

    #[tokio::test]
    async fn test_count_error_propagates() {
        let categories = vec!["a".to_string(), "b".to_string()];
        let result = inventory_ratios(&categories, 10, |category| async move {
            if category == "b" {
                Err("count failed")
            } else {
                Ok(5)
            }
        })
        .await;
        assert_eq!(result, Err("count failed"));
    }

    #[tokio::test]
    async fn test_deserialize_keeps_order() {
        let result = ratios(&[("zebra", 3), ("apple", 1)], 4).await;
        let json = serde_json::to_string(&result).unwrap();
        let back: CategoryRatios = serde_json::from_str(&json).unwrap();
        assert_eq!(back, result);
        assert_eq!(back.iter().next(), Some(("zebra", 75)));
    }

    #[test]
    fn test_ratio_percent() {
        assert_eq!(ratio_percent(2, 3), 67);
        assert_eq!(ratio_percent(0, 5), 0);
        assert_eq!(ratio_percent(5, 0), 0);
    }
}
