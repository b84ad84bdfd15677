//! Admin dashboard aggregates computed by scanning every document.

use domain::Timestamp;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Headline counters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AdminStats {
    pub users: usize,
    pub products: usize,
    pub orders: usize,
    pub revenue: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyUsers {
    pub month: String,
    pub users: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MonthlyRevenue {
    pub month: String,
    pub revenue: f64,
}

/// Everything the admin dashboard renders.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AdminAnalytics {
    pub stats: AdminStats,
    /// Sign-ups per month, in order of first appearance.
    pub monthly_users: Vec<MonthlyUsers>,
    /// Revenue per month, in order of first appearance.
    pub monthly_revenue: Vec<MonthlyRevenue>,
}

/// Builds the analytics from raw user and order documents.
///
/// Users are bucketed by `dateJoined`. Orders are bucketed by `createdAt`
/// (falling back to `date`); orders without a parsable time are counted
/// but contribute no revenue. An order's revenue is its `totalAmount`, or
/// the sum of `price * quantity` over its items when no total was stored.
pub fn compute_analytics(users: &[Value], product_count: usize, orders: &[Value]) -> AdminAnalytics {
    let mut monthly_users: Vec<MonthlyUsers> = Vec::new();
    for user in users {
        let Some(month) = month_of(user.get("dateJoined")) else {
            continue;
        };
        match monthly_users.iter_mut().find(|m| m.month == month) {
            Some(bucket) => bucket.users += 1,
            None => monthly_users.push(MonthlyUsers { month, users: 1 }),
        }
    }

    let mut total_revenue = 0.0;
    let mut monthly_revenue: Vec<MonthlyRevenue> = Vec::new();
    for order in orders {
        let created = order.get("createdAt").or_else(|| order.get("date"));
        let Some(month) = month_of(created) else {
            continue;
        };

        let revenue = order_revenue(order);
        total_revenue += revenue;
        match monthly_revenue.iter_mut().find(|m| m.month == month) {
            Some(bucket) => bucket.revenue += revenue,
            None => monthly_revenue.push(MonthlyRevenue { month, revenue }),
        }
    }

    for bucket in &mut monthly_revenue {
        bucket.revenue = round_cents(bucket.revenue);
    }

    AdminAnalytics {
        stats: AdminStats {
            users: users.len(),
            products: product_count,
            orders: orders.len(),
            revenue: round_cents(total_revenue),
        },
        monthly_users,
        monthly_revenue,
    }
}

fn month_of(value: Option<&Value>) -> Option<String> {
    let value = value.filter(|v| !v.is_null())?;
    let timestamp: Timestamp = serde_json::from_value(value.clone()).ok()?;
    timestamp.month_label()
}

fn order_revenue(order: &Value) -> f64 {
    if let Some(total) = order.get("totalAmount").and_then(Value::as_f64) {
        return total;
    }
    order
        .get("items")
        .and_then(Value::as_array)
        .map(|items| {
            items
                .iter()
                .map(|item| {
                    let price = item.get("price").and_then(Value::as_f64).unwrap_or(0.0);
                    let quantity = item.get("quantity").and_then(Value::as_f64).unwrap_or(1.0);
                    price * quantity
                })
                .sum()
        })
        .unwrap_or(0.0)
}

fn round_cents(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}
