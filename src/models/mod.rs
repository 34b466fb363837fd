pub mod seat;
pub mod payment;
pub mod expense;

pub use seat::{DayType, SeatRecord};
pub use payment::{DashboardTotals, NetProfit, PaymentRecord, WhatsappLink};
pub use expense::Expense;

/// Lenient deserializers for backend fields whose JSON type is not stable.
pub(crate) mod de {
    use serde::{Deserialize, Deserializer};
    use serde_json::Value;

    /// Seat labels arrive as strings or bare numbers; null becomes "".
    pub fn label<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            None | Some(Value::Null) => String::new(),
            Some(Value::String(s)) => s,
            Some(Value::Number(n)) => match n.as_f64() {
                Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
                _ => n.to_string(),
            },
            Some(other) => other.to_string(),
        })
    }

    /// Numbers or numeric strings; anything else is treated as absent.
    pub fn opt_amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<f64>, D::Error> {
        Ok(match Option::<Value>::deserialize(deserializer)? {
            Some(Value::Number(n)) => n.as_f64(),
            Some(Value::String(s)) => s.trim().parse::<f64>().ok().filter(|v| v.is_finite()),
            _ => None,
        })
    }

    /// Like `opt_amount`, but non-numeric values count as zero.
    pub fn amount<'de, D: Deserializer<'de>>(deserializer: D) -> Result<f64, D::Error> {
        opt_amount(deserializer).map(|v| v.unwrap_or(0.0))
    }
}
