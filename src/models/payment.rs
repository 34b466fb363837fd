use serde::{Deserialize, Serialize};

use super::de;

/// Row of the backend's payment ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PaymentRecord {
    #[serde(rename = "Date", default)]
    pub date: Option<String>,
    #[serde(rename = "Seat No", default, deserialize_with = "de::label")]
    pub seat_no: String,
    #[serde(rename = "Name", default)]
    pub name: Option<String>,
    #[serde(rename = "Amount", default, deserialize_with = "de::amount")]
    pub amount: f64,
    #[serde(rename = "Payment Method", default)]
    pub payment_method: Option<String>,
    #[serde(rename = "Remarks", default)]
    pub remarks: Option<String>,
    #[serde(rename = "Invoice URL", default)]
    pub invoice_url: Option<String>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct DashboardTotals {
    #[serde(default, deserialize_with = "de::amount")]
    pub total_collected: f64,
    #[serde(default, deserialize_with = "de::amount")]
    pub total_expenses: f64,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct NetProfit {
    #[serde(default, deserialize_with = "de::amount")]
    pub net_profit: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct WhatsappLink {
    pub whatsapp_link: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn string_amounts_are_parsed_and_garbage_is_zero() {
        let rows: Vec<PaymentRecord> = serde_json::from_value(json!([
            { "Date": "2025-06-01", "Seat No": 4, "Amount": "800" },
            { "Date": "2025-06-02", "Seat No": "5_B", "Amount": "n/a" },
        ]))
        .unwrap();

        assert_eq!(rows[0].amount, 800.0);
        assert_eq!(rows[0].seat_no, "4");
        assert_eq!(rows[1].amount, 0.0);
    }

    #[test]
    fn totals_default_to_zero() {
        let totals: DashboardTotals = serde_json::from_value(json!({ "total_collected": 1200 })).unwrap();
        assert_eq!(totals.total_collected, 1200.0);
        assert_eq!(totals.total_expenses, 0.0);
    }
}
