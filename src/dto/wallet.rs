use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/*
{"success":true,"data":{"balance":"1250.50","currency":"INR"}}
*/
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct WalletBalance {
    #[serde(with = "super::decimal_serde")]
    pub balance: Decimal,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub currency: Option<String>,
}
