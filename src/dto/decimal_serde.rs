//! Decimal amounts on the wire.
//!
//! The backend sends money either as JSON numbers or as numeric strings
//! (`"100.00"`). Both are read into an exact `Decimal`; amounts are always
//! written back as JSON numbers without going through `f64`.

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::str::FromStr;

fn to_number(value: &Decimal) -> Result<serde_json::Number, String> {
    serde_json::Number::from_str(&value.normalize().to_string()).map_err(|e| e.to_string())
}

fn from_value(value: Value) -> Result<Decimal, String> {
    match value {
        Value::Number(num) => {
            let text = num.to_string();
            Decimal::from_str(&text)
                .or_else(|_| Decimal::from_scientific(&text))
                .map_err(|e| e.to_string())
        }
        Value::String(text) => Decimal::from_str(text.trim()).map_err(|e| e.to_string()),
        other => Err(format!("expected a decimal amount, got {other}")),
    }
}

pub fn serialize<S>(value: &Decimal, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    to_number(value)
        .map_err(serde::ser::Error::custom)?
        .serialize(serializer)
}

pub fn deserialize<'de, D>(deserializer: D) -> Result<Decimal, D::Error>
where
    D: Deserializer<'de>,
{
    from_value(Value::deserialize(deserializer)?).map_err(serde::de::Error::custom)
}

pub mod option {
    use rust_decimal::Decimal;
    use serde::{Deserialize, Deserializer, Serializer};
    use serde_json::Value;

    pub fn serialize<S>(value: &Option<Decimal>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(d) => {
                let num = super::to_number(d).map_err(serde::ser::Error::custom)?;
                serializer.serialize_some(&num)
            }
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
    where
        D: Deserializer<'de>,
    {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(None),
            value => super::from_value(value)
                .map(Some)
                .map_err(serde::de::Error::custom),
        }
    }
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;
    use serde::{Deserialize, Serialize};

    #[derive(Debug, Serialize, Deserialize, PartialEq)]
    struct Amount {
        #[serde(with = "super")]
        amount: Decimal,
        #[serde(with = "super::option", default)]
        payout: Option<Decimal>,
    }

    #[test]
    fn test_reads_numbers_and_strings() {
        let a: Amount = serde_json::from_str(r#"{"amount": 12.5, "payout": "25.00"}"#).unwrap();
        assert_eq!(a.amount, dec!(12.5));
        assert_eq!(a.payout, Some(dec!(25.00)));

        let b: Amount = serde_json::from_str(r#"{"amount": "100"}"#).unwrap();
        assert_eq!(b.amount, dec!(100));
        assert_eq!(b.payout, None);
    }

    #[test]
    fn test_writes_plain_numbers() {
        let a = Amount {
            amount: dec!(20.00),
            payout: None,
        };
        assert_eq!(
            serde_json::to_string(&a).unwrap(),
            r#"{"amount":20,"payout":null}"#
        );

        let b = Amount {
            amount: dec!(0.1),
            payout: Some(dec!(19.6)),
        };
        assert_eq!(
            serde_json::to_string(&b).unwrap(),
            r#"{"amount":0.1,"payout":19.6}"#
        );
    }

    #[test]
    fn test_rejects_non_numeric() {
        assert!(serde_json::from_str::<Amount>(r#"{"amount": true}"#).is_err());
        assert!(serde_json::from_str::<Amount>(r#"{"amount": "abc"}"#).is_err());
    }
}
