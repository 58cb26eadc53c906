use serde::Deserialize;
use serde::Deserializer;
use serde_json::Map;
use serde_json::Value;

use super::FieldKey;
use super::payload::parse_quantity;

/// Prior values the server wants the next form to start from.
///
/// Rebuilt from scratch for every form directive; it is never merged with
/// values a user typed into an earlier form. Every text field is coerced to
/// a (possibly empty) string and the quantity to a non-zero integer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormPrefill {
    pub full_name: String,
    pub email: String,
    pub phone: String,
    pub address: String,
    pub product_interest: String,
    pub quantity: i64,
}

impl Default for FormPrefill {
    fn default() -> Self {
        Self {
            full_name: String::new(),
            email: String::new(),
            phone: String::new(),
            address: String::new(),
            product_interest: String::new(),
            quantity: 1,
        }
    }
}

impl FormPrefill {
    /// Build a prefill from whatever the server put in `state`.
    ///
    /// Non-object values produce the default prefill. Unknown keys (order
    /// status and similar bookkeeping) are ignored.
    pub fn from_value(value: &Value) -> Self {
        match value {
            Value::Object(map) => Self::from_map(map),
            _ => Self::default(),
        }
    }

    fn from_map(map: &Map<String, Value>) -> Self {
        let text = |key: FieldKey| map.get(key.as_str()).map(coerce_text).unwrap_or_default();
        Self {
            full_name: text(FieldKey::FullName),
            email: text(FieldKey::Email),
            phone: text(FieldKey::Phone),
            address: text(FieldKey::Address),
            product_interest: text(FieldKey::ProductInterest),
            quantity: map
                .get(FieldKey::Quantity.as_str())
                .map_or(1, coerce_quantity),
        }
    }

    pub fn with_product(mut self, product: impl Into<String>) -> Self {
        self.product_interest = product.into();
        self
    }

    pub fn text(&self, key: FieldKey) -> &str {
        match key {
            FieldKey::FullName => &self.full_name,
            FieldKey::Email => &self.email,
            FieldKey::Phone => &self.phone,
            FieldKey::Address => &self.address,
            FieldKey::ProductInterest => &self.product_interest,
            FieldKey::Quantity => "",
        }
    }
}

impl<'de> Deserialize<'de> for FormPrefill {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        let value = Value::deserialize(deserializer)?;
        Ok(Self::from_value(&value))
    }
}

fn coerce_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Bool(false) => String::new(),
        Value::Number(n) if n.as_f64() == Some(0.0) => String::new(),
        Value::Bool(_) | Value::Number(_) => value.to_string(),
        // Arrays and objects have no sensible text form in an input box.
        Value::Array(_) | Value::Object(_) => String::new(),
    }
}

fn coerce_quantity(value: &Value) -> i64 {
    match value {
        Value::Number(n) => match n.as_i64() {
            Some(0) => 1,
            Some(q) => q,
            // Floats and integers past `i64` go through the submit-path parse.
            None => parse_quantity(&n.to_string()),
        },
        Value::String(s) => parse_quantity(s),
        _ => 1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    #[test]
    fn missing_and_null_fields_coerce_to_defaults() {
        let prefill = FormPrefill::from_value(&json!({
            "full_name": null,
            "email": "ada@example.com",
        }));
        assert_eq!(
            prefill,
            FormPrefill {
                email: "ada@example.com".to_string(),
                ..FormPrefill::default()
            }
        );
    }

    #[test]
    fn quantity_accepts_numbers_and_numeric_strings() {
        assert_eq!(FormPrefill::from_value(&json!({"quantity": 3})).quantity, 3);
        assert_eq!(FormPrefill::from_value(&json!({"quantity": "4"})).quantity, 4);
        assert_eq!(FormPrefill::from_value(&json!({"quantity": 2.7})).quantity, 2);
        assert_eq!(FormPrefill::from_value(&json!({"quantity": -2})).quantity, -2);
        assert_eq!(FormPrefill::from_value(&json!({"quantity": "-3"})).quantity, -3);
    }

    #[test]
    fn invalid_quantity_becomes_one() {
        for raw in [json!(0), json!(""), json!("lots"), json!(null), json!(false), json!([])] {
            assert_eq!(
                FormPrefill::from_value(&json!({ "quantity": raw })).quantity,
                1,
                "quantity {raw}"
            );
        }
    }

    #[test]
    fn non_object_state_is_default() {
        assert_eq!(FormPrefill::from_value(&json!("nope")), FormPrefill::default());
        assert_eq!(FormPrefill::from_value(&Value::Null), FormPrefill::default());
    }

    #[test]
    fn unknown_keys_are_ignored() {
        let prefill: FormPrefill = serde_json::from_value(json!({
            "product_interest": "Velvet Armchair",
            "status": "collecting",
        }))
        .unwrap();
        assert_eq!(prefill.product_interest, "Velvet Armchair");
    }

    #[test]
    fn scalar_text_values_are_stringified() {
        let prefill = FormPrefill::from_value(&json!({"phone": 5551234, "address": false}));
        assert_eq!(prefill.phone, "5551234");
        assert_eq!(prefill.address, "");
    }
}
