use serde::{Deserialize, Serialize};

/// Read-only row of the customer reporting table.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Customer {
    pub customer_number: String,
    pub customer_name: String,
    #[serde(rename = "Age_Group")]
    pub age_group: String,
    pub customer_segment: String,
}

#[cfg(test)]
mod tests {
    use super::Customer;

    #[test]
    fn age_group_keeps_warehouse_column_casing() {
        let customer = Customer {
            customer_number: "AW00011000".to_string(),
            customer_name: "Jon Yang".to_string(),
            age_group: "50 and above".to_string(),
            customer_segment: "VIP".to_string(),
        };

        let value = serde_json::to_value(&customer).expect("serialize customer");

        assert_eq!(value["Age_Group"], "50 and above");
        assert!(value.get("age_group").is_none());
    }
}
