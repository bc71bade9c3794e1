use serde::{Deserialize, Serialize};

/// One inventory line as reported to listeners.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemCount {
    pub name: String,
    pub count: u32,
}

/// Emitted after every executed money or item mutation.
///
/// Delivery is synchronous and happens after the mutation is applied, so
/// the totals always match the story state at the time of the call.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct InventoryUpdated {
    pub money: i64,
    pub items: Vec<ItemCount>,
}

impl InventoryUpdated {
    pub fn count_of(&self, name: &str) -> u32 {
        self.items
            .iter()
            .find(|item| item.name == name)
            .map_or(0, |item| item.count)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn count_of_missing_item_is_zero() {
        let event = InventoryUpdated {
            money: 5,
            items: vec![ItemCount {
                name: "key".to_string(),
                count: 2,
            }],
        };
        assert_eq!(event.count_of("key"), 2);
        assert_eq!(event.count_of("lamp"), 0);
    }
}
