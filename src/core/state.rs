//! Mutable player state: money, an ordered item multiset and a fact set.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::schema::event::{InventoryUpdated, ItemCount};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuntimeError {
    #[error("money would become negative: balance {balance}, change {delta}")]
    NegativeMoney { balance: i64, delta: i64 },
    #[error("money overflow: balance {balance}, change {delta}")]
    MoneyOverflow { balance: i64, delta: i64 },
    #[error("money threshold '{0}' is not an integer")]
    InvalidMoneyThreshold(String),
    #[error("money amount '{0}' is not an integer")]
    InvalidMoneyAmount(String),
    #[error("passage not found: {0}")]
    PassageNotFound(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub name: String,
    /// Always positive; an item at zero is removed.
    pub count: u32,
}

/// Player state owned by a story.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RuntimeState {
    money: i64,
    items: Vec<Item>,
    facts: FxHashSet<String>,
}

impl RuntimeState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn money(&self) -> i64 {
        self.money
    }

    /// Items in the order they were first acquired.
    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn facts(&self) -> &FxHashSet<String> {
        &self.facts
    }

    pub fn has_item(&self, name: &str) -> bool {
        self.items.iter().any(|item| item.name == name)
    }

    pub fn item_count(&self, name: &str) -> u32 {
        self.items
            .iter()
            .find(|item| item.name == name)
            .map_or(0, |item| item.count)
    }

    pub fn has_fact(&self, name: &str) -> bool {
        self.facts.contains(name)
    }

    /// Change the balance by `amount`. A change that would leave the balance
    /// negative is rejected and the balance is left untouched.
    pub fn add_money(&mut self, amount: i64) -> Result<(), RuntimeError> {
        let balance = self
            .money
            .checked_add(amount)
            .ok_or(RuntimeError::MoneyOverflow {
                balance: self.money,
                delta: amount,
            })?;
        if balance < 0 {
            return Err(RuntimeError::NegativeMoney {
                balance: self.money,
                delta: amount,
            });
        }
        self.money = balance;
        Ok(())
    }

    pub fn take_money(&mut self, amount: i64) -> Result<(), RuntimeError> {
        let delta = amount.checked_neg().ok_or(RuntimeError::MoneyOverflow {
            balance: self.money,
            delta: amount,
        })?;
        self.add_money(delta)
    }

    pub fn add_item(&mut self, name: &str) {
        match self.items.iter_mut().find(|item| item.name == name) {
            Some(item) => item.count += 1,
            None => self.items.push(Item {
                name: name.to_string(),
                count: 1,
            }),
        }
    }

    /// Remove one of `name`. Returns `false` when the item was not held.
    pub fn take_item(&mut self, name: &str) -> bool {
        let Some(index) = self.items.iter().position(|item| item.name == name) else {
            return false;
        };
        if self.items[index].count > 1 {
            self.items[index].count -= 1;
        } else {
            self.items.remove(index);
        }
        true
    }

    /// Facts only ever accumulate.
    pub fn add_fact(&mut self, name: &str) {
        if !self.facts.contains(name) {
            self.facts.insert(name.to_string());
        }
    }

    /// Snapshot of money and items for inventory listeners.
    pub fn inventory(&self) -> InventoryUpdated {
        InventoryUpdated {
            money: self.money,
            items: self
                .items
                .iter()
                .map(|item| ItemCount {
                    name: item.name.clone(),
                    count: item.count,
                })
                .collect(),
        }
    }
}
