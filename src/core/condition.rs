//! Condition evaluation against the runtime state.

use crate::core::state::{RuntimeError, RuntimeState};
use crate::schema::raw::{Condition, ConditionKind};

/// Evaluate one condition.
pub fn test(condition: &Condition, state: &RuntimeState) -> Result<bool, RuntimeError> {
    let holds = match condition.kind {
        ConditionKind::HasItem => state.has_item(&condition.value),
        ConditionKind::HasMoney => {
            let threshold: i64 = condition
                .value
                .trim()
                .parse()
                .map_err(|_| RuntimeError::InvalidMoneyThreshold(condition.value.clone()))?;
            state.money() >= threshold
        }
        ConditionKind::Fact => state.has_fact(&condition.value),
    };
    Ok(holds == condition.positive)
}

/// True when every condition holds. An empty list always holds.
pub fn all_hold(conditions: &[Condition], state: &RuntimeState) -> Result<bool, RuntimeError> {
    for condition in conditions {
        if !test(condition, state)? {
            return Ok(false);
        }
    }
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> RuntimeState {
        let mut state = RuntimeState::new();
        state.add_item("key");
        state.add_money(50).unwrap();
        state.add_fact("day2");
        state
    }

    #[test]
    fn has_item_respects_polarity() {
        let state = state();
        assert!(test(&Condition::new(true, ConditionKind::HasItem, "key"), &state).unwrap());
        assert!(!test(&Condition::new(false, ConditionKind::HasItem, "key"), &state).unwrap());
        assert!(test(&Condition::new(false, ConditionKind::HasItem, "lamp"), &state).unwrap());
    }

    #[test]
    fn has_money_is_inclusive() {
        let state = state();
        assert!(test(&Condition::new(true, ConditionKind::HasMoney, "50"), &state).unwrap());
        assert!(!test(&Condition::new(true, ConditionKind::HasMoney, "51"), &state).unwrap());
        assert!(test(&Condition::new(false, ConditionKind::HasMoney, "100"), &state).unwrap());
    }

    #[test]
    fn fact_lookup() {
        let state = state();
        assert!(test(&Condition::new(true, ConditionKind::Fact, "day2"), &state).unwrap());
        assert!(!test(&Condition::new(true, ConditionKind::Fact, "day3"), &state).unwrap());
    }

    #[test]
    fn bad_threshold_is_an_error() {
        let err = test(
            &Condition::new(true, ConditionKind::HasMoney, "lots"),
            &state(),
        )
        .unwrap_err();
        assert_eq!(err, RuntimeError::InvalidMoneyThreshold("lots".to_string()));
    }

    #[test]
    fn all_hold_is_conjunction() {
        let state = state();
        let both = vec![
            Condition::new(true, ConditionKind::HasItem, "key"),
            Condition::new(true, ConditionKind::Fact, "day2"),
        ];
        assert!(all_hold(&both, &state).unwrap());

        let one_fails = vec![
            Condition::new(true, ConditionKind::HasItem, "key"),
            Condition::new(true, ConditionKind::Fact, "day3"),
        ];
        assert!(!all_hold(&one_fails, &state).unwrap());
        assert!(all_hold(&[], &state).unwrap());
    }

    #[test]
    fn short_circuit_skips_later_errors() {
        let conditions = vec![
            Condition::new(true, ConditionKind::Fact, "missing"),
            Condition::new(true, ConditionKind::HasMoney, "not a number"),
        ];
        assert!(!all_hold(&conditions, &state()).unwrap());
    }
}
