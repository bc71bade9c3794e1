//! Passage visits and macro execution.

use tracing::trace;

use crate::core::state::RuntimeError;
use crate::core::story::{PassageId, Story};
use crate::schema::raw::{Macro, MacroKind};

impl Story {
    /// Mark a passage visited and run its macros in declared order.
    ///
    /// Revisiting is allowed and runs the macros again. The first failing
    /// macro stops execution; macros before it stay applied.
    pub fn visit_passage(&mut self, id: PassageId) -> Result<(), RuntimeError> {
        let passage = self.passage_mut(id);
        passage.visited = true;
        let macros = passage.macros().to_vec();
        trace!(passage = %self.passage(id).title(), macros = macros.len(), "visit passage");

        for m in &macros {
            self.execute_macro(m)?;
        }
        Ok(())
    }

    /// Apply one macro to the story state.
    pub fn execute_macro(&mut self, m: &Macro) -> Result<(), RuntimeError> {
        trace!(kind = m.kind.keyword(), value = %m.value, "execute macro");
        match m.kind {
            MacroKind::AddItem => self.add_item(&m.value),
            MacroKind::TakeItem => self.take_item(&m.value),
            MacroKind::AddFact => self.add_fact(&m.value),
            MacroKind::AddMoney => self.add_money(parse_amount(&m.value)?)?,
            MacroKind::TakeMoney => self.take_money(parse_amount(&m.value)?)?,
        }
        Ok(())
    }
}

fn parse_amount(value: &str) -> Result<i64, RuntimeError> {
    value
        .trim()
        .parse()
        .map_err(|_| RuntimeError::InvalidMoneyAmount(value.to_string()))
}

#[cfg(test)]
mod tests {
    use crate::core::parser::parse_story;
    use crate::core::state::RuntimeError;
    use crate::core::story::Story;
    use crate::schema::raw::{Macro, MacroKind};

    fn story(source: &str) -> Story {
        Story::from_raw(parse_story(source).unwrap()).unwrap()
    }

    #[test]
    fn visit_runs_macros_in_order() {
        let mut story = story(
            ":: Shop\naddMoney: 100\ntakeMoney: 30\naddItem: ticket\naddFact: bought\n--\nThanks.\n",
        );
        let shop = story.passage_id("Shop").unwrap();
        assert!(!story.passage(shop).visited());

        story.visit_passage(shop).unwrap();
        assert!(story.passage(shop).visited());
        assert_eq!(story.state().money(), 70);
        assert!(story.state().has_item("ticket"));
        assert!(story.state().has_fact("bought"));
    }

    #[test]
    fn revisit_runs_macros_again() {
        let mut story = story(":: Well\naddItem: coin\n--\nClink.\n");
        let well = story.passage_id("Well").unwrap();
        story.visit_passage(well).unwrap();
        story.visit_passage(well).unwrap();
        assert_eq!(story.state().item_count("coin"), 2);
    }

    #[test]
    fn overspending_stops_the_visit() {
        let mut story = story(":: Toll\ntakeMoney: 5\naddItem: pass\n--\nPay up.\n");
        let toll = story.passage_id("Toll").unwrap();

        let err = story.visit_passage(toll).unwrap_err();
        assert_eq!(
            err,
            RuntimeError::NegativeMoney {
                balance: 0,
                delta: -5
            }
        );
        assert_eq!(story.state().money(), 0);
        assert!(!story.state().has_item("pass"));
        assert!(story.passage(toll).visited());
    }

    #[test]
    fn malformed_amount_is_reported() {
        let mut story = story(":: A\nHi.\n");
        let err = story
            .execute_macro(&Macro {
                kind: MacroKind::AddMoney,
                value: "ten".to_string(),
            })
            .unwrap_err();
        assert_eq!(err, RuntimeError::InvalidMoneyAmount("ten".to_string()));
    }
}
