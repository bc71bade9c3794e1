//! Visible text and available links of a passage under the current state.

use crate::core::condition::all_hold;
use crate::core::state::RuntimeError;
use crate::core::story::{Link, LinkId, PassageId, Story};

impl Story {
    /// Concatenated text of every segment whose conditions hold, in order.
    pub fn content(&self, id: PassageId) -> Result<String, RuntimeError> {
        let mut content = String::new();
        for segment in self.passage(id).segments() {
            if all_hold(&segment.conditions, self.state())? {
                content.push_str(&segment.text);
            }
        }
        Ok(content)
    }

    /// Links currently offered from a passage, in authoring order.
    ///
    /// Links to an already visited one-time passage and links whose
    /// conditions fail are left out.
    pub fn links(&self, id: PassageId) -> Result<Vec<LinkId>, RuntimeError> {
        let mut available = Vec::new();
        for &link_id in self.passage(id).all_links() {
            if self.is_available(self.link(link_id))? {
                available.push(link_id);
            }
        }
        Ok(available)
    }

    fn is_available(&self, link: &Link) -> Result<bool, RuntimeError> {
        let target = self.passage(link.target());
        if target.is_one_time() && target.visited() {
            return Ok(false);
        }
        all_hold(link.conditions(), self.state())
    }
}

#[cfg(test)]
mod tests {
    use crate::core::parser::parse_story;
    use crate::core::story::Story;

    fn story(source: &str) -> Story {
        Story::from_raw(parse_story(source).unwrap()).unwrap()
    }

    #[test]
    fn hidden_block_appears_after_visit() {
        let mut story = story(":: Door\naddItem: key\n--\nHello.\n[if hasItem key]\nYou have a key.");
        let door = story.passage_id("Door").unwrap();

        assert_eq!(story.content(door).unwrap(), "Hello.\n");
        story.visit_passage(door).unwrap();
        assert_eq!(story.content(door).unwrap(), "Hello.\nYou have a key.\n");
    }

    #[test]
    fn else_branch_tracks_money() {
        let mut story = story(":: Bank\n[if hasMoney 100]\nRich.\n[else]\nPoor.\n[continue]");
        let bank = story.passage_id("Bank").unwrap();

        story.add_money(50).unwrap();
        assert_eq!(story.content(bank).unwrap(), "Poor.\n");
        story.add_money(100).unwrap();
        assert_eq!(story.content(bank).unwrap(), "Rich.\n");
    }

    #[test]
    fn conditional_links_follow_state() {
        let mut story = story(
            ":: Hall\n[if fact lit]\n> [[Stairs]]\n[continue]\n> [[Door]]\n:: Stairs\nUp.\n:: Door\nOut.\n",
        );
        let hall = story.passage_id("Hall").unwrap();

        let texts = |story: &Story| -> Vec<String> {
            story
                .links(hall)
                .unwrap()
                .into_iter()
                .map(|id| story.link(id).text().to_string())
                .collect()
        };

        assert_eq!(texts(&story), vec!["Door"]);
        story.add_fact("lit");
        assert_eq!(texts(&story), vec!["Stairs", "Door"]);
    }

    #[test]
    fn visited_one_time_targets_disappear() {
        let mut story = story(":: Square\n[[Fountain]]\n[[Inn]]\n:: Fountain [once]\nSplash.\n:: Inn\nWarm.\n");
        let square = story.passage_id("Square").unwrap();
        let fountain = story.passage_id("Fountain").unwrap();
        let inn = story.passage_id("Inn").unwrap();

        assert_eq!(story.links(square).unwrap().len(), 2);
        story.visit_passage(fountain).unwrap();
        story.visit_passage(inn).unwrap();

        let links = story.links(square).unwrap();
        assert_eq!(links.len(), 1);
        assert_eq!(story.link(links[0]).target(), inn);
    }

    #[test]
    fn content_is_stable_without_mutation() {
        let story = story(":: A\nOne.\n[unless fact x]\nTwo.\n[continue]\n[[B]]\n:: B\nEnd.\n");
        let a = story.passage_id("A").unwrap();
        assert_eq!(story.content(a).unwrap(), story.content(a).unwrap());
        assert_eq!(story.links(a).unwrap(), story.links(a).unwrap());
    }
}
