//! WASM bindings for story-engine: play a story from a web page.

use wasm_bindgen::prelude::*;

use story_engine::core::dialog::Dialog;
use story_engine::Story;

// Sample story compiled into the WASM binary.
const NEWBURYPORT: &str = include_str!("../../stories/newburyport.twee");
const NEWBURYPORT_START: &str = "Newburyport";

// ---------------------------------------------------------------------------
// JSON helper types for communication across the WASM boundary
// ---------------------------------------------------------------------------
#[derive(serde::Serialize)]
struct OptionInfo {
    index: usize,
    text: String,
    selected: bool,
    explored: bool,
}

#[derive(serde::Serialize)]
struct ItemInfo {
    name: String,
    count: u32,
}

#[derive(serde::Serialize)]
struct InventoryInfo {
    money: i64,
    items: Vec<ItemInfo>,
    facts: Vec<String>,
}

fn js_error(e: impl std::fmt::Display) -> JsError {
    JsError::new(&e.to_string())
}

#[wasm_bindgen]
pub struct StorySession {
    story: Story,
    dialog: Dialog,
}

#[wasm_bindgen]
impl StorySession {
    /// Load a script and enter `start`.
    #[wasm_bindgen(constructor)]
    pub fn new(script: &str, start: &str) -> Result<StorySession, JsError> {
        let mut story = Story::builder()
            .script(script)
            .start(start)
            .build()
            .map_err(|e| JsError::new(&format!("Story load error: {e}")))?;
        let dialog = Dialog::start(&mut story)
            .map_err(js_error)?
            .ok_or_else(|| JsError::new("Story has no start passage"))?;
        Ok(StorySession { story, dialog })
    }

    /// Session on the bundled sample story.
    pub fn demo() -> Result<StorySession, JsError> {
        Self::new(NEWBURYPORT, NEWBURYPORT_START)
    }

    pub fn title(&self) -> String {
        self.story.title().to_string()
    }

    /// Display title of the current passage.
    pub fn passage_title(&self) -> String {
        self.story.passage(self.dialog.passage()).display_title().to_string()
    }

    pub fn content(&self) -> Result<String, JsError> {
        self.story.content(self.dialog.passage()).map_err(js_error)
    }

    /// Visible options as a JSON array.
    pub fn options_json(&self) -> Result<String, JsError> {
        let mut options = Vec::new();
        for (index, option) in self
            .dialog
            .options(&self.story)
            .map_err(js_error)?
            .into_iter()
            .enumerate()
        {
            options.push(OptionInfo {
                index,
                explored: self.story.branch_complete(option.link).map_err(js_error)?,
                text: option.text,
                selected: option.selected,
            });
        }
        serde_json::to_string(&options).map_err(js_error)
    }

    pub fn is_finished(&self) -> Result<bool, JsError> {
        self.dialog.is_finished(&self.story).map_err(js_error)
    }

    pub fn select_next(&mut self) -> Result<(), JsError> {
        self.dialog.select_next(&self.story).map_err(js_error)
    }

    pub fn select_previous(&mut self) -> Result<(), JsError> {
        self.dialog.select_previous(&self.story).map_err(js_error)
    }

    pub fn select(&mut self, index: usize) -> Result<(), JsError> {
        self.dialog.select(&self.story, index).map_err(js_error)
    }

    /// Follow the selected option. Returns false when there was none.
    pub fn confirm(&mut self) -> Result<bool, JsError> {
        let moved = self.dialog.confirm(&mut self.story).map_err(js_error)?;
        Ok(moved.is_some())
    }

    pub fn inventory_json(&self) -> Result<String, JsError> {
        let state = self.story.state();
        let mut facts: Vec<String> = state.facts().iter().cloned().collect();
        facts.sort();
        let info = InventoryInfo {
            money: state.money(),
            items: state
                .items()
                .iter()
                .map(|item| ItemInfo {
                    name: item.name.clone(),
                    count: item.count,
                })
                .collect(),
            facts,
        };
        serde_json::to_string(&info).map_err(js_error)
    }
}
