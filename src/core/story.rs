//! The interpretable story graph.
//!
//! The story owns every passage and link in two arenas. Links refer to their
//! source and target passages through [`PassageId`] handles, so cycles in
//! the passage graph never become ownership cycles.

use std::fmt;

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, warn};

use crate::core::loader::StoryBuilder;
use crate::core::state::{RuntimeError, RuntimeState};
use crate::schema::event::InventoryUpdated;
use crate::schema::raw::{
    Condition, Macro, RawLink, RawStory, Segment, TAG_BACK, TAG_EXIT, TAG_ONCE,
};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BuildError {
    #[error("passage '{passage}': link '{text}' targets unknown passage '{target}'")]
    LinkTargetNotFound {
        passage: String,
        text: String,
        target: String,
    },
    #[error("duplicate passage title: {0}")]
    DuplicatePassage(String),
}

/// Handle to a passage in a [`Story`].
///
/// Handles only come from the story that owns the passage:
///
/// ```compile_fail
/// let _ = story_engine::PassageId(0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PassageId(pub(crate) usize);

/// Handle to a link in a [`Story`].
///
/// ```compile_fail
/// let _ = story_engine::LinkId(0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct LinkId(pub(crate) usize);

/// Callback receiving inventory notifications.
pub type InventoryListener = Box<dyn FnMut(&InventoryUpdated)>;

#[derive(Debug, Clone)]
pub struct Passage {
    id: PassageId,
    title: String,
    header: String,
    segments: Vec<Segment>,
    macros: Vec<Macro>,
    links: Vec<LinkId>,
    is_one_time: bool,
    pub(crate) visited: bool,
}

impl Passage {
    pub fn id(&self) -> PassageId {
        self.id
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    /// Header text set with `setTitle`; empty when none was given.
    pub fn header(&self) -> &str {
        &self.header
    }

    /// The header when set, otherwise the title.
    pub fn display_title(&self) -> &str {
        if self.header.is_empty() {
            &self.title
        } else {
            &self.header
        }
    }

    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn macros(&self) -> &[Macro] {
        &self.macros
    }

    /// Every outgoing link regardless of visibility, in authoring order.
    pub fn all_links(&self) -> &[LinkId] {
        &self.links
    }

    /// Tagged `once`: links to it disappear after the first visit.
    pub fn is_one_time(&self) -> bool {
        self.is_one_time
    }

    pub fn visited(&self) -> bool {
        self.visited
    }
}

#[derive(Debug, Clone)]
pub struct Link {
    id: LinkId,
    source: PassageId,
    text: String,
    target: PassageId,
    conditions: Vec<Condition>,
    tags: Vec<String>,
    pub(crate) visited: bool,
}

impl Link {
    pub fn id(&self) -> LinkId {
        self.id
    }

    /// The passage this link belongs to.
    pub fn source(&self) -> PassageId {
        self.source
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn target(&self) -> PassageId {
        self.target
    }

    pub fn conditions(&self) -> &[Condition] {
        &self.conditions
    }

    pub fn tags(&self) -> &[String] {
        &self.tags
    }

    pub fn visited(&self) -> bool {
        self.visited
    }

    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }

    pub fn is_exit(&self) -> bool {
        self.has_tag(TAG_EXIT)
    }

    pub fn is_back(&self) -> bool {
        self.has_tag(TAG_BACK)
    }
}

/// A story graph plus the player state it is being played with.
pub struct Story {
    title: String,
    passages: Vec<Passage>,
    links: Vec<Link>,
    index: FxHashMap<String, PassageId>,
    start: Option<PassageId>,
    state: RuntimeState,
    listeners: Vec<InventoryListener>,
}

impl fmt::Debug for Story {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Story")
            .field("title", &self.title)
            .field("passages", &self.passages.len())
            .field("links", &self.links.len())
            .field("start", &self.start)
            .field("state", &self.state)
            .field("listeners", &self.listeners.len())
            .finish()
    }
}

impl Story {
    pub fn builder() -> StoryBuilder {
        StoryBuilder::default()
    }

    /// Build the graph from a parsed script.
    ///
    /// All passages are created before any link is resolved, so links may
    /// point forward. Unknown targets and duplicate titles are rejected.
    pub fn from_raw(raw: RawStory) -> Result<Story, BuildError> {
        let mut passages = Vec::with_capacity(raw.passages.len());
        let mut index = FxHashMap::default();
        let mut pending: Vec<Vec<RawLink>> = Vec::with_capacity(raw.passages.len());

        for raw_passage in raw.passages {
            let id = PassageId(passages.len());
            if index.insert(raw_passage.title.clone(), id).is_some() {
                return Err(BuildError::DuplicatePassage(raw_passage.title));
            }

            passages.push(Passage {
                id,
                is_one_time: raw_passage.has_tag(TAG_ONCE),
                title: raw_passage.title,
                header: raw_passage.header,
                segments: raw_passage.segments,
                macros: raw_passage.macros,
                links: Vec::new(),
                visited: false,
            });
            pending.push(raw_passage.links);
        }

        let mut links = Vec::new();
        for (passage, raw_links) in passages.iter_mut().zip(pending) {
            for raw_link in raw_links {
                let target = *index.get(&raw_link.target).ok_or_else(|| {
                    BuildError::LinkTargetNotFound {
                        passage: passage.title.clone(),
                        text: raw_link.text.clone(),
                        target: raw_link.target.clone(),
                    }
                })?;

                let id = LinkId(links.len());
                passage.links.push(id);
                links.push(Link {
                    id,
                    source: passage.id,
                    text: raw_link.text,
                    target,
                    conditions: raw_link.conditions,
                    tags: raw_link.tags,
                    visited: false,
                });
            }
        }

        debug!(
            title = %raw.title,
            passages = passages.len(),
            links = links.len(),
            "built story graph"
        );

        Ok(Story {
            title: raw.title,
            passages,
            links,
            index,
            start: None,
            state: RuntimeState::new(),
            listeners: Vec::new(),
        })
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub(crate) fn set_title(&mut self, title: String) {
        self.title = title;
    }

    /// The passage play begins in, when one was configured.
    pub fn start(&self) -> Option<PassageId> {
        self.start
    }

    pub fn set_start(&mut self, title: &str) -> Result<PassageId, RuntimeError> {
        let id = self
            .passage_id(title)
            .ok_or_else(|| RuntimeError::PassageNotFound(title.to_string()))?;
        self.start = Some(id);
        Ok(id)
    }

    pub fn passage(&self, id: PassageId) -> &Passage {
        &self.passages[id.0]
    }

    pub(crate) fn passage_mut(&mut self, id: PassageId) -> &mut Passage {
        &mut self.passages[id.0]
    }

    pub fn passage_id(&self, title: &str) -> Option<PassageId> {
        self.index.get(title).copied()
    }

    pub fn passage_by_title(&self, title: &str) -> Result<&Passage, RuntimeError> {
        self.passage_id(title)
            .map(|id| self.passage(id))
            .ok_or_else(|| RuntimeError::PassageNotFound(title.to_string()))
    }

    /// Passages in script order.
    pub fn passages(&self) -> impl Iterator<Item = &Passage> {
        self.passages.iter()
    }

    pub fn link(&self, id: LinkId) -> &Link {
        &self.links[id.0]
    }

    pub(crate) fn link_mut(&mut self, id: LinkId) -> &mut Link {
        &mut self.links[id.0]
    }

    pub fn links_iter(&self) -> impl Iterator<Item = &Link> {
        self.links.iter()
    }

    pub fn state(&self) -> &RuntimeState {
        &self.state
    }

    /// Register a listener for inventory notifications.
    pub fn subscribe<F>(&mut self, listener: F)
    where
        F: FnMut(&InventoryUpdated) + 'static,
    {
        self.listeners.push(Box::new(listener));
    }

    pub(crate) fn add_listener(&mut self, listener: InventoryListener) {
        self.listeners.push(listener);
    }

    pub fn add_money(&mut self, amount: i64) -> Result<(), RuntimeError> {
        if let Err(err) = self.state.add_money(amount) {
            warn!(error = %err, "rejected money change");
            return Err(err);
        }
        self.publish_inventory();
        Ok(())
    }

    pub fn take_money(&mut self, amount: i64) -> Result<(), RuntimeError> {
        if let Err(err) = self.state.take_money(amount) {
            warn!(error = %err, "rejected money change");
            return Err(err);
        }
        self.publish_inventory();
        Ok(())
    }

    pub fn add_item(&mut self, name: &str) {
        self.state.add_item(name);
        self.publish_inventory();
    }

    /// Taking an item that is not held changes nothing and notifies no one.
    pub fn take_item(&mut self, name: &str) {
        if self.state.take_item(name) {
            self.publish_inventory();
        } else {
            warn!(item = %name, "took an item that is not held");
        }
    }

    pub fn add_fact(&mut self, name: &str) {
        self.state.add_fact(name);
    }

    fn publish_inventory(&mut self) {
        if self.listeners.is_empty() {
            return;
        }
        let event = self.state.inventory();
        for listener in &mut self.listeners {
            listener(&event);
        }
    }
}
