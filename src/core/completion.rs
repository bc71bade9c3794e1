//! Link visits and branch completion.
//!
//! A branch is complete when its link was taken and every link reachable
//! from its target through currently visible links was taken as well.
//! `back` links and links returning to the origin passage are not part of
//! the branch. Exit links never count as complete themselves, but an
//! untaken exit does not keep its parent branch incomplete.

use rustc_hash::FxHashSet;
use tracing::trace;

use crate::core::state::RuntimeError;
use crate::core::story::{LinkId, PassageId, Story};

impl Story {
    /// Take a link: mark it visited and visit its target passage.
    /// Returns the target.
    pub fn visit_link(&mut self, id: LinkId) -> Result<PassageId, RuntimeError> {
        let link = self.link_mut(id);
        link.visited = true;
        let target = link.target();
        trace!(link = %self.link(id).text(), "visit link");

        self.visit_passage(target)?;
        Ok(target)
    }

    /// Whether the branch behind `id` has been fully explored, as seen from
    /// `source`. Links leading back to `source` are ignored.
    pub fn all_visited(&self, id: LinkId, source: PassageId) -> Result<bool, RuntimeError> {
        let link = self.link(id);
        if !link.visited() || link.is_exit() {
            return Ok(false);
        }

        for child in self.deep_child_links(id, source)? {
            let child = self.link(child);
            if !child.visited() && !child.is_exit() {
                return Ok(false);
            }
        }
        Ok(true)
    }

    /// [`Story::all_visited`] from the passage owning the link.
    pub fn branch_complete(&self, id: LinkId) -> Result<bool, RuntimeError> {
        self.all_visited(id, self.link(id).source())
    }

    /// Links reachable from the target of `id` through visible links,
    /// skipping `back` links and links to `source`. Each link appears once.
    pub fn deep_child_links(
        &self,
        id: LinkId,
        source: PassageId,
    ) -> Result<Vec<LinkId>, RuntimeError> {
        let mut seen = FxHashSet::default();
        let mut children = Vec::new();
        self.collect_children(id, source, &mut seen, &mut children)?;
        Ok(children)
    }

    fn collect_children(
        &self,
        id: LinkId,
        source: PassageId,
        seen: &mut FxHashSet<LinkId>,
        children: &mut Vec<LinkId>,
    ) -> Result<(), RuntimeError> {
        if !seen.insert(id) {
            return Ok(());
        }

        for child in self.links(self.link(id).target())? {
            let link = self.link(child);
            if link.target() == source || link.is_back() || seen.contains(&child) {
                continue;
            }
            children.push(child);
            self.collect_children(child, source, seen, children)?;
        }
        Ok(())
    }
}
