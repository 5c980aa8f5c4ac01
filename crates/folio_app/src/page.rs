//! Page trait and mount context

use folio_core::{ElementId, ElementStore, Rect, Size};
use folio_trigger::PointerTrigger;

use crate::config::FolioConfig;
use crate::error::Result;
use crate::scope::PageScope;

/// Everything a page needs while mounting
pub struct MountContext<'a> {
    pub store: &'a mut ElementStore,
    pub scope: &'a mut PageScope,
    pub pointer: &'a PointerTrigger,
    pub config: &'a FolioConfig,
    pub viewport: Size,
}

impl MountContext<'_> {
    /// Create an element owned by the page's scope
    pub fn element(&mut self, label: impl Into<String>, bounds: Rect) -> ElementId {
        self.scope.create_element(self.store, label, bounds)
    }

    /// Apply a starting value before anything animates
    pub fn set(&mut self, id: ElementId, property: &str, value: f32) {
        self.store.set(id, property, value);
    }
}

/// A page of the portfolio
///
/// Mounting builds the page's elements and wires its animations into the
/// scope. Teardown is owned by the scope, so pages hold no cleanup logic.
pub trait Page {
    fn name(&self) -> &'static str;

    fn mount(&mut self, ctx: &mut MountContext<'_>) -> Result<()>;

    /// Pointer entered or left an element
    ///
    /// Returns true when the page reacted to it.
    fn on_hover(&mut self, _scope: &PageScope, _element: ElementId, _hovered: bool) -> Result<bool> {
        Ok(false)
    }
}
