//! Folio application
//!
//! Owns the element store, the global pointer trigger and the mounted page.
//! The host forwards its input and frame callbacks here.

use folio_core::{ElementId, ElementStore, Rect, Size};
use folio_trigger::{PointerEvent, PointerTrigger};

use crate::config::FolioConfig;
use crate::error::{AppError, Result};
use crate::page::{MountContext, Page};
use crate::pages::PageKind;
use crate::scope::PageScope;

struct MountedPage {
    kind: PageKind,
    page: Box<dyn Page>,
    scope: PageScope,
}

/// The portfolio application
///
/// # Example
///
/// ```rust
/// use folio_app::{FolioApp, FolioConfig, PageKind};
/// use folio_core::Size;
///
/// let mut app = FolioApp::new(FolioConfig::testing(), Size::new(1280.0, 720.0));
/// app.navigate(PageKind::Home).unwrap();
///
/// // Host frame loop
/// for _ in 0..60 {
///     app.frame(1.0 / 60.0);
/// }
/// ```
pub struct FolioApp {
    config: FolioConfig,
    store: ElementStore,
    pointer: PointerTrigger,
    viewport: Size,
    scroll_y: f32,
    current: Option<MountedPage>,
}

impl FolioApp {
    pub fn new(config: FolioConfig, viewport: Size) -> Self {
        Self {
            config,
            store: ElementStore::new(),
            pointer: PointerTrigger::new(viewport),
            viewport,
            scroll_y: 0.0,
            current: None,
        }
    }

    /// Unmount the current page and mount another
    ///
    /// A page that fails to mount is torn down again and nothing stays
    /// mounted.
    pub fn navigate(&mut self, kind: PageKind) -> Result<()> {
        self.unmount();
        self.scroll_y = 0.0;

        let mut page = kind.create();
        let mut scope = PageScope::new(&self.config);

        let mounted = {
            let mut ctx = MountContext {
                store: &mut self.store,
                scope: &mut scope,
                pointer: &self.pointer,
                config: &self.config,
                viewport: self.viewport,
            };
            page.mount(&mut ctx)
        };

        if let Err(err) = mounted {
            tracing::warn!("Failed to mount {}: {}", page.name(), err);
            scope.unmount(&mut self.store);
            return Err(err);
        }

        scope.settle(&mut self.store);
        tracing::info!("Navigated to {} ({})", page.name(), kind.route());
        self.current = Some(MountedPage { kind, page, scope });
        Ok(())
    }

    /// Navigate by route path
    pub fn navigate_to(&mut self, route: &str) -> Result<()> {
        let kind = PageKind::from_route(route)
            .ok_or_else(|| AppError::Other(format!("Unknown route '{}'", route)))?;
        self.navigate(kind)
    }

    /// Tear down the mounted page, if any
    pub fn unmount(&mut self) -> bool {
        match self.current.take() {
            Some(mounted) => {
                let removed = mounted.scope.unmount(&mut self.store);
                tracing::debug!("Unmounted {} ({} elements)", mounted.page.name(), removed);
                true
            }
            None => false,
        }
    }

    pub fn on_pointer_move(&mut self, client_x: f32, client_y: f32) -> PointerEvent {
        self.pointer.on_pointer_move(client_x, client_y)
    }

    pub fn on_resize(&mut self, viewport: Size) {
        self.viewport = viewport;
        self.pointer.on_resize(viewport);
    }

    /// Scroll the page; visibility is re-evaluated on the next frame
    pub fn on_scroll(&mut self, scroll_y: f32) {
        self.scroll_y = if scroll_y.is_finite() {
            scroll_y.max(0.0)
        } else {
            0.0
        };
    }

    pub fn on_hover(&mut self, element: ElementId, hovered: bool) -> Result<bool> {
        let mounted = self.current.as_mut().ok_or(AppError::NotMounted)?;
        mounted.page.on_hover(&mounted.scope, element, hovered)
    }

    /// Advance the mounted page by one frame
    ///
    /// Returns true while anything is still animating.
    pub fn frame(&mut self, dt: f32) -> bool {
        let viewport = self.viewport_rect();
        match &self.current {
            Some(mounted) => mounted.scope.frame(dt, viewport, &mut self.store),
            None => false,
        }
    }

    /// Visible page area at the current scroll position
    pub fn viewport_rect(&self) -> Rect {
        Rect::new(0.0, self.scroll_y, self.viewport.width, self.viewport.height)
    }

    pub fn current_page(&self) -> Option<PageKind> {
        self.current.as_ref().map(|m| m.kind)
    }

    pub fn scope(&self) -> Option<&PageScope> {
        self.current.as_ref().map(|m| &m.scope)
    }

    pub fn store(&self) -> &ElementStore {
        &self.store
    }

    pub fn config(&self) -> &FolioConfig {
        &self.config
    }

    pub fn pointer(&self) -> &PointerTrigger {
        &self.pointer
    }
}

impl Drop for FolioApp {
    fn drop(&mut self) {
        self.unmount();
    }
}
