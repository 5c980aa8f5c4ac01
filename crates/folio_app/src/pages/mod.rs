//! Portfolio pages

mod about;
mod home;
mod landing;

pub use about::AboutPage;
pub use home::HomePage;
pub use landing::LandingPage;

use crate::page::Page;

/// The pages the app can navigate between
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PageKind {
    Home,
    About,
    Landing,
}

impl PageKind {
    pub const ALL: [PageKind; 3] = [PageKind::Home, PageKind::About, PageKind::Landing];

    /// Look up a page by its route path
    pub fn from_route(route: &str) -> Option<PageKind> {
        match route.trim_end_matches('/') {
            "" => Some(PageKind::Home),
            "/about" => Some(PageKind::About),
            "/practice" => Some(PageKind::Landing),
            _ => None,
        }
    }

    pub fn route(&self) -> &'static str {
        match self {
            PageKind::Home => "/",
            PageKind::About => "/about",
            PageKind::Landing => "/practice",
        }
    }

    /// Build a fresh, unmounted page
    pub fn create(&self) -> Box<dyn Page> {
        match self {
            PageKind::Home => Box::new(HomePage::new()),
            PageKind::About => Box::new(AboutPage::new()),
            PageKind::Landing => Box::new(LandingPage::new()),
        }
    }
}
