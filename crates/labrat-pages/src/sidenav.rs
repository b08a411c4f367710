//! Side navigation
//!
//! The sidenav wraps submenu children in spans whose click handlers call
//! `stopPropagation()`, so leaf links are clicked natively from page context
//! rather than by coordinates. Expanding a parent menu is idempotent: only
//! click the toggle when `aria-expanded` is not already `"true"`, otherwise a
//! second click collapses an open menu.

use labrat_browser::Pipeline;
use labrat_core::Result;

struct Selectors {
    nav: &'static str,
    menu_button: &'static str,
    expanded_class: &'static str,
}

const SEL: Selectors = Selectors {
    nav: ".cds--side-nav",
    menu_button: "#sidenav-menu-button",
    expanded_class: "cds--side-nav--expanded",
};

pub struct SideNav {
    pipeline: Pipeline,
}

impl SideNav {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    pub async fn toggle(&self) -> Result<()> {
        self.pipeline.click(SEL.menu_button).await
    }

    pub async fn assert_expanded(&self) -> Result<()> {
        self.pipeline
            .assert_exists(&format!("{}.{}", SEL.nav, SEL.expanded_class))
            .await
    }

    pub async fn assert_collapsed(&self) -> Result<()> {
        self.pipeline
            .assert_not_exists(&format!("{}.{}", SEL.nav, SEL.expanded_class))
            .await
    }

    /// Expand the sidenav if it is currently collapsed
    pub async fn ensure_expanded(&self) -> Result<()> {
        let expanded_selector = format!("{}.{}", SEL.nav, SEL.expanded_class);
        if !self.pipeline.is_visible(&expanded_selector).await {
            self.toggle().await?;
        }
        self.assert_expanded().await
    }

    /// Expand one submenu, idempotently
    pub async fn ensure_menu_expanded(&self, menu_id: &str) -> Result<()> {
        let collapsed = format!("{} button[aria-expanded='false']", menu_id);
        if self.pipeline.is_visible(&collapsed).await {
            self.pipeline.click_native(&collapsed).await?;
        }
        self.pipeline
            .assert_exists(&format!("{} button[aria-expanded='true']", menu_id))
            .await
    }

    /// Native click on a leaf item's anchor
    pub async fn click_nav_link(&self, menu_id: &str) -> Result<()> {
        self.pipeline
            .assert_exists(&format!("{} a", menu_id))
            .await?;
        self.pipeline.click_native(&format!("{} a", menu_id)).await
    }
}
