//! Organization management screen

use labrat_browser::Pipeline;
use labrat_core::Result;

struct Selectors {
    page_title: &'static str,
    add_button: &'static str,
    org_name: &'static str,
    org_prefix: &'static str,
    is_active_toggle: &'static str,
    toggle_text: &'static str,
    parent_org_search: &'static str,
    save_button: &'static str,
    exit_button: &'static str,
    search_bar: &'static str,
}

const SEL: Selectors = Selectors {
    page_title: "h2",
    add_button: "[data-cy='add-button']",
    org_name: "#org-name",
    org_prefix: "#org-prefix",
    is_active_toggle: "div.cds--toggle__switch",
    toggle_text: ".cds--toggle__text",
    parent_org_search: "#parent-org-search",
    save_button: "[data-cy='saveButton']",
    exit_button: "[data-cy='exitButton']",
    search_bar: "#org-name-search-bar",
};

pub struct OrganizationManagementPage {
    pipeline: Pipeline,
}

impl OrganizationManagementPage {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    pub async fn verify_page_title(&self) -> Result<()> {
        self.pipeline
            .assert_contains_visible(SEL.page_title, "Organization Management")
            .await
    }

    pub async fn click_add_button(&self) -> Result<()> {
        self.pipeline.click(SEL.add_button).await
    }

    pub async fn enter_organization_name(&self, value: &str) -> Result<()> {
        self.pipeline.clear_and_type(SEL.org_name, value).await
    }

    pub async fn enter_organization_prefix(&self, value: &str) -> Result<()> {
        self.pipeline.clear_and_type(SEL.org_prefix, value).await
    }

    pub async fn search_parent_organization(&self, value: &str) -> Result<()> {
        self.pipeline.type_text(SEL.parent_org_search, value).await
    }

    pub async fn turn_on_active_toggle(&self) -> Result<()> {
        self.pipeline.assert_visible(SEL.is_active_toggle).await?;
        self.pipeline.click(SEL.is_active_toggle).await
    }

    pub async fn validate_toggle_status(&self, value: &str) -> Result<()> {
        self.pipeline
            .assert_contains_visible(SEL.toggle_text, value)
            .await
    }

    pub async fn save_changes(&self) -> Result<()> {
        self.pipeline.click(SEL.save_button).await
    }

    pub async fn exit_changes(&self) -> Result<()> {
        self.pipeline.click(SEL.exit_button).await
    }

    pub async fn search_organization(&self, value: &str) -> Result<()> {
        self.pipeline.clear_and_type(SEL.search_bar, value).await
    }

    pub async fn validate_organization_listed(&self, name: &str) -> Result<()> {
        self.pipeline.assert_contains_visible("td", name).await
    }
}
