//! Provider management screen

use labrat_browser::Pipeline;
use labrat_core::Result;

struct Selectors {
    page_title: &'static str,
    add_button: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    telephone: &'static str,
    fax: &'static str,
    is_active_toggle: &'static str,
    toggle_text: &'static str,
    save_button: &'static str,
    exit_button: &'static str,
    search_bar: &'static str,
}

const SEL: Selectors = Selectors {
    page_title: "h2",
    add_button: "[data-cy='add-button']",
    first_name: "#provider-first-name",
    last_name: "#provider-last-name",
    telephone: "#provider-telephone",
    fax: "#provider-fax",
    is_active_toggle: "div.cds--toggle__switch",
    toggle_text: ".cds--toggle__text",
    save_button: "[data-cy='saveButton']",
    exit_button: "[data-cy='exitButton']",
    search_bar: "#provider-name-search-bar",
};

pub struct ProviderManagementPage {
    pipeline: Pipeline,
}

impl ProviderManagementPage {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    pub async fn verify_page_title(&self) -> Result<()> {
        self.pipeline
            .assert_contains_visible(SEL.page_title, "Provider Management")
            .await
    }

    pub async fn click_add_button(&self) -> Result<()> {
        self.pipeline.click(SEL.add_button).await
    }

    pub async fn enter_first_name(&self, value: &str) -> Result<()> {
        self.pipeline.clear_and_type(SEL.first_name, value).await
    }

    pub async fn enter_last_name(&self, value: &str) -> Result<()> {
        self.pipeline.clear_and_type(SEL.last_name, value).await
    }

    pub async fn enter_telephone(&self, value: &str) -> Result<()> {
        self.pipeline.type_text(SEL.telephone, value).await
    }

    pub async fn enter_fax(&self, value: &str) -> Result<()> {
        self.pipeline.type_text(SEL.fax, value).await
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

    pub async fn search_provider(&self, value: &str) -> Result<()> {
        self.pipeline.clear_and_type(SEL.search_bar, value).await
    }

    pub async fn validate_provider_listed(&self, name: &str) -> Result<()> {
        self.pipeline.assert_contains_visible("td", name).await
    }
}
