//! Administration hub
//!
//! Entry point for every managed admin screen. Navigation methods assert the
//! destination URL fragment and heading before handing over a new page
//! object.

use labrat_browser::Pipeline;
use labrat_core::Result;

use crate::menu_config::MenuConfigPage;
use crate::organization_management::OrganizationManagementPage;
use crate::provider_management::ProviderManagementPage;
use crate::user_management::UserManagementPage;

struct Selectors {
    provider_management: &'static str,
    organization_management: &'static str,
    global_menu_management: &'static str,
    user_management: &'static str,
    span: &'static str,
}

const SEL: Selectors = Selectors {
    provider_management: "[data-cy='providerMgmnt']",
    organization_management: "[data-cy='orgMgmnt']",
    global_menu_management: "[data-cy='globalMenuMgmnt']",
    user_management: "[data-cy='userMgmnt']",
    span: "span",
};

pub struct AdminPage {
    pipeline: Pipeline,
}

impl AdminPage {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    pub async fn visit(&self) -> Result<()> {
        self.pipeline.visit("/administration").await
    }

    pub async fn go_to_user_management(&self) -> Result<UserManagementPage> {
        self.pipeline.click(SEL.user_management).await?;
        let page = UserManagementPage::new(self.pipeline.clone());
        page.verify_page_title().await?;
        Ok(page)
    }

    pub async fn go_to_organization_management(&self) -> Result<OrganizationManagementPage> {
        self.pipeline.assert_visible(SEL.organization_management).await?;
        self.pipeline.click(SEL.organization_management).await?;
        self.pipeline.assert_url_contains("#organizationManagement").await?;
        self.pipeline
            .assert_contains_visible("h2", "Organization Management")
            .await?;
        Ok(OrganizationManagementPage::new(self.pipeline.clone()))
    }

    pub async fn go_to_provider_management(&self) -> Result<ProviderManagementPage> {
        self.pipeline.assert_visible(SEL.provider_management).await?;
        self.pipeline.click(SEL.provider_management).await?;
        self.pipeline.assert_url_contains("#providerMenu").await?;
        self.pipeline
            .assert_contains_visible("h2", "Provider Management")
            .await?;
        Ok(ProviderManagementPage::new(self.pipeline.clone()))
    }

    pub async fn go_to_global_menu_config(&self) -> Result<MenuConfigPage> {
        self.pipeline
            .click_contains(SEL.span, "Menu Configuration")
            .await?;
        self.pipeline.assert_visible(SEL.global_menu_management).await?;
        self.pipeline.click(SEL.global_menu_management).await?;
        self.pipeline.assert_url_contains("#globalMenuManagement").await?;
        self.pipeline
            .assert_contains_visible("h2", "Global Menu Management")
            .await?;
        Ok(MenuConfigPage::new(self.pipeline.clone()))
    }
}
