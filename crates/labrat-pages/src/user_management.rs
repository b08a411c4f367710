//! User management screen

use labrat_browser::Pipeline;
use labrat_core::Result;

struct Selectors {
    page_title: &'static str,
    user_page_title: &'static str,
    span: &'static str,
    add_button: &'static str,
    login_name: &'static str,
    login_password: &'static str,
    repeat_password: &'static str,
    first_name: &'static str,
    last_name: &'static str,
    password_expiration_date: &'static str,
    user_timeout: &'static str,
    copy_permissions_from_user: &'static str,
    apply_button: &'static str,
    add_new_permission: &'static str,
    remove_permission: &'static str,
    save_button: &'static str,
    exit_button: &'static str,
    search_bar: &'static str,
}

const SEL: Selectors = Selectors {
    page_title: "h2",
    user_page_title: "h3",
    span: "span",
    add_button: "[data-cy='add-button']",
    login_name: "#login-name",
    login_password: "#login-password",
    repeat_password: "#login-repeat-password",
    first_name: "#first-name",
    last_name: "#last-name",
    password_expiration_date: "#password-expire-date",
    user_timeout: "#login-timeout",
    copy_permissions_from_user: "#copy-permissions",
    apply_button: "[data-cy='apply-button']",
    add_new_permission: "[data-cy='addNewPermission']",
    remove_permission: "[data-cy='removePermission']",
    save_button: "[data-cy='saveButton']",
    exit_button: "[data-cy='exitButton']",
    search_bar: "#user-name-search-bar",
};

pub struct UserManagementPage {
    pipeline: Pipeline,
}

impl UserManagementPage {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    pub async fn verify_page_title(&self) -> Result<()> {
        self.pipeline
            .assert_contains_visible(SEL.page_title, "User Management")
            .await
    }

    pub async fn validate_add_user_title(&self) -> Result<()> {
        self.pipeline
            .assert_contains_visible(SEL.user_page_title, "Add User")
            .await
    }

    pub async fn click_add_button(&self) -> Result<()> {
        self.pipeline.click(SEL.add_button).await
    }

    pub async fn type_login_name(&self, value: &str) -> Result<()> {
        self.pipeline.type_text(SEL.login_name, value).await
    }

    pub async fn type_login_password(&self, value: &str) -> Result<()> {
        self.pipeline.type_text(SEL.login_password, value).await
    }

    pub async fn repeat_password(&self, value: &str) -> Result<()> {
        self.pipeline.type_text(SEL.repeat_password, value).await
    }

    pub async fn enter_first_name(&self, value: &str) -> Result<()> {
        self.pipeline.type_text(SEL.first_name, value).await
    }

    pub async fn enter_last_name(&self, value: &str) -> Result<()> {
        self.pipeline.type_text(SEL.last_name, value).await
    }

    pub async fn password_expiry_date(&self, value: &str) -> Result<()> {
        self.pipeline
            .type_text(SEL.password_expiration_date, value)
            .await
    }

    pub async fn enter_user_timeout(&self, value: &str) -> Result<()> {
        self.pipeline.type_text(SEL.user_timeout, value).await
    }

    pub async fn copy_permissions_from_user(&self, value: &str) -> Result<()> {
        self.pipeline
            .type_text(SEL.copy_permissions_from_user, value)
            .await
    }

    pub async fn apply_changes(&self) -> Result<()> {
        self.pipeline.click(SEL.apply_button).await
    }

    pub async fn add_new_permission(&self) -> Result<()> {
        self.pipeline.click(SEL.add_new_permission).await
    }

    pub async fn remove_permission(&self) -> Result<()> {
        self.pipeline.click(SEL.remove_permission).await
    }

    // Lab-unit permissions, selected by visible label

    pub async fn all_permissions(&self) -> Result<()> {
        self.pipeline.click_contains(SEL.span, "All Permissions").await
    }

    pub async fn reception(&self) -> Result<()> {
        self.pipeline.click_contains(SEL.span, "Reception").await
    }

    pub async fn reports(&self) -> Result<()> {
        self.pipeline.click_contains(SEL.span, "Reports").await
    }

    pub async fn results(&self) -> Result<()> {
        self.pipeline.click_contains(SEL.span, "Results").await
    }

    // Global roles

    pub async fn global_administrator(&self) -> Result<()> {
        self.pipeline
            .click_contains(SEL.span, "Global Administrator")
            .await
    }

    pub async fn user_account_admin(&self) -> Result<()> {
        self.pipeline
            .click_contains(SEL.span, "User Account Administrator")
            .await
    }

    pub async fn audit_trail(&self) -> Result<()> {
        self.pipeline.click_contains(SEL.span, "Audit Trail").await
    }

    pub async fn save_changes(&self) -> Result<()> {
        self.pipeline.click(SEL.save_button).await
    }

    pub async fn exit_changes(&self) -> Result<()> {
        self.pipeline.click(SEL.exit_button).await
    }

    pub async fn search_user(&self, value: &str) -> Result<()> {
        self.pipeline.clear_and_type(SEL.search_bar, value).await
    }

    pub async fn filter_only_active(&self) -> Result<()> {
        self.pipeline.click_contains(SEL.span, "Only Active").await
    }

    pub async fn filter_only_administrator(&self) -> Result<()> {
        self.pipeline
            .click_contains(SEL.span, "Only Administrator")
            .await
    }

    /// The searched user shows up in the result listing
    pub async fn validate_user_listed(&self, login_name: &str) -> Result<()> {
        self.pipeline.assert_contains_visible("td", login_name).await
    }
}
