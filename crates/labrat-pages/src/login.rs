//! Login screen

use labrat_browser::Pipeline;
use labrat_core::Result;

use crate::home::HomePage;

/// Element proving an authenticated session is live; the bootstrap waits on
/// this after submitting the login form.
pub const AUTHENTICATED_LANDMARK: &str = "#user-Icon";

struct Selectors {
    login_name: &'static str,
    password: &'static str,
    login_button: &'static str,
    user_icon: &'static str,
    log_out: &'static str,
}

const SEL: Selectors = Selectors {
    login_name: "#loginName",
    password: "#password",
    login_button: "[data-cy='loginButton']",
    user_icon: AUTHENTICATED_LANDMARK,
    log_out: "[data-cy='logOut']",
};

pub struct LoginPage {
    pipeline: Pipeline,
}

impl LoginPage {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    pub async fn visit(&self) -> Result<()> {
        self.pipeline.visit("/login").await?;
        self.pipeline.assert_visible(SEL.login_name).await
    }

    pub async fn type_username(&self, value: &str) -> Result<()> {
        self.pipeline.clear_and_type(SEL.login_name, value).await
    }

    pub async fn type_password(&self, value: &str) -> Result<()> {
        self.pipeline.clear_and_type(SEL.password, value).await
    }

    pub async fn click_login_button(&self) -> Result<()> {
        self.pipeline.assert_visible(SEL.login_button).await?;
        self.pipeline.click(SEL.login_button).await
    }

    /// Full login flow; successful login redirects away from /login.
    pub async fn login(&self, username: &str, password: &str) -> Result<HomePage> {
        self.type_username(username).await?;
        self.type_password(password).await?;
        self.click_login_button().await?;
        self.pipeline.assert_url_not_contains("/login").await?;
        self.pipeline.assert_visible(SEL.user_icon).await?;
        Ok(HomePage::new(self.pipeline.clone()))
    }

    /// The login form is on screen (used after logout)
    pub async fn assert_login_form_visible(&self) -> Result<()> {
        self.pipeline.assert_visible(SEL.login_name).await
    }

    pub async fn logout(&self) -> Result<()> {
        self.pipeline.click_native(SEL.user_icon).await?;
        self.pipeline.click_native(SEL.log_out).await?;
        self.assert_login_form_visible().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_landmark_matches_selector_map() {
        assert_eq!(AUTHENTICATED_LANDMARK, SEL.user_icon);
    }
}
