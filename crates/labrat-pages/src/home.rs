//! Home / landing screen

use labrat_browser::Pipeline;
use labrat_core::Result;

use crate::admin::AdminPage;
use crate::login::LoginPage;

struct Selectors {
    header: &'static str,
    user_icon: &'static str,
    log_out: &'static str,
}

const SEL: Selectors = Selectors {
    header: "header",
    user_icon: "#user-Icon",
    log_out: "[data-cy='logOut']",
};

pub struct HomePage {
    pipeline: Pipeline,
}

impl HomePage {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    pub async fn visit(&self) -> Result<()> {
        self.pipeline.visit("/").await?;
        self.assert_loaded().await
    }

    pub async fn assert_loaded(&self) -> Result<()> {
        self.pipeline.assert_visible(SEL.header).await?;
        self.pipeline.assert_visible(SEL.user_icon).await
    }

    pub async fn go_to_admin(&self) -> Result<AdminPage> {
        let admin = AdminPage::new(self.pipeline.clone());
        admin.visit().await?;
        Ok(admin)
    }

    pub async fn logout(&self) -> Result<LoginPage> {
        self.pipeline.click_native(SEL.user_icon).await?;
        self.pipeline.click_native(SEL.log_out).await?;
        let login = LoginPage::new(self.pipeline.clone());
        login.assert_login_form_visible().await?;
        Ok(login)
    }
}
