//! Built-in journeys
//!
//! A journey is the business narrative of one spec, written entirely in
//! page-object vocabulary. Journeys receive an owned context (pipeline clone
//! plus credentials) so nothing outlives the spec that ran it.
//!
//! Test data follows the fixture naming convention: anything a journey
//! creates carries an `E2E-` prefix so the clean task can remove it.

use futures::future::BoxFuture;
use labrat_browser::Pipeline;
use labrat_core::{Credentials, LabratError, Result};
use labrat_pages::{
    AdminPage, HomePage, LoginPage, RoutineReportPage, SideNav, ValidationPage,
};
use std::collections::BTreeMap;

/// Everything a journey may touch
#[derive(Clone)]
pub struct JourneyContext {
    pub pipeline: Pipeline,
    pub credentials: Credentials,
}

pub type JourneyFn = fn(JourneyContext) -> BoxFuture<'static, Result<()>>;

/// Name -> journey mapping consulted by the suite runner
pub struct JourneyRegistry {
    journeys: BTreeMap<&'static str, JourneyFn>,
}

impl JourneyRegistry {
    pub fn empty() -> Self {
        Self {
            journeys: BTreeMap::new(),
        }
    }

    /// Registry with every built-in journey
    pub fn builtin() -> Self {
        let mut registry = Self::empty();
        registry.register("login", login);
        registry.register("home", home);
        registry.register("user-management", user_management);
        registry.register("organization-management", organization_management);
        registry.register("provider-management", provider_management);
        registry.register("menu-config-toggle", menu_config_toggle);
        registry.register("validation", validation);
        registry.register("routine-report", routine_report);
        registry
    }

    pub fn register(&mut self, name: &'static str, journey: JourneyFn) {
        self.journeys.insert(name, journey);
    }

    pub fn get(&self, name: &str) -> Result<JourneyFn> {
        self.journeys
            .get(name)
            .copied()
            .ok_or_else(|| LabratError::UnknownJourney(name.to_string()))
    }

    pub fn names(&self) -> Vec<&'static str> {
        self.journeys.keys().copied().collect()
    }
}

/// Interactive login, from a clean slate.
///
/// Shared-isolation sessions arrive already authenticated, so log out first
/// when the landmark is present.
fn login(cx: JourneyContext) -> BoxFuture<'static, Result<()>> {
    Box::pin(async move {
        let login = LoginPage::new(cx.pipeline.clone());
        if cx.pipeline.is_visible(labrat_pages::AUTHENTICATED_LANDMARK).await {
            login.logout().await?;
        } else {
            login.visit().await?;
        }
        login
            .login(&cx.credentials.user, &cx.credentials.pass)
            .await?;
        Ok(())
    })
}

/// Landing screen renders and the sidenav toggles.
fn home(cx: JourneyContext) -> BoxFuture<'static, Result<()>> {
    Box::pin(async move {
        let home = HomePage::new(cx.pipeline.clone());
        home.visit().await?;

        let nav = SideNav::new(cx.pipeline.clone());
        nav.ensure_expanded().await?;
        nav.toggle().await?;
        nav.assert_collapsed().await?;
        nav.toggle().await?;
        nav.assert_expanded().await?;
        Ok(())
    })
}

/// Add a user with permissions, then find it through search.
fn user_management(cx: JourneyContext) -> BoxFuture<'static, Result<()>> {
    Box::pin(async move {
        let admin = AdminPage::new(cx.pipeline.clone());
        admin.visit().await?;
        let users = admin.go_to_user_management().await?;

        users.click_add_button().await?;
        users.validate_add_user_title().await?;
        users.type_login_name("E2E-jane.doe").await?;
        users.type_login_password("Passw0rd!E2E").await?;
        users.repeat_password("Passw0rd!E2E").await?;
        users.enter_first_name("Jane").await?;
        users.enter_last_name("E2E-Doe").await?;
        users.enter_user_timeout("30").await?;
        users.all_permissions().await?;
        users.user_account_admin().await?;
        users.save_changes().await?;

        users.verify_page_title().await?;
        users.search_user("E2E-jane.doe").await?;
        users.validate_user_listed("E2E-jane.doe").await?;
        Ok(())
    })
}

/// Create an organization and read its listing back.
fn organization_management(cx: JourneyContext) -> BoxFuture<'static, Result<()>> {
    Box::pin(async move {
        let admin = AdminPage::new(cx.pipeline.clone());
        admin.visit().await?;
        let orgs = admin.go_to_organization_management().await?;

        orgs.click_add_button().await?;
        orgs.enter_organization_name("E2E-Central Lab").await?;
        orgs.enter_organization_prefix("E2E").await?;
        orgs.turn_on_active_toggle().await?;
        orgs.validate_toggle_status("On").await?;
        orgs.save_changes().await?;

        orgs.verify_page_title().await?;
        orgs.search_organization("E2E-Central Lab").await?;
        orgs.validate_organization_listed("E2E-Central Lab").await?;
        Ok(())
    })
}

/// Create a provider and read its listing back.
fn provider_management(cx: JourneyContext) -> BoxFuture<'static, Result<()>> {
    Box::pin(async move {
        let admin = AdminPage::new(cx.pipeline.clone());
        admin.visit().await?;
        let providers = admin.go_to_provider_management().await?;

        providers.click_add_button().await?;
        providers.enter_first_name("Greg").await?;
        providers.enter_last_name("E2E-House").await?;
        providers.enter_telephone("0700000000").await?;
        providers.turn_on_active_toggle().await?;
        providers.validate_toggle_status("On").await?;
        providers.save_changes().await?;

        providers.verify_page_title().await?;
        providers.search_provider("E2E-House").await?;
        providers.validate_provider_listed("E2E-House").await?;
        Ok(())
    })
}

/// Toggle the NonConformity configuration off and back on; the status label
/// must reflect each save, and the dependent menu tree must follow.
fn menu_config_toggle(cx: JourneyContext) -> BoxFuture<'static, Result<()>> {
    Box::pin(async move {
        let admin = AdminPage::new(cx.pipeline.clone());
        admin.visit().await?;
        let menu = admin.go_to_global_menu_config().await?;

        menu.turn_off_toggle_switch().await?;
        menu.submit().await?;
        menu.validate_toggle_status("False").await?;
        menu.uncheck_non_conform().await?;
        menu.submit().await?;
        menu.navigate_to_main_menu().await?;
        menu.validate_non_conform_off().await?;

        menu.visit().await?;
        menu.turn_on_toggle_switch().await?;
        menu.submit().await?;
        menu.validate_toggle_status("True").await?;
        menu.check_menu_item(labrat_pages::MenuItem::NonConform).await?;
        menu.submit().await?;
        menu.navigate_to_main_menu().await?;
        menu.validate_non_conform_on().await?;
        Ok(())
    })
}

/// Open routine validation and pull up a fixture accession.
fn validation(cx: JourneyContext) -> BoxFuture<'static, Result<()>> {
    Box::pin(async move {
        let home = HomePage::new(cx.pipeline.clone());
        home.visit().await?;

        let page = ValidationPage::new(cx.pipeline.clone());
        page.open_via_sidenav().await?;
        page.select_test_unit("Biochemistry").await?;
        page.search_by_accession("E2E-0001").await?;
        page.validate_results_loaded().await?;
        Ok(())
    })
}

/// Walk to the patient status report and check the form renders.
fn routine_report(cx: JourneyContext) -> BoxFuture<'static, Result<()>> {
    Box::pin(async move {
        let home = HomePage::new(cx.pipeline.clone());
        home.visit().await?;

        let reports = RoutineReportPage::new(cx.pipeline.clone());
        reports.select_patient_status_report().await?;
        reports.validate_page_header("Patient Status Report").await?;
        reports.enter_start_date("01/01/2025").await?;
        reports.enter_end_date("31/12/2025").await?;
        reports.validate_print_button_visible().await?;
        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_contents() {
        let registry = JourneyRegistry::builtin();
        let names = registry.names();
        assert!(names.contains(&"login"));
        assert!(names.contains(&"menu-config-toggle"));
        assert_eq!(names.len(), 8);
    }

    #[test]
    fn test_unknown_journey_is_an_error() {
        let registry = JourneyRegistry::builtin();
        let err = registry.get("teleport").unwrap_err();
        assert!(matches!(err, LabratError::UnknownJourney(_)));
        assert!(err.to_string().contains("teleport"));
    }

    #[test]
    fn test_custom_registration() {
        fn noop(_cx: JourneyContext) -> BoxFuture<'static, Result<()>> {
            Box::pin(async { Ok(()) })
        }
        let mut registry = JourneyRegistry::empty();
        registry.register("custom", noop);
        assert!(registry.get("custom").is_ok());
    }
}
