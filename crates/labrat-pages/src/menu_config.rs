//! Global menu configuration screen
//!
//! Toggling a menu entry here changes what the whole application renders, so
//! every state change pairs with a validation method reading the result
//! back. The NonConformity toggle is the canonical round-trip: off, verify
//! the menu tree is gone, on, verify every child entry is back.

use labrat_browser::Pipeline;
use labrat_core::Result;

struct Selectors {
    menu_button: &'static str,
    non_conform_menu: &'static str,
    non_conform_report: &'static str,
    non_conform_view: &'static str,
    corrective_action: &'static str,
    patient_menu: &'static str,
    add_edit_patient: &'static str,
    patient_history: &'static str,
    study_patient: &'static str,
    billing_menu: &'static str,
    billing_address: &'static str,
    toggle_text: &'static str,
    toggle_on: &'static str,
    toggle_off: &'static str,
}

const SEL: Selectors = Selectors {
    menu_button: "[data-cy='menuButton']",
    non_conform_menu: "#menu_nonconformity",
    non_conform_report: "#menu_non_conforming_report",
    non_conform_view: "#menu_non_conforming_view",
    corrective_action: "#menu_non_conforming_corrective_actions",
    patient_menu: "#menu_patient",
    add_edit_patient: "#menu_patient_add_or_edit",
    patient_history: "#menu_patienthistory",
    study_patient: "#menu_patient_create",
    billing_menu: "#menu_billing",
    billing_address: "#billing_address",
    toggle_text: ".cds--toggle__text",
    toggle_on: "div.cds--toggle__switch",
    toggle_off: "div.cds--toggle label div > div",
};

/// Menu entries with a managed checkbox on this screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MenuItem {
    Home,
    Order,
    Results,
    Validation,
    Reports,
    StudyReports,
    Billing,
    Admin,
    Help,
    Patient,
    AddEditPatient,
    PatientHistory,
    StudyPatient,
    NonConform,
    ReportNce,
    ViewNce,
    CorrectiveAction,
    Workplan,
    Pathology,
}

impl MenuItem {
    /// Checkbox selector governing this menu entry
    pub fn checkbox(self) -> &'static str {
        match self {
            Self::Home => "#menu_home_checkbox",
            Self::Order => "#menu_sample_checkbox",
            Self::Results => "#menu_results_checkbox",
            Self::Validation => "#menu_resultvalidation_checkbox",
            Self::Reports => "#menu_reports_checkbox",
            Self::StudyReports => "#menu_reports_study_checkbox",
            Self::Billing => "#menu_billing_checkbox",
            Self::Admin => "#menu_administration_checkbox",
            Self::Help => "#menu_help_checkbox",
            Self::Patient => "#menu_patient_checkbox",
            Self::AddEditPatient => "#menu_patient_add_or_edit_checkbox",
            Self::PatientHistory => "#menu_patienthistory_checkbox",
            Self::StudyPatient => "#menu_patient_create_checkbox",
            Self::NonConform => "#menu_nonconformity_checkbox",
            Self::ReportNce => "#menu_non_conforming_report_checkbox",
            Self::ViewNce => "#menu_non_conforming_view_checkbox",
            Self::CorrectiveAction => "#menu_non_conforming_corrective_actions_checkbox",
            Self::Workplan => "#menu_workplan_checkbox",
            Self::Pathology => "#menu_pathology_checkbox",
        }
    }
}

pub struct MenuConfigPage {
    pipeline: Pipeline,
}

impl MenuConfigPage {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    pub async fn visit(&self) -> Result<()> {
        self.pipeline.visit("/administration#globalMenuManagement").await
    }

    pub async fn navigate_to_main_menu(&self) -> Result<()> {
        self.pipeline.click(SEL.menu_button).await
    }

    pub async fn turn_on_toggle_switch(&self) -> Result<()> {
        self.pipeline.assert_visible(SEL.toggle_on).await?;
        self.pipeline.click(SEL.toggle_on).await
    }

    pub async fn turn_off_toggle_switch(&self) -> Result<()> {
        self.pipeline.click_native(SEL.toggle_off).await
    }

    /// The toggle label reads back the saved state ("True" / "False")
    pub async fn validate_toggle_status(&self, value: &str) -> Result<()> {
        self.pipeline
            .assert_contains_visible(SEL.toggle_text, value)
            .await
    }

    pub async fn check_menu_item(&self, item: MenuItem) -> Result<()> {
        self.pipeline.check(item.checkbox()).await
    }

    pub async fn uncheck_menu_item(&self, item: MenuItem) -> Result<()> {
        self.pipeline.uncheck(item.checkbox()).await
    }

    pub async fn uncheck_non_conform(&self) -> Result<()> {
        self.uncheck_menu_item(MenuItem::NonConform).await
    }

    pub async fn validate_non_conform_off(&self) -> Result<()> {
        self.pipeline.assert_not_exists(SEL.non_conform_menu).await
    }

    pub async fn validate_non_conform_on(&self) -> Result<()> {
        self.pipeline.assert_visible(SEL.non_conform_menu).await?;
        self.pipeline.click(SEL.non_conform_menu).await?;
        self.pipeline.assert_visible(SEL.non_conform_report).await?;
        self.pipeline.assert_visible(SEL.non_conform_view).await?;
        self.pipeline.assert_visible(SEL.corrective_action).await
    }

    pub async fn uncheck_patient_menu(&self) -> Result<()> {
        self.uncheck_menu_item(MenuItem::Patient).await
    }

    pub async fn validate_patient_menu_off(&self) -> Result<()> {
        self.pipeline.assert_not_exists(SEL.patient_menu).await
    }

    pub async fn validate_patient_menu_on(&self) -> Result<()> {
        self.pipeline.assert_visible(SEL.patient_menu).await?;
        self.pipeline.click(SEL.patient_menu).await?;
        self.pipeline.assert_visible(SEL.add_edit_patient).await?;
        self.pipeline.assert_visible(SEL.patient_history).await?;
        self.pipeline.assert_visible(SEL.study_patient).await
    }

    pub async fn validate_billing_menu_on(&self) -> Result<()> {
        self.pipeline.assert_visible(SEL.billing_menu).await
    }

    pub async fn validate_billing_menu_off(&self) -> Result<()> {
        self.pipeline.assert_not_exists(SEL.billing_menu).await
    }

    pub async fn enter_billing_address(&self, value: &str) -> Result<()> {
        self.pipeline.type_text(SEL.billing_address, value).await
    }

    pub async fn submit(&self) -> Result<()> {
        self.pipeline.click_contains("button", "Submit").await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_menu_item_maps_to_a_checkbox() {
        let items = [
            MenuItem::Home,
            MenuItem::Order,
            MenuItem::Results,
            MenuItem::Validation,
            MenuItem::Reports,
            MenuItem::StudyReports,
            MenuItem::Billing,
            MenuItem::Admin,
            MenuItem::Help,
            MenuItem::Patient,
            MenuItem::AddEditPatient,
            MenuItem::PatientHistory,
            MenuItem::StudyPatient,
            MenuItem::NonConform,
            MenuItem::ReportNce,
            MenuItem::ViewNce,
            MenuItem::CorrectiveAction,
            MenuItem::Workplan,
            MenuItem::Pathology,
        ];
        for item in items {
            assert!(item.checkbox().starts_with("#menu_") || item.checkbox().starts_with("#billing"));
            assert!(item.checkbox().ends_with("_checkbox"));
        }
    }

    #[test]
    fn test_dependent_entries_share_the_nonconformity_prefix() {
        assert!(MenuItem::ReportNce.checkbox().contains("non_conforming"));
        assert!(MenuItem::ViewNce.checkbox().contains("non_conforming"));
        assert!(MenuItem::CorrectiveAction.checkbox().contains("non_conforming"));
    }
}
