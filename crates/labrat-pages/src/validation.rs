//! Result validation screen

use labrat_browser::Pipeline;
use labrat_core::Result;

use crate::sidenav::SideNav;

struct Selectors {
    page_title: &'static str,
    validation_menu: &'static str,
    routine_validation_link: &'static str,
    unit_type: &'static str,
    accession_search: &'static str,
    search_button: &'static str,
    result_table: &'static str,
    accept_checkbox: &'static str,
    save_button: &'static str,
    saved_notification: &'static str,
}

const SEL: Selectors = Selectors {
    page_title: "h2",
    validation_menu: "#menu_resultvalidation",
    routine_validation_link: "#menu_resultvalidation_routine",
    unit_type: "#unitType",
    accession_search: "#accessionNumber",
    search_button: "[data-cy='searchButton']",
    result_table: ".cds--data-table",
    accept_checkbox: "[data-cy='acceptCheckbox']",
    save_button: "[data-cy='saveButton']",
    saved_notification: ".cds--inline-notification--success",
};

pub struct ValidationPage {
    pipeline: Pipeline,
}

impl ValidationPage {
    pub fn new(pipeline: Pipeline) -> Self {
        Self { pipeline }
    }

    /// Open the routine validation workplan through the sidenav
    pub async fn open_via_sidenav(&self) -> Result<()> {
        let nav = SideNav::new(self.pipeline.clone());
        nav.ensure_expanded().await?;
        nav.ensure_menu_expanded(SEL.validation_menu).await?;
        nav.click_nav_link(SEL.routine_validation_link).await?;
        self.verify_page_title().await
    }

    pub async fn verify_page_title(&self) -> Result<()> {
        self.pipeline
            .assert_contains_visible(SEL.page_title, "Validation")
            .await
    }

    pub async fn select_test_unit(&self, unit: &str) -> Result<()> {
        self.pipeline.select(SEL.unit_type, unit).await
    }

    pub async fn search_by_accession(&self, accession: &str) -> Result<()> {
        self.pipeline
            .clear_and_type(SEL.accession_search, accession)
            .await?;
        self.pipeline.click(SEL.search_button).await
    }

    pub async fn validate_results_loaded(&self) -> Result<()> {
        self.pipeline.assert_visible(SEL.result_table).await
    }

    pub async fn accept_first_result(&self) -> Result<()> {
        self.pipeline.check(SEL.accept_checkbox).await
    }

    pub async fn save_validation(&self) -> Result<()> {
        self.pipeline.click(SEL.save_button).await
    }

    pub async fn validate_save_confirmed(&self) -> Result<()> {
        self.pipeline.assert_visible(SEL.saved_notification).await
    }
}
