//! Routine report screens

use labrat_browser::Pipeline;
use labrat_core::Result;

use crate::sidenav::SideNav;

struct Selectors {
    reports_menu: &'static str,
    routine_menu: &'static str,
    routine_button: &'static str,
    patient_status_link: &'static str,
    aggregate_menu: &'static str,
    statistics_link: &'static str,
    all_reports_link: &'static str,
    page_header: &'static str,
    start_date: &'static str,
    end_date: &'static str,
    print_button: &'static str,
}

const SEL: Selectors = Selectors {
    reports_menu: "#menu_reports",
    routine_menu: "#menu_reports_routine",
    routine_button: "[data-cy='sidenav-button-menu_reports_routine']",
    patient_status_link: "#menu_reports_status_patient",
    aggregate_menu: "#menu_reports_aggregate",
    statistics_link: "#menu_reports_aggregate_statistics",
    all_reports_link: "#menu_reports_aggregate_all",
    page_header: "section > h3, h1",
    start_date: "#startDate",
    end_date: "#endDate",
    print_button: "[data-cy='printReport']",
};

pub struct RoutineReportPage {
    pipeline: Pipeline,
    nav: SideNav,
}

impl RoutineReportPage {
    pub fn new(pipeline: Pipeline) -> Self {
        let nav = SideNav::new(pipeline.clone());
        Self { pipeline, nav }
    }

    pub async fn visit_routine_reports(&self) -> Result<()> {
        self.pipeline.assert_visible(SEL.routine_button).await?;
        self.pipeline.click(SEL.routine_button).await
    }

    pub async fn select_patient_status_report(&self) -> Result<()> {
        self.nav.ensure_menu_expanded(SEL.reports_menu).await?;
        self.nav.ensure_menu_expanded(SEL.routine_menu).await?;
        self.nav.click_nav_link(SEL.patient_status_link).await
    }

    pub async fn open_aggregate_reports(&self) -> Result<()> {
        self.nav.ensure_menu_expanded(SEL.aggregate_menu).await
    }

    pub async fn select_statistics(&self) -> Result<()> {
        self.nav.click_nav_link(SEL.statistics_link).await
    }

    pub async fn select_all_reports_summary(&self) -> Result<()> {
        self.nav.click_nav_link(SEL.all_reports_link).await
    }

    pub async fn validate_page_header(&self, expected: &str) -> Result<()> {
        self.pipeline
            .assert_contains_visible(SEL.page_header, expected)
            .await
    }

    pub async fn enter_start_date(&self, date: &str) -> Result<()> {
        self.pipeline.type_text(SEL.start_date, date).await
    }

    pub async fn enter_end_date(&self, date: &str) -> Result<()> {
        self.pipeline.type_text(SEL.end_date, date).await
    }

    pub async fn validate_print_button_visible(&self) -> Result<()> {
        self.pipeline.assert_visible(SEL.print_button).await
    }

    pub async fn generate_report(&self) -> Result<()> {
        self.pipeline.click(SEL.print_button).await
    }
}
