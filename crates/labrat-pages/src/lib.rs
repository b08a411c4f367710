//! Page objects for the LIMS administrative UI
//!
//! One struct per logical screen. Each page object owns a clone of the
//! command pipeline and a selector map; its methods read as the steps of a
//! user journey (`click_add_button`, `search_user`, `save_changes`) and hide
//! the DOM traversal behind them.
//!
//! Conventions:
//!
//! - Methods take simple scalars, perform one interaction or one assertion,
//!   and run through the auto-retrying pipeline -- callers chain them
//!   assuming each completed (or failed the spec) before the next begins.
//! - Navigation methods assert the destination rendered, then return a new
//!   page object for it. Screen transitions are forward-only; going back is
//!   an explicit method, never an implicit side effect.
//! - Composite widgets get one method per atomic state change
//!   (`turn_on_toggle_switch` / `validate_toggle_status`), not a
//!   parameterized setter. Specs stay readable at the cost of some
//!   repetition; keep it that way.
//! - Selector values are allowed to be coupled to the UI component library's
//!   generated markup. The coupling lives only in the selector maps; method
//!   signatures never leak it.

mod admin;
mod home;
mod login;
mod menu_config;
mod organization_management;
mod provider_management;
mod reports;
mod sidenav;
mod user_management;
mod validation;

pub use admin::AdminPage;
pub use home::HomePage;
pub use login::{LoginPage, AUTHENTICATED_LANDMARK};
pub use menu_config::{MenuConfigPage, MenuItem};
pub use organization_management::OrganizationManagementPage;
pub use provider_management::ProviderManagementPage;
pub use reports::RoutineReportPage;
pub use sidenav::SideNav;
pub use user_management::UserManagementPage;
pub use validation::ValidationPage;
