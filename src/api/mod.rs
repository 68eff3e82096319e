//! All API endpoint setup

use axum::Router;
use axum::routing::get;
use axum::routing::post;

pub use current_user::CurrentUser;
pub use current_user::JwtKeys;
pub use request::Form;
pub use request::PathParameters;
pub use response::Error;
pub use response::Success;

use crate::pages;
use crate::storage::Storage;

mod briefing;
mod current_user;
mod issues;
mod projects;
mod request;
mod response;
mod trips;
mod uploads;
mod users;

/// Get the Axum router for all portal routes
///
/// Project and issue routes require a session; the trip, upload, scratchpad
/// and page routes are deliberately public (see DESIGN.md).
pub fn router<S: Storage>() -> Router {
    let sessions = Router::new()
        .route("/register", post(users::register::<S>))
        .route("/login", post(users::token::<S>))
        .route("/logout", get(users::logout::<S>));

    let tracker = Router::new()
        .route(
            "/projects",
            get(projects::list::<S>).post(projects::create::<S>),
        )
        .route(
            "/projects/{project}/issues",
            get(issues::list::<S>).post(issues::create::<S>),
        )
        .route(
            "/issues/{issue}/update",
            get(issues::single::<S>).post(issues::update::<S>),
        );

    let ledger = Router::new()
        .route(
            "/business_trip",
            get(trips::list::<S>).post(trips::create::<S>),
        )
        .route("/remove_trip/{trip}", post(trips::remove::<S>))
        .route("/export_trips", get(trips::export::<S>))
        .route("/add_trip", post(trips::add_fleet_trip))
        .route("/trips", get(trips::fleet_trips));

    let documents = Router::new()
        .route(
            "/network_diagram",
            get(pages::network_diagram).post(uploads::upload_network_diagrams),
        )
        .route("/list_files", get(uploads::list_network_diagrams))
        .route("/work_reports", get(pages::work_reports))
        .route("/upload_work_report", post(uploads::upload_work_reports))
        .route("/list_work_reports", get(uploads::list_work_reports))
        .route("/work_reports/{filename}", get(uploads::fetch_work_report));

    let desk = Router::new()
        .route(
            "/finalbriefing2",
            get(briefing::show_briefing).post(briefing::submit_briefing),
        )
        .route(
            "/add_schedule",
            get(briefing::schedule_status).post(briefing::add_schedule),
        )
        .route("/send_email", post(briefing::send_email));

    let static_pages = Router::new()
        .route("/", get(pages::index))
        .route("/map", get(pages::map))
        .route("/mail-templates", get(pages::mail_templates))
        .route("/Directories", get(pages::directories))
        .route("/vesselist2", get(pages::vessel_list))
        .route("/troubleshooting", get(pages::troubleshooting));

    Router::new()
        .merge(sessions)
        .merge(tracker)
        .merge(ledger)
        .merge(documents)
        .merge(desk)
        .merge(static_pages)
}
