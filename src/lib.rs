use rocket::fs::{FileServer, Options};
use rocket::{routes, Build, Rocket};
use rocket_dyn_templates::handlebars::Handlebars;
use rocket_dyn_templates::Template;
use serde::{Deserialize, Serialize};

use crate::modules::cache::PlotCache;
use crate::modules::helpers::handelbars::format_lap_time::FormatLapTime;
use crate::modules::helpers::handelbars::to_json::ToJson;
use crate::modules::plotly::Figure;
use crate::modules::settings::Settings;

pub mod cron_jobs;
pub mod errors;
pub mod macros {
    pub mod request_caching;
}
pub mod modules;
pub mod schema;
pub mod routes {
    pub mod event_result;
    pub mod api {
        pub mod event_result;
    }
}

#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct TemplateDataEventResult {
    pub title: String,
    pub event_name: String,
    pub plotly_js: String,
    pub lap_times: Figure,
    pub race_times: Figure,
    pub table_headers: Vec<String>,
    pub pilots: Vec<TemplateDataPilotStats>,
}

#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct TemplateDataPilotStats {
    pub name: String,
    pub color: String,
    pub laps: usize,
    pub best_lap: Option<f64>,
    pub median: Option<f64>,
    pub q1: Option<f64>,
    pub q3: Option<f64>,
    pub outliers: usize,
    pub holeshot_average: Option<f64>,
    /// `n/N` laps of the best consecutive window
    pub consecutive_laps: String,
    pub consecutive_time: Option<f64>,
}

#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct TemplateDataClassList {
    pub event_name: String,
    pub classes: Vec<TemplateDataClass>,
}

#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct TemplateDataClass {
    pub id: i32,
    pub name: String,
    pub format_name: String,
    pub heats: usize,
}

#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct TemplateDataMessage {
    pub title: String,
    pub message: String,
    pub back_link: bool,
}

/// # register the template helpers
/// shared by the server and the command line renderer
pub fn register_helpers(handlebars: &mut Handlebars) {
    handlebars.register_helper("toJson", Box::new(ToJson));
    handlebars.register_helper("formatLapTime", Box::new(FormatLapTime));
    handlebars.set_strict_mode(true);
}

/// # build the web server
///
/// ## Arguments
/// * `settings` - service settings, managed by rocket for the routes
/// * `cache` - the page cache, shared with the database watcher
pub fn build_rocket(settings: Settings, cache: PlotCache) -> Rocket<Build> {
    let static_dir = settings.static_dir.clone();

    rocket::build()
        .attach(Template::custom(|engines| {
            register_helpers(&mut engines.handlebars);
        }))
        .manage(settings)
        .manage(cache)
        .mount(
            "/",
            routes![
                routes::event_result::index,
                routes::event_result::all,
                routes::event_result::event_results,
                routes::event_result::single,
            ],
        )
        .mount(
            "/api",
            routes![
                routes::api::event_result::list,
                routes::api::event_result::all,
                routes::api::event_result::single,
                routes::api::event_result::results_saved,
            ],
        )
        .mount("/event_plots/static", FileServer::new(static_dir, Options::Missing | Options::Index))
}
