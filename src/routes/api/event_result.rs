use log::{error, info};
use rocket::http::uri::Origin;
use rocket::http::Status;
use rocket::serde::json::Json;
use rocket::{get, post, State};
use serde::{Deserialize, Serialize};

use crate::errors::Error;
use crate::macros::request_caching::{cache_response, read_cache_request};
use crate::modules::cache::PlotCache;
use crate::modules::event_plot::{EventPlot, PlotTarget};
use crate::modules::pages::class_list;
use crate::modules::settings::Settings;
use crate::TemplateDataClass;

#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct ApiError {
    pub status: u16,
    pub message: String,
}

pub type ApiResult<T> = Result<Json<T>, (Status, Json<ApiError>)>;

/**************************************************************************************************/
/**************** ROUTES **************************************************************************/
/**************************************************************************************************/

/// # list the race classes
#[get("/event_result")]
pub fn list(settings: &State<Settings>) -> ApiResult<Vec<TemplateDataClass>> {
    match class_list(settings) {
        Ok(list) => Ok(Json(list.classes)),
        Err(error) => Err(api_error("routes/api/event_result:list", error)),
    }
}

/// # plot of every lap of the event
#[get("/event_result/all")]
pub fn all(origin: &Origin, settings: &State<Settings>, cache: &State<PlotCache>) -> ApiResult<EventPlot> {
    plot(origin, settings, cache, PlotTarget::Event)
}

/// # plot of a race class
#[get("/event_result/<class_id>")]
pub fn single(class_id: i32, origin: &Origin, settings: &State<Settings>, cache: &State<PlotCache>) -> ApiResult<EventPlot> {
    plot(origin, settings, cache, PlotTarget::Class(class_id))
}

/// # results saved hook
/// called by the timing server after a race is saved, drops every cached
/// page so the next request sees the new laps
#[post("/results_saved")]
pub fn results_saved(cache: &State<PlotCache>) -> Status {
    let removed = cache.clear();
    info!(target: "routes/api/event_result:results_saved", "results saved, cleared {} cached pages", removed);
    Status::NoContent
}

/**************************************************************************************************/
/**************** HELPERS *************************************************************************/
/**************************************************************************************************/

fn plot(origin: &Origin, settings: &Settings, cache: &PlotCache, target: PlotTarget) -> ApiResult<EventPlot> {
    read_cache_request!(cache, origin, respond);

    match EventPlot::generate(settings, target) {
        Ok(plot) => cache_response!(cache, origin, plot, respond),
        Err(error) => Err(api_error("routes/api/event_result:plot", error)),
    }
}

fn respond(plot: EventPlot) -> ApiResult<EventPlot> {
    Ok(Json(plot))
}

fn api_error(target: &str, error: Error) -> (Status, Json<ApiError>) {
    let status = match error {
        Error::ClassNotFoundError { .. } => Status::NotFound,
        ref e if e.is_empty_data() => Status::NotFound,
        _ => {
            error!(target: target, "{}", error);
            Status::InternalServerError
        }
    };

    (
        status,
        Json(ApiError {
            status: status.code,
            message: error.to_string(),
        }),
    )
}
