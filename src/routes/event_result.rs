use log::{error, info};
use rocket::get;
use rocket::http::uri::Origin;
use rocket::http::Status;
use rocket::State;
use rocket_dyn_templates::Template;

use crate::errors::Error;
use crate::macros::request_caching::{cache_response, read_cache_request};
use crate::modules::cache::PlotCache;
use crate::modules::event_plot::PlotTarget;
use crate::modules::pages::{event_result_page, index_page, IndexPage};
use crate::modules::settings::Settings;
use crate::{TemplateDataEventResult, TemplateDataMessage};

/**************************************************************************************************/
/**************** ROUTES **************************************************************************/
/**************************************************************************************************/

/// # event result index
/// the list of race classes. with a single class its plot is shown right
/// away and without classes every lap of the event is plotted
#[get("/event_result")]
pub fn index(origin: &Origin, settings: &State<Settings>, cache: &State<PlotCache>) -> (Status, Template) {
    match index_page(settings) {
        Ok(IndexPage::List(list)) => (Status::Ok, Template::render("class_list", list)),
        Ok(IndexPage::Plot(target)) => plot_page(origin, settings, cache, target),
        Err(error) => error_page("routes/event_result:index", error),
    }
}

/// # every lap of the event
#[get("/event_result/all")]
pub fn all(origin: &Origin, settings: &State<Settings>, cache: &State<PlotCache>) -> (Status, Template) {
    plot_page(origin, settings, cache, PlotTarget::Event)
}

/// # every lap of the event
/// the address used by older versions of the plugin
#[get("/event_results")]
pub fn event_results(origin: &Origin, settings: &State<Settings>, cache: &State<PlotCache>) -> (Status, Template) {
    plot_page(origin, settings, cache, PlotTarget::Event)
}

#[get("/event_result/<class_id>")]
pub fn single(class_id: i32, origin: &Origin, settings: &State<Settings>, cache: &State<PlotCache>) -> (Status, Template) {
    plot_page(origin, settings, cache, PlotTarget::Class(class_id))
}

/**************************************************************************************************/
/**************** HELPERS *************************************************************************/
/**************************************************************************************************/

fn plot_page(origin: &Origin, settings: &Settings, cache: &PlotCache, target: PlotTarget) -> (Status, Template) {
    read_cache_request!(cache, origin, render_plot);

    match event_result_page(settings, target) {
        Ok(page) => cache_response!(cache, origin, page, render_plot),
        Err(error) => error_page("routes/event_result:plot_page", error),
    }
}

fn render_plot(page: TemplateDataEventResult) -> (Status, Template) {
    (Status::Ok, Template::render("event_result", page))
}

/// # page shown instead of a plot
/// missing data is a message for the user, anything else is logged as an error
fn error_page(target: &str, error: Error) -> (Status, Template) {
    match TemplateDataMessage::from_error(&error) {
        Some(message) => {
            info!(target: target, "{}", error);
            let status = match error {
                Error::ClassNotFoundError { .. } => Status::NotFound,
                _ => Status::Ok,
            };
            (status, Template::render("message", message))
        }
        None => {
            error!(target: target, "error building page: {}", error);
            (
                Status::InternalServerError,
                Template::render("message", TemplateDataMessage::failure(&error)),
            )
        }
    }
}
