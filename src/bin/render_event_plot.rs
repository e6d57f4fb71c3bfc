use std::env;
use std::error::Error;
use std::fs;
use std::path::PathBuf;

use clap::{ArgGroup, Parser};
use dotenvy::dotenv;
use log::{info, warn};
use rocket_dyn_templates::handlebars::Handlebars;

use event_plots::modules::event_plot::PlotTarget;
use event_plots::modules::helpers::logging::setup_logging;
use event_plots::modules::pages::event_result_page;
use event_plots::modules::settings::{Settings, DATABASE_VAR};
use event_plots::{register_helpers, TemplateDataMessage};

/// render the lap time plots of a RotorHazard event to a standalone html page
#[derive(Parser, Debug)]
#[command(version, about)]
#[command(group(ArgGroup::new("target").required(true).args(["class", "all"])))]
struct Args {
    /// id of the race class to plot
    #[arg(long)]
    class: Option<i32>,

    /// plot every lap of the event
    #[arg(long)]
    all: bool,

    /// file the page is written to
    #[arg(long, short)]
    output: PathBuf,

    /// RotorHazard database, overrides EVENT_PLOTS_DATABASE
    #[arg(long)]
    database: Option<PathBuf>,

    #[arg(long, default_value = "templates")]
    templates: PathBuf,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();

    dotenv().ok();
    let database = args.database.as_ref().map(|e| e.to_string_lossy().to_string());
    let settings = Settings::from_vars(|key| match (key, &database) {
        (DATABASE_VAR, Some(path)) => Some(path.clone()),
        _ => env::var(key).ok(),
    })?;
    setup_logging(settings.logging_level, &settings.log_file)?;

    let mut handlebars = Handlebars::new();
    register_helpers(&mut handlebars);
    handlebars.register_template_file("event_result", args.templates.join("event_result.html.hbs"))?;
    handlebars.register_template_file("message", args.templates.join("message.html.hbs"))?;

    let target = match args.class {
        Some(class_id) => PlotTarget::Class(class_id),
        None => PlotTarget::Event,
    };

    let page = match event_result_page(&settings, target) {
        Ok(page) => handlebars.render("event_result", &page)?,
        Err(error) => match TemplateDataMessage::from_error(&error) {
            Some(message) => {
                warn!(target: "render_event_plot", "{}", error);
                handlebars.render("message", &message)?
            }
            None => return Err(error.into()),
        },
    };

    fs::write(&args.output, page)?;
    info!(target: "render_event_plot", "wrote {}", args.output.display());

    Ok(())
}
