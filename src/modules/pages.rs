use std::collections::HashMap;

use log::debug;
use snafu::prelude::*;

use crate::errors::{CustomResult, Error, QuerySnafu};
use crate::modules::event_plot::{EventPlot, PilotRow, PlotTarget};
use crate::modules::event_data::EventData;
use crate::modules::models::general::establish_connection;
use crate::modules::models::heat::Heat;
use crate::modules::models::race_class::RaceClass;
use crate::modules::models::race_format::RaceFormat;
use crate::modules::plotly::Figure;
use crate::modules::settings::Settings;
use crate::{TemplateDataClass, TemplateDataClassList, TemplateDataEventResult, TemplateDataMessage, TemplateDataPilotStats};

/// # what the event result index shows
#[derive(Clone, Debug, PartialEq)]
pub enum IndexPage {
    List(TemplateDataClassList),
    Plot(PlotTarget),
}

/// # the page of a plot
/// both figures and the statistics table
pub fn event_result_page(settings: &Settings, target: PlotTarget) -> CustomResult<TemplateDataEventResult> {
    let plot = EventPlot::generate(settings, target)?;
    Ok(TemplateDataEventResult::new(&plot, &settings.plotly_js))
}

/// # decide what the index shows
/// a single class is shown right away, without classes every lap of the
/// event is plotted
pub fn index_page(settings: &Settings) -> CustomResult<IndexPage> {
    let list = class_list(settings)?;
    match list.classes.as_slice() {
        [] => Ok(IndexPage::Plot(PlotTarget::Event)),
        [class] => Ok(IndexPage::Plot(PlotTarget::Class(class.id))),
        _ => Ok(IndexPage::List(list)),
    }
}

/// # list the race classes of the event
pub fn class_list(settings: &Settings) -> CustomResult<TemplateDataClassList> {
    let conn = &mut establish_connection(&settings.database_path)?;

    let classes = RaceClass::get_all(conn).context(QuerySnafu { what: "race classes" })?;
    let heats = Heat::get_all(conn).context(QuerySnafu { what: "heats" })?;

    let mut heats_per_class: HashMap<i32, usize> = HashMap::new();
    for class_id in heats.iter().filter_map(|e| e.class_id) {
        *heats_per_class.entry(class_id).or_insert(0) += 1;
    }

    let mut list = Vec::with_capacity(classes.len());
    for class in &classes {
        let format_name = match class.format_id {
            Some(format_id) if format_id > 0 => RaceFormat::get_by_id(conn, format_id)
                .context(QuerySnafu { what: "race format" })?
                .and_then(|e| e.name)
                .unwrap_or_default(),
            _ => String::new(),
        };

        list.push(TemplateDataClass {
            id: class.id,
            name: class.display_name(),
            format_name,
            heats: heats_per_class.get(&class.id).copied().unwrap_or(0),
        });
    }
    debug!(target: "pages:class_list", "found {} race classes", list.len());

    Ok(TemplateDataClassList {
        event_name: EventData::event_name(conn)?,
        classes: list,
    })
}

impl TemplateDataEventResult {
    pub fn new(plot: &EventPlot, plotly_js: &str) -> TemplateDataEventResult {
        let consecutive_header = format!("Best {} Consecutive", plot.consecutive_base);
        let mut table_headers: Vec<String> = [
            "Pilot", "Laps", "Best Lap", "Median", "Q1", "Q3", "Outliers", "Hole Shot Avg",
        ]
        .iter()
        .map(|e| e.to_string())
        .collect();
        table_headers.push(consecutive_header);

        TemplateDataEventResult {
            title: plot.title.clone(),
            event_name: plot.event_name.clone(),
            plotly_js: plotly_js.to_string(),
            lap_times: Figure::lap_times(plot),
            race_times: Figure::race_times(plot),
            table_headers,
            pilots: plot
                .rows
                .iter()
                .map(|e| TemplateDataPilotStats::new(e, plot.consecutive_base))
                .collect(),
        }
    }
}

impl TemplateDataPilotStats {
    pub fn new(row: &PilotRow, consecutive_base: usize) -> TemplateDataPilotStats {
        let stats = row.stats.as_ref();
        TemplateDataPilotStats {
            name: row.name.clone(),
            color: row.color.clone(),
            laps: row.laps.len(),
            best_lap: row.best_lap,
            median: stats.map(|e| e.median),
            q1: stats.map(|e| e.q1),
            q3: stats.map(|e| e.q3),
            outliers: stats.map_or(0, |e| e.outliers.len()),
            holeshot_average: row.holeshot_average,
            consecutive_laps: format!(
                "{}/{}",
                row.best_consecutive.as_ref().map_or(0, |e| e.laps),
                consecutive_base
            ),
            consecutive_time: row.best_consecutive.as_ref().map(|e| e.total),
        }
    }
}

impl TemplateDataMessage {
    /// # message shown instead of a plot
    /// `None` for errors that are not caused by missing data
    pub fn from_error(error: &Error) -> Option<TemplateDataMessage> {
        let title = match error {
            Error::NoRacesError { .. } => "No race data available",
            Error::NoPilotsError { .. } => "No pilots found",
            Error::NoLapsError { .. } => "No lap data available",
            Error::ClassNotFoundError { .. } => "Race class not found",
            _ => return None,
        };

        Some(TemplateDataMessage {
            title: title.to_string(),
            message: error.to_string(),
            back_link: true,
        })
    }

    pub fn failure(error: &Error) -> TemplateDataMessage {
        TemplateDataMessage {
            title: "Error loading plot".to_string(),
            message: error.to_string(),
            back_link: true,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::modules::event_plot::tests::{data, pilot, run};
    use crate::modules::models::race_format::WinCondition;

    #[test]
    fn table_rows_follow_plot_order() {
        let plot = EventPlot::build(&data(
            WinCondition::FastestConsecutive,
            vec![pilot(1, "Slow"), pilot(2, "Fast")],
            vec![run(1, 1, 1, &[2.0, 25.0, 24.0]), run(2, 1, 1, &[2.5, 21.0, 22.0, 21.5, 40.0])],
        ))
        .unwrap();
        let page = TemplateDataEventResult::new(&plot, "/plotly.js");

        assert_eq!(page.table_headers.last().map(String::as_str), Some("Best 3 Consecutive"));
        assert_eq!(page.pilots[0].name, "Fast");
        assert_eq!(page.pilots[0].laps, 5);
        assert_eq!(page.pilots[0].consecutive_laps, "3/3");
        assert_eq!(page.pilots[0].consecutive_time, Some(64.5));
        assert_eq!(page.pilots[1].consecutive_laps, "2/3");
        assert_eq!(page.plotly_js, "/plotly.js");
    }

    #[test]
    fn missing_data_becomes_a_message() {
        let message = TemplateDataMessage::from_error(&Error::NoLapsError { name: "Open".to_string() }).unwrap();
        assert_eq!(message.title, "No lap data available");
        assert_eq!(message.message, "no lap data found for 'Open'");

        let missing = TemplateDataMessage::from_error(&Error::DatabaseMissingError {
            path: "database.db".into(),
        });
        assert_eq!(missing, None);
    }
}
