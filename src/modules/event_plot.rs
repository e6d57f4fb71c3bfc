use std::cmp::Ordering;
use std::collections::{BTreeSet, HashMap};

use log::{debug, info};
use serde::{Deserialize, Serialize};
use snafu::prelude::*;

use crate::errors::{CustomResult, NoLapsSnafu, NoPilotsSnafu};
use crate::modules::event_data::{EventData, RunLaps};
use crate::modules::helpers::lap::{ConsecutiveWindow, LapHelper};
use crate::modules::helpers::math::{BoxStats, Math};
use crate::modules::models::general::establish_connection;
use crate::modules::models::pilot::Pilot;
use crate::modules::models::race_format::WinCondition;
use crate::modules::settings::Settings;

/// colours handed out to heats and to pilots without a colour of their own
pub const PALETTE: [&str; 10] = [
    "#1f77b4", "#ff7f0e", "#2ca02c", "#d62728", "#9467bd", "#8c564b", "#e377c2", "#7f7f7f", "#bcbd22", "#17becf",
];

/// # what to plot
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PlotTarget {
    Class(i32),
    /// every lap of the event regardless of class
    Event,
}

#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct PlotLap {
    pub race_id: i32,
    pub heat_id: i32,
    pub round: i32,
    /// index within the run, the holeshot is lap 0
    pub lap: usize,
    pub time: f64,
    pub holeshot: bool,
    pub fastest: bool,
    pub best_consecutive: bool,
}

/// # race time of one pilot in one race
#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct RunSeries {
    pub race_id: i32,
    pub heat_id: i32,
    pub round: i32,
    /// elapsed race time after every lap, holeshot included
    pub cumulative: Vec<f64>,
}

#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct PilotRow {
    pub pilot_id: i32,
    /// unique within the plot, used as the category of the row
    pub name: String,
    pub color: String,
    /// the y axis tick text
    pub label: String,
    pub laps: Vec<PlotLap>,
    /// statistics of the laps after the holeshot
    pub stats: Option<BoxStats>,
    pub holeshot_average: Option<f64>,
    pub best_lap: Option<f64>,
    pub best_consecutive: Option<ConsecutiveWindow>,
    pub runs: Vec<RunSeries>,
}

impl PilotRow {
    pub fn regular_laps(&self) -> impl Iterator<Item = &PlotLap> {
        self.laps.iter().filter(|e| !e.holeshot)
    }

    pub fn holeshots(&self) -> impl Iterator<Item = &PlotLap> {
        self.laps.iter().filter(|e| e.holeshot)
    }
}

/// # lap time plot of a class
/// rows are ordered fastest first
#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct EventPlot {
    pub title: String,
    pub event_name: String,
    pub class_name: String,
    pub win_condition: WinCondition,
    pub consecutive_base: usize,
    pub row_height: u32,
    pub rows: Vec<PilotRow>,
    /// every heat with laps, ascending
    pub heats: Vec<i32>,
}

impl EventPlot {
    /// # load and build a plot
    /// opens its own read only connection to the RotorHazard database
    ///
    /// ## Arguments
    /// * `settings` - service settings
    /// * `target` - the class to plot or the whole event
    pub fn generate(settings: &Settings, target: PlotTarget) -> CustomResult<EventPlot> {
        let conn = &mut establish_connection(&settings.database_path)?;
        let data = match target {
            PlotTarget::Class(class_id) => EventData::load_class(conn, class_id, settings)?,
            PlotTarget::Event => EventData::load_event(conn, settings)?,
        };

        let plot = EventPlot::build(&data)?;
        info!(target: "event_plot:generate", "built plot '{}' with {} pilots", plot.title, plot.rows.len());
        Ok(plot)
    }

    /// # build the plot of loaded data
    /// every recorded lap ends up in exactly one row
    ///
    /// ## Arguments
    /// * `data` - the laps and settings of a class or event
    ///
    /// ## Returns
    /// * `EventPlot` - the plot, or an error when there are no pilots or laps
    pub fn build(data: &EventData) -> CustomResult<EventPlot> {
        ensure!(
            !data.runs.is_empty() || !data.pilots.is_empty(),
            NoPilotsSnafu { name: data.display_name() }
        );

        let pilots: HashMap<i32, &Pilot> = data.pilots.iter().map(|e| (e.id, e)).collect();

        // pilots in order of first appearance
        let mut pilot_ids: Vec<i32> = Vec::new();
        let mut runs_per_pilot: HashMap<i32, Vec<&RunLaps>> = HashMap::new();
        for run in &data.runs {
            let runs = runs_per_pilot.entry(run.pilot_id).or_default();
            if runs.is_empty() {
                pilot_ids.push(run.pilot_id);
            }
            runs.push(run);
        }

        let names = EventPlot::unique_names(&pilot_ids, &pilots);

        let mut rows = Vec::new();
        for (index, pilot_id) in pilot_ids.iter().enumerate() {
            let runs = &runs_per_pilot[pilot_id];
            if runs.iter().all(|e| e.laps.is_empty()) {
                debug!(target: "event_plot:build", "pilot {} has no laps", pilot_id);
                continue;
            }

            let color = pilots
                .get(pilot_id)
                .and_then(|e| e.display_color())
                .unwrap_or_else(|| PALETTE[index % PALETTE.len()].to_string());

            rows.push(EventPlot::build_row(*pilot_id, names[index].clone(), color, runs, data));
        }

        ensure!(!rows.is_empty(), NoLapsSnafu { name: data.display_name() });

        match data.win_condition {
            WinCondition::FastestConsecutive => rows.sort_by(|a, b| EventPlot::cmp_consecutive(a, b, data.consecutive_base)),
            _ => rows.sort_by(EventPlot::cmp_best_lap),
        }

        let heats: BTreeSet<i32> = data
            .runs
            .iter()
            .filter(|e| !e.laps.is_empty())
            .map(|e| e.heat_id)
            .collect();

        Ok(EventPlot {
            title: EventPlot::title(data),
            event_name: data.event_name.clone(),
            class_name: data.class_name.clone(),
            win_condition: data.win_condition,
            consecutive_base: data.consecutive_base,
            row_height: data.row_height,
            rows,
            heats: heats.into_iter().collect(),
        })
    }

    /// # colour of a heat
    pub fn heat_color(&self, heat_id: i32) -> &'static str {
        let index = self.heats.iter().position(|e| *e == heat_id).unwrap_or(0);
        PALETTE[index % PALETTE.len()]
    }

    pub fn height(&self) -> u32 {
        u32::try_from(self.rows.len())
            .unwrap_or(u32::MAX)
            .saturating_mul(self.row_height)
    }

    fn build_row(pilot_id: i32, name: String, color: String, runs: &[&RunLaps], data: &EventData) -> PilotRow {
        let best_lap = LapHelper::fastest_lap(runs);
        let best_consecutive = LapHelper::best_consecutive(runs, data.consecutive_base);

        let mut laps = Vec::new();
        let mut holeshots = Vec::new();
        let mut regular = Vec::new();
        for run in runs {
            for (index, time) in run.laps.iter().copied().enumerate() {
                let holeshot = index == 0;
                if holeshot {
                    holeshots.push(time);
                } else {
                    regular.push(time);
                }

                laps.push(PlotLap {
                    race_id: run.race_id,
                    heat_id: run.heat_id,
                    round: run.round,
                    lap: index,
                    time,
                    holeshot,
                    fastest: !holeshot && best_lap == Some(time),
                    best_consecutive: best_consecutive
                        .as_ref()
                        .map_or(false, |e| e.contains(run.race_id, index)),
                });
            }
        }

        let series = runs
            .iter()
            .filter(|e| !e.laps.is_empty())
            .map(|e| RunSeries {
                race_id: e.race_id,
                heat_id: e.heat_id,
                round: e.round,
                cumulative: LapHelper::cumulative_times(&e.laps),
            })
            .collect();

        let label = match data.win_condition {
            WinCondition::FastestConsecutive => match &best_consecutive {
                Some(window) => format!("{}<br>{}/{} {:.2}s", name, window.laps, data.consecutive_base, window.total),
                None => format!("{}<br>0/{} 0.00s", name, data.consecutive_base),
            },
            _ => match best_lap {
                Some(best) if best > 0.0 => format!("{}<br>Best: {:.2}s", name, best),
                _ => name.clone(),
            },
        };

        PilotRow {
            pilot_id,
            name,
            color,
            label,
            laps,
            stats: BoxStats::from_samples(&regular),
            holeshot_average: Math::mean(&holeshots),
            best_lap,
            best_consecutive,
            runs: series,
        }
    }

    /// names of the pilots, made unique by adding the id to duplicates
    fn unique_names(pilot_ids: &[i32], pilots: &HashMap<i32, &Pilot>) -> Vec<String> {
        let names: Vec<String> = pilot_ids
            .iter()
            .map(|id| match pilots.get(id) {
                Some(pilot) => pilot.display_name(),
                None => format!("Pilot {}", id),
            })
            .collect();

        let mut counts: HashMap<&str, usize> = HashMap::new();
        for name in &names {
            *counts.entry(name).or_insert(0) += 1;
        }

        names
            .iter()
            .zip(pilot_ids)
            .map(|(name, id)| match counts[name.as_str()] {
                1 => name.clone(),
                _ => format!("{} (#{})", name, id),
            })
            .collect()
    }

    /// fastest single lap first, pilots without a lap after the holeshot last
    fn cmp_best_lap(a: &PilotRow, b: &PilotRow) -> Ordering {
        match (a.best_lap, b.best_lap) {
            (Some(x), Some(y)) => x.total_cmp(&y).then_with(|| a.name.cmp(&b.name)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.name.cmp(&b.name),
        }
    }

    /// complete windows first, then windows one lap short and so on.
    /// within the same window length the fastest total comes first
    fn cmp_consecutive(a: &PilotRow, b: &PilotRow, base: usize) -> Ordering {
        let key = |row: &PilotRow| {
            row.best_consecutive
                .as_ref()
                .map(|e| (base.saturating_sub(e.laps), e.total))
        };

        match (key(a), key(b)) {
            (Some((missing_a, total_a)), Some((missing_b, total_b))) => missing_a
                .cmp(&missing_b)
                .then_with(|| total_a.total_cmp(&total_b))
                .then_with(|| a.name.cmp(&b.name)),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.name.cmp(&b.name),
        }
    }

    fn title(data: &EventData) -> String {
        let format = data.format_name.trim();
        let class = data.class_name.trim();

        match data.win_condition {
            WinCondition::FastestConsecutive => {
                let consecutive = format!("{} Consecutive Laps - Lap Times", data.consecutive_base);
                match (format.is_empty(), class.is_empty()) {
                    (false, false) => format!("{} - {} - {}", format, class, consecutive),
                    (_, false) => format!("{} - {}", class, consecutive),
                    _ => consecutive,
                }
            }
            _ => match (format.is_empty(), class.is_empty()) {
                (false, false) => format!("{} - {} - Lap Times", format, class),
                (true, false) => format!("{} - Lap Times", class),
                (false, true) => format!("{} - Lap Times", format),
                (true, true) => format!("{} - Lap Times", data.event_name),
            },
        }
    }
}

#[cfg(test)]
pub mod tests {
    use super::*;
    use crate::errors::Error;
    use crate::modules::plotly::Figure;
    use proptest::prelude::*;

    pub fn pilot(id: i32, callsign: &str) -> Pilot {
        Pilot {
            id,
            callsign: Some(callsign.to_string()),
            name: None,
            color: None,
        }
    }

    pub fn run(pilot_id: i32, race_id: i32, heat_id: i32, laps: &[f64]) -> RunLaps {
        RunLaps {
            pilot_id,
            race_id,
            heat_id,
            round: race_id,
            laps: laps.to_vec(),
        }
    }

    pub fn data(win_condition: WinCondition, pilots: Vec<Pilot>, runs: Vec<RunLaps>) -> EventData {
        EventData {
            event_name: "Summer Cup".to_string(),
            class_name: "Open".to_string(),
            format_name: "Qualifier".to_string(),
            win_condition,
            consecutive_base: 3,
            row_height: 100,
            pilots,
            runs,
        }
    }

    fn row<'a>(plot: &'a EventPlot, name: &str) -> &'a PilotRow {
        plot.rows.iter().find(|e| e.name == name).unwrap()
    }

    #[test]
    fn rows_are_ordered_by_best_lap() {
        let plot = EventPlot::build(&data(
            WinCondition::FastestLap,
            vec![pilot(1, "Slow"), pilot(2, "Fast"), pilot(3, "Holeshot")],
            vec![
                run(1, 1, 1, &[2.0, 25.0, 24.0]),
                run(2, 1, 1, &[2.5, 21.0, 22.0]),
                run(3, 1, 1, &[1.0]),
            ],
        ))
        .unwrap();

        let names: Vec<&str> = plot.rows.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Fast", "Slow", "Holeshot"]);
        assert_eq!(plot.rows[0].label, "Fast<br>Best: 21.00s");
        assert_eq!(plot.rows[2].label, "Holeshot");
        assert_eq!(plot.title, "Qualifier - Open - Lap Times");
        assert_eq!(plot.height(), 300);
    }

    #[test]
    fn fastest_lap_flags_every_equal_lap() {
        let plot = EventPlot::build(&data(
            WinCondition::FastestLap,
            vec![pilot(1, "Ace")],
            vec![run(1, 1, 1, &[20.0, 20.5, 22.0]), run(1, 2, 1, &[3.0, 20.5, 21.0])],
        ))
        .unwrap();

        let ace = row(&plot, "Ace");
        let fastest: Vec<(i32, usize)> = ace.laps.iter().filter(|e| e.fastest).map(|e| (e.race_id, e.lap)).collect();
        assert_eq!(fastest, vec![(1, 1), (2, 1)]);
        assert_eq!(ace.best_lap, Some(20.5));
        assert_eq!(ace.holeshot_average, Some(11.5));
    }

    #[test]
    fn consecutive_ordering_prefers_complete_windows() {
        let mut input = data(
            WinCondition::FastestConsecutive,
            vec![pilot(1, "Short"), pilot(2, "Full"), pilot(3, "None"), pilot(4, "Quick")],
            vec![
                run(1, 1, 1, &[2.0, 10.0, 10.0]),
                run(2, 1, 1, &[2.0, 20.0, 20.0, 20.0]),
                run(3, 1, 1, &[2.0]),
                run(4, 1, 1, &[2.0, 19.0, 19.0, 19.0, 30.0]),
            ],
        );
        input.format_name = String::new();
        let plot = EventPlot::build(&input).unwrap();

        let names: Vec<&str> = plot.rows.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Quick", "Full", "Short", "None"]);
        assert_eq!(plot.rows[0].label, "Quick<br>3/3 57.00s");
        assert_eq!(plot.rows[2].label, "Short<br>2/3 20.00s");
        assert_eq!(plot.rows[3].label, "None<br>0/3 0.00s");
        assert_eq!(plot.title, "Open - 3 Consecutive Laps - Lap Times");

        let flagged: Vec<usize> = row(&plot, "Quick").laps.iter().filter(|e| e.best_consecutive).map(|e| e.lap).collect();
        assert_eq!(flagged, vec![1, 2, 3]);
    }

    #[test]
    fn titles_fall_back() {
        let mut input = data(WinCondition::None, vec![pilot(1, "A")], vec![run(1, 1, 1, &[1.0, 20.0])]);
        input.class_name = String::new();
        assert_eq!(EventPlot::title(&input), "Qualifier - Lap Times");
        input.format_name = String::new();
        assert_eq!(EventPlot::title(&input), "Summer Cup - Lap Times");
        input.win_condition = WinCondition::FastestConsecutive;
        assert_eq!(EventPlot::title(&input), "3 Consecutive Laps - Lap Times");
        input.class_name = "Open".to_string();
        input.format_name = "Qualifier".to_string();
        assert_eq!(EventPlot::title(&input), "Qualifier - Open - 3 Consecutive Laps - Lap Times");
    }

    #[test]
    fn duplicate_names_get_an_id() {
        let plot = EventPlot::build(&data(
            WinCondition::None,
            vec![pilot(1, "Bee"), pilot(2, "Bee")],
            vec![run(1, 1, 1, &[1.0, 20.0]), run(2, 1, 1, &[1.0, 21.0]), run(9, 1, 1, &[1.0, 22.0])],
        ))
        .unwrap();

        let names: Vec<&str> = plot.rows.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["Bee (#1)", "Bee (#2)", "Pilot 9"]);
    }

    #[test]
    fn pilot_colors_fall_back_to_palette() {
        let mut colored = pilot(1, "Red");
        colored.color = Some("#FF0000".to_string());
        let plot = EventPlot::build(&data(
            WinCondition::None,
            vec![colored, pilot(2, "Plain")],
            vec![run(1, 1, 1, &[1.0, 20.0]), run(2, 1, 1, &[1.0, 21.0])],
        ))
        .unwrap();

        assert_eq!(row(&plot, "Red").color, "#ff0000");
        assert_eq!(row(&plot, "Plain").color, PALETTE[1]);
    }

    #[test]
    fn heats_get_colors_in_order() {
        let plot = EventPlot::build(&data(
            WinCondition::MostProgress,
            vec![pilot(1, "A")],
            vec![run(1, 1, 7, &[1.0, 20.0]), run(1, 2, 3, &[1.0, 21.0]), run(1, 3, 5, &[])],
        ))
        .unwrap();

        assert_eq!(plot.heats, vec![3, 7]);
        assert_eq!(plot.heat_color(3), PALETTE[0]);
        assert_eq!(plot.heat_color(7), PALETTE[1]);
        assert_eq!(plot.rows[0].runs.len(), 2);
    }

    #[test]
    fn empty_data_is_reported() {
        let no_runs = data(WinCondition::None, vec![], vec![]);
        assert!(matches!(EventPlot::build(&no_runs), Err(Error::NoPilotsError { .. })));

        let no_laps = data(WinCondition::None, vec![pilot(1, "A")], vec![run(1, 1, 1, &[])]);
        assert!(matches!(EventPlot::build(&no_laps), Err(Error::NoLapsError { .. })));

        let pilots_without_runs = data(WinCondition::None, vec![pilot(1, "A")], vec![]);
        assert!(matches!(EventPlot::build(&pilots_without_runs), Err(Error::NoLapsError { .. })));
    }

    #[test]
    fn height_saturates() {
        let mut input = data(
            WinCondition::None,
            vec![pilot(1, "A"), pilot(2, "B")],
            vec![run(1, 1, 1, &[1.0, 20.0]), run(2, 1, 1, &[1.0, 21.0])],
        );
        input.row_height = 3_000_000_000;
        let plot = EventPlot::build(&input).unwrap();

        assert_eq!(plot.height(), u32::MAX);
        assert_eq!(Figure::lap_times(&plot).layout.height, u32::MAX);
    }

    fn runs_strategy() -> impl Strategy<Value = Vec<RunLaps>> {
        prop::collection::vec(
            (1i32..6, 1i32..4, prop::collection::vec(8.0f64..60.0, 0..8)),
            1..20,
        )
        .prop_map(|runs| {
            runs.into_iter()
                .enumerate()
                .map(|(race, (pilot_id, heat_id, laps))| run(pilot_id, race as i32 + 1, heat_id, &laps))
                .collect()
        })
    }

    proptest! {
        #[test]
        fn displayed_laps_equal_recorded_laps(runs in runs_strategy(), condition in 0i32..6) {
            let pilots = (1..6).map(|e| pilot(e, &format!("P{}", e))).collect();
            let input = data(WinCondition::from_id(condition), pilots, runs.clone());

            let Ok(plot) = EventPlot::build(&input) else {
                prop_assert!(runs.iter().all(|e| e.laps.is_empty()));
                return Ok(());
            };

            for row in &plot.rows {
                let mut recorded: Vec<f64> = runs.iter().filter(|e| e.pilot_id == row.pilot_id).flat_map(|e| e.laps.clone()).collect();
                let mut displayed: Vec<f64> = row.laps.iter().map(|e| e.time).collect();
                recorded.sort_by(f64::total_cmp);
                displayed.sort_by(f64::total_cmp);
                prop_assert_eq!(recorded, displayed);

                // one holeshot per race with laps
                let races: BTreeSet<i32> = row.laps.iter().map(|e| e.race_id).collect();
                for race in races {
                    prop_assert_eq!(row.laps.iter().filter(|e| e.race_id == race && e.holeshot).count(), 1);
                }
            }

            let pilots_with_laps: BTreeSet<i32> = runs.iter().filter(|e| !e.laps.is_empty()).map(|e| e.pilot_id).collect();
            prop_assert_eq!(plot.rows.len(), pilots_with_laps.len());
        }

        #[test]
        fn rows_are_fastest_first(runs in runs_strategy()) {
            let pilots = (1..6).map(|e| pilot(e, &format!("P{}", e))).collect();
            let Ok(plot) = EventPlot::build(&data(WinCondition::FastestLap, pilots, runs)) else {
                return Ok(());
            };

            let best: Vec<Option<f64>> = plot.rows.iter().map(|e| e.best_lap).collect();
            for pair in best.windows(2) {
                match (pair[0], pair[1]) {
                    (Some(a), Some(b)) => prop_assert!(a <= b),
                    (None, Some(_)) => prop_assert!(false, "pilot without laps above a timed pilot"),
                    _ => {}
                }
            }
        }
    }
}
