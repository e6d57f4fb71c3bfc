use serde::{Deserialize, Serialize};

use crate::modules::event_data::RunLaps;

pub struct LapHelper {}

/// # best consecutive laps of a pilot
/// `start_lap` is the index of the first lap of the window within its run,
/// the holeshot being lap 0
#[derive(Clone, Serialize, PartialEq, Deserialize, Debug)]
pub struct ConsecutiveWindow {
    pub laps: usize,
    pub total: f64,
    pub race_id: i32,
    pub round: i32,
    pub start_lap: usize,
}

impl ConsecutiveWindow {
    /// # does the window contain a lap
    pub fn contains(&self, race_id: i32, lap: usize) -> bool {
        self.race_id == race_id && lap >= self.start_lap && lap < self.start_lap + self.laps
    }
}

impl LapHelper {
    /// # the laps of a run after the holeshot
    pub fn regular_laps(laps: &[f64]) -> &[f64] {
        laps.get(1..).unwrap_or(&[])
    }

    /// # fastest lap
    /// the fastest lap that is not a holeshot
    pub fn fastest_lap(runs: &[&RunLaps]) -> Option<f64> {
        runs.iter()
            .flat_map(|run| LapHelper::regular_laps(&run.laps))
            .copied()
            .min_by(f64::total_cmp)
    }

    /// # best window of a lap sequence
    /// find the window of `len` contiguous laps with the lowest total.
    /// on a tie the earliest window wins
    ///
    /// ## Returns
    /// * `Option<(usize, f64)>` - start index and total of the window
    pub fn best_window(laps: &[f64], len: usize) -> Option<(usize, f64)> {
        if len == 0 || laps.len() < len {
            return None;
        }

        let mut best: Option<(usize, f64)> = None;
        for start in 0..=laps.len() - len {
            let total: f64 = laps[start..start + len].iter().sum();
            if best.map_or(true, |(_, best_total)| total < best_total) {
                best = Some((start, total));
            }
        }

        best
    }

    /// # best consecutive laps
    /// the lowest total of `base` consecutive laps driven in a single run.
    /// holeshots never count. a pilot that never completed `base` laps in a
    /// run gets the best window of the most laps they did complete
    ///
    /// ## Arguments
    /// * `runs` - the runs of a single pilot in the order they were driven
    /// * `base` - the amount of consecutive laps
    pub fn best_consecutive(runs: &[&RunLaps], base: usize) -> Option<ConsecutiveWindow> {
        let len = runs
            .iter()
            .map(|run| LapHelper::regular_laps(&run.laps).len().min(base))
            .max()
            .filter(|e| *e > 0)?;

        let mut best: Option<ConsecutiveWindow> = None;
        for run in runs {
            let Some((start, total)) = LapHelper::best_window(LapHelper::regular_laps(&run.laps), len) else {
                continue;
            };

            if best.as_ref().map_or(true, |e| total < e.total) {
                best = Some(ConsecutiveWindow {
                    laps: len,
                    total,
                    race_id: run.race_id,
                    round: run.round,
                    start_lap: start + 1,
                });
            }
        }

        best
    }

    /// # running race time after every lap
    pub fn cumulative_times(laps: &[f64]) -> Vec<f64> {
        laps.iter()
            .scan(0.0, |elapsed, lap| {
                *elapsed += lap;
                Some(*elapsed)
            })
            .collect()
    }
}
