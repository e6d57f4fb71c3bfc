pub mod cache;
pub mod event_data;
pub mod event_plot;
pub mod pages;
pub mod plotly;
pub mod settings;

pub mod models {
    pub mod heat;
    pub mod lap;
    pub mod pilot;
    pub mod race;
    pub mod race_class;
    pub mod race_format;

    pub mod general;
}

pub mod helpers {
    pub mod lap;
    pub mod math;

    pub mod logging;

    pub mod handelbars {
        pub mod format_lap_time;
        pub mod to_json;
    }
}
