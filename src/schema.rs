// Subset of the RotorHazard database schema. Only the columns read by the
// plots are declared; the host owns the tables and every other column.

diesel::table! {
    pilot (id) {
        id -> Integer,
        callsign -> Nullable<Text>,
        name -> Nullable<Text>,
        color -> Nullable<Text>,
    }
}

diesel::table! {
    heat (id) {
        id -> Integer,
        name -> Nullable<Text>,
        class_id -> Nullable<Integer>,
    }
}

diesel::table! {
    race_class (id) {
        id -> Integer,
        name -> Nullable<Text>,
        format_id -> Nullable<Integer>,
    }
}

diesel::table! {
    race_format (id) {
        id -> Integer,
        name -> Nullable<Text>,
        win_condition -> Nullable<Integer>,
    }
}

diesel::table! {
    saved_race_meta (id) {
        id -> Integer,
        round_id -> Nullable<Integer>,
        heat_id -> Nullable<Integer>,
        class_id -> Nullable<Integer>,
    }
}

diesel::table! {
    saved_pilot_race (id) {
        id -> Integer,
        race_id -> Nullable<Integer>,
        pilot_id -> Nullable<Integer>,
    }
}

diesel::table! {
    saved_race_lap (id) {
        id -> Integer,
        race_id -> Nullable<Integer>,
        pilotrace_id -> Nullable<Integer>,
        pilot_id -> Nullable<Integer>,
        lap_time_stamp -> Nullable<Double>,
        lap_time -> Nullable<Double>,
        deleted -> Nullable<Bool>,
    }
}

diesel::table! {
    global_settings (id) {
        id -> Integer,
        option_name -> Nullable<Text>,
        option_value -> Nullable<Text>,
    }
}

diesel::allow_tables_to_appear_in_same_query!(
    pilot,
    heat,
    race_class,
    race_format,
    saved_race_meta,
    saved_pilot_race,
    saved_race_lap,
    global_settings,
);
