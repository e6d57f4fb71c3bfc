use rocket_dyn_templates::handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext, RenderError,
};

/// # lap time formatting helper
/// a formatter to display a time in seconds with two decimals.
/// missing times are shown as a dash
///
/// ### usage
/// ```handlebars
/// {{formatLapTime 21.456}}
/// {{formatLapTime null}}
/// ```
#[derive(Clone, Copy)]
pub struct FormatLapTime;

impl HelperDef for FormatLapTime {
    fn call<'reg: 'rc, 'rc>(
        &self,
        helper: &Helper,
        _: &Handlebars,
        _: &Context,
        _: &mut RenderContext,
        out: &mut dyn Output,
    ) -> HelperResult {
        check_param_count(helper, 1)?;

        match helper.param(0).and_then(|e| e.value().as_f64()) {
            Some(seconds) if seconds.is_finite() => out.write(&format_lap_time(seconds))?,
            _ => out.write("-")?,
        }

        Ok(())
    }
}

pub fn format_lap_time(seconds: f64) -> String {
    format!("{:.2}s", seconds)
}

pub fn check_param_count(h: &Helper, n: u64) -> Result<(), RenderError> {
    if h.params().len() != n as usize {
        return Err(RenderError::new::<String>(format!(
            "Wrong number of arguments for helper \"{}\", {n} was expected but {} were given",
            h.name(),
            h.params().len()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn render(template: &str, data: serde_json::Value) -> String {
        let mut handlebars = Handlebars::new();
        handlebars.register_helper("formatLapTime", Box::new(FormatLapTime));
        handlebars.render_template(template, &data).unwrap()
    }

    #[test]
    fn lap_times_have_two_decimals() {
        assert_eq!(render("{{formatLapTime time}}", json!({"time": 21.456})), "21.46s");
        assert_eq!(render("{{formatLapTime time}}", json!({"time": 20})), "20.00s");
    }

    #[test]
    fn missing_time_is_a_dash() {
        assert_eq!(render("{{formatLapTime time}}", json!({"time": null})), "-");
    }

    #[test]
    fn wrong_argument_count_fails() {
        let mut handlebars = Handlebars::new();
        handlebars.register_helper("formatLapTime", Box::new(FormatLapTime));
        assert!(handlebars.render_template("{{formatLapTime 1 2}}", &json!({})).is_err());
    }
}
