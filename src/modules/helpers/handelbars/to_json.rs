use crate::modules::helpers::handelbars::format_lap_time::check_param_count;
use rocket_dyn_templates::handlebars::{
    Context, Handlebars, Helper, HelperDef, HelperResult, Output, RenderContext, RenderError,
};

/// # json helper
/// a formatter to convert template data to json for use in javascript.
/// `</` is escaped so the output can not close the surrounding script tag
///
/// ### usage
/// ```handlebars
/// <script>const figure = {{{toJson lap_times}}};</script>
/// ```
#[derive(Clone, Copy)]
pub struct ToJson;

impl HelperDef for ToJson {
    fn call<'reg: 'rc, 'rc>(
        &self,
        helper: &Helper,
        _: &Handlebars,
        _: &Context,
        _: &mut RenderContext,
        out: &mut dyn Output,
    ) -> HelperResult {
        check_param_count(helper, 1)?;
        let Some(json_param) = helper.param(0) else {
            return Ok(());
        };

        let json = serde_json::to_string(json_param.value())
            .map_err(|e| RenderError::new::<String>(format!("could not convert to json: {e}")))?;

        out.write(&json.replace("</", "<\\/"))?;
        Ok(())
    }
}
