use crate::host::{
    ConsoleSink, EditorIdSource, Form, FormType, GlobalVar, Host, ScriptFunction, Setting,
    SettingValue, resolve_editor_id,
};
use crate::index::CellIndex;
use crate::query::MatchContext;
use crate::utils::{cmp_ignore_ascii_case, contains_ci};

const HDR_CONSOLE_COMMANDS: &str = "----CONSOLE COMMANDS--------------------";
const HDR_SCRIPT_FUNCTIONS: &str = "----SCRIPT FUNCTIONS--------------------";
const HDR_GAME_SETTINGS: &str = "----GAME SETTINGS-----------------------";
const HDR_INI_SETTINGS: &str = "----INI SETTINGS------------------------";
const HDR_GLOBALS: &str = "----GLOBAL VARIABLES--------------------";
const HDR_OTHER_FORMS: &str = "----OTHER FORMS-------------------------";
// Label kept as-is from the original console output even though the listing
// below it holds interior cells; see DESIGN.md.
const HDR_EXTERIOR_CELLS: &str = "----EXTERIOR CELLS----------------------";

/// Runs the catalog listings for one help invocation.
///
/// Borrows the host catalogs and the persistent cell index for the duration
/// of the invocation; all per-invocation state lives in the [`MatchContext`].
pub struct HelpQuery<'a> {
    host: &'a dyn Host,
    edids: &'a dyn EditorIdSource,
    cells: &'a mut CellIndex,
    sink: &'a mut dyn ConsoleSink,
    ctx: MatchContext<'a>,
}

impl<'a> HelpQuery<'a> {
    pub fn new(
        host: &'a dyn Host,
        edids: &'a dyn EditorIdSource,
        cells: &'a mut CellIndex,
        sink: &'a mut dyn ConsoleSink,
        ctx: MatchContext<'a>,
    ) -> Self {
        Self {
            host,
            edids,
            cells,
            sink,
            ctx,
        }
    }

    /// Console command and script function tables, in declaration order.
    pub fn show_functions(&mut self) {
        let host = self.host;
        self.sink.line(HDR_CONSOLE_COMMANDS);
        for function in host.console_commands() {
            self.match_function(function);
        }
        self.sink.line(HDR_SCRIPT_FUNCTIONS);
        for function in host.script_functions() {
            self.match_function(function);
        }
    }

    fn match_function(&mut self, function: &ScriptFunction) {
        if self.ctx.is_unfiltered() {
            self.print_function(function);
            return;
        }
        let needle = &self.ctx.match_string;
        if contains_ci(&function.name, needle)
            || contains_ci(&function.short_name, needle)
            || contains_ci(&function.help, needle)
        {
            self.print_function(function);
        }
    }

    fn print_function(&mut self, function: &ScriptFunction) {
        if function.name.is_empty() {
            return;
        }
        let line = match (function.short_name.is_empty(), function.help.is_empty()) {
            (false, false) => format!(
                "{} ({}) -> {}",
                function.name, function.short_name, function.help
            ),
            (true, false) => format!("{} -> {}", function.name, function.help),
            (false, true) => format!("{} ({})", function.name, function.short_name),
            (true, true) => function.name.clone(),
        };
        self.sink.line(&line);
    }

    /// Game settings, then INI settings with preferred values applied.
    pub fn show_settings(&mut self) {
        let host = self.host;
        self.sink.line(HDR_GAME_SETTINGS);
        for setting in host.game_settings() {
            self.match_setting(setting);
        }
        self.sink.line(HDR_INI_SETTINGS);
        for setting in host.ini_settings() {
            let preferred = host.ini_pref(&setting.name).unwrap_or(setting);
            self.match_setting(preferred);
        }
    }

    fn match_setting(&mut self, setting: &Setting) {
        if self.ctx.is_unfiltered() || contains_ci(&setting.name, &self.ctx.match_string) {
            self.print_setting(setting);
        }
    }

    fn print_setting(&mut self, setting: &Setting) {
        let line = match &setting.value {
            SettingValue::Bool(v) => format!("{} = {}", setting.name, v),
            SettingValue::Float(v) => format!("{} = {:.2}", setting.name, v),
            SettingValue::Int(v) => format!("{} = {}", setting.name, v),
            SettingValue::UInt(v) => format!("{} = {}", setting.name, v),
            SettingValue::Color { r, g, b, a } => {
                format!("{} = R:{} G:{} B:{} A:{}", setting.name, r, g, b, a)
            }
            SettingValue::String(v) => format!("{} = {}", setting.name, v),
            SettingValue::Unknown => format!("{} = <UNKNOWN>", setting.name),
        };
        self.sink.line(&line);
    }

    /// Global variables, matched on editor id.
    pub fn show_globals(&mut self) {
        let host = self.host;
        self.sink.line(HDR_GLOBALS);
        for global in host.globals() {
            self.match_global(global);
        }
    }

    fn match_global(&mut self, global: &GlobalVar) {
        if self.ctx.is_unfiltered() || contains_ci(&global.editor_id, &self.ctx.match_string) {
            self.print_global(global);
        }
    }

    fn print_global(&mut self, global: &GlobalVar) {
        if global.editor_id.is_empty() {
            return;
        }
        self.sink
            .line(&format!("{} = {:.2}", global.editor_id, global.value));
    }

    /// Generic form listing plus, for unfiltered and cell-filtered queries,
    /// the cell sub-listing.
    pub fn show_forms(&mut self) {
        let host = self.host;
        self.sink.line(HDR_OTHER_FORMS);

        let filter = FormType::from_filter(&self.ctx.type_filter);
        if filter == FormType::Global {
            // Globals are the globals catalog's business; a GLOB filter
            // yields nothing here on purpose.
            return;
        }

        if filter != FormType::None && filter != FormType::Cell {
            for form in host.forms_of_type(filter) {
                self.match_form(form);
            }
        } else {
            for form in host.all_forms() {
                if filter == FormType::Cell && form.kind != FormType::Cell {
                    continue;
                }
                self.match_form(form);
            }
        }

        if !self.ctx.forms.is_empty() {
            self.print_forms();
        }

        if filter == FormType::None || filter == FormType::Cell {
            self.show_cells();
        }
    }

    fn match_form(&mut self, form: &'a Form) {
        match form.kind {
            FormType::Global => {}
            _ if form.is_exterior_cell() => {}
            _ => {
                let edid = resolve_editor_id(self.edids, form);
                if contains_ci(edid, &self.ctx.match_string)
                    || contains_ci(&form.display_name, &self.ctx.match_string)
                {
                    self.ctx.forms.push(form);
                }
            }
        }
    }

    /// Sort the accumulated forms and print them in one batch. The order is
    /// (type code, editor id case-insensitive, form id) and is total, so
    /// output is reproducible across runs on identical data.
    fn print_forms(&mut self) {
        let edids = self.edids;
        self.ctx.forms.sort_by(|lhs, rhs| {
            lhs.kind
                .code()
                .cmp(&rhs.kind.code())
                .then_with(|| {
                    cmp_ignore_ascii_case(
                        resolve_editor_id(edids, lhs),
                        resolve_editor_id(edids, rhs),
                    )
                })
                .then_with(|| lhs.form_id.cmp(&rhs.form_id))
        });

        for form in &self.ctx.forms {
            let edid = resolve_editor_id(edids, form);
            self.sink.line(&format!(
                "{}: {} ({:08X}) '{}'",
                form.kind.tag(),
                edid,
                form.form_id,
                form.display_name
            ));
        }
    }

    /// Cell sub-listing backed by the persistent index. Builds the index on
    /// first use after a clear; prints the section header lazily, at most
    /// once, and only when something matched.
    fn show_cells(&mut self) {
        let host = self.host;
        self.cells.ensure_built(host.full_files(), host.small_files());

        let needle = self.ctx.match_string.clone();
        for (edid, file_name) in self.cells.matches(&needle) {
            if !self.ctx.cell_header_printed {
                self.sink.line(HDR_EXTERIOR_CELLS);
                self.ctx.cell_header_printed = true;
            }
            if !file_name.is_empty() {
                self.sink.line(&format!("{} CELL: {}", file_name, edid));
            } else {
                self.sink.line(&format!("CELL: {}", edid));
            }
        }
    }

    /// Usage block; the last thing printed on every path.
    pub fn show_usage(&mut self) {
        self.sink
            .line("usage: help <matchstring> <filter> <form type>");
        self.sink
            .line("filters: 0-all 1-functions, 2-settings, 3-globals, 4-other forms");
        self.sink
            .line("form type is 4 characters and is ignored unless the filter is 4.");
    }
}
