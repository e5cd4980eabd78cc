//! Interfaces to the host process.
//!
//! The help command runs inside a live simulation host and only ever reads
//! from it. Everything the core needs from the host is captured by the
//! traits here: catalog access ([`Host`]), console output ([`ConsoleSink`]),
//! command registration ([`CommandRegistry`]) and editor-id resolution
//! ([`EditorIdSource`]). [`snapshot`] provides a serde-backed implementation
//! used by the offline binary and the integration tests.

pub mod snapshot;
pub mod types;

pub use types::*;

use std::io::Write;
use termcolor::{Color, ColorChoice, ColorSpec, StandardStream, WriteColor};

/// Read-only view of the host's in-memory catalogs and file lists.
///
/// Implementations hand out references for the duration of one query; the
/// core never copies or mutates catalog entries.
pub trait Host {
    /// Built-in console command table, in declaration order.
    fn console_commands(&self) -> &[ScriptFunction];
    /// General script function table, in declaration order.
    fn script_functions(&self) -> &[ScriptFunction];
    /// Primary settings catalog.
    fn game_settings(&self) -> &[Setting];
    /// Base INI settings catalog.
    fn ini_settings(&self) -> &[Setting];
    /// Preferred-value lookup for an INI setting; wins over the base entry.
    fn ini_pref(&self, name: &str) -> Option<&Setting>;
    /// Global variable catalog.
    fn globals(&self) -> &[GlobalVar];
    /// The forms of one type bucket.
    fn forms_of_type(&self, kind: FormType) -> Vec<&Form>;
    /// Snapshot of the entire form universe.
    fn all_forms(&self) -> Vec<&Form>;
    /// Full-size container files, in load order.
    fn full_files(&self) -> &[DataFile];
    /// Small/lightweight container files, in load order.
    fn small_files(&self) -> &[DataFile];
}

/// Line-oriented console output. No return value; the host console drops
/// lines it cannot display.
pub trait ConsoleSink {
    fn line(&mut self, text: &str);
}

/// Sink that remembers every line, for tests and tooling.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub lines: Vec<String>,
}

impl ConsoleSink for RecordingSink {
    fn line(&mut self, text: &str) {
        self.lines.push(text.to_owned());
    }
}

/// Stdout sink with section headers highlighted.
pub struct StdoutSink {
    out: StandardStream,
}

impl StdoutSink {
    pub fn new() -> Self {
        Self {
            out: StandardStream::stdout(ColorChoice::Auto),
        }
    }
}

impl Default for StdoutSink {
    fn default() -> Self {
        Self::new()
    }
}

impl ConsoleSink for StdoutSink {
    fn line(&mut self, text: &str) {
        if text.starts_with("----") {
            let _ = self
                .out
                .set_color(ColorSpec::new().set_fg(Some(Color::Cyan)).set_bold(true));
            let _ = writeln!(self.out, "{}", text);
            let _ = self.out.reset();
        } else {
            let _ = writeln!(self.out, "{}", text);
        }
    }
}

/// Strategy for resolving a form's editor id.
///
/// The native accessor drops editor ids for many form types at runtime; a
/// host may install a replacement source that recovers them from its own
/// records. Absence of a replacement is the default, not an error.
pub trait EditorIdSource {
    fn editor_id<'a>(&'a self, form: &'a Form) -> &'a str;
}

/// Default source: whatever the form itself carries.
#[derive(Debug, Clone, Copy, Default)]
pub struct NativeEditorIds;

impl EditorIdSource for NativeEditorIds {
    fn editor_id<'a>(&'a self, form: &'a Form) -> &'a str {
        &form.editor_id
    }
}

/// Resolve a form's editor id, consulting `source` only for form types that
/// permit an override.
pub fn resolve_editor_id<'a>(source: &'a dyn EditorIdSource, form: &'a Form) -> &'a str {
    if form.kind.keeps_native_editor_id() {
        &form.editor_id
    } else {
        source.editor_id(form)
    }
}

/// Console parameter value kinds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Chars,
    Int,
}

/// Typed parameter descriptor handed to the host at registration.
#[derive(Debug, Clone, Copy)]
pub struct ParamSpec {
    pub name: &'static str,
    pub kind: ParamKind,
    pub optional: bool,
}

/// Why claiming a console command slot failed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ClaimError {
    /// The expected slot does not exist in this host build.
    Missing,
    /// Another module already replaced the slot's executor.
    Overridden,
}

/// Host console command table: binds a command name to typed parameters.
pub trait CommandRegistry {
    fn claim(&mut self, name: &str, params: &[ParamSpec]) -> Result<(), ClaimError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    fn form(kind: FormType, editor_id: &str) -> Form {
        Form {
            kind,
            form_id: 0x42,
            editor_id: editor_id.into(),
            display_name: String::new(),
            exterior: false,
        }
    }

    struct FixedSource(&'static str);

    impl EditorIdSource for FixedSource {
        fn editor_id<'a>(&'a self, _form: &'a Form) -> &'a str {
            self.0
        }
    }

    #[test]
    fn test_native_types_ignore_override() {
        let source = FixedSource("FromOverride");
        let cell = form(FormType::Cell, "NativeCell");
        assert_eq!(resolve_editor_id(&source, &cell), "NativeCell");
    }

    #[test]
    fn test_override_applies_to_other_types() {
        let source = FixedSource("FromOverride");
        let weapon = form(FormType::Weapon, "");
        assert_eq!(resolve_editor_id(&source, &weapon), "FromOverride");
    }

    #[test]
    fn test_default_source_is_native() {
        let weapon = form(FormType::Weapon, "IronSword");
        assert_eq!(resolve_editor_id(&NativeEditorIds, &weapon), "IronSword");
    }

    #[test]
    fn test_recording_sink_keeps_order() {
        let mut sink = RecordingSink::default();
        sink.line("one");
        sink.line("two");
        assert_eq!(sink.lines, vec!["one", "two"]);
    }
}
