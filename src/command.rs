//! Console command wiring: registration, argument parsing, dispatch.

use crate::host::{
    ClaimError, CommandRegistry, ConsoleSink, EditorIdSource, Host, NativeEditorIds, ParamKind,
    ParamSpec,
};
use crate::index::CellIndex;
use crate::query::{HelpQuery, MatchContext};
use tracing::{debug, error};

/// Console name this command installs under.
pub const COMMAND_NAME: &str = "help";

/// Typed parameter descriptors handed to the host at registration.
pub const PARAMS: [ParamSpec; 3] = [
    ParamSpec {
        name: "matchstring (optional)",
        kind: ParamKind::Chars,
        optional: true,
    },
    ParamSpec {
        name: "filter (optional)",
        kind: ParamKind::Int,
        optional: true,
    },
    ParamSpec {
        name: "form type (optional)",
        kind: ParamKind::Chars,
        optional: true,
    },
];

/// Parsed positional console arguments.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HelpArgs {
    pub match_string: String,
    pub filter: u32,
    pub form_type: String,
}

impl HelpArgs {
    /// Parse up to three positional tokens; missing or unparseable tokens
    /// keep their defaults (empty match, filter 0, empty type).
    pub fn parse<S: AsRef<str>>(tokens: &[S]) -> Self {
        let mut args = Self::default();
        if let Some(token) = tokens.first() {
            args.match_string = token.as_ref().to_owned();
        }
        if let Some(token) = tokens.get(1) {
            args.filter = token.as_ref().parse().unwrap_or(0);
        }
        if let Some(token) = tokens.get(2) {
            args.form_type = token.as_ref().to_owned();
        }
        args
    }
}

/// The persistent command object.
///
/// Owns the cell index cache and the editor-id resolution strategy; both
/// outlive individual invocations. The host serializes `execute` and
/// `on_data_loaded`, so no locking happens here.
pub struct HelpCommand {
    cells: CellIndex,
    edids: Box<dyn EditorIdSource>,
}

impl Default for HelpCommand {
    fn default() -> Self {
        Self::new()
    }
}

impl HelpCommand {
    pub fn new() -> Self {
        Self::with_editor_ids(Box::new(NativeEditorIds))
    }

    /// Use a replacement editor-id strategy, typically configured at
    /// startup when a recovery module is present.
    pub fn with_editor_ids(edids: Box<dyn EditorIdSource>) -> Self {
        Self {
            cells: CellIndex::new(),
            edids,
        }
    }

    /// Claim the console command slot. A missing or already-overridden slot
    /// is logged and leaves the command uninstalled; nothing panics.
    pub fn install(registry: &mut dyn CommandRegistry) -> bool {
        match registry.claim(COMMAND_NAME, &PARAMS) {
            Ok(()) => {
                debug!("registered {}", COMMAND_NAME);
                true
            }
            Err(ClaimError::Missing) => {
                error!("failed to find {} command slot", COMMAND_NAME);
                false
            }
            Err(ClaimError::Overridden) => {
                error!(
                    "failed to register {}, command was already overridden",
                    COMMAND_NAME
                );
                false
            }
        }
    }

    /// Host signal: world data was (re)loaded. Invalidates the cell index;
    /// the next invocation rebuilds it from the new file set.
    pub fn on_data_loaded(&mut self) {
        self.cells.clear();
    }

    /// Run one invocation to completion. Always reports success; printing
    /// zero matches is not an error.
    pub fn execute(&mut self, host: &dyn Host, sink: &mut dyn ConsoleSink, args: &HelpArgs) -> bool {
        let ctx = MatchContext::new(&args.match_string, &args.form_type);
        let mut query = HelpQuery::new(host, self.edids.as_ref(), &mut self.cells, sink, ctx);

        if args.match_string.is_empty() {
            query.show_usage();
            return true;
        }

        match args.filter {
            1 => query.show_functions(),
            2 => query.show_settings(),
            3 => query.show_globals(),
            4 => query.show_forms(),
            _ => {
                query.show_functions();
                query.show_settings();
                query.show_globals();
                query.show_forms();
            }
        }
        query.show_usage();
        true
    }
}
