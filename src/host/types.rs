use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Numeric runtime identifier of a form, distinct from its editor id.
pub type FormId = u32;

/// Form type categories, in canonical listing order.
///
/// The discriminant doubles as the type-order code used by the deterministic
/// form sort, so variant order is load-bearing and must not be rearranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[repr(u8)]
pub enum FormType {
    #[default]
    None = 0,
    Keyword,
    Action,
    Global,
    Race,
    Sound,
    Spell,
    Armor,
    Book,
    Container,
    Door,
    Ingredient,
    Light,
    Misc,
    Static,
    Flora,
    Furniture,
    Weapon,
    Ammo,
    Npc,
    Idle,
    Cell,
    Worldspace,
    Quest,
    Location,
    Message,
}

impl FormType {
    pub const ALL: [FormType; 26] = [
        FormType::None,
        FormType::Keyword,
        FormType::Action,
        FormType::Global,
        FormType::Race,
        FormType::Sound,
        FormType::Spell,
        FormType::Armor,
        FormType::Book,
        FormType::Container,
        FormType::Door,
        FormType::Ingredient,
        FormType::Light,
        FormType::Misc,
        FormType::Static,
        FormType::Flora,
        FormType::Furniture,
        FormType::Weapon,
        FormType::Ammo,
        FormType::Npc,
        FormType::Idle,
        FormType::Cell,
        FormType::Worldspace,
        FormType::Quest,
        FormType::Location,
        FormType::Message,
    ];

    /// The 4-character tag used in console filters and listing output.
    pub fn tag(self) -> &'static str {
        match self {
            FormType::None => "NONE",
            FormType::Keyword => "KYWD",
            FormType::Action => "AACT",
            FormType::Global => "GLOB",
            FormType::Race => "RACE",
            FormType::Sound => "SOUN",
            FormType::Spell => "SPEL",
            FormType::Armor => "ARMO",
            FormType::Book => "BOOK",
            FormType::Container => "CONT",
            FormType::Door => "DOOR",
            FormType::Ingredient => "INGR",
            FormType::Light => "LIGH",
            FormType::Misc => "MISC",
            FormType::Static => "STAT",
            FormType::Flora => "FLOR",
            FormType::Furniture => "FURN",
            FormType::Weapon => "WEAP",
            FormType::Ammo => "AMMO",
            FormType::Npc => "NPC_",
            FormType::Idle => "IDLE",
            FormType::Cell => "CELL",
            FormType::Worldspace => "WRLD",
            FormType::Quest => "QUST",
            FormType::Location => "LCTN",
            FormType::Message => "MESG",
        }
    }

    /// Type-order code for the deterministic form sort.
    pub fn code(self) -> u8 {
        self as u8
    }

    /// Resolve a console filter token. Unrecognized tokens map to `None`,
    /// which the forms listing treats as "no type restriction".
    pub fn from_filter(token: &str) -> FormType {
        FormType::ALL
            .iter()
            .copied()
            .find(|kind| kind.tag().eq_ignore_ascii_case(token))
            .unwrap_or(FormType::None)
    }

    /// Types whose editor id always comes from the native accessor, never
    /// from an injected override source.
    pub fn keeps_native_editor_id(self) -> bool {
        matches!(
            self,
            FormType::None
                | FormType::Keyword
                | FormType::Action
                | FormType::Global
                | FormType::Race
                | FormType::Sound
                | FormType::Idle
                | FormType::Cell
                | FormType::Worldspace
                | FormType::Quest
        )
    }
}

/// A console command or script function table entry.
///
/// Empty strings stand in for absent fields; an entry with an empty name is
/// never printed.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ScriptFunction {
    pub name: String,
    #[serde(default)]
    pub short_name: String,
    #[serde(default)]
    pub help: String,
}

/// Typed value carried by a setting, used only for display formatting.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SettingValue {
    Bool(bool),
    Float(f32),
    Int(i32),
    UInt(u32),
    Color { r: u8, g: u8, b: u8, a: u8 },
    String(String),
    Unknown,
}

/// A game or INI setting.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Setting {
    pub name: String,
    pub value: SettingValue,
}

/// A global variable: editor id plus a float value.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GlobalVar {
    pub editor_id: String,
    pub value: f32,
}

/// A reference into the host's generic form catalog.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Form {
    pub kind: FormType,
    pub form_id: FormId,
    #[serde(default)]
    pub editor_id: String,
    #[serde(default)]
    pub display_name: String,
    /// Only meaningful for cell forms.
    #[serde(default)]
    pub exterior: bool,
}

impl Form {
    pub fn is_exterior_cell(&self) -> bool {
        self.kind == FormType::Cell && self.exterior
    }
}

/// A data container file handle with its load-order slot.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataFile {
    pub name: String,
    pub path: PathBuf,
    #[serde(default)]
    pub compile_index: u32,
    #[serde(default)]
    pub small_compile_index: u32,
}

impl DataFile {
    /// Composite load-order key. Full-size and small files occupy disjoint
    /// bit ranges so their editor-id namespaces stay separate.
    pub fn compile_key(&self) -> u32 {
        (self.compile_index << 24) + (self.small_compile_index << 12)
    }
}
