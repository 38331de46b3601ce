//! Frame categories and the ordered rule table that assigns them.
//!
//! Ordinals are part of the Gecko profile format and must not change.

use crate::utils::config::{
    DEX_MARKER, JIT_MARKER, KERNEL_MARKERS, NATIVE_MARKER, OAT_MARKER, OFF_CPU_ENTRY_PREFIX,
};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Category of a stack frame, serialized as its ordinal
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum Category {
    User = 0,
    Kernel = 1,
    Native = 2,
    Dex = 3,
    Oat = 4,
    OffCpu = 5,
    Other = 6,
    Jit = 7,
}

impl Category {
    /// All categories in ordinal order
    pub const ALL: [Category; 8] = [
        Category::User,
        Category::Kernel,
        Category::Native,
        Category::Dex,
        Category::Oat,
        Category::OffCpu,
        Category::Other,
        Category::Jit,
    ];

    pub fn ordinal(self) -> u8 {
        self as u8
    }

    pub fn from_ordinal(ordinal: u8) -> Option<Self> {
        Self::ALL.get(ordinal as usize).copied()
    }

    pub fn name(self) -> &'static str {
        match self {
            Category::User => "User",
            Category::Kernel => "Kernel",
            Category::Native => "Native",
            Category::Dex => "DEX",
            Category::Oat => "OAT",
            Category::OffCpu => "Off-CPU",
            Category::Other => "Other",
            Category::Jit => "JIT",
        }
    }

    /// Display color, following the usual flamegraph conventions
    /// (yellow user, orange kernel, green Java/JIT, blue off-CPU)
    pub fn color(self) -> &'static str {
        match self {
            Category::User | Category::Native => "yellow",
            Category::Kernel => "orange",
            Category::Dex | Category::Oat | Category::Jit => "green",
            Category::OffCpu => "blue",
            Category::Other => "grey",
        }
    }
}

impl Serialize for Category {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_u8(self.ordinal())
    }
}

impl<'de> Deserialize<'de> for Category {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let ordinal = u8::deserialize(deserializer)?;
        Category::from_ordinal(ordinal)
            .ok_or_else(|| serde::de::Error::custom(format!("unknown category {}", ordinal)))
    }
}

/// One categorization heuristic
pub struct CategoryRule {
    pub name: &'static str,
    pub matches: fn(&str) -> bool,
    pub category: Category,
}

fn is_kernel(frame: &str) -> bool {
    KERNEL_MARKERS.iter().any(|m| frame.contains(m))
}

// Off-CPU profiles mostly account blocked time to the kernel scheduler.
fn is_off_cpu(frame: &str) -> bool {
    is_kernel(frame) && frame.starts_with(OFF_CPU_ENTRY_PREFIX)
}

fn is_native(frame: &str) -> bool {
    frame.contains(NATIVE_MARKER)
}

fn is_dex(frame: &str) -> bool {
    frame.contains(DEX_MARKER)
}

fn is_oat(frame: &str) -> bool {
    frame.contains(OAT_MARKER)
}

fn is_jit(frame: &str) -> bool {
    frame.contains(JIT_MARKER)
}

/// Rules evaluated top to bottom; the first match wins
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule { name: "off-cpu", matches: is_off_cpu, category: Category::OffCpu },
    CategoryRule { name: "kernel", matches: is_kernel, category: Category::Kernel },
    CategoryRule { name: "native", matches: is_native, category: Category::Native },
    CategoryRule { name: "dex", matches: is_dex, category: Category::Dex },
    CategoryRule { name: "oat", matches: is_oat, category: Category::Oat },
    CategoryRule { name: "jit", matches: is_jit, category: Category::Jit },
];

/// Categorize a canonical frame string, `"<symbol> (in <module>)"`
pub fn categorize(frame: &str) -> Category {
    CATEGORY_RULES
        .iter()
        .find(|rule| (rule.matches)(frame))
        .map(|rule| rule.category)
        .unwrap_or(Category::User)
}
