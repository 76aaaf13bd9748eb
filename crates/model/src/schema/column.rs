use serde::{Deserialize, Serialize};

/// One column as reported by the source catalog. The declared type is kept
/// exactly as the catalog spells it and is replayed verbatim on the
/// destination.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ColumnDescriptor {
    pub name: String,
    pub declared_type: String,
    pub nullable: bool,
    /// Full type spelling with modifiers (`character(3)`, `bit(4)`,
    /// `numeric(12,2)`). `declared_type` drops them, and a cast to the bare
    /// name of a length-typed column would cut values to length 1.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub cast_type: Option<String>,
}

impl ColumnDescriptor {
    pub fn new(name: impl Into<String>, declared_type: impl Into<String>, nullable: bool) -> Self {
        Self {
            name: name.into(),
            declared_type: declared_type.into(),
            nullable,
            cast_type: None,
        }
    }

    pub fn with_cast_type(mut self, cast_type: impl Into<String>) -> Self {
        self.cast_type = Some(cast_type.into());
        self
    }

    /// Type that bound text parameters are cast to.
    pub fn cast_target(&self) -> &str {
        self.cast_type.as_deref().unwrap_or(&self.declared_type)
    }

    pub fn nullability(&self) -> &'static str {
        if self.nullable { "NULL" } else { "NOT NULL" }
    }
}
