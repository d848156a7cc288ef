//! Relational layout of the hierarchy
//!
//! Three tables, each keyed by a UUID column. Stages reference pipelines and
//! fields reference stages; both foreign keys are RESTRICT, so a parent can
//! only be deleted once its children are gone.

pub const PIPELINE_ID: &str = "pipeline_id";
pub const PIPELINE_NAME: &str = "pipeline_name";
pub const STAGE_ID: &str = "stage_id";
pub const STAGE_NAME: &str = "stage_name";
pub const FIELD_ID: &str = "field_id";
pub const FIELD_NAME: &str = "field_name";
pub const FIELD_TYPE: &str = "field_type";
pub const CREATED_AT: &str = "created_at";
pub const UPDATED_AT: &str = "updated_at";

/// A table of the hierarchy
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Table {
    Pipelines,
    Stages,
    Fields,
}

/// A child-to-parent reference
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    /// Column in the referencing table
    pub column: &'static str,

    /// Table whose key the column points at
    pub references: Table,
}

impl Table {
    /// Parents before children
    pub const ALL: [Table; 3] = [Table::Pipelines, Table::Stages, Table::Fields];

    /// SQL table name
    pub fn name(&self) -> &'static str {
        match self {
            Table::Pipelines => "pipelines",
            Table::Stages => "pipeline_stages",
            Table::Fields => "pipeline_fields",
        }
    }

    /// Primary key column
    pub fn key(&self) -> &'static str {
        match self {
            Table::Pipelines => PIPELINE_ID,
            Table::Stages => STAGE_ID,
            Table::Fields => FIELD_ID,
        }
    }

    /// All columns, in table order
    pub fn columns(&self) -> &'static [&'static str] {
        match self {
            Table::Pipelines => &[PIPELINE_ID, PIPELINE_NAME, CREATED_AT, UPDATED_AT],
            Table::Stages => &[STAGE_ID, PIPELINE_ID, STAGE_NAME, CREATED_AT, UPDATED_AT],
            Table::Fields => &[
                FIELD_ID, STAGE_ID, FIELD_NAME, FIELD_TYPE, CREATED_AT, UPDATED_AT,
            ],
        }
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.columns().contains(&column)
    }

    /// Reference to the parent table, if any
    pub fn foreign_key(&self) -> Option<ForeignKey> {
        match self {
            Table::Pipelines => None,
            Table::Stages => Some(ForeignKey {
                column: PIPELINE_ID,
                references: Table::Pipelines,
            }),
            Table::Fields => Some(ForeignKey {
                column: STAGE_ID,
                references: Table::Stages,
            }),
        }
    }

    /// Tables holding a foreign key into this one
    pub fn children(&self) -> impl Iterator<Item = (Table, ForeignKey)> {
        let this = *self;
        Table::ALL.into_iter().filter_map(move |table| {
            table
                .foreign_key()
                .filter(|fk| fk.references == this)
                .map(|fk| (table, fk))
        })
    }
}

impl std::fmt::Display for Table {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
