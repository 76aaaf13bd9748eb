use crate::sql::base::error::DbError;
use model::{core::value::Value, records::row::Row, schema::column::ColumnDescriptor};
use tokio_postgres::Row as PgRow;

/// How a source column is read. Integer, float, boolean and character
/// columns are decoded natively; every other type is selected as `::text`
/// and carried as text.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PgColumnKind {
    SmallInt,
    Integer,
    BigInt,
    Real,
    Double,
    Boolean,
    Text,
    TextCast,
}

impl PgColumnKind {
    pub fn from_declared_type(declared_type: &str) -> Self {
        match declared_type.to_ascii_lowercase().as_str() {
            "smallint" | "int2" => PgColumnKind::SmallInt,
            "integer" | "int" | "int4" => PgColumnKind::Integer,
            "bigint" | "int8" => PgColumnKind::BigInt,
            "real" | "float4" => PgColumnKind::Real,
            "double precision" | "float8" => PgColumnKind::Double,
            "boolean" | "bool" => PgColumnKind::Boolean,
            "text" | "character varying" | "varchar" | "character" | "bpchar" => {
                PgColumnKind::Text
            }
            _ => PgColumnKind::TextCast,
        }
    }

    /// Select-list expression for an already quoted column identifier.
    pub fn select_expr(&self, ident: &str) -> String {
        match self {
            PgColumnKind::TextCast => format!("{ident}::text"),
            _ => ident.to_string(),
        }
    }
}

fn decode_err(column: &ColumnDescriptor, err: tokio_postgres::Error) -> DbError {
    DbError::Decode {
        column: column.name.clone(),
        declared_type: column.declared_type.clone(),
        message: err.to_string(),
    }
}

/// `f32` widened through its shortest decimal form, so `0.1f32` stays
/// `0.1` rather than `0.10000000149011612`.
fn widen_f32(v: f32) -> f64 {
    v.to_string().parse::<f64>().unwrap_or(f64::from(v))
}

pub fn decode_value(
    row: &PgRow,
    index: usize,
    column: &ColumnDescriptor,
    kind: PgColumnKind,
) -> Result<Value, DbError> {
    let err = |e: tokio_postgres::Error| decode_err(column, e);
    let value = match kind {
        PgColumnKind::SmallInt => row
            .try_get::<_, Option<i16>>(index)
            .map_err(err)?
            .map(|v| Value::Int(v.into())),
        PgColumnKind::Integer => row
            .try_get::<_, Option<i32>>(index)
            .map_err(err)?
            .map(|v| Value::Int(v.into())),
        PgColumnKind::BigInt => row
            .try_get::<_, Option<i64>>(index)
            .map_err(err)?
            .map(Value::Int),
        PgColumnKind::Real => row
            .try_get::<_, Option<f32>>(index)
            .map_err(err)?
            .map(|v| Value::Float(widen_f32(v))),
        PgColumnKind::Double => row
            .try_get::<_, Option<f64>>(index)
            .map_err(err)?
            .map(Value::Float),
        PgColumnKind::Boolean => row
            .try_get::<_, Option<bool>>(index)
            .map_err(err)?
            .map(Value::Boolean),
        PgColumnKind::Text | PgColumnKind::TextCast => row
            .try_get::<_, Option<String>>(index)
            .map_err(err)?
            .map(Value::Text),
    };
    Ok(value.unwrap_or(Value::Null))
}

pub fn decode_row(
    row: &PgRow,
    columns: &[ColumnDescriptor],
    kinds: &[PgColumnKind],
) -> Result<Row, DbError> {
    let values = columns
        .iter()
        .zip(kinds)
        .enumerate()
        .map(|(i, (column, kind))| decode_value(row, i, column, *kind))
        .collect::<Result<Vec<_>, _>>()?;
    Ok(Row::new(values))
}
