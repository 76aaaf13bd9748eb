use model::core::value::Value;
use tokio_postgres::types::ToSql;

/// Statement parameters in their text form. Placeholders are rendered as
/// `$n::text`, so every parameter is sent as (nullable) text and the server
/// casts it to the column type.
pub struct PgParamStore {
    pub params: Vec<Option<String>>,
}

impl PgParamStore {
    pub fn from_values(values: &[Value]) -> Self {
        Self {
            params: values.iter().map(Value::to_text).collect(),
        }
    }

    pub fn as_refs(&self) -> Vec<&(dyn ToSql + Sync)> {
        self.params
            .iter()
            .map(|param| param as &(dyn ToSql + Sync))
            .collect::<Vec<_>>()
    }

    pub fn len(&self) -> usize {
        self.params.len()
    }

    pub fn is_empty(&self) -> bool {
        self.params.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_params_are_text() {
        let store = PgParamStore::from_values(&[
            Value::Int(5),
            Value::Float(0.5),
            Value::Boolean(true),
            Value::Text("x'y".into()),
            Value::Null,
        ]);
        assert_eq!(
            store.params,
            vec![
                Some("5".to_string()),
                Some("0.5".to_string()),
                Some("true".to_string()),
                Some("x'y".to_string()),
                None
            ]
        );
        assert_eq!(store.as_refs().len(), 5);
    }
}
