use crate::core::{ColumnInfo, DatabaseError, ResultField, Row, Schema, SchemaColumn};
use crate::plan::{Expr, ProjectionExpr};
use super::Executor;

/// Evaluates a list of expressions over each source row.
///
/// Carries planner-built result fields: the alias stays empty when the
/// query gave none, and `Statement::exec` fills it in from the column.
#[derive(Debug)]
pub struct ProjectionExec {
    source: Box<dyn Executor>,
    exprs: Vec<Expr>,
    fields: Vec<ResultField>,
    schema: Schema,
}

impl ProjectionExec {
    #[must_use]
    pub fn new(source: Box<dyn Executor>, exprs: Vec<ProjectionExpr>) -> Self {
        let input = source.schema();
        let mut fields = Vec::with_capacity(exprs.len());
        let mut columns = Vec::with_capacity(exprs.len());

        for p in &exprs {
            let field_type = p.expr.data_type(input);
            let (col_name, tbl_name, db_name) = match &p.expr {
                Expr::Column(i) => input.columns().get(*i).map_or_else(
                    || (p.expr.to_string(), String::new(), String::new()),
                    |c| (c.col_name.clone(), c.tbl_name.clone(), c.db_name.clone()),
                ),
                other => (other.to_string(), String::new(), String::new()),
            };
            let output_name = if p.alias.is_empty() { &col_name } else { &p.alias };

            columns.push(SchemaColumn::new(
                output_name.clone(),
                tbl_name.clone(),
                db_name.clone(),
                field_type.clone(),
            ));
            fields.push(ResultField::new(
                p.alias.clone(),
                tbl_name,
                db_name,
                ColumnInfo::new(col_name, field_type),
            ));
        }

        Self {
            source,
            exprs: exprs.into_iter().map(|p| p.expr).collect(),
            fields,
            schema: Schema::new(columns),
        }
    }
}

impl Executor for ProjectionExec {
    fn next(&mut self) -> Result<Option<Row>, DatabaseError> {
        let Some(row) = self.source.next()? else {
            return Ok(None);
        };
        let values = self
            .exprs
            .iter()
            .map(|e| e.evaluate(&row.values))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Some(Row::new(values)))
    }

    fn close(&mut self) -> Result<(), DatabaseError> {
        self.source.close()
    }

    fn fields(&self) -> &[ResultField] {
        &self.fields
    }

    fn schema(&self) -> &Schema {
        &self.schema
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::{DataType, Value};
    use crate::executor::fixture::{Fixture, drain};
    use crate::plan::Plan;

    #[test]
    fn test_fields_keep_empty_alias_and_source_column() {
        let fx = Fixture::new();
        let plan = Plan::scan("t").project(vec![
            ProjectionExpr::column(0),
            ProjectionExpr::aliased(Expr::IsNull(Box::new(Expr::Column(1))), "missing"),
        ]);
        let exec = fx.build(&plan).unwrap();

        let fields = exec.fields();
        assert_eq!(fields[0].column_as_name, "");
        assert_eq!(fields[0].column.name, "id");
        assert_eq!(fields[0].table_as_name, "t");
        assert_eq!(fields[0].db_name, "test");
        assert_eq!(fields[1].column_as_name, "missing");
        assert_eq!(fields[1].column.field_type, DataType::Boolean);

        assert_eq!(exec.schema().columns()[0].col_name, "id");
        assert_eq!(exec.schema().columns()[1].col_name, "missing");
    }

    #[test]
    fn test_rows_carry_no_handle() {
        let fx = Fixture::new();
        let plan = Plan::scan("t").project(vec![ProjectionExpr::column(1)]);
        let mut exec = fx.build(&plan).unwrap();
        let rows = drain(exec.as_mut()).unwrap();
        assert_eq!(rows.len(), 3);
        assert!(rows.iter().all(|r| r.handle.is_none()));
        assert_eq!(rows[0].values, vec![Value::Text("a".into())]);
    }
}
