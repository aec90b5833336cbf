use crate::config::EmitterConfig;
use crate::emitter::{EmitContext, EmitHelper, EmitResult, Emitter};
use crate::output::{
    JsonFormatter, MarkdownFormatter, OutputFormat, OutputFormatter, TextFormatter,
};
use anyhow::{anyhow, Result};
use serde::Serialize;
use std::io::Write;
use thalflow_core::{get_dependencies, Context, Function, LocalId, Program, Value};

const COLUMNS: [&str; 2] = ["Variable", "Dependencies"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyRow {
    pub variable: String,
    /// Sorted source-level names. Temporaries and references are left out.
    pub dependencies: Vec<String>,
}

/// Canonical dependencies of every variable visible in a scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DependencyTable {
    pub scope: String,
    pub only_unprotected: bool,
    pub rows: Vec<DependencyRow>,
}

impl DependencyTable {
    /// A contract lists its state variables. A function, or one of its
    /// blocks, lists the state variables of its contract followed by its own
    /// parameters and locals.
    pub fn for_context(
        program: &Program,
        context: impl Into<Context>,
        only_unprotected: bool,
    ) -> Result<Self> {
        let context = context.into();
        let (scope, variables) = match context {
            Context::Contract(id) => {
                let contract = program
                    .contract(id)
                    .ok_or_else(|| anyhow!("unknown contract {}", id))?;
                (contract.name.clone(), contract.state_values())
            }
            Context::Function(id) => {
                let function = program
                    .function(id)
                    .ok_or_else(|| anyhow!("unknown function {}", id))?;
                (
                    program.qualified_name(function),
                    function_variables(program, function),
                )
            }
            Context::Node(id, block) => {
                let function = program
                    .function(id)
                    .ok_or_else(|| anyhow!("unknown function {}", id))?;
                if function.body.get_block(block).is_none() {
                    return Err(anyhow!("{} has no {}", function.name, block));
                }
                (
                    format!("{} {}", program.qualified_name(function), block),
                    function_variables(program, function),
                )
            }
        };

        let rows = variables
            .iter()
            .map(|variable| DependencyRow {
                variable: program.value_name(variable),
                dependencies: dependency_names(program, variable, context, only_unprotected),
            })
            .collect();

        Ok(Self {
            scope,
            only_unprotected,
            rows,
        })
    }

    pub fn row(&self, variable: &str) -> Option<&DependencyRow> {
        self.rows.iter().find(|row| row.variable == variable)
    }
}

fn function_variables(program: &Program, function: &Function) -> Vec<Value> {
    let mut variables = function
        .contract
        .and_then(|id| program.contract(id))
        .map(|contract| contract.state_values())
        .unwrap_or_default();
    variables.extend(function.parameters());
    variables.extend((0..function.body.locals.len() as u32).map(|index| {
        Value::Local(
            LocalId {
                function: function.id,
                index,
            },
            None,
        )
    }));
    variables
}

fn dependency_names(
    program: &Program,
    variable: &Value,
    context: Context,
    only_unprotected: bool,
) -> Vec<String> {
    let mut names: Vec<String> = get_dependencies(program, variable, context, only_unprotected)
        .iter()
        .filter(|v| !v.is_temporary() && !v.is_reference())
        .map(|v| program.value_name(v))
        .collect();
    names.sort();
    names.dedup();
    names
}

pub struct DependencyEmitter {
    config: EmitterConfig,
}

impl DependencyEmitter {
    pub fn new(config: EmitterConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &EmitterConfig {
        &self.config
    }

    /// Builds the table for `context` and renders it.
    pub fn report(&self, program: &Program, context: impl Into<Context>) -> Result<String> {
        let table = DependencyTable::for_context(program, context, self.config.only_unprotected)?;
        self.emit_to_string(&table)
    }

    fn emit_table<W: Write>(
        &self,
        formatter: &dyn OutputFormatter,
        table: &DependencyTable,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        let verbosity = self.config.verbosity;
        let rows: Vec<[String; 2]> = table
            .rows
            .iter()
            .filter(|row| verbosity.should_print_empty_rows() || !row.dependencies.is_empty())
            .map(|row| [row.variable.clone(), row.dependencies.join(", ")])
            .collect();

        let mut widths = [COLUMNS[0].len(), COLUMNS[1].len()];
        for row in &rows {
            widths[0] = widths[0].max(row[0].chars().count());
            widths[1] = widths[1].max(row[1].chars().count());
        }

        let title = if table.only_unprotected {
            format!("Dependencies of {} (unprotected)", table.scope)
        } else {
            format!("Dependencies of {}", table.scope)
        };
        EmitHelper::write_section(writer, context, &formatter.format_section(&title))?;
        for line in formatter.format_header(COLUMNS, widths) {
            EmitHelper::write_line(writer, context, &line)?;
        }
        for row in &rows {
            let line = formatter.format_row([row[0].as_str(), row[1].as_str()], widths);
            EmitHelper::write_line(writer, context, &line)?;
        }
        if let Some(footer) = formatter.format_footer(widths) {
            EmitHelper::write_line(writer, context, &footer)?;
        }

        if verbosity.should_print_summary() {
            let with_dependencies = table
                .rows
                .iter()
                .filter(|row| !row.dependencies.is_empty())
                .count();
            context.indent();
            EmitHelper::write_line(
                writer,
                context,
                &format!(
                    "{} variables, {} with dependencies",
                    table.rows.len(),
                    with_dependencies
                ),
            )?;
            context.dedent();
        }
        Ok(())
    }
}

impl Default for DependencyEmitter {
    fn default() -> Self {
        Self::new(EmitterConfig::default())
    }
}

impl Emitter for DependencyEmitter {
    type Item = DependencyTable;

    fn emit<W: Write>(
        &self,
        item: &Self::Item,
        writer: &mut W,
        context: &mut EmitContext,
    ) -> EmitResult {
        context.use_colors = self.config.use_colors;
        match self.config.format {
            OutputFormat::Json => JsonFormatter::format_object(writer, item),
            OutputFormat::Text => self.emit_table(&TextFormatter, item, writer, context),
            OutputFormat::Markdown => {
                context.use_colors = false;
                self.emit_table(&MarkdownFormatter, item, writer, context)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VerbosityLevel;
    use pretty_assertions::assert_eq;
    use thalflow_core::{BlockId, ContractId, FunctionId, ProgramBuilder, Type};

    fn program() -> Program {
        let mut builder = ProgramBuilder::new();
        let mut c = builder.contract("Counter");
        let count = c.state_variable("count", Type::Uint(256));
        c.state_variable("unused", Type::Bool);
        let mut f = c.function("bump");
        let by = f.param("by", Type::Uint(256));
        let next = f.local("next", Type::Uint(256));
        let tmp = f.temp();
        f.entry_block()
            .add(tmp.with_version(0), count.with_version(0), by.with_version(0))
            .assign(next.with_version(1), tmp.with_version(0))
            .assign(count.with_version(1), next.with_version(1));
        f.build().unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn test_contract_rows() {
        let program = program();
        let table = DependencyTable::for_context(&program, ContractId(0), false).unwrap();

        assert_eq!(table.scope, "Counter");
        assert_eq!(
            table.rows,
            vec![
                DependencyRow {
                    variable: "count".to_string(),
                    dependencies: vec!["by".to_string(), "count".to_string(), "next".to_string()],
                },
                DependencyRow {
                    variable: "unused".to_string(),
                    dependencies: vec![],
                },
            ]
        );
    }

    #[test]
    fn test_function_rows_include_parameters_and_locals() {
        let program = program();
        let table = DependencyTable::for_context(&program, FunctionId(0), false).unwrap();

        assert_eq!(table.scope, "Counter::bump");
        let names: Vec<&str> = table.rows.iter().map(|r| r.variable.as_str()).collect();
        assert_eq!(names, vec!["count", "unused", "by", "next"]);
        assert_eq!(
            table.row("next").unwrap().dependencies,
            vec!["by".to_string(), "count".to_string()]
        );
    }

    #[test]
    fn test_unknown_scopes_are_errors() {
        let program = program();
        assert!(DependencyTable::for_context(&program, ContractId(3), false).is_err());
        assert!(DependencyTable::for_context(&program, FunctionId(3), false).is_err());
        assert!(
            DependencyTable::for_context(&program, Context::Node(FunctionId(0), BlockId(9)), false)
                .is_err()
        );
    }

    #[test]
    fn test_text_report() {
        let program = program();
        let emitter = DependencyEmitter::new(EmitterConfig::plain(OutputFormat::Text));
        let output = emitter.report(&program, ContractId(0)).unwrap();

        let expected = "\
=== Dependencies of Counter ===
+----------+-----------------+
| Variable | Dependencies    |
+----------+-----------------+
| count    | by, count, next |
| unused   |                 |
+----------+-----------------+
";
        assert_eq!(output, expected);
    }

    #[test]
    fn test_quiet_report_drops_empty_rows() {
        let program = program();
        let config = EmitterConfig {
            verbosity: VerbosityLevel::Quiet,
            ..EmitterConfig::plain(OutputFormat::Markdown)
        };
        let output = DependencyEmitter::new(config)
            .report(&program, ContractId(0))
            .unwrap();

        assert_eq!(
            output,
            "## Dependencies of Counter\n| Variable | Dependencies |\n| --- | --- |\n| count | by, count, next |\n"
        );
    }
}
