use std::io::Write;

use filters::debug_filter::FilterTracer;
use filters::{FilterSet, ObjectRef};

use crate::command::{Action, DumpFormat, ParsedArgs};
use crate::sources::{CommandError, load_filters};

const EXCLUDED: &str = "excluded";
const INCLUDED: &str = "included";

/// Runs the parsed command, writing results to `stdout`.
pub(crate) fn execute<Out: Write>(args: &ParsedArgs, stdout: &mut Out) -> Result<(), CommandError> {
    let mut tracer = FilterTracer::new();
    let set = load_filters(&args.configs, &mut tracer)?;

    match &args.action {
        Action::Dump { format } => dump(&set, *format, stdout)?,
        Action::Check {
            kind,
            predefined_type,
            entities,
        } => {
            for entity in entities {
                let excluded =
                    set.filter_object(ObjectRef::new(*kind, entity), predefined_type.as_deref());
                report(stdout, entity, excluded, &mut tracer)?;
            }
            tracer.summary();
        }
        Action::Name {
            parent,
            property_set,
            names,
        } => {
            for name in names {
                let excluded = if *property_set {
                    set.filter_property_set_name_on_sheet(name, *parent)
                } else {
                    set.filter_name_on_parent(name, *parent)
                };
                report(stdout, name, excluded, &mut tracer)?;
            }
            tracer.summary();
        }
    }
    stdout.flush()?;
    Ok(())
}

fn dump<Out: Write>(set: &FilterSet, format: DumpFormat, stdout: &mut Out) -> Result<(), CommandError> {
    match format {
        DumpFormat::Json => {
            let json = set.to_json().map_err(|error| CommandError::Load(error.into()))?;
            writeln!(stdout, "{json}")?;
        }
        DumpFormat::Conf => stdout.write_all(set.to_config().render().as_bytes())?,
    }
    Ok(())
}

fn report<Out: Write>(
    stdout: &mut Out,
    candidate: &str,
    excluded: bool,
    tracer: &mut FilterTracer,
) -> Result<(), CommandError> {
    tracer.record_evaluation(!excluded);
    let verdict = if excluded { EXCLUDED } else { INCLUDED };
    writeln!(stdout, "{candidate}\t{verdict}")?;
    Ok(())
}
