use std::fmt;
use std::io;
use std::path::{Path, PathBuf};

use filters::debug_filter::FilterTracer;
use filters::{FilterSet, FilterSource, LoadError, SerializeError};

/// Failure reported by a subcommand.
#[derive(Debug)]
pub(crate) enum CommandError {
    /// A configuration source could not be loaded.
    Load(LoadError),
    /// A serialized filter set could not be read.
    Serialized {
        path: PathBuf,
        source: SerializeError,
    },
    /// Writing the result failed.
    Output(io::Error),
}

impl fmt::Display for CommandError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Load(error) => write!(f, "{error}"),
            Self::Serialized { path, source } => {
                write!(f, "{}: {source}", path.display())
            }
            Self::Output(error) => write!(f, "failed to write output: {error}"),
        }
    }
}

impl std::error::Error for CommandError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Load(error) => Some(error),
            Self::Serialized { source, .. } => Some(source),
            Self::Output(error) => Some(error),
        }
    }
}

impl From<io::Error> for CommandError {
    fn from(error: io::Error) -> Self {
        Self::Output(error)
    }
}

fn is_json(path: &Path) -> bool {
    path.extension()
        .is_some_and(|extension| extension.eq_ignore_ascii_case("json"))
}

fn load_one(path: &Path) -> Result<FilterSet, CommandError> {
    if is_json(path) {
        FilterSet::read_json(path).map_err(|source| match source {
            // The I/O variant already names the file.
            SerializeError::Io { .. } => CommandError::Load(LoadError::Serialized(source)),
            SerializeError::Json(_) => CommandError::Serialized {
                path: path.to_path_buf(),
                source,
            },
        })
    } else {
        FilterSet::load(&FilterSource::File(path.to_path_buf())).map_err(CommandError::Load)
    }
}

/// Loads and merges every configuration source in order.
///
/// Without paths the bundled defaults are loaded.
pub(crate) fn load_filters(
    paths: &[PathBuf],
    tracer: &mut FilterTracer,
) -> Result<FilterSet, CommandError> {
    let Some((first, rest)) = paths.split_first() else {
        tracer.record_source();
        return FilterSet::load(&FilterSource::Bundled).map_err(CommandError::Load);
    };

    let mut set = load_one(first)?;
    tracer.record_source();
    for path in rest {
        set.merge(&load_one(path)?);
        tracer.record_source();
    }
    Ok(set)
}
