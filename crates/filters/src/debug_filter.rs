//! Structured tracing for filter loading and evaluation.
//!
//! Every hook is compiled behind the `tracing` feature flag and collapses to
//! an inline no-op when the feature is disabled, so the evaluation paths pay
//! nothing in default builds.
//!
//! # Examples
//!
//! ```rust,ignore
//! use filters::debug_filter::{FilterTracer, trace_object_decision};
//!
//! let mut tracer = FilterTracer::new();
//!
//! trace_object_decision("component", "IfcWall", None, true);
//! tracer.record_evaluation(false);
//!
//! tracer.summary();
//! ```

/// Target name for tracing events.
#[cfg(feature = "tracing")]
const FILTER_TARGET: &str = "cobie::filter";

// ============================================================================
// Tracing functions (feature-gated)
// ============================================================================

/// Traces a configuration section after it has been parsed.
///
/// # Arguments
///
/// * `source` - Path or label of the configuration source
/// * `section` - Section name as written in the header
/// * `entry_count` - Number of `key = value` entries in the section
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_section_loaded(source: &str, section: &str, entry_count: usize) {
    tracing::debug!(
        target: FILTER_TARGET,
        source = %source,
        section = %section,
        entry_count = entry_count,
        "section_loaded"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_section_loaded(_source: &str, _section: &str, _entry_count: usize) {}

/// Traces the verdict for an object tested against the entity tables.
///
/// # Arguments
///
/// * `kind` - Object category token (e.g. "component")
/// * `entity` - IFC entity name carried by the object
/// * `predefined_type` - Predefined type supplied by the caller, if any
/// * `excluded` - Whether the object was filtered out
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_object_decision(
    kind: &str,
    entity: &str,
    predefined_type: Option<&str>,
    excluded: bool,
) {
    tracing::trace!(
        target: FILTER_TARGET,
        kind = %kind,
        entity = %entity,
        predefined_type = ?predefined_type,
        excluded = excluded,
        "object_decision"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_object_decision(
    _kind: &str,
    _entity: &str,
    _predefined_type: Option<&str>,
    _excluded: bool,
) {
}

/// Traces the verdict for an attribute or property-set name.
///
/// # Arguments
///
/// * `name` - Name being tested
/// * `parent` - Category of the owning object, if known
/// * `property_set` - Whether `name` is a property-set name
/// * `excluded` - Whether the name was filtered out
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_name_decision(name: &str, parent: Option<&str>, property_set: bool, excluded: bool) {
    tracing::trace!(
        target: FILTER_TARGET,
        name = %name,
        parent = ?parent,
        property_set = property_set,
        excluded = excluded,
        "name_decision"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_name_decision(
    _name: &str,
    _parent: Option<&str>,
    _property_set: bool,
    _excluded: bool,
) {
}

/// Traces the state of an entity table after a merge.
///
/// # Arguments
///
/// * `table` - Which table was merged ("product", "type", "assembly")
/// * `items` - Number of entities recorded after the merge
/// * `excluded` - Number of entities still flagged for exclusion
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_filter_merge(table: &str, items: usize, excluded: usize) {
    tracing::debug!(
        target: FILTER_TARGET,
        table = %table,
        items = items,
        excluded = excluded,
        "filter_merge"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_filter_merge(_table: &str, _items: usize, _excluded: usize) {}

/// Traces summary statistics for a batch of evaluations.
///
/// # Arguments
///
/// * `sources` - Number of configuration sources combined
/// * `total_evaluated` - Total number of candidates evaluated
/// * `total_included` - Number of candidates kept
/// * `total_excluded` - Number of candidates filtered out
#[cfg(feature = "tracing")]
#[inline]
pub fn trace_filter_summary(
    sources: usize,
    total_evaluated: usize,
    total_included: usize,
    total_excluded: usize,
) {
    tracing::info!(
        target: FILTER_TARGET,
        sources = sources,
        total_evaluated = total_evaluated,
        total_included = total_included,
        total_excluded = total_excluded,
        include_ratio = if total_evaluated > 0 {
            (total_included as f64) / (total_evaluated as f64)
        } else {
            0.0
        },
        "filter_summary"
    );
}

/// No-op when tracing is disabled.
#[cfg(not(feature = "tracing"))]
#[inline]
pub fn trace_filter_summary(
    _sources: usize,
    _total_evaluated: usize,
    _total_included: usize,
    _total_excluded: usize,
) {
}

// ============================================================================
// FilterTracer - stateful tracer for aggregating filter statistics
// ============================================================================

/// Aggregates statistics across a batch of filter evaluations.
///
/// # Examples
///
/// ```
/// # use filters::debug_filter::FilterTracer;
/// let mut tracer = FilterTracer::new();
///
/// tracer.record_source();
/// tracer.record_evaluation(true);  // kept
/// tracer.record_evaluation(false); // filtered out
///
/// tracer.summary();
/// assert_eq!(tracer.sources(), 1);
/// assert_eq!(tracer.total_evaluated(), 2);
/// assert_eq!(tracer.total_excluded(), 1);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FilterTracer {
    sources: usize,
    total_evaluated: usize,
    total_included: usize,
    total_excluded: usize,
}

impl FilterTracer {
    /// Creates a new filter tracer with zero counts.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            sources: 0,
            total_evaluated: 0,
            total_included: 0,
            total_excluded: 0,
        }
    }

    /// Records that a configuration source was loaded or merged.
    pub fn record_source(&mut self) {
        self.sources += 1;
    }

    /// Records an evaluation result.
    ///
    /// # Arguments
    ///
    /// * `included` - Whether the candidate was kept (true) or filtered out (false)
    pub fn record_evaluation(&mut self, included: bool) {
        self.total_evaluated += 1;
        if included {
            self.total_included += 1;
        } else {
            self.total_excluded += 1;
        }
    }

    /// Emits a summary trace event with all accumulated statistics.
    pub fn summary(&self) {
        trace_filter_summary(
            self.sources,
            self.total_evaluated,
            self.total_included,
            self.total_excluded,
        );
    }

    /// Resets all counters to zero.
    pub fn reset(&mut self) {
        *self = Self::new();
    }

    /// Returns the number of configuration sources recorded.
    #[must_use]
    pub const fn sources(&self) -> usize {
        self.sources
    }

    /// Returns the total number of candidates evaluated.
    #[must_use]
    pub const fn total_evaluated(&self) -> usize {
        self.total_evaluated
    }

    /// Returns the number of candidates kept.
    #[must_use]
    pub const fn total_included(&self) -> usize {
        self.total_included
    }

    /// Returns the number of candidates filtered out.
    #[must_use]
    pub const fn total_excluded(&self) -> usize {
        self.total_excluded
    }

    /// Returns the ratio of kept candidates to evaluated candidates.
    ///
    /// Returns 0.0 if nothing has been evaluated.
    #[must_use]
    pub fn include_ratio(&self) -> f64 {
        if self.total_evaluated == 0 {
            0.0
        } else {
            (self.total_included as f64) / (self.total_evaluated as f64)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tracer_starts_empty() {
        let tracer = FilterTracer::new();
        assert_eq!(tracer.sources(), 0);
        assert_eq!(tracer.total_evaluated(), 0);
        assert_eq!(tracer.total_included(), 0);
        assert_eq!(tracer.total_excluded(), 0);
    }

    #[test]
    fn record_evaluation_mixed() {
        let mut tracer = FilterTracer::new();
        tracer.record_evaluation(true);
        tracer.record_evaluation(false);
        tracer.record_evaluation(true);
        assert_eq!(tracer.total_evaluated(), 3);
        assert_eq!(tracer.total_included(), 2);
        assert_eq!(tracer.total_excluded(), 1);
    }

    #[test]
    fn include_ratio_handles_zero_and_half() {
        let mut tracer = FilterTracer::new();
        assert!(tracer.include_ratio().abs() < f64::EPSILON);
        tracer.record_evaluation(true);
        tracer.record_evaluation(false);
        assert!((tracer.include_ratio() - 0.5).abs() < f64::EPSILON);
    }

    #[test]
    fn reset_clears_counters() {
        let mut tracer = FilterTracer::new();
        tracer.record_source();
        tracer.record_evaluation(false);
        tracer.reset();
        assert_eq!(tracer.sources(), 0);
        assert_eq!(tracer.total_evaluated(), 0);
    }

    #[test]
    fn trace_functions_do_not_panic() {
        trace_section_loaded("<bundled>", "CommonFilter", 4);
        trace_object_decision("component", "IfcWall", Some("STANDARD"), true);
        trace_name_decision("Name", Some("zone"), false, true);
        trace_filter_merge("product", 10, 3);
        trace_filter_summary(2, 10, 7, 3);
        FilterTracer::new().summary();
    }
}
