//! Measurement selector validation and request building.

use tracing::warn;

use crate::error::ValidationError;

/// Fallback aggregation level when none is given.
const DEFAULT_LEVEL: &str = "job";

/// User-supplied coordinates of one measurement slice, as entered.
///
/// Empty strings and `None` are equivalent: both mean "not set".
/// Validation normalizes this and upholds the cross-field rules.
#[derive(Debug, Clone, Default)]
pub struct Selector {
    /// XBAT job identifier (required).
    pub job_id: String,
    /// Metric group to filter (all groups when unset).
    pub group: Option<String>,
    /// Metric name within the group (requires `group`).
    pub metric: Option<String>,
    /// Aggregation level: `job`, `node` or `core`. Defaults to `job`.
    pub level: String,
    /// Node identifier (required when `level` is `node`).
    pub node: Option<String>,
}

impl Selector {
    /// Checks the selector's internal consistency.
    ///
    /// Rules, in order:
    /// 1. `job_id` must be non-empty
    /// 2. `metric` requires `group`
    /// 3. an empty `level` is not an error: it defaults to `job` with a
    ///    warning to the operator
    /// 4. `level == "node"` requires `node`
    ///
    /// Pure apart from the warning; no network or filesystem access.
    pub fn validate(self) -> Result<ValidSelector, ValidationError> {
        let group = none_if_empty(self.group);
        let metric = none_if_empty(self.metric);
        let node = none_if_empty(self.node);

        if self.job_id.is_empty() {
            return Err(ValidationError::MissingJobId);
        }
        if group.is_none() && metric.is_some() {
            return Err(ValidationError::MetricWithoutGroup);
        }

        let level = if self.level.is_empty() {
            warn!("no aggregation level given, defaulting to '{DEFAULT_LEVEL}'");
            DEFAULT_LEVEL.to_string()
        } else {
            self.level
        };

        if level == "node" && node.is_none() {
            return Err(ValidationError::MissingNodeForNodeLevel);
        }

        Ok(ValidSelector {
            job_id: self.job_id,
            group,
            metric,
            level,
            node,
        })
    }
}

fn none_if_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// A selector that passed validation.
///
/// Invariants: `job_id` and `level` are non-empty, `metric` implies
/// `group`, and level `node` implies `node`.
#[derive(Debug, Clone)]
pub struct ValidSelector {
    job_id: String,
    group: Option<String>,
    metric: Option<String>,
    level: String,
    node: Option<String>,
}

impl ValidSelector {
    /// Returns the job identifier.
    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    /// Derives the output file name for this selector.
    ///
    /// Segments joined by `_` with a `.csv` suffix. With a group the name
    /// is `<job>_<group>_<metric or "all">_<level>[_<node>]`; without one
    /// the metric segment is dropped entirely and the group segment
    /// becomes `all`. Downstream naming conventions rely on these exact
    /// rules.
    pub fn file_name(&self) -> String {
        let mut segments = vec![self.job_id.as_str()];
        match self.group.as_deref() {
            Some(group) => {
                segments.push(group);
                segments.push(self.metric.as_deref().unwrap_or("all"));
            }
            None => segments.push("all"),
        }
        segments.push(&self.level);
        if let Some(node) = self.node.as_deref() {
            segments.push(node);
        }
        format!("{}.csv", segments.join("_"))
    }

    /// Builds the query string: `group`, `metric`, `level`, `node` in
    /// that fixed order, absent keys omitted.
    ///
    /// Unlike the file name, absent keys are omitted rather than
    /// defaulted; `level` is always present post-validation.
    pub fn query_string(&self) -> String {
        let mut pairs = Vec::new();
        if let Some(group) = self.group.as_deref() {
            pairs.push(format!("group={group}"));
        }
        if let Some(metric) = self.metric.as_deref() {
            pairs.push(format!("metric={metric}"));
        }
        if !self.level.is_empty() {
            pairs.push(format!("level={}", self.level));
        }
        if let Some(node) = self.node.as_deref() {
            pairs.push(format!("node={node}"));
        }
        pairs.join("&")
    }

    /// Builds the full download request against `api_base`.
    pub fn to_request(&self, api_base: &str) -> DownloadRequest {
        let base = format!(
            "{}/api/v1/measurements/{}/csv",
            api_base.trim_end_matches('/'),
            self.job_id
        );
        let query = self.query_string();
        let url = if query.is_empty() {
            base
        } else {
            format!("{base}?{query}")
        };
        DownloadRequest {
            url,
            file_name: self.file_name(),
            job_id: self.job_id.clone(),
        }
    }
}

/// A fully resolved CSV export request, built once per run.
#[derive(Debug, Clone)]
pub struct DownloadRequest {
    /// Fully-qualified resource URL, query string included.
    pub url: String,
    /// File name the payload is written under.
    pub file_name: String,
    /// Job identifier, kept for error reporting.
    pub job_id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selector(job_id: &str, group: &str, metric: &str, level: &str, node: &str) -> Selector {
        let opt = |value: &str| (!value.is_empty()).then(|| value.to_string());
        Selector {
            job_id: job_id.to_string(),
            group: opt(group),
            metric: opt(metric),
            level: level.to_string(),
            node: opt(node),
        }
    }

    #[test]
    fn empty_job_id_is_rejected() {
        let err = selector("", "cpu", "", "job", "").validate().unwrap_err();
        assert_eq!(err, ValidationError::MissingJobId);
    }

    #[test]
    fn metric_without_group_is_rejected() {
        let err = selector("249755", "", "usage", "job", "")
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::MetricWithoutGroup);
    }

    #[test]
    fn empty_level_defaults_to_job() {
        let valid = selector("249755", "", "", "", "").validate().unwrap();
        assert_eq!(valid.level, "job");
    }

    #[test]
    fn node_level_without_node_is_rejected() {
        let err = selector("249755", "", "", "node", "")
            .validate()
            .unwrap_err();
        assert_eq!(err, ValidationError::MissingNodeForNodeLevel);
    }

    #[test]
    fn node_level_with_node_is_accepted() {
        let valid = selector("249755", "", "", "node", "n01").validate().unwrap();
        assert_eq!(valid.node.as_deref(), Some("n01"));
    }

    #[test]
    fn empty_strings_count_as_absent() {
        // An empty metric must not trigger the metric-without-group rule.
        let valid = selector("249755", "", "", "job", "").validate().unwrap();
        assert_eq!(valid.group, None);
        assert_eq!(valid.metric, None);
    }

    #[test]
    fn file_name_without_group_uses_all_placeholder() {
        let valid = selector("249755", "", "", "job", "").validate().unwrap();
        assert_eq!(valid.file_name(), "249755_all_job.csv");
    }

    #[test]
    fn file_name_with_group_defaults_metric_to_all() {
        let valid = selector("249755", "cpu", "", "job", "").validate().unwrap();
        assert_eq!(valid.file_name(), "249755_cpu_all_job.csv");
    }

    #[test]
    fn file_name_appends_node_when_set() {
        let valid = selector("249755", "cpu", "", "job", "n01").validate().unwrap();
        assert_eq!(valid.file_name(), "249755_cpu_all_job_n01.csv");
    }

    #[test]
    fn file_name_includes_metric_when_set() {
        let valid = selector("249755", "cpu", "usage", "node", "n01")
            .validate()
            .unwrap();
        assert_eq!(valid.file_name(), "249755_cpu_usage_node_n01.csv");
    }

    #[test]
    fn query_string_keeps_fixed_order_and_omits_absent_keys() {
        let valid = selector("249755", "cpu", "", "job", "n01").validate().unwrap();
        assert_eq!(valid.query_string(), "group=cpu&level=job&node=n01");

        let valid = selector("249755", "cpu", "usage", "node", "n01")
            .validate()
            .unwrap();
        assert_eq!(
            valid.query_string(),
            "group=cpu&metric=usage&level=node&node=n01"
        );

        let valid = selector("249755", "", "", "job", "").validate().unwrap();
        assert_eq!(valid.query_string(), "level=job");
    }

    #[test]
    fn request_url_appends_query_and_trims_base_slash() {
        let valid = selector("249755", "cpu", "", "job", "").validate().unwrap();
        let request = valid.to_request("https://demo.xbat.dev/");
        assert_eq!(
            request.url,
            "https://demo.xbat.dev/api/v1/measurements/249755/csv?group=cpu&level=job"
        );
        assert_eq!(request.file_name, "249755_cpu_all_job.csv");
        assert_eq!(request.job_id, "249755");
    }
}
