// ── Result derivation ──
//
// filter → sort → paginate over the fetched results, plus aggregate stats
// over the untouched input. Everything here is synchronous and infallible:
// bad parameters degrade to "no filter", "input order" or "empty page".

use std::cmp::Ordering;
use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use strum::{Display, EnumString};

use crate::model::{CruxResult, MetricName};

/// Page sizes the presentation offers.
pub const PAGE_SIZE_OPTIONS: [usize; 3] = [5, 10, 25];

pub const DEFAULT_PAGE_SIZE: usize = 5;

// ── Filter ──────────────────────────────────────────────────────────

/// Which metric a filter looks at. `All` never excludes anything.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum MetricFilter {
    #[default]
    All,
    Metric(MetricName),
}

impl fmt::Display for MetricFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::All => f.write_str("all"),
            Self::Metric(m) => write!(f, "{m}"),
        }
    }
}

impl FromStr for MetricFilter {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("all") {
            return Ok(Self::All);
        }
        s.trim().parse().map(Self::Metric)
    }
}

impl From<MetricFilter> for String {
    fn from(filter: MetricFilter) -> Self {
        filter.to_string()
    }
}

impl TryFrom<String> for MetricFilter {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Numeric comparison applied as `metric_value <op> filter_value`.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum Comparison {
    #[default]
    Gt,
    Lt,
    Eq,
    Gte,
    Lte,
}

impl Comparison {
    pub fn apply(self, lhs: f64, rhs: f64) -> bool {
        match self {
            Self::Gt => lhs > rhs,
            Self::Lt => lhs < rhs,
            #[allow(clippy::float_cmp)]
            Self::Eq => lhs == rhs,
            Self::Gte => lhs >= rhs,
            Self::Lte => lhs <= rhs,
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct FilterSpec {
    pub metric: MetricFilter,
    pub operator: Comparison,
    /// `None` (or NaN) disables filtering.
    pub value: Option<f64>,
}

impl FilterSpec {
    pub fn new(metric: MetricFilter, operator: Comparison, value: Option<f64>) -> Self {
        Self {
            metric,
            operator,
            value,
        }
    }

    /// Lenient numeric read of a user-typed filter value.
    ///
    /// Leading whitespace is skipped and the longest numeric prefix is used
    /// (`"3000ms"` reads as 3000). Anything without a numeric prefix, or
    /// a NaN or infinite value, yields `None`.
    pub fn parse_value(input: &str) -> Option<f64> {
        let s = input.trim_start();
        s.char_indices()
            .map(|(i, c)| i + c.len_utf8())
            .rev()
            .find_map(|end| s[..end].parse::<f64>().ok())
            .filter(|v| v.is_finite())
    }

    /// Whether this filter excludes anything at all.
    pub fn is_active(&self) -> bool {
        self.threshold().is_some()
    }

    fn threshold(&self) -> Option<(MetricName, f64)> {
        let MetricFilter::Metric(metric) = self.metric else {
            return None;
        };
        let value = self.value.filter(|v| !v.is_nan())?;
        Some((metric, value))
    }

    /// Results lacking the filtered metric never match an active filter.
    pub fn matches(&self, result: &CruxResult) -> bool {
        let Some((metric, threshold)) = self.threshold() else {
            return true;
        };
        result
            .metric(metric)
            .is_some_and(|v| self.operator.apply(v, threshold))
    }
}

// ── Sort ────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "String", try_from = "String")]
pub enum SortKey {
    Url,
    Metric(MetricName),
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Url => f.write_str("url"),
            Self::Metric(m) => write!(f, "{m}"),
        }
    }
}

impl FromStr for SortKey {
    type Err = strum::ParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s.trim().eq_ignore_ascii_case("url") {
            return Ok(Self::Url);
        }
        s.trim().parse().map(Self::Metric)
    }
}

impl From<SortKey> for String {
    fn from(key: SortKey) -> Self {
        key.to_string()
    }
}

impl TryFrom<String> for SortKey {
    type Error = strum::ParseError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumString,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum SortDirection {
    #[default]
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SortSpec {
    /// `None` keeps filter order.
    pub key: Option<SortKey>,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn by(key: SortKey, direction: SortDirection) -> Self {
        Self {
            key: Some(key),
            direction,
        }
    }

    /// Header-click semantics: the active key in ascending order flips to
    /// descending, anything else sorts ascending by the requested key.
    pub fn request_sort(&mut self, key: SortKey) {
        self.direction = if self.key == Some(key) && self.direction == SortDirection::Asc {
            SortDirection::Desc
        } else {
            SortDirection::Asc
        };
        self.key = Some(key);
    }

    fn compare(&self, a: &CruxResult, b: &CruxResult) -> Ordering {
        let ord = match self.key {
            None => return Ordering::Equal,
            Some(SortKey::Url) => a.url.cmp(&b.url),
            Some(SortKey::Metric(m)) => {
                let av = a.metric(m).unwrap_or(0.0);
                let bv = b.metric(m).unwrap_or(0.0);
                av.total_cmp(&bv)
            }
        };
        match self.direction {
            SortDirection::Asc => ord,
            SortDirection::Desc => ord.reverse(),
        }
    }
}

// ── Pagination ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageSpec {
    /// Zero-based.
    pub page_index: usize,
    pub page_size: usize,
}

impl Default for PageSpec {
    fn default() -> Self {
        Self {
            page_index: 0,
            page_size: DEFAULT_PAGE_SIZE,
        }
    }
}

impl PageSpec {
    pub fn new(page_index: usize, page_size: usize) -> Self {
        Self {
            page_index,
            page_size: page_size.max(1),
        }
    }

    /// Half-open row range for `total` rows, clamped to `0..=total`.
    pub fn range(&self, total: usize) -> std::ops::Range<usize> {
        let size = self.page_size.max(1);
        let start = self.page_index.saturating_mul(size).min(total);
        let end = start.saturating_add(size).min(total);
        start..end
    }

    /// Number of pages needed for `total` rows (at least one).
    pub fn page_count(&self, total: usize) -> usize {
        total.div_ceil(self.page_size.max(1)).max(1)
    }
}

// ── View state ──────────────────────────────────────────────────────

/// Everything the user can tweak about the results view.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct ViewState {
    pub filter: FilterSpec,
    pub sort: SortSpec,
    pub page: PageSpec,
}

impl ViewState {
    pub fn set_filter(&mut self, filter: FilterSpec) {
        self.filter = filter;
    }

    pub fn request_sort(&mut self, key: SortKey) {
        self.sort.request_sort(key);
    }

    pub fn set_page(&mut self, page_index: usize) {
        self.page.page_index = page_index;
    }

    /// Changing the page size always returns to the first page.
    pub fn set_page_size(&mut self, page_size: usize) {
        self.page = PageSpec::new(0, page_size);
    }
}

// ── Aggregates ──────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct MetricStats {
    pub sum: f64,
    /// `sum` divided by the number of *all* results, including those that
    /// did not report this metric.
    pub avg: f64,
    pub min: Option<f64>,
    pub max: Option<f64>,
    /// Results that reported this metric.
    pub count: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AggregateStats(BTreeMap<MetricName, MetricStats>);

impl AggregateStats {
    pub fn get(&self, metric: MetricName) -> Option<&MetricStats> {
        self.0.get(&metric)
    }

    pub fn iter(&self) -> impl Iterator<Item = (MetricName, &MetricStats)> + '_ {
        self.0.iter().map(|(k, v)| (*k, v))
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Per-metric stats over every result, for each metric at least one
/// result reported.
#[allow(clippy::cast_precision_loss, clippy::as_conversions)]
pub fn aggregate(results: &[CruxResult]) -> AggregateStats {
    let mut stats: BTreeMap<MetricName, MetricStats> = BTreeMap::new();
    for result in results {
        for (metric, value) in result.metrics.iter() {
            let entry = stats.entry(metric).or_insert(MetricStats {
                sum: 0.0,
                avg: 0.0,
                min: None,
                max: None,
                count: 0,
            });
            entry.sum += value;
            entry.count += 1;
            entry.min = Some(entry.min.map_or(value, |m| m.min(value)));
            entry.max = Some(entry.max.map_or(value, |m| m.max(value)));
        }
    }

    let total = results.len() as f64;
    for entry in stats.values_mut() {
        entry.avg = entry.sum / total;
    }
    AggregateStats(stats)
}

/// Union of reported metric names, in canonical order.
pub fn metric_columns(results: &[CruxResult]) -> Vec<MetricName> {
    MetricName::ALL
        .into_iter()
        .filter(|m| results.iter().any(|r| r.metrics.contains(*m)))
        .collect()
}

/// Choices for the filter metric menu: `all` followed by the column set.
pub fn filter_options(results: &[CruxResult]) -> Vec<MetricFilter> {
    std::iter::once(MetricFilter::All)
        .chain(metric_columns(results).into_iter().map(MetricFilter::Metric))
        .collect()
}

// ── Derived view ────────────────────────────────────────────────────

/// What the presentation renders for one `(results, view)` pair.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DerivedView<'a> {
    pub visible_rows: Vec<&'a CruxResult>,
    /// Rows surviving the filter, before pagination.
    pub total_filtered_count: usize,
    pub aggregate: AggregateStats,
    pub columns: Vec<MetricName>,
    pub result_count: usize,
}

impl DerivedView<'_> {
    /// The aggregate table is only worth showing for more than one result.
    pub fn show_aggregate(&self) -> bool {
        self.result_count > 1
    }
}

/// Run the full pipeline.
pub fn derive<'a>(results: &'a [CruxResult], view: &ViewState) -> DerivedView<'a> {
    let mut rows: Vec<&CruxResult> = results
        .iter()
        .filter(|r| view.filter.matches(r))
        .collect();

    if view.sort.key.is_some() {
        rows.sort_by(|a, b| view.sort.compare(a, b));
    }

    let total_filtered_count = rows.len();
    let range = view.page.range(total_filtered_count);
    let visible_rows = rows
        .get(range)
        .map(|page| page.to_vec())
        .unwrap_or_default();

    DerivedView {
        visible_rows,
        total_filtered_count,
        aggregate: aggregate(results),
        columns: metric_columns(results),
        result_count: results.len(),
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::float_cmp)]
mod tests {
    use super::*;
    use crate::model::MetricSet;
    use pretty_assertions::assert_eq;
    use proptest::prelude::*;

    fn result(url: &str, metrics: &[(MetricName, f64)]) -> CruxResult {
        CruxResult::new(url, metrics.iter().copied().collect::<MetricSet>())
    }

    fn urls<'a>(view: &'a DerivedView<'_>) -> Vec<&'a str> {
        view.visible_rows.iter().map(|r| r.url.as_str()).collect()
    }

    fn filter(metric: MetricName, op: Comparison, value: f64) -> ViewState {
        ViewState {
            filter: FilterSpec::new(MetricFilter::Metric(metric), op, Some(value)),
            ..ViewState::default()
        }
    }

    // ── Filter ──

    #[test]
    fn all_metric_is_no_op() {
        let results = vec![result("a", &[]), result("b", &[(MetricName::Lcp, 1.0)])];
        let view = ViewState {
            filter: FilterSpec::new(MetricFilter::All, Comparison::Gt, Some(1e9)),
            ..ViewState::default()
        };
        assert_eq!(derive(&results, &view).total_filtered_count, 2);
    }

    #[test]
    fn absent_or_nan_value_disables_filter() {
        let results = vec![result("a", &[]), result("b", &[(MetricName::Lcp, 1.0)])];
        for value in [None, Some(f64::NAN)] {
            let view = ViewState {
                filter: FilterSpec::new(MetricFilter::Metric(MetricName::Lcp), Comparison::Gt, value),
                ..ViewState::default()
            };
            assert_eq!(derive(&results, &view).total_filtered_count, 2);
        }
    }

    #[test]
    fn rows_lacking_metric_are_excluded() {
        let results = vec![
            result("a", &[(MetricName::Cls, 0.2)]),
            result("b", &[(MetricName::Lcp, 100.0)]),
        ];
        let view = filter(MetricName::Cls, Comparison::Gte, 0.0);
        assert_eq!(urls(&derive(&results, &view)), vec!["a"]);
    }

    #[test]
    fn each_operator() {
        let results = vec![
            result("low", &[(MetricName::Ttfb, 100.0)]),
            result("mid", &[(MetricName::Ttfb, 500.0)]),
            result("high", &[(MetricName::Ttfb, 900.0)]),
        ];
        let cases = [
            (Comparison::Gt, vec!["high"]),
            (Comparison::Gte, vec!["mid", "high"]),
            (Comparison::Lt, vec!["low"]),
            (Comparison::Lte, vec!["low", "mid"]),
            (Comparison::Eq, vec!["mid"]),
        ];
        for (op, expected) in cases {
            let derived = derive(&results, &filter(MetricName::Ttfb, op, 500.0));
            assert_eq!(urls(&derived), expected, "operator {op}");
        }
    }

    #[test]
    fn parse_value_is_lenient() {
        assert_eq!(FilterSpec::parse_value("3000"), Some(3000.0));
        assert_eq!(FilterSpec::parse_value("  0.25 "), Some(0.25));
        assert_eq!(FilterSpec::parse_value("3000ms"), Some(3000.0));
        assert_eq!(FilterSpec::parse_value("-5"), Some(-5.0));
        assert_eq!(FilterSpec::parse_value(""), None);
        assert_eq!(FilterSpec::parse_value("abc"), None);
        assert_eq!(FilterSpec::parse_value("NaN"), None);
        assert_eq!(FilterSpec::parse_value("inf"), None);
        assert_eq!(FilterSpec::parse_value("Infinity"), None);
        assert_eq!(FilterSpec::parse_value("-inf"), None);
        assert_eq!(FilterSpec::parse_value("1e400"), None);
    }

    #[test]
    fn metric_filter_parses() {
        assert_eq!("all".parse::<MetricFilter>().unwrap(), MetricFilter::All);
        assert_eq!(
            "LCP".parse::<MetricFilter>().unwrap(),
            MetricFilter::Metric(MetricName::Lcp)
        );
        assert!("speed".parse::<MetricFilter>().is_err());
        assert_eq!(MetricFilter::Metric(MetricName::Inp).to_string(), "inp");
    }

    // ── Sort ──

    #[test]
    fn no_sort_key_keeps_input_order() {
        let results = vec![result("c", &[]), result("a", &[]), result("b", &[])];
        assert_eq!(urls(&derive(&results, &ViewState::default())), vec!["c", "a", "b"]);
    }

    #[test]
    fn sort_by_url_both_directions() {
        let results = vec![result("c", &[]), result("a", &[]), result("b", &[])];
        let mut view = ViewState::default();
        view.request_sort(SortKey::Url);
        assert_eq!(urls(&derive(&results, &view)), vec!["a", "b", "c"]);
        view.request_sort(SortKey::Url);
        assert_eq!(view.sort.direction, SortDirection::Desc);
        assert_eq!(urls(&derive(&results, &view)), vec!["c", "b", "a"]);
    }

    #[test]
    fn missing_metric_sorts_as_zero_and_ties_are_stable() {
        let results = vec![
            result("x", &[(MetricName::Lcp, 10.0)]),
            result("none", &[]),
            result("zero", &[(MetricName::Lcp, 0.0)]),
            result("y", &[(MetricName::Lcp, 5.0)]),
        ];
        let view = ViewState {
            sort: SortSpec::by(SortKey::Metric(MetricName::Lcp), SortDirection::Asc),
            ..ViewState::default()
        };
        assert_eq!(urls(&derive(&results, &view)), vec!["none", "zero", "y", "x"]);
    }

    #[test]
    fn request_sort_toggles() {
        let mut sort = SortSpec::default();
        sort.request_sort(SortKey::Metric(MetricName::Cls));
        assert_eq!(sort, SortSpec::by(SortKey::Metric(MetricName::Cls), SortDirection::Asc));
        sort.request_sort(SortKey::Metric(MetricName::Cls));
        assert_eq!(sort.direction, SortDirection::Desc);
        sort.request_sort(SortKey::Metric(MetricName::Cls));
        assert_eq!(sort.direction, SortDirection::Asc);
        sort.request_sort(SortKey::Metric(MetricName::Cls));
        sort.request_sort(SortKey::Url);
        assert_eq!(sort, SortSpec::by(SortKey::Url, SortDirection::Asc));
    }

    // ── Pagination ──

    #[test]
    fn pages_slice_rows() {
        let results: Vec<_> = (0..12).map(|i| result(&format!("u{i:02}"), &[])).collect();
        let mut view = ViewState::default();
        assert_eq!(derive(&results, &view).visible_rows.len(), 5);
        view.set_page(2);
        let derived = derive(&results, &view);
        assert_eq!(urls(&derived), vec!["u10", "u11"]);
        assert_eq!(derived.total_filtered_count, 12);
        assert_eq!(view.page.page_count(12), 3);
    }

    #[test]
    fn out_of_range_page_is_empty() {
        let results = vec![result("a", &[]), result("b", &[])];
        let mut view = ViewState::default();
        view.set_page(7);
        let derived = derive(&results, &view);
        assert!(derived.visible_rows.is_empty());
        assert_eq!(derived.total_filtered_count, 2);

        view.page = PageSpec::new(usize::MAX, usize::MAX);
        assert!(derive(&results, &view).visible_rows.is_empty());
    }

    #[test]
    fn changing_page_size_resets_page() {
        let mut view = ViewState::default();
        view.set_page(3);
        view.set_page_size(25);
        assert_eq!(view.page, PageSpec::new(0, 25));
        view.set_page_size(0);
        assert_eq!(view.page.page_size, 1);
    }

    // ── Aggregate ──

    #[test]
    fn average_divides_by_all_results() {
        let results = vec![
            result("a", &[(MetricName::Cls, 0.1)]),
            result("b", &[(MetricName::Cls, 0.2)]),
            result("c", &[]),
        ];
        let stats = aggregate(&results);
        let cls = stats.get(MetricName::Cls).unwrap();
        assert!((cls.avg - 0.1).abs() < 1e-12);
        assert!((cls.sum - 0.3).abs() < 1e-12);
        assert_eq!(cls.min, Some(0.1));
        assert_eq!(cls.max, Some(0.2));
        assert_eq!(cls.count, 2);
    }

    #[test]
    fn aggregate_ignores_filter_and_page() {
        let results = vec![
            result("a", &[(MetricName::Lcp, 1000.0)]),
            result("b", &[(MetricName::Lcp, 5000.0)]),
        ];
        let mut view = filter(MetricName::Lcp, Comparison::Gt, 3000.0);
        view.set_page(9);
        let derived = derive(&results, &view);
        assert_eq!(derived.aggregate, aggregate(&results));
        assert_eq!(derived.aggregate.get(MetricName::Lcp).unwrap().count, 2);
    }

    #[test]
    fn empty_input() {
        let derived = derive(&[], &ViewState::default());
        assert!(derived.visible_rows.is_empty());
        assert_eq!(derived.total_filtered_count, 0);
        assert!(derived.aggregate.is_empty());
        assert!(derived.columns.is_empty());
        assert!(!derived.show_aggregate());
    }

    #[test]
    fn columns_are_union_in_canonical_order() {
        let results = vec![
            result("a", &[(MetricName::Inp, 1.0)]),
            result("b", &[(MetricName::Cls, 1.0), (MetricName::Lcp, 1.0)]),
        ];
        assert_eq!(
            metric_columns(&results),
            vec![MetricName::Lcp, MetricName::Cls, MetricName::Inp]
        );
        assert_eq!(
            filter_options(&results),
            vec![
                MetricFilter::All,
                MetricFilter::Metric(MetricName::Lcp),
                MetricFilter::Metric(MetricName::Cls),
                MetricFilter::Metric(MetricName::Inp),
            ]
        );
    }

    #[test]
    fn single_result_hides_aggregate() {
        let results = vec![result("a", &[(MetricName::Lcp, 1.0)])];
        assert!(!derive(&results, &ViewState::default()).show_aggregate());
    }

    #[test]
    fn end_to_end_scenario() {
        use crate::classify::rate;
        use crate::model::Rating;

        let results = vec![
            result("https://fast.com", &[(MetricName::Lcp, 2000.0), (MetricName::Cls, 0.05)]),
            result("https://slow.com", &[(MetricName::Lcp, 5000.0), (MetricName::Cls, 0.3)]),
        ];
        let derived = derive(&results, &filter(MetricName::Lcp, Comparison::Gt, 3000.0));
        assert_eq!(urls(&derived), vec!["https://slow.com"]);

        let row = derived.visible_rows[0];
        assert_eq!(rate(MetricName::Lcp, row.metric(MetricName::Lcp)), Rating::Poor);
        assert_eq!(rate(MetricName::Cls, row.metric(MetricName::Cls)), Rating::Poor);
        assert!(derived.show_aggregate());
    }

    #[test]
    fn derived_view_serializes_rows_inline() {
        let results = vec![result("a", &[(MetricName::Lcp, 1.0)])];
        let json = serde_json::to_value(derive(&results, &ViewState::default())).unwrap();
        assert_eq!(json["visible_rows"][0]["url"], "a");
        assert_eq!(json["columns"], serde_json::json!(["lcp"]));
    }

    // ── Properties ──

    fn any_metric() -> impl Strategy<Value = MetricName> {
        prop::sample::select(MetricName::ALL.to_vec())
    }

    fn any_result() -> impl Strategy<Value = CruxResult> {
        (
            "[a-z]{1,6}",
            prop::collection::btree_map(any_metric(), 0.0f64..6000.0, 0..6),
        )
            .prop_map(|(url, metrics)| CruxResult::new(url, metrics.into_iter().collect()))
    }

    fn any_view() -> impl Strategy<Value = ViewState> {
        let filter = (
            prop_oneof![
                Just(MetricFilter::All),
                any_metric().prop_map(MetricFilter::Metric)
            ],
            prop::sample::select(vec![
                Comparison::Gt,
                Comparison::Lt,
                Comparison::Eq,
                Comparison::Gte,
                Comparison::Lte,
            ]),
            proptest::option::of(0.0f64..6000.0),
        )
            .prop_map(|(m, op, v)| FilterSpec::new(m, op, v));
        let sort = (
            proptest::option::of(prop_oneof![
                Just(SortKey::Url),
                any_metric().prop_map(SortKey::Metric)
            ]),
            prop::sample::select(vec![SortDirection::Asc, SortDirection::Desc]),
        )
            .prop_map(|(key, direction)| SortSpec { key, direction });
        let page = (0usize..5, 1usize..10).prop_map(|(i, s)| PageSpec::new(i, s));
        (filter, sort, page).prop_map(|(filter, sort, page)| ViewState { filter, sort, page })
    }

    proptest! {
        #[test]
        fn derive_is_idempotent(results in prop::collection::vec(any_result(), 0..15), view in any_view()) {
            prop_assert_eq!(derive(&results, &view), derive(&results, &view));
        }

        #[test]
        fn visible_rows_satisfy_filter(results in prop::collection::vec(any_result(), 0..15), view in any_view()) {
            let derived = derive(&results, &view);
            for row in &derived.visible_rows {
                prop_assert!(view.filter.matches(row));
                if let (MetricFilter::Metric(m), Some(_)) = (view.filter.metric, view.filter.value) {
                    prop_assert!(row.metrics.contains(m));
                }
            }
            prop_assert!(derived.visible_rows.len() <= view.page.page_size);
            prop_assert!(derived.total_filtered_count <= results.len());
        }

        #[test]
        fn pages_partition_filtered_rows(results in prop::collection::vec(any_result(), 0..15), size in 1usize..6) {
            let mut view = ViewState::default();
            view.set_page_size(size);
            let total = derive(&results, &view).total_filtered_count;
            let mut seen = 0;
            for page in 0..view.page.page_count(total) + 1 {
                view.set_page(page);
                seen += derive(&results, &view).visible_rows.len();
            }
            prop_assert_eq!(seen, total);
        }

        #[test]
        fn sorted_rows_are_ordered(results in prop::collection::vec(any_result(), 0..15), metric in any_metric()) {
            let view = ViewState {
                sort: SortSpec::by(SortKey::Metric(metric), SortDirection::Desc),
                page: PageSpec::new(0, 100),
                ..ViewState::default()
            };
            let derived = derive(&results, &view);
            for pair in derived.visible_rows.windows(2) {
                let a = pair[0].metric(metric).unwrap_or(0.0);
                let b = pair[1].metric(metric).unwrap_or(0.0);
                prop_assert!(a >= b);
            }
        }
    }
}
