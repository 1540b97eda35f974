//! Multi-key, mixed-type, directional record comparator
//!
//! [`RecordComparator`] orders opaque sort items by looking up their
//! field-bag through a [`RecordSource`] and comparing the fields named by a
//! [`SortSpec`], or by handing both records to a delegate function. It never
//! fails: missing records compare equal, one-sided missing values sort last,
//! and values with no common ordering go through an [`ErrorPolicy`].

use crate::error::{CompareError, SortResult};
use crate::sort_spec::{SortOrder, SortSpec};
use crate::stable_sort::stable_sort_by;
use crate::value::{FieldValue, Record};
use std::borrow::Cow;
use std::cmp::Ordering;
use std::fmt;

/// Resolves a sort item into its field-bag.
///
/// Returning `None` means the item has no record (for example it vanished
/// from the backing store since the list was built); such pairs compare
/// equal. Any caching belongs in the implementor.
pub trait RecordSource<T: ?Sized> {
    fn record_of<'a>(&'a self, item: &'a T) -> Option<&'a Record>;
}

/// Source for items that are their own records
#[derive(Debug, Clone, Copy, Default)]
pub struct Records;

impl RecordSource<Record> for Records {
    fn record_of<'a>(&'a self, item: &'a Record) -> Option<&'a Record> {
        Some(item)
    }
}

impl RecordSource<Option<Record>> for Records {
    fn record_of<'a>(&'a self, item: &'a Option<Record>) -> Option<&'a Record> {
        item.as_ref()
    }
}

impl RecordSource<usize> for [Record] {
    fn record_of<'a>(&'a self, item: &'a usize) -> Option<&'a Record> {
        self.get(*item)
    }
}

impl RecordSource<usize> for Vec<Record> {
    fn record_of<'a>(&'a self, item: &'a usize) -> Option<&'a Record> {
        self.get(*item)
    }
}

/// Rewrites a field value before it is compared
pub trait FieldTransform {
    fn transform<'a>(
        &self,
        field: &str,
        record: &'a Record,
        value: &'a FieldValue,
    ) -> Cow<'a, FieldValue>;
}

/// Leaves every value as is
#[derive(Debug, Clone, Copy, Default)]
pub struct Identity;

impl FieldTransform for Identity {
    fn transform<'a>(
        &self,
        _field: &str,
        _record: &'a Record,
        value: &'a FieldValue,
    ) -> Cow<'a, FieldValue> {
        Cow::Borrowed(value)
    }
}

/// Decides the ordering of two values whose natural comparison failed.
///
/// `lhs` and `rhs` are the untransformed values of the left and right record.
/// The error describes the comparison actually attempted, which has its
/// operands swapped when the field sorts descending.
pub trait ErrorPolicy {
    fn report(
        &mut self,
        field: &str,
        lhs: &FieldValue,
        rhs: &FieldValue,
        error: &CompareError,
    ) -> Ordering;
}

/// Logs each distinct failure once and treats the pair as equal.
///
/// A failure identical to the last reported one is swallowed, so a sort
/// over thousands of rows with one bad column logs a single line.
#[derive(Debug, Default)]
pub struct LogOnce {
    last: Option<CompareError>,
    reported: usize,
}

impl LogOnce {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn last_error(&self) -> Option<&CompareError> {
        self.last.as_ref()
    }

    /// Number of failures that were logged
    pub fn reported(&self) -> usize {
        self.reported
    }

    pub fn reset(&mut self) {
        self.last = None;
    }
}

impl ErrorPolicy for LogOnce {
    fn report(
        &mut self,
        field: &str,
        lhs: &FieldValue,
        rhs: &FieldValue,
        error: &CompareError,
    ) -> Ordering {
        if self.last.as_ref() == Some(error) {
            return Ordering::Equal;
        }
        log::error!(
            target: "recsort::compare",
            "field {field}: {error} ({lhs} vs {rhs})"
        );
        self.last = Some(error.clone());
        self.reported += 1;
        Ordering::Equal
    }
}

/// Treats every failed comparison as equal without logging
#[derive(Debug, Clone, Copy, Default)]
pub struct Silent;

impl ErrorPolicy for Silent {
    fn report(&mut self, _: &str, _: &FieldValue, _: &FieldValue, _: &CompareError) -> Ordering {
        Ordering::Equal
    }
}

type Delegate = Box<dyn FnMut(&Record, &Record) -> Ordering>;

enum Mode {
    Unset,
    Fields(SortSpec),
    Delegate(Delegate),
}

/// Orders sort items by their records.
///
/// One instance serves one sort pass at a time: comparisons take `&mut self`
/// because the error policy and the delegate carry state.
pub struct RecordComparator {
    mode: Mode,
    transform: Box<dyn FieldTransform>,
    error_policy: Box<dyn ErrorPolicy>,
}

impl Default for RecordComparator {
    fn default() -> Self {
        Self {
            mode: Mode::Unset,
            transform: Box::new(Identity),
            error_policy: Box::new(LogOnce::new()),
        }
    }
}

impl RecordComparator {
    /// Unconfigured comparator; reports every pair as equal until a mode is set
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_sort_fields(spec: SortSpec) -> Self {
        let mut comparator = Self::new();
        comparator.set_sort_fields(spec);
        comparator
    }

    /// Field-list mode from parallel key and ascending-flag arrays
    pub fn from_parallel<S: AsRef<str>>(fields: &[S], ascending: &[bool]) -> SortResult<Self> {
        Ok(Self::with_sort_fields(SortSpec::from_parallel(fields, ascending)?))
    }

    pub fn with_delegate<F>(delegate: F) -> Self
    where
        F: FnMut(&Record, &Record) -> Ordering + 'static,
    {
        let mut comparator = Self::new();
        comparator.set_delegate(delegate);
        comparator
    }

    pub fn with_transform<X: FieldTransform + 'static>(mut self, transform: X) -> Self {
        self.set_transform(transform);
        self
    }

    pub fn with_error_policy<P: ErrorPolicy + 'static>(mut self, policy: P) -> Self {
        self.set_error_policy(policy);
        self
    }

    /// Switch to field-list mode, dropping any delegate
    pub fn set_sort_fields(&mut self, spec: SortSpec) {
        self.mode = Mode::Fields(spec);
    }

    /// Switch to delegate mode, dropping any field list
    pub fn set_delegate<F>(&mut self, delegate: F)
    where
        F: FnMut(&Record, &Record) -> Ordering + 'static,
    {
        self.mode = Mode::Delegate(Box::new(delegate));
    }

    pub fn set_transform<X: FieldTransform + 'static>(&mut self, transform: X) {
        self.transform = Box::new(transform);
    }

    pub fn set_error_policy<P: ErrorPolicy + 'static>(&mut self, policy: P) {
        self.error_policy = Box::new(policy);
    }

    /// True once either a field list or a delegate is configured
    pub fn is_valid(&self) -> bool {
        !matches!(self.mode, Mode::Unset)
    }

    pub fn sort_spec(&self) -> Option<&SortSpec> {
        match &self.mode {
            Mode::Fields(spec) => Some(spec),
            _ => None,
        }
    }

    pub fn has_delegate(&self) -> bool {
        matches!(self.mode, Mode::Delegate(_))
    }

    /// Compare two sort items
    pub fn compare<T, S>(&mut self, source: &S, lhs: &T, rhs: &T) -> Ordering
    where
        T: ?Sized,
        S: RecordSource<T> + ?Sized,
    {
        let (Some(left), Some(right)) = (source.record_of(lhs), source.record_of(rhs)) else {
            return Ordering::Equal;
        };
        self.compare_records(left, right)
    }

    /// Compare two already resolved records
    pub fn compare_records(&mut self, left: &Record, right: &Record) -> Ordering {
        let Self {
            mode,
            transform,
            error_policy,
        } = self;

        match mode {
            Mode::Unset => Ordering::Equal,
            Mode::Delegate(delegate) => delegate(left, right),
            Mode::Fields(spec) => compare_fields(
                spec,
                &**transform,
                &mut **error_policy,
                left,
                right,
            ),
        }
    }

    /// Stable sort of `items`. Does nothing when the comparator is invalid.
    pub fn sort<T, S>(&mut self, source: &S, items: &mut [T])
    where
        S: RecordSource<T> + ?Sized,
    {
        if !self.is_valid() {
            log::debug!("skipping sort of {} items: no sort configured", items.len());
            return;
        }
        log::debug!("sorting {} items by {}", items.len(), self);
        stable_sort_by(items, |a, b| self.compare(source, a, b));
    }

    /// Position of the first item that sorts before its predecessor
    pub fn first_disorder<T, S>(&mut self, source: &S, items: &[T]) -> Option<usize>
    where
        S: RecordSource<T> + ?Sized,
    {
        items
            .windows(2)
            .position(|pair| self.compare(source, &pair[0], &pair[1]) == Ordering::Greater)
            .map(|i| i + 1)
    }
}

impl fmt::Display for RecordComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.mode {
            Mode::Unset => write!(f, "<unset>"),
            Mode::Fields(spec) => write!(f, "{spec}"),
            Mode::Delegate(_) => write!(f, "<delegate>"),
        }
    }
}

impl fmt::Debug for RecordComparator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RecordComparator")
            .field("mode", &self.to_string())
            .finish_non_exhaustive()
    }
}

fn compare_fields(
    spec: &SortSpec,
    transform: &dyn FieldTransform,
    error_policy: &mut dyn ErrorPolicy,
    left: &Record,
    right: &Record,
) -> Ordering {
    for key in spec.keys() {
        let ordering = match (left.get(&key.field), right.get(&key.field)) {
            (None, None) => continue,
            // A value sorts before a missing one in either direction
            (Some(_), None) => return Ordering::Less,
            (None, Some(_)) => return Ordering::Greater,
            (Some(lhs), Some(rhs)) => {
                let l = transform.transform(&key.field, left, lhs);
                let r = transform.transform(&key.field, right, rhs);
                match compare_values(&l, &r, key.order) {
                    Ok(ordering) => ordering,
                    Err(error) => error_policy.report(&key.field, lhs, rhs, &error),
                }
            }
        };

        if ordering != Ordering::Equal {
            return ordering;
        }
    }

    Ordering::Equal
}

/// Compare two present values. Descending swaps the operands instead of
/// negating the result.
fn compare_values(
    lhs: &FieldValue,
    rhs: &FieldValue,
    order: SortOrder,
) -> Result<Ordering, CompareError> {
    let (a, b) = match order {
        SortOrder::Ascending => (lhs, rhs),
        SortOrder::Descending => (rhs, lhs),
    };

    match (a, b) {
        (FieldValue::Text(x), FieldValue::Text(y)) => Ok(compare_ignore_case(x, y)),
        (FieldValue::Integer(x), FieldValue::Integer(y)) => Ok(compare_integers(*x, *y)),
        (FieldValue::Float(_), _) | (_, FieldValue::Float(_))
            if a.is_numeric() && b.is_numeric() =>
        {
            match (a.as_f64(), b.as_f64()) {
                (Some(x), Some(y)) => Ok(compare_floats(x, y)),
                _ => Err(CompareError::incompatible(a.kind_name(), b.kind_name())),
            }
        }
        _ => natural_order(a, b),
    }
}

fn natural_order(a: &FieldValue, b: &FieldValue) -> Result<Ordering, CompareError> {
    match (a, b) {
        (FieldValue::Bool(x), FieldValue::Bool(y)) => Ok(x.cmp(y)),
        (FieldValue::Other(x), FieldValue::Other(y)) => x.try_compare(&**y),
        _ => Err(CompareError::incompatible(a.kind_name(), b.kind_name())),
    }
}

/// Case-insensitive lexical comparison, folding each char to upper and then
/// lower case
pub fn compare_ignore_case(a: &str, b: &str) -> Ordering {
    if a.is_ascii() && b.is_ascii() {
        return a
            .bytes()
            .map(|c| c.to_ascii_lowercase())
            .cmp(b.bytes().map(|c| c.to_ascii_lowercase()));
    }
    a.chars().map(fold_case).cmp(b.chars().map(fold_case))
}

fn fold_case(c: char) -> char {
    let mut upper = c.to_uppercase();
    let u = match (upper.next(), upper.next()) {
        (Some(u), None) => u,
        _ => c,
    };
    let mut lower = u.to_lowercase();
    match (lower.next(), lower.next()) {
        (Some(l), None) => l,
        _ => u,
    }
}

/// Three-way integer comparison without subtraction
fn compare_integers(a: i64, b: i64) -> Ordering {
    if a > b {
        Ordering::Greater
    } else if a == b {
        Ordering::Equal
    } else {
        Ordering::Less
    }
}

/// Total order on doubles: -0.0 before 0.0, NaN after everything and equal
/// to itself
fn compare_floats(a: f64, b: f64) -> Ordering {
    match a.partial_cmp(&b) {
        Some(Ordering::Equal) => a.is_sign_positive().cmp(&b.is_sign_positive()),
        Some(ordering) => ordering,
        None => a.is_nan().cmp(&b.is_nan()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sort_spec::SortKey;
    use std::any::Any;
    use std::cell::RefCell;
    use std::rc::Rc;

    fn record(size: i64, name: &str) -> Record {
        Record::new().with("size", size).with("name", name)
    }

    fn names(records: &[Record]) -> Vec<&str> {
        records
            .iter()
            .map(|r| r.get("name").and_then(FieldValue::as_str).unwrap_or(""))
            .collect()
    }

    /// Records every report and answers with a fixed ordering
    struct Recording {
        calls: Rc<RefCell<Vec<(String, CompareError)>>>,
        answer: Ordering,
    }

    impl ErrorPolicy for Recording {
        fn report(
            &mut self,
            field: &str,
            _lhs: &FieldValue,
            _rhs: &FieldValue,
            error: &CompareError,
        ) -> Ordering {
            self.calls.borrow_mut().push((field.to_string(), error.clone()));
            self.answer
        }
    }

    #[derive(Debug)]
    struct Version(u32, u32);

    impl crate::value::OpaqueValue for Version {
        fn type_name(&self) -> &str {
            "version"
        }

        fn as_any(&self) -> &dyn Any {
            self
        }

        fn try_compare(
            &self,
            other: &dyn crate::value::OpaqueValue,
        ) -> Result<Ordering, CompareError> {
            match other.as_any().downcast_ref::<Version>() {
                Some(v) => Ok((self.0, self.1).cmp(&(v.0, v.1))),
                None => Err(CompareError::incompatible("version", other.type_name())),
            }
        }
    }

    #[test]
    fn test_example_order() {
        let mut comparator = RecordComparator::from_parallel(&["size", "name"], &[false, true])
            .expect("Failed to build comparator");
        let mut records = vec![record(100, "b"), record(100, "a"), record(200, "z")];
        comparator.sort(&Records, &mut records);
        assert_eq!(names(&records), vec!["z", "a", "b"]);
    }

    #[test]
    fn test_reflexive() {
        let mut comparator = RecordComparator::from_parallel(&["size", "name"], &[true, false])
            .expect("Failed to build comparator");
        let r = record(5, "x").with("other", FieldValue::Float(f64::NAN));
        assert_eq!(comparator.compare(&Records, &r, &r), Ordering::Equal);
    }

    #[test]
    fn test_missing_value_sorts_last_in_both_directions() {
        let with = Record::new().with("eta", 30);
        let without = Record::new();
        for ascending in [true, false] {
            let mut comparator = RecordComparator::from_parallel(&["eta"], &[ascending])
                .expect("Failed to build comparator");
            assert_eq!(comparator.compare(&Records, &with, &without), Ordering::Less);
            assert_eq!(comparator.compare(&Records, &without, &with), Ordering::Greater);
        }
    }

    #[test]
    fn test_missing_value_stops_tie_break() {
        let mut comparator = RecordComparator::from_parallel(&["eta", "name"], &[true, true])
            .expect("Failed to build comparator");
        let a = Record::new().with("name", "z");
        let b = Record::new().with("eta", 1).with("name", "a");
        assert_eq!(comparator.compare(&Records, &b, &a), Ordering::Less);

        let c = Record::new().with("name", "a");
        assert_eq!(comparator.compare(&Records, &c, &a), Ordering::Less);
    }

    #[test]
    fn test_direction_flips_order() {
        let small = record(1, "a");
        let large = record(2, "b");
        let mut asc = RecordComparator::with_sort_fields(SortSpec::new(vec![SortKey::ascending("size")]));
        let mut desc = RecordComparator::with_sort_fields(SortSpec::new(vec![SortKey::descending("size")]));
        assert_eq!(asc.compare(&Records, &small, &large), Ordering::Less);
        assert_eq!(desc.compare(&Records, &small, &large), Ordering::Greater);
    }

    #[test]
    fn test_tie_break_chain() {
        let mut comparator = RecordComparator::from_parallel(&["f1", "f2"], &[true, false])
            .expect("Failed to build comparator");
        let a = Record::new().with("f1", 1).with("f2", 1);
        let b = Record::new().with("f1", 1).with("f2", 2);
        let c = Record::new().with("f1", 0).with("f2", 0);
        assert_eq!(comparator.compare(&Records, &a, &b), Ordering::Greater);
        assert_eq!(comparator.compare(&Records, &c, &b), Ordering::Less);
        assert_eq!(comparator.compare(&Records, &c, &a), Ordering::Less);
    }

    #[test]
    fn test_text_is_case_insensitive() {
        let mut comparator = RecordComparator::from_parallel(&["name"], &[true])
            .expect("Failed to build comparator");
        let upper = Record::new().with("name", "ABC");
        let lower = Record::new().with("name", "abd");
        let same = Record::new().with("name", "abc");
        assert_eq!(comparator.compare(&Records, &upper, &lower), Ordering::Less);
        assert_eq!(comparator.compare(&Records, &upper, &same), Ordering::Equal);
        assert_eq!(compare_ignore_case("Äpfel", "äPFEL"), Ordering::Equal);
        assert_eq!(compare_ignore_case("ab", "abc"), Ordering::Less);
    }

    #[test]
    fn test_type_mismatch_is_safe_and_repeatable() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut comparator = RecordComparator::from_parallel(&["f"], &[true])
            .expect("Failed to build comparator")
            .with_error_policy(Recording {
                calls: Rc::clone(&calls),
                answer: Ordering::Equal,
            });
        let text = Record::new().with("f", "10");
        let number = Record::new().with("f", 10);
        assert_eq!(comparator.compare(&Records, &text, &number), Ordering::Equal);
        assert_eq!(comparator.compare(&Records, &text, &number), Ordering::Equal);
        assert_eq!(calls.borrow().len(), 2);
        assert_eq!(calls.borrow()[0].1, CompareError::incompatible("text", "integer"));
    }

    #[test]
    fn test_policy_result_used_and_descending_swaps_error_operands() {
        let calls = Rc::new(RefCell::new(Vec::new()));
        let mut comparator = RecordComparator::from_parallel(&["f"], &[false])
            .expect("Failed to build comparator")
            .with_error_policy(Recording {
                calls: Rc::clone(&calls),
                answer: Ordering::Less,
            });
        let text = Record::new().with("f", "x");
        let flag = Record::new().with("f", true);
        assert_eq!(comparator.compare(&Records, &text, &flag), Ordering::Less);
        assert_eq!(calls.borrow()[0], ("f".to_string(), CompareError::incompatible("bool", "text")));
    }

    #[test]
    fn test_log_once_deduplicates() {
        let mut policy = LogOnce::new();
        let a = FieldValue::from("a");
        let b = FieldValue::from(1);
        let err = CompareError::incompatible("text", "integer");
        assert_eq!(policy.report("f", &a, &b, &err), Ordering::Equal);
        assert_eq!(policy.report("f", &a, &b, &err), Ordering::Equal);
        assert_eq!(policy.reported(), 1);

        let other = CompareError::incompatible("integer", "text");
        policy.report("f", &b, &a, &other);
        assert_eq!(policy.reported(), 2);
        assert_eq!(policy.last_error(), Some(&other));

        policy.reset();
        policy.report("f", &b, &a, &other);
        assert_eq!(policy.reported(), 3);
    }

    #[test]
    fn test_null_extraction_is_equal() {
        let mut comparator = RecordComparator::from_parallel(&["size"], &[true])
            .expect("Failed to build comparator");
        let some = Some(record(1, "a"));
        let none: Option<Record> = None;
        assert_eq!(comparator.compare(&Records, &some, &none), Ordering::Equal);
        assert_eq!(comparator.compare(&Records, &none, &some), Ordering::Equal);

        let table = vec![record(1, "a")];
        assert_eq!(comparator.compare(&table, &0usize, &7usize), Ordering::Equal);
    }

    #[test]
    fn test_delegate_not_called_for_missing_record() {
        let calls = Rc::new(RefCell::new(0));
        let counter = Rc::clone(&calls);
        let mut comparator = RecordComparator::with_delegate(move |a, b| {
            *counter.borrow_mut() += 1;
            let size = |r: &Record| r.get("size").and_then(FieldValue::as_i64);
            size(a).cmp(&size(b))
        });
        let some = Some(record(1, "a"));
        let none: Option<Record> = None;
        assert_eq!(comparator.compare(&Records, &some, &none), Ordering::Equal);
        assert_eq!(*calls.borrow(), 0);

        let other = Some(record(2, "b"));
        assert_eq!(comparator.compare(&Records, &some, &other), Ordering::Less);
        assert_eq!(*calls.borrow(), 1);
    }

    #[test]
    fn test_integer_extremes() {
        let mut comparator = RecordComparator::from_parallel(&["n"], &[true])
            .expect("Failed to build comparator");
        let max = Record::new().with("n", i64::MAX);
        let below = Record::new().with("n", i64::MAX - 1);
        let min = Record::new().with("n", i64::MIN);
        assert_eq!(comparator.compare(&Records, &max, &below), Ordering::Greater);
        assert_eq!(comparator.compare(&Records, &min, &max), Ordering::Less);
        assert_eq!(comparator.compare(&Records, &max, &min), Ordering::Greater);
    }

    #[test]
    fn test_mixed_numbers_compare_as_floats() {
        let mut comparator = RecordComparator::from_parallel(&["n"], &[true])
            .expect("Failed to build comparator");
        let int = Record::new().with("n", 2);
        let float = Record::new().with("n", 2.5);
        let nan = Record::new().with("n", f64::NAN);
        assert_eq!(comparator.compare(&Records, &int, &float), Ordering::Less);
        assert_eq!(comparator.compare(&Records, &nan, &float), Ordering::Greater);
        assert_eq!(comparator.compare(&Records, &nan, &nan), Ordering::Equal);
        assert_eq!(compare_floats(-0.0, 0.0), Ordering::Less);
    }

    #[test]
    fn test_opaque_and_bool_values() {
        let mut comparator = RecordComparator::from_parallel(&["v", "done"], &[true, true])
            .expect("Failed to build comparator")
            .with_error_policy(Silent);
        let old = Record::new().with("v", FieldValue::other(Version(1, 9))).with("done", true);
        let new = Record::new().with("v", FieldValue::other(Version(1, 10))).with("done", false);
        assert_eq!(comparator.compare(&Records, &old, &new), Ordering::Less);

        let same_v = Record::new().with("v", FieldValue::other(Version(1, 9))).with("done", false);
        assert_eq!(comparator.compare(&Records, &old, &same_v), Ordering::Greater);

        let text_v = Record::new().with("v", "1.9").with("done", true);
        assert_eq!(comparator.compare(&Records, &old, &text_v), Ordering::Equal);
    }

    struct Basename;

    impl FieldTransform for Basename {
        fn transform<'a>(
            &self,
            field: &str,
            _record: &'a Record,
            value: &'a FieldValue,
        ) -> Cow<'a, FieldValue> {
            match (field, value) {
                ("path", FieldValue::Text(path)) => {
                    let base = path.rsplit('/').next().unwrap_or(path);
                    Cow::Owned(FieldValue::from(base))
                }
                _ => Cow::Borrowed(value),
            }
        }
    }

    #[test]
    fn test_transform_applies_before_dispatch() {
        let mut comparator = RecordComparator::from_parallel(&["path"], &[true])
            .expect("Failed to build comparator")
            .with_transform(Basename);
        let a = Record::new().with("path", "z/a.txt");
        let b = Record::new().with("path", "a/b.txt");
        assert_eq!(comparator.compare(&Records, &a, &b), Ordering::Less);
    }

    #[test]
    fn test_mode_exclusivity() {
        let mut comparator = RecordComparator::new();
        assert!(!comparator.is_valid());
        assert_eq!(
            comparator.compare(&Records, &record(1, "a"), &record(2, "b")),
            Ordering::Equal
        );

        comparator.set_sort_fields(SortSpec::new(vec![SortKey::ascending("size")]));
        assert!(comparator.is_valid());
        assert!(comparator.sort_spec().is_some());

        comparator.set_delegate(|_, _| Ordering::Greater);
        assert!(comparator.is_valid());
        assert!(comparator.sort_spec().is_none());
        assert!(comparator.has_delegate());
        assert_eq!(comparator.to_string(), "<delegate>");

        comparator.set_sort_fields(SortSpec::new(vec![SortKey::descending("size")]));
        assert!(!comparator.has_delegate());
        assert_eq!(comparator.to_string(), "size desc");
    }

    #[test]
    fn test_invalid_comparator_sort_is_noop() {
        let mut comparator = RecordComparator::new();
        let mut records = vec![record(2, "b"), record(1, "a")];
        comparator.sort(&Records, &mut records);
        assert_eq!(names(&records), vec!["b", "a"]);
    }

    #[test]
    fn test_sort_by_index_source() {
        let table = vec![record(3, "c"), record(1, "a"), record(2, "b")];
        let mut order: Vec<usize> = vec![0, 1, 2];
        let mut comparator = RecordComparator::from_parallel(&["size"], &[true])
            .expect("Failed to build comparator");
        comparator.sort(table.as_slice(), &mut order);
        assert_eq!(order, vec![1, 2, 0]);
        assert_eq!(comparator.first_disorder(table.as_slice(), &order), None);
        assert_eq!(comparator.first_disorder(table.as_slice(), &[0usize, 1, 2]), Some(1));
    }
}
