use std::fmt;
use std::ops::Index;

use rustc_hash::FxHashMap;

use crate::error::ContractViolation;

const NULL: () = ();

/// Payload of [`JsonValue::Object`]. Unordered; inserting an existing key replaces its value.
pub type JsonObject = FxHashMap<String, JsonValue>;

/// Payload of [`JsonValue::Array`].
pub type JsonArray = Vec<JsonValue>;

/// The tag of a [`JsonValue`], without its payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JsonType {
    Object,
    Array,
    String,
    Number,
    Boolean,
    Null,
}

impl fmt::Display for JsonType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            JsonType::Object => "Object",
            JsonType::Array => "Array",
            JsonType::String => "String",
            JsonType::Number => "Number",
            JsonType::Boolean => "Boolean",
            JsonType::Null => "Null",
        })
    }
}

/// A node of a parsed JSON document. Containers own their children.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum JsonValue {
    Object(JsonObject),
    Array(JsonArray),
    String(String),
    Number(f64),
    Boolean(bool),
    #[default]
    Null,
}

/// Payload types that can be borrowed out of a [`JsonValue`] by tag.
pub trait InnerAsRef {
    /// The tag whose payload this type is.
    const TYPE: JsonType;

    fn json_value_as(v: &JsonValue) -> Option<&Self>;
}

macro_rules! impl_inner_ref {
    ($to:ty, $tag:ident, $pat:pat => $val:expr) => {
        impl InnerAsRef for $to {
            const TYPE: JsonType = JsonType::$tag;

            fn json_value_as(v: &JsonValue) -> Option<&$to> {
                use JsonValue::*;
                match v {
                    $pat => Some($val),
                    _ => None,
                }
            }
        }
    };
}

impl_inner_ref!(f64, Number, Number(n) => n);
impl_inner_ref!(bool, Boolean, Boolean(b) => b);
impl_inner_ref!(String, String, String(s) => s);
impl_inner_ref!((), Null, Null => &NULL);
impl_inner_ref!(JsonArray, Array, Array(a) => a);
impl_inner_ref!(JsonObject, Object, Object(o) => o);

/// Payload types that can be mutably borrowed out of a [`JsonValue`]. Null has nothing to mutate.
pub trait InnerAsRefMut: InnerAsRef {
    fn json_value_as_mut(v: &mut JsonValue) -> Option<&mut Self>;
}

macro_rules! impl_inner_ref_mut {
    ($to:ty, $pat:pat => $val:expr) => {
        impl InnerAsRefMut for $to {
            fn json_value_as_mut(v: &mut JsonValue) -> Option<&mut $to> {
                use JsonValue::*;
                match v {
                    $pat => Some($val),
                    _ => None,
                }
            }
        }
    };
}

impl_inner_ref_mut!(f64, Number(n) => n);
impl_inner_ref_mut!(bool, Boolean(b) => b);
impl_inner_ref_mut!(String, String(s) => s);
impl_inner_ref_mut!(JsonArray, Array(a) => a);
impl_inner_ref_mut!(JsonObject, Object(o) => o);

macro_rules! is_xxx {
    ($name:ident, $variant:pat) => {
        pub fn $name(&self) -> bool {
            matches!(self, $variant)
        }
    };
}

#[cold]
#[track_caller]
fn violated(violation: ContractViolation) -> ! {
    panic!("{violation}")
}

impl JsonValue {
    /// An empty value of the given type: `{}`, `[]`, `""`, `0.0`, `false` or null.
    pub fn new(ty: JsonType) -> Self {
        match ty {
            JsonType::Object => JsonValue::Object(JsonObject::default()),
            JsonType::Array => JsonValue::Array(JsonArray::new()),
            JsonType::String => JsonValue::String(String::new()),
            JsonType::Number => JsonValue::Number(0.0),
            JsonType::Boolean => JsonValue::Boolean(false),
            JsonType::Null => JsonValue::Null,
        }
    }

    pub fn value_type(&self) -> JsonType {
        match self {
            JsonValue::Object(_) => JsonType::Object,
            JsonValue::Array(_) => JsonType::Array,
            JsonValue::String(_) => JsonType::String,
            JsonValue::Number(_) => JsonType::Number,
            JsonValue::Boolean(_) => JsonType::Boolean,
            JsonValue::Null => JsonType::Null,
        }
    }

    /// Whether the payload is a `T`.
    pub fn is<T: InnerAsRef>(&self) -> bool {
        self.value_type() == T::TYPE
    }

    pub fn get<T: InnerAsRef>(&self) -> Option<&T> {
        T::json_value_as(self)
    }

    pub fn get_mut<T: InnerAsRefMut>(&mut self) -> Option<&mut T> {
        T::json_value_as_mut(self)
    }

    pub fn try_view<T: InnerAsRef>(&self) -> Result<&T, ContractViolation> {
        T::json_value_as(self).ok_or(ContractViolation::UnexpectedType {
            expected: T::TYPE,
            found: self.value_type(),
        })
    }

    /// Borrows the payload as a `T`.
    ///
    /// # Panics
    ///
    /// If the value is not tagged with `T`'s type.
    #[track_caller]
    pub fn view<T: InnerAsRef>(&self) -> &T {
        match self.try_view() {
            Ok(v) => v,
            Err(violation) => violated(violation),
        }
    }

    /// Mutably borrows the payload as a `T`.
    ///
    /// # Panics
    ///
    /// If the value is not tagged with `T`'s type.
    #[track_caller]
    pub fn view_mut<T: InnerAsRefMut>(&mut self) -> &mut T {
        let found = self.value_type();
        match T::json_value_as_mut(self) {
            Some(v) => v,
            None => violated(ContractViolation::UnexpectedType {
                expected: T::TYPE,
                found,
            }),
        }
    }

    /// Number of members, elements or characters. Scalars other than strings have no length.
    ///
    /// A string's length is counted in Unicode scalar values, not bytes: `"h\u{e9}"` has length 2.
    pub fn try_len(&self) -> Result<usize, ContractViolation> {
        match self {
            JsonValue::Object(o) => Ok(o.len()),
            JsonValue::Array(a) => Ok(a.len()),
            JsonValue::String(s) => Ok(s.chars().count()),
            v => Err(ContractViolation::NotSized(v.value_type())),
        }
    }

    /// Like [`JsonValue::try_len`]; strings count `char`s, not bytes.
    ///
    /// # Panics
    ///
    /// On Number, Boolean and Null values.
    #[track_caller]
    pub fn len(&self) -> usize {
        match self.try_len() {
            Ok(len) => len,
            Err(violation) => violated(violation),
        }
    }

    #[track_caller]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn try_at(&self, index: usize) -> Result<&JsonValue, ContractViolation> {
        let array = match self {
            JsonValue::Array(a) => a,
            v => {
                return Err(ContractViolation::WrongContainer {
                    found: v.value_type(),
                    by: "position",
                })
            }
        };
        array.get(index).ok_or(ContractViolation::IndexOutOfRange {
            index,
            len: array.len(),
        })
    }

    /// The array element at `index`.
    ///
    /// # Panics
    ///
    /// If this is not an array or `index` is out of range.
    #[track_caller]
    pub fn at(&self, index: usize) -> &JsonValue {
        match self.try_at(index) {
            Ok(v) => v,
            Err(violation) => violated(violation),
        }
    }

    pub fn try_at_key(&self, key: &str) -> Result<Option<&JsonValue>, ContractViolation> {
        match self {
            JsonValue::Object(o) => Ok(o.get(key)),
            v => Err(ContractViolation::WrongContainer {
                found: v.value_type(),
                by: "key",
            }),
        }
    }

    /// The object member named `key`, or `None` if there is no such member.
    ///
    /// # Panics
    ///
    /// If this is not an object.
    #[track_caller]
    pub fn at_key(&self, key: &str) -> Option<&JsonValue> {
        match self.try_at_key(key) {
            Ok(v) => v,
            Err(violation) => violated(violation),
        }
    }

    is_xxx!(is_bool, JsonValue::Boolean(_));
    is_xxx!(is_number, JsonValue::Number(_));
    is_xxx!(is_string, JsonValue::String(_));
    is_xxx!(is_null, JsonValue::Null);
    is_xxx!(is_array, JsonValue::Array(_));
    is_xxx!(is_object, JsonValue::Object(_));
}

impl fmt::Display for JsonValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            JsonValue::Object(o) => write!(f, "{} of length {}", JsonType::Object, o.len()),
            JsonValue::Array(a) => write!(f, "{} of length {}", JsonType::Array, a.len()),
            JsonValue::String(s) => f.write_str(s),
            JsonValue::Number(n) => write!(f, "{n:.6}"),
            JsonValue::Boolean(b) => write!(f, "{b}"),
            JsonValue::Null => write!(f, "{}", JsonType::Null),
        }
    }
}

impl Index<usize> for JsonValue {
    type Output = JsonValue;

    fn index(&self, index: usize) -> &Self::Output {
        self.at(index)
    }
}

impl<'a> Index<&'a str> for JsonValue {
    type Output = JsonValue;

    fn index(&self, key: &'a str) -> &Self::Output {
        match self.at_key(key) {
            Some(v) => v,
            None => panic!("key '{key}' was not found in {self}"),
        }
    }
}

macro_rules! impl_try_from {
    ($ty:ty, $tag:ident, $pat:pat => $val:expr) => {
        impl TryFrom<JsonValue> for $ty {
            type Error = ContractViolation;

            fn try_from(v: JsonValue) -> Result<$ty, ContractViolation> {
                match v {
                    $pat => Ok($val),
                    v => Err(ContractViolation::UnexpectedType {
                        expected: JsonType::$tag,
                        found: v.value_type(),
                    }),
                }
            }
        }
    };
}

impl_try_from!(f64, Number, JsonValue::Number(n) => n);
impl_try_from!(bool, Boolean, JsonValue::Boolean(b) => b);
impl_try_from!(String, String, JsonValue::String(s) => s);
impl_try_from!((), Null, JsonValue::Null => ());
impl_try_from!(JsonArray, Array, JsonValue::Array(a) => a);
impl_try_from!(JsonObject, Object, JsonValue::Object(o) => o);

macro_rules! impl_from {
    ($from:ty, $v:ident => $val:expr) => {
        impl From<$from> for JsonValue {
            fn from($v: $from) -> Self {
                $val
            }
        }
    };
}

impl_from!(f64, n => JsonValue::Number(n));
impl_from!(bool, b => JsonValue::Boolean(b));
impl_from!(String, s => JsonValue::String(s));
impl_from!(&str, s => JsonValue::String(s.to_owned()));
impl_from!(JsonArray, a => JsonValue::Array(a));
impl_from!(JsonObject, o => JsonValue::Object(o));

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_object() -> JsonValue {
        let mut o = JsonObject::default();
        o.insert("a".to_owned(), 1.0.into());
        o.insert(
            "b".to_owned(),
            JsonValue::Array(vec![true.into(), false.into(), JsonValue::Null]),
        );
        o.into()
    }

    #[test]
    fn new_allocates_empty_payloads() {
        assert_eq!(JsonValue::new(JsonType::Object).len(), 0);
        assert_eq!(JsonValue::new(JsonType::Array).len(), 0);
        assert_eq!(JsonValue::new(JsonType::String).len(), 0);
        assert_eq!(JsonValue::new(JsonType::Number), JsonValue::Number(0.0));
        assert_eq!(JsonValue::new(JsonType::Boolean), JsonValue::Boolean(false));
        assert_eq!(JsonValue::new(JsonType::Null), JsonValue::Null);
        assert_eq!(JsonValue::default(), JsonValue::Null);
    }

    #[test]
    fn new_keeps_the_requested_tag() {
        for ty in [
            JsonType::Object,
            JsonType::Array,
            JsonType::String,
            JsonType::Number,
            JsonType::Boolean,
            JsonType::Null,
        ] {
            assert_eq!(JsonValue::new(ty).value_type(), ty);
        }
    }

    #[test]
    fn display() {
        assert_eq!(sample_object().to_string(), "Object of length 2");
        assert_eq!(
            JsonValue::Array(vec![JsonValue::Null]).to_string(),
            "Array of length 1"
        );
        assert_eq!(JsonValue::from("hi there").to_string(), "hi there");
        assert_eq!(JsonValue::from(1.5).to_string(), "1.500000");
        assert_eq!(JsonValue::from(true).to_string(), "true");
        assert_eq!(JsonValue::from(false).to_string(), "false");
        assert_eq!(JsonValue::Null.to_string(), "Null");
        assert_eq!(JsonType::Boolean.to_string(), "Boolean");
    }

    #[test]
    fn scalar_views_read_back_what_was_written() {
        let mut n = JsonValue::new(JsonType::Number);
        *n.view_mut::<f64>() = -12.25;
        assert_eq!(*n.view::<f64>(), -12.25);

        let mut b = JsonValue::new(JsonType::Boolean);
        *b.view_mut::<bool>() = true;
        assert!(*b.view::<bool>());

        let mut s = JsonValue::new(JsonType::String);
        s.view_mut::<String>().push_str("héllo");
        assert_eq!(s.view::<String>(), "héllo");

        assert_eq!(JsonValue::Null.view::<()>(), &());
    }

    #[test]
    fn checked_views() {
        let v = JsonValue::from(3.0);
        assert!(v.is::<f64>());
        assert!(!v.is::<String>());
        assert_eq!(v.get::<f64>(), Some(&3.0));
        assert_eq!(v.get::<bool>(), None);
        assert_eq!(
            v.try_view::<JsonArray>(),
            Err(ContractViolation::UnexpectedType {
                expected: JsonType::Array,
                found: JsonType::Number
            })
        );
        assert!(JsonValue::Null.is::<()>());
    }

    #[test]
    #[should_panic(expected = "expected Object value but found String")]
    fn view_with_wrong_tag_panics() {
        JsonValue::from("x").view::<JsonObject>();
    }

    #[test]
    #[should_panic(expected = "expected Number value but found Null")]
    fn view_mut_with_wrong_tag_panics() {
        JsonValue::Null.view_mut::<f64>();
    }

    #[test]
    fn string_length_counts_characters() {
        assert_eq!(JsonValue::from("añb").len(), 3);
        assert_eq!(JsonValue::from("h\u{e9}").try_len(), Ok(2));
        assert!(JsonValue::from("").is_empty());
    }

    #[test]
    fn scalars_have_no_length() {
        assert_eq!(
            JsonValue::from(1.0).try_len(),
            Err(ContractViolation::NotSized(JsonType::Number))
        );
        assert_eq!(
            JsonValue::Null.try_len(),
            Err(ContractViolation::NotSized(JsonType::Null))
        );
    }

    #[test]
    #[should_panic(expected = "cannot take the length of a Boolean value")]
    fn len_of_boolean_panics() {
        JsonValue::from(true).len();
    }

    #[test]
    fn index_by_position() {
        let v = sample_object();
        let b = v.at_key("b").unwrap();
        assert_eq!(b.at(0), &JsonValue::Boolean(true));
        assert_eq!(b[2], JsonValue::Null);
        assert_eq!(
            b.try_at(3),
            Err(ContractViolation::IndexOutOfRange { index: 3, len: 3 })
        );
        assert_eq!(
            v.try_at(0),
            Err(ContractViolation::WrongContainer {
                found: JsonType::Object,
                by: "position"
            })
        );
    }

    #[test]
    #[should_panic(expected = "index 5 out of range for array of length 0")]
    fn index_out_of_range_panics() {
        JsonValue::new(JsonType::Array).at(5);
    }

    #[test]
    fn index_by_key_reports_absence() {
        let v = sample_object();
        assert_eq!(v.at_key("a"), Some(&JsonValue::Number(1.0)));
        assert_eq!(v.at_key("missing"), None);
        assert_eq!(v["a"], JsonValue::Number(1.0));
        assert_eq!(
            JsonValue::from(1.0).try_at_key("a"),
            Err(ContractViolation::WrongContainer {
                found: JsonType::Number,
                by: "key"
            })
        );
    }

    #[test]
    #[should_panic(expected = "cannot index Array value by key")]
    fn index_array_by_key_panics() {
        JsonValue::new(JsonType::Array).at_key("a");
    }

    #[test]
    #[should_panic(expected = "key 'zzz' was not found in Object of length 2")]
    fn index_operator_panics_on_missing_key() {
        let _ = &sample_object()["zzz"];
    }

    #[test]
    fn try_from_moves_the_payload_out() {
        let s: String = JsonValue::from("owned").try_into().unwrap();
        assert_eq!(s, "owned");
        let a = JsonArray::try_from(JsonValue::Array(vec![JsonValue::Null])).unwrap();
        assert_eq!(a.len(), 1);
        assert_eq!(
            bool::try_from(JsonValue::Null),
            Err(ContractViolation::UnexpectedType {
                expected: JsonType::Boolean,
                found: JsonType::Null
            })
        );
        assert_eq!(<()>::try_from(JsonValue::Null), Ok(()));
    }

    #[test]
    fn predicates() {
        let v = sample_object();
        assert!(v.is_object());
        assert!(v["b"].is_array());
        assert!(v["b"][0].is_bool());
        assert!(v["b"][2].is_null());
        assert!(v["a"].is_number());
        assert!(JsonValue::from("s").is_string());
    }
}
