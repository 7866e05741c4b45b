//! Declarative field rules
//!
//! A [`Rule`] is a tagged variant describing how one value is accepted. Object
//! rules hold an ordered list of [`Field`]s, each pairing a name with a rule
//! and a presence descriptor. Rules are plain data: they are built once,
//! never mutated, and freely shared across threads.
//!
//! Copyright (c) 2025 PerkOS Team
//! Licensed under the Apache-2.0 license

use regex::Regex;
use serde_json::Value;

/// Acceptance criteria for a single value
#[derive(Debug, Clone)]
pub enum Rule {
    Text(TextRule),
    Number(NumberRule),
    Boolean,
    Enum(EnumRule),
    /// Every element must satisfy the inner rule
    List(Box<Rule>),
    Object(ObjectRule),
    /// Mapping from arbitrary string keys to values satisfying the inner rule
    Record(Box<Rule>),
    /// Ordered alternatives; the first one that accepts wins
    Union(Vec<Rule>),
    /// Any JSON value, passed through untouched
    Any,
}

impl Rule {
    pub fn boolean() -> Self {
        Self::Boolean
    }

    pub fn any() -> Self {
        Self::Any
    }

    pub fn list<R: Into<Rule>>(element: R) -> Self {
        Self::List(Box::new(element.into()))
    }

    pub fn record<R: Into<Rule>>(value: R) -> Self {
        Self::Record(Box::new(value.into()))
    }

    pub fn union<I>(alternatives: I) -> Self
    where
        I: IntoIterator<Item = Rule>,
    {
        Self::Union(alternatives.into_iter().collect())
    }

    /// Object rule backing this rule, if it is one
    pub fn as_object(&self) -> Option<&ObjectRule> {
        match self {
            Self::Object(object) => Some(object),
            _ => None,
        }
    }

    /// Short human name of the rule kind
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Text(_) => "text",
            Self::Number(rule) if rule.integer => "integer",
            Self::Number(_) => "number",
            Self::Boolean => "boolean",
            Self::Enum(_) => "enum",
            Self::List(_) => "list",
            Self::Object(_) => "object",
            Self::Record(_) => "record",
            Self::Union(_) => "union",
            Self::Any => "any",
        }
    }
}

/// Regular expression paired with the message reported on mismatch
#[derive(Debug, Clone)]
pub struct Pattern {
    pub regex: Regex,
    pub message: String,
}

/// Constraints on a text value
#[derive(Debug, Clone, Default)]
pub struct TextRule {
    pub min_length: Option<usize>,
    pub min_message: Option<String>,
    pub max_length: Option<usize>,
    pub max_message: Option<String>,
    pub pattern: Option<Pattern>,
    /// Require the text to parse as an absolute URL
    pub url: bool,
}

impl TextRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Minimum length in characters, with the message reported when unmet
    pub fn min_length<M: Into<String>>(mut self, min: usize, message: M) -> Self {
        self.min_length = Some(min);
        self.min_message = Some(message.into());
        self
    }

    /// Shorthand for a minimum length of one
    pub fn non_empty<M: Into<String>>(self, message: M) -> Self {
        self.min_length(1, message)
    }

    pub fn max_length<M: Into<String>>(mut self, max: usize, message: M) -> Self {
        self.max_length = Some(max);
        self.max_message = Some(message.into());
        self
    }

    pub fn pattern<M: Into<String>>(mut self, regex: Regex, message: M) -> Self {
        self.pattern = Some(Pattern {
            regex,
            message: message.into(),
        });
        self
    }

    pub fn url(mut self) -> Self {
        self.url = true;
        self
    }
}

impl From<TextRule> for Rule {
    fn from(rule: TextRule) -> Self {
        Self::Text(rule)
    }
}

/// One side of a numeric range
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Bound {
    pub value: f64,
    pub inclusive: bool,
}

impl Bound {
    pub fn inclusive(value: f64) -> Self {
        Self {
            value,
            inclusive: true,
        }
    }

    pub fn exclusive(value: f64) -> Self {
        Self {
            value,
            inclusive: false,
        }
    }
}

/// Constraints on a numeric value
#[derive(Debug, Clone, Default)]
pub struct NumberRule {
    /// Reject values with a fractional part
    pub integer: bool,
    pub min: Option<Bound>,
    pub max: Option<Bound>,
}

impl NumberRule {
    /// Any finite number
    pub fn decimal() -> Self {
        Self::default()
    }

    /// Whole numbers only
    pub fn integer() -> Self {
        Self {
            integer: true,
            ..Self::default()
        }
    }

    pub fn min(mut self, value: f64) -> Self {
        self.min = Some(Bound::inclusive(value));
        self
    }

    pub fn max(mut self, value: f64) -> Self {
        self.max = Some(Bound::inclusive(value));
        self
    }

    /// Strictly greater than zero
    pub fn positive(mut self) -> Self {
        self.min = Some(Bound::exclusive(0.0));
        self
    }

    /// Zero or greater
    pub fn nonnegative(mut self) -> Self {
        self.min = Some(Bound::inclusive(0.0));
        self
    }
}

impl From<NumberRule> for Rule {
    fn from(rule: NumberRule) -> Self {
        Self::Number(rule)
    }
}

/// Closed set of allowed text values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EnumRule {
    pub values: Vec<String>,
}

impl EnumRule {
    pub fn new<I, S>(values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    pub fn contains(&self, value: &str) -> bool {
        self.values.iter().any(|v| v == value)
    }
}

impl From<EnumRule> for Rule {
    fn from(rule: EnumRule) -> Self {
        Self::Enum(rule)
    }
}

/// Whether a field must be present, and what fills it in when absent
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Presence<'a> {
    Required,
    Optional,
    Defaulted(&'a Value),
}

/// A named entry of an object rule
#[derive(Debug, Clone)]
pub struct Field {
    pub name: String,
    pub rule: Rule,
    pub required: bool,
    /// Value used when the field is optional and absent. Kept while the field
    /// is required so that relaxing it again restores the default.
    pub default: Option<Value>,
}

impl Field {
    pub fn presence(&self) -> Presence<'_> {
        match (&self.default, self.required) {
            (_, true) => Presence::Required,
            (Some(default), false) => Presence::Defaulted(default),
            (None, false) => Presence::Optional,
        }
    }
}

/// Ordered mapping from field name to field rule
#[derive(Debug, Clone, Default)]
pub struct ObjectRule {
    fields: Vec<Field>,
}

impl ObjectRule {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a field that must be present
    pub fn required<N: Into<String>, R: Into<Rule>>(self, name: N, rule: R) -> Self {
        self.field(Field {
            name: name.into(),
            rule: rule.into(),
            required: true,
            default: None,
        })
    }

    /// Add a field that may be absent and is then omitted from the output
    pub fn optional<N: Into<String>, R: Into<Rule>>(self, name: N, rule: R) -> Self {
        self.field(Field {
            name: name.into(),
            rule: rule.into(),
            required: false,
            default: None,
        })
    }

    /// Add a field that is filled with `default` when absent
    pub fn defaulted<N, R, V>(self, name: N, rule: R, default: V) -> Self
    where
        N: Into<String>,
        R: Into<Rule>,
        V: Into<Value>,
    {
        self.field(Field {
            name: name.into(),
            rule: rule.into(),
            required: false,
            default: Some(default.into()),
        })
    }

    /// Add a field, replacing any earlier field of the same name in place
    pub fn field(mut self, field: Field) -> Self {
        match self.fields.iter_mut().find(|f| f.name == field.name) {
            Some(existing) => *existing = field,
            None => self.fields.push(field),
        }
        self
    }

    pub fn fields(&self) -> &[Field] {
        &self.fields
    }

    pub fn get(&self, name: &str) -> Option<&Field> {
        self.fields.iter().find(|f| f.name == name)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Names of the fields that must be present
    pub fn required_fields(&self) -> impl Iterator<Item = &str> {
        self.fields
            .iter()
            .filter(|f| f.required)
            .map(|f| f.name.as_str())
    }

    /// Copy of this rule with every field optional; defaults are untouched
    pub fn partial(&self) -> Self {
        self.with_required(false)
    }

    /// Copy of this rule with every field required
    pub fn to_required(&self) -> Self {
        self.with_required(true)
    }

    fn with_required(&self, required: bool) -> Self {
        Self {
            fields: self
                .fields
                .iter()
                .cloned()
                .map(|field| Field { required, ..field })
                .collect(),
        }
    }
}

impl From<ObjectRule> for Rule {
    fn from(rule: ObjectRule) -> Self {
        Self::Object(rule)
    }
}
