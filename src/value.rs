use core::{
	any::Any,
	fmt::{self, Debug, Display, Formatter},
};
use std::{borrow::Cow, rc::Rc};

/// Data for one dynamic location of a [`Block`](`crate::Block`).
///
/// How a value is written depends on the location it is bound to, see [`Block`](`crate::Block`).
///
/// Numbers compare by bit pattern, so an unchanged `NaN` doesn't count as a change.
#[derive(Debug, Clone)]
pub enum Value {
	None,
	Bool(bool),
	Number(f64),
	Str(Cow<'static, str>),
	/// `(names, enabled)` pairs. Names may contain several whitespace-separated classes.
	Classes(Vec<(Cow<'static, str>, bool)>),
	Handler(Handler),
	/// An ordered loop source, see [`prepare_list`](`crate::list::prepare_list`).
	List(Vec<Value>),
	/// A named loop source, see [`prepare_list`](`crate::list::prepare_list`).
	Map(Vec<(Cow<'static, str>, Value)>),
}

impl Value {
	/// The text a text location displays for this value.
	#[must_use]
	pub fn to_text(&self) -> Cow<'_, str> {
		match self {
			Value::None => Cow::Borrowed(""),
			Value::Bool(true) => Cow::Borrowed("true"),
			Value::Bool(false) => Cow::Borrowed("false"),
			Value::Number(n) => Cow::Owned(n.to_string()),
			Value::Str(s) => Cow::Borrowed(s.as_ref()),
			_ => Cow::Borrowed(""),
		}
	}

	/// A short name for the kind of value, used in error messages.
	#[must_use]
	pub fn shape(&self) -> &'static str {
		match self {
			Value::None => "none",
			Value::Bool(_) => "boolean",
			Value::Number(_) => "number",
			Value::Str(_) => "string",
			Value::Classes(_) => "class object",
			Value::Handler(_) => "handler",
			Value::List(_) => "list",
			Value::Map(_) => "map",
		}
	}
}

impl PartialEq for Value {
	fn eq(&self, other: &Self) -> bool {
		match (self, other) {
			(Value::None, Value::None) => true,
			(Value::Bool(a), Value::Bool(b)) => a == b,
			(Value::Number(a), Value::Number(b)) => a.to_bits() == b.to_bits(),
			(Value::Str(a), Value::Str(b)) => a == b,
			(Value::Classes(a), Value::Classes(b)) => a == b,
			(Value::Handler(a), Value::Handler(b)) => a == b,
			(Value::List(a), Value::List(b)) => a == b,
			(Value::Map(a), Value::Map(b)) => a == b,
			_ => false,
		}
	}
}

impl From<&'static str> for Value {
	fn from(s: &'static str) -> Self {
		Value::Str(Cow::Borrowed(s))
	}
}
impl From<String> for Value {
	fn from(s: String) -> Self {
		Value::Str(Cow::Owned(s))
	}
}
impl From<bool> for Value {
	fn from(b: bool) -> Self {
		Value::Bool(b)
	}
}
impl From<f64> for Value {
	fn from(n: f64) -> Self {
		Value::Number(n)
	}
}
impl From<Handler> for Value {
	fn from(handler: Handler) -> Self {
		Value::Handler(handler)
	}
}
impl<T: Into<Value>> From<Option<T>> for Value {
	fn from(value: Option<T>) -> Self {
		value.map_or(Value::None, Into::into)
	}
}

/// An event handler bound through a handler location.
///
/// Handlers compare by identity, so re-rendering with a clone of the same handler doesn't rebind the listener.
/// The argument is the host's event object, e.g. a [`web_sys::Event`] for [`DomHost`](`crate::dom::DomHost`).
#[derive(Clone)]
pub struct Handler(Rc<dyn Fn(&dyn Any)>);
impl Handler {
	#[must_use]
	pub fn new(handler: impl 'static + Fn(&dyn Any)) -> Self {
		Self(Rc::new(handler))
	}

	pub fn call(&self, event: &dyn Any) {
		(self.0)(event)
	}
}
impl PartialEq for Handler {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.0, &other.0)
	}
}
impl Debug for Handler {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_tuple("Handler").field(&Rc::as_ptr(&self.0).cast::<()>()).finish()
	}
}

/// Identifies an item of a [`List`](`crate::List`) across renders.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Key {
	Int(i64),
	Str(Rc<str>),
}
impl Display for Key {
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		match self {
			Key::Int(i) => Display::fmt(i, f),
			Key::Str(s) => Display::fmt(s, f),
		}
	}
}
impl From<i64> for Key {
	fn from(i: i64) -> Self {
		Key::Int(i)
	}
}
impl From<usize> for Key {
	#[allow(clippy::cast_possible_wrap)]
	fn from(i: usize) -> Self {
		Key::Int(i as i64)
	}
}
impl From<&str> for Key {
	fn from(s: &str) -> Self {
		Key::Str(s.into())
	}
}
impl From<String> for Key {
	fn from(s: String) -> Self {
		Key::Str(s.into())
	}
}
