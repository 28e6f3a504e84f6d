//! Attribute and class writes for [`Block`](`crate::Block`) locations.

use crate::{host::Host, value::Value};
use hashbrown::{HashMap, HashSet};
use std::borrow::Cow;
use tracing::warn;

/// `false` and [`Value::None`] remove the attribute, `true` sets it without a value.
#[must_use]
pub fn attribute_value(value: &Value) -> Option<Cow<'_, str>> {
	match value {
		Value::None | Value::Bool(false) => None,
		Value::Bool(true) => Some(Cow::Borrowed("")),
		other => Some(other.to_text()),
	}
}

/// The classes a class location value enables, in order and without duplicates.
#[must_use]
pub fn class_names<'a>(value: &'a Value) -> Vec<Cow<'a, str>> {
	let mut seen = HashSet::new();
	let mut names = Vec::new();
	let mut push = |name: Cow<'a, str>| {
		if seen.insert(name.clone()) {
			names.push(name)
		}
	};
	match value {
		Value::None | Value::Bool(false) => (),
		Value::Str(s) => s.split_whitespace().map(Cow::Borrowed).for_each(&mut push),
		Value::Classes(classes) => classes
			.iter()
			.filter(|(_, enabled)| *enabled)
			.flat_map(|(class, _)| class.split_whitespace())
			.map(Cow::Borrowed)
			.for_each(&mut push),
		other => {
			let text = other.to_text();
			if !text.trim().is_empty() {
				push(Cow::Owned(text.trim().to_owned()))
			}
		}
	}
	names
}

pub fn set_classes<H: Host>(host: &mut H, element: &H::Node, value: &Value) {
	for class in class_names(value) {
		host.add_class(element, &class)
	}
}

/// Removes classes only `old` enables, then adds classes only `new` enables.
pub fn update_classes<H: Host>(host: &mut H, element: &H::Node, new: &Value, old: &Value) {
	let old = class_names(old);
	let new = class_names(new);
	let old_set: HashSet<&str> = old.iter().map(AsRef::as_ref).collect();
	let new_set: HashSet<&str> = new.iter().map(AsRef::as_ref).collect();
	for class in &old {
		if !new_set.contains(class.as_ref()) {
			host.remove_class(element, class)
		}
	}
	for class in &new {
		if !old_set.contains(class.as_ref()) {
			host.add_class(element, class)
		}
	}
}

/// The element property an attribute binding writes instead, for form control state that attributes only initialize.
#[must_use]
pub fn property_name(tag: &str, attribute: &str) -> Option<&'static str> {
	let name = match attribute {
		"checked" => "checked",
		"indeterminate" => "indeterminate",
		"selected" => "selected",
		"value" => "value",
		"readonly" => "readOnly",
		"disabled" => "disabled",
		_ => return None,
	};
	let applies = match tag {
		"input" => matches!(attribute, "checked" | "indeterminate" | "value" | "readonly" | "disabled"),
		"textarea" => matches!(attribute, "value" | "readonly" | "disabled"),
		"select" => matches!(attribute, "value" | "disabled"),
		"option" => matches!(attribute, "selected" | "disabled"),
		"button" | "optgroup" => attribute == "disabled",
		_ => false,
	};
	if applies {
		Some(name)
	} else {
		None
	}
}

/// The `(name, value)` pairs of an attributes location value:
/// a [`Value::Map`], a single `[name, value]` [`Value::List`], or nothing.
#[must_use]
pub fn attribute_entries(value: &Value) -> Vec<(&str, &Value)> {
	match value {
		Value::None => Vec::new(),
		Value::Map(entries) => entries.iter().map(|(name, value)| (name.as_ref(), value)).collect(),
		Value::List(pair) => match pair.as_slice() {
			[Value::Str(name), value] => vec![(name.as_ref(), value)],
			_ => {
				warn!("Expected a `[name, value]` pair but found {} item(s).", pair.len());
				Vec::new()
			}
		},
		other => {
			warn!("Expected an attribute map or pair but found {}.", other.shape());
			Vec::new()
		}
	}
}

/// A `class` entry adds classes, all other entries are attributes.
pub fn set_attributes<H: Host>(host: &mut H, element: &H::Node, value: &Value) {
	for (name, value) in attribute_entries(value) {
		if name == "class" {
			set_classes(host, element, value)
		} else if let Some(value) = attribute_value(value) {
			host.set_attribute(element, name, Some(&value))
		}
	}
}

/// Removes entries missing from `new`, then writes entries of `new` whose value changed.
pub fn update_attributes<H: Host>(host: &mut H, element: &H::Node, new: &Value, old: &Value) {
	let old: HashMap<&str, &Value> = attribute_entries(old).into_iter().collect();
	let new = attribute_entries(new);
	for (&name, &previous) in &old {
		if new.iter().all(|&(new_name, _)| new_name != name) {
			if name == "class" {
				update_classes(host, element, &Value::None, previous)
			} else {
				host.set_attribute(element, name, None)
			}
		}
	}
	for (name, value) in new {
		let previous = old.get(name).copied();
		if previous == Some(value) {
			continue;
		}
		if name == "class" {
			update_classes(host, element, value, previous.unwrap_or(&Value::None))
		} else {
			host.set_attribute(element, name, attribute_value(value).as_deref())
		}
	}
}
