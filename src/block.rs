use crate::{
	attributes::{attribute_value, set_attributes, set_classes, update_attributes, update_classes},
	fragment::{AnyFragment, Fragment},
	host::Host,
	template::{ChildTarget, Location, Template},
	value::Value,
};
use core::fmt::{self, Debug, Formatter};
use std::rc::Rc;
use tracing::trace;

/// A pre-shaped tree: a shared [`Template`] plus one [`Value`] per location and one optional fragment per child slot.
///
/// Locations are resolved once on mount. Patching compares each value with its predecessor
/// and only writes the locations whose value changed:
///
/// - text slots display [`Value::to_text`],
/// - attribute bindings follow [`attribute_value`], except for `class`, which is a class binding,
///   and form control state like `value` or `checked`, which is a property binding,
/// - property bindings assign the value as is,
/// - attribute map bindings remove entries that are gone and write entries that changed,
/// - class bindings add and remove only the classes that changed,
/// - handler bindings rebind only if the [`Handler`](`crate::Handler`) identity changed,
/// - ref bindings call their [`Handler`](`crate::Handler`) with `&Some(element)` after mounting
///   and with `&None` after removal. They never write.
///
/// Child slots are matched by position. A child that is present on only one side is mounted or removed.
pub struct Block<H: Host> {
	template: Rc<Template>,
	data: Vec<Value>,
	children: Vec<Option<AnyFragment<H>>>,
	mounted: Option<Mounted<H>>,
}

struct Mounted<H: Host> {
	parent: H::Node,
	root: H::Node,
	refs: Vec<H::Node>,
	targets: Vec<ChildTarget<H>>,
}

impl<H: Host> Block<H> {
	#[must_use]
	pub fn new(template: Rc<Template>, data: Vec<Value>, children: Vec<Option<AnyFragment<H>>>) -> Self {
		debug_assert_eq!(data.len(), template.data_len(), "block-dom: Wrong number of data values for template");
		debug_assert_eq!(children.len(), template.child_len(), "block-dom: Wrong number of children for template");
		Self {
			template,
			data,
			children,
			mounted: None,
		}
	}

	#[must_use]
	pub fn data(&self) -> &[Value] {
		&self.data
	}

	fn mount_child(host: &mut H, target: &ChildTarget<H>, child: &mut AnyFragment<H>) {
		if target.anchor.is_none() {
			child.set_sole_content();
		}
		child.mount(host, &target.parent, target.anchor.as_ref());
	}
}

fn set_location<H: Host>(host: &mut H, location: &Location, node: &H::Node, value: &Value) {
	match location {
		Location::Text => {
			let text = value.to_text();
			if !text.is_empty() {
				host.set_text(node, &text)
			}
		}
		Location::Attribute(name) => {
			if let Some(value) = attribute_value(value) {
				host.set_attribute(node, name, Some(&value))
			}
		}
		Location::Property(name) => {
			if *value != Value::None {
				host.set_property(node, name, value)
			}
		}
		Location::Attributes => set_attributes(host, node, value),
		Location::Class => set_classes(host, node, value),
		Location::Handler(event) => {
			if let Value::Handler(handler) = value {
				host.set_handler(node, event, Some(handler))
			}
		}
		Location::Ref => (),
	}
}

fn update_location<H: Host>(host: &mut H, location: &Location, node: &H::Node, value: &Value, old: &Value) {
	match location {
		Location::Text => host.set_text(node, &value.to_text()),
		Location::Attribute(name) => host.set_attribute(node, name, attribute_value(value).as_deref()),
		Location::Property(name) => host.set_property(node, name, value),
		Location::Attributes => update_attributes(host, node, value, old),
		Location::Class => update_classes(host, node, value, old),
		Location::Handler(event) => match value {
			Value::Handler(handler) => host.set_handler(node, event, Some(handler)),
			_ => host.set_handler(node, event, None),
		},
		Location::Ref => (),
	}
}

/// Calls the handler of each ref location with its element if `attached`, or with [`None`] otherwise.
fn notify_refs<H: Host>(template: &Template, data: &[Value], refs: &[H::Node], attached: bool) {
	for ((location, node), value) in template.locations().iter().zip(refs).zip(data) {
		if let (Location::Ref, Value::Handler(handler)) = (location, value) {
			let element: Option<H::Node> = if attached { Some(node.clone()) } else { None };
			handler.call(&element)
		}
	}
}

impl<H: Host> Fragment<H> for Block<H> {
	fn mount(&mut self, host: &mut H, parent: &H::Node, before: Option<&H::Node>) {
		debug_assert!(self.mounted.is_none(), "block-dom: `Block` mounted twice");
		let instance = self.template.instantiate(host);
		for ((location, node), value) in self.template.locations().iter().zip(&instance.refs).zip(&self.data) {
			set_location(host, location, node, value)
		}
		host.insert_before(parent, &instance.root, before);

		for (target, child) in instance.children.iter().zip(&mut self.children) {
			if let Some(child) = child {
				Self::mount_child(host, target, child)
			}
		}

		notify_refs::<H>(&self.template, &self.data, &instance.refs, true);
		self.mounted = Some(Mounted {
			parent: parent.clone(),
			root: instance.root,
			refs: instance.refs,
			targets: instance.children,
		});
	}

	fn patch(&mut self, host: &mut H, next: Self) {
		debug_assert!(
			Rc::ptr_eq(&self.template, &next.template) || self.template == next.template,
			"block-dom: `Block` patched with a different template"
		);
		let mounted = self.mounted.as_ref().expect("block-dom: `Block` patched before mount");

		for (i, (value, old)) in next.data.iter().zip(&self.data).enumerate() {
			if value != old {
				trace!(location = i, "Updating location");
				update_location(host, &self.template.locations()[i], &mounted.refs[i], value, old);
			}
		}
		self.data = next.data;

		for ((slot, next), target) in self.children.iter_mut().zip(next.children).zip(&mounted.targets) {
			match (slot.as_mut(), next) {
				(None, None) => (),
				(Some(child), Some(next)) => child.patch(host, next),
				(Some(child), None) => {
					child.before_remove();
					child.remove(host);
					*slot = None;
				}
				(None, Some(mut next)) => {
					Self::mount_child(host, target, &mut next);
					*slot = Some(next);
				}
			}
		}
	}

	fn move_before(&mut self, host: &mut H, before: Option<&H::Node>) {
		let mounted = self.mounted.as_ref().expect("block-dom: `Block` moved before mount");
		host.insert_before(&mounted.parent, &mounted.root, before);
	}

	fn before_remove(&mut self) {
		for child in self.children.iter_mut().flatten() {
			child.before_remove()
		}
	}

	fn remove(&mut self, host: &mut H) {
		let mounted = self.mounted.take().expect("block-dom: `Block` removed before mount");
		host.remove_child(&mounted.parent, &mounted.root);
		notify_refs::<H>(&self.template, &self.data, &mounted.refs, false);
	}

	fn first_node(&self) -> Option<&H::Node> {
		self.mounted.as_ref().map(|mounted| &mounted.root)
	}
}

impl<H: Host> Debug for Block<H>
where
	AnyFragment<H>: Debug,
{
	fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
		f.debug_struct("Block")
			.field("template", &self.template)
			.field("data", &self.data)
			.field("children", &self.children)
			.field("root", &self.mounted.as_ref().map(|mounted| &mounted.root))
			.finish()
	}
}
