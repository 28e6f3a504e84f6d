use block_dom::{
	error::SlotKind,
	memory::{MemoryHost, NodeId, Op},
	template::{Config, Shape, Template},
	AnyFragment, Block, Error, Fragment, Handler, Key, List, Text, Value,
};
use std::{
	cell::{Cell, RefCell},
	rc::Rc,
};

fn item_template() -> Rc<Template> {
	Rc::new(
		Template::compile(
			Shape::element("li")
				.attribute("role", "listitem")
				.bind_attribute(0, "title")
				.bind_class(1)
				.bind_handler(2, "click")
				.child(Shape::text("Name: "))
				.child(Shape::text_slot(3))
				.child(Shape::child_slot(0)),
		)
		.expect("valid template"),
	)
}

fn counter() -> (Rc<Cell<u32>>, Handler) {
	let count = Rc::new(Cell::new(0));
	let handler = Handler::new({
		let count = Rc::clone(&count);
		move |_| count.set(count.get() + 1)
	});
	(count, handler)
}

fn mount(fragment: &mut Block<MemoryHost>) -> (MemoryHost, NodeId, NodeId) {
	let mut host = MemoryHost::new();
	let container = host.create_container("ul");
	fragment.mount(&mut host, &container, None);
	let root = *fragment.first_node().expect("mounted");
	host.journal().take();
	(host, container, root)
}

#[test]
fn mount_resolves_locations() {
	let (count, handler) = counter();
	let mut block = Block::new(
		item_template(),
		vec!["tip".into(), "a b a".into(), handler.into(), "x".into()],
		vec![None],
	);
	let (host, container, li) = mount(&mut block);

	assert_eq!(host.inner_html(container), "<li class=\"a b\" role=\"listitem\" title=\"tip\">Name: x</li>");
	assert!(host.dispatch(li, "click", &()));
	assert_eq!(count.get(), 1);
}

#[test]
fn unchanged_data_writes_nothing() {
	let (_, handler) = counter();
	let data = || vec!["tip".into(), "a b".into(), handler.clone().into(), 3.0.into()];
	let mut block = Block::new(item_template(), data(), vec![Some(Text::new("!").into())]);
	let (mut host, container, _) = mount(&mut block);

	block.patch(&mut host, Block::new(item_template(), data(), vec![Some(Text::new("!").into())]));

	assert_eq!(host.journal().writes(), 0);
	assert_eq!(host.inner_html(container), "<li class=\"a b\" role=\"listitem\" title=\"tip\">Name: 3!</li>");
}

#[test]
fn patch_writes_only_changed_locations() {
	let (_, handler) = counter();
	let template = item_template();
	let mut block = Block::new(
		Rc::clone(&template),
		vec!["tip".into(), "a b".into(), handler.clone().into(), "x".into()],
		vec![None],
	);
	let (mut host, container, li) = mount(&mut block);

	block.patch(
		&mut host,
		Block::new(
			Rc::clone(&template),
			vec![
				false.into(),
				Value::Classes(vec![("b c".into(), true), ("a".into(), false)]),
				handler.into(),
				2.5.into(),
			],
			vec![None],
		),
	);

	assert_eq!(host.inner_html(container), "<li class=\"b c\" role=\"listitem\">Name: 2.5</li>");
	let ops = host.journal().take();
	assert_eq!(ops.len(), 4, "{:#?}", ops);
	assert!(ops.contains(&Op::SetAttribute {
		element: li,
		name: "title".to_owned()
	}));
	assert!(ops.contains(&Op::RemoveClass {
		element: li,
		class: "a".to_owned()
	}));
	assert!(ops.contains(&Op::AddClass {
		element: li,
		class: "c".to_owned()
	}));
	assert_eq!(ops.iter().filter(|op| matches!(op, Op::SetText(_))).count(), 1);
}

#[test]
fn handlers_rebind_on_identity_change() {
	let (first_count, first) = counter();
	let (second_count, second) = counter();
	let template = item_template();
	let data = |handler: &Handler| vec![Value::None, Value::None, handler.clone().into(), Value::None];
	let mut block = Block::new(Rc::clone(&template), data(&first), vec![None]);
	let (mut host, _, li) = mount(&mut block);

	block.patch(&mut host, Block::new(Rc::clone(&template), data(&first), vec![None]));
	assert_eq!(host.journal().writes(), 0);

	block.patch(&mut host, Block::new(Rc::clone(&template), data(&second), vec![None]));
	assert_eq!(
		host.journal().take(),
		vec![Op::SetHandler {
			element: li,
			event: "click".to_owned()
		}]
	);

	host.dispatch(li, "click", &());
	assert_eq!((first_count.get(), second_count.get()), (0, 1));

	block.patch(&mut host, Block::new(template, vec![Value::None; 4], vec![None]));
	assert!(!host.dispatch(li, "click", &()));
}

#[test]
fn form_control_state_is_written_as_properties() {
	let template = Rc::new(
		Template::compile(
			Shape::element("input")
				.bind_attribute(0, "value")
				.bind_attribute(1, "readonly")
				.bind_property(2, "indeterminate"),
		)
		.expect("valid template"),
	);
	let mut block = Block::new(Rc::clone(&template), vec!["a".into(), true.into(), true.into()], vec![]);
	let (mut host, container, input) = mount(&mut block);
	assert_eq!(host.inner_html(container), "<input>");
	assert_eq!(host.property(input, "value"), Some(&Value::from("a")));
	assert_eq!(host.property(input, "readOnly"), Some(&Value::Bool(true)));
	assert_eq!(host.property(input, "indeterminate"), Some(&Value::Bool(true)));
	assert_eq!(host.attribute(input, "value"), None);

	block.patch(&mut host, Block::new(Rc::clone(&template), vec!["a".into(), true.into(), true.into()], vec![]));
	assert_eq!(host.journal().writes(), 0);

	block.patch(&mut host, Block::new(template, vec!["b".into(), true.into(), false.into()], vec![]));
	assert_eq!(
		host.journal().take(),
		vec![
			Op::SetProperty {
				element: input,
				name: "value".to_owned()
			},
			Op::SetProperty {
				element: input,
				name: "indeterminate".to_owned()
			},
		]
	);
	assert_eq!(host.property(input, "value"), Some(&Value::from("b")));
	assert_eq!(host.property(input, "indeterminate"), Some(&Value::Bool(false)));
}

#[test]
fn attribute_maps() {
	let template = Rc::new(Template::compile(Shape::element("div").bind_attributes(0)).expect("valid template"));
	let attributes = |entries: Vec<(&'static str, Value)>| Value::Map(entries.into_iter().map(|(name, value)| (name.into(), value)).collect());
	let mut block = Block::new(
		Rc::clone(&template),
		vec![attributes(vec![("id", "a".into()), ("class", "x y".into()), ("hidden", true.into())])],
		vec![],
	);
	let (mut host, container, div) = mount(&mut block);
	assert_eq!(host.inner_html(container), "<div class=\"x y\" hidden=\"\" id=\"a\"></div>");

	block.patch(
		&mut host,
		Block::new(
			Rc::clone(&template),
			vec![attributes(vec![("id", "a".into()), ("class", "y z".into()), ("title", "t".into())])],
			vec![],
		),
	);
	assert_eq!(host.inner_html(container), "<div class=\"y z\" id=\"a\" title=\"t\"></div>");
	let ops = host.journal().take();
	assert_eq!(ops.len(), 4, "{:#?}", ops);
	assert!(ops.contains(&Op::SetAttribute {
		element: div,
		name: "hidden".to_owned()
	}));
	assert!(ops.contains(&Op::RemoveClass {
		element: div,
		class: "x".to_owned()
	}));
	assert!(!ops.contains(&Op::SetAttribute {
		element: div,
		name: "id".to_owned()
	}));

	block.patch(&mut host, Block::new(template, vec![Value::List(vec!["id".into(), "b".into()])], vec![]));
	assert_eq!(host.inner_html(container), "<div id=\"b\"></div>");
}

#[test]
fn class_attribute_binding_merges_classes() {
	let template = Rc::new(
		Template::compile(Shape::element("li").attribute("class", "static").bind_class(0).bind_attribute(1, "class")).expect("valid template"),
	);
	let mut block = Block::new(Rc::clone(&template), vec!["a".into(), "b".into()], vec![]);
	let (mut host, container, li) = mount(&mut block);
	assert_eq!(host.inner_html(container), "<li class=\"static a b\"></li>");
	assert_eq!(host.attribute(li, "class"), None);

	block.patch(&mut host, Block::new(template, vec!["a".into(), "c".into()], vec![]));

	assert_eq!(host.inner_html(container), "<li class=\"static a c\"></li>");
	assert_eq!(
		host.journal().take(),
		vec![
			Op::RemoveClass {
				element: li,
				class: "b".to_owned()
			},
			Op::AddClass {
				element: li,
				class: "c".to_owned()
			},
		]
	);
}

#[test]
fn refs_see_mount_and_removal() {
	let seen = Rc::new(RefCell::new(Vec::new()));
	let recorder = || {
		let seen = Rc::clone(&seen);
		Handler::new(move |element| seen.borrow_mut().push(*element.downcast_ref::<Option<NodeId>>().expect("ref payload")))
	};
	let template = Rc::new(Template::compile(Shape::element("p").bind_ref(0).child(Shape::text_slot(1))).expect("valid template"));
	let mut block = Block::new(Rc::clone(&template), vec![recorder().into(), "x".into()], vec![]);
	let (mut host, _, p) = mount(&mut block);
	assert_eq!(*seen.borrow(), vec![Some(p)]);

	block.patch(&mut host, Block::new(template, vec![recorder().into(), "y".into()], vec![]));
	assert_eq!(host.journal().writes(), 1);
	assert_eq!(seen.borrow().len(), 1);

	block.before_remove();
	block.remove(&mut host);
	assert_eq!(*seen.borrow(), vec![Some(p), None]);
}

#[test]
fn unchanged_nan_writes_nothing() {
	let template = Rc::new(Template::compile(Shape::element("p").bind_attribute(0, "data-n").child(Shape::text_slot(1))).expect("valid template"));
	let data = || vec![f64::NAN.into(), f64::NAN.into()];
	let mut block = Block::new(Rc::clone(&template), data(), vec![]);
	let (mut host, container, _) = mount(&mut block);
	assert_eq!(host.inner_html(container), "<p data-n=\"NaN\">NaN</p>");

	block.patch(&mut host, Block::new(template, data(), vec![]));

	assert_eq!(host.journal().writes(), 0);
}

#[test]
fn child_slots() {
	let template = item_template();
	let data = || vec![Value::None, Value::None, Value::None, "x".into()];
	let mut block = Block::new(Rc::clone(&template), data(), vec![None]);
	let (mut host, container, _) = mount(&mut block);

	block.patch(&mut host, Block::new(Rc::clone(&template), data(), vec![Some(Text::new("!").into())]));
	assert_eq!(host.inner_html(container), "<li role=\"listitem\">Name: x!</li>");

	block.patch(&mut host, Block::new(Rc::clone(&template), data(), vec![Some(Text::new("?").into())]));
	assert_eq!(host.inner_html(container), "<li role=\"listitem\">Name: x?</li>");

	block.patch(&mut host, Block::new(template, data(), vec![None]));
	assert_eq!(host.inner_html(container), "<li role=\"listitem\">Name: x</li>");
}

#[test]
fn only_child_slot_is_sole_content() {
	let template = Rc::new(Template::compile(Shape::element("ol").child(Shape::child_slot(0))).expect("valid template"));
	let list = |keys: &[i64]| -> AnyFragment<MemoryHost> {
		let list: List<MemoryHost> = List::new(keys.iter().map(|&key| (Key::from(key), Text::new(key.to_string()).into())));
		list.into()
	};
	let mut block = Block::new(Rc::clone(&template), vec![], vec![Some(list(&[1, 2, 3]))]);
	let (mut host, container, ol) = mount(&mut block);
	assert_eq!(host.inner_html(container), "<ol>123</ol>");

	block.patch(&mut host, Block::new(template, vec![], vec![Some(list(&[]))]));

	assert_eq!(host.journal().count(|op| *op == Op::Clear(ol)), 1);
	assert_eq!(host.journal().count(|op| matches!(op, Op::Remove { .. })), 0);
	assert_eq!(host.children(ol).len(), 1);
}

#[test]
fn move_and_remove() {
	let template = Rc::new(Template::compile(Shape::text_slot(0)).expect("valid template"));
	let mut host = MemoryHost::new();
	let container = host.create_container("p");
	let mut a = Block::new(Rc::clone(&template), vec!["a".into()], vec![]);
	a.mount(&mut host, &container, None);
	let mut b = Block::new(template, vec!["b".into()], vec![]);
	b.mount(&mut host, &container, None);

	a.move_before(&mut host, None);
	assert_eq!(host.inner_html(container), "ba");

	b.before_remove();
	b.remove(&mut host);
	assert_eq!(host.inner_html(container), "a");
}

#[test]
fn template_slot_validation() {
	assert_eq!(
		Template::compile(Shape::child_slot(0)),
		Err(Error::SlotIndex {
			kind: SlotKind::Child,
			index: 0
		})
	);
	assert_eq!(
		Template::compile(Shape::element("p").child(Shape::text_slot(0)).child(Shape::text_slot(0))),
		Err(Error::SlotIndex {
			kind: SlotKind::Data,
			index: 0
		})
	);
	assert_eq!(
		Template::compile(Shape::element("p").bind_attribute(1, "title")),
		Err(Error::SlotIndex {
			kind: SlotKind::Data,
			index: 0
		})
	);
	assert_eq!(
		Template::compile(Shape::element("p").child(Shape::child_slot(1))),
		Err(Error::SlotIndex {
			kind: SlotKind::Child,
			index: 0
		})
	);

	let template = Template::compile(
		Shape::element("p")
			.bind_class(1)
			.child(Shape::text_slot(0))
			.child(Shape::child_slot(1))
			.child(Shape::child_slot(0)),
	)
	.expect("valid template");
	assert_eq!((template.data_len(), template.child_len()), (2, 2));
}

fn whitespace_shape() -> Shape {
	Shape::element("div")
		.child(Shape::text("\n\t"))
		.child(Shape::element("pre").child(Shape::text("  ")))
		.child(Shape::text_slot(0))
		.into()
}

fn render(template: Template) -> String {
	let mut host = MemoryHost::new();
	let container = host.create_container("body");
	let mut block = Block::new(Rc::new(template), vec!["v".into()], vec![]);
	block.mount(&mut host, &container, None);
	host.inner_html(container)
}

#[test]
fn whitespace_normalization() {
	let normalized = Template::compile(whitespace_shape()).expect("valid template");
	assert_eq!(render(normalized), "<div><pre>  </pre>v</div>");

	let verbatim = Template::compile_with(whitespace_shape(), Config { normalize_whitespace: false }).expect("valid template");
	assert_eq!(render(verbatim), "<div>\n\t<pre>  </pre>v</div>");
}
