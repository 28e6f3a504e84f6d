use block_dom::{
	attributes::{attribute_value, class_names},
	memory::{Journal, MemoryHost, Op},
	prepare_list, AnyFragment, Error, Handler, Key, List, Root, Teardown, Text, Value,
};
use std::borrow::Cow;

fn rows(keys: &[&'static str]) -> AnyFragment<MemoryHost> {
	let list: List<MemoryHost> = List::new(keys.iter().map(|&key| (Key::from(key), Text::new(key).into())));
	list.into()
}

#[test]
fn update_mounts_then_patches() {
	let mut host = MemoryHost::new();
	let container = host.create_container("tbody");
	let mut root = Root::new(container);
	assert!(!root.is_mounted());

	root.update(&mut host, rows(&["a", "b"]));
	assert!(root.is_mounted());
	assert_eq!(host.inner_html(container), "ab");
	host.journal().take();

	root.update(&mut host, rows(&["a", "b"]));
	assert_eq!(host.journal().writes(), 0);

	root.update(&mut host, rows(&["b", "c"]));
	assert_eq!(host.inner_html(container), "bc");
}

#[test]
fn root_content_is_sole_content() {
	let mut host = MemoryHost::new();
	let container = host.create_container("tbody");
	let mut root = Root::new(container);
	root.update(&mut host, rows(&["a", "b", "c"]));
	host.journal().take();

	root.update(&mut host, rows(&[]));

	assert_eq!(host.journal().count(|op| *op == Op::Clear(container)), 1);
	assert_eq!(host.children(container).len(), 1);
}

#[test]
fn clear_runs_hooks_and_allows_remounting() {
	let journal = Journal::new();
	let mut host = MemoryHost::with_journal(journal.clone());
	let container = host.create_container("main");
	let mut root: Root<MemoryHost> = Root::new(container);
	root.update(&mut host, {
		let journal = journal.clone();
		Teardown::new(Text::new("app"), move || journal.note("unmounted")).into()
	});
	journal.take();

	root.clear(&mut host);

	assert!(!root.is_mounted());
	assert!(host.children(container).is_empty());
	assert_eq!(journal.ops()[0], Op::Note("unmounted".to_owned()));

	root.update(&mut host, Text::new("again").into());
	assert_eq!(host.inner_html(container), "again");
}

#[test]
fn prepare_list_sources() {
	let items = Value::List(vec![1.0.into(), "two".into()]);
	assert_eq!(prepare_list(&items), Ok((vec![1.0.into(), "two".into()], vec![1.0.into(), "two".into()])));

	let entries = Value::Map(vec![("first".into(), 1.0.into()), ("second".into(), 2.0.into())]);
	assert_eq!(prepare_list(&entries), Ok((vec![1.0.into(), 2.0.into()], vec!["first".into(), "second".into()])));

	assert_eq!(prepare_list(&Value::List(vec![])), Ok((vec![], vec![])));

	let error = prepare_list(&"nope".into()).expect_err("not a collection");
	assert_eq!(error, Error::InvalidCollection { found: "string" });
	assert_eq!(error.to_string(), "Invalid loop expression: expected a list or map but found string");
}

#[test]
fn value_text() {
	assert_eq!(Value::from(3.0).to_text(), "3");
	assert_eq!(Value::from(2.5).to_text(), "2.5");
	assert_eq!(Value::from(true).to_text(), "true");
	assert_eq!(Value::from(None::<&'static str>).to_text(), "");
	assert_eq!(Value::from(Some("text")).to_text(), "text");
}

#[test]
fn attribute_values() {
	assert_eq!(attribute_value(&Value::Bool(false)), None);
	assert_eq!(attribute_value(&Value::None), None);
	assert_eq!(attribute_value(&Value::Bool(true)), Some(Cow::Borrowed("")));
	assert_eq!(attribute_value(&Value::from(7.0)), Some(Cow::Borrowed("7")));
}

#[test]
fn class_values() {
	let classes = Value::Classes(vec![("a b".into(), true), ("c".into(), false), (" b  d ".into(), true)]);
	assert_eq!(class_names(&classes), vec!["a", "b", "d"]);
	assert_eq!(class_names(&" x  y ".into()), vec!["x", "y"]);
	assert!(class_names(&Value::Bool(false)).is_empty());
}

#[test]
fn handler_identity() {
	let handler = Handler::new(|_| ());
	assert_eq!(handler, handler.clone());
	assert_ne!(handler, Handler::new(|_| ()));
}

#[test]
fn key_conversions() {
	assert_eq!(Key::from(3_usize), Key::Int(3));
	assert_eq!(Key::from("k").to_string(), "k");
	assert_ne!(Key::from("3"), Key::from(3_i64));
}
