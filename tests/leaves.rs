use block_dom::{
	memory::{MemoryHost, Op},
	Comment, Fragment, Html, Text,
};

#[test]
fn text() {
	let mut host = MemoryHost::new();
	let container = host.create_container("p");
	let mut text = Text::new("Hello");
	text.mount(&mut host, &container, None);
	assert_eq!(host.inner_html(container), "Hello");
	let node = *text.first_node().expect("mounted");
	host.journal().take();

	text.patch(&mut host, Text::new("Hello"));
	assert_eq!(host.journal().writes(), 0);

	text.patch(&mut host, Text::new(String::from("Goodbye")));
	assert_eq!(host.journal().take(), vec![Op::SetText(node)]);
	assert_eq!(host.inner_html(container), "Goodbye");
	assert_eq!(text.text(), "Goodbye");

	text.remove(&mut host);
	assert_eq!(host.inner_html(container), "");
	assert_eq!(text.first_node(), None);
}

#[test]
fn text_move() {
	let mut host = MemoryHost::new();
	let container = host.create_container("p");
	let mut a = Text::new("a");
	a.mount(&mut host, &container, None);
	let mut b = Text::new("b");
	b.mount(&mut host, &container, None);

	a.move_before(&mut host, None);
	assert_eq!(host.inner_html(container), "ba");

	let before = b.first_node().copied();
	a.move_before(&mut host, before.as_ref());
	assert_eq!(host.inner_html(container), "ab");
}

#[test]
#[should_panic(expected = "`Text` patched before mount")]
fn text_patched_before_mount() {
	let mut host = MemoryHost::new();
	let mut text = Text::new("a");
	text.patch(&mut host, Text::new("b"));
}

#[test]
fn comment_is_static() {
	let mut host = MemoryHost::new();
	let container = host.create_container("div");
	let mut comment = Comment::new("marker");
	comment.mount(&mut host, &container, None);
	host.journal().take();

	comment.patch(&mut host, Comment::new("changed"));

	assert_eq!(host.journal().writes(), 0);
	assert_eq!(host.inner_html(container), "<!--marker-->");
}

#[test]
fn html() {
	let mut host = MemoryHost::new();
	let container = host.create_container("div");
	let mut head = Text::new("[");
	head.mount(&mut host, &container, None);
	let mut html = Html::new("<b>bold</b> text<!--c-->");
	html.mount(&mut host, &container, None);
	let mut tail = Text::new("]");
	tail.mount(&mut host, &container, None);
	assert_eq!(host.inner_html(container), "[<b>bold</b> text<!--c-->]");
	host.journal().take();

	html.patch(&mut host, Html::new("<b>bold</b> text<!--c-->"));
	assert_eq!(host.journal().writes(), 0);

	html.patch(&mut host, Html::new("<i class=\"x\">it</i><br>"));
	assert_eq!(host.inner_html(container), "[<i class=\"x\">it</i><br>]");
	assert_eq!(host.journal().count(|op| matches!(op, Op::Remove { .. })), 3);

	html.before_remove();
	html.remove(&mut host);
	assert_eq!(host.inner_html(container), "[]");
}

#[test]
fn empty_html_keeps_a_placeholder() {
	let mut host = MemoryHost::new();
	let container = host.create_container("div");
	let mut html = Html::new("");
	html.mount(&mut host, &container, None);

	let placeholder = *html.first_node().expect("placeholder");
	assert_eq!(host.children(container), &[placeholder]);
	assert_eq!(host.text(placeholder), Some(""));

	html.patch(&mut host, Html::new("<em>now</em>"));
	assert_eq!(host.inner_html(container), "<em>now</em>");
	assert_eq!(host.parent(placeholder), None);
}

#[test]
fn nested_markup() {
	let mut host = MemoryHost::new();
	let container = host.create_container("div");
	let mut html = Html::new("<ul><li id=a>one<li id='b' hidden>two</ul>&lt;ok&gt;");
	html.mount(&mut host, &container, None);

	let ul = host.children(container)[0];
	assert_eq!(host.tag(ul), Some("ul"));
	let items = host.children(ul).to_vec();
	assert_eq!(items.len(), 1, "unclosed <li> nests, the tokenizer does not infer end tags");
	assert_eq!(host.attribute(items[0], "id"), Some("a"));
	assert_eq!(host.inner_html(container), "<ul><li id=\"a\">one<li hidden=\"\" id=\"b\">two</li></li></ul><ok>");
}
