use pretty_assertions::assert_eq;
use wordmark_content::{ContentError, Document};

fn paragraph(doc: &mut Document, text: &str) -> (wordmark_content::NodeId, wordmark_content::NodeId) {
    let root = doc.root();
    let p = doc.append_element(root, "p").unwrap();
    let t = doc.append_text(p, text).unwrap();
    (p, t)
}

#[test]
fn append_links_children_in_order() {
    let mut doc = Document::new();
    let root = doc.root();
    let a = doc.append_element(root, "a").unwrap();
    let b = doc.append_element(root, "b").unwrap();
    let c = doc.append_text(root, "c").unwrap();

    assert_eq!(doc.children(root).collect::<Vec<_>>(), vec![a, b, c]);
    assert_eq!(doc.first_child(root), Some(a));
    assert_eq!(doc.last_child(root), Some(c));
    assert_eq!(doc.previous_sibling(c), Some(b));
    assert_eq!(doc.parent(b), Some(root));
}

#[test]
fn insert_before_keeps_reference_identity() {
    let mut doc = Document::new();
    let (p, t) = paragraph(&mut doc, "world");
    let hello = doc.create_text("hello ");
    doc.insert_before(p, hello, Some(t)).unwrap();

    assert_eq!(doc.children(p).collect::<Vec<_>>(), vec![hello, t]);
    assert_eq!(doc.next_sibling(hello), Some(t));
    assert_eq!(doc.text(t), Some("world"));
    assert_eq!(doc.text_content(p), "hello world");
}

#[test]
fn remove_child_detaches_but_keeps_node() {
    let mut doc = Document::new();
    let (p, t) = paragraph(&mut doc, "gone");
    let after = doc.append_text(p, "stays").unwrap();

    doc.remove_child(p, t).unwrap();
    assert_eq!(doc.children(p).collect::<Vec<_>>(), vec![after]);
    assert_eq!(doc.parent(t), None);
    assert_eq!(doc.next_sibling(t), None);
    assert_eq!(doc.text(t), Some("gone"));
    assert_eq!(doc.previous_sibling(after), None);
}

#[test]
fn remove_from_wrong_parent_fails() {
    let mut doc = Document::new();
    let (_, t) = paragraph(&mut doc, "x");
    let root = doc.root();
    assert_eq!(
        doc.remove_child(root, t),
        Err(ContentError::NotAChild { parent: root, child: t })
    );
}

#[test]
fn insert_moves_node_between_parents() {
    let mut doc = Document::new();
    let (p1, t) = paragraph(&mut doc, "moving");
    let root = doc.root();
    let p2 = doc.append_element(root, "p").unwrap();

    doc.append_child(p2, t).unwrap();
    assert_eq!(doc.first_child(p1), None);
    assert_eq!(doc.first_child(p2), Some(t));
}

#[test]
fn text_nodes_cannot_have_children() {
    let mut doc = Document::new();
    let (_, t) = paragraph(&mut doc, "leaf");
    let other = doc.create_text("x");
    assert!(matches!(doc.append_child(t, other), Err(ContentError::Hierarchy(_))));
}

#[test]
fn node_cannot_become_its_own_ancestor() {
    let mut doc = Document::new();
    let root = doc.root();
    let outer = doc.append_element(root, "div").unwrap();
    let inner = doc.append_element(outer, "div").unwrap();
    assert!(matches!(doc.append_child(inner, outer), Err(ContentError::Hierarchy(_))));
}

#[test]
fn attributes_only_on_elements() {
    let mut doc = Document::new();
    let (p, t) = paragraph(&mut doc, "x");
    doc.set_attribute(p, "class", "intro").unwrap();
    assert_eq!(doc.attribute(p, "class"), Some("intro"));
    assert!(doc.set_attribute(t, "class", "nope").is_err());
}

#[test]
fn markup_escapes_text_and_attributes() {
    let mut doc = Document::new();
    let (p, _) = paragraph(&mut doc, "a < b & c");
    doc.set_attribute(p, "title", "say \"hi\"").unwrap();
    assert_eq!(
        doc.to_markup(doc.root()),
        "<p title=\"say &quot;hi&quot;\">a &lt; b &amp; c</p>"
    );
}

#[test]
fn descendants_are_in_document_order_and_stay_in_the_subtree() {
    let mut doc = Document::new();
    let root = doc.root();
    let a = doc.append_element(root, "a").unwrap();
    let a1 = doc.append_text(a, "1").unwrap();
    let b = doc.append_element(a, "b").unwrap();
    let b1 = doc.append_text(b, "2").unwrap();
    let after = doc.append_text(root, "3").unwrap();

    let order: Vec<_> = doc.descendants(a).collect();
    assert_eq!(order, vec![a, a1, b, b1]);
    assert_eq!(doc.descendants(root).last(), Some(after));
    assert_eq!(doc.descendants(b1).collect::<Vec<_>>(), vec![b1]);
}

#[test]
fn text_and_markup_of_very_deep_trees() {
    let mut doc = Document::new();
    let root = doc.root();
    let mut inner = doc.create_text("deep");
    for _ in 0..200_000 {
        let div = doc.create_element("i");
        doc.append_child(div, inner).unwrap();
        inner = div;
    }
    doc.append_child(root, inner).unwrap();

    assert_eq!(doc.text_content(root), "deep");
    let markup = doc.to_markup(root);
    assert!(markup.starts_with("<i><i>"));
    assert!(markup.ends_with("</i></i>"));
    assert_eq!(markup.len(), "deep".len() + 200_000 * "<i></i>".len());
}
