use domxpath_core::builder::{attr, comment, doc, doctype, elem, fragment, pi, text};
use domxpath_core::{DomError, DomNode, Node, NodeType};
use rstest::{fixture, rstest};

/// `<!DOCTYPE html><html><body><span>a</span><div>b<!--c--></div></body></html>`
#[fixture]
fn page() -> Node {
    doc()
        .child(doctype("html"))
        .child(
            elem("html").child(
                elem("body")
                    .child(elem("span").child(text("a")))
                    .child(elem("div").child(text("b")).child(comment("c"))),
            ),
        )
        .build()
}

fn body(document: &Node) -> Node {
    document.document_element().unwrap().first_child().unwrap()
}

#[rstest]
fn sibling_links_follow_child_order(page: Node) {
    let body = body(&page);
    let span = body.first_child().unwrap();
    let div = body.last_child().unwrap();
    assert_eq!(span.next_sibling().as_ref(), Some(&div));
    assert_eq!(div.previous_sibling().as_ref(), Some(&span));
    assert!(span.previous_sibling().is_none());
    assert!(div.next_sibling().is_none());
    assert_eq!(span.parent().as_ref(), Some(&body));
}

#[rstest]
fn document_element_skips_doctype(page: Node) {
    let root = page.document_element().unwrap();
    assert_eq!(root.node_name(), "html");
    assert_eq!(page.first_child().unwrap().node_type(), NodeType::DocumentType);
}

#[rstest]
fn text_content_ignores_comments(page: Node) {
    assert_eq!(page.text_content(), "ab");
    assert_eq!(body(&page).last_child().unwrap().text_content(), "b");
}

#[rstest]
#[case(Node::text("t"), NodeType::Text, "#text")]
#[case(Node::cdata("t"), NodeType::CharacterData, "#cdata-section")]
#[case(Node::comment("t"), NodeType::Comment, "#comment")]
#[case(Node::document(), NodeType::Document, "#document")]
#[case(Node::fragment(), NodeType::DocumentFragment, "#document-fragment")]
#[case(Node::doctype("html"), NodeType::DocumentType, "html")]
#[case(Node::processing_instruction("xml-stylesheet", "href='a'"), NodeType::ProcessingInstruction, "xml-stylesheet")]
#[case(Node::entity("nbsp"), NodeType::Entity, "nbsp")]
#[case(Node::entity_reference("amp"), NodeType::EntityReference, "amp")]
#[case(Node::notation("gif"), NodeType::Notation, "gif")]
#[case(Node::element("svg:rect"), NodeType::Element, "svg:rect")]
fn node_kinds_and_names(#[case] node: Node, #[case] kind: NodeType, #[case] name: &str) {
    assert_eq!(node.node_type(), kind);
    assert_eq!(node.node_name(), name);
}

#[rstest]
fn only_elements_have_local_names() {
    let element = Node::element_ns("http://www.w3.org/2000/svg", "svg:rect");
    assert_eq!(element.local_name(), Some("rect"));
    assert_eq!(element.prefix(), Some("svg"));
    assert_eq!(element.namespace_uri(), Some("http://www.w3.org/2000/svg"));
    assert_eq!(Node::text("x").local_name(), None);
}

#[rstest]
fn attributes_keep_insertion_order() {
    let e = elem("a")
        .attr(attr("z", "1"))
        .attr(attr("href", "#"))
        .attr(attr("class", "x"))
        .build();
    let names: Vec<String> = e.attributes().iter().map(|a| a.name().to_string()).collect();
    assert_eq!(names, ["z", "href", "class"]);
    for a in e.attributes() {
        assert_eq!(a.owner_element().as_ref(), Some(&e));
    }
}

#[rstest]
fn set_attribute_replaces_in_place() {
    let e = elem("a").attr(attr("x", "1")).attr(attr("y", "2")).build();
    e.set_attribute("x", "3").unwrap();
    e.set_attribute("z", "4").unwrap();
    assert_eq!(e.get_attribute("x").as_deref(), Some("3"));
    assert_eq!(e.attribute_at(0).unwrap().name(), "x");
    assert_eq!(e.attribute_count(), 3);
    assert!(matches!(
        Node::text("t").set_attribute("x", "1"),
        Err(DomError::InvalidArgument(_))
    ));
}

#[rstest]
fn append_moves_node_between_parents(page: Node) {
    let body = body(&page);
    let span = body.first_child().unwrap();
    let div = body.last_child().unwrap();
    div.append_child(&span).unwrap();
    assert_eq!(body.children().len(), 1);
    assert_eq!(div.last_child().as_ref(), Some(&span));
    assert_eq!(span.parent().as_ref(), Some(&div));
}

#[rstest]
fn insert_before_reference(page: Node) {
    let body = body(&page);
    let div = body.last_child().unwrap();
    let p = Node::element("p");
    body.insert_before(&p, Some(&div)).unwrap();
    let names: Vec<String> = body.children().iter().map(|c| c.node_name().to_string()).collect();
    assert_eq!(names, ["span", "p", "div"]);
    let stranger = Node::element("em");
    assert_eq!(body.insert_before(&Node::element("b"), Some(&stranger)), Err(DomError::NotFound));
}

#[rstest]
fn replace_and_remove(page: Node) {
    let body = body(&page);
    let span = body.first_child().unwrap();
    let em = Node::element("em");
    let removed = body.replace_child(&em, &span).unwrap();
    assert_eq!(removed, span);
    assert!(span.parent().is_none());
    assert_eq!(body.first_child().as_ref(), Some(&em));
    body.remove_child(&em).unwrap();
    assert_eq!(body.remove_child(&em), Err(DomError::NotFound));
}

#[rstest]
fn fragments_insert_their_children() {
    let list = elem("ul").build();
    let frag = fragment().child(elem("li")).child(elem("li")).build();
    list.append_child(&frag).unwrap();
    assert_eq!(list.children().len(), 2);
    assert!(!frag.has_child_nodes());
}

#[rstest]
fn hierarchy_errors() {
    let outer = elem("div").child(elem("p")).build();
    let inner = outer.first_child().unwrap();
    assert!(matches!(inner.append_child(&outer), Err(DomError::HierarchyRequest(_))));
    assert!(matches!(outer.append_child(&Node::document()), Err(DomError::HierarchyRequest(_))));
    assert!(matches!(Node::text("x").append_child(&Node::text("y")), Err(DomError::HierarchyRequest(_))));
}

#[rstest]
fn deep_clone_copies_attributes_and_children() {
    let original = elem("div").attr(attr("class", "a")).child(elem("p").child(text("x"))).build();
    let copy = original.clone_node(true).unwrap();
    assert_ne!(copy, original);
    assert_eq!(copy.text_content(), "x");
    let copied_attr = copy.attributes()[0].clone();
    assert_eq!(copied_attr.owner_element().as_ref(), Some(&copy));
    copied_attr.set_value("b");
    assert_eq!(original.get_attribute("class").as_deref(), Some("a"));
    let shallow = original.clone_node(false).unwrap();
    assert!(!shallow.has_child_nodes());
}

#[rstest]
fn normalize_merges_text() {
    let p = elem("p")
        .child(text("a"))
        .child(text(""))
        .child(text("b"))
        .child(elem("br"))
        .child(text("c"))
        .build();
    p.normalize().unwrap();
    assert_eq!(p.children().len(), 3);
    assert_eq!(p.first_child().unwrap().data().as_deref(), Some("ab"));
}

#[rstest]
fn set_text_content_replaces_children(page: Node) {
    let body = body(&page);
    body.set_text_content("plain").unwrap();
    assert_eq!(body.children().len(), 1);
    assert_eq!(body.text_content(), "plain");
}

#[rstest]
fn namespace_lookups() {
    let d = doc()
        .child(
            elem("root")
                .attr(attr("xmlns", "urn:default"))
                .attr(attr("xmlns:x", "urn:x"))
                .child(elem("leaf")),
        )
        .build();
    let leaf = d.document_element().unwrap().first_child().unwrap();
    assert_eq!(leaf.lookup_namespace_uri(Some("x")).unwrap().as_deref(), Some("urn:x"));
    assert_eq!(leaf.lookup_namespace_uri(None).unwrap().as_deref(), Some("urn:default"));
    assert_eq!(leaf.lookup_prefix("urn:x").unwrap().as_deref(), Some("x"));
    assert!(leaf.is_default_namespace("urn:default").unwrap());
    assert!(leaf.lookup_namespace_uri(Some("nope")).unwrap().is_none());
}

#[rstest]
fn base_uri_comes_from_document() {
    let d = doc().base_uri("https://example.test/page").child(elem("html")).build();
    let html = d.document_element().unwrap();
    assert_eq!(html.base_uri().as_deref(), Some("https://example.test/page"));
    assert_eq!(Node::element("detached").base_uri(), None);
}

#[rstest]
fn processing_instruction_parts() {
    let node = pi("xml-stylesheet", "href='a.css'");
    assert_eq!(node.target(), Some("xml-stylesheet"));
    assert_eq!(node.data().as_deref(), Some("href='a.css'"));
}

#[rstest]
fn sibling_positions_survive_reordering(page: Node) {
    let body = body(&page);
    let span = body.first_child().unwrap();
    let div = body.last_child().unwrap();
    assert_eq!((span.index_in_parent(), div.index_in_parent()), (Some(0), Some(1)));

    let head = elem("header").build();
    body.insert_before(&head, Some(&span)).unwrap();
    assert_eq!(div.index_in_parent(), Some(2));
    assert_eq!(span.previous_sibling().as_ref(), Some(&head));
    assert_eq!(span.next_sibling().as_ref(), Some(&div));

    body.remove_child(&head).unwrap();
    assert_eq!(span.index_in_parent(), Some(0));
    assert!(span.previous_sibling().is_none());
    assert_eq!(div.previous_sibling().as_ref(), Some(&span));
    assert!(head.index_in_parent().is_none());
}

#[rstest]
fn wide_sibling_walk() {
    let mut list = elem("ol");
    for i in 0..3000 {
        list = list.child(elem("li").child(text(&i.to_string())));
    }
    let list = list.build();
    let mut seen = 0;
    let mut current = list.first_child();
    while let Some(node) = current {
        assert_eq!(node.index_in_parent(), Some(seen));
        seen += 1;
        current = node.next_sibling();
    }
    assert_eq!(seen, 3000);
}
