mod common;

use std::rc::Rc;

use common::{Spec, Tree, TreeNav, el, txt};
use domxpath_xpath::{Error, Value, XPathExpression, XPathNavigator, XPathNodeType};
use rstest::{fixture, rstest};

/// ```text
/// <html xml:lang="en">
///   <ol id="list"><li>First</li><li class="two" data-n="2">Second</li><li>Third</li></ol>
///   <!--note-->
///   <p id="p1">4</p><p id="p2">5.5</p>
///   <?render fast?>
/// </html>
/// ```
#[fixture]
fn tree() -> Rc<Tree> {
    Tree::new(vec![el(
        "html",
        &[("xml:lang", "en")],
        vec![
            el(
                "ol",
                &[("id", "list")],
                vec![
                    el("li", &[], vec![txt("First")]),
                    el("li", &[("class", "two"), ("data-n", "2")], vec![txt("Second")]),
                    el("li", &[], vec![txt("Third")]),
                ],
            ),
            Spec::Comment("note"),
            el("p", &[("id", "p1")], vec![txt("4")]),
            el("p", &[("id", "p2")], vec![txt("5.5")]),
            Spec::Pi("render"),
        ],
    )])
}

fn values(tree: &Rc<Tree>, expr: &str) -> Vec<String> {
    let expr = XPathExpression::compile(expr).unwrap();
    expr.select(&TreeNav::new(tree)).unwrap().map(|n| n.value().unwrap()).collect()
}

fn eval(tree: &Rc<Tree>, expr: &str) -> Value<TreeNav> {
    XPathExpression::compile(expr).unwrap().evaluate(&TreeNav::new(tree)).unwrap()
}

fn string(tree: &Rc<Tree>, expr: &str) -> String {
    eval(tree, expr).to_xpath_string().unwrap()
}

fn number(tree: &Rc<Tree>, expr: &str) -> f64 {
    eval(tree, expr).to_number().unwrap()
}

fn boolean(tree: &Rc<Tree>, expr: &str) -> bool {
    eval(tree, expr).to_boolean()
}

#[rstest]
fn descendant_elements_in_document_order(tree: Rc<Tree>) {
    assert_eq!(values(&tree, "//li"), ["First", "Second", "Third"]);
}

#[rstest]
#[case("//li[2]", &["Second"])]
#[case("//li[last()]", &["Third"])]
#[case("//li[position() > 1]", &["Second", "Third"])]
#[case("//li[@class]", &["Second"])]
#[case("//li[@class = 'two']", &["Second"])]
#[case("//li[not(@class)]", &["First", "Third"])]
#[case("//li[. = 'Third']", &["Third"])]
#[case("/html/ol/li[1]", &["First"])]
#[case("//ol/*[3]", &["Third"])]
#[case("(//li)[1]", &["First"])]
#[case("//li[2]/following-sibling::li", &["Third"])]
#[case("//li[3]/preceding-sibling::li[1]", &["Second"])]
#[case("//li[2]/..", &["FirstSecondThird"])]
#[case("//p[1]/preceding::li", &["First", "Second", "Third"])]
#[case("//p/preceding::li[1]", &["Third"])]
#[case("//li[1]/following::p", &["4", "5.5"])]
#[case("//comment()", &["note"])]
#[case("//p | //li[1]", &["First", "4", "5.5"])]
#[case("id('p2 list')", &["FirstSecondThird", "5.5"])]
#[case("//text()[. = 'Second']/ancestor::*[1]", &["Second"])]
fn node_set_queries(tree: Rc<Tree>, #[case] expr: &str, #[case] expected: &[&str]) {
    assert_eq!(values(&tree, expr), expected);
}

#[rstest]
fn attribute_axis_keeps_stored_order(tree: Rc<Tree>) {
    let expr = XPathExpression::compile("//li/@*").unwrap();
    let attrs: Vec<(String, XPathNodeType)> = expr
        .select(&TreeNav::new(&tree))
        .unwrap()
        .map(|n| (n.name(), n.node_type().unwrap()))
        .collect();
    assert_eq!(
        attrs,
        [("class".to_string(), XPathNodeType::Attribute), ("data-n".to_string(), XPathNodeType::Attribute)]
    );
}

#[rstest]
fn attributes_sort_before_children(tree: Rc<Tree>) {
    assert_eq!(values(&tree, "//ol/li[2] | //ol/@id | //ol"), ["FirstSecondThird", "list", "Second"]);
}

#[rstest]
fn attributes_have_no_children_or_siblings(tree: Rc<Tree>) {
    assert!(values(&tree, "//@class/node()").is_empty());
    assert!(values(&tree, "//@class/following-sibling::node()").is_empty());
    assert_eq!(values(&tree, "//@class/.."), ["Second"]);
    assert_eq!(values(&tree, "//@class/following::li"), ["Third"]);
}

#[rstest]
#[case("count(//li)", 3.0)]
#[case("sum(//p)", 9.5)]
#[case("string-length(//li[2])", 6.0)]
#[case("1 + 2 * 3", 7.0)]
#[case("7 mod 3", 1.0)]
#[case("-(3 div 2)", -1.5)]
#[case("floor(2.7) + ceiling(2.1)", 5.0)]
#[case("round(2.5)", 3.0)]
#[case("number(//li[2]/@data-n)", 2.0)]
#[case("count(//li[2]/@*)", 2.0)]
#[case("count(//node()[self::processing-instruction('render')])", 1.0)]
fn numeric_results(tree: Rc<Tree>, #[case] expr: &str, #[case] expected: f64) {
    assert_eq!(number(&tree, expr), expected);
}

#[rstest]
#[case("concat('a', //li[1], 'b')", "aFirstb")]
#[case("substring-before('2024-06', '-')", "2024")]
#[case("substring-after('2024-06', '-')", "06")]
#[case("substring('Second', 2, 3)", "eco")]
#[case("normalize-space('  a   b ')", "a b")]
#[case("translate('abc', 'ab', 'AB')", "ABc")]
#[case("local-name(//li[2]/@class)", "class")]
#[case("name(//*[@id='p1'])", "p")]
#[case("name(//comment())", "")]
#[case("string(//p[2])", "5.5")]
#[case("string(1 div 0)", "Infinity")]
#[case("string(0 div 0)", "NaN")]
#[case("string(//missing)", "")]
#[case("namespace-uri(//li[1])", "")]
fn string_results(tree: Rc<Tree>, #[case] expr: &str, #[case] expected: &str) {
    assert_eq!(string(&tree, expr), expected);
}

#[rstest]
#[case("//li = 'Second'", true)]
#[case("//li != 'Second'", true)]
#[case("//p > 5", true)]
#[case("//p > 6", false)]
#[case("5 < //p", true)]
#[case("//li = //p", false)]
#[case("//missing = ''", false)]
#[case("//li = true()", true)]
#[case("true() = 1", true)]
#[case("'1' = 1.0", true)]
#[case("starts-with('Second', 'Sec') and contains('Second', 'con')", true)]
#[case("false() or boolean(//li)", true)]
#[case("lang('en')", false)]
#[case("//li[1][lang('EN')]", true)]
#[case("//li[1][lang('en-us')]", false)]
fn boolean_results(tree: Rc<Tree>, #[case] expr: &str, #[case] expected: bool) {
    assert_eq!(boolean(&tree, expr), expected);
}

#[rstest]
fn select_requires_a_node_set(tree: Rc<Tree>) {
    let expr = XPathExpression::compile("count(//li)").unwrap();
    let err = expr.select(&TreeNav::new(&tree)).unwrap_err();
    assert!(matches!(err, Error::NotANodeSet));
    assert_eq!(err.code().as_str(), "err:XPTY0004");
}

#[rstest]
fn functions_reject_non_node_sets(tree: Rc<Tree>) {
    let expr = XPathExpression::compile("count('x')").unwrap();
    assert!(matches!(expr.evaluate(&TreeNav::new(&tree)), Err(Error::Type(_))));
}

#[rstest]
fn union_removes_duplicates(tree: Rc<Tree>) {
    assert_eq!(values(&tree, "//li | //li[2] | //ol/li"), ["First", "Second", "Third"]);
}

#[rstest]
fn context_node_is_the_starting_position(tree: Rc<Tree>) {
    let mut nav = TreeNav::new(&tree);
    assert!(nav.move_to_id("list"));
    let expr = XPathExpression::compile("li[2]").unwrap();
    let found: Vec<String> = expr.select(&nav).unwrap().map(|n| n.value().unwrap()).collect();
    assert_eq!(found, ["Second"]);
    let root = XPathExpression::compile("/").unwrap().select(&nav).unwrap().next().unwrap();
    assert!(!root.clone().move_to_parent());
}

#[rstest]
fn compiled_expressions_are_reusable(tree: Rc<Tree>) {
    let other = Tree::new(vec![el("li", &[], vec![txt("only")])]);
    let expr: XPathExpression = "//li".parse().unwrap();
    assert_eq!(expr.select(&TreeNav::new(&tree)).unwrap().len(), 3);
    assert_eq!(expr.select(&TreeNav::new(&other)).unwrap().len(), 1);
    assert_eq!(expr.source(), "//li");
}

#[rstest]
fn sibling_position_counts_preceding_siblings(tree: Rc<Tree>) {
    let mut nav = TreeNav::new(&tree);
    assert!(nav.move_to_id("list"));
    assert_eq!(nav.sibling_position(), 0);
    assert!(nav.move_to_first_child());
    assert_eq!(nav.sibling_position(), 0);
    assert!(nav.move_to_next() && nav.move_to_next());
    assert_eq!(nav.sibling_position(), 2);
}

#[rstest]
#[case("//li/@*", &["two", "2"])]
#[case("//li/self::li", &["First", "Second", "Third"])]
#[case("//p/@id | //ol/@id", &["list", "p1", "p2"])]
fn self_and_attribute_steps_keep_document_order(tree: Rc<Tree>, #[case] expr: &str, #[case] expected: &[&str]) {
    assert_eq!(values(&tree, expr), expected);
}
