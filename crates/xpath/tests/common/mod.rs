//! Minimal arena tree with a navigator, enough to drive the engine in tests.
#![allow(dead_code)]

use std::convert::Infallible;
use std::rc::Rc;

use domxpath_xpath::{XPathNavigator, XPathNodeType};

pub enum Spec {
    Element { name: &'static str, attrs: Vec<(&'static str, &'static str)>, children: Vec<Spec> },
    Text(&'static str),
    Comment(&'static str),
    Pi(&'static str),
}

pub fn el(name: &'static str, attrs: &[(&'static str, &'static str)], children: Vec<Spec>) -> Spec {
    Spec::Element { name, attrs: attrs.to_vec(), children }
}

pub fn txt(s: &'static str) -> Spec {
    Spec::Text(s)
}

#[derive(Debug)]
enum Kind {
    Root,
    Element(&'static str),
    Text(&'static str),
    Comment(&'static str),
    Pi(&'static str),
}

#[derive(Debug)]
struct Rec {
    kind: Kind,
    parent: Option<usize>,
    children: Vec<usize>,
    attrs: Vec<(&'static str, &'static str)>,
}

#[derive(Debug)]
pub struct Tree {
    nodes: Vec<Rec>,
}

impl Tree {
    pub fn new(children: Vec<Spec>) -> Rc<Tree> {
        let mut tree = Tree { nodes: vec![Rec { kind: Kind::Root, parent: None, children: vec![], attrs: vec![] }] };
        for child in children {
            tree.add(0, child);
        }
        Rc::new(tree)
    }

    fn add(&mut self, parent: usize, spec: Spec) {
        let index = self.nodes.len();
        let (kind, attrs, children) = match spec {
            Spec::Element { name, attrs, children } => (Kind::Element(name), attrs, children),
            Spec::Text(s) => (Kind::Text(s), vec![], vec![]),
            Spec::Comment(s) => (Kind::Comment(s), vec![], vec![]),
            Spec::Pi(s) => (Kind::Pi(s), vec![], vec![]),
        };
        self.nodes.push(Rec { kind, parent: Some(parent), children: vec![], attrs });
        self.nodes[parent].children.push(index);
        for child in children {
            self.add(index, child);
        }
    }

    fn text(&self, index: usize, out: &mut String) {
        for &c in &self.nodes[index].children {
            match self.nodes[c].kind {
                Kind::Text(s) => out.push_str(s),
                Kind::Element(_) => self.text(c, out),
                _ => {}
            }
        }
    }
}

#[derive(Clone, Debug)]
pub struct TreeNav {
    tree: Rc<Tree>,
    node: usize,
    attr: Option<usize>,
}

impl TreeNav {
    pub fn new(tree: &Rc<Tree>) -> Self {
        Self { tree: Rc::clone(tree), node: 0, attr: None }
    }

    fn rec(&self) -> &Rec {
        &self.tree.nodes[self.node]
    }

    fn sibling(&self, offset: isize) -> Option<usize> {
        if self.attr.is_some() {
            return None;
        }
        let parent = self.rec().parent?;
        let siblings = &self.tree.nodes[parent].children;
        let at = siblings.iter().position(|&c| c == self.node)?;
        siblings.get(at.checked_add_signed(offset)?).copied()
    }
}

impl XPathNavigator for TreeNav {
    type Name = String;
    type Error = Infallible;

    fn node_type(&self) -> Result<XPathNodeType, Infallible> {
        Ok(match (self.attr, &self.rec().kind) {
            (Some(_), _) => XPathNodeType::Attribute,
            (None, Kind::Root | Kind::Element(_)) => XPathNodeType::Element,
            (None, Kind::Text(_)) => XPathNodeType::Text,
            (None, Kind::Comment(_)) => XPathNodeType::Comment,
            (None, Kind::Pi(_)) => XPathNodeType::ProcessingInstruction,
        })
    }

    fn local_name(&self) -> String {
        self.name()
    }

    fn name(&self) -> String {
        if let Some(i) = self.attr {
            return self.rec().attrs[i].0.to_string();
        }
        match self.rec().kind {
            Kind::Element(n) | Kind::Pi(n) => n.to_string(),
            _ => String::new(),
        }
    }

    fn namespace_uri(&self) -> String {
        String::new()
    }

    fn prefix(&self) -> String {
        String::new()
    }

    fn value(&self) -> Result<String, Infallible> {
        if let Some(i) = self.attr {
            return Ok(self.rec().attrs[i].1.to_string());
        }
        Ok(match self.rec().kind {
            Kind::Text(s) | Kind::Comment(s) => s.to_string(),
            Kind::Pi(_) => String::new(),
            Kind::Root | Kind::Element(_) => {
                let mut out = String::new();
                self.tree.text(self.node, &mut out);
                out
            }
        })
    }

    fn base_uri(&self) -> Option<String> {
        None
    }

    fn has_attributes(&self) -> bool {
        !self.rec().attrs.is_empty()
    }

    fn is_empty_element(&self) -> bool {
        self.rec().children.is_empty()
    }

    fn atomize(&self, s: &str) -> String {
        s.to_string()
    }

    fn move_to_first_child(&mut self) -> bool {
        let first = self.rec().children.first().copied();
        match (self.attr, first) {
            (None, Some(c)) => {
                self.node = c;
                true
            }
            _ => false,
        }
    }

    fn move_to_next(&mut self) -> bool {
        self.sibling(1).map(|s| self.node = s).is_some()
    }

    fn move_to_previous(&mut self) -> bool {
        self.sibling(-1).map(|s| self.node = s).is_some()
    }

    fn move_to_parent(&mut self) -> bool {
        if self.attr.take().is_some() {
            return true;
        }
        self.rec().parent.map(|p| self.node = p).is_some()
    }

    fn move_to_first_attribute(&mut self) -> bool {
        if self.attr.is_none() && self.has_attributes() {
            self.attr = Some(0);
            return true;
        }
        false
    }

    fn move_to_next_attribute(&mut self) -> bool {
        match self.attr {
            Some(i) if i + 1 < self.rec().attrs.len() => {
                self.attr = Some(i + 1);
                true
            }
            _ => false,
        }
    }

    fn move_to_id(&mut self, id: &str) -> bool {
        let hit = self.tree.nodes.iter().position(|r| r.attrs.iter().any(|&(n, v)| n == "id" && v == id));
        hit.map(|i| {
            self.node = i;
            self.attr = None;
        })
        .is_some()
    }

    fn move_to_root(&mut self) {
        self.node = 0;
        self.attr = None;
    }

    fn move_to(&mut self, other: &Self) -> bool {
        if !Rc::ptr_eq(&self.tree, &other.tree) {
            return false;
        }
        self.node = other.node;
        self.attr = other.attr;
        true
    }

    fn is_same_position(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.tree, &other.tree) && self.node == other.node && self.attr == other.attr
    }
}
