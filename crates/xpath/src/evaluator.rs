use std::cell::RefCell;
use std::collections::HashMap;

use smallvec::SmallVec;

use crate::compiler::{Compiled, CompiledStep, CompiledTest, Start};
use crate::functions::{number_to_string, parse_number};
use crate::model::{XPathNavigator, XPathNodeType};
use crate::parser::ast::{Axis, BinaryOp};
use crate::runtime::Error;

/// Result of evaluating an expression. Node-sets are in document order and
/// free of duplicates; each node is a navigator positioned on it.
#[derive(Debug, Clone)]
pub enum Value<N> {
    NodeSet(Vec<N>),
    Boolean(bool),
    Number(f64),
    String(String),
}

impl<N> Value<N> {
    pub fn is_node_set(&self) -> bool {
        matches!(self, Value::NodeSet(_))
    }

    pub fn into_nodes(self) -> Option<Vec<N>> {
        match self {
            Value::NodeSet(nodes) => Some(nodes),
            _ => None,
        }
    }
}

impl<N: XPathNavigator> Value<N> {
    /// `boolean()` conversion.
    pub fn to_boolean(&self) -> bool {
        match self {
            Value::NodeSet(nodes) => !nodes.is_empty(),
            Value::Boolean(b) => *b,
            Value::Number(n) => *n != 0.0 && !n.is_nan(),
            Value::String(s) => !s.is_empty(),
        }
    }

    /// `number()` conversion.
    pub fn to_number(&self) -> Result<f64, Error> {
        Ok(match self {
            Value::NodeSet(_) => parse_number(&self.to_xpath_string()?),
            Value::Boolean(b) => f64::from(u8::from(*b)),
            Value::Number(n) => *n,
            Value::String(s) => parse_number(s),
        })
    }

    /// `string()` conversion; a node-set yields the string-value of its first node.
    pub fn to_xpath_string(&self) -> Result<String, Error> {
        Ok(match self {
            Value::NodeSet(nodes) => match nodes.first() {
                Some(node) => string_value(node)?,
                None => String::new(),
            },
            Value::Boolean(b) => b.to_string(),
            Value::Number(n) => number_to_string(*n),
            Value::String(s) => s.clone(),
        })
    }
}

pub(crate) fn string_value<N: XPathNavigator>(node: &N) -> Result<String, Error> {
    node.value().map_err(Error::navigation)
}

fn node_type<N: XPathNavigator>(node: &N) -> Result<XPathNodeType, Error> {
    node.node_type().map_err(Error::navigation)
}

/// Position of a node in document order: one `(1, sibling index)` pair per
/// level from the root, plus `(0, attribute index)` for attributes, so that
/// attributes sort after their element and before its children.
type OrderKey = SmallVec<[(u8, usize); 8]>;

fn order_key<N: XPathNavigator>(node: &N) -> Result<OrderKey, Error> {
    let mut key = OrderKey::new();
    let mut current = node.clone();
    if node_type(node)? == XPathNodeType::Attribute {
        current.move_to_parent();
        key.push((0, attribute_index(&current, node)));
    }
    loop {
        key.push((1, current.sibling_position()));
        if !current.move_to_parent() {
            break;
        }
    }
    key.reverse();
    Ok(key)
}

fn attribute_index<N: XPathNavigator>(owner: &N, attribute: &N) -> usize {
    let (name, namespace) = (attribute.name(), attribute.namespace_uri());
    let mut cursor = owner.clone();
    if !cursor.move_to_first_attribute() {
        return usize::MAX;
    }
    let mut index = 0;
    loop {
        if cursor.name() == name && cursor.namespace_uri() == namespace {
            return index;
        }
        if !cursor.move_to_next_attribute() {
            return usize::MAX;
        }
        index += 1;
    }
}

/// Sorts navigators into document order and drops duplicate positions.
pub(crate) fn sort_document_order<N: XPathNavigator>(nodes: Vec<N>) -> Result<Vec<N>, Error> {
    if nodes.len() < 2 {
        return Ok(nodes);
    }
    let mut keyed = nodes
        .into_iter()
        .map(|n| Ok((order_key(&n)?, n)))
        .collect::<Result<Vec<_>, Error>>()?;
    keyed.sort_by(|a, b| a.0.cmp(&b.0));
    keyed.dedup_by(|a, b| a.0 == b.0);
    Ok(keyed.into_iter().map(|(_, n)| n).collect())
}

pub(crate) struct Context<'a, N> {
    pub node: &'a N,
    pub position: usize,
    pub size: usize,
}

/// Evaluates one compiled expression. Names used by node tests are interned
/// once per evaluation in the context navigator's name table.
pub(crate) struct Evaluator<N: XPathNavigator> {
    names: RefCell<HashMap<String, N::Name>>,
}

impl<N: XPathNavigator> Evaluator<N> {
    pub(crate) fn new() -> Self {
        Self { names: RefCell::new(HashMap::new()) }
    }

    pub(crate) fn run(&self, expr: &Compiled, context: &N) -> Result<Value<N>, Error> {
        self.eval(expr, &Context { node: context, position: 1, size: 1 })
    }

    pub(crate) fn eval(&self, expr: &Compiled, ctx: &Context<'_, N>) -> Result<Value<N>, Error> {
        match expr {
            Compiled::Number(n) => Ok(Value::Number(*n)),
            Compiled::Literal(s) => Ok(Value::String(s.clone())),
            Compiled::Negate(inner) => Ok(Value::Number(-self.number_of(&self.eval(inner, ctx)?)?)),
            Compiled::Binary { left, op, right } => self.binary(left, *op, right, ctx),
            Compiled::Union(a, b) => {
                let mut nodes = self.nodes(a, ctx, "|")?;
                nodes.extend(self.nodes(b, ctx, "|")?);
                Ok(Value::NodeSet(sort_document_order(nodes)?))
            }
            Compiled::Filter { primary, predicates } => {
                let mut nodes = self.nodes(primary, ctx, "a predicate")?;
                for predicate in predicates {
                    nodes = self.filter(nodes, predicate)?;
                }
                Ok(Value::NodeSet(nodes))
            }
            Compiled::Path { start, steps } => {
                let mut nodes = match start {
                    Start::Root => {
                        let mut root = ctx.node.clone();
                        root.move_to_root();
                        vec![root]
                    }
                    Start::Context => vec![ctx.node.clone()],
                    Start::Filter(e) => self.nodes(e, ctx, "'/'")?,
                };
                for step in steps {
                    nodes = self.step(&nodes, step)?;
                }
                Ok(Value::NodeSet(nodes))
            }
            Compiled::Call { function, args } => self.call(*function, args, ctx),
        }
    }

    fn nodes(&self, expr: &Compiled, ctx: &Context<'_, N>, usage: &str) -> Result<Vec<N>, Error> {
        match self.eval(expr, ctx)? {
            Value::NodeSet(nodes) => Ok(nodes),
            _ => Err(Error::Type(format!("operand of {usage} is not a node-set"))),
        }
    }

    pub(crate) fn boolean_of(&self, value: &Value<N>) -> Result<bool, Error> {
        Ok(value.to_boolean())
    }

    pub(crate) fn number_of(&self, value: &Value<N>) -> Result<f64, Error> {
        value.to_number()
    }

    pub(crate) fn string_of(&self, value: &Value<N>) -> Result<String, Error> {
        value.to_xpath_string()
    }

    fn atom(&self, node: &N, s: &str) -> N::Name {
        if let Some(name) = self.names.borrow().get(s) {
            return name.clone();
        }
        let name = node.atomize(s);
        self.names.borrow_mut().insert(s.to_string(), name.clone());
        name
    }

    fn binary(&self, left: &Compiled, op: BinaryOp, right: &Compiled, ctx: &Context<'_, N>) -> Result<Value<N>, Error> {
        match op {
            BinaryOp::Or => {
                let l = self.boolean_of(&self.eval(left, ctx)?)?;
                Ok(Value::Boolean(l || self.boolean_of(&self.eval(right, ctx)?)?))
            }
            BinaryOp::And => {
                let l = self.boolean_of(&self.eval(left, ctx)?)?;
                Ok(Value::Boolean(l && self.boolean_of(&self.eval(right, ctx)?)?))
            }
            BinaryOp::Eq | BinaryOp::Ne | BinaryOp::Lt | BinaryOp::Le | BinaryOp::Gt | BinaryOp::Ge => {
                let l = self.eval(left, ctx)?;
                let r = self.eval(right, ctx)?;
                Ok(Value::Boolean(self.compare(op, &l, &r)?))
            }
            BinaryOp::Add | BinaryOp::Sub | BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => {
                let l = self.number_of(&self.eval(left, ctx)?)?;
                let r = self.number_of(&self.eval(right, ctx)?)?;
                Ok(Value::Number(match op {
                    BinaryOp::Add => l + r,
                    BinaryOp::Sub => l - r,
                    BinaryOp::Mul => l * r,
                    BinaryOp::Div => l / r,
                    _ => l % r,
                }))
            }
        }
    }

    /// Comparison with node-set existential semantics.
    fn compare(&self, op: BinaryOp, left: &Value<N>, right: &Value<N>) -> Result<bool, Error> {
        match (left, right) {
            (Value::NodeSet(a), Value::NodeSet(b)) => {
                let rights = b.iter().map(string_value).collect::<Result<Vec<_>, _>>()?;
                for node in a {
                    let l = Value::<N>::String(string_value(node)?);
                    for r in &rights {
                        if compare_atomic(op, &l, &Value::String(r.clone()))? {
                            return Ok(true);
                        }
                    }
                }
                Ok(false)
            }
            (Value::NodeSet(nodes), other) => self.compare_node_set(op, nodes, other),
            (other, Value::NodeSet(nodes)) => self.compare_node_set(flip(op), nodes, other),
            (l, r) => compare_atomic(op, l, r),
        }
    }

    fn compare_node_set(&self, op: BinaryOp, nodes: &[N], other: &Value<N>) -> Result<bool, Error> {
        if let Value::Boolean(_) = other {
            return compare_atomic(op, &Value::Boolean(!nodes.is_empty()), other);
        }
        for node in nodes {
            let s = string_value(node)?;
            let l = match other {
                Value::Number(_) => Value::Number(parse_number(&s)),
                _ => Value::String(s),
            };
            if compare_atomic(op, &l, other)? {
                return Ok(true);
            }
        }
        Ok(false)
    }

    fn step(&self, nodes: &[N], step: &CompiledStep) -> Result<Vec<N>, Error> {
        let principal = match step.axis {
            Axis::Attribute => XPathNodeType::Attribute,
            _ => XPathNodeType::Element,
        };
        let mut result = Vec::new();
        for node in nodes {
            let mut selected = Vec::new();
            for candidate in axis_nodes(node, step.axis)? {
                if self.test(&candidate, &step.test, principal)? {
                    selected.push(candidate);
                }
            }
            for predicate in &step.predicates {
                selected = self.filter(selected, predicate)?;
            }
            result.extend(selected);
        }
        // Self and attribute steps keep the order of an ordered input.
        let keeps_order = matches!(step.axis, Axis::SelfAxis | Axis::Attribute);
        if (nodes.len() > 1 && !keeps_order) || step.axis.is_reverse() {
            result = sort_document_order(result)?;
        }
        Ok(result)
    }

    fn test(&self, node: &N, test: &CompiledTest, principal: XPathNodeType) -> Result<bool, Error> {
        let kind = node_type(node)?;
        Ok(match test {
            CompiledTest::Node => true,
            CompiledTest::Text => kind == XPathNodeType::Text,
            CompiledTest::Comment => kind == XPathNodeType::Comment,
            CompiledTest::ProcessingInstruction(target) => {
                kind == XPathNodeType::ProcessingInstruction
                    && target.as_deref().is_none_or(|t| node.name().as_ref() == t)
            }
            CompiledTest::AnyName => kind == principal,
            CompiledTest::Namespace(ns) => kind == principal && node.namespace_uri() == self.atom(node, ns),
            CompiledTest::Name { local, namespace } => {
                kind == principal
                    && node.local_name() == self.atom(node, local)
                    && node.namespace_uri() == self.atom(node, namespace)
            }
        })
    }

    /// Applies a predicate; `nodes` must be in axis order.
    fn filter(&self, nodes: Vec<N>, predicate: &Compiled) -> Result<Vec<N>, Error> {
        let size = nodes.len();
        let mut kept = Vec::with_capacity(size);
        for (i, node) in nodes.into_iter().enumerate() {
            let position = i + 1;
            let keep = {
                let ctx = Context { node: &node, position, size };
                match self.eval(predicate, &ctx)? {
                    Value::Number(n) => n == position as f64,
                    other => self.boolean_of(&other)?,
                }
            };
            if keep {
                kept.push(node);
            }
        }
        Ok(kept)
    }
}

fn flip(op: BinaryOp) -> BinaryOp {
    match op {
        BinaryOp::Lt => BinaryOp::Gt,
        BinaryOp::Le => BinaryOp::Ge,
        BinaryOp::Gt => BinaryOp::Lt,
        BinaryOp::Ge => BinaryOp::Le,
        other => other,
    }
}

/// Comparison of two values neither of which is a node-set.
fn compare_atomic<N: XPathNavigator>(op: BinaryOp, l: &Value<N>, r: &Value<N>) -> Result<bool, Error> {
    match op {
        BinaryOp::Eq | BinaryOp::Ne => {
            let equal = match (l, r) {
                (Value::Boolean(_), _) | (_, Value::Boolean(_)) => l.to_boolean() == r.to_boolean(),
                (Value::Number(_), _) | (_, Value::Number(_)) => l.to_number()? == r.to_number()?,
                _ => l.to_xpath_string()? == r.to_xpath_string()?,
            };
            Ok(if op == BinaryOp::Eq { equal } else { !equal })
        }
        _ => {
            let (a, b) = (l.to_number()?, r.to_number()?);
            Ok(match op {
                BinaryOp::Lt => a < b,
                BinaryOp::Le => a <= b,
                BinaryOp::Gt => a > b,
                _ => a >= b,
            })
        }
    }
}

/// Nodes on `axis` from `node`, in axis order (reverse axes nearest first).
fn axis_nodes<N: XPathNavigator>(node: &N, axis: Axis) -> Result<Vec<N>, Error> {
    let on_attribute = node_type(node)? == XPathNodeType::Attribute;
    let mut out = Vec::new();
    match axis {
        Axis::SelfAxis => out.push(node.clone()),
        Axis::Child => {
            if !on_attribute {
                let mut child = node.clone();
                if child.move_to_first_child() {
                    out.push(child.clone());
                    while child.move_to_next() {
                        out.push(child.clone());
                    }
                }
            }
        }
        Axis::Descendant => {
            if !on_attribute {
                descendants(node, &mut out);
            }
        }
        Axis::DescendantOrSelf => {
            out.push(node.clone());
            if !on_attribute {
                descendants(node, &mut out);
            }
        }
        Axis::Parent => {
            let mut parent = node.clone();
            if parent.move_to_parent() {
                out.push(parent);
            }
        }
        Axis::Ancestor | Axis::AncestorOrSelf => {
            if axis == Axis::AncestorOrSelf {
                out.push(node.clone());
            }
            let mut ancestor = node.clone();
            while ancestor.move_to_parent() {
                out.push(ancestor.clone());
            }
        }
        Axis::FollowingSibling => {
            if !on_attribute {
                let mut sibling = node.clone();
                while sibling.move_to_next() {
                    out.push(sibling.clone());
                }
            }
        }
        Axis::PrecedingSibling => {
            if !on_attribute {
                let mut sibling = node.clone();
                while sibling.move_to_previous() {
                    out.push(sibling.clone());
                }
            }
        }
        Axis::Following => {
            let mut current = node.clone();
            if on_attribute {
                current.move_to_parent();
                descendants(&current, &mut out);
            }
            loop {
                let mut sibling = current.clone();
                while sibling.move_to_next() {
                    out.push(sibling.clone());
                    descendants(&sibling, &mut out);
                }
                if !current.move_to_parent() {
                    break;
                }
            }
        }
        Axis::Preceding => {
            let mut current = node.clone();
            if on_attribute {
                current.move_to_parent();
            }
            loop {
                let mut sibling = current.clone();
                while sibling.move_to_previous() {
                    let mut subtree = Vec::new();
                    descendants(&sibling, &mut subtree);
                    out.extend(subtree.into_iter().rev());
                    out.push(sibling.clone());
                }
                if !current.move_to_parent() {
                    break;
                }
            }
        }
        Axis::Attribute => {
            let mut attribute = node.clone();
            if !on_attribute && attribute.move_to_first_attribute() {
                out.push(attribute.clone());
                while attribute.move_to_next_attribute() {
                    out.push(attribute.clone());
                }
            }
        }
        Axis::Namespace => {}
    }
    Ok(out)
}

/// Pre-order walk of the subtree below `start`, excluding `start`.
fn descendants<N: XPathNavigator>(start: &N, out: &mut Vec<N>) {
    let mut current = start.clone();
    if !current.move_to_first_child() {
        return;
    }
    let mut depth = 1usize;
    loop {
        out.push(current.clone());
        if current.move_to_first_child() {
            depth += 1;
            continue;
        }
        loop {
            if current.move_to_next() {
                break;
            }
            depth -= 1;
            if depth == 0 || !current.move_to_parent() {
                return;
            }
        }
    }
}
