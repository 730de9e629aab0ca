use pest::Parser;
use pest::iterators::Pair;

use crate::runtime::Error;

pub mod ast;

use ast::{Axis, BinaryOp, Expr, NodeTest, PathStart, QName, Step};

#[derive(pest_derive::Parser)]
#[grammar = "xpath.pest"]
pub struct XPathParser;

/// Parses `input` into an expression tree.
pub fn parse_xpath(input: &str) -> Result<Expr, Error> {
    let mut pairs = XPathParser::parse(Rule::xpath, input).map_err(|e| Error::Parse(e.to_string()))?;
    let root = pairs.next().ok_or_else(|| Error::parse("empty parse tree"))?;
    let expr = root
        .into_inner()
        .find(|p| p.as_rule() == Rule::expr)
        .ok_or_else(|| Error::parse("missing expression"))?;
    build_expr(expr)
}

fn first_inner(pair: Pair<'_, Rule>) -> Result<Pair<'_, Rule>, Error> {
    let rule = pair.as_rule();
    pair.into_inner().next().ok_or_else(|| Error::parse(format!("empty {rule:?}")))
}

fn build_expr(pair: Pair<'_, Rule>) -> Result<Expr, Error> {
    match pair.as_rule() {
        Rule::expr | Rule::paren_expr => build_expr(first_inner(pair)?),
        Rule::or_expr
        | Rule::and_expr
        | Rule::equality_expr
        | Rule::relational_expr
        | Rule::additive_expr
        | Rule::multiplicative_expr => build_binary_chain(pair),
        Rule::unary_expr => {
            let mut negations = 0usize;
            let mut operand = None;
            for p in pair.into_inner() {
                if p.as_rule() == Rule::OP_NEG {
                    negations += 1;
                } else {
                    operand = Some(build_expr(p)?);
                }
            }
            let mut expr = operand.ok_or_else(|| Error::parse("missing operand"))?;
            for _ in 0..negations {
                expr = Expr::Negate(Box::new(expr));
            }
            Ok(expr)
        }
        Rule::union_expr => {
            let mut inner = pair.into_inner();
            let first = inner.next().ok_or_else(|| Error::parse("empty union"))?;
            let mut expr = build_expr(first)?;
            for p in inner {
                expr = Expr::Union(Box::new(expr), Box::new(build_expr(p)?));
            }
            Ok(expr)
        }
        Rule::path_expr | Rule::location_path | Rule::primary_expr => build_expr(first_inner(pair)?),
        Rule::filter_path => build_filter_path(pair),
        Rule::absolute_path => build_absolute_path(pair),
        Rule::relative_path => {
            Ok(Expr::Path { start: PathStart::Context, steps: build_relative_path(pair)? })
        }
        Rule::literal => {
            let inner = pair.into_inner().next().map(|p| p.as_str().to_string());
            Ok(Expr::Literal(inner.unwrap_or_default()))
        }
        Rule::number => {
            let text = pair.as_str();
            text.parse::<f64>()
                .map(Expr::Number)
                .map_err(|_| Error::parse(format!("invalid number literal '{text}'")))
        }
        Rule::variable_ref => Ok(Expr::VarRef(QName::parse(first_inner(pair)?.as_str()))),
        Rule::function_call => {
            let mut inner = pair.into_inner();
            let name = inner.next().ok_or_else(|| Error::parse("missing function name"))?;
            let args = inner.map(build_expr).collect::<Result<Vec<_>, _>>()?;
            Ok(Expr::FunctionCall { name: QName::parse(name.as_str().trim()), args })
        }
        other => Err(Error::parse(format!("unexpected rule {other:?}"))),
    }
}

fn binary_op(pair: &Pair<'_, Rule>) -> Result<BinaryOp, Error> {
    let token = pair.clone().into_inner().next().map_or(pair.as_rule(), |p| p.as_rule());
    Ok(match token {
        Rule::K_OR => BinaryOp::Or,
        Rule::K_AND => BinaryOp::And,
        Rule::OP_EQ => BinaryOp::Eq,
        Rule::OP_NE => BinaryOp::Ne,
        Rule::OP_LT => BinaryOp::Lt,
        Rule::OP_LE => BinaryOp::Le,
        Rule::OP_GT => BinaryOp::Gt,
        Rule::OP_GE => BinaryOp::Ge,
        Rule::OP_PLUS => BinaryOp::Add,
        Rule::OP_MINUS => BinaryOp::Sub,
        Rule::OP_MUL => BinaryOp::Mul,
        Rule::K_DIV => BinaryOp::Div,
        Rule::K_MOD => BinaryOp::Mod,
        other => return Err(Error::parse(format!("unexpected operator {other:?}"))),
    })
}

/// Left-associative `operand (op operand)*` chains.
fn build_binary_chain(pair: Pair<'_, Rule>) -> Result<Expr, Error> {
    let mut inner = pair.into_inner();
    let first = inner.next().ok_or_else(|| Error::parse("empty expression"))?;
    let mut expr = build_expr(first)?;
    while let Some(op_pair) = inner.next() {
        let op = binary_op(&op_pair)?;
        let right = inner.next().ok_or_else(|| Error::parse("missing right operand"))?;
        expr = Expr::Binary { left: Box::new(expr), op, right: Box::new(build_expr(right)?) };
    }
    Ok(expr)
}

fn build_filter_path(pair: Pair<'_, Rule>) -> Result<Expr, Error> {
    let mut inner = pair.into_inner();
    let filter = inner.next().ok_or_else(|| Error::parse("missing filter expression"))?;
    let mut filter_inner = filter.into_inner();
    let primary = filter_inner.next().ok_or_else(|| Error::parse("missing primary expression"))?;
    let primary = build_expr(primary)?;
    let predicates = filter_inner.map(build_predicate).collect::<Result<Vec<_>, _>>()?;
    let base = if predicates.is_empty() {
        primary
    } else {
        Expr::Filter { primary: Box::new(primary), predicates }
    };
    let Some(sep) = inner.next() else {
        return Ok(base);
    };
    let mut steps = Vec::new();
    if is_descendant_separator(&sep) {
        steps.push(Step::descendant_or_self_node());
    }
    let rest = inner.next().ok_or_else(|| Error::parse("missing path after '/'"))?;
    steps.extend(build_relative_path(rest)?);
    Ok(Expr::Path { start: PathStart::Filter(Box::new(base)), steps })
}

fn build_absolute_path(pair: Pair<'_, Rule>) -> Result<Expr, Error> {
    let mut steps = Vec::new();
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::descendant_root => steps.push(Step::descendant_or_self_node()),
            Rule::root => {}
            Rule::relative_path => steps.extend(build_relative_path(p)?),
            other => return Err(Error::parse(format!("unexpected rule {other:?}"))),
        }
    }
    Ok(Expr::Path { start: PathStart::Root, steps })
}

fn is_descendant_separator(pair: &Pair<'_, Rule>) -> bool {
    pair.clone().into_inner().next().is_some_and(|p| p.as_rule() == Rule::descendant_sep)
}

fn build_relative_path(pair: Pair<'_, Rule>) -> Result<Vec<Step>, Error> {
    let mut steps = Vec::new();
    for p in pair.into_inner() {
        match p.as_rule() {
            Rule::step => steps.push(build_step(p)?),
            Rule::path_sep => {
                if is_descendant_separator(&p) {
                    steps.push(Step::descendant_or_self_node());
                }
            }
            other => return Err(Error::parse(format!("unexpected rule {other:?}"))),
        }
    }
    Ok(steps)
}

fn build_step(pair: Pair<'_, Rule>) -> Result<Step, Error> {
    let inner = first_inner(pair)?;
    match inner.as_rule() {
        Rule::abbrev_step => {
            let axis = match first_inner(inner)?.as_rule() {
                Rule::parent_step => Axis::Parent,
                _ => Axis::SelfAxis,
            };
            Ok(Step { axis, test: NodeTest::Node, predicates: Vec::new() })
        }
        Rule::axis_step => {
            let mut axis = Axis::Child;
            let mut test = None;
            let mut predicates = Vec::new();
            for p in inner.into_inner() {
                match p.as_rule() {
                    Rule::axis_spec => axis = build_axis(p)?,
                    Rule::node_test => test = Some(build_node_test(p)?),
                    Rule::predicate => predicates.push(build_predicate(p)?),
                    other => return Err(Error::parse(format!("unexpected rule {other:?}"))),
                }
            }
            let test = test.ok_or_else(|| Error::parse("missing node test"))?;
            Ok(Step { axis, test, predicates })
        }
        other => Err(Error::parse(format!("unexpected rule {other:?}"))),
    }
}

fn build_axis(pair: Pair<'_, Rule>) -> Result<Axis, Error> {
    let inner = first_inner(pair)?;
    match inner.as_rule() {
        Rule::abbrev_attribute => Ok(Axis::Attribute),
        _ => Axis::from_name(inner.as_str().trim())
            .ok_or_else(|| Error::parse(format!("unknown axis '{}'", inner.as_str()))),
    }
}

fn build_node_test(pair: Pair<'_, Rule>) -> Result<NodeTest, Error> {
    let inner = first_inner(pair)?;
    match inner.as_rule() {
        Rule::kind_test => {
            let kind = first_inner(inner)?;
            match kind.as_rule() {
                Rule::pi_test => {
                    let target = kind
                        .into_inner()
                        .find(|p| p.as_rule() == Rule::literal)
                        .and_then(|lit| lit.into_inner().next())
                        .map(|p| p.as_str().to_string());
                    Ok(NodeTest::ProcessingInstruction(target))
                }
                _ => match kind.as_str().trim() {
                    "comment" => Ok(NodeTest::Comment),
                    "text" => Ok(NodeTest::Text),
                    "processing-instruction" => Ok(NodeTest::ProcessingInstruction(None)),
                    _ => Ok(NodeTest::Node),
                },
            }
        }
        Rule::name_test => {
            let name = first_inner(inner)?;
            match name.as_rule() {
                Rule::wildcard => Ok(NodeTest::AnyName),
                Rule::prefixed_wildcard => {
                    let prefix = name.as_str().trim_end_matches(":*");
                    Ok(NodeTest::NamespaceWildcard(prefix.to_string()))
                }
                _ => Ok(NodeTest::Name(QName::parse(name.as_str()))),
            }
        }
        other => Err(Error::parse(format!("unexpected rule {other:?}"))),
    }
}

fn build_predicate(pair: Pair<'_, Rule>) -> Result<Expr, Error> {
    build_expr(first_inner(pair)?)
}
