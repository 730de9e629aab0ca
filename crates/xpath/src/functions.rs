//! XPath 1.0 core function library.

use crate::compiler::Compiled;
use crate::evaluator::{Context, Evaluator, Value, sort_document_order, string_value};
use crate::model::{XML_NAMESPACE, XPathNavigator, XPathNodeType};
use crate::runtime::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub(crate) enum Function {
    Last,
    Position,
    Count,
    Id,
    LocalName,
    NamespaceUri,
    Name,
    String,
    Concat,
    StartsWith,
    Contains,
    SubstringBefore,
    SubstringAfter,
    Substring,
    StringLength,
    NormalizeSpace,
    Translate,
    Boolean,
    Not,
    True,
    False,
    Lang,
    Number,
    Sum,
    Floor,
    Ceiling,
    Round,
}

impl Function {
    /// Binds a function name and argument count to the library.
    pub(crate) fn resolve(name: &str, arity: usize) -> Option<Self> {
        let (function, min, max) = match name {
            "last" => (Function::Last, 0, Some(0)),
            "position" => (Function::Position, 0, Some(0)),
            "count" => (Function::Count, 1, Some(1)),
            "id" => (Function::Id, 1, Some(1)),
            "local-name" => (Function::LocalName, 0, Some(1)),
            "namespace-uri" => (Function::NamespaceUri, 0, Some(1)),
            "name" => (Function::Name, 0, Some(1)),
            "string" => (Function::String, 0, Some(1)),
            "concat" => (Function::Concat, 2, None),
            "starts-with" => (Function::StartsWith, 2, Some(2)),
            "contains" => (Function::Contains, 2, Some(2)),
            "substring-before" => (Function::SubstringBefore, 2, Some(2)),
            "substring-after" => (Function::SubstringAfter, 2, Some(2)),
            "substring" => (Function::Substring, 2, Some(3)),
            "string-length" => (Function::StringLength, 0, Some(1)),
            "normalize-space" => (Function::NormalizeSpace, 0, Some(1)),
            "translate" => (Function::Translate, 3, Some(3)),
            "boolean" => (Function::Boolean, 1, Some(1)),
            "not" => (Function::Not, 1, Some(1)),
            "true" => (Function::True, 0, Some(0)),
            "false" => (Function::False, 0, Some(0)),
            "lang" => (Function::Lang, 1, Some(1)),
            "number" => (Function::Number, 0, Some(1)),
            "sum" => (Function::Sum, 1, Some(1)),
            "floor" => (Function::Floor, 1, Some(1)),
            "ceiling" => (Function::Ceiling, 1, Some(1)),
            "round" => (Function::Round, 1, Some(1)),
            _ => return None,
        };
        (arity >= min && max.is_none_or(|m| arity <= m)).then_some(function)
    }
}

impl<N: XPathNavigator> Evaluator<N> {
    pub(crate) fn call(&self, function: Function, args: &[Compiled], ctx: &Context<'_, N>) -> Result<Value<N>, Error> {
        let arg = |i: usize| self.eval(&args[i], ctx);
        let string_arg = |i: usize| -> Result<String, Error> { self.string_of(&arg(i)?) };
        // Optional single argument defaulting to the context node.
        let node_arg = |name: &str| -> Result<Option<N>, Error> {
            match args.first() {
                None => Ok(Some(ctx.node.clone())),
                Some(a) => match self.eval(a, ctx)? {
                    Value::NodeSet(nodes) => Ok(nodes.into_iter().next()),
                    _ => Err(Error::Type(format!("{name}() expects a node-set"))),
                },
            }
        };
        let string_or_context = || -> Result<String, Error> {
            match args.first() {
                Some(_) => string_arg(0),
                None => string_value(ctx.node),
            }
        };

        Ok(match function {
            Function::Last => Value::Number(ctx.size as f64),
            Function::Position => Value::Number(ctx.position as f64),
            Function::Count => Value::Number(self.node_set(arg(0)?, "count")?.len() as f64),
            Function::Id => Value::NodeSet(self.id(arg(0)?, ctx)?),
            Function::LocalName => Value::String(
                node_arg("local-name")?
                    .map(|n| expanded_name_part(&n, |n| n.local_name()))
                    .transpose()?
                    .unwrap_or_default(),
            ),
            Function::NamespaceUri => Value::String(
                node_arg("namespace-uri")?
                    .map(|n| expanded_name_part(&n, |n| n.namespace_uri()))
                    .transpose()?
                    .unwrap_or_default(),
            ),
            Function::Name => Value::String(
                node_arg("name")?
                    .map(|n| expanded_name_part(&n, |n| n.name()))
                    .transpose()?
                    .unwrap_or_default(),
            ),
            Function::String => Value::String(string_or_context()?),
            Function::Concat => {
                let mut out = String::new();
                for i in 0..args.len() {
                    out.push_str(&string_arg(i)?);
                }
                Value::String(out)
            }
            Function::StartsWith => Value::Boolean(string_arg(0)?.starts_with(&string_arg(1)?)),
            Function::Contains => Value::Boolean(string_arg(0)?.contains(&string_arg(1)?)),
            Function::SubstringBefore => {
                let (s, pat) = (string_arg(0)?, string_arg(1)?);
                Value::String(s.find(&pat).map(|i| s[..i].to_string()).unwrap_or_default())
            }
            Function::SubstringAfter => {
                let (s, pat) = (string_arg(0)?, string_arg(1)?);
                Value::String(s.find(&pat).map(|i| s[i + pat.len()..].to_string()).unwrap_or_default())
            }
            Function::Substring => {
                let s = string_arg(0)?;
                let start = self.number_of(&arg(1)?)?;
                let length = match args.get(2) {
                    Some(a) => Some(self.number_of(&self.eval(a, ctx)?)?),
                    None => None,
                };
                Value::String(substring(&s, start, length))
            }
            Function::StringLength => Value::Number(string_or_context()?.chars().count() as f64),
            Function::NormalizeSpace => Value::String(normalize_space(&string_or_context()?)),
            Function::Translate => Value::String(translate(&string_arg(0)?, &string_arg(1)?, &string_arg(2)?)),
            Function::Boolean => Value::Boolean(self.boolean_of(&arg(0)?)?),
            Function::Not => Value::Boolean(!self.boolean_of(&arg(0)?)?),
            Function::True => Value::Boolean(true),
            Function::False => Value::Boolean(false),
            Function::Lang => Value::Boolean(lang(ctx.node, &string_arg(0)?)?),
            Function::Number => Value::Number(match args.first() {
                Some(_) => self.number_of(&arg(0)?)?,
                None => parse_number(&string_value(ctx.node)?),
            }),
            Function::Sum => {
                let mut total = 0.0;
                for node in self.node_set(arg(0)?, "sum")? {
                    total += parse_number(&string_value(&node)?);
                }
                Value::Number(total)
            }
            Function::Floor => Value::Number(self.number_of(&arg(0)?)?.floor()),
            Function::Ceiling => Value::Number(self.number_of(&arg(0)?)?.ceil()),
            Function::Round => Value::Number(round(self.number_of(&arg(0)?)?)),
        })
    }

    fn node_set(&self, value: Value<N>, function: &str) -> Result<Vec<N>, Error> {
        match value {
            Value::NodeSet(nodes) => Ok(nodes),
            _ => Err(Error::Type(format!("{function}() expects a node-set"))),
        }
    }

    /// Elements whose identifier matches any whitespace-separated token.
    fn id(&self, value: Value<N>, ctx: &Context<'_, N>) -> Result<Vec<N>, Error> {
        let mut tokens = Vec::new();
        match &value {
            Value::NodeSet(nodes) => {
                for node in nodes {
                    let s = string_value(node)?;
                    tokens.extend(s.split_ascii_whitespace().map(str::to_string));
                }
            }
            other => {
                let s = self.string_of(other)?;
                tokens.extend(s.split_ascii_whitespace().map(str::to_string));
            }
        }
        let mut found = Vec::new();
        for token in tokens {
            let mut nav = ctx.node.clone();
            if nav.move_to_id(&token) {
                found.push(nav);
            }
        }
        sort_document_order(found)
    }
}

/// Name parts are empty for nodes without an expanded name.
fn expanded_name_part<N: XPathNavigator>(node: &N, part: impl Fn(&N) -> N::Name) -> Result<String, Error> {
    let kind = node.node_type().map_err(Error::navigation)?;
    Ok(match kind {
        XPathNodeType::Element | XPathNodeType::Attribute | XPathNodeType::ProcessingInstruction => {
            part(node).as_ref().to_string()
        }
        XPathNodeType::Text | XPathNodeType::Comment => String::new(),
    })
}

/// Nearest `xml:lang` on the ancestor-or-self axis, compared case-insensitively
/// with sub-language suffixes allowed.
fn lang<N: XPathNavigator>(node: &N, wanted: &str) -> Result<bool, Error> {
    let mut nav = node.clone();
    if nav.node_type().map_err(Error::navigation)? == XPathNodeType::Attribute {
        nav.move_to_parent();
    }
    loop {
        let mut attr = nav.clone();
        if attr.move_to_first_attribute() {
            loop {
                let qualified = attr.name().as_ref() == "xml:lang";
                let namespaced =
                    attr.local_name().as_ref() == "lang" && attr.namespace_uri().as_ref() == XML_NAMESPACE;
                if qualified || namespaced {
                    let value = attr.value().map_err(Error::navigation)?.to_ascii_lowercase();
                    let wanted = wanted.to_ascii_lowercase();
                    return Ok(value == wanted
                        || value.strip_prefix(&wanted).is_some_and(|rest| rest.starts_with('-')));
                }
                if !attr.move_to_next_attribute() {
                    break;
                }
            }
        }
        if !nav.move_to_parent() {
            return Ok(false);
        }
    }
}

pub(crate) fn is_xml_space(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\r' | '\n')
}

/// `number()` conversion of a string: optional minus, digits with an optional
/// fraction, surrounded by whitespace. Anything else is NaN.
pub(crate) fn parse_number(s: &str) -> f64 {
    let t = s.trim_matches(is_xml_space);
    let digits = t.strip_prefix('-').unwrap_or(t);
    let mut seen_digit = false;
    let mut seen_dot = false;
    for c in digits.chars() {
        match c {
            '0'..='9' => seen_digit = true,
            '.' if !seen_dot => seen_dot = true,
            _ => return f64::NAN,
        }
    }
    if !seen_digit {
        return f64::NAN;
    }
    t.parse().unwrap_or(f64::NAN)
}

pub(crate) fn number_to_string(n: f64) -> String {
    if n.is_nan() {
        "NaN".to_string()
    } else if n.is_infinite() {
        let text = if n > 0.0 { "Infinity" } else { "-Infinity" };
        text.to_string()
    } else if n == 0.0 {
        "0".to_string()
    } else {
        format!("{n}")
    }
}

fn round(n: f64) -> f64 {
    if n.is_nan() || n.is_infinite() {
        return n;
    }
    if (-0.5..0.0).contains(&n) {
        return -0.0;
    }
    (n + 0.5).floor()
}

fn substring(s: &str, start: f64, length: Option<f64>) -> String {
    let first = round(start);
    let end = length.map_or(f64::INFINITY, |l| first + round(l));
    s.chars()
        .enumerate()
        .filter(|(i, _)| {
            let position = (*i + 1) as f64;
            position >= first && position < end
        })
        .map(|(_, c)| c)
        .collect()
}

fn normalize_space(s: &str) -> String {
    s.split(is_xml_space).filter(|w| !w.is_empty()).collect::<Vec<_>>().join(" ")
}

fn translate(s: &str, from: &str, to: &str) -> String {
    let from: Vec<char> = from.chars().collect();
    let to: Vec<char> = to.chars().collect();
    s.chars()
        .filter_map(|c| match from.iter().position(|&f| f == c) {
            Some(i) => to.get(i).copied(),
            None => Some(c),
        })
        .collect()
}
