//! Lowers the parser AST into an evaluation tree: namespace prefixes are
//! resolved, function names are bound to the core library, and variables are
//! rejected (no variable bindings exist).

use crate::functions::Function;
use crate::model::{NamespaceManager, NamespaceResolver};
use crate::parser::ast::{Axis, BinaryOp, Expr, NodeTest, PathStart, QName, Step};
use crate::runtime::Error;

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Compiled {
    Number(f64),
    Literal(String),
    Negate(Box<Compiled>),
    Binary { left: Box<Compiled>, op: BinaryOp, right: Box<Compiled> },
    Union(Box<Compiled>, Box<Compiled>),
    Filter { primary: Box<Compiled>, predicates: Vec<Compiled> },
    Path { start: Start, steps: Vec<CompiledStep> },
    Call { function: Function, args: Vec<Compiled> },
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) enum Start {
    Root,
    Context,
    Filter(Box<Compiled>),
}

#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CompiledStep {
    pub axis: Axis,
    pub test: CompiledTest,
    pub predicates: Vec<Compiled>,
}

/// Node test with its namespace already resolved. Unprefixed names belong to
/// the empty namespace.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum CompiledTest {
    AnyName,
    Namespace(String),
    Name { local: String, namespace: String },
    Node,
    Text,
    Comment,
    ProcessingInstruction(Option<String>),
}

pub(crate) fn compile(expr: &Expr, resolver: Option<&dyn NamespaceResolver>) -> Result<Compiled, Error> {
    let fallback = NamespaceManager::new();
    let compiler = Compiler { resolver: resolver.unwrap_or(&fallback) };
    compiler.expr(expr)
}

struct Compiler<'a> {
    resolver: &'a dyn NamespaceResolver,
}

impl Compiler<'_> {
    fn expr(&self, expr: &Expr) -> Result<Compiled, Error> {
        Ok(match expr {
            Expr::Number(n) => Compiled::Number(*n),
            Expr::Literal(s) => Compiled::Literal(s.clone()),
            Expr::VarRef(name) => return Err(Error::UndefinedVariable(name.to_string())),
            Expr::FunctionCall { name, args } => {
                let function = self.function(name, args.len())?;
                let args = args.iter().map(|a| self.expr(a)).collect::<Result<Vec<_>, _>>()?;
                Compiled::Call { function, args }
            }
            Expr::Negate(inner) => Compiled::Negate(Box::new(self.expr(inner)?)),
            Expr::Binary { left, op, right } => Compiled::Binary {
                left: Box::new(self.expr(left)?),
                op: *op,
                right: Box::new(self.expr(right)?),
            },
            Expr::Union(a, b) => Compiled::Union(Box::new(self.expr(a)?), Box::new(self.expr(b)?)),
            Expr::Filter { primary, predicates } => Compiled::Filter {
                primary: Box::new(self.expr(primary)?),
                predicates: self.exprs(predicates)?,
            },
            Expr::Path { start, steps } => {
                let start = match start {
                    PathStart::Root => Start::Root,
                    PathStart::Context => Start::Context,
                    PathStart::Filter(e) => Start::Filter(Box::new(self.expr(e)?)),
                };
                let steps = steps.iter().map(|s| self.step(s)).collect::<Result<Vec<_>, _>>()?;
                Compiled::Path { start, steps }
            }
        })
    }

    fn exprs(&self, exprs: &[Expr]) -> Result<Vec<Compiled>, Error> {
        exprs.iter().map(|e| self.expr(e)).collect()
    }

    fn step(&self, step: &Step) -> Result<CompiledStep, Error> {
        let test = match &step.test {
            NodeTest::AnyName => CompiledTest::AnyName,
            NodeTest::NamespaceWildcard(prefix) => CompiledTest::Namespace(self.namespace(prefix)?),
            NodeTest::Name(QName { prefix, local }) => CompiledTest::Name {
                local: local.clone(),
                namespace: match prefix {
                    Some(p) => self.namespace(p)?,
                    None => String::new(),
                },
            },
            NodeTest::Node => CompiledTest::Node,
            NodeTest::Text => CompiledTest::Text,
            NodeTest::Comment => CompiledTest::Comment,
            NodeTest::ProcessingInstruction(target) => CompiledTest::ProcessingInstruction(target.clone()),
        };
        Ok(CompiledStep { axis: step.axis, test, predicates: self.exprs(&step.predicates)? })
    }

    fn namespace(&self, prefix: &str) -> Result<String, Error> {
        self.resolver
            .lookup_namespace(prefix)
            .ok_or_else(|| Error::UndeclaredPrefix(prefix.to_string()))
    }

    fn function(&self, name: &QName, arity: usize) -> Result<Function, Error> {
        let unknown = || Error::UnknownFunction { name: name.to_string(), arity };
        if name.prefix.is_some() {
            return Err(unknown());
        }
        Function::resolve(&name.local, arity).ok_or_else(unknown)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parser::parse_xpath;
    use rstest::rstest;

    fn compile_str(input: &str, resolver: Option<&dyn NamespaceResolver>) -> Result<Compiled, Error> {
        compile(&parse_xpath(input)?, resolver)
    }

    #[rstest]
    fn prefixes_resolve_through_resolver() {
        let ns = NamespaceManager::new().with_namespace("def", "urn:def");
        let compiled = compile_str("//def:li", Some(&ns)).unwrap();
        let Compiled::Path { steps, .. } = compiled else { panic!("not a path") };
        assert_eq!(
            steps[1].test,
            CompiledTest::Name { local: "li".into(), namespace: "urn:def".into() }
        );
    }

    #[rstest]
    fn unknown_prefix_is_a_static_error() {
        let err = compile_str("//def:li", None).unwrap_err();
        assert!(matches!(err, Error::UndeclaredPrefix(ref p) if p == "def"));
        assert_eq!(err.code().as_str(), "err:XPST0081");
    }

    #[rstest]
    #[case("foo()")]
    #[case("count()")]
    #[case("concat('a')")]
    #[case("x:count(.)")]
    fn unknown_functions(#[case] input: &str) {
        assert!(matches!(compile_str(input, None), Err(Error::UnknownFunction { .. })));
    }

    #[rstest]
    fn variables_are_undefined() {
        assert!(matches!(compile_str("$v + 1", None), Err(Error::UndefinedVariable(ref v)) if v == "v"));
    }

    #[rstest]
    fn xml_prefix_is_predeclared() {
        assert!(compile_str("//@xml:lang", None).is_ok());
    }
}
