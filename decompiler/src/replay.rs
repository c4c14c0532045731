use crate::CallNode;
use crate::Chain;
use crate::Operation;
use crate::reader::ReadError;
use pattern::Argument;
use pattern::Body;
use pattern::BuildError;
use pattern::Pattern;
use pattern::PatternBuilder;
use pattern::Quantifier;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum EvalError {
    #[error(transparent)]
    Read(#[from] ReadError),
    #[error(transparent)]
    Build(#[from] BuildError),
    #[error("{0} requires a string or a callback")]
    MissingBody(Operation),
    #[error("{0} does not take a callback")]
    UnexpectedBody(Operation),
}

impl Chain {
    /// Drive a fresh builder with the calls and compile the result. A chain
    /// without `done` compiles with no flags.
    pub fn to_pattern(&self) -> Result<Pattern, EvalError> {
        let mut builder = PatternBuilder::new();
        replay(&mut builder, &self.calls)?;
        Ok(builder.done(self.flags.as_deref().unwrap_or(""))?)
    }
}

fn replay(builder: &mut PatternBuilder, calls: &[CallNode]) -> Result<(), EvalError> {
    for call in calls {
        apply(builder, call)?;
    }
    Ok(())
}

fn apply(builder: &mut PatternBuilder, call: &CallNode) -> Result<(), EvalError> {
    let operation = call.operation;
    if call.body.is_some() && !operation.takes_body() {
        return Err(EvalError::UnexpectedBody(operation));
    }
    match operation {
        Operation::Token(kind) => {
            if !kind.is_quantifiable() && !call.arguments.is_empty() {
                return Err(BuildError::InvalidArgument(format!(
                    "{operation} takes no arguments, got {}",
                    call.arguments.len()
                ))
                .into());
            }
            builder.token(kind, Quantifier::try_from(call.arguments.as_slice())?);
        }
        Operation::Literal => {
            let (text, quantifier) = text_and_quantifier(operation, &call.arguments)?;
            builder.literal(text, quantifier)?;
        }
        Operation::QuantifiedString => {
            let (text, quantifier) = text_and_quantifier(operation, &call.arguments)?;
            builder.quantified_string(text, quantifier);
        }
        Operation::Group(kind) => {
            let body = body_of(operation, call)?;
            builder.sub_expression(kind, body)?;
        }
        Operation::Set { negated } => {
            let body = body_of(operation, call)?;
            builder.char_set(body, negated)?;
        }
    }
    Ok(())
}

fn text_and_quantifier(
    operation: Operation,
    arguments: &[Argument],
) -> Result<(&str, Quantifier), EvalError> {
    match arguments.split_first() {
        Some((Argument::Text(text), bounds)) => Ok((text.as_str(), Quantifier::try_from(bounds)?)),
        Some((Argument::Number(n), _)) => Err(BuildError::TypeMismatch {
            context: operation.name(),
            expected: "text",
            found: n.to_string(),
        }
        .into()),
        None => Err(BuildError::InvalidArgument(format!("{operation} requires text")).into()),
    }
}

/// A callback body is replayed up front on its own builder, and the text it
/// produced is handed over as the callback's output.
fn body_of<'c>(operation: Operation, call: &'c CallNode) -> Result<Body<'c>, EvalError> {
    match (&call.body, call.arguments.as_slice()) {
        (Some(calls), []) => {
            let mut nested = PatternBuilder::new();
            replay(&mut nested, calls)?;
            let text = nested.into_string();
            Ok(Body::callback(move |exp| Ok(exp.quantified_string(&text, ()))))
        }
        (None, [Argument::Text(text)]) => Ok(Body::from(text.as_str())),
        (None, [Argument::Number(n)]) => Err(BuildError::TypeMismatch {
            context: operation.name(),
            expected: "text or a callback",
            found: n.to_string(),
        }
        .into()),
        (None, []) => Err(EvalError::MissingBody(operation)),
        _ => Err(BuildError::InvalidArgument(format!(
            "{operation} takes a single string or callback"
        ))
        .into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pattern::GroupKind;
    use pattern::TokenKind;

    fn chain(calls: Vec<CallNode>, flags: &str) -> Chain {
        Chain {
            calls,
            flags: Some(flags.to_string()),
        }
    }

    fn text(s: &str) -> Argument {
        Argument::Text(s.to_string())
    }

    #[test]
    fn test_replay_callbacks() {
        let calls = vec![
            CallNode::new(Operation::Literal, vec![text("hello")]),
            CallNode::with_body(
                Operation::Set { negated: false },
                vec![
                    CallNode::new(Operation::Literal, vec![text("sh")]),
                    CallNode::new(Operation::Token(TokenKind::Whitespace), Vec::new()),
                ],
            ),
            CallNode::with_body(
                Operation::Group(GroupKind::NegativeLookahead),
                vec![CallNode::new(Operation::Literal, vec![text("?x")])],
            ),
        ];
        let pattern = chain(calls, "g").to_pattern().unwrap();
        assert_eq!(pattern.source(), r"hello[sh\s](?!\?x)");
        assert_eq!(pattern.flags().to_string(), "g");
    }

    #[test]
    fn test_replay_string_bodies() {
        let calls = vec![
            CallNode::new(Operation::Set { negated: true }, vec![text("]?-word")]),
            CallNode::new(Operation::Group(GroupKind::Capturing), vec![text("a.b")]),
        ];
        let pattern = chain(calls, "").to_pattern().unwrap();
        assert_eq!(pattern.source(), r"[^\]\?\-word](a\.b)");
    }

    #[test]
    fn test_without_done() {
        let chain = Chain {
            calls: vec![CallNode::new(
                Operation::Token(TokenKind::Digit),
                vec![Argument::Number(2)],
            )],
            flags: None,
        };
        let pattern = chain.to_pattern().unwrap();
        assert_eq!(pattern.to_string(), r"/\d{2}/");
    }

    #[test]
    fn test_quantifier_type_mismatch() {
        let calls = vec![CallNode::new(
            Operation::Token(TokenKind::Digit),
            vec![text("4")],
        )];
        let err = chain(calls, "").to_pattern().unwrap_err();
        assert!(matches!(
            err,
            EvalError::Build(BuildError::TypeMismatch { .. })
        ));
    }

    #[test]
    fn test_literal_needs_text() {
        let calls = vec![CallNode::new(Operation::Literal, vec![Argument::Number(4)])];
        let err = chain(calls, "").to_pattern().unwrap_err();
        assert!(matches!(
            err,
            EvalError::Build(BuildError::TypeMismatch {
                context: "literal",
                ..
            })
        ));
        let calls = vec![CallNode::new(Operation::Literal, Vec::new())];
        let err = chain(calls, "").to_pattern().unwrap_err();
        assert!(matches!(err, EvalError::Build(BuildError::InvalidArgument(_))));
    }

    #[test]
    fn test_literal_quantifier_on_long_text() {
        let calls = vec![CallNode::new(
            Operation::Literal,
            vec![text("ab"), Argument::Number(4)],
        )];
        let err = chain(calls, "").to_pattern().unwrap_err();
        assert!(matches!(err, EvalError::Build(BuildError::InvalidArgument(_))));
    }

    #[test]
    fn test_unquantifiable_token_with_argument() {
        let calls = vec![CallNode::new(
            Operation::Token(TokenKind::Or),
            vec![Argument::Number(1)],
        )];
        let err = chain(calls, "").to_pattern().unwrap_err();
        assert!(matches!(err, EvalError::Build(BuildError::InvalidArgument(_))));
    }

    #[test]
    fn test_missing_and_unexpected_body() {
        let calls = vec![CallNode::new(Operation::Group(GroupKind::Capturing), Vec::new())];
        let err = chain(calls, "").to_pattern().unwrap_err();
        assert!(matches!(
            err,
            EvalError::MissingBody(Operation::Group(GroupKind::Capturing))
        ));
        let calls = vec![CallNode::with_body(
            Operation::Token(TokenKind::Digit),
            Vec::new(),
        )];
        let err = chain(calls, "").to_pattern().unwrap_err();
        assert!(matches!(
            err,
            EvalError::UnexpectedBody(Operation::Token(TokenKind::Digit))
        ));
    }

    #[test]
    fn test_engine_error() {
        let calls = vec![CallNode::new(Operation::Token(TokenKind::OneOrMore), Vec::new())];
        let err = chain(calls, "").to_pattern().unwrap_err();
        assert!(matches!(err, EvalError::Build(BuildError::Syntax(_))));
    }

    #[test]
    fn test_invalid_flags() {
        let err = chain(Vec::new(), "uv").to_pattern().unwrap_err();
        assert!(matches!(err, EvalError::Build(BuildError::InvalidFlags(_))));
    }
}
