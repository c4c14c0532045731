use crate::CallNode;
use crate::Chain;
use pattern::Argument;
use std::fmt;

/// Name of the builder variable at the root of every chain and callback.
pub const ROOT: &str = "exp";

impl fmt::Display for Chain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(ROOT)?;
        write_calls(f, &self.calls)?;
        if let Some(flags) = &self.flags {
            f.write_str(".done(")?;
            write_string(f, flags)?;
            f.write_str(")")?;
        }
        Ok(())
    }
}

impl fmt::Display for CallNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}(", self.operation)?;
        if let Some(body) = &self.body {
            write!(f, "({root}) => {{ {root}", root = ROOT)?;
            write_calls(f, body)?;
            f.write_str(" }")?;
        } else {
            for (i, argument) in self.arguments.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                match argument {
                    Argument::Number(n) => write!(f, "{n}")?,
                    Argument::Text(text) => write_string(f, text)?,
                }
            }
        }
        f.write_str(")")
    }
}

fn write_calls(f: &mut fmt::Formatter<'_>, calls: &[CallNode]) -> fmt::Result {
    for call in calls {
        write!(f, ".{call}")?;
    }
    Ok(())
}

fn write_string(f: &mut fmt::Formatter<'_>, text: &str) -> fmt::Result {
    f.write_str("\"")?;
    for c in text.chars() {
        match c {
            '\\' => f.write_str(r"\\")?,
            '"' => f.write_str("\\\"")?,
            '\n' => f.write_str(r"\n")?,
            '\t' => f.write_str(r"\t")?,
            '\r' => f.write_str(r"\r")?,
            c => write!(f, "{c}")?,
        }
    }
    f.write_str("\"")
}

#[cfg(test)]
mod tests {
    use crate::CallNode;
    use crate::Chain;
    use crate::Operation;
    use pattern::Argument;
    use pattern::GroupKind;
    use pattern::TokenKind;

    #[test]
    fn test_call_arguments() {
        let call = CallNode::new(
            Operation::Literal,
            vec![
                Argument::Text("g".to_string()),
                Argument::Number(4),
                Argument::Number(5),
            ],
        );
        assert_eq!(call.to_string(), r#"literal("g", 4, 5)"#);
        let call = CallNode::new(Operation::Token(TokenKind::Digit), Vec::new());
        assert_eq!(call.to_string(), "digit()");
    }

    #[test]
    fn test_string_escapes() {
        let call = CallNode::new(
            Operation::Literal,
            vec![Argument::Text("a\\\"\n\tb".to_string())],
        );
        assert_eq!(call.to_string(), r#"literal("a\\\"\n\tb")"#);
    }

    #[test]
    fn test_body() {
        let call = CallNode::with_body(
            Operation::Group(GroupKind::Lookahead),
            vec![CallNode::new(
                Operation::Literal,
                vec![Argument::Text("mite".to_string())],
            )],
        );
        assert_eq!(
            call.to_string(),
            r#"look.ahead((exp) => { exp.literal("mite") })"#
        );
        let call = CallNode::with_body(Operation::Set { negated: true }, Vec::new());
        assert_eq!(call.to_string(), "negatedSet((exp) => { exp })");
    }

    #[test]
    fn test_chain() {
        let chain = Chain {
            calls: vec![CallNode::new(Operation::Token(TokenKind::Digit), Vec::new())],
            flags: Some("g".to_string()),
        };
        assert_eq!(chain.to_string(), r#"exp.digit().done("g")"#);
        let chain = Chain {
            calls: Vec::new(),
            flags: None,
        };
        assert_eq!(chain.to_string(), "exp");
    }
}
