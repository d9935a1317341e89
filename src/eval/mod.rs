pub mod error;
pub mod value;

use crate::{
    config::DEFAULT_MAX_DEPTH,
    eval::{error::EvalError, value::Value},
    parser::ast::{Block, Expr, Infix, Literal, Prefix, Program, Statement},
};

/// Why evaluation of a node stopped early. `return` rides the same channel as
/// errors so that `?` carries it up to the program.
enum Unwind {
    Return(Value),
    Error(EvalError),
}

impl From<EvalError> for Unwind {
    fn from(error: EvalError) -> Self {
        Unwind::Error(error)
    }
}

type Flow<T> = Result<T, Unwind>;

pub struct Evaluator {
    depth: usize,
    max_depth: usize,
}

impl Default for Evaluator {
    fn default() -> Self {
        Self::new()
    }
}

/// Evaluates `program` with the default nesting limit.
pub fn evaluate(program: &Program) -> Result<Value, EvalError> {
    Evaluator::new().eval(program)
}

impl Evaluator {
    pub fn new() -> Self {
        Self::with_max_depth(DEFAULT_MAX_DEPTH)
    }

    pub fn with_max_depth(max_depth: usize) -> Self {
        Self {
            depth: 0,
            max_depth,
        }
    }

    pub fn eval(&mut self, program: &Program) -> Result<Value, EvalError> {
        match self.eval_block(&program.statements) {
            Ok(value) | Err(Unwind::Return(value)) => Ok(value),
            Err(Unwind::Error(error)) => Err(error),
        }
    }

    fn eval_block(&mut self, block: &[Statement]) -> Flow<Value> {
        block
            .iter()
            .try_fold(Value::Null, |_, statement| self.eval_statement(statement))
    }

    fn eval_statement(&mut self, statement: &Statement) -> Flow<Value> {
        match statement {
            Statement::Let(..) => Err(EvalError::Unsupported("let statement").into()),
            Statement::Return(expr) => Err(Unwind::Return(self.eval_expr(expr)?)),
            Statement::Expression(expr) => self.eval_expr(expr),
        }
    }

    fn eval_expr(&mut self, expr: &Expr) -> Flow<Value> {
        if self.depth >= self.max_depth {
            return Err(EvalError::TooDeeplyNested {
                limit: self.max_depth,
            }
            .into());
        }

        self.depth += 1;
        let value = self.eval_expr_at(expr);
        self.depth -= 1;

        value
    }

    fn eval_expr_at(&mut self, expr: &Expr) -> Flow<Value> {
        match expr {
            Expr::Ident(ident) => Err(EvalError::UnboundIdentifier(ident.clone()).into()),
            Expr::Literal(lit) => Ok(Self::eval_literal(lit)),
            Expr::Prefix(prefix_op, right) => {
                let right = self.eval_expr(right)?;
                Ok(Self::eval_prefix_expr(*prefix_op, right)?)
            }
            Expr::Infix(infix_op, left, right) => {
                let left = self.eval_expr(left)?;
                let right = self.eval_expr(right)?;
                Ok(Self::eval_infix_expr(*infix_op, left, right)?)
            }
            Expr::If {
                condition,
                consequence,
                alternative,
            } => self.eval_if_expr(condition, consequence, alternative),
            Expr::Function { .. } => Err(EvalError::Unsupported("function literal").into()),
            Expr::Call { .. } => Err(EvalError::Unsupported("function call").into()),
        }
    }

    fn eval_literal(lit: &Literal) -> Value {
        match lit {
            Literal::Int(i) => Value::Integer(*i),
            Literal::Bool(b) => Value::Boolean(*b),
        }
    }

    fn eval_if_expr(
        &mut self,
        condition: &Expr,
        consequence: &[Statement],
        alternative: &Option<Block>,
    ) -> Flow<Value> {
        let condition = self.eval_expr(condition)?;

        if condition.is_truthy() {
            self.eval_block(consequence)
        } else if let Some(alternative) = alternative {
            self.eval_block(alternative)
        } else {
            Ok(Value::Null)
        }
    }

    fn eval_prefix_expr(prefix: Prefix, right: Value) -> Result<Value, EvalError> {
        match (prefix, right) {
            (Prefix::Bang, right) => Ok(Value::Boolean(!right.is_truthy())),
            (Prefix::Minus, Value::Integer(i)) => i
                .checked_neg()
                .map(Value::Integer)
                .ok_or(EvalError::NegationOverflow(i)),
            (Prefix::Minus, right) => Err(EvalError::UnknownPrefixOperator {
                operator: prefix,
                operand: right.value_type(),
            }),
        }
    }

    fn eval_infix_expr(operator: Infix, left: Value, right: Value) -> Result<Value, EvalError> {
        match (&left, &right) {
            (Value::Integer(left), Value::Integer(right)) => {
                Self::eval_integer_infix_expr(operator, *left, *right)
            }
            _ if left.value_type() != right.value_type() => Err(EvalError::TypeMismatch {
                left: left.value_type(),
                operator,
                right: right.value_type(),
            }),
            _ => match operator {
                Infix::Equal => Ok(Value::Boolean(left == right)),
                Infix::NotEqual => Ok(Value::Boolean(left != right)),
                _ => Err(EvalError::UnknownInfixOperator {
                    left: left.value_type(),
                    operator,
                    right: right.value_type(),
                }),
            },
        }
    }

    fn eval_integer_infix_expr(operator: Infix, left: i64, right: i64) -> Result<Value, EvalError> {
        let overflow = || EvalError::IntegerOverflow {
            left,
            operator,
            right,
        };

        let value = match operator {
            Infix::Plus => Value::Integer(left.checked_add(right).ok_or_else(overflow)?),
            Infix::Minus => Value::Integer(left.checked_sub(right).ok_or_else(overflow)?),
            Infix::Multiply => Value::Integer(left.checked_mul(right).ok_or_else(overflow)?),
            Infix::Divide => {
                if right == 0 {
                    return Err(EvalError::DivisionByZero(left));
                }
                Value::Integer(left.checked_div(right).ok_or_else(overflow)?)
            }
            Infix::LessThan => Value::Boolean(left < right),
            Infix::GreaterThan => Value::Boolean(left > right),
            Infix::Equal => Value::Boolean(left == right),
            Infix::NotEqual => Value::Boolean(left != right),
        };

        Ok(value)
    }
}

#[cfg(test)]
mod test {
    use crate::{
        eval::{error::EvalError, evaluate, value::Value, Evaluator},
        lexer::Lexer,
        parser::{
            ast::{Expr, Literal, Prefix, Program, Statement},
            Parser,
        },
    };

    #[derive(Debug)]
    struct TestDataSimple<T> {
        input: &'static str,
        expected: T,
    }

    #[test]
    fn eval_integer_expression() {
        let test_data = vec![
            TestDataSimple {
                input: "5",
                expected: 5,
            },
            TestDataSimple {
                input: "-10",
                expected: -10,
            },
            TestDataSimple {
                input: "5 + 5 + 5 + 5 - 10",
                expected: 10,
            },
            TestDataSimple {
                input: "2 * 2 * 2 * 2 * 2",
                expected: 32,
            },
            TestDataSimple {
                input: "-50 + 100 + -50",
                expected: 0,
            },
            TestDataSimple {
                input: "5 + 2 * 10",
                expected: 25,
            },
            TestDataSimple {
                input: "20 + 2 * -10",
                expected: 0,
            },
            TestDataSimple {
                input: "50 / 2 * 2 + 10",
                expected: 60,
            },
            TestDataSimple {
                input: "3 * (3 * 3) + 10",
                expected: 37,
            },
            TestDataSimple {
                input: "(5 + 10 * 2 + 15 / 3) * 2 + -10",
                expected: 50,
            },
            TestDataSimple {
                input: "40 / 2 + 21",
                expected: 41,
            },
            TestDataSimple {
                input: "--5",
                expected: 5,
            },
            TestDataSimple {
                input: "7 / 2",
                expected: 3,
            },
            TestDataSimple {
                input: "-7 / 2",
                expected: -3,
            },
            TestDataSimple {
                input: "9223372036854775807",
                expected: i64::MAX,
            },
        ];

        test_data.into_iter().for_each(|test_datum| {
            assert_integer_object(eval(test_datum.input), test_datum.expected);
        });
    }

    #[test]
    fn eval_boolean_expression() {
        let test_data = vec![
            TestDataSimple {
                input: "true",
                expected: true,
            },
            TestDataSimple {
                input: "1 < 2",
                expected: true,
            },
            TestDataSimple {
                input: "1 > 1",
                expected: false,
            },
            TestDataSimple {
                input: "5 > 4",
                expected: true,
            },
            TestDataSimple {
                input: "5 != 5",
                expected: false,
            },
            TestDataSimple {
                input: "1 == 1",
                expected: true,
            },
            TestDataSimple {
                input: "1 != 2",
                expected: true,
            },
            TestDataSimple {
                input: "true == false",
                expected: false,
            },
            TestDataSimple {
                input: "false != true",
                expected: true,
            },
            TestDataSimple {
                input: "(1 < 2) == true",
                expected: true,
            },
            TestDataSimple {
                input: "(1 > 2) == false",
                expected: true,
            },
            TestDataSimple {
                input: "if (false) { 1 } == if (false) { 2 }",
                expected: true,
            },
        ];

        test_data.into_iter().for_each(|test_datum| {
            assert_boolean_object(eval(test_datum.input), test_datum.expected);
        })
    }

    #[test]
    fn bang_operator_expression() {
        let test_data = vec![
            TestDataSimple {
                input: "!true",
                expected: false,
            },
            TestDataSimple {
                input: "!false",
                expected: true,
            },
            TestDataSimple {
                input: "!5",
                expected: false,
            },
            TestDataSimple {
                input: "!0",
                expected: false,
            },
            TestDataSimple {
                input: "!!true",
                expected: true,
            },
            TestDataSimple {
                input: "!!false",
                expected: false,
            },
            TestDataSimple {
                input: "!!5",
                expected: true,
            },
            TestDataSimple {
                input: "!if (false) { 1 }",
                expected: true,
            },
        ];

        test_data.into_iter().for_each(|test_datum| {
            assert_boolean_object(eval(test_datum.input), test_datum.expected);
        })
    }

    #[test]
    fn if_else_expressions() {
        let test_data = vec![
            TestDataSimple {
                input: "if (true) { 10 }",
                expected: Value::Integer(10),
            },
            TestDataSimple {
                input: "if (false) { 10 }",
                expected: Value::Null,
            },
            TestDataSimple {
                input: "if (1) { 10 }",
                expected: Value::Integer(10),
            },
            TestDataSimple {
                input: "if (1 > 2) { 10 } else { 20 }",
                expected: Value::Integer(20),
            },
            TestDataSimple {
                input: "if (1 < 2) { 10 } else { 20 }",
                expected: Value::Integer(10),
            },
            TestDataSimple {
                input: "if (true) { }",
                expected: Value::Null,
            },
        ];

        test_data.into_iter().for_each(|test_datum| {
            assert_eq!(eval(test_datum.input), Ok(test_datum.expected));
        });
    }

    #[test]
    fn return_statements() {
        let test_data = vec![
            TestDataSimple {
                input: "return 10;",
                expected: 10,
            },
            TestDataSimple {
                input: "return 10; 9;",
                expected: 10,
            },
            TestDataSimple {
                input: "9; return 2 * 5; 9;",
                expected: 10,
            },
            TestDataSimple {
                input: "if (10 > 1) { if (10 > 1) { return 10; } return 1; }",
                expected: 10,
            },
            TestDataSimple {
                input: "if (true) { return 3; } 4",
                expected: 3,
            },
            TestDataSimple {
                input: "1 + if (true) { return 5; }",
                expected: 5,
            },
        ];

        test_data.into_iter().for_each(|test_datum| {
            assert_integer_object(eval(test_datum.input), test_datum.expected);
        });
    }

    #[test]
    fn error_handling() {
        let test_data = vec![
            TestDataSimple {
                input: "5 + true;",
                expected: "type mismatch: INTEGER + BOOLEAN",
            },
            TestDataSimple {
                input: "5 + true; 5;",
                expected: "type mismatch: INTEGER + BOOLEAN",
            },
            TestDataSimple {
                input: "if (false) { 1 } < 1",
                expected: "type mismatch: NULL < INTEGER",
            },
            TestDataSimple {
                input: "-true",
                expected: "unknown operator: -BOOLEAN",
            },
            TestDataSimple {
                input: "true + false;",
                expected: "unknown operator: BOOLEAN + BOOLEAN",
            },
            TestDataSimple {
                input: "5; true > false; 5",
                expected: "unknown operator: BOOLEAN > BOOLEAN",
            },
            TestDataSimple {
                input: "if (10 > 1) { if (10 > 1) { return true + false; } return 1; }",
                expected: "unknown operator: BOOLEAN + BOOLEAN",
            },
            TestDataSimple {
                input: "foobar",
                expected: "identifier not found: foobar",
            },
            TestDataSimple {
                input: "5 / 0",
                expected: "division by zero: 5 / 0",
            },
            TestDataSimple {
                input: "9223372036854775807 + 1",
                expected: "integer overflow: 9223372036854775807 + 1",
            },
            TestDataSimple {
                input: "-9223372036854775807 - 2",
                expected: "integer overflow: -9223372036854775807 - 2",
            },
            TestDataSimple {
                input: "4611686018427387904 * 2",
                expected: "integer overflow: 4611686018427387904 * 2",
            },
            TestDataSimple {
                input: "(-9223372036854775807 - 1) / -1",
                expected: "integer overflow: -9223372036854775808 / -1",
            },
            TestDataSimple {
                input: "-(-9223372036854775807 - 1)",
                expected: "integer overflow: -(-9223372036854775808)",
            },
            TestDataSimple {
                input: "let a = 5; a;",
                expected: "let statement is not supported without a binding environment",
            },
            TestDataSimple {
                input: "fn(x) { x }",
                expected: "function literal is not supported without a binding environment",
            },
            TestDataSimple {
                input: "if (true) { add(1, 2) }",
                expected: "function call is not supported without a binding environment",
            },
        ];

        test_data.into_iter().for_each(|test_datum| {
            assert_error(eval(test_datum.input), test_datum.expected);
        });
    }

    #[test]
    fn first_error_stops_evaluation() {
        assert_eq!(eval("5 / 0; -true"), Err(EvalError::DivisionByZero(5)));
    }

    #[test]
    fn empty_program_is_null() {
        assert_eq!(evaluate(&Program::default()), Ok(Value::Null));
    }

    #[test]
    fn nesting_limit() {
        let program = parse("1 + (2 + (3 + 4))");

        assert_eq!(
            Evaluator::with_max_depth(3).eval(&program),
            Err(EvalError::TooDeeplyNested { limit: 3 })
        );
        assert_eq!(
            Evaluator::with_max_depth(4).eval(&program),
            Ok(Value::Integer(10))
        );
    }

    #[test]
    fn deepest_parsable_program_evaluates() {
        let input = format!("{}1", "-".repeat(255));

        assert_integer_object(eval(&input), -1);
    }

    #[test]
    fn hand_built_tree_hits_limit() {
        let expr = (0..300).fold(Expr::Literal(Literal::Bool(true)), |expr, _| {
            Expr::Prefix(Prefix::Bang, Box::new(expr))
        });
        let program = Program {
            statements: vec![Statement::Expression(expr)],
        };

        assert_eq!(
            evaluate(&program),
            Err(EvalError::TooDeeplyNested { limit: 256 })
        );
    }

    #[test]
    fn evaluator_is_reusable_after_error() {
        let mut evaluator = Evaluator::with_max_depth(3);

        assert!(evaluator.eval(&parse("1 + (2 + (3 + 4))")).is_err());
        assert_eq!(evaluator.eval(&parse("1 + 2")), Ok(Value::Integer(3)));
    }

    fn parse(input: &str) -> Program {
        let tokens = Lexer::new().lex_input(input).unwrap();
        let (program, errors) = Parser::parse(tokens);
        assert!(
            errors.is_empty(),
            "parser errors for {}: {:?}",
            input,
            errors
        );

        program
    }

    fn eval(input: &str) -> Result<Value, EvalError> {
        evaluate(&parse(input))
    }

    fn assert_integer_object(object: Result<Value, EvalError>, expected: i64) {
        assert_eq!(object, Ok(Value::Integer(expected)));
    }

    fn assert_boolean_object(object: Result<Value, EvalError>, expected: bool) {
        assert_eq!(object, Ok(Value::Boolean(expected)));
    }

    fn assert_error(object: Result<Value, EvalError>, expected: &str) {
        match object {
            Err(error) => assert_eq!(error.to_string(), expected),
            Ok(value) => panic!("expected error {:?}, got {:?}", expected, value),
        }
    }
}
