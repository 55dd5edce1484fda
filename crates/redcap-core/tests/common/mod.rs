//! Test helpers: a small evaluator for the branching logic the expander emits.
//!
//! Supports `and`, `or`, parentheses and comparisons of `[field]` or
//! `[field(code)]` against quoted or numeric literals with `=`, `<>`, `!=`,
//! `>=`, `<=`, `>` and `<`. Unanswered fields are blank.

#![allow(dead_code)]

use std::collections::HashMap;

use redcap_model::FieldRecord;

#[derive(Debug, Default, Clone)]
pub struct Answers(HashMap<String, String>);

impl Answers {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, field: &str, value: impl Into<String>) -> &mut Self {
        self.0.insert(field.to_string(), value.into());
        self
    }

    /// Ticks choice `code` of checkbox `field`.
    pub fn tick(&mut self, field: &str, code: &str) -> &mut Self {
        self.set(&format!("{field}({code})"), "1")
    }

    fn value(&self, reference: &str) -> &str {
        self.0.get(reference).map_or("", String::as_str)
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Open,
    Close,
    And,
    Or,
    Field(String),
    Op(String),
    Literal(String),
}

fn lex(logic: &str) -> Vec<Token> {
    let chars: Vec<char> = logic.chars().collect();
    let mut tokens = Vec::new();
    let mut pos = 0;
    while pos < chars.len() {
        let ch = chars[pos];
        match ch {
            c if c.is_whitespace() => pos += 1,
            '(' => {
                tokens.push(Token::Open);
                pos += 1;
            }
            ')' => {
                tokens.push(Token::Close);
                pos += 1;
            }
            '[' => {
                let end = chars[pos..]
                    .iter()
                    .position(|c| *c == ']')
                    .expect("unterminated field reference")
                    + pos;
                tokens.push(Token::Field(chars[pos + 1..end].iter().collect()));
                pos = end + 1;
            }
            '\'' | '"' => {
                let end = chars[pos + 1..]
                    .iter()
                    .position(|c| *c == ch)
                    .expect("unterminated literal")
                    + pos
                    + 1;
                tokens.push(Token::Literal(chars[pos + 1..end].iter().collect()));
                pos = end + 1;
            }
            '<' | '>' | '=' | '!' => {
                let mut op = ch.to_string();
                if let Some(next) = chars.get(pos + 1)
                    && matches!(next, '=' | '>')
                {
                    op.push(*next);
                }
                pos += op.len();
                tokens.push(Token::Op(op));
            }
            c if c.is_ascii_digit() || c == '-' => {
                let start = pos;
                pos += 1;
                while pos < chars.len() && (chars[pos].is_ascii_digit() || chars[pos] == '.') {
                    pos += 1;
                }
                tokens.push(Token::Literal(chars[start..pos].iter().collect()));
            }
            c if c.is_ascii_alphabetic() => {
                let start = pos;
                while pos < chars.len() && chars[pos].is_ascii_alphabetic() {
                    pos += 1;
                }
                let word: String = chars[start..pos].iter().collect();
                match word.as_str() {
                    "and" => tokens.push(Token::And),
                    "or" => tokens.push(Token::Or),
                    other => panic!("unexpected word {other:?} in {logic:?}"),
                }
            }
            other => panic!("unexpected character {other:?} in {logic:?}"),
        }
    }
    tokens
}

struct Parser<'a> {
    tokens: Vec<Token>,
    pos: usize,
    answers: &'a Answers,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn next(&mut self) -> Token {
        let token = self.tokens[self.pos].clone();
        self.pos += 1;
        token
    }

    fn or(&mut self) -> bool {
        let mut value = self.and();
        while self.peek() == Some(&Token::Or) {
            self.pos += 1;
            let rhs = self.and();
            value = value || rhs;
        }
        value
    }

    fn and(&mut self) -> bool {
        let mut value = self.atom();
        while self.peek() == Some(&Token::And) {
            self.pos += 1;
            let rhs = self.atom();
            value = value && rhs;
        }
        value
    }

    fn atom(&mut self) -> bool {
        match self.next() {
            Token::Open => {
                let value = self.or();
                assert_eq!(self.next(), Token::Close, "unbalanced parentheses");
                value
            }
            Token::Field(reference) => {
                let Token::Op(op) = self.next() else {
                    panic!("expected operator after [{reference}]");
                };
                let Token::Literal(literal) = self.next() else {
                    panic!("expected literal after [{reference}] {op}");
                };
                compare(self.answers.value(&reference), &op, &literal)
            }
            other => panic!("unexpected token {other:?}"),
        }
    }
}

fn compare(left: &str, op: &str, right: &str) -> bool {
    let numbers = left.parse::<f64>().ok().zip(right.parse::<f64>().ok());
    let equal = match numbers {
        Some((l, r)) => l == r,
        None => left == right,
    };
    match op {
        "=" => equal,
        "<>" | "!=" => !equal,
        _ => {
            let Some((l, r)) = numbers else {
                return false;
            };
            match op {
                ">=" => l >= r,
                "<=" => l <= r,
                ">" => l > r,
                "<" => l < r,
                other => panic!("unknown operator {other}"),
            }
        }
    }
}

/// Evaluates `logic`; a blank condition is always true.
pub fn evaluate(logic: &str, answers: &Answers) -> bool {
    if logic.trim().is_empty() {
        return true;
    }
    let mut parser = Parser {
        tokens: lex(logic),
        pos: 0,
        answers,
    };
    let value = parser.or();
    assert_eq!(parser.pos, parser.tokens.len(), "trailing tokens in {logic:?}");
    value
}

/// Ids of the records whose branching logic holds under `answers`.
pub fn visible<'a>(records: &'a [FieldRecord], answers: &Answers) -> Vec<&'a str> {
    records
        .iter()
        .filter(|record| evaluate(&record.branching_logic, answers))
        .map(|record| record.id.as_str())
        .collect()
}

pub fn record(id: &str, kind: &str, label: &str) -> FieldRecord {
    let mut record = FieldRecord::new(id, kind);
    record.form_name = "intake".to_string();
    record.label = label.to_string();
    record
}

pub fn ids(records: &[FieldRecord]) -> Vec<&str> {
    records.iter().map(|record| record.id.as_str()).collect()
}
