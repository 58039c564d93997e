//! 默认值字面量解析
//!
//! 默认值按宿主语言的写法声明，例如 `True`、`1.0`、`''`、`(255, 255, 255, 255)`、`[]`。

use crate::value::AttrValue;

/// 解析默认值字面量，失败返回描述
pub fn parse_literal(text: &str) -> Result<AttrValue, String> {
    let mut parser = LiteralParser { chars: text.chars().collect(), pos: 0 };
    let value = parser.value()?;
    parser.skip_ws();
    if parser.pos != parser.chars.len() {
        return Err(format!("trailing characters in literal {:?}", text));
    }
    Ok(value)
}

struct LiteralParser {
    chars: Vec<char>,
    pos: usize,
}

impl LiteralParser {
    fn peek(&self) -> Option<char> {
        self.chars.get(self.pos).copied()
    }

    fn skip_ws(&mut self) {
        while matches!(self.peek(), Some(c) if c.is_whitespace()) {
            self.pos += 1;
        }
    }

    fn value(&mut self) -> Result<AttrValue, String> {
        self.skip_ws();
        match self.peek() {
            Some('(') => self.sequence(')'),
            Some('[') => self.sequence(']'),
            Some(q @ ('\'' | '"')) => self.string(q),
            Some(c) if c == '-' || c == '+' || c == '.' || c.is_ascii_digit() => self.number(),
            Some(c) if c.is_alphabetic() => self.word(),
            Some(c) => Err(format!("unexpected character {:?}", c)),
            None => Err("empty literal".to_string()),
        }
    }

    fn sequence(&mut self, close: char) -> Result<AttrValue, String> {
        self.pos += 1;
        let mut items = Vec::new();
        loop {
            self.skip_ws();
            if self.peek() == Some(close) {
                self.pos += 1;
                return Ok(AttrValue::List(items));
            }
            items.push(self.value()?);
            self.skip_ws();
            match self.peek() {
                Some(',') => self.pos += 1,
                Some(c) if c == close => {}
                _ => return Err(format!("expected ',' or {:?}", close)),
            }
        }
    }

    fn string(&mut self, quote: char) -> Result<AttrValue, String> {
        self.pos += 1;
        let mut out = String::new();
        while let Some(c) = self.peek() {
            self.pos += 1;
            if c == quote {
                return Ok(AttrValue::Str(out));
            }
            out.push(c);
        }
        Err("unterminated string literal".to_string())
    }

    fn number(&mut self) -> Result<AttrValue, String> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_ascii_digit() || matches!(c, '-' | '+' | '.' | 'e' | 'E')) {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        if let Ok(v) = text.parse::<i64>() {
            return Ok(AttrValue::Int(v));
        }
        text.parse::<f64>()
            .map(AttrValue::Float)
            .map_err(|_| format!("invalid number {:?}", text))
    }

    fn word(&mut self) -> Result<AttrValue, String> {
        let start = self.pos;
        while matches!(self.peek(), Some(c) if c.is_alphanumeric() || c == '_') {
            self.pos += 1;
        }
        let text: String = self.chars[start..self.pos].iter().collect();
        match text.as_str() {
            "True" | "true" => Ok(AttrValue::Bool(true)),
            "False" | "false" => Ok(AttrValue::Bool(false)),
            "None" | "null" => Ok(AttrValue::None),
            other => Err(format!("unknown literal {:?}", other)),
        }
    }
}
